// Bidboard entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Load the player pool and start or resume the draft log
// 4. Run the command loop on stdin/stdout until quit

use bidboard::app;
use bidboard::config;

use anyhow::Context;
use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    init_tracing()?;
    info!("Bidboard starting up");

    let resume = std::env::args().skip(1).any(|arg| arg == "--resume");

    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: league={}, {} owners, ${} salary cap, {} roster spots",
        config.league.name,
        config.league.owners.len(),
        config.league.salary_cap,
        config.league.roster_size
    );

    let (session, restored) = match app::start_session(&config, resume) {
        Ok(started) => started,
        Err(e) => {
            error!("Failed to start draft session: {:#}", e);
            return Err(e);
        }
    };
    if restored {
        info!("Draft state restored from previous session");
    } else {
        info!("Starting fresh draft session");
    }

    let mut app = app::App::new(config, session);
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    app::run(&mut app, stdin.lock(), stdout.lock())?;

    info!("Bidboard shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file so the prompt stays readable.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("bidboard.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("bidboard=info,bidboard_core=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
