// Scripted shell sessions against the shipped defaults and sample pool.
//
// `cargo test` runs with the package directory as cwd, so `defaults/` and
// `data/` are copied from there into a scratch directory per test.

use std::fs;
use std::path::PathBuf;

use bidboard::app::{self, App};
use bidboard::config::{ensure_league_file, load_config_from, Config};

// ===========================================================================
// Test helpers
// ===========================================================================

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("bidboard_shell_{name}"));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(dir.join("defaults")).unwrap();
    fs::create_dir_all(dir.join("data")).unwrap();
    fs::copy("defaults/league.toml", dir.join("defaults/league.toml")).unwrap();
    fs::copy("data/players.csv", dir.join("data/players.csv")).unwrap();
    dir
}

fn load(dir: &PathBuf) -> Config {
    ensure_league_file(dir).unwrap();
    load_config_from(dir).unwrap()
}

/// Run `script` through the shell and return everything it printed.
fn run_script(config: &Config, resume: bool, script: &str) -> (App, String) {
    let (session, _) = app::start_session(config, resume).unwrap();
    let mut app = App::new(config.clone(), session);
    let mut output = Vec::new();
    app::run(&mut app, script.as_bytes(), &mut output).unwrap();
    (app, String::from_utf8(output).unwrap())
}

// ===========================================================================
// Sessions
// ===========================================================================

#[test]
fn opening_picks_of_the_default_league() {
    let dir = scratch_dir("opening");
    let config = load(&dir);
    let script = "\
status
nominate Christian McCaffrey
draft Christian McCaffrey to Lance for 62
nominate Josh Allen
draft Josh Allen to Will for $41
mine
board
quit
";
    let (app, out) = run_script(&config, false, script);

    assert!(out.starts_with(
        "Round: 1, Pick: 1, Total Budget Remaining: $2400 | Nomination: Seth - Nomination Number 1"
    ));
    assert!(out.contains("Seth has nominated Christian McCaffrey"));
    assert!(out.contains("Lance has drafted Christian McCaffrey for $62. Budget remaining: $138. Max bid: $124"));
    assert!(out.contains("Lance has nominated Josh Allen"));
    assert!(out.contains("*** MY TEAM ***\nWill: budget $159"));
    assert!(out.contains(
        "Round: 1, Pick: 3, Total Budget Remaining: $2297 | Nomination: fpd - Nomination Number 3"
    ));

    let records = app.session.log().records().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].player, "Josh Allen");
    assert_eq!(records[1].nominating_owner.as_deref(), Some("Lance"));
    assert_eq!(records[1].buying_owner, "Will");
    assert_eq!(records[1].price, 41);
}

#[test]
fn bad_input_never_changes_state() {
    let dir = scratch_dir("bad_input");
    let config = load(&dir);
    let script = "\
draft Josh Allen to Will for 10
nominate Nobody Special
nominate Josh Allen by Ghost
nominate Josh Allen
draft Josh Allen to Will for 0
draft Josh Allen to Will for ten
draft Josh Allen to Will for 186
draft Josh Allen to Ghost for 5
undo
frobnicate
";
    let (app, out) = run_script(&config, false, script);

    assert!(out.contains("error: invalid input: Josh Allen has not been nominated"));
    assert!(out.contains("error: player 'Nobody Special' not found"));
    assert!(out.contains("error: owner 'Ghost' not found"));
    assert!(out.contains("error: invalid input: price must be at least $1"));
    assert!(out.contains("error: Will cannot afford a bid of $186 (max bid $185)"));
    assert!(out.contains("error: no picks to undo"));
    assert!(out.contains("unknown command 'frobnicate'"));

    assert_eq!(app.session.pick(), 1);
    assert_eq!(app.session.total_remaining_budget(), 2400);
    assert!(app.session.log().records().unwrap().is_empty());
}

#[test]
fn resume_picks_up_where_the_last_session_stopped() {
    let dir = scratch_dir("resume");
    let config = load(&dir);
    run_script(
        &config,
        false,
        "\
nominate Breece Hall
draft Breece Hall to Joe for 35
add Tony Toledo wr
nominate Tony Toledo
draft Tony Toledo to Seth for 1
quit
",
    );

    let (app, out) = run_script(&config, true, "status\nundo\nplayers pos=wr tier=0\n");

    assert!(out.starts_with(
        "Round: 1, Pick: 3, Total Budget Remaining: $2364 | Nomination: fpd - Nomination Number 3"
    ));
    assert!(out.contains("Reversed pick 2 for player: Tony Toledo, owner: Seth, price: $1"));
    assert!(out.contains("> Tony Toledo\n"));
    assert_eq!(app.session.owner("Joe").unwrap().budget(), 165);
    assert_eq!(app.session.owner("Seth").unwrap().budget(), 200);
    assert_eq!(app.session.pick(), 2);
}

#[test]
fn snapshot_prints_json_state() {
    let dir = scratch_dir("snapshot");
    let config = load(&dir);
    let (_, out) = run_script(
        &config,
        false,
        "nominate Dallas\ndraft Dallas to Etler for 1\nsnapshot\nquit\n",
    );

    let start = out.find("{\n").unwrap();
    let end = out.rfind("\n}").unwrap() + 2;
    let value: serde_json::Value = serde_json::from_str(&out[start..end]).unwrap();
    assert_eq!(value["league"], "Home League");
    assert_eq!(value["pick"], 2);
    assert_eq!(value["complete"], false);
    assert_eq!(value["owners"].as_array().unwrap().len(), 12);
    assert_eq!(value["picks"][0]["name"], "Dallas");
    assert_eq!(value["picks"][0]["position"], "DST");
    assert_eq!(value["picks"][0]["buying_owner"], "Etler");
}
