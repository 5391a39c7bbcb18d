// Configuration loading and parsing (league.toml).

use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

use bidboard_core::{Owner, NO_OWNER};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub league: LeagueConfig,
    /// Directory that relative paths in the config are resolved against.
    pub base_dir: PathBuf,
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

/// Wrapper for the top-level `[league]` table in league.toml.
#[derive(Debug, Clone, Deserialize)]
struct LeagueFile {
    league: LeagueConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueConfig {
    pub name: String,
    /// Starting budget for every owner.
    pub salary_cap: u32,
    /// Players per roster.
    pub roster_size: usize,
    /// Player pool CSV (`Name, Position, Team, Tier, TAD`).
    pub players_file: String,
    /// Where completed picks are logged.
    #[serde(default = "default_draft_log")]
    pub draft_log: String,
    pub owners: Vec<OwnerConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwnerConfig {
    pub name: String,
    pub nomination_number: u32,
    /// Marks the user's own team.
    #[serde(default)]
    pub mine: bool,
}

fn default_draft_log() -> String {
    "draft_results.csv".to_string()
}

impl Config {
    /// Resolve a path from the config against `base_dir`.
    pub fn resolve(&self, path: &str) -> PathBuf {
        let p = Path::new(path);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.base_dir.join(p)
        }
    }

    pub fn players_path(&self) -> PathBuf {
        self.resolve(&self.league.players_file)
    }

    pub fn draft_log_path(&self) -> PathBuf {
        self.resolve(&self.league.draft_log)
    }

    /// Fresh owners with full budgets and empty rosters.
    pub fn build_owners(&self) -> Vec<Owner> {
        self.league
            .owners
            .iter()
            .map(|o| {
                Owner::new(
                    &o.name,
                    o.nomination_number,
                    o.mine,
                    self.league.salary_cap,
                    self.league.roster_size,
                )
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/league.toml` relative to
/// the given `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy defaults.
/// Prefer `load_config()` which handles default initialization automatically.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let league_path = base_dir.join("config").join("league.toml");
    let league_text = read_file(&league_path)?;
    let league_file: LeagueFile =
        toml::from_str(&league_text).map_err(|e| ConfigError::ParseError {
            path: league_path.clone(),
            source: e,
        })?;

    let config = Config {
        league: league_file.league,
        base_dir: base_dir.to_path_buf(),
    };

    validate(&config)?;

    Ok(config)
}

/// Copy `defaults/league.toml` to `config/league.toml` on first run.
///
/// Returns the path written, or `None` when a league file is already in
/// place. An existing `config/league.toml` is never overwritten.
pub fn ensure_league_file(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join("league.toml");
    if target.exists() {
        return Ok(None);
    }

    let source = base_dir.join("defaults").join("league.toml");
    if !source.exists() {
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "neither config/league.toml nor defaults/league.toml found in {}",
                base_dir.display()
            ),
        });
    }

    let copy_error = |e: std::io::Error| ConfigError::DefaultsCopyError {
        message: format!("failed to copy {} to {}: {e}", source.display(), target.display()),
    };
    if let Some(dir) = target.parent() {
        std::fs::create_dir_all(dir).map_err(copy_error)?;
    }
    std::fs::copy(&source, &target).map_err(copy_error)?;
    Ok(Some(target))
}

/// Convenience wrapper: loads config relative to the current working directory.
/// Copies the default league file first if there is none yet.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_league_file(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let league = &config.league;

    if league.roster_size == 0 {
        return Err(invalid("league.roster_size", "must be greater than 0"));
    }

    if league.salary_cap == 0 {
        return Err(invalid("league.salary_cap", "must be greater than 0"));
    }

    // Every slot needs at least a $1 bid.
    if (league.salary_cap as usize) < league.roster_size {
        return Err(invalid(
            "league.salary_cap",
            format!(
                "must be at least roster_size ({}), got {}",
                league.roster_size, league.salary_cap
            ),
        ));
    }

    if league.players_file.trim().is_empty() {
        return Err(invalid("league.players_file", "must not be empty"));
    }

    if league.draft_log.trim().is_empty() {
        return Err(invalid("league.draft_log", "must not be empty"));
    }

    if league.owners.is_empty() {
        return Err(invalid("league.owners", "at least one owner is required"));
    }

    let mut names = HashSet::new();
    let mut numbers = HashSet::new();
    for owner in &league.owners {
        if owner.name.trim().is_empty() {
            return Err(invalid("league.owners.name", "must not be empty"));
        }
        if owner.name != owner.name.trim() {
            return Err(invalid(
                "league.owners.name",
                format!("'{}' has leading or trailing spaces", owner.name),
            ));
        }
        if owner.name == NO_OWNER {
            return Err(invalid(
                "league.owners.name",
                format!("'{NO_OWNER}' is reserved for a missing nominator"),
            ));
        }
        if !names.insert(owner.name.as_str()) {
            return Err(invalid(
                "league.owners.name",
                format!("duplicate owner '{}'", owner.name),
            ));
        }
        if !numbers.insert(owner.nomination_number) {
            return Err(invalid(
                "league.owners.nomination_number",
                format!("duplicate nomination number {}", owner.nomination_number),
            ));
        }
    }

    let mine = league.owners.iter().filter(|o| o.mine).count();
    if mine > 1 {
        return Err(invalid(
            "league.owners.mine",
            format!("at most one owner can be marked mine, found {mine}"),
        ));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Helper: returns the path to the bidboard-app crate root
    /// (works whether `cargo test` runs from the crate root or repo root).
    fn project_root() -> PathBuf {
        let cwd = std::env::current_dir().unwrap();
        if cwd.join("defaults").exists() {
            cwd
        } else if cwd.join("crates/bidboard-app/defaults").exists() {
            cwd.join("crates/bidboard-app")
        } else {
            panic!("Cannot locate defaults/ directory from CWD {:?}", cwd);
        }
    }

    /// Write `league_toml` into a fresh temp dir's config/ and return the dir.
    fn temp_config(name: &str, league_toml: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(format!("bidboard_config_{name}"));
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::write(tmp.join("config/league.toml"), league_toml).unwrap();
        tmp
    }

    fn valid_toml() -> String {
        r#"
[league]
name = "Test League"
salary_cap = 200
roster_size = 16
players_file = "data/players.csv"

[[league.owners]]
name = "Seth"
nomination_number = 1

[[league.owners]]
name = "Will"
nomination_number = 2
mine = true
"#
        .to_string()
    }

    fn expect_validation_error(name: &str, toml: &str, expected_field: &str) {
        let dir = temp_config(name, toml);
        match load_config_from(&dir) {
            Err(ConfigError::ValidationError { field, .. }) => assert_eq!(field, expected_field),
            other => panic!("expected ValidationError for {expected_field}, got {other:?}"),
        }
    }

    #[test]
    fn load_default_config_from_project_files() {
        let root = project_root();
        let tmp = std::env::temp_dir().join("bidboard_config_defaults");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::copy(
            root.join("defaults/league.toml"),
            tmp.join("defaults/league.toml"),
        )
        .unwrap();

        let copied = ensure_league_file(&tmp).expect("should copy default league file");
        assert_eq!(copied, Some(tmp.join("config/league.toml")));
        let config = load_config_from(&tmp).expect("should load default config");

        assert_eq!(config.league.salary_cap, 200);
        assert_eq!(config.league.roster_size, 16);
        assert_eq!(config.league.owners.len(), 12);
        assert_eq!(config.league.draft_log, "draft_results.csv");
        let mine: Vec<&str> = config
            .league
            .owners
            .iter()
            .filter(|o| o.mine)
            .map(|o| o.name.as_str())
            .collect();
        assert_eq!(mine, vec!["Will"]);
    }

    #[test]
    fn valid_config_loads_and_builds_owners() {
        let dir = temp_config("valid", &valid_toml());
        let config = load_config_from(&dir).unwrap();
        assert_eq!(config.league.name, "Test League");
        assert_eq!(config.draft_log_path(), dir.join("draft_results.csv"));
        assert_eq!(config.players_path(), dir.join("data/players.csv"));

        let owners = config.build_owners();
        assert_eq!(owners.len(), 2);
        assert_eq!(owners[1].name(), "Will");
        assert!(owners[1].is_mine());
        assert_eq!(owners[0].budget(), 200);
        assert_eq!(owners[0].max_bid(), 185);
    }

    #[test]
    fn rejects_zero_roster_size() {
        let toml = valid_toml().replace("roster_size = 16", "roster_size = 0");
        expect_validation_error("zero_roster", &toml, "league.roster_size");
    }

    #[test]
    fn rejects_salary_cap_below_roster_size() {
        let toml = valid_toml().replace("salary_cap = 200", "salary_cap = 10");
        expect_validation_error("small_cap", &toml, "league.salary_cap");
    }

    #[test]
    fn rejects_duplicate_owner_names() {
        let toml = valid_toml().replace("name = \"Will\"", "name = \"Seth\"");
        expect_validation_error("dupe_names", &toml, "league.owners.name");
    }

    #[test]
    fn rejects_padded_owner_names() {
        let toml = valid_toml().replace("name = \"Will\"", "name = \"Will \"");
        expect_validation_error("padded_name", &toml, "league.owners.name");
    }

    #[test]
    fn rejects_reserved_owner_name() {
        let toml = valid_toml().replace("name = \"Will\"", "name = \"None\"");
        expect_validation_error("reserved_name", &toml, "league.owners.name");
    }

    #[test]
    fn rejects_duplicate_nomination_numbers() {
        let toml = valid_toml().replace("nomination_number = 2", "nomination_number = 1");
        expect_validation_error("dupe_numbers", &toml, "league.owners.nomination_number");
    }

    #[test]
    fn rejects_two_mine_flags() {
        let toml = valid_toml().replace(
            "nomination_number = 1\n",
            "nomination_number = 1\nmine = true\n",
        );
        expect_validation_error("two_mine", &toml, "league.owners.mine");
    }

    #[test]
    fn rejects_empty_owner_list() {
        let toml = r#"
[league]
name = "Empty"
salary_cap = 200
roster_size = 16
players_file = "players.csv"
owners = []
"#;
        expect_validation_error("no_owners", toml, "league.owners");
    }

    #[test]
    fn file_not_found_for_missing_league_toml() {
        let tmp = std::env::temp_dir().join("bidboard_config_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        match load_config_from(&tmp) {
            Err(ConfigError::FileNotFound { path }) => {
                assert!(path.ends_with("config/league.toml"))
            }
            other => panic!("expected FileNotFound, got {other:?}"),
        }
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let dir = temp_config("invalid", "[league\nname = ");
        assert!(matches!(
            load_config_from(&dir),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn ensure_league_file_keeps_existing() {
        let tmp = temp_config("skip_existing", &valid_toml());
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::write(tmp.join("defaults/league.toml"), "overwritten = true").unwrap();

        assert_eq!(ensure_league_file(&tmp).unwrap(), None);
        let kept = fs::read_to_string(tmp.join("config/league.toml")).unwrap();
        assert!(kept.contains("Test League"));
    }

    #[test]
    fn ensure_league_file_errors_without_defaults() {
        let tmp = std::env::temp_dir().join("bidboard_config_no_dirs");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();
        assert!(matches!(
            ensure_league_file(&tmp),
            Err(ConfigError::DefaultsCopyError { .. })
        ));
    }
}
