use anyhow::{Context, Result};
use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use taskrank_core::{Strategy, DEFAULT_SUGGEST_LIMIT};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scoring: ScoringSection,
    pub server: ServerSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringSection {
    /// Used when a request or command does not name a strategy.
    pub default_strategy: Strategy,
    /// IANA timezone that decides what "today" is for urgency.
    pub timezone: String,
    pub suggest_limit: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub bind: String,
    pub port: u16,
}

impl Default for ScoringSection {
    fn default() -> Self {
        Self {
            default_strategy: Strategy::SmartBalance,
            timezone: "UTC".to_string(),
            suggest_limit: DEFAULT_SUGGEST_LIMIT,
        }
    }
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

impl Config {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parse config.toml")
    }

    pub fn timezone(&self) -> Result<Tz> {
        taskrank_core::time::parse_timezone(&self.scoring.timezone)
            .context("scoring.timezone in config.toml")
    }

    /// Today's date in the configured timezone.
    pub fn today(&self) -> Result<NaiveDate> {
        Ok(taskrank_core::time::today_in(self.timezone()?))
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.bind, self.server.port)
    }
}

/// Per-user state directory: `~/.taskrank`.
pub fn taskrank_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".taskrank"))
}

pub fn config_path() -> Result<PathBuf> {
    Ok(taskrank_home()?.join("config.toml"))
}

/// Load `~/.taskrank/config.toml`, or defaults when it does not exist.
pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(p: &Path) -> Result<Config> {
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    Config::from_toml_str(&s).with_context(|| format!("load {}", p.display()))
}

pub fn save_config(cfg: &Config, p: &Path) -> Result<()> {
    if let Some(dir) = p.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

/// Write the default config unless one already exists.
pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default(), &p)?;
    println!("Wrote {}", p.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = Config::from_toml_str("").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.scoring.suggest_limit, 3);
        assert_eq!(cfg.server_addr(), "127.0.0.1:8000");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = Config::from_toml_str(
            r#"
[scoring]
default_strategy = "high_impact"

[server]
port = 9100
"#,
        )
        .unwrap();
        assert_eq!(cfg.scoring.default_strategy, Strategy::HighImpact);
        assert_eq!(cfg.scoring.timezone, "UTC");
        assert_eq!(cfg.server.bind, "127.0.0.1");
        assert_eq!(cfg.server.port, 9100);
    }

    #[test]
    fn unknown_strategy_in_config_is_an_error() {
        let err = Config::from_toml_str("[scoring]\ndefault_strategy = \"yolo\"\n");
        assert!(err.is_err());
    }

    #[test]
    fn invalid_timezone_is_reported() {
        let mut cfg = Config::default();
        cfg.scoring.timezone = "Nowhere/Special".to_string();
        assert!(cfg.today().is_err());
        cfg.scoring.timezone = "America/Chicago".to_string();
        assert!(cfg.today().is_ok());
    }

    #[test]
    fn default_config_round_trips_through_toml() {
        let s = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(s.contains("default_strategy = \"smart_balance\""));
        assert_eq!(Config::from_toml_str(&s).unwrap(), Config::default());
    }
}
