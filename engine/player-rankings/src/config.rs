//! Configuration for loading feeds and rendering the board

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{RankingsError, Result};

/// Default number of teams in the draft (one round = this many picks)
pub const DEFAULT_TEAMS: usize = 12;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingsConfig {
    /// Feed document locations
    pub feeds: FeedConfig,

    /// Board rendering
    pub board: BoardConfig,

    /// Logging
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Baseline ranking snapshot
    pub baseline: PathBuf,

    /// Current ranking snapshot
    pub current: PathBuf,

    /// Annotation-only update feeds, applied in order
    pub updates: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Teams in the league; sets the round size
    pub teams: usize,

    /// How many risers/fallers the movers report shows
    pub movers_limit: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive, e.g. "info" or "player_rankings=debug"
    pub level: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            baseline: PathBuf::from("data/players_8_4_2025_enriched_full_updated.json"),
            current: PathBuf::from("data/players_8_29_2025_enriched_full_updated.json"),
            updates: vec![
                PathBuf::from("data/players_8_4_2025_enriched_full_ready.json"),
                PathBuf::from("data/players_8_21_2025_enriched_corrected.json"),
            ],
        }
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self { teams: DEFAULT_TEAMS, movers_limit: 10 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string() }
    }
}

impl RankingsConfig {
    /// Load configuration from a TOML file. Missing sections use defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: RankingsConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Defaults with environment overrides applied
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply `RANKINGS_*` environment variables on top of this config
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup. Unparsable numbers keep the
    /// current value.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("RANKINGS_BASELINE") {
            self.feeds.baseline = PathBuf::from(path);
        }

        if let Some(path) = lookup("RANKINGS_CURRENT") {
            self.feeds.current = PathBuf::from(path);
        }

        if let Some(paths) = lookup("RANKINGS_UPDATES") {
            self.feeds.updates =
                paths.split(',').map(str::trim).filter(|p| !p.is_empty()).map(PathBuf::from).collect();
        }

        if let Some(teams) = lookup("RANKINGS_TEAMS") {
            self.board.teams = teams.parse().unwrap_or(self.board.teams);
        }

        if let Some(limit) = lookup("RANKINGS_MOVERS_LIMIT") {
            self.board.movers_limit = limit.parse().unwrap_or(self.board.movers_limit);
        }

        if let Some(level) = lookup("RANKINGS_LOG_LEVEL") {
            self.logging.level = level;
        }

        self
    }

    /// Reject settings that cannot produce a board
    pub fn validate(&self) -> Result<()> {
        if self.board.teams == 0 {
            return Err(RankingsError::Config("board.teams must be at least 1".to_string()));
        }
        if self.feeds.baseline.as_os_str().is_empty() {
            return Err(RankingsError::Config("feeds.baseline is empty".to_string()));
        }
        if self.feeds.current.as_os_str().is_empty() {
            return Err(RankingsError::Config("feeds.current is empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = RankingsConfig::default();
        assert_eq!(config.board.teams, DEFAULT_TEAMS);
        assert_eq!(config.feeds.updates.len(), 2);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: RankingsConfig = toml::from_str(
            r#"
            [board]
            teams = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.board.teams, 10);
        assert_eq!(config.board.movers_limit, 10);
        assert_eq!(config.feeds, FeedConfig::default());
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rankings.toml");

        let mut config = RankingsConfig::default();
        config.feeds.updates = vec![PathBuf::from("data/extra.json")];
        config.board.teams = 14;
        config.to_file(&path).unwrap();

        let loaded = RankingsConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file() {
        let err = RankingsConfig::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, RankingsError::Io(_)));
    }

    #[test]
    fn test_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[board\nteams = ").unwrap();

        assert!(matches!(RankingsConfig::from_file(&path), Err(RankingsError::ConfigParse(_))));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("RANKINGS_CURRENT", "feeds/now.json"),
            ("RANKINGS_UPDATES", "a.json, b.json,,"),
            ("RANKINGS_TEAMS", "8"),
            ("RANKINGS_MOVERS_LIMIT", "lots"),
            ("RANKINGS_LOG_LEVEL", "debug"),
        ]);

        let config = RankingsConfig::default().with_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.feeds.current, PathBuf::from("feeds/now.json"));
        assert_eq!(config.feeds.baseline, FeedConfig::default().baseline);
        assert_eq!(config.feeds.updates, vec![PathBuf::from("a.json"), PathBuf::from("b.json")]);
        assert_eq!(config.board.teams, 8);
        assert_eq!(config.board.movers_limit, 10);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_from_env_starts_from_defaults() {
        std::env::set_var("RANKINGS_LOG_LEVEL", "player_rankings=trace");

        let config = RankingsConfig::from_env();

        std::env::remove_var("RANKINGS_LOG_LEVEL");
        assert_eq!(config.logging.level, "player_rankings=trace");
        assert_eq!(config.board, BoardConfig::default());
    }

    #[test]
    fn test_validate_rejects_zero_teams() {
        let mut config = RankingsConfig::default();
        config.board.teams = 0;
        assert!(matches!(config.validate(), Err(RankingsError::Config(_))));
    }
}
