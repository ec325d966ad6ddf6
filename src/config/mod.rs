//! Configuration system with YAML schema and validation.
//!
//! Layered checks:
//! - serde rejects unknown keys and fills defaults
//! - `validator` enforces per-field ranges
//! - [`GameConfig::validate_semantic`] covers cross-field rules
//!
//! ```yaml
//! engine:
//!   seed: 42
//! store:
//!   path: db.json
//! server:
//!   port: 5000
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

use crate::error::{TourError, TourResult};

/// Top-level configuration for the game service and CLI.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct GameConfig {
    /// Schema version for forward compatibility.
    #[validate(length(min = 1))]
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Route engine settings.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Interactive game rules.
    #[validate(nested)]
    #[serde(default)]
    pub game: GameRules,

    /// Persistence settings.
    #[serde(default)]
    pub store: StoreConfig,

    /// HTTP server settings.
    #[validate(nested)]
    #[serde(default)]
    pub server: ServerConfig,

    /// Scoreboard paging.
    #[validate(nested)]
    #[serde(default)]
    pub scoreboard: ScoreboardConfig,

    /// Log filtering.
    #[validate(nested)]
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_schema_version() -> String {
    "1.0".to_string()
}

impl GameConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - YAML parsing fails
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> TourResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML string.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails.
    pub fn from_yaml(yaml: &str) -> TourResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        config.validate_semantic()?;
        Ok(config)
    }

    /// Create a builder for configuration.
    #[must_use]
    pub fn builder() -> GameConfigBuilder {
        GameConfigBuilder::default()
    }

    /// Validate constraints the field attributes cannot express.
    fn validate_semantic(&self) -> TourResult<()> {
        let radius = self.game.snap_radius;
        if !radius.is_finite() {
            return Err(TourError::config(format!(
                "snap_radius must be finite, got {radius}"
            )));
        }

        if self.server.host.trim().is_empty() {
            return Err(TourError::config("server host must not be blank"));
        }

        if self.store.path.as_os_str().is_empty() {
            return Err(TourError::config("store path must not be empty"));
        }

        Ok(())
    }

    /// `host:port` the web server binds to.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            engine: EngineConfig::default(),
            game: GameRules::default(),
            store: StoreConfig::default(),
            server: ServerConfig::default(),
            scoreboard: ScoreboardConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Configuration builder for programmatic construction.
#[derive(Debug, Default)]
pub struct GameConfigBuilder {
    seed: Option<u64>,
    store_path: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
    min_cities: Option<usize>,
    log_filter: Option<String>,
}

impl GameConfigBuilder {
    /// Fix the seed of the random strategy.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the database file.
    #[must_use]
    pub fn store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_path = Some(path.into());
        self
    }

    /// Set the bind host.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set the bind port.
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the minimum city count for saving a game.
    #[must_use]
    pub const fn min_cities(mut self, min: usize) -> Self {
        self.min_cities = Some(min);
        self
    }

    /// Set the default log filter directive.
    #[must_use]
    pub fn log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = Some(filter.into());
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> GameConfig {
        let mut config = GameConfig::default();

        if let Some(seed) = self.seed {
            config.engine.seed = Some(seed);
        }
        if let Some(path) = self.store_path {
            config.store.path = path;
        }
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(min) = self.min_cities {
            config.game.min_cities = min;
        }
        if let Some(filter) = self.log_filter {
            config.logging.filter = filter;
        }

        config
    }
}

/// Route engine settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Seed for the `random` strategy; entropy-seeded when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Interactive game rules.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct GameRules {
    /// Cities required before a game can be saved.
    #[validate(range(min = 1))]
    #[serde(default = "default_min_cities")]
    pub min_cities: usize,
    /// Click-to-city snapping radius (strict).
    #[validate(range(min = 0.0))]
    #[serde(default = "default_snap_radius")]
    pub snap_radius: f64,
    /// Player name used when none is given.
    #[validate(length(min = 1))]
    #[serde(default = "default_player")]
    pub default_player: String,
    /// Game name used when none is given.
    #[validate(length(min = 1))]
    #[serde(default = "default_game_name")]
    pub default_name: String,
}

const fn default_min_cities() -> usize {
    3
}

const fn default_snap_radius() -> f64 {
    28.0
}

fn default_player() -> String {
    "Anon".to_string()
}

fn default_game_name() -> String {
    "Untitled".to_string()
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            min_cities: default_min_cities(),
            snap_radius: default_snap_radius(),
            default_player: default_player(),
            default_name: default_game_name(),
        }
    }
}

/// Persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// JSON database file.
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("db.json")
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Bind host.
    #[validate(length(min = 1))]
    #[serde(default = "default_host")]
    pub host: String,
    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory served for non-API paths (the browser front end).
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: None,
        }
    }
}

/// Scoreboard paging.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ScoreboardConfig {
    /// Default number of high-score entries.
    #[validate(range(min = 1))]
    #[serde(default = "default_score_limit")]
    pub limit: usize,
    /// Default page size when listing games.
    #[validate(range(min = 1))]
    #[serde(default = "default_games_limit")]
    pub games_limit: usize,
}

const fn default_score_limit() -> usize {
    20
}

const fn default_games_limit() -> usize {
    50
}

impl Default for ScoreboardConfig {
    fn default() -> Self {
        Self {
            limit: default_score_limit(),
            games_limit: default_games_limit(),
        }
    }
}

/// Log filtering.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` takes precedence.
    #[validate(length(min = 1))]
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = GameConfig::default();

        assert_eq!(config.schema_version, "1.0");
        assert_eq!(config.engine.seed, None);
        assert_eq!(config.game.min_cities, 3);
        assert!((config.game.snap_radius - 28.0).abs() < f64::EPSILON);
        assert_eq!(config.game.default_player, "Anon");
        assert_eq!(config.game.default_name, "Untitled");
        assert_eq!(config.store.path, PathBuf::from("db.json"));
        assert_eq!(config.bind_address(), "0.0.0.0:5000");
        assert_eq!(config.scoreboard.limit, 20);
        assert_eq!(config.scoreboard.games_limit, 50);
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_config_builder() {
        let config = GameConfig::builder()
            .seed(12345)
            .store_path("/tmp/scores.json")
            .host("127.0.0.1")
            .port(8080)
            .min_cities(4)
            .log_filter("debug")
            .build();

        assert_eq!(config.engine.seed, Some(12345));
        assert_eq!(config.store.path, PathBuf::from("/tmp/scores.json"));
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.game.min_cities, 4);
        assert_eq!(config.logging.filter, "debug");
    }

    #[test]
    fn test_config_empty_yaml_is_default() {
        let config = GameConfig::from_yaml("{}");
        assert!(config.is_ok());
        assert_eq!(config.ok().map(|c| c.server.port), Some(5000));
    }

    #[test]
    fn test_config_yaml_parse() {
        let yaml = r"
engine:
  seed: 7
game:
  snap_radius: 20.5
store:
  path: data/db.json
server:
  port: 9000
";
        let config = GameConfig::from_yaml(yaml);
        assert!(config.is_ok());

        let config = config.ok();
        assert_eq!(config.as_ref().and_then(|c| c.engine.seed), Some(7));
        assert_eq!(config.as_ref().map(|c| c.server.port), Some(9000));
        assert_eq!(
            config.as_ref().map(|c| c.store.path.clone()),
            Some(PathBuf::from("data/db.json"))
        );
        // Untouched fields keep defaults
        assert_eq!(config.as_ref().map(|c| c.game.min_cities), Some(3));
    }

    #[test]
    fn test_config_rejects_unknown_fields() {
        assert!(GameConfig::from_yaml("bogus: 1").is_err());
        assert!(GameConfig::from_yaml("game:\n  radius: 5").is_err());
    }

    #[test]
    fn test_config_validation_fails_zero_min_cities() {
        let config = GameConfig::from_yaml("game:\n  min_cities: 0");
        assert!(matches!(config, Err(TourError::Validation(_))));
    }

    #[test]
    fn test_config_validation_fails_negative_radius() {
        let config = GameConfig::from_yaml("game:\n  snap_radius: -1.0");
        assert!(config.is_err());
    }

    #[test]
    fn test_config_semantic_blank_host() {
        let config = GameConfig::from_yaml("server:\n  host: '   '");
        assert!(matches!(config, Err(TourError::Config { .. })));
    }

    #[test]
    fn test_config_semantic_infinite_radius() {
        let config = GameConfig::from_yaml("game:\n  snap_radius: .inf");
        assert!(matches!(config, Err(TourError::Config { .. })));
    }

    #[test]
    fn test_config_bad_yaml() {
        let config = GameConfig::from_yaml("server: [unclosed");
        assert!(matches!(config, Err(TourError::YamlParse(_))));
    }

    #[test]
    fn test_config_load_missing_file() {
        let config = GameConfig::load("/nonexistent/tourgame.yaml");
        assert!(matches!(config, Err(TourError::Io(_))));
    }

    #[test]
    fn test_config_round_trip_yaml() {
        let config = GameConfig::builder().seed(3).build();
        let yaml = serde_yaml::to_string(&config).unwrap_or_default();
        let parsed = GameConfig::from_yaml(&yaml);
        assert_eq!(parsed.ok().and_then(|c| c.engine.seed), Some(3));
    }
}
