use std::path::Path;

use crate::error::ConfigError;
use crate::game::{GameConfig, MAX_TILE_VALUE};
use crate::highscore::HighScoreConfig;
use crate::logging::LoggingConfig;
use crate::ui::AnimationConfig;

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub game: GameConfig,
    pub animation: AnimationConfig,
    pub highscore: HighScoreConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, or `None` if the file does not
    /// exist. Callers report the fallback once logging is up.
    pub fn load_if_exists(path: &Path) -> Result<Option<Self>, ConfigError> {
        if path.exists() {
            Self::load(path).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.game.board_size < 2 {
            return Err(ConfigError::Validation(
                "game.board_size must be >= 2".into(),
            ));
        }
        if self.game.spawn_max_value == 0 || self.game.spawn_max_value >= MAX_TILE_VALUE {
            return Err(ConfigError::Validation(format!(
                "game.spawn_max_value must be in [1, {}]",
                MAX_TILE_VALUE - 1
            )));
        }

        let timings = [
            ("animation.frame_ms", self.animation.frame_ms),
            ("animation.move_step_ms", self.animation.move_step_ms),
            ("animation.fall_ms", self.animation.fall_ms),
            ("animation.bounce_period_ms", self.animation.bounce_period_ms),
            ("animation.spark_ms", self.animation.spark_ms),
        ];
        for (name, value) in timings {
            if value == 0 {
                return Err(ConfigError::Validation(format!("{name} must be > 0")));
            }
        }

        if self.logging.filter.trim().is_empty() {
            return Err(ConfigError::Validation(
                "logging.filter must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(&AppConfig::default())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::InputPolicy;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        config.validate().expect("default config should be valid");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml_str = r#"
[game]
board_size = 5
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.game.board_size, 5);
        // Other fields should be defaults
        assert_eq!(config.game.spawn_max_value, 2);
        assert_eq!(config.animation.move_step_ms, 45);
        assert_eq!(config.highscore.path, None);
    }

    #[test]
    fn test_empty_toml_uses_all_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        let default = AppConfig::default();
        assert_eq!(config.game.board_size, default.game.board_size);
        assert_eq!(config.game.input_policy, InputPolicy::Drop);
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_input_policy_from_toml() {
        let config: AppConfig = toml::from_str("[game]\ninput_policy = \"queue-latest\"\n").unwrap();
        assert_eq!(config.game.input_policy, InputPolicy::QueueLatest);
        assert!(toml::from_str::<AppConfig>("[game]\ninput_policy = \"later\"\n").is_err());
    }

    #[test]
    fn test_validation_rejects_tiny_board() {
        let mut config = AppConfig::default();
        config.game.board_size = 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_spawn_value_out_of_range() {
        let mut config = AppConfig::default();
        config.game.spawn_max_value = 0;
        assert!(config.validate().is_err());
        config.game.spawn_max_value = MAX_TILE_VALUE;
        assert!(config.validate().is_err());
        config.game.spawn_max_value = MAX_TILE_VALUE - 1;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_zero_timings() {
        let mut config = AppConfig::default();
        config.animation.move_step_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("animation.move_step_ms"));

        let mut config = AppConfig::default();
        config.animation.fall_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_empty_log_filter() {
        let mut config = AppConfig::default();
        config.logging.filter = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_is_reported_to_caller() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nonexistent_config.toml");
        let loaded = AppConfig::load_if_exists(&path).unwrap();
        assert!(loaded.is_none());
        assert_eq!(loaded.unwrap_or_default().game.board_size, 4);
    }

    #[test]
    fn test_existing_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tile-fusion.toml");
        std::fs::write(&path, "[game]\nboard_size = 5\n").unwrap();
        let loaded = AppConfig::load_if_exists(&path).unwrap();
        assert_eq!(loaded.map(|c| c.game.board_size), Some(5));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test_config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            r#"
[highscore]
path = "/tmp/scores.json"
username = "ada"

[animation]
fall_ms = 90
"#
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(
            config.highscore.path.as_deref(),
            Some(Path::new("/tmp/scores.json"))
        );
        assert_eq!(config.highscore.username, "ada");
        assert_eq!(config.animation.fall_ms, 90);
        // Others are defaults
        assert_eq!(config.animation.frame_ms, 16);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[game]\nboard_size = 0\n").unwrap();
        assert!(matches!(
            AppConfig::load(&path),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_load_reports_toml_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[game\n").unwrap();
        assert!(matches!(
            AppConfig::load(&path),
            Err(ConfigError::TomlParse(_))
        ));
    }

    #[test]
    fn test_default_toml_roundtrips() {
        let toml_str = AppConfig::default_toml().unwrap();
        let config: AppConfig = toml::from_str(&toml_str).unwrap();
        config.validate().expect("roundtripped config should be valid");
        assert!(toml_str.contains("[animation]"));
        assert!(toml_str.contains("input_policy = \"drop\""));
    }
}
