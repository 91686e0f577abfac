use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{
    Config, DataSettings, GeneratorSettings, LeaderboardSettings, LoggingSettings, OutputFormat,
    RollingSettings,
};

/// The file looked up by `load_config` in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "arena.toml";

/// Loads the application configuration from `arena.toml` if it exists.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(Path::new(DEFAULT_CONFIG_FILE))
}

/// Loads the configuration from `path`, then applies `ARENA__SECTION__KEY`
/// environment overrides.
///
/// A missing file is not an error: every setting has a default.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix("ARENA")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    validate(&config)?;

    tracing::debug!(path = %path.display(), "Configuration loaded.");
    Ok(config)
}

/// Rejects settings the engine cannot work with.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.generator.days < 2 {
        return Err(ConfigError::ValidationError(format!(
            "generator.days must be at least 2, got {}",
            config.generator.days
        )));
    }
    let vol = config.generator.default_vol;
    if vol.is_nan() || vol < 0.0 {
        return Err(ConfigError::ValidationError(format!(
            "generator.default_vol must be non-negative, got {vol}"
        )));
    }
    if config.rolling.window == 0 {
        return Err(ConfigError::ValidationError(
            "rolling.window must be at least 1".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.generator.days, 1260);
        assert_eq!(config.generator.default_seed, 1000);
        assert_eq!(config.rolling.window, 252);
        assert_eq!(config.leaderboard.min_trades, 20);
        assert_eq!(config.leaderboard.default_window, "1Y");
        assert!(config.generator.anchor_date.is_none());
    }

    #[test]
    fn file_values_override_defaults() {
        let file = write_config(
            r#"
            [generator]
            days = 500
            anchor_date = "2025-06-30"

            [leaderboard]
            min_trades = 30
            "#,
        );
        let config = load_config_from(file.path()).unwrap();
        assert_eq!(config.generator.days, 500);
        assert_eq!(
            config.generator.anchor_date,
            chrono::NaiveDate::from_ymd_opt(2025, 6, 30)
        );
        assert_eq!(config.leaderboard.min_trades, 30);
        // Untouched keys in a present section keep their defaults.
        assert_eq!(config.generator.default_trend, 0.12);
        assert_eq!(config.leaderboard.top, 10);
    }

    #[test]
    fn zero_rolling_window_is_rejected() {
        let file = write_config("[rolling]\nwindow = 0\n");
        let err = load_config_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn negative_or_nan_volatility_is_rejected() {
        let mut config = Config::default();
        config.generator.default_vol = -0.1;
        assert!(matches!(validate(&config), Err(ConfigError::ValidationError(_))));
        config.generator.default_vol = f64::NAN;
        assert!(matches!(validate(&config), Err(ConfigError::ValidationError(_))));
        config.generator.default_vol = 0.0;
        assert!(validate(&config).is_ok());
    }
}
