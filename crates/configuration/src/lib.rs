use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{
    AnalysisConfig, CacheConfig, Config, DashboardConfig, FeedConfig, LogFormat, LoggingConfig,
    ServerConfig,
};

/// The file looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Prefix for environment overrides, e.g. `SENTIMENT__ANALYSIS__WINDOW_SIZE=30`.
pub const ENV_PREFIX: &str = "SENTIMENT";

/// Loads and validates the application configuration.
///
/// Sources, lowest precedence first: built-in defaults, the TOML file, then
/// `SENTIMENT__*` environment variables. An explicit `path` must exist; the
/// default `config.toml` is optional.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let builder = config::Config::builder()
        .add_source(file)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.analysis.window_size, 20);
        assert_eq!(config.cache.ttl, Duration::from_secs(3600));
        assert_eq!(config.feed.timeout, Duration::from_secs(5));
        assert_eq!(config.feed.strength_indicator, "stock_price_strength");
        assert_eq!(config.server.socket_addr().unwrap().port(), 8501);
    }

    #[test]
    fn file_overrides_only_what_it_sets() {
        let file = write_config(
            r#"
            [feed]
            timeout = "2s 500ms"

            [cache]
            ttl = "10m"

            [analysis]
            window_size = 30

            [logging]
            format = "compact"
            "#,
        );

        let config = load_config(Some(file.path())).unwrap();

        assert_eq!(config.feed.timeout, Duration::from_millis(2500));
        assert_eq!(config.cache.ttl, Duration::from_secs(600));
        assert_eq!(config.analysis.window_size, 30);
        assert_eq!(config.logging.format, LogFormat::Compact);
        assert_eq!(config.feed.url, FeedConfig::default().url);
        assert_eq!(config.server.port, 8501);
    }

    #[test]
    fn zero_window_fails_validation() {
        let file = write_config("[analysis]\nwindow_size = 0\n");
        let err = load_config(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn zero_timeout_fails_validation() {
        let mut config = Config::default();
        config.feed.timeout = Duration::ZERO;
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn bad_host_fails_validation() {
        let mut config = Config::default();
        config.server.host = "localhost:80".into();
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::LoadError(_)));
    }
}
