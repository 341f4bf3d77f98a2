//! Configuration system for tinker.

use serde::Deserialize;

use crate::error::TinkerError;

/// Top-level tinker configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TinkerConfig {
    pub connection: ConnectionConfig,
    pub strategies: StrategiesConfig,
}

impl TinkerConfig {
    /// Load configuration from a TOML file, with environment variable overrides.
    ///
    /// Environment variables use the `TINKER_` prefix and `_` separators.
    /// E.g. `TINKER_CONNECTION_URL=ws://db:8182/gremlin`.
    pub fn load(path: Option<&str>) -> Result<Self, TinkerError> {
        let mut config = if let Some(path) = path {
            let contents = std::fs::read_to_string(path).map_err(|e| {
                TinkerError::InvalidConfig(format!("failed to read config file '{path}': {e}"))
            })?;
            Self::from_toml_str(&contents)?
        } else {
            TinkerConfig::default()
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document without consulting the environment.
    pub fn from_toml_str(contents: &str) -> Result<Self, TinkerError> {
        toml::from_str::<TinkerConfig>(contents)
            .map_err(|e| TinkerError::InvalidConfig(format!("failed to parse config: {e}")))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("TINKER_CONNECTION_URL") {
            self.connection.url = v;
        }
        if let Ok(v) = std::env::var("TINKER_CONNECTION_TRAVERSAL_SOURCE") {
            self.connection.traversal_source = v;
        }
        if let Ok(v) = std::env::var("TINKER_CONNECTION_REQUEST_TIMEOUT_MS") {
            if let Ok(ms) = v.parse() {
                self.connection.request_timeout_ms = ms;
            }
        }
    }

    pub fn validate(&self) -> Result<(), TinkerError> {
        if self.connection.url.trim().is_empty() {
            return Err(TinkerError::InvalidConfig(
                "connection.url must not be empty".into(),
            ));
        }
        if self.connection.traversal_source.trim().is_empty() {
            return Err(TinkerError::InvalidConfig(
                "connection.traversal_source must not be empty".into(),
            ));
        }
        if self.connection.request_timeout_ms == 0 {
            return Err(TinkerError::InvalidConfig(
                "connection.request_timeout_ms must be > 0".into(),
            ));
        }
        for (i, entry) in self.strategies.defaults.iter().enumerate() {
            if entry.name.trim().is_empty() {
                return Err(TinkerError::InvalidConfig(format!(
                    "strategies.defaults[{i}].name must not be empty"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub url: String,
    /// Alias of the traversal source on the remote engine.
    pub traversal_source: String,
    pub request_timeout_ms: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            url: "ws://localhost:8182/gremlin".into(),
            traversal_source: "g".into(),
            request_timeout_ms: 30_000,
        }
    }
}

/// Strategies registered on every traversal source built from this config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StrategiesConfig {
    /// Registration order is preserved.
    pub defaults: Vec<StrategyEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StrategyEntry {
    /// Short name (`ReadOnlyStrategy`) or fully qualified identifier.
    pub name: String,
    #[serde(default)]
    pub options: toml::Table,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TinkerConfig::default();
        assert_eq!(config.connection.url, "ws://localhost:8182/gremlin");
        assert_eq!(config.connection.traversal_source, "g");
        assert_eq!(config.connection.request_timeout_ms, 30_000);
        assert!(config.strategies.defaults.is_empty());
    }

    #[test]
    fn test_config_validate_success() {
        assert!(TinkerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation_empty_source() {
        let mut config = TinkerConfig::default();
        config.connection.traversal_source = " ".into();
        match config.validate().unwrap_err() {
            TinkerError::InvalidConfig(msg) => assert!(msg.contains("traversal_source")),
            other => panic!("expected InvalidConfig, got: {other}"),
        }
    }

    #[test]
    fn test_config_validation_zero_timeout() {
        let mut config = TinkerConfig::default();
        config.connection.request_timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_deserialization() {
        let toml_str = r#"
[connection]
url = "ws://db:8182/gremlin"
traversal_source = "gmodern"

[strategies]
defaults = [
  { name = "ReadOnlyStrategy" },
  { name = "SeedStrategy", options = { seed = 7 } },
]
"#;
        let config = TinkerConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.connection.url, "ws://db:8182/gremlin");
        assert_eq!(config.connection.traversal_source, "gmodern");
        assert_eq!(config.connection.request_timeout_ms, 30_000);

        let names: Vec<&str> = config
            .strategies
            .defaults
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["ReadOnlyStrategy", "SeedStrategy"]);
        assert!(config.strategies.defaults[0].options.is_empty());
        assert_eq!(
            config.strategies.defaults[1].options.get("seed"),
            Some(&toml::Value::Integer(7))
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_rejects_empty_strategy_name() {
        let config = TinkerConfig::from_toml_str(
            r#"
[strategies]
defaults = [{ name = "" }]
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_parse_error() {
        let err = TinkerConfig::from_toml_str("[connection\nurl = 1").unwrap_err();
        assert!(matches!(err, TinkerError::InvalidConfig(_)));
    }

    #[test]
    fn test_config_load_missing_file() {
        let err = TinkerConfig::load(Some("/nonexistent/tinker.toml")).unwrap_err();
        match err {
            TinkerError::InvalidConfig(msg) => assert!(msg.contains("failed to read")),
            other => panic!("expected InvalidConfig, got: {other}"),
        }
    }

    // Both cases share one test: they read the same process-wide variables.
    #[test]
    fn test_config_load_none_and_env_overrides() {
        for var in [
            "TINKER_CONNECTION_URL",
            "TINKER_CONNECTION_TRAVERSAL_SOURCE",
            "TINKER_CONNECTION_REQUEST_TIMEOUT_MS",
        ] {
            std::env::remove_var(var);
        }
        let config = TinkerConfig::load(None).unwrap();
        assert_eq!(config.connection.url, "ws://localhost:8182/gremlin");
        assert_eq!(config.connection.traversal_source, "g");
        assert_eq!(config.connection.request_timeout_ms, 30_000);

        std::env::set_var("TINKER_CONNECTION_URL", "ws://db:8182/gremlin");
        std::env::set_var("TINKER_CONNECTION_TRAVERSAL_SOURCE", "gmodern");
        std::env::set_var("TINKER_CONNECTION_REQUEST_TIMEOUT_MS", "soon");
        let config = TinkerConfig::load(None).unwrap();
        assert_eq!(config.connection.url, "ws://db:8182/gremlin");
        assert_eq!(config.connection.traversal_source, "gmodern");
        // Unparseable timeout is ignored.
        assert_eq!(config.connection.request_timeout_ms, 30_000);

        std::env::set_var("TINKER_CONNECTION_REQUEST_TIMEOUT_MS", "1500");
        let config = TinkerConfig::load(None).unwrap();
        assert_eq!(config.connection.request_timeout_ms, 1500);

        for var in [
            "TINKER_CONNECTION_URL",
            "TINKER_CONNECTION_TRAVERSAL_SOURCE",
            "TINKER_CONNECTION_REQUEST_TIMEOUT_MS",
        ] {
            std::env::remove_var(var);
        }
    }
}
