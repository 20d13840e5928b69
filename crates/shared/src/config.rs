use std::env;
use thiserror::Error;

/// 開発環境専用の署名シークレット
const DEV_JWT_SECRET: &str = "todo-graphql-dev-secret";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// ログ出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub seed_demo_data: bool,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 任意のキー参照関数から設定を組み立てる（テストで環境変数を汚さないため）
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT").unwrap_or_else(|| "dev".to_string());
        let production = environment == "production";

        let port = match lookup("PORT") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                key: "PORT",
                value,
            })?,
            None => 4000,
        };

        let jwt_secret = match lookup("JWT_SECRET") {
            Some(secret) if !secret.is_empty() => secret,
            _ if production => return Err(ConfigError::Missing("JWT_SECRET")),
            _ => DEV_JWT_SECRET.to_string(),
        };

        let seed_demo_data = match lookup("SEED_DEMO_DATA") {
            Some(value) => parse_bool("SEED_DEMO_DATA", value)?,
            None => !production,
        };

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            None | Some("json") => LogFormat::Json,
            Some("pretty") => LogFormat::Pretty,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "LOG_FORMAT",
                    value: other.to_string(),
                })
            }
        };

        Ok(Config {
            environment,
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            jwt_secret,
            seed_demo_data,
            log_format,
        })
    }
}

fn parse_bool(key: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(ConfigError::Invalid { key, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_for_dev() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.environment, "dev");
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 4000);
        assert_eq!(config.jwt_secret, DEV_JWT_SECRET);
        assert!(config.seed_demo_data);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_production_requires_secret() {
        let result = Config::from_lookup(lookup_from(&[("ENVIRONMENT", "production")]));
        assert_eq!(result.unwrap_err(), ConfigError::Missing("JWT_SECRET"));

        let config = Config::from_lookup(lookup_from(&[
            ("ENVIRONMENT", "production"),
            ("JWT_SECRET", "s3cret"),
        ]))
        .unwrap();
        assert_eq!(config.jwt_secret, "s3cret");
        assert!(!config.seed_demo_data);
    }

    #[test]
    fn test_invalid_values_are_reported() {
        assert!(matches!(
            Config::from_lookup(lookup_from(&[("PORT", "abc")])),
            Err(ConfigError::Invalid { key: "PORT", .. })
        ));
        assert!(matches!(
            Config::from_lookup(lookup_from(&[("SEED_DEMO_DATA", "maybe")])),
            Err(ConfigError::Invalid { key: "SEED_DEMO_DATA", .. })
        ));
        assert!(matches!(
            Config::from_lookup(lookup_from(&[("LOG_FORMAT", "xml")])),
            Err(ConfigError::Invalid { key: "LOG_FORMAT", .. })
        ));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("HOST", "0.0.0.0"),
            ("PORT", "8080"),
            ("SEED_DEMO_DATA", "false"),
            ("LOG_FORMAT", "pretty"),
        ]))
        .unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert!(!config.seed_demo_data);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }
}
