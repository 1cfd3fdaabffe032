use std::{env, fmt::Display, fs::read_to_string, str::FromStr};

use thiserror::Error;
use tracing::{info, warn};

const SECRETS_DIR: &str = "/run/secrets";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {key} value: {reason}")]
    Invalid { key: String, reason: String },

    #[error("Secret {0} is not configured")]
    MissingSecret(String),
}

pub fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

pub fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let raw = var(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    parse(key, &raw)
}

fn parse<T: FromStr>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    raw.trim().parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");
        ConfigError::Invalid {
            key: key.to_string(),
            reason: e.to_string(),
        }
    })
}

/// Reads `/run/secrets/<name>`, then the environment variable of the same name.
pub fn read_secret(secret_name: &str) -> Result<String, ConfigError> {
    read_secret_in(SECRETS_DIR, secret_name)
}

pub fn read_optional_secret(secret_name: &str) -> Option<String> {
    read_secret(secret_name).ok()
}

fn read_secret_in(dir: &str, secret_name: &str) -> Result<String, ConfigError> {
    let path = format!("{dir}/{secret_name}");

    match read_to_string(&path) {
        Ok(secret) => Ok(secret.trim().to_string()),
        Err(e) => {
            warn!("Failed to read {secret_name} from file: {e}");

            var(secret_name).ok_or_else(|| ConfigError::MissingSecret(secret_name.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_parse_values() {
        let port: u16 = parse("RUST_PORT", " 1111 ").unwrap();
        assert_eq!(port, 1111);

        let err = parse::<u16>("RUST_PORT", "eleven").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == "RUST_PORT"));
    }

    #[test]
    fn test_default_applies_when_unset() {
        let value: String = try_load("PANTRY_TEST_SURELY_UNSET_KEY", "fallback").unwrap();
        assert_eq!(value, "fallback");
    }

    #[test]
    fn test_secret_file_is_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("API_KEY"), "s3cr3t\n").unwrap();

        let secret = read_secret_in(dir.path().to_str().unwrap(), "API_KEY").unwrap();
        assert_eq!(secret, "s3cr3t");
    }

    #[test]
    fn test_missing_secret_errors() {
        let dir = tempfile::tempdir().unwrap();

        let err = read_secret_in(dir.path().to_str().unwrap(), "PANTRY_TEST_SURELY_UNSET_SECRET")
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingSecret(_)));
    }
}
