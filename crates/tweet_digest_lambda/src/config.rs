use std::path::Path;

use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "config.json";
pub const DEFAULT_PREFIX: &str = "tweets";

/// Resolved, immutable job configuration. Loaded once at startup and handed
/// to the coordinator and adapters as plain values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestConfig {
    pub bucket: String,
    pub prefix: String,
    pub consumer_api_key: String,
    pub consumer_api_secret_key: String,
    pub access_token: String,
    pub access_token_secret: String,
    pub email: String,
}

/// Optional JSON config file; every field can instead come from the
/// environment, which takes precedence.
#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigFile {
    bucket: Option<String>,
    prefix: Option<String>,
    #[serde(rename = "consumer-api-key")]
    consumer_api_key: Option<String>,
    #[serde(rename = "consumer-api-secret-key")]
    consumer_api_secret_key: Option<String>,
    #[serde(rename = "access-token")]
    access_token: Option<String>,
    #[serde(rename = "access-token-secret")]
    access_token_secret: Option<String>,
    email: Option<String>,
}

pub fn load_config() -> Result<DigestConfig, String> {
    let path = std::env::var("DIGEST_CONFIG_PATH")
        .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let file = read_config_file(Path::new(&path))?;
    resolve_config(file, |name| std::env::var(name).ok())
}

fn read_config_file(path: &Path) -> Result<ConfigFile, String> {
    if !path.exists() {
        return Ok(ConfigFile::default());
    }

    let body = std::fs::read(path)
        .map_err(|error| format!("failed to read config file {}: {error}", path.display()))?;
    serde_json::from_slice(&body)
        .map_err(|error| format!("invalid config file {}: {error}", path.display()))
}

fn resolve_config(
    file: ConfigFile,
    env: impl Fn(&str) -> Option<String>,
) -> Result<DigestConfig, String> {
    Ok(DigestConfig {
        bucket: required("DIGEST_BUCKET", file.bucket, &env)?,
        prefix: env("DIGEST_PREFIX")
            .or(file.prefix)
            .unwrap_or_else(|| DEFAULT_PREFIX.to_string()),
        consumer_api_key: required("TWITTER_CONSUMER_API_KEY", file.consumer_api_key, &env)?,
        consumer_api_secret_key: required(
            "TWITTER_CONSUMER_API_SECRET_KEY",
            file.consumer_api_secret_key,
            &env,
        )?,
        access_token: required("TWITTER_ACCESS_TOKEN", file.access_token, &env)?,
        access_token_secret: required(
            "TWITTER_ACCESS_TOKEN_SECRET",
            file.access_token_secret,
            &env,
        )?,
        email: required("DIGEST_EMAIL", file.email, &env)?,
    })
}

fn required(
    env_name: &str,
    file_value: Option<String>,
    env: &impl Fn(&str) -> Option<String>,
) -> Result<String, String> {
    env(env_name)
        .or(file_value)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| format!("{env_name} must be configured"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_file() -> ConfigFile {
        serde_json::from_str(
            r#"{
                "bucket": "digest-archive",
                "consumer-api-key": "ck",
                "consumer-api-secret-key": "cs",
                "access-token": "at",
                "access-token-secret": "as",
                "email": "digest@example.com"
            }"#,
        )
        .expect("sample config should parse")
    }

    #[test]
    fn resolves_from_file_with_default_prefix() {
        let config = resolve_config(full_file(), |_| None).expect("config should resolve");

        assert_eq!(config.bucket, "digest-archive");
        assert_eq!(config.prefix, DEFAULT_PREFIX);
        assert_eq!(config.consumer_api_key, "ck");
        assert_eq!(config.email, "digest@example.com");
    }

    #[test]
    fn environment_overrides_file_values() {
        let config = resolve_config(full_file(), |name| match name {
            "DIGEST_BUCKET" => Some("env-bucket".to_string()),
            "DIGEST_PREFIX" => Some("archive/tweets".to_string()),
            _ => None,
        })
        .expect("config should resolve");

        assert_eq!(config.bucket, "env-bucket");
        assert_eq!(config.prefix, "archive/tweets");
        assert_eq!(config.access_token, "at");
    }

    #[test]
    fn missing_required_value_names_the_variable() {
        let mut file = full_file();
        file.email = None;

        let error = resolve_config(file, |_| None).expect_err("config should fail");
        assert_eq!(error, "DIGEST_EMAIL must be configured");
    }

    #[test]
    fn blank_values_do_not_satisfy_required_fields() {
        let mut file = full_file();
        file.bucket = Some("   ".to_string());

        let error = resolve_config(file, |_| None).expect_err("config should fail");
        assert_eq!(error, "DIGEST_BUCKET must be configured");
    }

    #[test]
    fn missing_file_yields_empty_defaults() {
        let file = read_config_file(Path::new("/nonexistent/config.json"))
            .expect("missing file should not error");
        assert!(file.bucket.is_none());
    }
}
