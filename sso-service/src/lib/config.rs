use std::env;
use std::time::Duration as StdDuration;

use auth::HashingCost;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub environment: RunEnvironment,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub token: TokenConfig,
    pub password: PasswordConfig,
}

/// Deployment flavour; selects the default log verbosity.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RunEnvironment {
    Local,
    Dev,
    Prod,
}

impl RunEnvironment {
    /// Log filter used when `RUST_LOG` is not set.
    pub fn default_log_filter(&self) -> &'static str {
        match self {
            RunEnvironment::Local | RunEnvironment::Dev => "sso_service=debug,tonic=info",
            RunEnvironment::Prod => "sso_service=info",
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub grpc_port: u16,
    pub timeout_seconds: u64,
}

impl ServerConfig {
    pub fn timeout(&self) -> StdDuration {
        StdDuration::from_secs(self.timeout_seconds)
    }
}

/// Ten years; keeps `iat + ttl` well inside the timestamp range.
pub const MAX_TOKEN_TTL_SECONDS: i64 = 10 * 365 * 24 * 60 * 60;

#[derive(Debug, Deserialize, Clone)]
pub struct TokenConfig {
    pub ttl_seconds: i64,
}

impl TokenConfig {
    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.ttl_seconds)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl PasswordConfig {
    pub fn cost(&self) -> HashingCost {
        HashingCost {
            memory_kib: self.memory_kib,
            iterations: self.iterations,
            parallelism: self.parallelism,
        }
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (SSO_DATABASE__URL, SSO_TOKEN__TTL_SECONDS, etc.)
    /// 2. Environment-specific config file (config/{RUN_MODE}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(
                Environment::with_prefix("SSO")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        configuration.try_deserialize()
    }

    /// Reject values that deserialize fine but cannot run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token.ttl_seconds <= 0 {
            return Err(ConfigError::Message(
                "token.ttl_seconds must be positive".to_string(),
            ));
        }
        if self.token.ttl_seconds > MAX_TOKEN_TTL_SECONDS {
            return Err(ConfigError::Message(format!(
                "token.ttl_seconds must not exceed {}",
                MAX_TOKEN_TTL_SECONDS
            )));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Message(
                "database.max_connections must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    const SAMPLE: &str = r#"
        environment = "prod"

        [database]
        url = "postgresql://localhost/sso"
        max_connections = 3

        [server]
        grpc_port = 44044
        timeout_seconds = 5

        [token]
        ttl_seconds = 900

        [password]
        memory_kib = 19456
        iterations = 2
        parallelism = 1
    "#;

    fn parse(source: &str) -> Config {
        ConfigBuilder::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_deserialize_sample() {
        let config = parse(SAMPLE);

        assert_eq!(config.environment, RunEnvironment::Prod);
        assert_eq!(config.server.grpc_port, 44044);
        assert_eq!(config.server.timeout(), StdDuration::from_secs(5));
        assert_eq!(config.token.ttl(), chrono::Duration::minutes(15));
        assert_eq!(config.password.cost().memory_kib, 19456);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_positive_ttl() {
        let config = parse(&SAMPLE.replace("ttl_seconds = 900", "ttl_seconds = 0"));

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_oversized_ttl() {
        for ttl in [MAX_TOKEN_TTL_SECONDS + 1, i64::MAX] {
            let config = parse(&SAMPLE.replace(
                "ttl_seconds = 900",
                &format!("ttl_seconds = {}", ttl),
            ));

            assert!(config.validate().is_err());
        }

        let config = parse(&SAMPLE.replace(
            "ttl_seconds = 900",
            &format!("ttl_seconds = {}", MAX_TOKEN_TTL_SECONDS),
        ));
        assert!(config.validate().is_ok());
        assert_eq!(config.token.ttl().num_seconds(), MAX_TOKEN_TTL_SECONDS);
    }

    #[test]
    fn test_default_log_filter() {
        assert_eq!(
            RunEnvironment::Prod.default_log_filter(),
            "sso_service=info"
        );
        assert!(RunEnvironment::Local
            .default_log_filter()
            .starts_with("sso_service=debug"));
    }
}
