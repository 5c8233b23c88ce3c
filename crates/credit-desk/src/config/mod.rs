use std::env;
use std::fmt;
use std::fs;
use std::path::PathBuf;

use crate::lending::{CreditPolicy, PolicyError};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub credit: CreditConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let policy_path = env::var("CREDIT_POLICY_PATH")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            credit: CreditConfig { policy_path },
        })
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where the credit rule table comes from.
#[derive(Debug, Clone, Default)]
pub struct CreditConfig {
    pub policy_path: Option<PathBuf>,
}

impl CreditConfig {
    /// Read and validate the configured policy, or the built-in rule table when unset.
    pub fn load_policy(&self) -> Result<CreditPolicy, ConfigError> {
        let policy = match &self.policy_path {
            Some(path) => {
                let raw = fs::read_to_string(path).map_err(|source| ConfigError::PolicyRead {
                    path: path.clone(),
                    source,
                })?;
                serde_json::from_str(&raw).map_err(|source| ConfigError::PolicyParse {
                    path: path.clone(),
                    source,
                })?
            }
            None => CreditPolicy::default(),
        };

        policy.validate()?;
        Ok(policy)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    PolicyRead {
        path: PathBuf,
        source: std::io::Error,
    },
    PolicyParse {
        path: PathBuf,
        source: serde_json::Error,
    },
    InvalidPolicy(PolicyError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::PolicyRead { path, .. } => {
                write!(f, "unable to read credit policy from {}", path.display())
            }
            ConfigError::PolicyParse { path, .. } => {
                write!(f, "credit policy at {} is not valid JSON", path.display())
            }
            ConfigError::InvalidPolicy(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::PolicyRead { source, .. } => Some(source),
            ConfigError::PolicyParse { source, .. } => Some(source),
            ConfigError::InvalidPolicy(err) => Some(err),
        }
    }
}

impl From<PolicyError> for ConfigError {
    fn from(value: PolicyError) -> Self {
        Self::InvalidPolicy(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("CREDIT_POLICY_PATH");
    }

    fn scratch_file(name: &str, contents: &str) -> PathBuf {
        let path = env::temp_dir().join(format!("credit-desk-{}-{name}", std::process::id()));
        fs::write(&path, contents).expect("write scratch policy");
        path
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.telemetry.log_level, "info");
        assert!(config.credit.policy_path.is_none());
        assert_eq!(
            config.credit.load_policy().expect("default policy"),
            CreditPolicy::default()
        );
    }

    #[test]
    fn reads_environment_and_policy_path() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "CI");
        env::set_var("CREDIT_POLICY_PATH", "  /etc/credit/policy.json ");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.environment, AppEnvironment::Test);
        assert_eq!(
            config.credit.policy_path,
            Some(PathBuf::from("/etc/credit/policy.json"))
        );
        reset_env();
    }

    #[test]
    fn load_policy_merges_file_with_defaults() {
        let path = scratch_file("partial.json", r#"{ "affordability_ratio": 0.4 }"#);
        let credit = CreditConfig {
            policy_path: Some(path.clone()),
        };
        let policy = credit.load_policy().expect("policy loads");
        assert_eq!(policy.affordability_ratio, 0.4);
        assert_eq!(policy.prime_score_threshold, 50);
        fs::remove_file(path).ok();
    }

    #[test]
    fn load_policy_rejects_inconsistent_tiers() {
        let path = scratch_file("invalid.json", r#"{ "affordability_ratio": 2.0 }"#);
        let credit = CreditConfig {
            policy_path: Some(path.clone()),
        };
        match credit.load_policy() {
            Err(ConfigError::InvalidPolicy(err)) => assert_eq!(err.problems.len(), 1),
            other => panic!("expected invalid policy, got {other:?}"),
        }
        fs::remove_file(path).ok();
    }

    #[test]
    fn load_policy_reports_missing_file() {
        let credit = CreditConfig {
            policy_path: Some(PathBuf::from("/nonexistent/credit-policy.json")),
        };
        assert!(matches!(
            credit.load_policy(),
            Err(ConfigError::PolicyRead { .. })
        ));
    }
}
