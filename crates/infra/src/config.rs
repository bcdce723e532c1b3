//! Service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `CRM_BIND_ADDR` - HTTP listen address (default: 0.0.0.0:8080)
//! - `CRM_JOB_LOG_DIR` - Directory of the job log files (default: /tmp)
//! - `CRM_REMOTE_API_URL` - Base URL of a remote CRM API; when set, jobs call it
//!   over HTTP instead of the in-process services
//! - `CRM_HTTP_TIMEOUT_SECS` - Timeout of job HTTP calls (default: 10)
//! - `CRM_HEARTBEAT_INTERVAL_SECS` (default: 300)
//! - `CRM_RESTOCK_INTERVAL_SECS` (default: 86400)
//! - `CRM_REMINDERS_INTERVAL_SECS` (default: 86400)
//! - `CRM_REPORT_INTERVAL_SECS` (default: 604800)
//! - `CRM_HEARTBEAT_PROBE` - Probe the API from the heartbeat (default: true)
//! - `CRM_SEED_DEMO_DATA` - Insert demo rows at startup (default: false)

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::jobs::SchedulerConfig;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// CRM service configuration.
#[derive(Debug, Clone)]
pub struct CrmConfig {
    pub bind_addr: SocketAddr,
    pub job_log_dir: PathBuf,
    pub remote_api_url: Option<String>,
    pub http_timeout: Duration,
    pub scheduler: SchedulerConfig,
    pub seed_demo_data: bool,
}

impl Default for CrmConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            job_log_dir: PathBuf::from("/tmp"),
            remote_api_url: None,
            http_timeout: Duration::from_secs(10),
            scheduler: SchedulerConfig::default(),
            seed_demo_data: false,
        }
    }
}

impl CrmConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);
        let defaults = Self::default();
        let sched = defaults.scheduler;

        Ok(Self {
            bind_addr: env.parsed("CRM_BIND_ADDR")?.unwrap_or(defaults.bind_addr),
            job_log_dir: env
                .get("CRM_JOB_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.job_log_dir),
            remote_api_url: env.get("CRM_REMOTE_API_URL"),
            http_timeout: env.secs("CRM_HTTP_TIMEOUT_SECS")?.unwrap_or(defaults.http_timeout),
            scheduler: SchedulerConfig {
                heartbeat_interval: env
                    .secs("CRM_HEARTBEAT_INTERVAL_SECS")?
                    .unwrap_or(sched.heartbeat_interval),
                restock_interval: env
                    .secs("CRM_RESTOCK_INTERVAL_SECS")?
                    .unwrap_or(sched.restock_interval),
                reminders_interval: env
                    .secs("CRM_REMINDERS_INTERVAL_SECS")?
                    .unwrap_or(sched.reminders_interval),
                report_interval: env
                    .secs("CRM_REPORT_INTERVAL_SECS")?
                    .unwrap_or(sched.report_interval),
                heartbeat_probe: env
                    .flag("CRM_HEARTBEAT_PROBE")?
                    .unwrap_or(sched.heartbeat_probe),
            },
            seed_demo_data: env
                .flag("CRM_SEED_DEMO_DATA")?
                .unwrap_or(defaults.seed_demo_data),
        })
    }
}

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Trimmed value; blank counts as unset.
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parsed<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.get(key)
            .map(|v| {
                v.parse::<T>()
                    .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
            })
            .transpose()
    }

    fn secs(&self, key: &str) -> Result<Option<Duration>, ConfigError> {
        match self.parsed::<u64>(key)? {
            Some(0) => Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                "must be greater than zero".to_string(),
            )),
            other => Ok(other.map(Duration::from_secs)),
        }
    }

    fn flag(&self, key: &str) -> Result<Option<bool>, ConfigError> {
        self.get(key)
            .map(|v| match v.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                _ => Err(ConfigError::InvalidEnvVar(
                    key.to_string(),
                    format!("expected a boolean, got {v:?}"),
                )),
            })
            .transpose()
    }
}
