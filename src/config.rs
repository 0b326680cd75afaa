//! Environment configuration, read once at process startup.

use std::path::PathBuf;

use thiserror::Error;

/// Default base URL of the remote geospatial platform.
const DEFAULT_ENGINE_URL: &str = "https://earthengine.googleapis.com";

/// Startup configuration errors. These are fatal: without a credential set
/// the process must refuse to serve rather than fail on the first request.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
}

/// Process configuration.
///
/// The credential variables keep the names the deployment already uses:
/// `EE_SERVICE_ACCOUNT`, `EE_CREDENTIALS_JSON` (path to the key file) and
/// `EE_PROJECT`. `CHLOROMAP_ENGINE_URL` optionally overrides the platform
/// base URL, which is mainly useful for pointing tests at a fake backend.
#[derive(Debug, Clone)]
pub struct Config {
    /// Service-account identity used to authenticate with the platform.
    pub service_account: String,
    /// Path to the service-account key file.
    pub credentials_file: PathBuf,
    /// Platform project the computations run under.
    pub project: String,
    /// Base URL of the platform API.
    pub engine_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let service_account = require("EE_SERVICE_ACCOUNT")?;
        let credentials_file = PathBuf::from(require("EE_CREDENTIALS_JSON")?);
        let project = require("EE_PROJECT")?;
        let engine_url = std::env::var("CHLOROMAP_ENGINE_URL")
            .unwrap_or_else(|_| DEFAULT_ENGINE_URL.to_string());

        Ok(Self {
            service_account,
            credentials_file,
            project,
            engine_url,
        })
    }

    /// Create a config with explicit values (for tests).
    pub fn with_values(
        service_account: impl Into<String>,
        credentials_file: impl Into<PathBuf>,
        project: impl Into<String>,
        engine_url: impl Into<String>,
    ) -> Self {
        Self {
            service_account: service_account.into(),
            credentials_file: credentials_file.into(),
            project: project.into(),
            engine_url: engine_url.into(),
        }
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingVar(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_var_error_names_the_variable() {
        let err = ConfigError::MissingVar("EE_SERVICE_ACCOUNT");
        assert!(err.to_string().contains("EE_SERVICE_ACCOUNT"));
    }

    #[test]
    fn with_values_sets_all_fields() {
        let config = Config::with_values(
            "sa@example.iam.gserviceaccount.com",
            "/tmp/key.json",
            "my-project",
            "http://localhost:9001",
        );
        assert_eq!(config.project, "my-project");
        assert_eq!(config.engine_url, "http://localhost:9001");
        assert_eq!(config.credentials_file, PathBuf::from("/tmp/key.json"));
    }
}
