//! Configuration for the validation engine

use dsv_01_evidence::ReconciliationLimits;
use dsv_02_constraints::ProcessingMode;
use serde::{Deserialize, Serialize};
use std::env;
use tracing::warn;

/// Engine configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Stop at the first hard failure or keep collecting diagnostics
    pub mode: ProcessingMode,
    /// Input bounds per signature (anti-DoS)
    pub limits: ReconciliationLimits,
    /// Oldest acceptable revocation data relative to the validation time (seconds)
    pub max_revocation_age_secs: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mode: ProcessingMode::StopOnFirstFailure,
            limits: ReconciliationLimits::default(),
            max_revocation_age_secs: 30 * 24 * 3600,
        }
    }
}

impl EngineConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `DSV_PROCESSING_MODE`: `stop-on-first-failure` or `report-all`
    /// - `DSV_MAX_TOKENS`: Token entries per signature (default: 1000)
    /// - `DSV_MAX_REFERENCES`: Declared references per signature (default: 2000)
    /// - `DSV_MAX_REVOCATION_AGE_SECS`: Revocation freshness bound (default: 30 days)
    ///
    /// Unparsable values keep the default and log a warning.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(mode) = parse_var("DSV_PROCESSING_MODE") {
            config.mode = mode;
        }
        if let Some(max) = parse_var("DSV_MAX_TOKENS") {
            config.limits.max_tokens = max;
        }
        if let Some(max) = parse_var("DSV_MAX_REFERENCES") {
            config.limits.max_references = max;
        }
        if let Some(age) = parse_var("DSV_MAX_REVOCATION_AGE_SECS") {
            config.max_revocation_age_secs = age;
        }
        config
    }

    pub fn with_mode(mut self, mode: ProcessingMode) -> Self {
        self.mode = mode;
        self
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(variable = name, value = %raw, "Ignoring unparsable configuration value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.mode, ProcessingMode::StopOnFirstFailure);
        assert_eq!(config.limits.max_tokens, 1_000);
        assert_eq!(config.max_revocation_age_secs, 2_592_000);
    }

    #[test]
    fn test_json_mode() {
        let config: EngineConfig = serde_json::from_str(r#"{"mode":"report-all"}"#).unwrap();
        assert_eq!(config.mode, ProcessingMode::ReportAll);
        assert_eq!(config.limits, ReconciliationLimits::default());
    }

    #[test]
    fn test_with_mode() {
        let config = EngineConfig::default().with_mode(ProcessingMode::ReportAll);
        assert_eq!(config.mode, ProcessingMode::ReportAll);
    }
}
