//! Environment-driven configuration.
//!
//! Every tunable has a default so the server starts with no `.env` at all.
//! The fuzzy-match cutoff and confidence floor are exposed here because they
//! are empirically chosen values, not fixed properties of the pipeline.

use crate::error::AppError;
use std::env;
use std::path::PathBuf;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_MODEL_PATH: &str = "ml_models/symptom_model.json";
const DEFAULT_FUZZY_CUTOFF: f64 = 0.5;
const DEFAULT_CONFIDENCE_FLOOR: f64 = 0.1;
const DEFAULT_RATE_LIMIT: usize = 20;
const DEFAULT_RATE_WINDOW_SECS: u64 = 60;

/// Runtime configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP shell binds to.
    pub bind_addr: String,
    /// Directory holding the two tabular knowledge sources.
    pub data_dir: PathBuf,
    /// Path to the trained classifier artifact (JSON).
    pub model_path: PathBuf,
    /// Minimum similarity ratio for the fuzzy disease-name match.
    pub fuzzy_cutoff: f64,
    /// Minimum confidence below which a predicted disease is discarded.
    pub confidence_floor: f64,
    /// Requests allowed per session within `rate_window_secs`.
    pub rate_limit: usize,
    /// Sliding-window length for the rate limiter, in seconds.
    pub rate_window_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            fuzzy_cutoff: DEFAULT_FUZZY_CUTOFF,
            confidence_floor: DEFAULT_CONFIDENCE_FLOOR,
            rate_limit: DEFAULT_RATE_LIMIT,
            rate_window_secs: DEFAULT_RATE_WINDOW_SECS,
        }
    }
}

impl AppConfig {
    /// Build the configuration from environment variables, falling back to
    /// defaults for anything unset. Malformed values are errors rather than
    /// silent fallbacks.
    pub fn from_env() -> Result<Self, AppError> {
        let mut config = Self::default();

        if let Ok(addr) = env::var("MEDIASSIST_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Ok(dir) = env::var("MEDIASSIST_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(path) = env::var("MEDIASSIST_MODEL_PATH") {
            config.model_path = PathBuf::from(path);
        }
        if let Ok(raw) = env::var("MEDIASSIST_FUZZY_CUTOFF") {
            config.fuzzy_cutoff = parse_ratio("MEDIASSIST_FUZZY_CUTOFF", &raw)?;
        }
        if let Ok(raw) = env::var("MEDIASSIST_CONFIDENCE_FLOOR") {
            config.confidence_floor = parse_ratio("MEDIASSIST_CONFIDENCE_FLOOR", &raw)?;
        }
        if let Ok(raw) = env::var("MEDIASSIST_RATE_LIMIT") {
            config.rate_limit = raw
                .parse()
                .map_err(|_| bad_value("MEDIASSIST_RATE_LIMIT", &raw))?;
        }
        if let Ok(raw) = env::var("MEDIASSIST_RATE_WINDOW_SECS") {
            config.rate_window_secs = raw
                .parse()
                .map_err(|_| bad_value("MEDIASSIST_RATE_WINDOW_SECS", &raw))?;
        }

        Ok(config)
    }

    /// Path to the disease description source.
    pub fn description_path(&self) -> PathBuf {
        self.data_dir.join("symptom_description.csv")
    }

    /// Path to the disease precaution source.
    pub fn precaution_path(&self) -> PathBuf {
        self.data_dir.join("symptom_precaution.csv")
    }
}

fn parse_ratio(name: &str, raw: &str) -> Result<f64, AppError> {
    let value: f64 = raw.parse().map_err(|_| bad_value(name, raw))?;
    if !(0.0..=1.0).contains(&value) {
        return Err(AppError::Config(format!(
            "{} must be between 0.0 and 1.0, got {}",
            name, value
        )));
    }
    Ok(value)
}

fn bad_value(name: &str, raw: &str) -> AppError {
    AppError::Config(format!("invalid value for {}: '{}'", name, raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_env_unset() {
        temp_env::with_vars_unset(
            [
                "MEDIASSIST_BIND_ADDR",
                "MEDIASSIST_DATA_DIR",
                "MEDIASSIST_MODEL_PATH",
                "MEDIASSIST_FUZZY_CUTOFF",
                "MEDIASSIST_CONFIDENCE_FLOOR",
                "MEDIASSIST_RATE_LIMIT",
                "MEDIASSIST_RATE_WINDOW_SECS",
            ],
            || {
                let config = AppConfig::from_env().unwrap();
                assert_eq!(config.bind_addr, "127.0.0.1:5000");
                assert_eq!(config.fuzzy_cutoff, 0.5);
                assert_eq!(config.confidence_floor, 0.1);
                assert_eq!(config.description_path(), PathBuf::from("data/symptom_description.csv"));
            },
        );
    }

    #[test]
    fn test_overrides_are_honored() {
        temp_env::with_vars(
            [
                ("MEDIASSIST_BIND_ADDR", Some("0.0.0.0:8080")),
                ("MEDIASSIST_FUZZY_CUTOFF", Some("0.7")),
                ("MEDIASSIST_RATE_LIMIT", Some("5")),
            ],
            || {
                let config = AppConfig::from_env().unwrap();
                assert_eq!(config.bind_addr, "0.0.0.0:8080");
                assert_eq!(config.fuzzy_cutoff, 0.7);
                assert_eq!(config.rate_limit, 5);
            },
        );
    }

    #[test]
    fn test_out_of_range_cutoff_is_rejected() {
        temp_env::with_var("MEDIASSIST_FUZZY_CUTOFF", Some("1.5"), || {
            assert!(AppConfig::from_env().is_err());
        });
    }

    #[test]
    fn test_malformed_number_is_rejected() {
        temp_env::with_var("MEDIASSIST_RATE_LIMIT", Some("plenty"), || {
            assert!(AppConfig::from_env().is_err());
        });
    }
}
