//! Preflight Check System
//!
//! Verifies the startup dependencies (the two tabular knowledge sources and
//! the classifier artifact) before the server starts. No check is fatal:
//! a missing source degrades the matching component, and the report says so
//! up front instead of leaving it to be discovered one request at a time.

use crate::brain::symptom::SymptomModel;
use crate::config::AppConfig;
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

/// Result of a single check.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub name: String,
    pub passed: bool,
    pub message: String,
    pub details: Option<String>,
}

impl CheckResult {
    fn pass(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            passed: true,
            message: message.to_string(),
            details: None,
        }
    }

    fn fail(name: &str, message: &str, details: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            passed: false,
            message: message.to_string(),
            details,
        }
    }
}

/// Complete preflight report.
#[derive(Debug, Clone, Serialize)]
pub struct PreflightReport {
    pub all_passed: bool,
    pub checks: Vec<CheckResult>,
    pub summary: String,
}

/// Run all preflight checks and log the outcome.
pub fn run_preflight_checks(config: &AppConfig) -> PreflightReport {
    info!("Running preflight checks...");

    let checks = vec![
        check_csv_source("description_source", &config.description_path()),
        check_csv_source("precaution_source", &config.precaution_path()),
        check_model_artifact(&config.model_path),
    ];

    let all_passed = checks.iter().all(|c| c.passed);
    let summary = if all_passed {
        "All checks passed. System ready.".to_string()
    } else {
        "Some sources are missing. Starting degraded.".to_string()
    };

    for check in &checks {
        if check.passed {
            info!("  \u{2705} {}: {}", check.name, check.message);
        } else {
            warn!("  \u{274C} {}: {}", check.name, check.message);
            if let Some(details) = &check.details {
                warn!("      Details: {}", details);
            }
        }
    }
    info!("Summary: {}", summary);

    PreflightReport {
        all_passed,
        checks,
        summary,
    }
}

fn check_csv_source(name: &str, path: &Path) -> CheckResult {
    if !path.exists() {
        return CheckResult::fail(
            name,
            "CSV source not found",
            Some(format!("Expected at: {:?}", path)),
        );
    }

    match csv::Reader::from_path(path) {
        Ok(mut reader) => match reader.headers() {
            Ok(headers) if headers.iter().any(|h| h.trim() == "Disease") => {
                CheckResult::pass(name, &format!("Source OK at {:?}", path))
            }
            Ok(_) => CheckResult::fail(
                name,
                "CSV source has no 'Disease' column",
                Some(format!("At: {:?}", path)),
            ),
            Err(e) => CheckResult::fail(name, "Cannot read CSV headers", Some(e.to_string())),
        },
        Err(e) => CheckResult::fail(name, "Cannot open CSV source", Some(e.to_string())),
    }
}

fn check_model_artifact(path: &Path) -> CheckResult {
    if !path.exists() {
        return CheckResult::fail(
            "model_artifact",
            "Classifier artifact not found",
            Some(format!("Expected at: {:?}", path)),
        );
    }

    match SymptomModel::from_file(path) {
        Ok(_) => CheckResult::pass("model_artifact", &format!("Artifact OK at {:?}", path)),
        Err(e) => CheckResult::fail(
            "model_artifact",
            "Classifier artifact failed to load",
            Some(e.to_string()),
        ),
    }
}
