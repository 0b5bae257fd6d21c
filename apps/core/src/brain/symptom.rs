//! Probabilistic symptom classification.
//!
//! Wraps a pre-trained TF-IDF + multinomial naive-Bayes text classifier.
//! The artifact is exported offline by the training job as JSON: vocabulary,
//! idf weights, class labels, class log priors, and per-class feature log
//! probabilities. Inference here reproduces the pipeline's
//! `predict_proba` step: tf-idf transform with L2 norm, joint log
//! likelihood per class, then log-sum-exp normalization.

use crate::error::AppError;
use crate::models::Prediction;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;
use tracing::info;

/// Maximum number of predictions returned.
const MAX_PREDICTIONS: usize = 3;

// Token pattern matching the vectorizer used at training time: word
// characters, two or more.
static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("Invalid regex: token pattern"));

/// The trained classifier artifact.
#[derive(Debug, Deserialize)]
pub struct SymptomModel {
    /// Term -> feature column index.
    vocabulary: HashMap<String, usize>,
    /// Inverse document frequency weight per feature column.
    idf: Vec<f64>,
    /// Disease class labels, in training order.
    classes: Vec<String>,
    /// Log prior probability per class.
    class_log_prior: Vec<f64>,
    /// Log feature probabilities, one row per class.
    feature_log_prob: Vec<Vec<f64>>,
}

impl SymptomModel {
    /// Build a model from its parts, checking that the dimensions line up
    /// so inference can never index out of bounds.
    pub fn new(
        vocabulary: HashMap<String, usize>,
        idf: Vec<f64>,
        classes: Vec<String>,
        class_log_prior: Vec<f64>,
        feature_log_prob: Vec<Vec<f64>>,
    ) -> Result<Self, AppError> {
        let model = Self {
            vocabulary,
            idf,
            classes,
            class_log_prior,
            feature_log_prob,
        };
        model.validate()?;
        Ok(model)
    }

    /// Load and validate the artifact from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path)?;
        let model: SymptomModel = serde_json::from_str(&raw)?;
        model.validate()?;
        info!(
            "SymptomModel: loaded {} classes, {} vocabulary terms",
            model.classes.len(),
            model.vocabulary.len()
        );
        Ok(model)
    }

    fn validate(&self) -> Result<(), AppError> {
        let features = self.idf.len();
        if self.classes.is_empty() {
            return Err(AppError::Validation("model has no classes".to_string()));
        }
        if self.class_log_prior.len() != self.classes.len() {
            return Err(AppError::Validation(format!(
                "class_log_prior has {} entries for {} classes",
                self.class_log_prior.len(),
                self.classes.len()
            )));
        }
        if self.feature_log_prob.len() != self.classes.len() {
            return Err(AppError::Validation(format!(
                "feature_log_prob has {} rows for {} classes",
                self.feature_log_prob.len(),
                self.classes.len()
            )));
        }
        if self.feature_log_prob.iter().any(|row| row.len() != features) {
            return Err(AppError::Validation(
                "feature_log_prob row length does not match idf length".to_string(),
            ));
        }
        if let Some(index) = self.vocabulary.values().find(|&&i| i >= features) {
            return Err(AppError::Validation(format!(
                "vocabulary index {} out of range for {} features",
                index, features
            )));
        }
        Ok(())
    }

    /// Class probabilities for a cleaned input text.
    fn predict_proba(&self, text: &str) -> Vec<f64> {
        // Sparse tf-idf vector over the known vocabulary. Unknown tokens
        // contribute nothing, exactly as at training time.
        let mut weights: HashMap<usize, f64> = HashMap::new();
        for token in TOKEN_RE.find_iter(text) {
            if let Some(&column) = self.vocabulary.get(token.as_str()) {
                *weights.entry(column).or_insert(0.0) += self.idf[column];
            }
        }

        let norm = weights.values().map(|w| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for weight in weights.values_mut() {
                *weight /= norm;
            }
        }

        // Joint log likelihood, then normalize via log-sum-exp.
        let jll: Vec<f64> = self
            .class_log_prior
            .iter()
            .zip(&self.feature_log_prob)
            .map(|(prior, row)| {
                prior
                    + weights
                        .iter()
                        .map(|(&column, weight)| weight * row[column])
                        .sum::<f64>()
            })
            .collect();

        let max = jll.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let exp: Vec<f64> = jll.iter().map(|value| (value - max).exp()).collect();
        let total: f64 = exp.iter().sum();
        exp.into_iter().map(|value| value / total).collect()
    }
}

/// Symptom classifier wrapping the optional trained model.
///
/// A missing artifact is a permanent condition for the process lifetime:
/// every prediction returns the same inference error until restart.
pub struct SymptomClassifier {
    model: Option<SymptomModel>,
    confidence_floor: f64,
}

impl SymptomClassifier {
    pub fn new(model: Option<SymptomModel>, confidence_floor: f64) -> Self {
        Self {
            model,
            confidence_floor,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.model.is_some()
    }

    /// Standardize text the way the training job does: lowercase, trim,
    /// underscores to spaces, collapse whitespace.
    fn clean_text(&self, text: &str) -> String {
        text.trim()
            .to_lowercase()
            .replace('_', " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Predict likely diseases for a symptom description.
    ///
    /// Returns at most [`MAX_PREDICTIONS`] entries, each above the
    /// confidence floor, in strictly descending confidence order (stable on
    /// ties). Empty cleaned input yields an empty list, not an error.
    pub fn predict(&self, text: &str) -> Result<Vec<Prediction>, AppError> {
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| AppError::Inference("Model not loaded".to_string()))?;

        let cleaned = self.clean_text(text);
        if cleaned.is_empty() {
            return Ok(Vec::new());
        }

        let probabilities = model.predict_proba(&cleaned);

        let mut predictions: Vec<Prediction> = model
            .classes
            .iter()
            .zip(probabilities)
            .filter(|(_, probability)| *probability > self.confidence_floor)
            .map(|(disease, confidence)| Prediction {
                disease: disease.clone(),
                confidence,
            })
            .collect();

        // sort_by is stable, so ties keep training-order class precedence.
        predictions.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        predictions.truncate(MAX_PREDICTIONS);

        Ok(predictions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two-class model over {headache, fever, nausea}, biased so that
    /// headache-heavy text leans Migraine.
    fn two_class_model() -> SymptomModel {
        let vocabulary = HashMap::from([
            ("headache".to_string(), 0),
            ("fever".to_string(), 1),
            ("nausea".to_string(), 2),
        ]);
        SymptomModel::new(
            vocabulary,
            vec![1.0, 1.0, 1.0],
            vec!["Migraine".to_string(), "Common Cold".to_string()],
            vec![0.5f64.ln(), 0.5f64.ln()],
            vec![vec![-0.5, -2.0, -1.0], vec![-2.5, -0.5, -2.0]],
        )
        .unwrap()
    }

    /// Many classes with uniform priors: with no known tokens, every class
    /// probability lands below the 0.1 floor.
    fn wide_model() -> SymptomModel {
        let classes: Vec<String> = (0..12).map(|i| format!("Disease {}", i)).collect();
        let prior = (1.0f64 / 12.0).ln();
        SymptomModel::new(
            HashMap::from([("fatigue".to_string(), 0)]),
            vec![1.0],
            classes,
            vec![prior; 12],
            vec![vec![-1.0]; 12],
        )
        .unwrap()
    }

    #[test]
    fn test_probabilities_are_normalized() {
        let model = two_class_model();

        let probabilities = model.predict_proba("headache and fever");
        let total: f64 = probabilities.iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!(probabilities.iter().all(|p| *p > 0.0));
    }

    #[test]
    fn test_headache_text_leans_migraine() {
        let classifier = SymptomClassifier::new(Some(two_class_model()), 0.1);

        let predictions = classifier.predict("I have a headache").unwrap();
        assert_eq!(predictions[0].disease, "Migraine");
        assert!(predictions[0].confidence > 0.5);
    }

    #[test]
    fn test_results_are_descending_and_capped() {
        let classifier = SymptomClassifier::new(Some(two_class_model()), 0.0);

        let predictions = classifier.predict("headache fever nausea").unwrap();
        assert!(predictions.len() <= 3);
        for pair in predictions.windows(2) {
            assert!(pair[0].confidence >= pair[1].confidence);
        }
    }

    #[test]
    fn test_confidence_floor_filters_entries() {
        let classifier = SymptomClassifier::new(Some(wide_model()), 0.1);

        // No vocabulary hit: probabilities collapse to the uniform prior
        // (1/12 each), all below the floor.
        let predictions = classifier.predict("asdkjaslkdj").unwrap();
        assert!(predictions.is_empty());
    }

    #[test]
    fn test_empty_input_is_empty_not_error() {
        let classifier = SymptomClassifier::new(Some(two_class_model()), 0.1);

        assert!(classifier.predict("").unwrap().is_empty());
        assert!(classifier.predict("   ").unwrap().is_empty());
    }

    #[test]
    fn test_underscores_are_cleaned() {
        let classifier = SymptomClassifier::new(Some(two_class_model()), 0.1);

        let cleaned = classifier.clean_text("  High_Fever   and\tNAUSEA ");
        assert_eq!(cleaned, "high fever and nausea");
    }

    #[test]
    fn test_missing_model_is_a_permanent_error() {
        let classifier = SymptomClassifier::new(None, 0.1);

        for _ in 0..3 {
            let error = classifier.predict("headache").unwrap_err();
            assert!(error.to_string().contains("Model not loaded"));
        }
    }

    #[test]
    fn test_mismatched_dimensions_are_rejected() {
        let result = SymptomModel::new(
            HashMap::from([("headache".to_string(), 5)]),
            vec![1.0],
            vec!["Migraine".to_string()],
            vec![0.0],
            vec![vec![-1.0]],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_artifact_round_trips_from_json() {
        let raw = serde_json::json!({
            "vocabulary": {"headache": 0, "fever": 1},
            "idf": [1.2, 1.0],
            "classes": ["Migraine", "Common Cold"],
            "class_log_prior": [-0.69, -0.69],
            "feature_log_prob": [[-0.5, -2.0], [-2.0, -0.5]],
        });

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("symptom_model.json");
        std::fs::write(&path, raw.to_string()).unwrap();

        let model = SymptomModel::from_file(&path).unwrap();
        assert_eq!(model.classes.len(), 2);

        let classifier = SymptomClassifier::new(Some(model), 0.1);
        let predictions = classifier.predict("headache").unwrap();
        assert_eq!(predictions[0].disease, "Migraine");
    }

    #[test]
    fn test_missing_artifact_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(SymptomModel::from_file(&dir.path().join("nope.json")).is_err());
    }
}
