//! # Brain Module
//!
//! The triage and intent-routing decision pipeline. Analyzes user input
//! entirely in memory - fixed keyword tables, regex intent detection,
//! fuzzy table lookup, and a pre-trained probabilistic classifier.
//!
//! ## Components
//! - `triage`: emergency keyword detection (runs before everything else)
//! - `intent`: informational-question detection using regex patterns
//! - `knowledge`: disease table loading and fuzzy topic resolution
//! - `symptom`: TF-IDF + naive-Bayes symptom classification
//! - `coordinator`: orchestrator assembling the final response

pub mod coordinator;
pub mod intent;
pub mod knowledge;
pub mod symptom;
pub mod triage;

pub use coordinator::Coordinator;
pub use knowledge::KnowledgeBase;
pub use symptom::{SymptomClassifier, SymptomModel};
