//! Coordinator - orchestrates triage, intent routing, knowledge lookup and
//! symptom analysis into a single response string.
//!
//! Control flow: triage short-circuits on emergencies; a question intent
//! tries the knowledge table and falls through to symptom analysis on a
//! miss; symptom analysis is the terminal stage. Every failure path resolves
//! to a user-facing string - nothing propagates past this boundary.

use crate::brain::intent;
use crate::brain::knowledge::KnowledgeBase;
use crate::brain::symptom::SymptomClassifier;
use crate::brain::triage::TriageClassifier;
use crate::models::DiseaseRecord;
use tracing::{debug, warn};

const CLARIFICATION_MESSAGE: &str = "I'm sorry, I couldn't analyze your input. \
Are you describing symptoms or asking for medical information? \
Please try being more specific.";

const DISCLAIMER: &str =
    "\n*Disclaimer: I am an AI, not a doctor. This is for informational purposes only.*";

/// Outcome of the question-intent stage. Made explicit so the
/// question-or-symptom routing policy is testable on its own rather than
/// living as implicit fallthrough.
#[derive(Debug, Clone, PartialEq)]
pub enum QuestionOutcome {
    /// The message was an answerable knowledge question.
    Answered(String),
    /// Not a question, or the topic was not in the knowledge table; treat
    /// the message as a possible symptom description.
    FallThrough,
}

/// The decision pipeline entry point.
pub struct Coordinator {
    triage: TriageClassifier,
    knowledge: KnowledgeBase,
    symptoms: SymptomClassifier,
}

impl Coordinator {
    pub fn new(knowledge: KnowledgeBase, symptoms: SymptomClassifier) -> Self {
        Self {
            triage: TriageClassifier::new(),
            knowledge,
            symptoms,
        }
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn symptoms(&self) -> &SymptomClassifier {
        &self.symptoms
    }

    /// Generate the response for a user message.
    ///
    /// Always returns a non-empty display string and never panics for any
    /// input, including empty or extremely long text.
    pub fn generate_response(&self, user_message: &str) -> String {
        let verdict = self.triage.check(user_message);
        if verdict.is_emergency() {
            debug!("Triage short-circuit: emergency detected");
            return verdict.message;
        }

        match self.answer_question(user_message) {
            QuestionOutcome::Answered(response) => response,
            QuestionOutcome::FallThrough => self.analyze_symptoms(user_message),
        }
    }

    /// Stage two: knowledge-question routing.
    ///
    /// A recognized question whose topic misses the table is NOT an error:
    /// it falls through to symptom analysis, since "what is this rash"
    /// may well be a symptom description in disguise.
    fn answer_question(&self, message: &str) -> QuestionOutcome {
        let Some(topic) = intent::question_topic(message) else {
            return QuestionOutcome::FallThrough;
        };

        match self.knowledge.get_info(&topic) {
            Some(record) => QuestionOutcome::Answered(render_answer(record)),
            None => {
                debug!("No knowledge entry for topic '{}', falling through", topic);
                QuestionOutcome::FallThrough
            }
        }
    }

    /// Stage three: symptom analysis on the original message.
    fn analyze_symptoms(&self, message: &str) -> String {
        let predictions = match self.symptoms.predict(message) {
            Ok(predictions) => predictions,
            Err(error) => {
                warn!("Symptom prediction failed: {}", error);
                return CLARIFICATION_MESSAGE.to_string();
            }
        };

        let Some(top) = predictions.first() else {
            return CLARIFICATION_MESSAGE.to_string();
        };

        let record = self.knowledge.get_info(&top.disease);

        // Prefer the table's canonical spelling over the raw class label.
        let display_name = record.map_or(top.disease.as_str(), |r| r.name.as_str());

        let mut response = format!(
            "Based on your symptoms, a likely condition is **{}** ({}% match).\n\n",
            display_name,
            (top.confidence * 100.0) as i64
        );

        match record {
            Some(record) => {
                response.push_str(&format!("**Overview:** {}\n\n", record.description));
                response.push_str("**Recommended Steps:**\n");
                for precaution in &record.precautions {
                    response.push_str(&format!("- {}\n", precaution));
                }
            }
            None => {
                response.push_str(&format!(
                    "**Overview:** I couldn't find specific details for '{}' in the \
                     knowledge base, but please consult a doctor.\n",
                    display_name
                ));
                response.push_str("**Recommended Steps:**\n- Consult a doctor for specific advice.\n");
            }
        }

        response.push_str(DISCLAIMER);
        response
    }
}

/// Render a knowledge answer: name, description, and the precaution block
/// (omitted entirely when the list is empty).
fn render_answer(record: &DiseaseRecord) -> String {
    let mut response = format!("**About {}:**\n{}\n", record.name, record.description);
    if !record.precautions.is_empty() {
        response.push_str("\n**Precautions/Steps:**\n");
        response.push_str(
            &record
                .precautions
                .iter()
                .map(|p| format!("- {}", p))
                .collect::<Vec<_>>()
                .join("\n"),
        );
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_records() -> Vec<DiseaseRecord> {
        vec![
            DiseaseRecord {
                name: "Diabetes".to_string(),
                description: "A chronic condition affecting blood sugar.".to_string(),
                precautions: vec!["Have balanced diet".to_string(), "Exercise".to_string()],
            },
            DiseaseRecord {
                name: "Migraine".to_string(),
                description: "A neurological headache disorder.".to_string(),
                precautions: vec![],
            },
        ]
    }

    #[test]
    fn test_render_answer_with_precautions() {
        let records = sample_records();
        let response = render_answer(&records[0]);

        assert!(response.starts_with("**About Diabetes:**\nA chronic condition"));
        assert!(response.contains("**Precautions/Steps:**\n- Have balanced diet\n- Exercise"));
    }

    #[test]
    fn test_render_answer_omits_empty_precaution_block() {
        let records = sample_records();
        let response = render_answer(&records[1]);

        assert!(response.starts_with("**About Migraine:**"));
        assert!(!response.contains("Precautions/Steps"));
    }
}
