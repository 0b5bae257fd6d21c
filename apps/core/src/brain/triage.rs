//! Emergency triage pre-check.
//!
//! Scans a message against fixed keyword categories before anything else
//! runs. Pure substring matching over normalized text - no ML model, fully
//! deterministic given the declared table order.

use std::fmt;

/// Triage outcome. Only the statuses the classifier actually produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriageStatus {
    /// Emergency keywords detected; the coordinator must short-circuit.
    Emergency,
    /// No emergency indicators; the pipeline may continue.
    Safe,
}

impl fmt::Display for TriageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriageStatus::Emergency => write!(f, "EMERGENCY"),
            TriageStatus::Safe => write!(f, "SAFE"),
        }
    }
}

/// Result of a triage check: the status plus the display message to return
/// verbatim when an emergency fires (empty for [`TriageStatus::Safe`]).
#[derive(Debug, Clone, PartialEq)]
pub struct TriageVerdict {
    pub status: TriageStatus,
    pub message: String,
}

impl TriageVerdict {
    fn emergency(message: String) -> Self {
        Self {
            status: TriageStatus::Emergency,
            message,
        }
    }

    fn safe() -> Self {
        Self {
            status: TriageStatus::Safe,
            message: String::new(),
        }
    }

    pub fn is_emergency(&self) -> bool {
        self.status == TriageStatus::Emergency
    }
}

/// Emergency trigger phrases, grouped by category. Scan order is the
/// declared order: first category with a matching keyword wins.
const EMERGENCY_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "cardiac",
        &[
            "chest pain",
            "heart attack",
            "crushing pain",
            "pressure on chest",
            "tightness in chest",
            "radiating pain",
            "chest discomfort",
        ],
    ),
    (
        "stroke",
        &[
            "face drooping",
            "arm weakness",
            "slurred speech",
            "numbness",
            "cant speak",
            "blurred vision",
            "one side numb",
            "drooping face",
        ],
    ),
    (
        "respiratory",
        &[
            "difficulty breathing",
            "shortness of breath",
            "choking",
            "cant breathe",
            "gasping",
            "blue lips",
            "wheezing",
            "breathlessness",
        ],
    ),
    (
        "trauma",
        &[
            "severe bleeding",
            "coughing blood",
            "coughing up blood",
            "blood in vomit",
            "head injury",
            "unconscious",
            "deep cut",
            "severe burn",
        ],
    ),
    (
        "allergic",
        &[
            "throat closing",
            "throat is closing",
            "swollen tongue",
            "anaphylaxis",
            "swelling face",
            "hives",
            "trouble swallowing",
        ],
    ),
    (
        "general",
        &[
            "seizure", "collapse", "unresponsive", "poison", "overdose", "fainted",
        ],
    ),
];

/// Common food allergens. Only meaningful in combination with the
/// anaphylaxis markers below - a lone mention of "peanut" is not an
/// emergency.
const ALLERGY_TRIGGERS: &[&str] = &[
    "peanut", "nuts", "shellfish", "egg", "milk", "soy", "seafood",
];

/// Airway/swelling terms that, together with an allergen, indicate
/// possible anaphylaxis.
const ANAPHYLAXIS_MARKERS: &[&str] = &["throat", "breath", "swelling"];

const ANAPHYLAXIS_MESSAGE: &str = "\u{1F6A8} **EMERGENCY: Possible ANAPHYLAXIS (severe allergic reaction)**\n\n\
This is life-threatening.\n\n\
\u{1F449} **Call emergency services (112/911) IMMEDIATELY**\n\
\u{1F449} If you have an epinephrine injector, use it NOW\n\n\
*Do not rely on this chatbot for emergencies.*";

/// Keyword-based emergency detector.
pub struct TriageClassifier;

impl Default for TriageClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl TriageClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Lowercase, strip punctuation, collapse whitespace.
    fn normalize(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        let stripped: String = lowered
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
            .collect();
        stripped.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Check a message for emergency indicators.
    ///
    /// The anaphylaxis rule runs before the category scan regardless of any
    /// keyword overlap, because the combination of an allergen and an airway
    /// symptom outranks every single-keyword category.
    pub fn check(&self, message: &str) -> TriageVerdict {
        let text = self.normalize(message);

        let has_allergen = ALLERGY_TRIGGERS.iter().any(|food| text.contains(food));
        if has_allergen && ANAPHYLAXIS_MARKERS.iter().any(|m| text.contains(m)) {
            return TriageVerdict::emergency(ANAPHYLAXIS_MESSAGE.to_string());
        }

        for (category, keywords) in EMERGENCY_CATEGORIES {
            for keyword in *keywords {
                if text.contains(keyword) {
                    return TriageVerdict::emergency(format!(
                        "\u{1F6A8} **EMERGENCY DETECTED**\n\n\
                         Your symptoms suggest a serious **{} emergency**.\n\n\
                         \u{1F449} **Call emergency services (112/911) immediately** or go to the nearest ER.\n\n\
                         *Do not rely on this chatbot for life-threatening situations.*",
                        category.to_uppercase()
                    ));
                }
            }
        }

        TriageVerdict::safe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cardiac_emergency() {
        let triage = TriageClassifier::new();

        let verdict = triage.check("I have chest pain and pressure");
        assert_eq!(verdict.status, TriageStatus::Emergency);
        assert!(verdict.message.contains("CARDIAC emergency"));
    }

    #[test]
    fn test_punctuation_does_not_hide_keywords() {
        let triage = TriageClassifier::new();

        let verdict = triage.check("Severe   bleeding!!! Please help.");
        assert_eq!(verdict.status, TriageStatus::Emergency);
        assert!(verdict.message.contains("TRAUMA emergency"));
    }

    #[test]
    fn test_anaphylaxis_beats_category_keywords() {
        let triage = TriageClassifier::new();

        // "wheezing" is a respiratory keyword, but allergen + "breath"
        // must fire the anaphylaxis rule first.
        let verdict = triage.check("ate peanut, wheezing, short of breath");
        assert_eq!(verdict.status, TriageStatus::Emergency);
        assert!(verdict.message.contains("ANAPHYLAXIS"));
    }

    #[test]
    fn test_allergen_alone_is_not_an_emergency() {
        let triage = TriageClassifier::new();

        let verdict = triage.check("I ate peanut butter for lunch");
        assert_eq!(verdict.status, TriageStatus::Safe);
        assert!(verdict.message.is_empty());
    }

    #[test]
    fn test_first_category_in_declared_order_wins() {
        let triage = TriageClassifier::new();

        // Both cardiac ("chest pain") and stroke ("numbness") keywords are
        // present; cardiac is declared first.
        let verdict = triage.check("chest pain and numbness in my arm");
        assert!(verdict.message.contains("CARDIAC emergency"));
    }

    #[test]
    fn test_safe_message_is_empty() {
        let triage = TriageClassifier::new();

        for message in ["I have a mild headache", "", "   ", "???"] {
            let verdict = triage.check(message);
            assert_eq!(verdict.status, TriageStatus::Safe, "for '{}'", message);
            assert!(verdict.message.is_empty());
        }
    }

    #[test]
    fn test_deterministic() {
        let triage = TriageClassifier::new();

        let first = triage.check("sudden slurred speech and face drooping");
        let second = triage.check("sudden slurred speech and face drooping");
        assert_eq!(first, second);
    }
}
