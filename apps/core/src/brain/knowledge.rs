//! Disease knowledge lookup.
//!
//! Joins two tabular sources (descriptions and precautions) into an
//! immutable in-memory table at startup, then resolves free-text topics to
//! canonical disease names through a synonym table, exact matching, fuzzy
//! matching, and substring containment - in that priority order.

use crate::error::AppError;
use crate::models::DiseaseRecord;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Free-text phrase -> canonical disease name. Keys are lowercase.
const SYNONYMS: &[(&str, &str)] = &[
    ("blood pressure", "Hypertension"),
    ("high blood pressure", "Hypertension"),
    ("bp", "Hypertension"),
    ("hypertension", "Hypertension"),
    ("sugar", "Diabetes"),
    ("diabetes", "Diabetes"),
    ("diabetic", "Diabetes"),
    ("high sugar", "Diabetes"),
    ("corona", "COVID-19"),
    ("covid", "COVID-19"),
    ("virus", "COVID-19"),
    ("breathing problem", "Asthma"),
    ("cant breathe", "Asthma"),
    ("wheezing", "Asthma"),
    ("inhaler", "Asthma"),
    ("stomach bug", "Food Poisoning"),
    ("food poisoning", "Food Poisoning"),
    ("low blood", "Anemia"),
    ("anemia", "Anemia"),
    ("cold", "Common Cold"),
    ("flu", "Common Cold"),
    ("headache", "Migraine"),
    ("piles", "Dimorphic hemmorhoids(piles)"),
    ("dimorphic hemmorhoids(piles)", "Dimorphic hemmorhoids(piles)"),
    ("pox", "Chicken pox"),
    ("chicken pox", "Chicken pox"),
    ("jaundice", "Jaundice"),
    ("typhoid", "Typhoid"),
    ("malaria", "Malaria"),
    ("dengue", "Dengue"),
];

#[derive(Debug, Deserialize)]
struct DescriptionRow {
    #[serde(rename = "Disease")]
    disease: String,
    #[serde(rename = "Description")]
    description: String,
}

#[derive(Debug, Deserialize)]
struct PrecautionRow {
    #[serde(rename = "Disease")]
    disease: String,
    #[serde(rename = "Precaution_1")]
    precaution_1: Option<String>,
    #[serde(rename = "Precaution_2")]
    precaution_2: Option<String>,
    #[serde(rename = "Precaution_3")]
    precaution_3: Option<String>,
    #[serde(rename = "Precaution_4")]
    precaution_4: Option<String>,
}

impl PrecautionRow {
    /// Precautions in field order 1-4, skipping blanks, capitalized for
    /// display.
    fn precautions(&self) -> Vec<String> {
        [
            &self.precaution_1,
            &self.precaution_2,
            &self.precaution_3,
            &self.precaution_4,
        ]
        .into_iter()
        .flatten()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(capitalize)
        .collect()
    }
}

/// Uppercase the first letter, lowercase the rest.
fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
        None => String::new(),
    }
}

/// The immutable disease knowledge table.
pub struct KnowledgeBase {
    records: Vec<DiseaseRecord>,
    /// Lowercased names, parallel to `records`, for case-insensitive lookup.
    names_lower: Vec<String>,
    fuzzy_cutoff: f64,
}

impl KnowledgeBase {
    /// Load and left-join the two CSV sources.
    ///
    /// The join is driven by the description source: a disease without a
    /// precaution row is kept with an empty precaution list. Disease keys
    /// are trimmed before joining because the upstream data carries stray
    /// whitespace.
    pub fn load(
        description_path: &Path,
        precaution_path: &Path,
        fuzzy_cutoff: f64,
    ) -> Result<Self, AppError> {
        let mut precautions_by_disease: HashMap<String, Vec<String>> = HashMap::new();
        let mut reader = csv::Reader::from_path(precaution_path)?;
        for row in reader.deserialize() {
            let row: PrecautionRow = row?;
            precautions_by_disease.insert(row.disease.trim().to_string(), row.precautions());
        }

        let mut records = Vec::new();
        let mut reader = csv::Reader::from_path(description_path)?;
        for row in reader.deserialize() {
            let row: DescriptionRow = row?;
            let name = row.disease.trim().to_string();
            let precautions = precautions_by_disease.remove(&name).unwrap_or_default();
            records.push(DiseaseRecord {
                name,
                description: row.description.trim().to_string(),
                precautions,
            });
        }

        info!("KnowledgeBase: loaded {} diseases", records.len());
        Ok(Self::from_records(records, fuzzy_cutoff))
    }

    /// Build a knowledge base directly from records. Public so tests and
    /// callers with mock tables do not need CSV fixtures.
    pub fn from_records(records: Vec<DiseaseRecord>, fuzzy_cutoff: f64) -> Self {
        let names_lower = records
            .iter()
            .map(|r| r.name.trim().to_lowercase())
            .collect();
        Self {
            records,
            names_lower,
            fuzzy_cutoff,
        }
    }

    /// A knowledge base with no data: every lookup is absent. Used when the
    /// CSV sources are missing at startup.
    pub fn empty(fuzzy_cutoff: f64) -> Self {
        Self::from_records(Vec::new(), fuzzy_cutoff)
    }

    pub fn is_loaded(&self) -> bool {
        !self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Resolve a free-text topic to a disease record.
    ///
    /// Resolution order, first hit wins:
    /// 1. synonym table (replaces the topic with the mapped canonical name);
    /// 2. exact case-insensitive match on canonical names;
    /// 3. fuzzy best match above the similarity cutoff;
    /// 4. substring containment, first match in table order.
    pub fn get_info(&self, topic: &str) -> Option<&DiseaseRecord> {
        if self.records.is_empty() {
            return None;
        }

        let mut clean_topic = topic.trim().to_lowercase();
        if clean_topic.is_empty() {
            return None;
        }

        if let Some((_, canonical)) = SYNONYMS.iter().find(|(phrase, _)| *phrase == clean_topic) {
            clean_topic = canonical.to_lowercase();
        }

        if let Some(index) = self.position_of(&clean_topic) {
            return Some(&self.records[index]);
        }

        if let Some(closest) = self.closest_match(&clean_topic) {
            if let Some(index) = self.position_of(&closest) {
                return Some(&self.records[index]);
            }
        }

        self.names_lower
            .iter()
            .position(|name| name.contains(&clean_topic))
            .map(|index| &self.records[index])
    }

    fn position_of(&self, name_lower: &str) -> Option<usize> {
        self.names_lower.iter().position(|name| name == name_lower)
    }

    /// Best fuzzy candidate over the canonical names, or `None` when nothing
    /// reaches the similarity cutoff. At most one candidate, first one wins
    /// on ties.
    fn closest_match(&self, topic: &str) -> Option<String> {
        let mut best: Option<(f64, &str)> = None;
        for name in &self.names_lower {
            let similarity = strsim::sorensen_dice(topic, name);
            if similarity >= self.fuzzy_cutoff
                && best.map_or(true, |(score, _)| similarity > score)
            {
                best = Some((similarity, name));
            }
        }
        best.map(|(_, name)| name.to_string())
    }
}
