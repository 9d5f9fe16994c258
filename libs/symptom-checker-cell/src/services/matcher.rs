// libs/symptom-checker-cell/src/services/matcher.rs
use std::sync::Arc;

use tracing::debug;

use crate::models::MatchResult;
use crate::services::catalog::SymptomCatalog;

/// Scores catalog conditions against free-text symptom input.
///
/// Stateless apart from the shared read-only catalog, so a single instance can
/// serve every request concurrently.
#[derive(Debug, Clone)]
pub struct SymptomMatcher {
    catalog: Arc<SymptomCatalog>,
}

impl SymptomMatcher {
    pub fn new(catalog: Arc<SymptomCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &SymptomCatalog {
        &self.catalog
    }

    /// Rank the catalog against comma-separated symptom phrases.
    ///
    /// Conditions with no overlapping symptom are dropped. The rest are ordered
    /// by confidence, highest first; equal confidences keep catalog order.
    ///
    /// Blank terms are kept, and since the empty string is contained in every
    /// symptom, an empty input matches every condition at 100%. Callers reject
    /// blank input before getting here.
    pub fn analyze(&self, raw_input: &str) -> Vec<MatchResult> {
        let query_terms = parse_query_terms(raw_input);

        let mut matches: Vec<MatchResult> = self.catalog
            .conditions()
            .iter()
            .map(|condition| {
                let match_count = count_matches(&condition.symptoms, &query_terms);
                MatchResult {
                    condition: condition.clone(),
                    match_count,
                    confidence: confidence_percent(match_count, condition.symptoms.len()),
                }
            })
            .filter(|result| result.match_count > 0)
            .collect();

        // sort_by is stable
        matches.sort_by(|a, b| b.confidence.cmp(&a.confidence));

        debug!("Matched {} of {} conditions for {} query terms",
               matches.len(), self.catalog.len(), query_terms.len());

        matches
    }
}

/// Lowercase, split on commas and trim. Empty terms are preserved.
pub fn parse_query_terms(raw_input: &str) -> Vec<String> {
    raw_input
        .to_lowercase()
        .split(',')
        .map(|term| term.trim().to_string())
        .collect()
}

/// Number of `symptoms` that contain, or are contained in, at least one term.
fn count_matches(symptoms: &[String], query_terms: &[String]) -> usize {
    symptoms
        .iter()
        .filter(|symptom| {
            query_terms
                .iter()
                .any(|term| symptom.contains(term.as_str()) || term.contains(symptom.as_str()))
        })
        .count()
}

/// `round(match_count / total * 100)`, rounding halves up.
fn confidence_percent(match_count: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let ratio = (match_count.min(total) as f64 / total as f64) * 100.0;
    ratio.round() as u8
}
