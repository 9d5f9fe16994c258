use crate::models::{ConditionRecord, Severity};

/// Immutable set of conditions the matcher scores against.
///
/// Built once at startup and shared behind an `Arc`; nothing mutates it afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymptomCatalog {
    conditions: Vec<ConditionRecord>,
}

impl SymptomCatalog {
    pub fn new(conditions: Vec<ConditionRecord>) -> Self {
        Self { conditions }
    }

    /// The six conditions shipped with the application.
    pub fn reference() -> Self {
        Self::new(vec![
            ConditionRecord::new(
                &["fever", "cough", "fatigue", "body aches"],
                "Common Cold",
                Severity::Mild,
                &[
                    "Get plenty of rest",
                    "Stay hydrated",
                    "Consider over-the-counter pain relievers",
                    "Monitor symptoms for worsening",
                ],
            ),
            ConditionRecord::new(
                &["chest pain", "shortness of breath", "nausea", "sweating"],
                "Possible Heart Issue",
                Severity::Severe,
                &[
                    "Seek immediate medical attention",
                    "Call emergency services if severe",
                    "Do not ignore chest pain",
                    "Avoid physical exertion",
                ],
            ),
            ConditionRecord::new(
                &["headache", "nausea", "sensitivity to light", "vomiting"],
                "Migraine",
                Severity::Moderate,
                &[
                    "Rest in a dark, quiet room",
                    "Apply cold or warm compress",
                    "Stay hydrated",
                    "Consider prescribed migraine medication",
                ],
            ),
            ConditionRecord::new(
                &["fever", "severe headache", "stiff neck", "confusion"],
                "Possible Meningitis",
                Severity::Severe,
                &[
                    "Seek emergency medical care immediately",
                    "This is a medical emergency",
                    "Do not delay treatment",
                    "Call 911 or go to emergency room",
                ],
            ),
            ConditionRecord::new(
                &["persistent cough", "weight loss", "night sweats", "fatigue"],
                "Possible Tuberculosis",
                Severity::Moderate,
                &[
                    "Consult a doctor immediately",
                    "Get tested for tuberculosis",
                    "Avoid close contact with others",
                    "Follow isolation guidelines if diagnosed",
                ],
            ),
            ConditionRecord::new(
                &["stomach pain", "diarrhea", "nausea", "vomiting"],
                "Gastroenteritis",
                Severity::Mild,
                &[
                    "Stay hydrated with clear fluids",
                    "Rest and avoid solid foods temporarily",
                    "Use oral rehydration solutions",
                    "Consult doctor if symptoms persist",
                ],
            ),
        ])
    }

    pub fn conditions(&self) -> &[ConditionRecord] {
        &self.conditions
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

impl Default for SymptomCatalog {
    fn default() -> Self {
        Self::reference()
    }
}
