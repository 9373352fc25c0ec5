//! Toxicological assessment against the static knowledge base.
//!
//! Pure lookup logic: per-substance concentration interpretation plus an
//! all-pairs interaction scan. No LLM involvement.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::knowledge::{self, interaction_for, substance_profile};

/// Interpretation of a single detected substance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubstanceAssessment {
    pub substance: String,
    pub concentration: String,
    pub interpretation: String,
    /// Postmortem redistribution caveats, when the knowledge base has them.
    pub postmortem_notes: Option<String>,
}

/// A dangerous combination found among the detected substances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionFinding {
    pub combination: String,
    pub severity: String,
    pub mechanism: String,
    pub clinical_significance: String,
    pub expected_presentation: Vec<String>,
}

/// Complete toxicological assessment for a case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToxicologyAssessment {
    pub substances_detected: Vec<String>,
    pub individual_assessments: Vec<SubstanceAssessment>,
    pub interactions: Vec<InteractionFinding>,
    pub cause_of_death_assessment: Option<String>,
    pub mechanism_of_death: Option<String>,
}

/// Assess the reported toxicology panel.
///
/// Substances absent from the knowledge base still appear in the output with
/// a "no reference data" interpretation; the interaction scan covers every
/// unordered pair.
pub fn assess_toxicology(toxicology: &BTreeMap<String, String>) -> ToxicologyAssessment {
    let substances: Vec<String> = toxicology.keys().cloned().collect();

    let individual_assessments = toxicology
        .iter()
        .map(|(substance, concentration)| match substance_profile(substance) {
            Some(profile) => SubstanceAssessment {
                substance: substance.clone(),
                concentration: concentration.clone(),
                interpretation: knowledge::interpret_concentration(concentration, profile),
                postmortem_notes: Some(profile.postmortem_notes.to_string()),
            },
            None => SubstanceAssessment {
                substance: substance.clone(),
                concentration: concentration.clone(),
                interpretation: format!("no reference data for {substance}"),
                postmortem_notes: None,
            },
        })
        .collect();

    let mut interactions = Vec::new();
    for (i, a) in substances.iter().enumerate() {
        for b in &substances[i + 1..] {
            if let Some(known) = interaction_for(a, b) {
                interactions.push(InteractionFinding {
                    combination: format!("{} + {}", known.pair.0, known.pair.1),
                    severity: known.severity.to_string(),
                    mechanism: known.mechanism.to_string(),
                    clinical_significance: known.clinical_significance.to_string(),
                    expected_presentation: known
                        .presentation
                        .iter()
                        .map(|s| s.to_string())
                        .collect(),
                });
            }
        }
    }

    let (cause, mechanism) = if interactions.is_empty() {
        (None, None)
    } else {
        let combos: Vec<&str> = interactions.iter().map(|i| i.combination.as_str()).collect();
        (
            Some(format!("Combined drug toxicity ({})", combos.join("; "))),
            Some(
                "Respiratory and cardiac depression due to synergistic CNS depression".to_string(),
            ),
        )
    };

    ToxicologyAssessment {
        substances_detected: substances,
        individual_assessments,
        interactions,
        cause_of_death_assessment: cause,
        mechanism_of_death: mechanism,
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn panel(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn ethanol_diazepam_combination_is_flagged() {
        let a = assess_toxicology(&panel(&[
            ("Ethanol", "0.32 g/dL"),
            ("Diazepam", "2.4 mg/L"),
        ]));
        assert_eq!(a.interactions.len(), 1);
        assert_eq!(a.interactions[0].combination, "ethanol + diazepam");
        assert!(a.cause_of_death_assessment.unwrap().contains("Combined drug toxicity"));
        assert!(a.mechanism_of_death.is_some());
    }

    #[test]
    fn lethal_concentrations_are_interpreted() {
        let a = assess_toxicology(&panel(&[("ethanol", "0.32 g/dL")]));
        assert!(a.individual_assessments[0]
            .interpretation
            .contains("lethal range"));
        assert!(a.interactions.is_empty());
        assert!(a.cause_of_death_assessment.is_none());
    }

    #[test]
    fn unknown_substance_degrades_gracefully() {
        let a = assess_toxicology(&panel(&[("novichok", "trace")]));
        assert!(a.individual_assessments[0]
            .interpretation
            .contains("no reference data"));
    }

    #[test]
    fn empty_panel_is_empty_assessment() {
        let a = assess_toxicology(&BTreeMap::new());
        assert!(a.substances_detected.is_empty());
        assert!(a.interactions.is_empty());
    }
}
