//! Static medical knowledge base for forensic analysis.
//!
//! Drug interaction facts, toxicology reference ranges, and postmortem-change
//! timelines. This is configuration data consulted by the casework pipeline;
//! it carries no logic beyond lookup and concentration interpretation.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

// =============================================================================
// Drug interactions
// =============================================================================

/// A known dangerous interaction between two substances.
#[derive(Debug, Clone, Serialize)]
pub struct DrugInteraction {
    /// Substance pair, lowercase, order not significant.
    pub pair: (&'static str, &'static str),
    pub severity: &'static str,
    pub mechanism: &'static str,
    pub pathophysiology: &'static str,
    pub clinical_significance: &'static str,
    /// Expected clinical presentation.
    pub presentation: &'static [&'static str],
}

pub const INTERACTIONS: &[DrugInteraction] = &[
    DrugInteraction {
        pair: ("ethanol", "diazepam"),
        severity: "potentially fatal",
        mechanism: "Both substances enhance GABA-mediated inhibition in the CNS",
        pathophysiology:
            "Ethanol potentiates diazepam by inhibiting its metabolism via CYP2C19 and CYP3A4",
        clinical_significance:
            "Synergistic CNS depression leading to respiratory failure at combined doses well below individual lethal thresholds",
        presentation: &[
            "severe respiratory depression",
            "cardiovascular collapse",
            "coma",
            "hypothermia",
            "cyanosis",
        ],
    },
    DrugInteraction {
        pair: ("ethanol", "barbiturates"),
        severity: "potentially fatal",
        mechanism: "Additive CNS depression",
        pathophysiology: "Shared GABA-A potentiation with independent binding sites",
        clinical_significance: "Additive respiratory depression",
        presentation: &["respiratory depression", "stupor", "coma"],
    },
];

/// Look up an interaction for an unordered substance pair, case-insensitive.
pub fn interaction_for(a: &str, b: &str) -> Option<&'static DrugInteraction> {
    let (a, b) = (a.to_lowercase(), b.to_lowercase());
    INTERACTIONS.iter().find(|i| {
        (i.pair.0 == a && i.pair.1 == b) || (i.pair.0 == b && i.pair.1 == a)
    })
}

// =============================================================================
// Substance profiles
// =============================================================================

/// Reference concentration ranges for a substance.
#[derive(Debug, Clone, Serialize)]
pub struct SubstanceProfile {
    pub name: &'static str,
    /// Therapeutic range, human-readable with units.
    pub therapeutic: &'static str,
    pub toxic: &'static str,
    pub lethal: &'static str,
    /// Numeric lower bounds of the toxic and lethal ranges, in the
    /// substance's native unit, for concentration interpretation.
    pub toxic_floor: f64,
    pub lethal_floor: f64,
    pub kinetics: &'static str,
    pub postmortem_notes: &'static str,
    pub active_metabolites: &'static [&'static str],
}

pub const SUBSTANCES: &[SubstanceProfile] = &[
    SubstanceProfile {
        name: "ethanol",
        therapeutic: "0-0.08 g/dL",
        toxic: "0.15-0.30 g/dL",
        lethal: ">0.30 g/dL",
        toxic_floor: 0.15,
        lethal_floor: 0.30,
        kinetics: "elimination 0.015-0.020 g/dL/hour",
        postmortem_notes: "Postmortem redistribution can increase measured levels 2-3x",
        active_metabolites: &[],
    },
    SubstanceProfile {
        name: "diazepam",
        therapeutic: "0.1-0.25 mg/L",
        toxic: "0.5-2.0 mg/L",
        lethal: ">2.0 mg/L",
        toxic_floor: 0.5,
        lethal_floor: 2.0,
        kinetics: "half-life 20-100 hours",
        postmortem_notes: "Relatively stable postmortem",
        active_metabolites: &["nordiazepam", "temazepam", "oxazepam"],
    },
];

pub fn substance_profile(name: &str) -> Option<&'static SubstanceProfile> {
    let name = name.to_lowercase();
    SUBSTANCES.iter().find(|s| s.name == name)
}

// =============================================================================
// Postmortem change timelines
// =============================================================================

/// A staged postmortem change and its timeline.
#[derive(Debug, Clone, Serialize)]
pub struct PostmortemChange {
    pub name: &'static str,
    pub onset: &'static str,
    pub peak: &'static str,
    pub resolution: &'static str,
    pub modifying_factors: &'static [&'static str],
}

pub const POSTMORTEM_CHANGES: &[PostmortemChange] = &[
    PostmortemChange {
        name: "rigor mortis",
        onset: "2-6 hours postmortem",
        peak: "12 hours postmortem",
        resolution: "24-48 hours postmortem",
        modifying_factors: &["temperature", "physical exertion", "age", "muscle mass"],
    },
    PostmortemChange {
        name: "livor mortis",
        onset: "30 minutes to 2 hours",
        peak: "fixation at 8-12 hours",
        resolution: "fixed thereafter",
        modifying_factors: &["body position", "anemia", "skin pigmentation"],
    },
    PostmortemChange {
        name: "algor mortis",
        onset: "immediate",
        peak: "equilibrium with ambient",
        resolution: "n/a",
        modifying_factors: &[
            "ambient temperature",
            "body mass",
            "clothing",
            "air circulation",
        ],
    },
];

// =============================================================================
// Concentration interpretation
// =============================================================================

static LEADING_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+\.?\d*)").expect("static regex"));

/// Pull the first numeric value out of a free-text measurement.
pub fn extract_numeric(text: &str) -> Option<f64> {
    LEADING_NUMBER
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Qualitative reading of a reported concentration against a profile.
///
/// Lab reports often carry qualitative values ("high concentration") with no
/// number at all; those degrade to a reference-range citation rather than a
/// classification.
pub fn interpret_concentration(raw: &str, profile: &SubstanceProfile) -> String {
    match extract_numeric(raw) {
        Some(value) if value >= profile.lethal_floor => format!(
            "{value} is within the lethal range for {} (lethal: {})",
            profile.name, profile.lethal
        ),
        Some(value) if value >= profile.toxic_floor => format!(
            "{value} is within the toxic range for {} (toxic: {}, lethal: {})",
            profile.name, profile.toxic, profile.lethal
        ),
        Some(value) => format!(
            "{value} is below the toxic range for {} (therapeutic: {})",
            profile.name, profile.therapeutic
        ),
        None => format!(
            "no numeric concentration reported; reference ranges for {}: therapeutic {}, toxic {}, lethal {}",
            profile.name, profile.therapeutic, profile.toxic, profile.lethal
        ),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interaction_lookup_is_unordered_and_case_insensitive() {
        assert!(interaction_for("Ethanol", "Diazepam").is_some());
        assert!(interaction_for("diazepam", "ethanol").is_some());
        assert!(interaction_for("ethanol", "caffeine").is_none());
    }

    #[test]
    fn substance_profile_lookup() {
        let p = substance_profile("Diazepam").unwrap();
        assert_eq!(p.lethal_floor, 2.0);
        assert!(substance_profile("paracetamol").is_none());
    }

    #[test]
    fn extract_numeric_from_noisy_text() {
        assert_eq!(extract_numeric("0.32 g/dL"), Some(0.32));
        assert_eq!(extract_numeric("approx 29°C"), Some(29.0));
        assert_eq!(extract_numeric("high concentration"), None);
    }

    #[test]
    fn concentration_classification() {
        let ethanol = substance_profile("ethanol").unwrap();
        assert!(interpret_concentration("0.35 g/dL", ethanol).contains("lethal range"));
        assert!(interpret_concentration("0.20 g/dL", ethanol).contains("toxic range"));
        assert!(interpret_concentration("0.05 g/dL", ethanol).contains("below the toxic range"));
        assert!(interpret_concentration("high", ethanol).contains("no numeric concentration"));
    }
}
