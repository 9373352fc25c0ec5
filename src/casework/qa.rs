//! Quality-assurance scoring over an assembled case report.

use serde::{Deserialize, Serialize};

use crate::estimator::Confidence;

use super::interval::IntervalAssessment;
use super::toxicology::ToxicologyAssessment;

/// QA summary attached to every report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaSummary {
    /// Share of expected analytical sections present, 0-100.
    pub completeness_score: f64,
    /// Cross-method agreement score, 0-100.
    pub consistency_score: f64,
    pub confidence_assessment: String,
    pub recommendations: Vec<String>,
}

/// Score the analytical sections of a report.
pub fn review(
    interval: Option<&IntervalAssessment>,
    toxicology: &ToxicologyAssessment,
    opinion_present: bool,
) -> QaSummary {
    let expected = 3.0;
    let mut completed = 1.0; // toxicology assessment always runs
    if interval.is_some() {
        completed += 1.0;
    }
    if opinion_present {
        completed += 1.0;
    }
    let completeness_score = completed / expected * 100.0;

    let consistency_score = match interval {
        // Decay estimate landing inside the corroboration band is the
        // strongest agreement signal we have.
        Some(a) if a.estimate.confidence == Confidence::High => 95.0,
        Some(_) => 80.0,
        None => 40.0,
    };

    let mut recommendations = Vec::new();
    if interval.is_none() {
        recommendations.push(
            "Obtain core body and ambient temperature readings to enable interval estimation"
                .to_string(),
        );
    }
    if !opinion_present {
        recommendations.push("Obtain an expert narrative review of the findings".to_string());
    }
    if toxicology.substances_detected.is_empty() {
        recommendations.push("Submit samples for toxicological screening".to_string());
    }
    if consistency_score < 90.0 {
        recommendations
            .push("Review agreement between thermometric and rigor-based methods".to_string());
    }

    let confidence_assessment = if completeness_score >= 90.0 && consistency_score >= 80.0 {
        "High confidence in analytical conclusions".to_string()
    } else {
        "Moderate confidence - consider additional analysis".to_string()
    };

    QaSummary {
        completeness_score,
        consistency_score,
        confidence_assessment,
        recommendations,
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::super::toxicology::assess_toxicology;
    use super::*;
    use crate::casework::evidence::CaseEvidence;
    use crate::casework::interval::assess_interval;
    use crate::estimator::EstimatorConfig;

    fn interval_fixture() -> IntervalAssessment {
        let evidence = CaseEvidence {
            core_body_temperature: "29°C".into(),
            room_temperature: "19°C".into(),
            rigor_mortis_status: "fully developed".into(),
            ..Default::default()
        };
        assess_interval(&EstimatorConfig::default(), &evidence).unwrap()
    }

    #[test]
    fn concordant_complete_report_scores_high() {
        let interval = interval_fixture();
        let tox = assess_toxicology(
            &[("ethanol".to_string(), "0.32 g/dL".to_string())]
                .into_iter()
                .collect(),
        );
        let qa = review(Some(&interval), &tox, true);
        assert_eq!(qa.completeness_score, 100.0);
        assert_eq!(qa.consistency_score, 95.0);
        assert!(qa.confidence_assessment.starts_with("High confidence"));
    }

    #[test]
    fn missing_interval_lowers_scores_and_recommends() {
        let tox = assess_toxicology(&BTreeMap::new());
        let qa = review(None, &tox, false);
        assert!(qa.completeness_score < 50.0);
        assert_eq!(qa.consistency_score, 40.0);
        assert!(qa
            .recommendations
            .iter()
            .any(|r| r.contains("temperature readings")));
        assert!(qa.confidence_assessment.starts_with("Moderate confidence"));
    }
}
