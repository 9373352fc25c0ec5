//! Bridge from case evidence to the postmortem interval estimator.
//!
//! Pulls the numeric temperatures out of the free-text evidence fields,
//! runs the decay model, and anchors the interval to the discovery time
//! when one can be parsed.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::estimator::{self, Estimate, EstimateError, EstimatorConfig, Observation};
use crate::knowledge::extract_numeric;

use super::evidence::CaseEvidence;

/// Discovery timestamp formats accepted from extracted evidence.
/// The first match wins; reports in the wild mix 12h and ISO styles.
const DATETIME_FORMATS: &[&str] = &[
    "%B %d, %Y %I:%M %p",
    "%B %d, %Y %H:%M",
    "%Y-%m-%d %H:%M",
    "%d %B %Y %I:%M %p",
];

/// Interval assessment for the final report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntervalAssessment {
    /// The decay-model estimate with corroboration and confidence.
    pub estimate: Estimate,
    /// Absolute estimated time of death, when the discovery time parsed.
    pub estimated_time_of_death: Option<String>,
    pub method: String,
    pub accuracy: String,
}

#[derive(Debug, thiserror::Error)]
pub enum IntervalError {
    #[error("no numeric core body temperature in evidence (got {0:?})")]
    MissingCoreTemperature(String),
    #[error("no numeric ambient temperature in evidence (got {0:?})")]
    MissingAmbientTemperature(String),
    #[error(transparent)]
    Estimate(#[from] EstimateError),
}

/// Run the decay model over extracted evidence.
///
/// Missing or non-numeric temperatures are explicit errors; the model is
/// never fed a default reading.
pub fn assess_interval(
    config: &EstimatorConfig,
    evidence: &CaseEvidence,
) -> Result<IntervalAssessment, IntervalError> {
    let core = extract_numeric(&evidence.core_body_temperature).ok_or_else(|| {
        IntervalError::MissingCoreTemperature(evidence.core_body_temperature.clone())
    })?;
    let ambient = extract_numeric(&evidence.room_temperature).ok_or_else(|| {
        IntervalError::MissingAmbientTemperature(evidence.room_temperature.clone())
    })?;

    let mut obs = Observation::new(core, ambient);
    if let Some(signal) = evidence.rigor_signal() {
        obs = obs.with_rigor(signal);
    }

    let estimate = estimator::estimate(config, &obs)?;

    let estimated_time_of_death = parse_discovery_time(evidence).map(|found| {
        let elapsed = Duration::seconds((estimate.elapsed_hours * 3600.0).round() as i64);
        (found - elapsed).format("%B %d, %Y at %I:%M %p").to_string()
    });

    Ok(IntervalAssessment {
        estimate,
        estimated_time_of_death,
        method: "Thermometric decay (modified Henssge) with rigor mortis corroboration"
            .to_string(),
        accuracy: "±2 hours".to_string(),
    })
}

fn parse_discovery_time(evidence: &CaseEvidence) -> Option<NaiveDateTime> {
    let date = evidence.date_found.trim();
    let time = evidence.time_found.trim();
    if date.is_empty() || time.is_empty() {
        return None;
    }
    let combined = format!("{date} {time}");
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&combined, fmt).ok())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn evidence() -> CaseEvidence {
        CaseEvidence {
            date_found: "June 20, 2025".into(),
            time_found: "7:40 AM".into(),
            core_body_temperature: "29°C".into(),
            room_temperature: "19°C".into(),
            rigor_mortis_status: "fully developed".into(),
            ..Default::default()
        }
    }

    #[test]
    fn full_assessment_from_evidence() {
        let a = assess_interval(&EstimatorConfig::default(), &evidence()).unwrap();
        assert!((a.estimate.elapsed_hours - 8.0 / 0.84).abs() < 1e-9);
        assert_eq!(a.estimate.corroboration, "rigor_full");
        // 9.52h ≈ 9h31m before 07:40 on June 20 lands late on June 19.
        let tod = a.estimated_time_of_death.unwrap();
        assert!(tod.starts_with("June 19, 2025"), "{tod}");
    }

    #[test]
    fn missing_core_temperature_is_explicit() {
        let mut e = evidence();
        e.core_body_temperature = "not recorded".into();
        let err = assess_interval(&EstimatorConfig::default(), &e).unwrap_err();
        assert!(matches!(err, IntervalError::MissingCoreTemperature(_)));
    }

    #[test]
    fn missing_ambient_temperature_is_explicit() {
        let mut e = evidence();
        e.room_temperature = String::new();
        let err = assess_interval(&EstimatorConfig::default(), &e).unwrap_err();
        assert!(matches!(err, IntervalError::MissingAmbientTemperature(_)));
    }

    #[test]
    fn inconsistent_measurement_propagates() {
        let mut e = evidence();
        e.core_body_temperature = "40.5°C".into();
        let err = assess_interval(&EstimatorConfig::default(), &e).unwrap_err();
        assert!(matches!(
            err,
            IntervalError::Estimate(EstimateError::MeasurementInconsistency { .. })
        ));
    }

    #[test]
    fn unparseable_discovery_time_still_yields_interval() {
        let mut e = evidence();
        e.time_found = "around dawn".into();
        let a = assess_interval(&EstimatorConfig::default(), &e).unwrap();
        assert!(a.estimated_time_of_death.is_none());
        assert!(a.estimate.elapsed_hours > 0.0);
    }

    #[test]
    fn iso_style_discovery_time_parses() {
        let mut e = evidence();
        e.date_found = "2025-06-20".into();
        e.time_found = "07:40".into();
        let a = assess_interval(&EstimatorConfig::default(), &e).unwrap();
        assert!(a.estimated_time_of_death.is_some());
    }
}
