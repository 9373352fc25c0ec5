//! Postmortem interval estimation from body cooling and rigor mortis.
//!
//! The deterministic core of the harness: a linear temperature-decay model
//! (simplified Henssge) cross-checked against a categorical rigor-mortis
//! observation. Pure computation with no I/O or LLM dependency, so it stays
//! available even when every upstream service is down.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// Configuration
// =============================================================================

/// Where the ambient-temperature correction is applied.
///
/// The two historical variants of this model disagree: one scales the
/// cooling rate, the other scales the computed elapsed hours. Both are
/// supported; `Rate` is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrectionPoint {
    /// Multiply the base cooling rate by the ambient factor, then divide.
    Rate,
    /// Divide by the base rate first, then multiply the elapsed hours.
    Elapsed,
}

/// An expected postmortem-interval band tied to a rigor mortis phrase.
///
/// `fragments` are matched case-insensitively against the free-text signal;
/// the first band whose fragment matches wins, in list order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RigorBand {
    /// Stable tag reported as the corroboration label, e.g. "rigor_full".
    pub label: String,
    /// Phrase fragments that select this band.
    pub fragments: Vec<String>,
    /// Expected hours-since-death range (inclusive).
    pub hours: (f64, f64),
}

impl RigorBand {
    pub fn new(label: impl Into<String>, fragments: &[&str], hours: (f64, f64)) -> Self {
        Self {
            label: label.into(),
            fragments: fragments.iter().map(|s| s.to_lowercase()).collect(),
            hours,
        }
    }

    fn matches(&self, signal_lower: &str) -> bool {
        self.fragments.iter().any(|f| signal_lower.contains(f))
    }
}

/// Tunable model parameters.
///
/// The base rate is a single unconditional average, deliberately coarse,
/// and the documented main source of imprecision. Everything that was a
/// literal in earlier versions of this model lives here so the estimator
/// can be tuned and tested in isolation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimatorConfig {
    /// Average cooling rate, °C per hour.
    pub base_rate: f64,
    /// Ambient temperatures below this count as a cold environment, °C.
    pub ambient_threshold: f64,
    /// Factor applied when ambient is below the threshold.
    pub cold_factor: f64,
    /// Factor applied when ambient is at or above the threshold.
    pub warm_factor: f64,
    /// Whether the factor scales the rate or the elapsed-hours result.
    pub correction: CorrectionPoint,
    /// Ordered corroboration bands. First matching fragment wins.
    pub bands: Vec<RigorBand>,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            base_rate: 0.7,
            ambient_threshold: 20.0,
            cold_factor: 1.2,
            warm_factor: 0.8,
            correction: CorrectionPoint::Rate,
            bands: vec![
                RigorBand::new("rigor_full", &["fully developed", "fully established"], (8.0, 12.0)),
                RigorBand::new("rigor_partial", &["partial", "developing"], (4.0, 8.0)),
            ],
        }
    }
}

// =============================================================================
// Inputs / outputs
// =============================================================================

/// A single set of scene observations fed to the estimator.
#[derive(Debug, Clone)]
pub struct Observation {
    /// Measured core body temperature, °C.
    pub measured_temp: f64,
    /// Baseline temperature at death, °C. Conventionally 37.0.
    pub reference_temp: f64,
    /// Ambient temperature at the scene, °C.
    pub ambient_temp: f64,
    /// Free-text rigor mortis description, if any.
    pub rigor_signal: Option<String>,
}

impl Observation {
    /// Observation with the standard 37.0 °C reference.
    pub fn new(measured_temp: f64, ambient_temp: f64) -> Self {
        Self {
            measured_temp,
            reference_temp: 37.0,
            ambient_temp,
            rigor_signal: None,
        }
    }

    pub fn with_reference(mut self, reference_temp: f64) -> Self {
        self.reference_temp = reference_temp;
        self
    }

    pub fn with_rigor(mut self, signal: impl Into<String>) -> Self {
        self.rigor_signal = Some(signal.into());
        self
    }
}

/// Coarse confidence qualifier for an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// The decay estimate falls inside the matched corroboration band.
    High,
    /// No corroboration, or the estimate falls outside the matched band.
    Moderate,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Moderate => "moderate",
        }
    }
}

/// Result of a postmortem interval estimation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Estimate {
    /// Hours elapsed since death. Always non-negative.
    pub elapsed_hours: f64,
    /// Label of the matched corroboration band, or "unknown".
    pub corroboration: String,
    /// Expected hour range of the matched band, if any.
    pub band_hours: Option<(f64, f64)>,
    /// High when the decay estimate agrees with the corroboration band.
    pub confidence: Confidence,
}

/// Ways the estimator can refuse to produce a number.
#[derive(Debug, Error)]
pub enum EstimateError {
    /// Measured temperature above the reference baseline: the monotonic
    /// cooling assumption is violated, so a negative duration would be
    /// produced. Reported instead of silently emitted.
    #[error("measured temperature {measured}°C exceeds reference {reference}°C; cooling model does not apply")]
    MeasurementInconsistency { measured: f64, reference: f64 },

    /// Rate constants resolved to zero or a non-finite value.
    #[error("invalid estimator configuration: {0}")]
    Configuration(String),
}

// =============================================================================
// Estimation
// =============================================================================

/// Estimate hours since death from a single observation.
///
/// `delta = reference - measured` is divided by the (possibly corrected)
/// cooling rate; the rigor signal, when present, is matched against the
/// configured bands and used only to qualify confidence. The numeric
/// estimate is always produced, even with no corroboration at all.
pub fn estimate(config: &EstimatorConfig, obs: &Observation) -> Result<Estimate, EstimateError> {
    let delta = obs.reference_temp - obs.measured_temp;
    if delta < 0.0 {
        return Err(EstimateError::MeasurementInconsistency {
            measured: obs.measured_temp,
            reference: obs.reference_temp,
        });
    }

    let factor = if obs.ambient_temp < config.ambient_threshold {
        config.cold_factor
    } else {
        config.warm_factor
    };

    let elapsed_hours = match config.correction {
        CorrectionPoint::Rate => {
            let rate = config.base_rate * factor;
            check_rate(rate)?;
            delta / rate
        }
        CorrectionPoint::Elapsed => {
            check_rate(config.base_rate)?;
            if !factor.is_finite() {
                return Err(EstimateError::Configuration(format!(
                    "ambient factor is not finite: {factor}"
                )));
            }
            (delta / config.base_rate) * factor
        }
    };

    if !elapsed_hours.is_finite() || elapsed_hours < 0.0 {
        return Err(EstimateError::Configuration(format!(
            "elapsed hours computed as {elapsed_hours}"
        )));
    }

    let band = obs
        .rigor_signal
        .as_deref()
        .map(str::to_lowercase)
        .and_then(|signal| config.bands.iter().find(|b| b.matches(&signal)));

    let confidence = match band {
        Some(b) if elapsed_hours >= b.hours.0 && elapsed_hours <= b.hours.1 => Confidence::High,
        _ => Confidence::Moderate,
    };

    Ok(Estimate {
        elapsed_hours,
        corroboration: band.map(|b| b.label.clone()).unwrap_or_else(|| "unknown".into()),
        band_hours: band.map(|b| b.hours),
        confidence,
    })
}

fn check_rate(rate: f64) -> Result<(), EstimateError> {
    if rate == 0.0 || !rate.is_finite() {
        return Err(EstimateError::Configuration(format!(
            "cooling rate resolved to {rate}"
        )));
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> EstimatorConfig {
        EstimatorConfig::default()
    }

    #[test]
    fn worked_example_cold_room_full_rigor() {
        // 37.0 − 29.0 = 8.0; ambient 19 < 20 so rate = 0.7 × 1.2 = 0.84;
        // 8.0 / 0.84 ≈ 9.52, inside the 8–12h full-rigor band.
        let obs = Observation::new(29.0, 19.0).with_rigor("rigor mortis fully developed");
        let est = estimate(&cfg(), &obs).unwrap();
        assert!((est.elapsed_hours - 8.0 / 0.84).abs() < 1e-9);
        assert_eq!(est.corroboration, "rigor_full");
        assert_eq!(est.confidence, Confidence::High);
    }

    #[test]
    fn partial_rigor_band_disagrees_with_decay() {
        // Same decay estimate (~9.52h) but the partial band is 4–8h.
        let obs = Observation::new(29.0, 19.0).with_rigor("partial rigor");
        let est = estimate(&cfg(), &obs).unwrap();
        assert_eq!(est.corroboration, "rigor_partial");
        assert_eq!(est.confidence, Confidence::Moderate);
    }

    #[test]
    fn measured_above_reference_is_an_error() {
        let obs = Observation::new(40.0, 19.0);
        let err = estimate(&cfg(), &obs).unwrap_err();
        assert!(matches!(err, EstimateError::MeasurementInconsistency { .. }));
    }

    #[test]
    fn zero_delta_gives_zero_hours() {
        let est = estimate(&cfg(), &Observation::new(37.0, 22.0)).unwrap();
        assert_eq!(est.elapsed_hours, 0.0);
        assert_eq!(est.corroboration, "unknown");
        assert_eq!(est.confidence, Confidence::Moderate);
    }

    #[test]
    fn elapsed_hours_monotonic_in_temperature_drop() {
        let mut prev = -1.0;
        for measured in [36.0, 33.0, 30.0, 27.0, 24.0] {
            let est = estimate(&cfg(), &Observation::new(measured, 25.0)).unwrap();
            assert!(est.elapsed_hours > prev);
            prev = est.elapsed_hours;
        }
    }

    #[test]
    fn ambient_correction_direction_rate_convention() {
        // Below threshold the rate speeds up, so fewer hours for the same delta.
        let cold = estimate(&cfg(), &Observation::new(29.0, 15.0)).unwrap();
        let warm = estimate(&cfg(), &Observation::new(29.0, 25.0)).unwrap();
        assert!(cold.elapsed_hours < warm.elapsed_hours);
    }

    #[test]
    fn elapsed_correction_convention() {
        // The alternate variant scales the result directly: cold factor 0.8
        // shortens the interval relative to the uncorrected figure.
        let config = EstimatorConfig {
            correction: CorrectionPoint::Elapsed,
            cold_factor: 0.8,
            warm_factor: 1.0,
            ..cfg()
        };
        let est = estimate(&config, &Observation::new(29.0, 15.0)).unwrap();
        assert!((est.elapsed_hours - (8.0 / 0.7) * 0.8).abs() < 1e-9);
    }

    #[test]
    fn corroboration_matching_is_case_insensitive() {
        let obs = Observation::new(29.0, 19.0).with_rigor("RIGOR MORTIS FULLY DEVELOPED");
        let est = estimate(&cfg(), &obs).unwrap();
        assert_eq!(est.corroboration, "rigor_full");
    }

    #[test]
    fn unmatched_signal_degrades_to_unknown() {
        let obs = Observation::new(29.0, 19.0).with_rigor("livor mortis fixed");
        let est = estimate(&cfg(), &obs).unwrap();
        assert_eq!(est.corroboration, "unknown");
        assert!(est.band_hours.is_none());
        assert_eq!(est.confidence, Confidence::Moderate);
    }

    #[test]
    fn first_listed_band_wins_on_ambiguous_signal() {
        // "fully developed after a partial phase" matches both fragments;
        // list order resolves the tie in favor of the full band.
        let obs =
            Observation::new(29.0, 19.0).with_rigor("fully developed after a partial onset");
        let est = estimate(&cfg(), &obs).unwrap();
        assert_eq!(est.corroboration, "rigor_full");
    }

    #[test]
    fn zero_base_rate_is_a_configuration_error() {
        let config = EstimatorConfig {
            base_rate: 0.0,
            ..cfg()
        };
        let err = estimate(&config, &Observation::new(29.0, 19.0)).unwrap_err();
        assert!(matches!(err, EstimateError::Configuration(_)));
    }

    #[test]
    fn non_finite_factor_is_a_configuration_error() {
        let config = EstimatorConfig {
            cold_factor: f64::INFINITY,
            correction: CorrectionPoint::Elapsed,
            ..cfg()
        };
        let err = estimate(&config, &Observation::new(29.0, 19.0)).unwrap_err();
        assert!(matches!(err, EstimateError::Configuration(_)));
    }

    #[test]
    fn estimates_never_negative_over_grid() {
        let config = cfg();
        for measured in [0.0, 10.0, 20.0, 30.0, 37.0] {
            for ambient in [-10.0, 5.0, 19.9, 20.0, 35.0] {
                let est = estimate(&config, &Observation::new(measured, ambient)).unwrap();
                assert!(est.elapsed_hours >= 0.0);
            }
        }
    }
}
