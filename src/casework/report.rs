//! Final case report: serde model, case-id derivation, JSON and text output.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;

use chrono::Local;
use serde::{Deserialize, Serialize};

use super::evidence::CaseEvidence;
use super::interval::IntervalAssessment;
use super::qa::QaSummary;
use super::toxicology::ToxicologyAssessment;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub case_id: String,
    pub analysis_date: String,
    pub analyst: String,
    pub quality_score: String,
}

/// The complete assembled case report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseReport {
    pub report_metadata: ReportMetadata,
    pub case_summary: CaseEvidence,
    pub interval: Option<IntervalAssessment>,
    pub toxicology: ToxicologyAssessment,
    pub expert_opinion: Option<String>,
    pub literature_review: Option<String>,
    pub quality_assurance: QaSummary,
    /// Degradations encountered while assembling the report.
    pub warnings: Vec<String>,
    pub methods: Vec<String>,
}

/// Derive a filesystem-safe case id from the victim name and today's date.
pub fn derive_case_id(evidence: &CaseEvidence) -> String {
    let name = if evidence.victim_name.trim().is_empty() {
        "unknown"
    } else {
        evidence.victim_name.trim()
    };
    let slug: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    format!("{}_{}", slug, Local::now().format("%Y%m%d"))
}

impl CaseReport {
    pub fn save_json(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, json)
    }

    pub fn save_text(&self, path: impl AsRef<Path>) -> io::Result<()> {
        fs::write(path, self.render_text())
    }

    /// Human-readable rendering of the report.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "FORENSIC PATHOLOGY ANALYSIS REPORT");
        let _ = writeln!(out, "{}", "=".repeat(50));
        let _ = writeln!(out);

        let meta = &self.report_metadata;
        let _ = writeln!(out, "Case ID: {}", meta.case_id);
        let _ = writeln!(out, "Analysis Date: {}", meta.analysis_date);
        let _ = writeln!(out, "Quality Score: {}", meta.quality_score);
        let _ = writeln!(out);

        let _ = writeln!(out, "CASE SUMMARY");
        let _ = writeln!(out, "{}", "-".repeat(20));
        let case = &self.case_summary;
        let _ = writeln!(out, "Victim: {}", or_unknown(&case.victim_name));
        let age = case
            .age
            .map(|a| a.to_string())
            .unwrap_or_else(|| "Unknown".into());
        let _ = writeln!(out, "Age: {age}");
        let _ = writeln!(out, "Occupation: {}", or_unknown(&case.occupation));
        let _ = writeln!(out, "Location: {}", or_unknown(&case.location));
        if !case.date_found.is_empty() {
            let _ = writeln!(
                out,
                "Found: {} at {}",
                case.date_found,
                or_unknown(&case.time_found)
            );
        }
        let _ = writeln!(out);

        let _ = writeln!(out, "TIME OF DEATH ANALYSIS");
        let _ = writeln!(out, "{}", "-".repeat(25));
        match &self.interval {
            Some(a) => {
                let _ = writeln!(
                    out,
                    "Estimated interval: {:.1} hours before discovery",
                    a.estimate.elapsed_hours
                );
                if let Some(tod) = &a.estimated_time_of_death {
                    let _ = writeln!(out, "Estimated time of death: {tod}");
                }
                let _ = writeln!(out, "Corroboration: {}", a.estimate.corroboration);
                let _ = writeln!(out, "Confidence: {}", a.estimate.confidence.as_str());
                let _ = writeln!(out, "Method: {}", a.method);
                let _ = writeln!(out, "Accuracy: {}", a.accuracy);
            }
            None => {
                let _ = writeln!(out, "Not available (see warnings)");
            }
        }
        let _ = writeln!(out);

        let _ = writeln!(out, "TOXICOLOGICAL FINDINGS");
        let _ = writeln!(out, "{}", "-".repeat(25));
        let tox = &self.toxicology;
        if tox.substances_detected.is_empty() {
            let _ = writeln!(out, "No substances reported");
        } else {
            let _ = writeln!(out, "Substances: {}", tox.substances_detected.join(", "));
            for sa in &tox.individual_assessments {
                let _ = writeln!(out, "  {} ({}): {}", sa.substance, sa.concentration, sa.interpretation);
            }
            for i in &tox.interactions {
                let _ = writeln!(out, "Interaction: {}: {}", i.combination, i.clinical_significance);
            }
            if let Some(cause) = &tox.cause_of_death_assessment {
                let _ = writeln!(out, "Cause assessment: {cause}");
            }
            if let Some(mech) = &tox.mechanism_of_death {
                let _ = writeln!(out, "Mechanism: {mech}");
            }
        }
        let _ = writeln!(out);

        if let Some(opinion) = &self.expert_opinion {
            let _ = writeln!(out, "EXPERT FORENSIC OPINION");
            let _ = writeln!(out, "{}", "-".repeat(25));
            let _ = writeln!(out, "{opinion}");
            let _ = writeln!(out);
        }

        if let Some(lit) = &self.literature_review {
            let _ = writeln!(out, "LITERATURE SUPPORT");
            let _ = writeln!(out, "{}", "-".repeat(20));
            let _ = writeln!(out, "{lit}");
            let _ = writeln!(out);
        }

        let _ = writeln!(out, "QUALITY ASSURANCE");
        let _ = writeln!(out, "{}", "-".repeat(18));
        let qa = &self.quality_assurance;
        let _ = writeln!(out, "Completeness: {:.0}%", qa.completeness_score);
        let _ = writeln!(out, "Consistency: {:.0}%", qa.consistency_score);
        let _ = writeln!(out, "Confidence: {}", qa.confidence_assessment);
        for r in &qa.recommendations {
            let _ = writeln!(out, "Recommendation: {r}");
        }

        if !self.warnings.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "WARNINGS");
            let _ = writeln!(out, "{}", "-".repeat(10));
            for w in &self.warnings {
                let _ = writeln!(out, "- {w}");
            }
        }

        out
    }
}

fn or_unknown(s: &str) -> &str {
    if s.trim().is_empty() {
        "Unknown"
    } else {
        s
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_id_is_filesystem_safe() {
        let e = CaseEvidence {
            victim_name: "Dr. Daniel Eze".into(),
            ..Default::default()
        };
        let id = derive_case_id(&e);
        assert!(id.starts_with("Dr__Daniel_Eze_"));
        assert!(id.chars().all(|c| c.is_alphanumeric() || c == '_'));
    }

    #[test]
    fn case_id_for_unnamed_victim() {
        let id = derive_case_id(&CaseEvidence::default());
        assert!(id.starts_with("unknown_"));
    }

    #[test]
    fn saved_json_round_trips() {
        let report = CaseReport {
            report_metadata: ReportMetadata {
                case_id: "test_20250620".into(),
                analysis_date: "June 20, 2025 at 08:00 AM".into(),
                analyst: "forensic-harness".into(),
                quality_score: "100%".into(),
            },
            case_summary: CaseEvidence::default(),
            interval: None,
            toxicology: crate::casework::toxicology::assess_toxicology(&Default::default()),
            expert_opinion: None,
            literature_review: None,
            quality_assurance: crate::casework::qa::review(
                None,
                &crate::casework::toxicology::assess_toxicology(&Default::default()),
                false,
            ),
            warnings: vec!["interval assessment unavailable".into()],
            methods: vec!["Toxicological interaction analysis".into()],
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        report.save_json(&path).unwrap();

        let loaded: CaseReport =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded.report_metadata.case_id, "test_20250620");
        assert_eq!(loaded.warnings.len(), 1);
    }
}
