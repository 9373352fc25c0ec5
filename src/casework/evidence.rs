//! Structured evidence extraction from free-text case reports via LLM.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::extract::extract_json;
use crate::gateway::{Attribution, ChatGateway, ChatModel, ChatRequest};
use crate::prompts::EVIDENCE_EXTRACTION;

// =============================================================================
// Types
// =============================================================================

/// Structured evidence as extracted from a case report.
///
/// Every field defaults so partial extractions still deserialize; downstream
/// consumers treat empty fields as "not reported" rather than failing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaseEvidence {
    #[serde(default)]
    pub victim_name: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub occupation: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub date_found: String,
    #[serde(default)]
    pub time_found: String,
    #[serde(default)]
    pub physical_findings: Vec<String>,
    #[serde(default)]
    pub scene_observations: Vec<String>,
    #[serde(default)]
    pub environmental_conditions: BTreeMap<String, String>,
    /// Substance name → reported concentration string.
    #[serde(default)]
    pub toxicology: BTreeMap<String, String>,
    #[serde(default)]
    pub core_body_temperature: String,
    #[serde(default)]
    pub room_temperature: String,
    #[serde(default)]
    pub rigor_mortis_status: String,
    #[serde(default)]
    pub last_seen_alive: String,
}

impl CaseEvidence {
    /// The rigor mortis signal to feed the estimator: the dedicated status
    /// field when present, otherwise the first physical finding mentioning
    /// rigor.
    pub fn rigor_signal(&self) -> Option<&str> {
        if !self.rigor_mortis_status.trim().is_empty() {
            return Some(self.rigor_mortis_status.as_str());
        }
        self.physical_findings
            .iter()
            .map(String::as_str)
            .find(|f| f.to_lowercase().contains("rigor"))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EvidenceError {
    #[error("LLM call failed: {0}")]
    LlmFailed(#[from] crate::gateway::error::ProviderError),
    #[error("JSON extraction failed: {0}")]
    JsonParse(String),
}

// =============================================================================
// Extraction
// =============================================================================

/// Parse a free-text case report into structured evidence using an LLM.
pub async fn parse_case_report(
    gateway: &dyn ChatGateway,
    model: &str,
    report_text: &str,
) -> Result<CaseEvidence, EvidenceError> {
    let prompt = EVIDENCE_EXTRACTION.render(&[("report_text", report_text)]);

    let req = ChatRequest::new(
        ChatModel::openrouter(model),
        prompt.to_messages(),
        Attribution::new("casework::evidence"),
    )
    .temperature(0.0)
    .max_tokens(2048)
    .json();

    let resp = gateway.chat(req).await?;

    let json_str = extract_json(&resp.content);
    serde_json::from_str(json_str).map_err(|e| {
        let preview: String = resp.content.chars().take(500).collect();
        EvidenceError::JsonParse(format!(
            "failed to parse evidence response: {e}; raw: {preview}"
        ))
    })
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evidence_deserializes_with_missing_fields() {
        let json = r#"{"victim_name": "Jane Doe", "age": 48}"#;
        let e: CaseEvidence = serde_json::from_str(json).unwrap();
        assert_eq!(e.victim_name, "Jane Doe");
        assert_eq!(e.age, Some(48));
        assert!(e.toxicology.is_empty());
        assert!(e.core_body_temperature.is_empty());
    }

    #[test]
    fn rigor_signal_prefers_status_field() {
        let e = CaseEvidence {
            rigor_mortis_status: "fully developed".into(),
            physical_findings: vec!["partial rigor in limbs".into()],
            ..Default::default()
        };
        assert_eq!(e.rigor_signal(), Some("fully developed"));
    }

    #[test]
    fn rigor_signal_falls_back_to_physical_findings() {
        let e = CaseEvidence {
            physical_findings: vec!["cyanosis".into(), "Rigor mortis fully developed".into()],
            ..Default::default()
        };
        assert_eq!(e.rigor_signal(), Some("Rigor mortis fully developed"));
    }

    #[test]
    fn rigor_signal_absent() {
        let e = CaseEvidence {
            physical_findings: vec!["supine position".into()],
            ..Default::default()
        };
        assert_eq!(e.rigor_signal(), None);
    }
}
