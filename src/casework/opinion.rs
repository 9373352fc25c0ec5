//! Narrative LLM calls: expert opinion and literature review.
//!
//! Both are best-effort. The caller decides what a failure means; nothing
//! here blocks the deterministic sections of the report.

use crate::gateway::{Attribution, ChatGateway, ChatModel, ChatRequest, ProviderError};
use crate::prompts::{EXPERT_OPINION, LITERATURE_REVIEW};

use super::evidence::CaseEvidence;
use super::interval::IntervalAssessment;
use super::toxicology::ToxicologyAssessment;

/// Generate the expert forensic opinion narrative.
///
/// The deterministic findings are serialized into the prompt so the model
/// comments on them rather than recomputing anything.
pub async fn generate_expert_opinion(
    gateway: &dyn ChatGateway,
    model: &str,
    evidence: &CaseEvidence,
    interval: Option<&IntervalAssessment>,
    toxicology: &ToxicologyAssessment,
) -> Result<String, ProviderError> {
    let case_summary = to_json_block(evidence);
    let interval_analysis = interval
        .map(to_json_block)
        .unwrap_or_else(|| "interval analysis unavailable".to_string());
    let toxicology_analysis = to_json_block(toxicology);

    let prompt = EXPERT_OPINION.render(&[
        ("case_summary", case_summary.as_str()),
        ("interval_analysis", interval_analysis.as_str()),
        ("toxicology_analysis", toxicology_analysis.as_str()),
    ]);

    let req = ChatRequest::new(
        ChatModel::openrouter(model),
        prompt.to_messages(),
        Attribution::new("casework::opinion"),
    )
    .temperature(0.3)
    .max_tokens(4096);

    let resp = gateway.chat(req).await?;
    Ok(resp.content)
}

/// Cross-reference the detected substances against published literature.
pub async fn literature_review(
    gateway: &dyn ChatGateway,
    model: &str,
    substances: &[String],
) -> Result<String, ProviderError> {
    let joined = substances.join(", ");
    let prompt = LITERATURE_REVIEW.render(&[("substances", joined.as_str())]);

    let req = ChatRequest::new(
        ChatModel::openrouter(model),
        prompt.to_messages(),
        Attribution::new("casework::literature"),
    )
    .temperature(0.3)
    .max_tokens(2048);

    let resp = gateway.chat(req).await?;
    Ok(resp.content)
}

fn to_json_block<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".into())
}
