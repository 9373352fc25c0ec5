#![forbid(unsafe_code)]

//! # forensic-harness
//!
//! AI-assisted forensic case analysis with a deterministic core.
//!
//! A free-text death investigation report goes in; an LLM extracts the
//! structured evidence, a pure temperature-decay estimator (cross-checked
//! against rigor mortis) computes the postmortem interval, and a static
//! medical knowledge base flags dangerous drug combinations. Further LLM
//! calls add an expert-opinion narrative and literature review, but they are
//! strictly optional: the deterministic sections never depend on a model
//! being reachable.

pub mod casework;
pub mod estimator;
pub mod extract;
pub mod gateway;
pub mod knowledge;
pub mod prompts;

pub use casework::{run_case, CaseworkConfig, CaseworkError};
pub use estimator::{
    estimate, Confidence, CorrectionPoint, Estimate, EstimateError, EstimatorConfig, Observation,
    RigorBand,
};
pub use gateway::{Attribution, ChatGateway, ProviderGateway, UsageSink};
