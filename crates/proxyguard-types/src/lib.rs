//! Stable DTOs and IDs used across the proxyguard workspace.
//!
//! This crate is intentionally boring:
//! - the closed vocabularies of the rule language (endpoint kinds, flows, directions)
//! - leaf conditions as written in rule files
//! - data types for the emitted validation report
//! - stable string IDs

#![forbid(unsafe_code)]

pub mod condition;
pub mod flow;
pub mod ids;
pub mod receipt;

pub use condition::{Capability, Condition};
pub use flow::{Direction, EndpointKind, FlowName};
pub use receipt::{
    EndpointReport, ProxyguardData, ProxyguardReport, ReportEnvelope, SCHEMA_REPORT_V1, Summary,
    ToolMeta, ValidationResult, Verdict,
};
