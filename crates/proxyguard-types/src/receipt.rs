use crate::{Condition, Direction, EndpointKind, FlowName};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Stable schema identifier for proxyguard reports.
pub const SCHEMA_REPORT_V1: &str = "proxyguard.report.v1";

/// Outcome of one rule (one condition group) against one endpoint/flow/direction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationResult {
    pub description: String,
    pub success: bool,
    pub met_conditions: Vec<Condition>,
    pub unmet_conditions: Vec<Condition>,
    /// `Conditions met: ...` / `Conditions not met: ...`.
    pub message: String,

    pub endpoint_kind: EndpointKind,
    pub endpoint_name: String,
    pub flow_name: FlowName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional_flow_name: Option<String>,
    pub direction: Direction,

    /// Stable identifier for dedup and trending across runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
}

impl ValidationResult {
    /// Flow label for display: the conditional flow's own name, else the fixed flow.
    pub fn flow_label(&self) -> &str {
        match (&self.flow_name, &self.conditional_flow_name) {
            (FlowName::ConditionalFlow, Some(name)) => name,
            (flow, _) => flow.as_str(),
        }
    }
}

/// All results produced for one endpoint instance, keyed by the endpoint's own name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EndpointReport {
    pub endpoint_kind: EndpointKind,
    pub name: String,
    pub results: Vec<ValidationResult>,
}

/// Derived, read-only counts over emitted results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Summary {
    pub total: u32,
    pub passed: u32,
    pub failed: u32,
}

impl Summary {
    pub fn from_results<'a>(results: impl IntoIterator<Item = &'a ValidationResult>) -> Self {
        let mut s = Summary::default();
        for r in results {
            s.total += 1;
            if r.success {
                s.passed += 1;
            } else {
                s.failed += 1;
            }
        }
        s
    }

    pub fn from_endpoints(endpoints: &[EndpointReport]) -> Self {
        Self::from_results(endpoints.iter().flat_map(|e| e.results.iter()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    pub fn from_summary(summary: &Summary) -> Self {
        if summary.failed == 0 {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

/// Proxyguard-specific run payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub struct ProxyguardData {
    /// Bundle location as given on the command line.
    pub bundle: String,
    /// Where the rule set came from: `file:<path>`, `inline`, both joined by `+`, or
    /// `preset:<name>`.
    pub rules_source: String,

    pub rules_total: u32,
    pub policies_scanned: u32,
    pub endpoints_scanned: u32,

    /// Set when the run aborted before evaluation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A generic receipt/envelope.
///
/// Keeping the payload generic lets callers embed their own run data while the outer
/// shape stays stable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReportEnvelope<TData = ProxyguardData> {
    /// Versioned schema identifier for the envelope shape.
    pub schema: String,
    pub tool: ToolMeta,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,
    pub verdict: Verdict,
    pub summary: Summary,
    pub endpoints: Vec<EndpointReport>,
    pub data: TData,
}

pub type ProxyguardReport = ReportEnvelope<ProxyguardData>;

#[cfg(test)]
mod tests {
    use super::*;

    fn result(success: bool) -> ValidationResult {
        ValidationResult {
            description: "d".to_string(),
            success,
            met_conditions: Vec::new(),
            unmet_conditions: Vec::new(),
            message: String::new(),
            endpoint_kind: EndpointKind::ProxyEndpoint,
            endpoint_name: "default".to_string(),
            flow_name: FlowName::PreFlow,
            conditional_flow_name: None,
            direction: Direction::Request,
            fingerprint: None,
        }
    }

    #[test]
    fn summary_counts_scan_results() {
        let endpoints = vec![
            EndpointReport {
                endpoint_kind: EndpointKind::ProxyEndpoint,
                name: "default".to_string(),
                results: vec![result(true), result(false)],
            },
            EndpointReport {
                endpoint_kind: EndpointKind::TargetEndpoint,
                name: "backend".to_string(),
                results: vec![result(true)],
            },
        ];
        let s = Summary::from_endpoints(&endpoints);
        assert_eq!(
            s,
            Summary {
                total: 3,
                passed: 2,
                failed: 1
            }
        );
        assert_eq!(Verdict::from_summary(&s), Verdict::Fail);
        assert_eq!(Verdict::from_summary(&Summary::default()), Verdict::Pass);
    }

    #[test]
    fn flow_label_prefers_conditional_name() {
        let mut r = result(true);
        assert_eq!(r.flow_label(), "PreFlow");
        r.flow_name = FlowName::ConditionalFlow;
        r.conditional_flow_name = Some("getCustomer".to_string());
        assert_eq!(r.flow_label(), "getCustomer");
    }

    #[test]
    fn optional_fields_are_omitted() {
        let v = serde_json::to_value(result(true)).unwrap();
        assert!(v.get("conditional_flow_name").is_none());
        assert!(v.get("fingerprint").is_none());
        assert_eq!(v["endpoint_kind"], "ProxyEndpoint");
    }
}
