use anyhow::Context;
use proxyguard_render::{
    RenderableCondition, RenderableEndpoint, RenderableReport, RenderableResult,
    RenderableSummary, RenderableVerdictStatus,
};
use proxyguard_types::{
    Condition, ProxyguardData, ProxyguardReport, ReportEnvelope, SCHEMA_REPORT_V1, Summary,
    ToolMeta, ValidationResult, Verdict, ids,
};
use time::OffsetDateTime;

pub(crate) fn tool_meta() -> ToolMeta {
    ToolMeta {
        name: ids::TOOL_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

pub fn parse_report_json(text: &str) -> anyhow::Result<ProxyguardReport> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;

    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    if schema != SCHEMA_REPORT_V1 {
        anyhow::bail!("unknown report schema: {schema} (expected {SCHEMA_REPORT_V1})");
    }

    serde_json::from_value(value).context("parse proxyguard report")
}

pub fn serialize_report(report: &ProxyguardReport) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec_pretty(report).context("serialize report")
}

/// Minimal failing report written when the run aborts before evaluation.
pub fn runtime_error_report(bundle: &str, message: &str) -> ProxyguardReport {
    let now = OffsetDateTime::now_utc();
    ReportEnvelope {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: tool_meta(),
        started_at: now,
        finished_at: now,
        verdict: Verdict::Fail,
        summary: Summary::default(),
        endpoints: Vec::new(),
        data: ProxyguardData {
            bundle: bundle.to_string(),
            rules_source: "unknown".to_string(),
            error: Some(message.to_string()),
            ..ProxyguardData::default()
        },
    }
}

fn renderable_condition(c: &Condition) -> RenderableCondition {
    RenderableCondition {
        kind: c.capability.as_str().to_string(),
        name: c.target.clone(),
    }
}

fn renderable_result(r: &ValidationResult) -> RenderableResult {
    RenderableResult {
        flow: r.flow_label().to_string(),
        direction: r.direction.as_str().to_string(),
        success: r.success,
        description: r.description.clone(),
        met: r.met_conditions.iter().map(renderable_condition).collect(),
        unmet: r.unmet_conditions.iter().map(renderable_condition).collect(),
    }
}

pub fn to_renderable(report: &ProxyguardReport) -> RenderableReport {
    RenderableReport {
        verdict: match report.verdict {
            Verdict::Pass => RenderableVerdictStatus::Pass,
            Verdict::Fail => RenderableVerdictStatus::Fail,
        },
        summary: RenderableSummary {
            total: report.summary.total,
            passed: report.summary.passed,
            failed: report.summary.failed,
        },
        endpoints: report
            .endpoints
            .iter()
            .map(|ep| RenderableEndpoint {
                kind: ep.endpoint_kind.as_str().to_string(),
                name: ep.name.clone(),
                results: ep.results.iter().map(renderable_result).collect(),
            })
            .collect(),
        error: report.data.error.clone(),
    }
}
