//! The `check` use case: load the bundle, resolve rules, evaluate, produce a report.

use anyhow::Context;
use camino::Utf8Path;
use proxyguard_domain::report::DomainReport;
use proxyguard_settings::ResolvedConfig;
use proxyguard_types::{ProxyguardData, ProxyguardReport, ReportEnvelope, SCHEMA_REPORT_V1, Verdict};
use time::OffsetDateTime;
use tracing::info;

use crate::report::tool_meta;
use crate::rules::{RulesInput, resolve_rules};

/// Input for the check use case.
#[derive(Clone, Debug)]
pub struct CheckInput<'a> {
    /// Bundle directory or single-document bundle file.
    pub bundle: &'a Utf8Path,
    pub rules: RulesInput<'a>,
}

/// Output from the check use case.
#[derive(Clone, Debug)]
pub struct CheckOutput {
    pub report: ProxyguardReport,
    /// The resolved rule set used.
    pub resolved_config: ResolvedConfig,
}

/// Run the check use case: resolve rules, load the bundle, evaluate, produce the report.
pub fn run_check(input: CheckInput<'_>) -> anyhow::Result<CheckOutput> {
    let started_at = OffsetDateTime::now_utc();

    let resolved = resolve_rules(&input.rules)?;
    let model = proxyguard_bundle::build_bundle_model(input.bundle).context("load bundle")?;

    let DomainReport {
        verdict,
        endpoints,
        summary,
        policies_scanned,
        endpoints_scanned,
        rules_total,
    } = proxyguard_domain::evaluate(Some(&model), &resolved.rules);

    info!(
        rules = rules_total,
        source = %resolved.rules_source,
        verdict = ?verdict,
        "check finished"
    );

    let report = ReportEnvelope {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: tool_meta(),
        started_at,
        finished_at: OffsetDateTime::now_utc(),
        verdict,
        summary,
        endpoints,
        data: ProxyguardData {
            bundle: input.bundle.to_string(),
            rules_source: resolved.rules_source.clone(),
            rules_total,
            policies_scanned,
            endpoints_scanned,
            error: None,
        },
    };

    Ok(CheckOutput {
        report,
        resolved_config: resolved,
    })
}

/// Map verdict to exit code: 0 = pass, 2 = fail.
pub fn verdict_exit_code(verdict: Verdict) -> i32 {
    match verdict {
        Verdict::Pass => 0,
        Verdict::Fail => 2,
    }
}
