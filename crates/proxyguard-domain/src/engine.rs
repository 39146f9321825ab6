use crate::conditions::PolicyCatalog;
use crate::flow::validate_flow;
use crate::model::{BundleModel, Endpoint};
use crate::report::DomainReport;
use crate::rules::RuleSet;
use proxyguard_types::{EndpointKind, EndpointReport, FlowName, Summary, Verdict};
use rayon::prelude::*;
use tracing::{debug, info};

pub fn evaluate(bundle: Option<&BundleModel>, rules: &RuleSet) -> DomainReport {
    let empty = BundleModel::default();
    let bundle = bundle.unwrap_or(&empty);
    let catalog = PolicyCatalog::new(&bundle.policies);

    let mut endpoints: Vec<EndpointReport> = Vec::new();
    for kind in EndpointKind::ALL {
        let list = bundle.endpoints(kind);
        let flows = rules.flow_names_for(kind);
        debug!(endpoint_kind = %kind, endpoints = list.len(), flows = flows.len(), "evaluating endpoints");

        // Indexed parallel collect keeps declaration order.
        let reports: Vec<EndpointReport> = list
            .par_iter()
            .map(|endpoint| validate_endpoint(endpoint, kind, &flows, &catalog, rules))
            .collect();
        endpoints.extend(reports);
    }

    let summary = Summary::from_endpoints(&endpoints);
    let verdict = Verdict::from_summary(&summary);
    info!(
        verdict = ?verdict,
        total = summary.total,
        passed = summary.passed,
        failed = summary.failed,
        "bundle evaluated"
    );

    DomainReport {
        verdict,
        summary,
        policies_scanned: bundle.policies.len() as u32,
        endpoints_scanned: endpoints.len() as u32,
        rules_total: rules.len() as u32,
        endpoints,
    }
}

fn validate_endpoint(
    endpoint: &Endpoint,
    kind: EndpointKind,
    flows: &[FlowName],
    catalog: &PolicyCatalog<'_>,
    rules: &RuleSet,
) -> EndpointReport {
    let results = flows
        .iter()
        .flat_map(|flow| validate_flow(Some(endpoint), &endpoint.name, *flow, kind, catalog, rules))
        .collect();

    EndpointReport {
        endpoint_kind: kind,
        name: endpoint.name.clone(),
        results,
    }
}
