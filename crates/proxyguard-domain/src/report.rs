use proxyguard_types::{EndpointReport, Summary, Verdict};

/// Engine output before it is wrapped into a report envelope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DomainReport {
    pub verdict: Verdict,
    pub endpoints: Vec<EndpointReport>,
    pub summary: Summary,
    pub policies_scanned: u32,
    pub endpoints_scanned: u32,
    pub rules_total: u32,
}
