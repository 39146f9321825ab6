#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableVerdictStatus {
    Pass,
    Fail,
}

impl RenderableVerdictStatus {
    pub fn label(self) -> &'static str {
        match self {
            RenderableVerdictStatus::Pass => "PASS",
            RenderableVerdictStatus::Fail => "FAIL",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableCondition {
    pub kind: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableResult {
    /// Fixed flow identifier, or the conditional flow's own name.
    pub flow: String,
    pub direction: String,
    pub success: bool,
    pub description: String,
    pub met: Vec<RenderableCondition>,
    pub unmet: Vec<RenderableCondition>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableEndpoint {
    pub kind: String,
    pub name: String,
    pub results: Vec<RenderableResult>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderableSummary {
    pub total: u32,
    pub passed: u32,
    pub failed: u32,
}

impl RenderableSummary {
    pub fn of(results: &[RenderableResult]) -> Self {
        let passed = results.iter().filter(|r| r.success).count() as u32;
        let total = results.len() as u32;
        Self {
            total,
            passed,
            failed: total - passed,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableReport {
    pub verdict: RenderableVerdictStatus,
    pub summary: RenderableSummary,
    pub endpoints: Vec<RenderableEndpoint>,
    /// Set when the run failed before validation (configuration or IO error).
    pub error: Option<String>,
}

/// `name (type)` list, or `None` when empty.
pub(crate) fn condition_list(conditions: &[RenderableCondition]) -> String {
    if conditions.is_empty() {
        return "None".to_string();
    }
    conditions
        .iter()
        .map(|c| format!("{} ({})", c.name, c.kind))
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn status_label(success: bool) -> &'static str {
    if success { "✔ Success" } else { "✖ Failed" }
}
