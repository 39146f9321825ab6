//! Step extraction: endpoint + flow + direction -> ordered steps.
//!
//! All tolerance for the converter's "zero, one, or many children" encodings lives here.
//! Missing endpoints, flows, and directions are not errors; they extract as no steps.

use crate::guard::GuardHints;
use crate::model::{Endpoint, FixedFlow, Step, StepSlot};
use crate::rules::Rule;
use proxyguard_types::{Direction, FlowName};
use tracing::{debug, warn};

/// Normalize a raw `Step` value: absent or text -> `[]`, one record -> `[record]`,
/// many -> unchanged.
pub fn normalize(slot: &StepSlot) -> &[Step] {
    match slot {
        StepSlot::Absent | StepSlot::Text(_) => &[],
        StepSlot::One(step) => std::slice::from_ref(step),
        StepSlot::Many(steps) => steps,
    }
}

/// Steps executed in `flow_name`/`direction` of `endpoint`.
///
/// For `ConditionalFlow` the flow is looked up by `conditional_flow_name`; no name, or no
/// flow with that name, extracts as empty.
pub fn extract_steps<'a>(
    endpoint: Option<&'a Endpoint>,
    flow_name: FlowName,
    direction: Direction,
    conditional_flow_name: Option<&str>,
) -> &'a [Step] {
    let Some(endpoint) = endpoint else {
        return &[];
    };

    let flow = match FixedFlow::from_flow_name(flow_name) {
        Some(fixed) => endpoint.fixed_flow(fixed),
        None => conditional_flow_name.and_then(|name| endpoint.conditional_flow(name)),
    };

    flow.map(|f| normalize(f.section(direction))).unwrap_or(&[])
}

/// Steps a rule applies to, honouring its optional guard-based flow match.
pub fn extract_rule_steps<'a>(endpoint: Option<&'a Endpoint>, rule: &Rule) -> &'a [Step] {
    let steps = extract_steps(
        endpoint,
        rule.flow_name,
        rule.direction,
        rule.conditional_flow_name.as_deref(),
    );

    let Some(flow_match) = &rule.flow_match else {
        return steps;
    };

    let guard = endpoint
        .zip(rule.conditional_flow_name.as_deref())
        .and_then(|(e, name)| e.conditional_flow(name))
        .and_then(|f| f.condition.as_deref());
    let hints = guard.map(GuardHints::infer).unwrap_or_default();
    if let Some(expr) = guard {
        if hints.is_empty() {
            warn!(guard = expr, "no verb or path suffix recognised in conditional flow guard");
        }
    }

    if flow_match.accepts(&hints) {
        steps
    } else {
        debug!(
            flow = rule.conditional_flow_name.as_deref().unwrap_or_default(),
            guard = guard.unwrap_or_default(),
            "conditional flow guard does not match rule; treating flow as absent"
        );
        &[]
    }
}
