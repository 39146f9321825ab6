use crate::model::{Endpoint, FixedFlow, Flow, PolicyDefinition, Step, StepSlot};
use crate::rules::{ConditionGroup, Rule};
use proxyguard_types::{Direction, EndpointKind, FlowName};

pub fn proxy(name: &str) -> Endpoint {
    Endpoint::new(EndpointKind::ProxyEndpoint, name)
}

pub fn target(name: &str) -> Endpoint {
    Endpoint::new(EndpointKind::TargetEndpoint, name)
}

pub fn fixed_flow(flow: FixedFlow) -> Flow {
    Flow::fixed(flow)
}

pub fn conditional_flow(name: &str, condition: Option<&str>) -> Flow {
    Flow::conditional(name, condition.map(str::to_string))
}

pub fn guarded_step(name: &str, condition: &str) -> Step {
    Step {
        name: name.to_string(),
        condition: Some(condition.to_string()),
    }
}

pub fn steps(names: &[&str]) -> StepSlot {
    StepSlot::Many(names.iter().map(|n| Step::new(*n)).collect())
}

pub fn policy(name: &str, category: &str, shared_flow: Option<&str>) -> PolicyDefinition {
    PolicyDefinition {
        shared_flow_reference: shared_flow.map(str::to_string),
        ..PolicyDefinition::new(name, category)
    }
}

/// `AuthPolicy` is an OAuth policy, `RateLimit` a spike arrest.
pub fn auth_policies() -> Vec<PolicyDefinition> {
    vec![
        policy("AuthPolicy", "OAuth", None),
        policy("RateLimit", "SpikeArrest", None),
    ]
}

pub fn rule(
    kind: EndpointKind,
    flow: FlowName,
    direction: Direction,
    description: &str,
    group: ConditionGroup,
) -> Rule {
    Rule::new(kind, flow, direction, None, description, group).expect("valid rule")
}

pub fn conditional_rule(
    kind: EndpointKind,
    flow_name: &str,
    direction: Direction,
    description: &str,
    group: ConditionGroup,
) -> Rule {
    Rule::new(
        kind,
        FlowName::ConditionalFlow,
        direction,
        Some(flow_name.to_string()),
        description,
        group,
    )
    .expect("valid rule")
}
