//! Per-flow validation: apply every rule declared for one flow of one endpoint.

use crate::conditions::{PolicyCatalog, validate_condition_group};
use crate::fingerprint::fingerprint_for_result;
use crate::model::Endpoint;
use crate::rules::RuleSet;
use crate::steps::extract_rule_steps;
use proxyguard_types::{Direction, EndpointKind, FlowName, ValidationResult};
use tracing::debug;

/// Validate one flow of one endpoint against the rules declared for it.
///
/// Directions run `Request` then `Response`; within a direction rules keep declaration
/// order. A missing endpoint or flow yields an empty step list, so its rules are still
/// reported, as failures.
pub fn validate_flow(
    endpoint: Option<&Endpoint>,
    endpoint_name: &str,
    flow_name: FlowName,
    endpoint_kind: EndpointKind,
    catalog: &PolicyCatalog<'_>,
    rules: &RuleSet,
) -> Vec<ValidationResult> {
    let mut out = Vec::new();

    for direction in Direction::ALL {
        for rule in rules.select(endpoint_kind, flow_name, direction) {
            let steps = extract_rule_steps(endpoint, rule);
            let outcome = validate_condition_group(steps, catalog, &rule.group);
            debug!(
                endpoint = endpoint_name,
                flow = rule.conditional_flow_name.as_deref().unwrap_or(flow_name.as_str()),
                direction = direction.as_str(),
                rule = %rule.description,
                steps = steps.len(),
                success = outcome.success,
                "rule evaluated"
            );

            let fingerprint = fingerprint_for_result(
                endpoint_kind.as_str(),
                endpoint_name,
                flow_name.as_str(),
                rule.conditional_flow_name.as_deref(),
                direction.as_str(),
                &rule.description,
                &rule.group,
            );

            out.push(ValidationResult {
                description: rule.description.clone(),
                success: outcome.success,
                met_conditions: outcome.met_conditions,
                unmet_conditions: outcome.unmet_conditions,
                message: outcome.message,
                endpoint_kind,
                endpoint_name: endpoint_name.to_string(),
                flow_name,
                conditional_flow_name: rule.conditional_flow_name.clone(),
                direction,
                fingerprint: Some(fingerprint),
            });
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FixedFlow, Step, StepSlot};
    use crate::rules::ConditionGroup;
    use crate::test_support::{
        auth_policies, conditional_flow, conditional_rule, fixed_flow, proxy, rule, steps,
    };
    use proxyguard_types::Condition;

    fn preflow_endpoint() -> Endpoint {
        proxy("default").with_flow(
            fixed_flow(FixedFlow::PreFlow)
                .with_section(Direction::Request, steps(&["AuthPolicy", "RateLimit"]))
                .with_section(Direction::Response, StepSlot::One(Step::new("RateLimit"))),
        )
    }

    #[test]
    fn results_follow_direction_then_declaration_order() {
        let policies = auth_policies();
        let catalog = PolicyCatalog::new(&policies);
        let rules = RuleSet::new(vec![
            rule(
                EndpointKind::ProxyEndpoint,
                FlowName::PreFlow,
                Direction::Response,
                "response spike arrest",
                ConditionGroup::Single(Condition::policy("SpikeArrest")),
            ),
            rule(
                EndpointKind::ProxyEndpoint,
                FlowName::PreFlow,
                Direction::Request,
                "auth",
                ConditionGroup::AnyOf(vec![Condition::policy("OAuth"), Condition::policy("JWT")]),
            ),
            rule(
                EndpointKind::ProxyEndpoint,
                FlowName::PreFlow,
                Direction::Request,
                "api key",
                ConditionGroup::Single(Condition::policy("APIKey")),
            ),
            rule(
                EndpointKind::ProxyEndpoint,
                FlowName::PostFlow,
                Direction::Request,
                "other flow",
                ConditionGroup::Single(Condition::policy("OAuth")),
            ),
        ])
        .unwrap();

        let ep = preflow_endpoint();
        let results = validate_flow(
            Some(&ep),
            "default",
            FlowName::PreFlow,
            EndpointKind::ProxyEndpoint,
            &catalog,
            &rules,
        );

        let got: Vec<(&str, bool)> = results
            .iter()
            .map(|r| (r.description.as_str(), r.success))
            .collect();
        assert_eq!(
            got,
            vec![("auth", true), ("api key", false), ("response spike arrest", true)]
        );
        assert_eq!(results[1].message, "Conditions not met: APIKey");
        assert!(results.iter().all(|r| r.endpoint_name == "default"));
        assert!(results.iter().all(|r| r.fingerprint.is_some()));
    }

    #[test]
    fn missing_endpoint_reports_every_rule_as_failed() {
        let policies = auth_policies();
        let catalog = PolicyCatalog::new(&policies);
        let rules = RuleSet::new(vec![rule(
            EndpointKind::TargetEndpoint,
            FlowName::PreFlow,
            Direction::Request,
            "target auth",
            ConditionGroup::Single(Condition::policy("OAuth")),
        )])
        .unwrap();

        let results = validate_flow(
            None,
            "default",
            FlowName::PreFlow,
            EndpointKind::TargetEndpoint,
            &catalog,
            &rules,
        );
        assert_eq!(results.len(), 1);
        assert!(!results[0].success);
        assert_eq!(results[0].unmet_conditions, vec![Condition::policy("OAuth")]);
    }

    #[test]
    fn conditional_rules_target_their_named_flow() {
        let policies = auth_policies();
        let catalog = PolicyCatalog::new(&policies);
        let ep = proxy("default")
            .with_flow(
                conditional_flow("getCustomer", None)
                    .with_section(Direction::Request, steps(&["AuthPolicy"])),
            )
            .with_flow(
                conditional_flow("generateOTP", None)
                    .with_section(Direction::Request, steps(&["RateLimit"])),
            );
        let rules = RuleSet::new(vec![
            conditional_rule(
                EndpointKind::ProxyEndpoint,
                "getCustomer",
                Direction::Request,
                "customer auth",
                ConditionGroup::Single(Condition::policy("OAuth")),
            ),
            conditional_rule(
                EndpointKind::ProxyEndpoint,
                "generateOTP",
                Direction::Request,
                "otp auth",
                ConditionGroup::Single(Condition::policy("OAuth")),
            ),
        ])
        .unwrap();

        let results = validate_flow(
            Some(&ep),
            "default",
            FlowName::ConditionalFlow,
            EndpointKind::ProxyEndpoint,
            &catalog,
            &rules,
        );
        assert_eq!(results.len(), 2);
        assert!(results[0].success);
        assert!(!results[1].success);
        assert_eq!(results[1].conditional_flow_name.as_deref(), Some("generateOTP"));
        assert_ne!(results[0].fingerprint, results[1].fingerprint);
    }

    #[test]
    fn rules_sharing_a_description_get_distinct_fingerprints() {
        let policies = auth_policies();
        let catalog = PolicyCatalog::new(&policies);
        let rules = RuleSet::new(vec![
            rule(
                EndpointKind::ProxyEndpoint,
                FlowName::PreFlow,
                Direction::Request,
                "security",
                ConditionGroup::Single(Condition::policy("OAuth")),
            ),
            rule(
                EndpointKind::ProxyEndpoint,
                FlowName::PreFlow,
                Direction::Request,
                "security",
                ConditionGroup::Single(Condition::policy("SpikeArrest")),
            ),
        ])
        .unwrap();

        let ep = preflow_endpoint();
        let results = validate_flow(
            Some(&ep),
            "default",
            FlowName::PreFlow,
            EndpointKind::ProxyEndpoint,
            &catalog,
            &rules,
        );
        assert_eq!(results.len(), 2);
        assert_ne!(results[0].fingerprint, results[1].fingerprint);
    }
}
