//! Rules: the expectations a bundle is checked against.
//!
//! Rules are validated once, when the rule set is built. A broken rule is a
//! configuration problem and is reported as [`RuleError`], never as a failed check.

use proxyguard_types::{Condition, Direction, EndpointKind, FlowName};
use thiserror::Error;

/// One requirement, or an AnyOf/AllOf combination of requirements. Groups do not nest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConditionGroup {
    Single(Condition),
    AnyOf(Vec<Condition>),
    AllOf(Vec<Condition>),
}

impl ConditionGroup {
    /// Leaves in declaration order.
    pub fn leaves(&self) -> &[Condition] {
        match self {
            ConditionGroup::Single(c) => std::slice::from_ref(c),
            ConditionGroup::AnyOf(list) | ConditionGroup::AllOf(list) => list,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.leaves().is_empty()
    }
}

/// Extra selection constraints for a named conditional flow, checked against the
/// methods and path suffixes coarsely inferred from the flow's guard expression.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlowMatch {
    pub methods: Vec<String>,
    pub path_suffixes: Vec<String>,
}

impl FlowMatch {
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty() && self.path_suffixes.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rule {
    pub endpoint_kind: EndpointKind,
    pub flow_name: FlowName,
    pub direction: Direction,
    /// Set iff `flow_name` is `ConditionalFlow`.
    pub conditional_flow_name: Option<String>,
    pub flow_match: Option<FlowMatch>,
    pub description: String,
    pub group: ConditionGroup,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleError {
    #[error("rule '{description}': condition group has no conditions")]
    EmptyGroup { description: String },

    #[error("rule '{description}': ConditionalFlow rules require a conditional flow name")]
    MissingConditionalFlowName { description: String },

    #[error("rule '{description}': conditional flow name is only valid for ConditionalFlow, not {flow}")]
    UnexpectedConditionalFlowName { description: String, flow: FlowName },

    #[error("rule '{description}': methods/path suffixes are only valid for ConditionalFlow, not {flow}")]
    FlowMatchOnFixedFlow { description: String, flow: FlowName },

    #[error("rule '{description}': condition has an empty name")]
    EmptyTarget { description: String },
}

impl Rule {
    /// The conditional flow name is trimmed; lookups compare it verbatim.
    pub fn new(
        endpoint_kind: EndpointKind,
        flow_name: FlowName,
        direction: Direction,
        conditional_flow_name: Option<String>,
        description: impl Into<String>,
        group: ConditionGroup,
    ) -> Result<Self, RuleError> {
        let rule = Rule {
            endpoint_kind,
            flow_name,
            direction,
            conditional_flow_name: conditional_flow_name.map(|n| n.trim().to_string()),
            flow_match: None,
            description: description.into(),
            group,
        };
        rule.validate()?;
        Ok(rule)
    }

    pub fn with_flow_match(mut self, flow_match: FlowMatch) -> Result<Self, RuleError> {
        self.flow_match = (!flow_match.is_empty()).then_some(flow_match);
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), RuleError> {
        let description = || self.description.clone();

        if self.group.is_empty() {
            return Err(RuleError::EmptyGroup {
                description: description(),
            });
        }
        if self.group.leaves().iter().any(|c| c.target.trim().is_empty()) {
            return Err(RuleError::EmptyTarget {
                description: description(),
            });
        }

        let has_name = self
            .conditional_flow_name
            .as_deref()
            .is_some_and(|n| !n.trim().is_empty());
        match (self.flow_name.is_conditional(), has_name) {
            (true, false) => {
                return Err(RuleError::MissingConditionalFlowName {
                    description: description(),
                });
            }
            (false, _) if self.conditional_flow_name.is_some() => {
                return Err(RuleError::UnexpectedConditionalFlowName {
                    description: description(),
                    flow: self.flow_name,
                });
            }
            _ => {}
        }

        if !self.flow_name.is_conditional() && self.flow_match.is_some() {
            return Err(RuleError::FlowMatchOnFixedFlow {
                description: description(),
                flow: self.flow_name,
            });
        }

        Ok(())
    }
}

/// Validated rules in declaration order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Result<Self, RuleError> {
        for rule in &rules {
            rule.validate()?;
        }
        Ok(Self { rules })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules bound to this endpoint kind, flow, and direction, in declaration order.
    pub fn select(
        &self,
        endpoint_kind: EndpointKind,
        flow_name: FlowName,
        direction: Direction,
    ) -> impl Iterator<Item = &Rule> {
        self.rules.iter().filter(move |r| {
            r.endpoint_kind == endpoint_kind && r.flow_name == flow_name && r.direction == direction
        })
    }

    /// Flow names the rule set declares for an endpoint kind, in evaluation order.
    pub fn flow_names_for(&self, endpoint_kind: EndpointKind) -> Vec<FlowName> {
        FlowName::ALL
            .into_iter()
            .filter(|flow| {
                self.rules
                    .iter()
                    .any(|r| r.endpoint_kind == endpoint_kind && r.flow_name == *flow)
            })
            .collect()
    }

    /// Concatenate, keeping `self`'s rules first.
    pub fn extend(&mut self, other: RuleSet) {
        self.rules.extend(other.rules);
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(name: &str) -> ConditionGroup {
        ConditionGroup::Single(Condition::policy(name))
    }

    #[test]
    fn conditional_flow_requires_a_name() {
        let err = Rule::new(
            EndpointKind::ProxyEndpoint,
            FlowName::ConditionalFlow,
            Direction::Request,
            None,
            "auth on getCustomer",
            single("OAuthV2"),
        )
        .unwrap_err();
        assert!(matches!(err, RuleError::MissingConditionalFlowName { .. }));

        let err = Rule::new(
            EndpointKind::ProxyEndpoint,
            FlowName::ConditionalFlow,
            Direction::Request,
            Some("  ".to_string()),
            "blank name",
            single("OAuthV2"),
        )
        .unwrap_err();
        assert!(matches!(err, RuleError::MissingConditionalFlowName { .. }));
    }

    #[test]
    fn conditional_flow_name_is_trimmed() {
        let rule = Rule::new(
            EndpointKind::ProxyEndpoint,
            FlowName::ConditionalFlow,
            Direction::Request,
            Some(" getCustomer ".to_string()),
            "padded name",
            single("OAuthV2"),
        )
        .unwrap();
        assert_eq!(rule.conditional_flow_name.as_deref(), Some("getCustomer"));
    }

    #[test]
    fn fixed_flow_rejects_a_conditional_name() {
        let err = Rule::new(
            EndpointKind::TargetEndpoint,
            FlowName::PreFlow,
            Direction::Request,
            Some("getCustomer".to_string()),
            "misplaced",
            single("OAuthV2"),
        )
        .unwrap_err();
        assert_eq!(
            err,
            RuleError::UnexpectedConditionalFlowName {
                description: "misplaced".to_string(),
                flow: FlowName::PreFlow,
            }
        );
        assert!(err.to_string().contains("not PreFlow"));
    }

    #[test]
    fn empty_groups_and_blank_targets_are_rejected() {
        for group in [ConditionGroup::AnyOf(vec![]), ConditionGroup::AllOf(vec![])] {
            let err = Rule::new(
                EndpointKind::ProxyEndpoint,
                FlowName::PreFlow,
                Direction::Request,
                None,
                "empty",
                group,
            )
            .unwrap_err();
            assert!(matches!(err, RuleError::EmptyGroup { .. }));
        }

        let err = Rule::new(
            EndpointKind::ProxyEndpoint,
            FlowName::PreFlow,
            Direction::Request,
            None,
            "blank",
            ConditionGroup::AnyOf(vec![Condition::policy("OAuthV2"), Condition::policy(" ")]),
        )
        .unwrap_err();
        assert!(matches!(err, RuleError::EmptyTarget { .. }));
    }

    #[test]
    fn flow_match_only_on_conditional_flows() {
        let rule = Rule::new(
            EndpointKind::ProxyEndpoint,
            FlowName::PostFlow,
            Direction::Response,
            None,
            "logging",
            single("MessageLogging"),
        )
        .unwrap();
        let err = rule
            .with_flow_match(FlowMatch {
                methods: vec!["GET".to_string()],
                path_suffixes: vec![],
            })
            .unwrap_err();
        assert!(matches!(err, RuleError::FlowMatchOnFixedFlow { .. }));

        // An empty match is dropped rather than rejected.
        let rule = Rule::new(
            EndpointKind::ProxyEndpoint,
            FlowName::PostFlow,
            Direction::Response,
            None,
            "logging",
            single("MessageLogging"),
        )
        .unwrap()
        .with_flow_match(FlowMatch::default())
        .unwrap();
        assert!(rule.flow_match.is_none());
    }

    #[test]
    fn rule_set_rejects_hand_built_invalid_rules() {
        let bad = Rule {
            endpoint_kind: EndpointKind::ProxyEndpoint,
            flow_name: FlowName::ConditionalFlow,
            direction: Direction::Request,
            conditional_flow_name: None,
            flow_match: None,
            description: "hand built".to_string(),
            group: single("OAuthV2"),
        };
        assert!(RuleSet::new(vec![bad]).is_err());
    }

    #[test]
    fn flow_names_follow_evaluation_order() {
        let rules = RuleSet::new(vec![
            Rule::new(
                EndpointKind::ProxyEndpoint,
                FlowName::ConditionalFlow,
                Direction::Request,
                Some("getCustomer".to_string()),
                "a",
                single("OAuthV2"),
            )
            .unwrap(),
            Rule::new(
                EndpointKind::ProxyEndpoint,
                FlowName::PreFlow,
                Direction::Response,
                None,
                "b",
                single("AssignMessage"),
            )
            .unwrap(),
            Rule::new(
                EndpointKind::TargetEndpoint,
                FlowName::PostFlow,
                Direction::Request,
                None,
                "c",
                single("AssignMessage"),
            )
            .unwrap(),
        ])
        .unwrap();

        assert_eq!(
            rules.flow_names_for(EndpointKind::ProxyEndpoint),
            vec![FlowName::PreFlow, FlowName::ConditionalFlow]
        );
        assert_eq!(
            rules.flow_names_for(EndpointKind::TargetEndpoint),
            vec![FlowName::PostFlow]
        );
        assert_eq!(
            rules
                .select(EndpointKind::ProxyEndpoint, FlowName::PreFlow, Direction::Response)
                .count(),
            1
        );
    }
}
