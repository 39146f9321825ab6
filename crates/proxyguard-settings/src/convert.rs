use crate::model::{ConditionConfig, FlowRuleConfig, LeafConfig, RuleDocument};
use anyhow::{Context, bail};
use proxyguard_domain::rules::{ConditionGroup, FlowMatch, Rule, RuleSet};
use proxyguard_types::{Capability, Condition, Direction, EndpointKind, FlowName};

/// Turn a rule document into validated rules: one rule per condition, entries in order.
pub fn rules_from_document(doc: &RuleDocument) -> anyhow::Result<RuleSet> {
    let mut rules = Vec::new();
    for (index, entry) in doc.flows.iter().enumerate() {
        let converted = entry_rules(entry).with_context(|| {
            format!(
                "flow entry {index} ({} {} {})",
                entry.endpoint, entry.flow, entry.direction
            )
        })?;
        rules.extend(converted);
    }
    Ok(RuleSet::new(rules)?)
}

fn entry_rules(entry: &FlowRuleConfig) -> anyhow::Result<Vec<Rule>> {
    let endpoint_kind = parse_endpoint(&entry.endpoint)?;
    let flow_name = parse_flow(&entry.flow)?;
    let direction = parse_direction(&entry.direction)?;

    if entry.conditions.is_empty() {
        bail!("flow entry has no conditions");
    }

    let flow_match = FlowMatch {
        methods: entry.methods.clone(),
        path_suffixes: entry.path_suffixes.clone(),
    };

    entry
        .conditions
        .iter()
        .enumerate()
        .map(|(i, c)| -> anyhow::Result<Rule> {
            let group = parse_group(c).with_context(|| {
                format!("condition {i} ('{}')", c.description)
            })?;
            let description = describe(c, &group);
            let rule = Rule::new(
                endpoint_kind,
                flow_name,
                direction,
                entry.conditional_flow_name.clone(),
                description,
                group,
            )?
            .with_flow_match(flow_match.clone())?;
            Ok(rule)
        })
        .collect()
}

/// The written description, or the condition names when it is blank.
fn describe(c: &ConditionConfig, group: &ConditionGroup) -> String {
    if !c.description.trim().is_empty() {
        return c.description.clone();
    }
    group
        .leaves()
        .iter()
        .map(|leaf| leaf.target.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn parse_group(c: &ConditionConfig) -> anyhow::Result<ConditionGroup> {
    let has_leaf = c.capability.is_some() || c.name.is_some();
    match (&c.any_of, &c.all_of) {
        (Some(_), Some(_)) => bail!("condition has both anyOf and allOf"),
        (Some(_), None) | (None, Some(_)) if has_leaf => {
            bail!("condition mixes a group with type/name")
        }
        (Some(list), None) => Ok(ConditionGroup::AnyOf(parse_leaves(list)?)),
        (None, Some(list)) => Ok(ConditionGroup::AllOf(parse_leaves(list)?)),
        (None, None) => Ok(ConditionGroup::Single(parse_leaf(
            c.capability.as_deref(),
            c.name.as_deref(),
        )?)),
    }
}

fn parse_leaves(list: &[LeafConfig]) -> anyhow::Result<Vec<Condition>> {
    list.iter()
        .enumerate()
        .map(|(i, leaf)| {
            parse_leaf(leaf.capability.as_deref(), leaf.name.as_deref())
                .with_context(|| format!("leaf {i}"))
        })
        .collect()
}

fn parse_leaf(capability: Option<&str>, name: Option<&str>) -> anyhow::Result<Condition> {
    let (Some(capability), Some(name)) = (capability, name) else {
        bail!("condition needs both `type` and `name` (or an anyOf/allOf group)");
    };
    let capability = parse_capability(capability)?;
    Ok(Condition {
        capability,
        target: name.to_string(),
    })
}

fn parse_capability(v: &str) -> anyhow::Result<Capability> {
    match v {
        "Policy" => Ok(Capability::Policy),
        "SharedFlow" => Ok(Capability::SharedFlow),
        other => bail!("unknown condition type: {other} (expected Policy|SharedFlow)"),
    }
}

fn parse_endpoint(v: &str) -> anyhow::Result<EndpointKind> {
    EndpointKind::ALL
        .into_iter()
        .find(|k| k.as_str() == v)
        .with_context(|| format!("unknown endpoint: {v} (expected ProxyEndpoint|TargetEndpoint)"))
}

fn parse_flow(v: &str) -> anyhow::Result<FlowName> {
    FlowName::ALL
        .into_iter()
        .find(|f| f.as_str() == v)
        .with_context(|| {
            format!("unknown flow: {v} (expected PreFlow|PostFlow|PostClientFlow|ConditionalFlow)")
        })
}

fn parse_direction(v: &str) -> anyhow::Result<Direction> {
    Direction::ALL
        .into_iter()
        .find(|d| d.as_str() == v)
        .with_context(|| format!("unknown direction: {v} (expected Request|Response)"))
}

/// Inverse of [`rules_from_document`]: consecutive rules that share a location and flow
/// match are folded back into one flow entry.
pub fn rules_to_document(rules: &RuleSet) -> RuleDocument {
    let mut flows: Vec<FlowRuleConfig> = Vec::new();
    let mut last: Option<&Rule> = None;

    for rule in rules {
        let condition = condition_config(rule);
        match (last, flows.last_mut()) {
            (Some(prev), Some(entry)) if same_location(prev, rule) => {
                entry.conditions.push(condition);
            }
            _ => {
                let flow_match = rule.flow_match.clone().unwrap_or_default();
                flows.push(FlowRuleConfig {
                    endpoint: rule.endpoint_kind.as_str().to_string(),
                    flow: rule.flow_name.as_str().to_string(),
                    direction: rule.direction.as_str().to_string(),
                    conditional_flow_name: rule.conditional_flow_name.clone(),
                    methods: flow_match.methods,
                    path_suffixes: flow_match.path_suffixes,
                    conditions: vec![condition],
                });
            }
        }
        last = Some(rule);
    }

    RuleDocument { flows }
}

fn same_location(a: &Rule, b: &Rule) -> bool {
    a.endpoint_kind == b.endpoint_kind
        && a.flow_name == b.flow_name
        && a.direction == b.direction
        && a.conditional_flow_name == b.conditional_flow_name
        && a.flow_match == b.flow_match
}

fn leaf_config(c: &Condition) -> LeafConfig {
    LeafConfig::new(c.capability.as_str(), &c.target)
}

fn condition_config(rule: &Rule) -> ConditionConfig {
    let description = rule.description.clone();
    match &rule.group {
        ConditionGroup::Single(c) => ConditionConfig {
            description,
            capability: Some(c.capability.as_str().to_string()),
            name: Some(c.target.clone()),
            ..ConditionConfig::default()
        },
        ConditionGroup::AnyOf(list) => ConditionConfig {
            description,
            any_of: Some(list.iter().map(leaf_config).collect()),
            ..ConditionConfig::default()
        },
        ConditionGroup::AllOf(list) => ConditionConfig {
            description,
            all_of: Some(list.iter().map(leaf_config).collect()),
            ..ConditionConfig::default()
        },
    }
}
