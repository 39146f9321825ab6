//! Leaf and group condition evaluation.

use crate::model::{PolicyDefinition, Step};
use crate::rules::ConditionGroup;
use proxyguard_types::{Capability, Condition, ids};
use std::collections::HashMap;
use tracing::debug;

/// Name -> policy lookup, built once per bundle.
///
/// Policy names are unique within a bundle; if a duplicate slips through, the first
/// definition wins.
#[derive(Clone, Debug, Default)]
pub struct PolicyCatalog<'a> {
    by_name: HashMap<&'a str, &'a PolicyDefinition>,
}

impl<'a> PolicyCatalog<'a> {
    pub fn new(policies: &'a [PolicyDefinition]) -> Self {
        let mut by_name = HashMap::with_capacity(policies.len());
        for p in policies {
            by_name.entry(p.name.as_str()).or_insert(p);
        }
        Self { by_name }
    }

    pub fn get(&self, name: &str) -> Option<&'a PolicyDefinition> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

fn satisfies(policy: &PolicyDefinition, condition: &Condition) -> bool {
    match condition.capability {
        Capability::Policy => policy.category == condition.target,
        Capability::SharedFlow => {
            policy.shared_flow_reference.as_deref() == Some(condition.target.as_str())
        }
    }
}

/// First step whose policy satisfies `condition`.
///
/// Steps that reference no known policy are skipped.
pub fn matching_step<'s>(
    steps: &'s [Step],
    catalog: &PolicyCatalog<'_>,
    condition: &Condition,
) -> Option<&'s Step> {
    steps.iter().find(|step| {
        catalog
            .get(&step.name)
            .is_some_and(|policy| satisfies(policy, condition))
    })
}

/// `Policy`: some step runs a policy of that category.
/// `SharedFlow`: some step runs a policy that calls that shared flow bundle.
pub fn is_condition_met(steps: &[Step], catalog: &PolicyCatalog<'_>, condition: &Condition) -> bool {
    matching_step(steps, catalog, condition).is_some()
}

/// Result of evaluating one condition group. Partitions keep the group's leaf order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupOutcome {
    pub success: bool,
    pub met_conditions: Vec<Condition>,
    pub unmet_conditions: Vec<Condition>,
    pub message: String,
}

pub fn validate_condition_group(
    steps: &[Step],
    catalog: &PolicyCatalog<'_>,
    group: &ConditionGroup,
) -> GroupOutcome {
    let (met, unmet): (Vec<&Condition>, Vec<&Condition>) = group
        .leaves()
        .iter()
        .partition(|c| {
            let step = matching_step(steps, catalog, c);
            debug!(
                capability = c.capability.as_str(),
                target = %c.target,
                step = step.map(|s| s.name.as_str()),
                "leaf evaluated"
            );
            step.is_some()
        });

    let success = match group {
        ConditionGroup::Single(_) | ConditionGroup::AllOf(_) => unmet.is_empty(),
        ConditionGroup::AnyOf(_) => !met.is_empty(),
    };

    let met_conditions: Vec<Condition> = met.into_iter().cloned().collect();
    let unmet_conditions: Vec<Condition> = unmet.into_iter().cloned().collect();
    let message = outcome_message(success, &met_conditions, &unmet_conditions);

    GroupOutcome {
        success,
        met_conditions,
        unmet_conditions,
        message,
    }
}

/// One outcome per group, in input order. No groups, no outcomes.
pub fn validate_conditions(
    steps: &[Step],
    catalog: &PolicyCatalog<'_>,
    groups: &[ConditionGroup],
) -> Vec<GroupOutcome> {
    groups
        .iter()
        .map(|g| validate_condition_group(steps, catalog, g))
        .collect()
}

/// `Conditions met: A, B` on success, `Conditions not met: C` on failure.
pub fn outcome_message(success: bool, met: &[Condition], unmet: &[Condition]) -> String {
    let (prefix, list) = if success {
        (ids::MESSAGE_CONDITIONS_MET, met)
    } else {
        (ids::MESSAGE_CONDITIONS_NOT_MET, unmet)
    };
    let names: Vec<&str> = list.iter().map(|c| c.target.as_str()).collect();
    format!("{prefix}{}", names.join(", "))
}
