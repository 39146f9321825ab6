//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - AnyOf/AllOf combinators versus per-leaf evaluation
//! - Outcome messages and met/unmet partitioning
//! - Step-shape normalization
//! - Summary and verdict derivation

use crate::conditions::{
    PolicyCatalog, is_condition_met, validate_condition_group, validate_conditions,
};
use crate::engine::evaluate;
use crate::model::{BundleModel, FixedFlow, PolicyDefinition, Step, StepSlot};
use crate::rules::{ConditionGroup, RuleSet};
use crate::steps::normalize;
use crate::test_support::{fixed_flow, policy, proxy, rule};
use proptest::prelude::*;
use proxyguard_types::{Condition, Direction, EndpointKind, FlowName, Verdict};

// ============================================================================
// Strategies
// ============================================================================

const CATEGORIES: [&str; 5] = ["OAuthV2", "VerifyAPIKey", "SpikeArrest", "FlowCallout", "Quota"];
const SHARED_FLOWS: [&str; 3] = ["access-auth-sharedflow", "logging-sharedflow", "cors-sharedflow"];

/// A fixed catalog: one policy per category plus one callout per shared flow.
fn catalog_policies() -> Vec<PolicyDefinition> {
    let mut out: Vec<PolicyDefinition> = CATEGORIES
        .iter()
        .map(|c| policy(&format!("P-{c}"), c, None))
        .collect();
    out.extend(
        SHARED_FLOWS
            .iter()
            .map(|sf| policy(&format!("FC-{sf}"), "FlowCallout", Some(sf))),
    );
    out
}

/// Step names drawn from the catalog plus references to policies that do not exist.
fn arb_steps() -> impl Strategy<Value = Vec<Step>> {
    let names: Vec<String> = catalog_policies()
        .into_iter()
        .map(|p| p.name)
        .chain(["Ghost".to_string(), "Missing".to_string()])
        .collect();
    prop::collection::vec(prop::sample::select(names).prop_map(Step::new), 0..8)
}

fn arb_condition() -> impl Strategy<Value = Condition> {
    prop_oneof![
        prop::sample::select(CATEGORIES.to_vec()).prop_map(Condition::policy),
        Just(Condition::policy("NotACategory")),
        prop::sample::select(SHARED_FLOWS.to_vec()).prop_map(Condition::shared_flow),
        Just(Condition::shared_flow("unknown-sharedflow")),
    ]
}

fn arb_leaves() -> impl Strategy<Value = Vec<Condition>> {
    prop::collection::vec(arb_condition(), 1..6)
}

fn arb_group() -> impl Strategy<Value = ConditionGroup> {
    prop_oneof![
        arb_condition().prop_map(ConditionGroup::Single),
        arb_leaves().prop_map(ConditionGroup::AnyOf),
        arb_leaves().prop_map(ConditionGroup::AllOf),
    ]
}

// ============================================================================
// Property tests: combinators
// ============================================================================

proptest! {
    /// AllOf succeeds exactly when every leaf succeeds on its own.
    #[test]
    fn all_of_matches_per_leaf_conjunction(steps in arb_steps(), leaves in arb_leaves()) {
        let policies = catalog_policies();
        let catalog = PolicyCatalog::new(&policies);

        let expected = leaves.iter().all(|c| is_condition_met(&steps, &catalog, c));
        let out = validate_condition_group(&steps, &catalog, &ConditionGroup::AllOf(leaves));
        prop_assert_eq!(out.success, expected);
    }

    /// AnyOf succeeds exactly when some leaf succeeds on its own.
    #[test]
    fn any_of_matches_per_leaf_disjunction(steps in arb_steps(), leaves in arb_leaves()) {
        let policies = catalog_policies();
        let catalog = PolicyCatalog::new(&policies);

        let expected = leaves.iter().any(|c| is_condition_met(&steps, &catalog, c));
        let out = validate_condition_group(&steps, &catalog, &ConditionGroup::AnyOf(leaves));
        prop_assert_eq!(out.success, expected);
    }

    /// met and unmet partition the leaves, each keeping the group's order.
    #[test]
    fn met_and_unmet_partition_leaves(steps in arb_steps(), group in arb_group()) {
        let policies = catalog_policies();
        let catalog = PolicyCatalog::new(&policies);
        let out = validate_condition_group(&steps, &catalog, &group);

        prop_assert_eq!(
            out.met_conditions.len() + out.unmet_conditions.len(),
            group.leaves().len()
        );

        let mut met = out.met_conditions.iter();
        let mut unmet = out.unmet_conditions.iter();
        for leaf in group.leaves() {
            let next = if is_condition_met(&steps, &catalog, leaf) {
                met.next()
            } else {
                unmet.next()
            };
            prop_assert_eq!(next, Some(leaf));
        }
    }

    /// The message lists met targets on success and unmet targets on failure.
    #[test]
    fn message_format_follows_outcome(steps in arb_steps(), group in arb_group()) {
        let policies = catalog_policies();
        let catalog = PolicyCatalog::new(&policies);
        let out = validate_condition_group(&steps, &catalog, &group);

        let (prefix, list) = if out.success {
            ("Conditions met: ", &out.met_conditions)
        } else {
            ("Conditions not met: ", &out.unmet_conditions)
        };
        let names: Vec<&str> = list.iter().map(|c| c.target.as_str()).collect();
        prop_assert_eq!(out.message, format!("{prefix}{}", names.join(", ")));
    }

    /// No steps means no condition can be met.
    #[test]
    fn empty_steps_fail_every_group(group in arb_group()) {
        let policies = catalog_policies();
        let catalog = PolicyCatalog::new(&policies);
        let out = validate_condition_group(&[], &catalog, &group);
        prop_assert!(!out.success);
        prop_assert!(out.met_conditions.is_empty());
    }

    /// One outcome per group, in order; no groups, no outcomes.
    #[test]
    fn validate_conditions_is_a_map(
        steps in arb_steps(),
        groups in prop::collection::vec(arb_group(), 0..6),
    ) {
        let policies = catalog_policies();
        let catalog = PolicyCatalog::new(&policies);
        let all = validate_conditions(&steps, &catalog, &groups);
        prop_assert_eq!(all.len(), groups.len());
        for (outcome, group) in all.iter().zip(&groups) {
            prop_assert_eq!(outcome, &validate_condition_group(&steps, &catalog, group));
        }
    }
}

// ============================================================================
// Property tests: normalization
// ============================================================================

proptest! {
    /// Wrapping a normalized sequence and normalizing again is a no-op.
    #[test]
    fn normalization_is_idempotent(steps in arb_steps()) {
        let slot = StepSlot::Many(steps.clone());
        let once = normalize(&slot).to_vec();
        let twice = normalize(&StepSlot::Many(once.clone())).to_vec();
        prop_assert_eq!(&once, &steps);
        prop_assert_eq!(once, twice);
    }

    /// A lone record and a one-element sequence are the same step list.
    #[test]
    fn single_record_equals_singleton_sequence(name in "[A-Za-z][A-Za-z0-9-]{0,15}") {
        let one = StepSlot::One(Step::new(name.clone()));
        let many = StepSlot::Many(vec![Step::new(name)]);
        prop_assert_eq!(normalize(&one), normalize(&many));
    }

    /// Stray text never yields steps.
    #[test]
    fn text_slot_is_empty(text in ".{0,16}") {
        prop_assert!(normalize(&StepSlot::Text(text)).is_empty());
    }
}

// ============================================================================
// Property tests: summary and verdict
// ============================================================================

proptest! {
    /// Summary counts equal a scan of emitted results; verdict follows failures.
    #[test]
    fn summary_matches_emitted_results(
        endpoint_steps in prop::collection::vec(arb_steps(), 0..6),
        groups in prop::collection::vec(arb_group(), 0..5),
    ) {
        let bundle = BundleModel {
            policies: catalog_policies(),
            proxies: Some(
                endpoint_steps
                    .into_iter()
                    .enumerate()
                    .map(|(i, steps)| {
                        proxy(&format!("ep-{i}")).with_flow(
                            fixed_flow(FixedFlow::PreFlow)
                                .with_section(Direction::Request, StepSlot::Many(steps)),
                        )
                    })
                    .collect(),
            ),
            targets: None,
        };
        let rules = RuleSet::new(
            groups
                .into_iter()
                .enumerate()
                .map(|(i, g)| {
                    rule(
                        EndpointKind::ProxyEndpoint,
                        FlowName::PreFlow,
                        Direction::Request,
                        &format!("rule {i}"),
                        g,
                    )
                })
                .collect(),
        )
        .unwrap();

        let report = evaluate(Some(&bundle), &rules);
        let results: Vec<_> = report.endpoints.iter().flat_map(|e| &e.results).collect();
        let passed = results.iter().filter(|r| r.success).count() as u32;

        prop_assert_eq!(report.summary.total, results.len() as u32);
        prop_assert_eq!(report.summary.passed, passed);
        prop_assert_eq!(report.summary.failed, results.len() as u32 - passed);
        prop_assert_eq!(
            report.verdict,
            if report.summary.failed == 0 { Verdict::Pass } else { Verdict::Fail }
        );
    }
}
