//! Pure flow/condition evaluation (no IO).
//!
//! Input: a bundle model and a rule set constructed elsewhere.
//! Output: per-endpoint validation results + summary + verdict.

#![forbid(unsafe_code)]

pub mod conditions;
pub mod flow;
pub mod guard;
pub mod model;
pub mod report;
pub mod rules;
pub mod steps;

mod engine;
mod fingerprint;

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;

pub use conditions::{
    GroupOutcome, PolicyCatalog, is_condition_met, matching_step, validate_condition_group,
    validate_conditions,
};
pub use engine::evaluate;
pub use flow::validate_flow;
pub use rules::{ConditionGroup, FlowMatch, Rule, RuleError, RuleSet};
pub use steps::{extract_rule_steps, extract_steps};
