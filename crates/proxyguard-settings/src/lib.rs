//! Config parsing, rule documents, and preset resolution.
//!
//! This crate is IO-free: it parses and resolves configuration provided as strings.

#![forbid(unsafe_code)]

mod convert;
mod model;
mod presets;
mod resolve;

pub use convert::{rules_from_document, rules_to_document};
pub use model::{ConditionConfig, FlowRuleConfig, LeafConfig, ProxyguardConfigV1, RuleDocument};
pub use presets::{PRESET_NAMES, preset};
pub use resolve::{Overrides, ResolvedConfig, RuleSource};

/// Parse `proxyguard.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<ProxyguardConfigV1> {
    let cfg: ProxyguardConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Parse a JSON rule document (`{ "flows": [...] }`).
pub fn parse_rules_json(input: &str) -> anyhow::Result<RuleDocument> {
    let doc: RuleDocument = serde_json::from_str(input)?;
    Ok(doc)
}

/// Parse a TOML rule document (`[[flows]]` tables).
pub fn parse_rules_toml(input: &str) -> anyhow::Result<RuleDocument> {
    let doc: RuleDocument = toml::from_str(input)?;
    Ok(doc)
}

/// Resolve the rule set handed to the engine (rules file + inline rules + preset).
pub fn resolve_config(
    cfg: ProxyguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}
