use crate::convert::rules_from_document;
use crate::model::{ProxyguardConfigV1, RuleDocument};
use crate::presets;
use anyhow::Context;
use proxyguard_domain::rules::RuleSet;
use proxyguard_types::ids::{PRESET_BASELINE, SCHEMA_CONFIG_V1};
use tracing::debug;

/// A rule document plus where it came from (for messages and the report).
#[derive(Clone, Debug, PartialEq)]
pub struct RuleSource {
    pub origin: String,
    pub document: RuleDocument,
}

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub preset: Option<String>,
    /// Rules read by the caller: `--rules`, else the config's `rules_file`.
    pub rules: Option<RuleSource>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub rules: RuleSet,
    /// `file:<origin>`, `inline`, `file:<origin>+inline`, or `preset:<name>`.
    pub rules_source: String,
}

pub fn resolve_config(
    cfg: ProxyguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    if let Some(schema) = cfg.schema.as_deref() {
        if schema != SCHEMA_CONFIG_V1 {
            anyhow::bail!("unsupported config schema: {schema} (expected {SCHEMA_CONFIG_V1})");
        }
    }

    let preset_name = overrides
        .preset
        .clone()
        .or(cfg.preset.clone())
        .unwrap_or_else(|| PRESET_BASELINE.to_string());
    // Unknown presets are rejected even when rules make them irrelevant.
    let preset_doc = presets::preset(&preset_name)?;

    let mut rules = RuleSet::empty();
    let mut sources: Vec<String> = Vec::new();

    if let Some(src) = &overrides.rules {
        let file_rules = rules_from_document(&src.document)
            .with_context(|| format!("invalid rules in {}", src.origin))?;
        rules.extend(file_rules);
        sources.push(format!("file:{}", src.origin));
    }

    if !cfg.flows.is_empty() {
        let inline = RuleDocument { flows: cfg.flows };
        let inline_rules =
            rules_from_document(&inline).context("invalid inline [[flows]] in config")?;
        rules.extend(inline_rules);
        sources.push("inline".to_string());
    }

    if sources.is_empty() {
        rules = rules_from_document(&preset_doc)
            .with_context(|| format!("invalid preset {preset_name}"))?;
        sources.push(format!("preset:{preset_name}"));
    }

    let rules_source = sources.join("+");
    debug!(rules = rules.len(), source = %rules_source, "rule set resolved");

    Ok(ResolvedConfig {
        rules,
        rules_source,
    })
}
