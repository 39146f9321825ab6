//! Rule loading: config text + rules file + preset -> resolved rule set.

use anyhow::Context;
use camino::Utf8Path;
use proxyguard_settings::{Overrides, ProxyguardConfigV1, ResolvedConfig, RuleSource};

/// Everything needed to resolve the rule set.
#[derive(Clone, Debug)]
pub struct RulesInput<'a> {
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// Directory `rules_file` in the config is relative to.
    pub config_dir: &'a Utf8Path,
    /// `--rules`; takes precedence over the config's `rules_file`.
    pub rules_path: Option<&'a Utf8Path>,
    /// `--preset`.
    pub preset: Option<String>,
}

pub fn resolve_rules(input: &RulesInput<'_>) -> anyhow::Result<ResolvedConfig> {
    // Empty config is allowed; defaults apply.
    let cfg = if input.config_text.trim().is_empty() {
        ProxyguardConfigV1::default()
    } else {
        proxyguard_settings::parse_config_toml(input.config_text).context("parse config")?
    };

    let rules_path = match (input.rules_path, cfg.rules_file.as_deref()) {
        (Some(cli), _) => Some(cli.to_path_buf()),
        (None, Some(rel)) => Some(input.config_dir.join(rel)),
        (None, None) => None,
    };

    let rules = match rules_path {
        Some(path) => Some(load_rule_source(&path)?),
        None => None,
    };

    let overrides = Overrides {
        preset: input.preset.clone(),
        rules,
    };
    proxyguard_settings::resolve_config(cfg, overrides).context("resolve config")
}

fn load_rule_source(path: &Utf8Path) -> anyhow::Result<RuleSource> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("read rules file: {path}"))?;
    let document = if path.extension() == Some("toml") {
        proxyguard_settings::parse_rules_toml(&text)
    } else {
        proxyguard_settings::parse_rules_json(&text)
    }
    .with_context(|| format!("parse rules file: {path}"))?;

    Ok(RuleSource {
        origin: path.to_string(),
        document,
    })
}

/// The `rules` use case: the resolved rule set as a pretty JSON rule document.
pub fn run_rules(input: &RulesInput<'_>) -> anyhow::Result<String> {
    let resolved = resolve_rules(input)?;
    let doc = proxyguard_settings::rules_to_document(&resolved.rules);
    serde_json::to_string_pretty(&doc).context("serialize rules")
}
