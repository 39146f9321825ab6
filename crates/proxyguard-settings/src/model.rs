use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// `proxyguard.toml` schema v1.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ProxyguardConfigV1 {
    /// Optional schema string for tooling (`proxyguard.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Built-in rule set used when no rules are configured: `baseline` (default) or `none`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,

    /// Rule document (JSON or TOML), relative to the config file's directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules_file: Option<String>,

    /// Inline rules, appended after the rules file.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flows: Vec<FlowRuleConfig>,
}

/// A standalone rule document: `rules.json` or a TOML file of `[[flows]]`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RuleDocument {
    #[serde(default)]
    pub flows: Vec<FlowRuleConfig>,
}

/// One flow entry: where to look, and the conditions that must hold there.
///
/// Enum-valued fields stay strings here so errors can name the offending entry.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlowRuleConfig {
    /// `ProxyEndpoint` or `TargetEndpoint`.
    pub endpoint: String,
    /// `PreFlow`, `PostFlow`, `PostClientFlow`, or `ConditionalFlow`.
    pub flow: String,
    /// `Request` or `Response`.
    pub direction: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional_flow_name: Option<String>,

    /// HTTP methods the conditional flow's guard must mention.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<String>,

    /// Path suffixes the conditional flow's guard must mention.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path_suffixes: Vec<String>,

    #[serde(default)]
    pub conditions: Vec<ConditionConfig>,
}

/// A described condition: either a single leaf (`type` + `name`) or an `anyOf`/`allOf` group.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConditionConfig {
    /// Defaults to the condition names when omitted.
    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub any_of: Option<Vec<LeafConfig>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_of: Option<Vec<LeafConfig>>,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub capability: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LeafConfig {
    /// `Policy` or `SharedFlow`.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub capability: Option<String>,

    /// Policy category, or shared flow bundle name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl LeafConfig {
    pub fn new(capability: &str, name: &str) -> Self {
        Self {
            capability: Some(capability.to_string()),
            name: Some(name.to_string()),
        }
    }
}
