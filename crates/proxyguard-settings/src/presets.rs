use crate::model::{ConditionConfig, FlowRuleConfig, LeafConfig, RuleDocument};
use proxyguard_types::ids::{PRESET_BASELINE, PRESET_NONE};

pub const PRESET_NAMES: [&str; 2] = [PRESET_BASELINE, PRESET_NONE];

/// Built-in rule documents, used when no rules are configured.
///
/// Keep these small and readable. Anything bundle-specific belongs in a rules file.
pub fn preset(name: &str) -> anyhow::Result<RuleDocument> {
    match name {
        PRESET_BASELINE => Ok(baseline()),
        PRESET_NONE => Ok(RuleDocument::default()),
        other => anyhow::bail!("unknown preset: {other} (expected baseline|none)"),
    }
}

fn baseline() -> RuleDocument {
    RuleDocument {
        flows: vec![
            FlowRuleConfig {
                endpoint: "ProxyEndpoint".to_string(),
                flow: "PreFlow".to_string(),
                direction: "Request".to_string(),
                conditions: vec![
                    ConditionConfig {
                        description: "Authentication policy or shared flow in the proxy PreFlow"
                            .to_string(),
                        any_of: Some(vec![
                            LeafConfig::new("Policy", "OAuthV2"),
                            LeafConfig::new("Policy", "VerifyAPIKey"),
                            LeafConfig::new("Policy", "VerifyJWT"),
                            LeafConfig::new("SharedFlow", "access-auth-sharedflow"),
                        ]),
                        ..ConditionConfig::default()
                    },
                    ConditionConfig {
                        description: "Spike arrest in the proxy PreFlow".to_string(),
                        capability: Some("Policy".to_string()),
                        name: Some("SpikeArrest".to_string()),
                        ..ConditionConfig::default()
                    },
                ],
                ..FlowRuleConfig::default()
            },
            FlowRuleConfig {
                endpoint: "ProxyEndpoint".to_string(),
                flow: "PostClientFlow".to_string(),
                direction: "Response".to_string(),
                conditions: vec![ConditionConfig {
                    description: "Message logging in the proxy PostClientFlow".to_string(),
                    any_of: Some(vec![
                        LeafConfig::new("Policy", "MessageLogging"),
                        LeafConfig::new("SharedFlow", "logging-sharedflow"),
                    ]),
                    ..ConditionConfig::default()
                }],
                ..FlowRuleConfig::default()
            },
        ],
    }
}
