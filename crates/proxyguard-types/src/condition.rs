use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a leaf condition looks for in a flow.
///
/// The two capabilities match differently: `Policy` compares the policy *category*
/// (its root element), `SharedFlow` compares the shared flow bundle a callout policy
/// references.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Capability {
    Policy,
    SharedFlow,
}

impl Capability {
    pub fn as_str(self) -> &'static str {
        match self {
            Capability::Policy => "Policy",
            Capability::SharedFlow => "SharedFlow",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Leaf condition: `{ "type": "Policy", "name": "OAuthV2" }` in rule files.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Condition {
    #[serde(rename = "type")]
    pub capability: Capability,
    #[serde(rename = "name")]
    pub target: String,
}

impl Condition {
    pub fn policy(category: impl Into<String>) -> Self {
        Self {
            capability: Capability::Policy,
            target: category.into(),
        }
    }

    pub fn shared_flow(bundle: impl Into<String>) -> Self {
        Self {
            capability: Capability::SharedFlow,
            target: bundle.into(),
        }
    }
}

/// `name (type)`, the form used in tables and annotations.
impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.target, self.capability)
    }
}
