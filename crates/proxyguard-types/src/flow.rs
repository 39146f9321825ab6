use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of the proxy an endpoint configures.
///
/// Serialized with the gateway's own element names so rule files read naturally.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub enum EndpointKind {
    ProxyEndpoint,
    TargetEndpoint,
}

impl EndpointKind {
    pub const ALL: [EndpointKind; 2] = [EndpointKind::ProxyEndpoint, EndpointKind::TargetEndpoint];

    pub fn as_str(self) -> &'static str {
        match self {
            EndpointKind::ProxyEndpoint => "ProxyEndpoint",
            EndpointKind::TargetEndpoint => "TargetEndpoint",
        }
    }
}

/// Flow selector used by rules.
///
/// `ConditionalFlow` stands for "a named conditional flow"; the name travels separately.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub enum FlowName {
    PreFlow,
    PostFlow,
    PostClientFlow,
    ConditionalFlow,
}

impl FlowName {
    /// Evaluation order used by the bundle validator.
    pub const ALL: [FlowName; 4] = [
        FlowName::PreFlow,
        FlowName::PostFlow,
        FlowName::PostClientFlow,
        FlowName::ConditionalFlow,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FlowName::PreFlow => "PreFlow",
            FlowName::PostFlow => "PostFlow",
            FlowName::PostClientFlow => "PostClientFlow",
            FlowName::ConditionalFlow => "ConditionalFlow",
        }
    }

    pub fn is_conditional(self) -> bool {
        self == FlowName::ConditionalFlow
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub enum Direction {
    Request,
    Response,
}

impl Direction {
    /// Canonical processing order.
    pub const ALL: [Direction; 2] = [Direction::Request, Direction::Response];

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Request => "Request",
            Direction::Response => "Response",
        }
    }
}

impl fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for FlowName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enums_use_gateway_spelling_on_the_wire() {
        assert_eq!(
            serde_json::to_string(&EndpointKind::TargetEndpoint).unwrap(),
            "\"TargetEndpoint\""
        );
        assert_eq!(
            serde_json::from_str::<FlowName>("\"PostClientFlow\"").unwrap(),
            FlowName::PostClientFlow
        );
        assert_eq!(
            serde_json::from_str::<Direction>("\"Response\"").unwrap(),
            Direction::Response
        );
        assert!(serde_json::from_str::<Direction>("\"response\"").is_err());
    }

    #[test]
    fn canonical_orders() {
        assert_eq!(Direction::ALL, [Direction::Request, Direction::Response]);
        assert_eq!(FlowName::ALL[0], FlowName::PreFlow);
        assert_eq!(FlowName::ALL[3], FlowName::ConditionalFlow);
        assert!(FlowName::ConditionalFlow.is_conditional());
        assert!(!FlowName::PostFlow.is_conditional());
    }
}
