use crate::rules::ConditionGroup;
use sha2::{Digest, Sha256};

/// Stable SHA-256 fingerprint for one validation result.
///
/// Identity fields, in order:
/// - endpoint kind and name
/// - flow name
/// - conditional flow name (empty for fixed flows)
/// - direction
/// - rule description
/// - group kind (`single`, `anyOf`, `allOf`) and each leaf as `capability:target`
///
/// Every field is length-prefixed, so separators inside a value cannot collide.
pub fn fingerprint_for_result(
    endpoint_kind: &str,
    endpoint_name: &str,
    flow: &str,
    conditional_flow: Option<&str>,
    direction: &str,
    description: &str,
    group: &ConditionGroup,
) -> String {
    let group_kind = match group {
        ConditionGroup::Single(_) => "single",
        ConditionGroup::AnyOf(_) => "anyOf",
        ConditionGroup::AllOf(_) => "allOf",
    };

    let mut hasher = Sha256::new();
    let mut field = |value: &str| {
        hasher.update(value.len().to_string().as_bytes());
        hasher.update(b":");
        hasher.update(value.as_bytes());
    };
    field(endpoint_kind);
    field(endpoint_name);
    field(flow);
    field(conditional_flow.unwrap_or(""));
    field(direction);
    field(description);
    field(group_kind);
    for leaf in group.leaves() {
        field(leaf.capability.as_str());
        field(&leaf.target);
    }

    hex::encode(hasher.finalize())
}
