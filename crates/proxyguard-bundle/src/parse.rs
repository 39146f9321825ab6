//! Converted-tree parsing: JSON values shaped like `xml2js` output -> domain model.
//!
//! Shape rules of the converter: attributes live under `"$"`, text-only elements become
//! strings, elements with attributes and text become `{ "_": text, "$": {...} }`,
//! repeated children become arrays, empty elements become `""`.

use anyhow::{Context, bail};
use proxyguard_domain::model::{Endpoint, FixedFlow, Flow, PolicyDefinition, Step, StepSlot};
use proxyguard_types::{Direction, EndpointKind, ids};
use serde_json::{Map, Value};
use tracing::warn;

const ATTRS: &str = "$";
const TEXT: &str = "_";

/// Text content of an element, whether it converted to a string or to `{ "_": ... }`.
fn text(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) => Some(s.as_str()),
        Value::Object(map) => map.get(TEXT).and_then(Value::as_str),
        _ => None,
    }
}

fn attr<'a>(element: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    element.get(ATTRS)?.get(key)?.as_str()
}

fn non_empty(s: Option<&str>) -> Option<String> {
    s.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

/// The single `{ "<Root>": body }` entry of a converted file.
fn root_element(value: &Value) -> anyhow::Result<(&str, &Value)> {
    let map = value.as_object().context("expected a JSON object")?;
    let mut entries = map.iter();
    match (entries.next(), entries.next()) {
        (Some((tag, body)), None) => Ok((tag.as_str(), body)),
        (None, _) => bail!("expected one root element, found none"),
        (Some(_), Some(_)) => bail!("expected one root element, found {}", map.len()),
    }
}

/// Policy from a converted policy file. The root tag is the category.
pub fn parse_policy_tree(value: &Value, fallback_name: &str) -> anyhow::Result<PolicyDefinition> {
    let (category, body) = root_element(value)?;
    let empty = Map::new();
    let element = body.as_object().unwrap_or(&empty);

    let name = non_empty(attr(element, "name")).unwrap_or_else(|| fallback_name.to_string());
    let shared_flow_reference = if category == "FlowCallout" {
        non_empty(element.get("SharedFlowBundle").and_then(text))
    } else {
        None
    };

    Ok(PolicyDefinition {
        name,
        category: category.to_string(),
        enabled: attr(element, "enabled").map(str::to_string),
        continue_on_error: attr(element, "continueOnError").map(str::to_string),
        shared_flow_reference,
    })
}

/// Policy from an already-flattened record:
/// `{ "type", "name", "enabled"?, "continueOnError"?, "SharedFlowBundle"? }`.
pub fn parse_policy_record(record: &Map<String, Value>) -> anyhow::Result<PolicyDefinition> {
    let category = record
        .get("type")
        .and_then(Value::as_str)
        .context("policy record without a string `type`")?;
    let name = record
        .get("name")
        .and_then(Value::as_str)
        .context("policy record without a string `name`")?;
    let field = |key: &str| record.get(key).and_then(text).map(str::to_string);

    Ok(PolicyDefinition {
        name: name.to_string(),
        category: category.to_string(),
        enabled: field("enabled"),
        continue_on_error: field("continueOnError"),
        shared_flow_reference: non_empty(record.get("SharedFlowBundle").and_then(text)),
    })
}

/// Either policy shape: flattened records carry a string `type`.
pub fn parse_policy(value: &Value, fallback_name: &str) -> anyhow::Result<PolicyDefinition> {
    match value.as_object() {
        Some(record) if record.get("type").is_some_and(Value::is_string) => {
            parse_policy_record(record)
        }
        _ => parse_policy_tree(value, fallback_name),
    }
}

/// Endpoint from a converted `ProxyEndpoint`/`TargetEndpoint` file.
///
/// `kind` comes from the collection the tree was found in; a root tag naming the other
/// kind is logged and otherwise ignored.
pub fn parse_endpoint(
    value: &Value,
    kind: EndpointKind,
    fallback_name: &str,
) -> anyhow::Result<Endpoint> {
    let (tag, body) = root_element(value)?;
    if tag != kind.as_str() {
        warn!(expected = kind.as_str(), found = tag, "unexpected endpoint root element");
    }

    let empty = Map::new();
    let element = body.as_object().unwrap_or(&empty);
    let name = non_empty(attr(element, "name")).unwrap_or_else(|| fallback_name.to_string());
    let mut endpoint = Endpoint::new(kind, name);

    for fixed in FixedFlow::ALL {
        if let Some(flow) = element.get(fixed.as_str()) {
            endpoint = endpoint.with_flow(with_sections(Flow::fixed(fixed), flow));
        }
    }

    if let Some(flows) = element.get("Flows") {
        for (index, flow) in children(flows, "Flow").into_iter().enumerate() {
            let flow_element = flow.as_object();
            let Some(flow_name) = flow_element.and_then(|f| non_empty(attr(f, "name"))) else {
                warn!(endpoint = %endpoint.name, index, "skipping conditional flow without a name");
                continue;
            };
            let condition = flow_element
                .and_then(|f| f.get("Condition"))
                .and_then(text)
                .map(str::to_string);
            endpoint = endpoint.with_flow(with_sections(Flow::conditional(flow_name, condition), flow));
        }
    }

    Ok(endpoint)
}

/// `parent.<tag>` as a list: absent -> `[]`, one -> `[one]`, many -> many.
fn children<'a>(parent: &'a Value, tag: &str) -> Vec<&'a Value> {
    match parent.get(tag) {
        None => Vec::new(),
        Some(Value::Array(items)) => items.iter().collect(),
        Some(one) => vec![one],
    }
}

fn with_sections(mut flow: Flow, element: &Value) -> Flow {
    for direction in Direction::ALL {
        let slot = element
            .get(direction.as_str())
            .map(step_slot)
            .unwrap_or_default();
        flow = flow.with_section(direction, slot);
    }
    flow
}

/// Keep the converter's zero/one/many distinction; normalization happens in the domain.
fn step_slot(section: &Value) -> StepSlot {
    let Some(step) = section.get("Step") else {
        return match section {
            Value::String(s) => StepSlot::Text(s.clone()),
            _ => StepSlot::Absent,
        };
    };
    match step {
        Value::Array(items) => StepSlot::Many(items.iter().filter_map(parse_step).collect()),
        Value::String(s) => StepSlot::Text(s.clone()),
        other => parse_step(other).map(StepSlot::One).unwrap_or_default(),
    }
}

fn parse_step(value: &Value) -> Option<Step> {
    let element = value.as_object()?;
    let name = element.get("Name").and_then(text)?.trim().to_string();
    let condition = element
        .get("Condition")
        .and_then(text)
        .map(str::to_string);
    Some(Step { name, condition })
}

/// Name used when a tree carries no `name` attribute: the file stem, else `default`.
pub fn fallback_name(stem: Option<&str>) -> String {
    stem.filter(|s| !s.is_empty())
        .unwrap_or(ids::DEFAULT_ENDPOINT_NAME)
        .to_string()
}
