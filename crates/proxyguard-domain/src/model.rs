use proxyguard_types::{Direction, EndpointKind, FlowName};

/// A loaded proxy bundle: policy catalog plus endpoint trees.
///
/// `proxies`/`targets` are optional so "the bundle had no such directory" survives
/// loading; the engine treats `None` and an empty list the same way.
#[derive(Clone, Debug, Default)]
pub struct BundleModel {
    pub policies: Vec<PolicyDefinition>,
    pub proxies: Option<Vec<Endpoint>>,
    pub targets: Option<Vec<Endpoint>>,
}

impl BundleModel {
    pub fn endpoints(&self, kind: EndpointKind) -> &[Endpoint] {
        let list = match kind {
            EndpointKind::ProxyEndpoint => &self.proxies,
            EndpointKind::TargetEndpoint => &self.targets,
        };
        list.as_deref().unwrap_or(&[])
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PolicyDefinition {
    pub name: String,
    /// Policy kind, i.e. the root element of the policy file (`OAuthV2`, `FlowCallout`, ...).
    pub category: String,
    /// Raw attribute text; see [`PolicyDefinition::is_enabled`].
    pub enabled: Option<String>,
    pub continue_on_error: Option<String>,
    /// Shared flow bundle invoked by this policy (flow callouts only).
    pub shared_flow_reference: Option<String>,
}

impl PolicyDefinition {
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            ..Self::default()
        }
    }

    pub fn flow_callout(name: impl Into<String>, shared_flow: impl Into<String>) -> Self {
        Self {
            shared_flow_reference: Some(shared_flow.into()),
            ..Self::new(name, "FlowCallout")
        }
    }

    /// Policies are enabled unless the attribute says `false`.
    pub fn is_enabled(&self) -> bool {
        !matches!(flag(&self.enabled), Some(false))
    }

    pub fn continues_on_error(&self) -> bool {
        matches!(flag(&self.continue_on_error), Some(true))
    }
}

fn flag(raw: &Option<String>) -> Option<bool> {
    let v = raw.as_deref()?.trim();
    if v.eq_ignore_ascii_case("true") {
        Some(true)
    } else if v.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// A policy invocation inside a flow section.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Step {
    /// Name of the referenced policy.
    pub name: String,
    /// Guard expression; recorded, never evaluated.
    pub condition: Option<String>,
}

impl Step {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            condition: None,
        }
    }
}

/// The `Step` value of one flow direction, as the markup converter produced it.
///
/// Zero, one, or many children serialize differently; [`crate::steps::normalize`] is the
/// single place that turns these shapes into a slice.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum StepSlot {
    #[default]
    Absent,
    /// Element present but without step children (`""` or stray text).
    Text(String),
    One(Step),
    Many(Vec<Step>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FixedFlow {
    PreFlow,
    PostFlow,
    PostClientFlow,
}

impl FixedFlow {
    pub const ALL: [FixedFlow; 3] = [
        FixedFlow::PreFlow,
        FixedFlow::PostFlow,
        FixedFlow::PostClientFlow,
    ];

    pub fn from_flow_name(flow: FlowName) -> Option<Self> {
        match flow {
            FlowName::PreFlow => Some(FixedFlow::PreFlow),
            FlowName::PostFlow => Some(FixedFlow::PostFlow),
            FlowName::PostClientFlow => Some(FixedFlow::PostClientFlow),
            FlowName::ConditionalFlow => None,
        }
    }

    pub fn flow_name(self) -> FlowName {
        match self {
            FixedFlow::PreFlow => FlowName::PreFlow,
            FixedFlow::PostFlow => FlowName::PostFlow,
            FixedFlow::PostClientFlow => FlowName::PostClientFlow,
        }
    }

    pub fn as_str(self) -> &'static str {
        self.flow_name().as_str()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlowKind {
    Fixed(FixedFlow),
    Conditional,
}

/// A processing stage. Fixed flows are named by their identifier; conditional flows
/// carry their own name plus the guard used for routing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Flow {
    pub name: String,
    pub kind: FlowKind,
    pub condition: Option<String>,
    pub request: StepSlot,
    pub response: StepSlot,
}

impl Flow {
    pub fn fixed(flow: FixedFlow) -> Self {
        Self {
            name: flow.as_str().to_string(),
            kind: FlowKind::Fixed(flow),
            condition: None,
            request: StepSlot::Absent,
            response: StepSlot::Absent,
        }
    }

    pub fn conditional(name: impl Into<String>, condition: Option<String>) -> Self {
        Self {
            name: name.into(),
            kind: FlowKind::Conditional,
            condition,
            request: StepSlot::Absent,
            response: StepSlot::Absent,
        }
    }

    pub fn with_section(mut self, direction: Direction, slot: StepSlot) -> Self {
        match direction {
            Direction::Request => self.request = slot,
            Direction::Response => self.response = slot,
        }
        self
    }

    pub fn section(&self, direction: Direction) -> &StepSlot {
        match direction {
            Direction::Request => &self.request,
            Direction::Response => &self.response,
        }
    }

    pub fn is_conditional(&self) -> bool {
        self.kind == FlowKind::Conditional
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    pub kind: EndpointKind,
    pub name: String,
    pub flows: Vec<Flow>,
}

impl Endpoint {
    pub fn new(kind: EndpointKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            flows: Vec::new(),
        }
    }

    pub fn with_flow(mut self, flow: Flow) -> Self {
        self.flows.push(flow);
        self
    }

    pub fn fixed_flow(&self, fixed: FixedFlow) -> Option<&Flow> {
        self.flows.iter().find(|f| f.kind == FlowKind::Fixed(fixed))
    }

    /// First conditional flow with this exact name.
    pub fn conditional_flow(&self, name: &str) -> Option<&Flow> {
        self.conditional_flows().find(|f| f.name == name)
    }

    pub fn conditional_flows(&self) -> impl Iterator<Item = &Flow> {
        self.flows.iter().filter(|f| f.is_conditional())
    }
}
