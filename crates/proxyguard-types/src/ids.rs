//! Stable identifiers shared by the engine, the renderers, and the CLI.

pub const TOOL_NAME: &str = "proxyguard";

/// Schema tag accepted in `proxyguard.toml`.
pub const SCHEMA_CONFIG_V1: &str = "proxyguard.config.v1";

// Message prefixes. Downstream reporting parses these, keep them byte-stable.
pub const MESSAGE_CONDITIONS_MET: &str = "Conditions met: ";
pub const MESSAGE_CONDITIONS_NOT_MET: &str = "Conditions not met: ";

// Built-in rule presets.
pub const PRESET_BASELINE: &str = "baseline";
pub const PRESET_NONE: &str = "none";

// Endpoint name used when the endpoint tree carries no `name` attribute.
pub const DEFAULT_ENDPOINT_NAME: &str = "default";
