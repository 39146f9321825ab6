//! Use case orchestration for proxyguard.
//!
//! This crate provides the application layer: use cases that coordinate the domain, bundle,
//! settings, and render layers. It stays thin and delegates to those layers.
//!
//! The CLI crate depends on this; it only handles argument parsing and I/O.

#![forbid(unsafe_code)]

mod check;
mod render;
mod report;
mod rules;

pub use check::{CheckInput, CheckOutput, run_check, verdict_exit_code};
pub use render::{render_html, render_markdown, render_table};
pub use report::{parse_report_json, runtime_error_report, serialize_report, to_renderable};
pub use rules::{RulesInput, resolve_rules, run_rules};
