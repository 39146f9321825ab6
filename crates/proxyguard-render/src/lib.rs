//! Rendering utilities for human-facing surfaces (Markdown, terminal tables, HTML).

#![forbid(unsafe_code)]

mod html;
mod markdown;
mod model;
mod table;

pub use html::render_html;
pub use markdown::render_markdown;
pub use model::{
    RenderableCondition, RenderableEndpoint, RenderableReport, RenderableResult,
    RenderableSummary, RenderableVerdictStatus,
};
pub use table::render_table;
