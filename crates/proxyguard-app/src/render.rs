//! Render use cases: Markdown, text tables, and HTML from in-memory reports.

use proxyguard_render::RenderableReport;

pub fn render_markdown(report: &RenderableReport) -> String {
    proxyguard_render::render_markdown(report)
}

pub fn render_table(report: &RenderableReport) -> String {
    proxyguard_render::render_table(report)
}

pub fn render_html(report: &RenderableReport) -> String {
    proxyguard_render::render_html(report)
}
