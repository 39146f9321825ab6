use crate::RenderableReport;
use crate::model::{condition_list, status_label};

/// Pipes would split a table cell.
fn cell(s: &str) -> String {
    s.replace('|', "\\|")
}

pub fn render_markdown(report: &RenderableReport) -> String {
    let mut out = String::new();

    out.push_str("# Proxyguard report\n\n");
    out.push_str(&format!(
        "- Verdict: **{}**\n- Rules checked: {} ({} passed, {} failed)\n\n",
        report.verdict.label(),
        report.summary.total,
        report.summary.passed,
        report.summary.failed
    ));

    if let Some(err) = &report.error {
        out.push_str(&format!("> Error: {}\n\n", err));
    }

    if report.endpoints.is_empty() {
        out.push_str("No endpoints checked.\n");
        return out;
    }

    for ep in &report.endpoints {
        out.push_str(&format!("## {} `{}`\n\n", ep.kind, ep.name));

        if ep.results.is_empty() {
            out.push_str("No rules apply.\n\n");
            continue;
        }

        out.push_str("| Flow | Direction | Status | Description | Met | Not met |\n");
        out.push_str("|---|---|---|---|---|---|\n");
        for r in &ep.results {
            out.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} |\n",
                cell(&r.flow),
                r.direction,
                status_label(r.success),
                cell(&r.description),
                cell(&condition_list(&r.met)),
                cell(&condition_list(&r.unmet)),
            ));
        }
        out.push('\n');
    }

    out
}
