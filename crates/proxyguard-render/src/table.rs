use crate::model::{RenderableSummary, condition_list, status_label};
use crate::{RenderableEndpoint, RenderableReport};

const HEADERS: [&str; 6] = ["Flow", "Direction", "Status", "Description", "Met", "Not met"];
const RULE: &str = "══════════════════════════════════════════════════";

/// Plain-text tables, one per endpoint, each followed by its summary, then a final summary.
pub fn render_table(report: &RenderableReport) -> String {
    let mut out = String::new();

    if let Some(err) = &report.error {
        out.push_str(&format!("Error: {err}\n\n"));
    }

    for ep in &report.endpoints {
        out.push_str(&format!("{} : {}\n", ep.kind, ep.name));
        out.push_str(&endpoint_table(ep));
        out.push('\n');
    }

    out.push_str("Final Summary\n");
    out.push_str(RULE);
    out.push('\n');
    out.push_str(&format!("Total Rules Checked: {}\n", report.summary.total));
    out.push_str(&format!("✔ Passed: {}\n", report.summary.passed));
    out.push_str(&format!("✖ Failed: {}\n", report.summary.failed));
    out.push_str(RULE);
    out.push('\n');
    out
}

fn endpoint_table(ep: &RenderableEndpoint) -> String {
    let mut rows: Vec<[String; 6]> = vec![HEADERS.map(str::to_string)];
    for r in &ep.results {
        rows.push([
            r.flow.clone(),
            r.direction.clone(),
            status_label(r.success).to_string(),
            r.description.clone(),
            condition_list(&r.met),
            condition_list(&r.unmet),
        ]);
    }
    let summary = RenderableSummary::of(&ep.results);
    rows.push([
        "Summary".to_string(),
        String::new(),
        String::new(),
        format!("Total Rules: {}", summary.total),
        format!("Passed: {}", summary.passed),
        format!("Failed: {}", summary.failed),
    ]);

    let mut widths = [0usize; 6];
    for row in &rows {
        for (w, c) in widths.iter_mut().zip(row) {
            *w = (*w).max(c.chars().count());
        }
    }

    let border = {
        let parts: Vec<String> = widths.iter().map(|w| "-".repeat(w + 2)).collect();
        format!("+{}+\n", parts.join("+"))
    };

    let mut out = String::new();
    out.push_str(&border);
    let last = rows.len() - 1;
    for (i, row) in rows.iter().enumerate() {
        let cells: Vec<String> = row
            .iter()
            .zip(widths)
            .map(|(c, w)| format!(" {}{} ", c, " ".repeat(w - c.chars().count())))
            .collect();
        out.push_str(&format!("|{}|\n", cells.join("|")));
        if i == 0 || i + 1 == last {
            out.push_str(&border);
        }
    }
    out.push_str(&border);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::{empty_report, sample_report};

    #[test]
    fn renders_one_table_per_endpoint_and_final_summary() {
        let text = render_table(&sample_report());
        assert!(text.contains("ProxyEndpoint : default\n"));
        assert!(text.contains("TargetEndpoint : backend\n"));
        assert!(text.contains("| Flow "));
        assert!(text.contains("| getCustomer "));
        assert!(text.contains("SpikeArrest (Policy)"));
        assert!(text.contains("Total Rules: 2"));
        assert!(text.contains("Total Rules Checked: 2\n✔ Passed: 1\n✖ Failed: 1\n"));
    }

    #[test]
    fn rows_are_aligned() {
        let text = render_table(&sample_report());
        let table: Vec<&str> = text
            .lines()
            .skip_while(|l| !l.starts_with('+'))
            .take_while(|l| l.starts_with('+') || l.starts_with('|'))
            .collect();
        assert!(table.len() >= 6);
        let width = table[0].chars().count();
        assert!(table.iter().all(|l| l.chars().count() == width));
    }

    #[test]
    fn empty_report_still_prints_summary() {
        let text = render_table(&empty_report());
        assert!(text.starts_with("Final Summary"));
        assert!(text.contains("Total Rules Checked: 0"));
    }
}
