use crate::RenderableReport;
use crate::model::{condition_list, status_label};

const STYLE: &str = "\
    body { font-family: Arial, sans-serif; margin: 20px; }
    table { border-collapse: collapse; width: 100%; margin-bottom: 20px; }
    th, td { border: 1px solid #ddd; padding: 8px; text-align: left; }
    th { background-color: #f2f2f2; }
    .success { color: #28a745; }
    .failure { color: #dc3545; }
    .summary { background-color: #f8f9fa; padding: 15px; border-radius: 5px; margin-top: 20px; }
    .endpoint { color: #007bff; font-size: 1.2em; margin: 15px 0; }
";

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Standalone HTML page: one table per endpoint plus a final summary.
pub fn render_html(report: &RenderableReport) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n  <meta charset=\"utf-8\">\n");
    out.push_str("  <title>Proxyguard validation results</title>\n");
    out.push_str(&format!("  <style>\n{STYLE}  </style>\n</head>\n<body>\n"));
    out.push_str("  <h1>Proxyguard validation results</h1>\n");

    if let Some(err) = &report.error {
        out.push_str(&format!("  <p class=\"failure\">Error: {}</p>\n", escape(err)));
    }

    for ep in &report.endpoints {
        out.push_str(&format!(
            "  <h2 class=\"endpoint\">{} : {}</h2>\n",
            escape(&ep.kind),
            escape(&ep.name)
        ));
        out.push_str("  <table>\n    <tr><th>Flow</th><th>Direction</th><th>Status</th><th>Description</th><th>Met Conditions</th><th>Not Met Conditions</th></tr>\n");
        for r in &ep.results {
            out.push_str(&format!(
                "    <tr><td>{}</td><td>{}</td><td class=\"{}\">{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                escape(&r.flow),
                escape(&r.direction),
                if r.success { "success" } else { "failure" },
                status_label(r.success),
                escape(&r.description),
                escape(&condition_list(&r.met)),
                escape(&condition_list(&r.unmet)),
            ));
        }
        out.push_str("  </table>\n");
    }

    out.push_str("  <div class=\"summary\">\n    <h2>Final Summary</h2>\n");
    out.push_str(&format!(
        "    <p><strong>Verdict:</strong> {}</p>\n",
        report.verdict.label()
    ));
    out.push_str(&format!(
        "    <p><strong>Total Rules Checked:</strong> {}</p>\n",
        report.summary.total
    ));
    out.push_str(&format!(
        "    <p class=\"success\"><strong>✔ Passed:</strong> {}</p>\n",
        report.summary.passed
    ));
    out.push_str(&format!(
        "    <p class=\"failure\"><strong>✖ Failed:</strong> {}</p>\n",
        report.summary.failed
    ));
    out.push_str("  </div>\n</body>\n</html>\n");
    out
}
