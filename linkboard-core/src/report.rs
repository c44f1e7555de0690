// Report rendering for the grouped and flat views

use crate::view::{FlatView, GroupedView, MountPoint};
use linkboard_fetch::LinkRecord;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use url::Url;

const CSV_HEADER: &str =
    "parent,url,response_code,response_reason,content_type,size,duration,start_url,date\n";

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
    Csv,
    Html,
    Markdown,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "csv" => Some(ReportFormat::Csv),
            "html" => Some(ReportFormat::Html),
            "markdown" | "md" => Some(ReportFormat::Markdown),
            _ => None,
        }
    }
}

pub fn render_grouped(view: &GroupedView, format: ReportFormat) -> Result<String, serde_json::Error> {
    Ok(match format {
        ReportFormat::Text => generate_grouped_text_report(view),
        ReportFormat::Json => generate_json_report(view.mount_point(), view)?,
        ReportFormat::Csv => generate_grouped_csv_report(view),
        ReportFormat::Html => generate_grouped_html_report(view),
        ReportFormat::Markdown => generate_grouped_markdown_report(view),
    })
}

pub fn render_flat(view: &FlatView, format: ReportFormat) -> Result<String, serde_json::Error> {
    Ok(match format {
        ReportFormat::Text => generate_flat_text_report(view),
        ReportFormat::Json => generate_json_report(view.mount_point(), view)?,
        ReportFormat::Csv => generate_flat_csv_report(view),
        ReportFormat::Html => generate_flat_html_report(view),
        ReportFormat::Markdown => generate_flat_markdown_report(view),
    })
}

pub fn generate_grouped_text_report(view: &GroupedView) -> String {
    let mut report = String::new();

    push_header(&mut report, "BROKEN LINKS BY PARENT PAGE", view.mount_point());
    report.push_str(&format!("Total links:  {}\n", view.links().len()));
    report.push_str(&format!("Grouped:      {}\n", view.groups().link_count()));
    report.push_str(&format!("Parents:      {}\n", view.parents().len()));
    if view.ungrouped_count() > 0 {
        report.push_str(&format!("Ungrouped:    {} (no parent page)\n", view.ungrouped_count()));
    }
    report.push('\n');

    if view.groups().is_empty() {
        report.push_str("No links with a parent page.\n\n");
    }

    for entry in view.summary() {
        report.push_str(RULE);
        report.push('\n');
        report.push_str(&format!("## {}\n", entry.parent));
        report.push_str(&format!("  {} link{}\n\n", entry.links.len(), plural(entry.links.len())));

        for link in entry.links {
            report.push_str(&format!("  {}\n", text_line(link)));
        }
        report.push('\n');
    }

    push_footer(&mut report);
    report
}

pub fn generate_flat_text_report(view: &FlatView) -> String {
    let mut report = String::new();

    push_header(&mut report, "LINKS", view.mount_point());
    report.push_str(&format!("Total links:  {}\n\n", view.links().len()));

    if view.links().is_empty() {
        report.push_str("No links.\n\n");
    } else {
        report.push_str(RULE);
        report.push('\n');
        for link in view.links() {
            report.push_str(&format!("  {}\n", text_line(link)));
            if let Some(parent) = link.parent_key() {
                report.push_str(&format!("      found on {}\n", parent));
            }
        }
        report.push('\n');
    }

    push_footer(&mut report);
    report
}

pub fn generate_json_report<V: Serialize>(mount: MountPoint, view: &V) -> Result<String, serde_json::Error> {
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "linkboard",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "format": "json"
            },
            "mount": mount,
            "view": view
        }
    });

    serde_json::to_string_pretty(&json_report)
}

pub fn generate_grouped_markdown_report(view: &GroupedView) -> String {
    let mut report = String::new();

    report.push_str("# Broken links by parent page\n\n");
    report.push_str(&format!("- **Total links:** {}\n", view.links().len()));
    report.push_str(&format!("- **Parents:** {}\n", view.parents().len()));
    report.push_str(&format!("- **Ungrouped:** {}\n\n", view.ungrouped_count()));

    for entry in view.summary() {
        report.push_str(&format!("## {}\n\n", escape_markdown(entry.parent)));
        push_markdown_table(&mut report, entry.links);
        report.push('\n');
    }

    report
}

pub fn generate_flat_markdown_report(view: &FlatView) -> String {
    let mut report = String::new();

    report.push_str("# Links\n\n");
    report.push_str(&format!("- **Total links:** {}\n\n", view.links().len()));

    if !view.links().is_empty() {
        push_markdown_table(&mut report, view.links());
    }

    report
}

pub fn generate_grouped_html_report(view: &GroupedView) -> String {
    let mut body = String::new();

    body.push_str(&format!(
        "    <p>{} links, {} parent pages</p>\n",
        view.links().len(),
        view.parents().len()
    ));

    for entry in view.summary() {
        body.push_str("    <section>\n");
        body.push_str(&format!("      <h2>{}</h2>\n", escape_html(entry.parent)));
        push_html_list(&mut body, entry.links, "      ");
        body.push_str("    </section>\n");
    }

    html_document("Broken links", view.mount_point(), &body)
}

pub fn generate_flat_html_report(view: &FlatView) -> String {
    let mut body = String::new();

    body.push_str(&format!("    <p>{} links</p>\n", view.links().len()));
    push_html_list(&mut body, view.links(), "    ");

    html_document("Links", view.mount_point(), &body)
}

pub fn generate_grouped_csv_report(view: &GroupedView) -> String {
    let mut report = String::from(CSV_HEADER);
    for (_, links) in view.groups().iter() {
        for link in links {
            push_csv_row(&mut report, link);
        }
    }
    report
}

pub fn generate_flat_csv_report(view: &FlatView) -> String {
    let mut report = String::from(CSV_HEADER);
    for link in view.links() {
        push_csv_row(&mut report, link);
    }
    report
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

// Helper functions

fn push_header(report: &mut String, title: &str, mount: MountPoint) {
    report.push_str(RULE);
    report.push('\n');
    report.push_str(&format!("{:^80}\n", title));
    report.push_str(RULE);
    report.push_str("\n\n");
    report.push_str(&format!("View:         {}\n", mount));
}

fn push_footer(report: &mut String) {
    report.push_str(RULE);
    report.push('\n');
    report.push_str("Generated by linkboard\n");
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}

fn status_indicator(code: Option<u16>) -> &'static str {
    match code {
        Some(200..=299) => "✓",
        Some(300..=399) => "→",
        Some(400..=499) => "⚠",
        Some(500..=599) => "✗",
        _ => "?",
    }
}

fn status_label(code: Option<u16>) -> String {
    code.map(|c| c.to_string()).unwrap_or_else(|| "---".to_string())
}

fn link_target(link: &LinkRecord) -> &str {
    link.url().unwrap_or("(no url)")
}

fn text_line(link: &LinkRecord) -> String {
    let code = link.response_code();
    let mut line = format!("{} {} {}", status_indicator(code), status_label(code), link_target(link));
    if let Some(reason) = link.response_reason() {
        line.push_str(&format!("  ({})", reason));
    }
    line
}

fn push_markdown_table(report: &mut String, links: &[LinkRecord]) {
    report.push_str("| Status | URL | Reason | Type | Size | Time | Checked |\n");
    report.push_str("|--------|-----|--------|------|------|------|---------|\n");
    for link in links {
        report.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} |\n",
            status_label(link.response_code()),
            escape_markdown(link_target(link)),
            escape_markdown(link.response_reason().unwrap_or("")),
            escape_markdown(link.content_type().unwrap_or("")),
            link.size().map(|s| format!("{} B", s)).unwrap_or_default(),
            link.duration().map(|d| format!("{:.2}s", d)).unwrap_or_default(),
            escape_markdown(link.date().unwrap_or("")),
        ));
    }
}

fn escape_markdown(text: &str) -> String {
    text.replace('|', "\\|")
}

fn html_document(title: &str, mount: MountPoint, body: &str) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    html.push_str("  <meta charset=\"utf-8\">\n");
    html.push_str(&format!("  <title>{}</title>\n", escape_html(title)));
    html.push_str("</head>\n<body>\n");
    html.push_str(&format!("  <div id=\"{}\">\n", mount.id()));
    html.push_str(&format!("    <h1>{}</h1>\n", escape_html(title)));
    html.push_str(body);
    html.push_str("  </div>\n</body>\n</html>\n");
    html
}

fn push_html_list(body: &mut String, links: &[LinkRecord], indent: &str) {
    body.push_str(&format!("{}<ul>\n", indent));
    for link in links {
        let target = escape_html(link_target(link));
        // Only web URLs become anchors
        let target = if link.url().is_some_and(is_web_url) {
            format!("<a href=\"{}\">{}</a>", target, target)
        } else {
            target
        };
        let reason = link
            .response_reason()
            .map(|r| format!(" {}", escape_html(r)))
            .unwrap_or_default();
        body.push_str(&format!(
            "{}  <li><code>{}</code> {}{}</li>\n",
            indent,
            status_label(link.response_code()),
            target,
            reason
        ));
    }
    body.push_str(&format!("{}</ul>\n", indent));
}

fn is_web_url(url: &str) -> bool {
    Url::parse(url).is_ok_and(|u| matches!(u.scheme(), "http" | "https"))
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn push_csv_row(report: &mut String, link: &LinkRecord) {
    let code = link.response_code().map(|c| c.to_string()).unwrap_or_default();
    let size = link.size().map(|s| s.to_string()).unwrap_or_default();
    let duration = link.duration().map(|d| d.to_string()).unwrap_or_default();
    let fields = [
        link.parent.as_deref().unwrap_or(""),
        link.url().unwrap_or(""),
        code.as_str(),
        link.response_reason().unwrap_or(""),
        link.content_type().unwrap_or(""),
        size.as_str(),
        duration.as_str(),
        link.start_url().unwrap_or(""),
        link.date().unwrap_or(""),
    ]
    .iter()
    .map(|field| escape_csv(field))
    .collect::<Vec<_>>()
    .join(",");

    report.push_str(&fields);
    report.push('\n');
}

fn escape_csv(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
