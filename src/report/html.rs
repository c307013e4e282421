use std::fmt::Write as _;

use chrono::{DateTime, FixedOffset};

use super::{EndpointSummary, ExchangeSummary};
use crate::error::ReportError;

const STYLE: &str = "body { font-family: monospace; margin: 2em; }\n\
table { border-collapse: collapse; margin-bottom: 2em; }\n\
th, td { border: 1px solid #999; padding: 4px 10px; text-align: right; }\n\
th:first-child, td:first-child { text-align: left; }\n\
.best-value { color: #1a7f37; }\n\
.worst-value { color: #cf222e; }\n\
.no-data { color: #888; }";

fn write_line(output: &mut String, line: &str) -> Result<(), ReportError> {
    writeln!(output, "{}", line).map_err(|source| ReportError::Format { source })
}

pub(super) fn escape(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn endpoint_cell(endpoint: Option<&EndpointSummary>, class: &str) -> String {
    endpoint.map_or_else(
        || "<td class=\"no-data\">-</td>".to_owned(),
        |endpoint| {
            format!(
                "<td><span class=\"{}\">{} ({:.2} ms)</span></td>",
                class,
                escape(&endpoint.endpoint),
                endpoint.stats.mean
            )
        },
    )
}

pub(super) fn render(
    summaries: &[ExchangeSummary],
    percentile: f64,
    generated_at: DateTime<FixedOffset>,
) -> Result<String, ReportError> {
    let mut out = String::new();
    write_line(&mut out, "<!DOCTYPE html>")?;
    write_line(&mut out, "<html>")?;
    write_line(&mut out, "<head>")?;
    write_line(&mut out, "<meta charset=\"UTF-8\">")?;
    write_line(&mut out, "<title>API Latency Summary Report</title>")?;
    write_line(&mut out, &format!("<style>\n{}\n</style>", STYLE))?;
    write_line(&mut out, "</head>")?;
    write_line(&mut out, "<body>")?;
    write_line(&mut out, "<h1>API Latency Summary Report</h1>")?;
    write_line(
        &mut out,
        &format!(
            "<p class=\"timestamp\">Generated on: {}</p>",
            generated_at.format("%Y-%m-%d %H:%M:%S %:z")
        ),
    )?;

    write_line(&mut out, "<h2>Comparison Summary</h2>")?;
    write_line(&mut out, "<table>")?;
    write_line(
        &mut out,
        &format!(
            "<tr><th>Exchange</th><th>Samples</th><th>Mean (ms)</th><th>P{} (ms)</th><th>Best Endpoint</th><th>Worst Endpoint</th></tr>",
            percentile
        ),
    )?;
    for summary in summaries {
        let label = escape(&summary.label);
        let row = match &summary.stats {
            Some(stats) => format!(
                "<tr><td>{}</td><td>{}</td><td>{:.2}</td><td>{:.2}</td>{}{}</tr>",
                label,
                stats.count,
                stats.mean,
                stats.tail.value_ms,
                endpoint_cell(summary.best_endpoint(), "best-value"),
                endpoint_cell(summary.worst_endpoint(), "worst-value"),
            ),
            None => format!(
                "<tr><td>{}</td><td class=\"no-data\" colspan=\"5\">no data</td></tr>",
                label
            ),
        };
        write_line(&mut out, &row)?;
    }
    write_line(&mut out, "</table>")?;

    for summary in summaries.iter().filter(|summary| !summary.endpoints.is_empty()) {
        write_line(
            &mut out,
            &format!("<h2>{} Endpoints</h2>", escape(&summary.label)),
        )?;
        write_line(&mut out, "<table>")?;
        write_line(
            &mut out,
            "<tr><th>Endpoint</th><th>Samples</th><th>Mean (ms)</th><th>Min (ms)</th><th>Max (ms)</th></tr>",
        )?;
        for endpoint in &summary.endpoints {
            write_line(
                &mut out,
                &format!(
                    "<tr><td>{}</td><td>{}</td><td>{:.2}</td><td>{:.2}</td><td>{:.2}</td></tr>",
                    escape(&endpoint.endpoint),
                    endpoint.stats.count,
                    endpoint.stats.mean,
                    endpoint.stats.min,
                    endpoint.stats.max
                ),
            )?;
        }
        write_line(&mut out, "</table>")?;
    }

    write_line(&mut out, "</body>")?;
    write_line(&mut out, "</html>")?;
    Ok(out)
}
