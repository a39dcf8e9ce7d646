use crate::ai_agent::parsing::score::format_float;
use crate::ai_agent::report::report::{GaugeCell, Report};
use crate::app::error::AnalysisError;
use crate::app::services::analysis_service::Analysis;
use crate::app::views::escape_html;
use crate::app::views::gauge::render_gauge_svg;

const STYLE: &str = r#"
  body { margin: 0; background: linear-gradient(to right, #e0f7fa, #fff); font-family: 'Segoe UI', sans-serif; color: #263238; }
  main { max-width: 1200px; margin: 0 auto; padding: 2.5rem 1.5rem; }
  h2, h3 { color: #006064; }
  form { display: flex; gap: 12px; align-items: center; }
  input[type=text] { flex: 1; border-radius: 12px; padding: 10px; border: 1px solid #ccc; font-size: 1rem; }
  button { background-color: #00acc1; color: white; font-weight: bold; border: 0; border-radius: 8px; padding: 10px 20px; cursor: pointer; transition: background-color 0.3s ease; }
  button:hover { background-color: #00838f; }
  button:disabled { background-color: #90a4ae; cursor: wait; }
  .spinner { display: none; margin-top: 1rem; color: #00838f; }
  .spinner.active { display: block; }
  .notice { padding: 12px 16px; border-radius: 8px; margin: 1rem 0; }
  .notice.success { background: #e8f5e9; color: #1b5e20; }
  .notice.warning { background: #fff8e1; color: #8d6e00; }
  .notice.error { background: #ffebee; color: #b71c1c; }
  pre { background: #0e1117; color: #e0e0e0; padding: 1rem; border-radius: 8px; overflow-x: auto; white-space: pre-wrap; }
  .overall { text-align: center; font-size: 42px; font-weight: bold; color: #2196f3; margin-top: 2rem; }
  .gauge-row { display: grid; grid-template-columns: repeat(4, 1fr); gap: 16px; margin-bottom: 16px; }
  .gauge-cell { background: #0e1117; border-radius: 8px; min-height: 200px; }
  .gauge-cell.skipped { background: transparent; }
  .gauge { width: 100%; height: auto; }
  .gauge text { fill: white; font-family: 'Segoe UI', sans-serif; }
  .gauge-title { font-size: 18px; }
  .gauge-readout { font-size: 28px; }
  .gauge-tick { font-size: 11px; fill: gray; }
"#;

const SUBMIT_SCRIPT: &str = r#"
  document.getElementById('analyze-form').addEventListener('submit', function () {
    document.getElementById('analyze-button').disabled = true;
    document.getElementById('spinner').classList.add('active');
  });
"#;

pub enum PageOutcome<'a> {
  Success(&'a Analysis),
  Failure(&'a AnalysisError),
}

/// The whole page: header, the form (keeping `stock` as typed), and the
/// output area when there is an outcome to show.
pub fn render_page(stock: &str, outcome: Option<PageOutcome<'_>>) -> String {
  let output : String = match outcome {
    None => String::new(),
    Some(PageOutcome::Success(analysis)) => render_analysis(analysis),
    Some(PageOutcome::Failure(err)) => render_failure(err),
  };

  format!(r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Fundamental Stock Analyzer</title>
<style>{style}</style>
</head>
<body>
<main>
<h2>Fundamental Stock Analyzer</h2>
<p>Use the power of AI to get a quick, no-nonsense stock analysis.</p>
<form id="analyze-form" method="post" action="/analyze">
<label for="stock">Enter stock/company name</label>
<input type="text" id="stock" name="stock" value="{stock}" placeholder="e.g., Infosys">
<button type="submit" id="analyze-button">Analyze Now</button>
</form>
<div id="spinner" class="spinner">Crunching financials and decoding fundamentals...</div>
<section id="output">{output}</section>
</main>
<script>{script}</script>
</body>
</html>
"#, style = STYLE, stock = escape_html(stock), output = output, script = SUBMIT_SCRIPT)
}

fn render_analysis(analysis: &Analysis) -> String {
  let report : &Report = &analysis.report;
  let mut html : String = String::new();

  html.push_str(&completion_notice(report));
  html.push_str(&raw_block(&analysis.raw));

  if let Some(overall) = &report.overall {
    html.push_str(&format!(r#"<div class="overall">Overall Score: {}</div>"#, escape_html(&overall.banner)));
  }
  if let Some(discrepancy) = &report.discrepancy {
    html.push_str(&format!(
      r#"<div class="notice warning discrepancy">Reported overall score {} differs from the weighted sum of the parameters ({}).</div>"#,
      format_float(discrepancy.reported), format!("{:.2}", discrepancy.recomputed)));
  }

  let json : String = serde_json::to_string_pretty(&report.scores).unwrap_or_else(|_| report.scores.to_string());
  html.push_str(&format!(r#"<pre class="scores-json">{}</pre>"#, escape_html(&json)));

  html.push_str("<h3>Performance Gauges</h3>");
  for warning in &report.warnings {
    html.push_str(&format!(r#"<div class="notice warning field-warning">{}</div>"#, escape_html(&warning.message)));
  }
  for row in &report.rows {
    html.push_str(r#"<div class="gauge-row">"#);
    for cell in row {
      match cell {
        GaugeCell::Gauge(gauge) => html.push_str(&format!(r#"<div class="gauge-cell">{}</div>"#, render_gauge_svg(gauge))),
        GaugeCell::Skipped { key } => html.push_str(&format!(r#"<div class="gauge-cell skipped" data-key="{}"></div>"#, escape_html(key))),
      }
    }
    html.push_str("</div>");
  }

  return html;
}

fn render_failure(err: &AnalysisError) -> String {
  match err {
    AnalysisError::Input(message) => format!(r#"<div class="notice warning input-error">{}</div>"#, escape_html(message)),
    AnalysisError::Service(e) => format!(r#"<div class="notice error service-error">Analysis failed: {}</div>"#, escape_html(&e.to_string())),
    AnalysisError::Parse { raw, error } => {
      let mut html : String = raw_block(raw);
      html.push_str(&format!(
        r#"<div class="notice error parse-error">Failed to parse response into dictionary. {}</div>"#,
        escape_html(&error.to_string())));
      html
    }
  }
}

fn completion_notice(report: &Report) -> String {
  format!(r#"<div class="notice success">Analysis complete! <small>{} UTC</small></div>"#,
    report.completed_at.format("%Y-%m-%d %H:%M:%S"))
}

fn raw_block(raw: &str) -> String {
  format!(r#"<h3>AI-Powered Analysis</h3><pre class="raw">{}</pre>"#, escape_html(raw))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ai_agent::llm::model_provider::ServiceError;
  use crate::ai_agent::parsing::extract::{extract_scores, ParseError};

  fn analysis_of(raw: &str) -> Analysis {
    let scores = extract_scores(raw).unwrap();
    Analysis { raw: raw.to_string(), report: Report::build("Infosys", &scores) }
  }

  #[test]
  fn empty_page_has_form_and_no_output() {
    let html = render_page("", None);
    assert!(html.contains(r#"action="/analyze""#));
    assert!(html.contains("placeholder=\"e.g., Infosys\""));
    assert!(html.contains(r#"<section id="output"></section>"#));
  }

  #[test]
  fn success_renders_sections_in_order() {
    let analysis = analysis_of(r#"Here you go: {"Business Quality": 7, "Overall score": 7.0} Thanks!"#);
    let html = render_page("Infosys", Some(PageOutcome::Success(&analysis)));

    let raw = html.find(r#"<pre class="raw">"#).unwrap();
    let overall = html.find("Overall Score: 7.0/10").unwrap();
    let json = html.find(r#"<pre class="scores-json">"#).unwrap();
    let gauges = html.find("<h3>Performance Gauges</h3>").unwrap();
    assert!(raw < overall && overall < json && json < gauges);

    assert!(html.contains("Here you go: {&quot;Business Quality&quot;: 7"));
    assert_eq!(html.matches(r#"<div class="gauge-cell">"#).count(), 1);
    assert!(html.contains(r#"value="Infosys""#));
  }

  #[test]
  fn skipped_field_shows_warning_and_keeps_slot() {
    let analysis = analysis_of(r#"{"Valuation": "N/A", "Growth Potential": 8}"#);
    let html = render_page("Infosys", Some(PageOutcome::Success(&analysis)));

    assert!(html.contains("Could not render gauge for &#39;Valuation&#39;"));
    assert!(html.contains(r#"data-key="Valuation""#));
    assert!(html.contains(">8/10</text>"));
    assert!(!html.contains("Overall Score:"));
  }

  #[test]
  fn parse_failure_shows_message_and_nothing_else() {
    let err = AnalysisError::Parse { raw: "I cannot answer that.".to_string(), error: ParseError::NoRecord };
    let html = render_page("Infosys", Some(PageOutcome::Failure(&err)));

    assert!(html.contains("Failed to parse response into dictionary."));
    assert!(html.contains("I cannot answer that."));
    assert!(!html.contains("<svg"));
    assert!(!html.contains("scores-json"));
    assert!(!html.contains("Overall Score:"));
  }

  #[test]
  fn input_and_service_errors_are_distinguishable() {
    let input = AnalysisError::Input("Please enter a valid stock name.".to_string());
    let html = render_page("  ", Some(PageOutcome::Failure(&input)));
    assert!(html.contains(r#"class="notice warning input-error""#));

    let service = AnalysisError::Service(ServiceError::Status { status: 401, message: "Invalid API Key".to_string() });
    let html = render_page("Infosys", Some(PageOutcome::Failure(&service)));
    assert!(html.contains(r#"class="notice error service-error""#));
    assert!(html.contains("Invalid API Key"));
  }

  #[test]
  fn user_and_model_text_is_escaped() {
    let html = render_page("<script>alert(1)</script>", None);
    assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(!html.contains("value=\"<script>"));
  }
}
