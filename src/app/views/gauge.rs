use std::f64::consts::PI;

use crate::ai_agent::report::report::{Band, Gauge, GAUGE_MAX, GAUGE_MIN};
use crate::app::views::escape_html;

const WIDTH: f64 = 260.0;
const HEIGHT: f64 = 200.0;
const CX: f64 = 130.0;
const CY: f64 = 150.0;
const RADIUS: f64 = 95.0;
const BAR_COLOR: &str = "dodgerblue";

fn point(fraction: f64, radius: f64) -> (f64, f64) {
  let theta = PI * (1.0 - fraction);
  (CX + radius * theta.cos(), CY - radius * theta.sin())
}

fn fraction_of(value: f64) -> f64 {
  (value - GAUGE_MIN) / (GAUGE_MAX - GAUGE_MIN)
}

fn arc(from: f64, to: f64, color: &str, width: f64) -> String {
  let (x1, y1) = point(from, RADIUS);
  let (x2, y2) = point(to, RADIUS);
  format!(r#"<path d="M {:.2} {:.2} A {r} {r} 0 0 1 {:.2} {:.2}" fill="none" stroke="{}" stroke-width="{}"/>"#,
    x1, y1, x2, y2, color, width, r = RADIUS)
}

/// Half-circle gauge over the fixed 0-10 domain: four colored bands, a bar
/// from zero to the value, ticks every 2, the readout and the title.
pub fn render_gauge_svg(gauge: &Gauge) -> String {
  let title : String = escape_html(&gauge.title);
  let readout : String = escape_html(&gauge.readout);

  let mut svg : String = format!(
    r#"<svg class="gauge gauge-{}" viewBox="0 0 {} {}" role="img" aria-label="{}: {}" xmlns="http://www.w3.org/2000/svg">"#,
    gauge.band.name(), WIDTH, HEIGHT, title, readout);
  svg.push_str(&format!(r#"<text x="{}" y="22" text-anchor="middle" class="gauge-title">{}</text>"#, CX, title));

  for band in Band::all() {
    let (low, high) = band.range();
    svg.push_str(&arc(fraction_of(low), fraction_of(high), band.color(), 24.0));
  }

  let sweep : f64 = gauge.sweep();
  if sweep > 0.0 {
    svg.push_str(&arc(0.0, sweep, BAR_COLOR, 8.0));
  }

  for tick in (GAUGE_MIN as i64..=GAUGE_MAX as i64).step_by(2) {
    let (x, y) = point(fraction_of(tick as f64), RADIUS + 22.0);
    svg.push_str(&format!(r#"<text x="{:.2}" y="{:.2}" text-anchor="middle" class="gauge-tick">{}</text>"#, x, y + 4.0, tick));
  }

  svg.push_str(&format!(r#"<text x="{}" y="{}" text-anchor="middle" class="gauge-readout">{}</text>"#, CX, CY - 8.0, readout));
  svg.push_str("</svg>");
  return svg;
}
