use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::ai_agent::parsing::score::{format_float, ScoreMap, ScoreValue};
use crate::ai_agent::utils::parameters::{recompute_overall, OVERALL_SCORE_KEY};

pub const GAUGE_MIN: f64 = 0.0;
pub const GAUGE_MAX: f64 = 10.0;
pub const GAUGES_PER_ROW: usize = 4;
const DISCREPANCY_TOLERANCE: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
  Alert,
  Warning,
  Caution,
  Success,
}

impl Band {
  /// [0,3) alert, [3,6) warning, [6,8) caution, [8,10] success. Out of range
  /// values land in the nearest end band.
  pub fn for_value(value: f64) -> Self {
    if value < 3.0 {
      Band::Alert
    } else if value < 6.0 {
      Band::Warning
    } else if value < 8.0 {
      Band::Caution
    } else {
      Band::Success
    }
  }

  pub fn name(&self) -> &'static str {
    match self {
      Band::Alert => "alert",
      Band::Warning => "warning",
      Band::Caution => "caution",
      Band::Success => "success",
    }
  }

  pub fn range(&self) -> (f64, f64) {
    match self {
      Band::Alert => (0.0, 3.0),
      Band::Warning => (3.0, 6.0),
      Band::Caution => (6.0, 8.0),
      Band::Success => (8.0, 10.0),
    }
  }

  pub fn color(&self) -> &'static str {
    match self {
      Band::Alert => "#e74c3c",
      Band::Warning => "#f39c12",
      Band::Caution => "#f1c40f",
      Band::Success => "#27ae60",
    }
  }

  pub fn all() -> [Band; 4] {
    [Band::Alert, Band::Warning, Band::Caution, Band::Success]
  }
}

impl Serialize for Band {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(self.name())
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gauge {
  pub title: String,
  pub value: f64,
  pub readout: String,
  pub band: Band,
}

impl Gauge {
  pub fn new(title: &str, value: f64, display: &str) -> Self {
    Gauge { title: title.to_string(), value, readout: format!("{}/10", display), band: Band::for_value(value) }
  }

  /// Fraction of the sweep covered by the bar; the readout itself is never clamped.
  pub fn sweep(&self) -> f64 {
    (self.value.clamp(GAUGE_MIN, GAUGE_MAX) - GAUGE_MIN) / (GAUGE_MAX - GAUGE_MIN)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldWarning {
  pub key: String,
  pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum GaugeCell {
  Gauge(Gauge),
  Skipped { key: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverallScore {
  pub display: String,
  pub banner: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Discrepancy {
  pub reported: f64,
  pub recomputed: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
  pub stock: String,
  pub overall: Option<OverallScore>,
  pub scores: Value,
  pub rows: Vec<Vec<GaugeCell>>,
  pub warnings: Vec<FieldWarning>,
  pub discrepancy: Option<Discrepancy>,
  pub completed_at: DateTime<Utc>,
}

impl Report {

  pub fn build(stock: &str, scores: &ScoreMap) -> Self {
    let overall : Option<OverallScore> = scores.get(OVERALL_SCORE_KEY).map(|value| {
      let display : String = value.to_string();
      OverallScore { banner: format!("{}/10", display), display }
    });

    let mut cells : Vec<GaugeCell> = Vec::new();
    let mut warnings : Vec<FieldWarning> = Vec::new();

    for (key, value) in scores.iter().filter(|(key, _)| *key != OVERALL_SCORE_KEY) {
      match value.to_f64() {
        Ok(number) => cells.push(GaugeCell::Gauge(Gauge::new(key, number, &readout_text(value, number)))),
        Err(err) => {
          log::warn!("Could not render gauge for '{}': {}", key, err);
          warnings.push(FieldWarning { key: key.to_string(), message: format!("Could not render gauge for '{}': {}", key, err) });
          cells.push(GaugeCell::Skipped { key: key.to_string() });
        }
      }
    }

    let rows : Vec<Vec<GaugeCell>> = cells.chunks(GAUGES_PER_ROW).map(|row| row.to_vec()).collect();

    Report {
      stock: stock.to_string(),
      overall,
      scores: scores.to_json(),
      rows,
      warnings,
      discrepancy: find_discrepancy(scores),
      completed_at: Utc::now(),
    }
  }

  pub fn gauges(&self) -> impl Iterator<Item = &Gauge> {
    self.rows.iter().flatten().filter_map(|cell| match cell {
      GaugeCell::Gauge(gauge) => Some(gauge),
      GaugeCell::Skipped { .. } => None,
    })
  }
}

/// Numeric literals keep the shape the model wrote (`7`, `7.0`); anything
/// coerced from text or a boolean shows the number the gauge draws.
fn readout_text(value: &ScoreValue, number: f64) -> String {
  match value {
    ScoreValue::Integer(_) | ScoreValue::Float(_) => value.to_string(),
    _ => format_float(number),
  }
}

/// The reported overall is always shown as-is; this only flags when it
/// disagrees with the weighted sum of the nine parameters.
fn find_discrepancy(scores: &ScoreMap) -> Option<Discrepancy> {
  let reported : f64 = scores.get(OVERALL_SCORE_KEY)?.to_f64().ok()?;
  let recomputed : f64 = recompute_overall(scores)?;
  if (reported - recomputed).abs() <= DISCREPANCY_TOLERANCE {
    return None;
  }
  log::warn!("Reported overall score {} differs from weighted sum {}", reported, format_float(recomputed));
  Some(Discrepancy { reported, recomputed })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ai_agent::parsing::extract::extract_scores;

  #[test]
  fn bands_follow_fixed_thresholds() {
    assert_eq!(Band::for_value(0.0), Band::Alert);
    assert_eq!(Band::for_value(2.99), Band::Alert);
    assert_eq!(Band::for_value(3.0), Band::Warning);
    assert_eq!(Band::for_value(6.0), Band::Caution);
    assert_eq!(Band::for_value(7.99), Band::Caution);
    assert_eq!(Band::for_value(8.0), Band::Success);
    assert_eq!(Band::for_value(8.5), Band::Success);
    assert_eq!(Band::for_value(10.0), Band::Success);
    assert_eq!(Band::for_value(-1.0), Band::Alert);
  }

  #[test]
  fn single_gauge_and_overall_banner() {
    let scores = extract_scores(r#"Here you go: {"Business Quality": 7, "Overall score": 7.0} Thanks!"#).unwrap();
    let report = Report::build("Infosys", &scores);

    assert_eq!(report.overall.as_ref().map(|o| o.banner.as_str()), Some("7.0/10"));
    let gauges: Vec<&Gauge> = report.gauges().collect();
    assert_eq!(gauges.len(), 1);
    assert_eq!(gauges[0].title, "Business Quality");
    assert_eq!(gauges[0].value, 7.0);
    assert_eq!(gauges[0].readout, "7/10");
    assert_eq!(gauges[0].band, Band::Caution);
    assert!(report.warnings.is_empty());
  }

  #[test]
  fn uncoercible_field_is_skipped_with_named_warning() {
    let scores = extract_scores(r#"{"Valuation": "N/A", "Growth Potential": 8}"#).unwrap();
    let report = Report::build("Infosys", &scores);

    assert!(report.overall.is_none());
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].key, "Valuation");
    assert!(report.warnings[0].message.contains("'Valuation'"));
    assert!(report.warnings[0].message.contains("N/A"));

    let gauges: Vec<&Gauge> = report.gauges().collect();
    assert_eq!(gauges.len(), 1);
    assert_eq!(gauges[0].title, "Growth Potential");
    assert_eq!(gauges[0].value, 8.0);
    assert_eq!(report.rows[0][0], GaugeCell::Skipped { key: "Valuation".to_string() });
  }

  #[test]
  fn readout_matches_source_and_band() {
    let scores = extract_scores("{'Profitability': 8.5, 'Valuation': '4.25', 'Liquidity & Public Float': 12}").unwrap();
    let report = Report::build("X", &scores);
    let gauges: Vec<&Gauge> = report.gauges().collect();

    assert_eq!(gauges[0].readout, "8.5/10");
    assert_eq!(gauges[0].band, Band::Success);
    assert_eq!(gauges[1].readout, "4.25/10");
    assert_eq!(gauges[1].band, Band::Warning);
    assert_eq!(gauges[2].readout, "12/10");
    assert_eq!(gauges[2].sweep(), 1.0);
  }

  #[test]
  fn coerced_values_read_out_as_numbers() {
    let scores = extract_scores("{'Flag': True, 'Pad': ' 7.5 ', 'Whole': '8', 'Big': 99999999999999999999}").unwrap();
    let report = Report::build("X", &scores);
    let gauges: Vec<&Gauge> = report.gauges().collect();

    assert_eq!(gauges[0].value, 1.0);
    assert_eq!(gauges[0].readout, "1.0/10");
    assert_eq!(gauges[1].value, 7.5);
    assert_eq!(gauges[1].readout, "7.5/10");
    assert_eq!(gauges[2].readout, "8.0/10");
    assert_eq!(gauges[3].readout, format!("{}/10", format_float(1e20)));
  }

  #[test]
  fn band_serializes_as_its_name() {
    for band in Band::all() {
      assert_eq!(serde_json::to_value(band).unwrap(), serde_json::Value::String(band.name().to_string()));
    }
    assert_eq!(serde_json::to_string(&Band::Caution).unwrap(), "\"caution\"");
  }

  #[test]
  fn rows_hold_four_gauges_in_key_order() {
    let scores = extract_scores("{'a': 1, 'b': 2, 'Overall score': 5, 'c': 3, 'd': 4, 'e': 5, 'f': 6, 'g': 7, 'h': 8, 'i': 9}").unwrap();
    let report = Report::build("X", &scores);

    let sizes: Vec<usize> = report.rows.iter().map(|row| row.len()).collect();
    assert_eq!(sizes, vec![4, 4, 1]);
    let titles: Vec<&str> = report.gauges().map(|g| g.title.as_str()).collect();
    assert_eq!(titles, vec!["a", "b", "c", "d", "e", "f", "g", "h", "i"]);
  }

  #[test]
  fn overall_is_shown_raw_without_clamping() {
    let scores = extract_scores("{'Overall score': 11.5, 'Valuation': 3}").unwrap();
    let report = Report::build("X", &scores);
    assert_eq!(report.overall.map(|o| o.banner), Some("11.5/10".to_string()));

    let text = extract_scores("{'Overall score': 'high'}").unwrap();
    let report = Report::build("X", &text);
    assert_eq!(report.overall.map(|o| o.banner), Some("high/10".to_string()));
    assert!(report.rows.is_empty());
  }

  #[test]
  fn discrepancy_is_flagged_not_corrected() {
    let raw = "{'Business Quality': 8, 'Profitability': 7, 'Growth Potential': 9, 'Asset Quality / Leverage': 6, \
      'Cost Efficiency': 7, 'Valuation': 5, 'Management & Governance': 8, 'Promoter Skin in the Game': 6, \
      'Liquidity & Public Float': 9, 'Overall score': 9.0}";
    let report = Report::build("X", &extract_scores(raw).unwrap());

    assert_eq!(report.overall.as_ref().map(|o| o.display.as_str()), Some("9.0"));
    let discrepancy = report.discrepancy.unwrap();
    assert_eq!(discrepancy.reported, 9.0);
    assert!((discrepancy.recomputed - 7.4).abs() < 1e-9);

    let consistent = raw.replace("9.0}", "7.4}");
    assert!(Report::build("X", &extract_scores(&consistent).unwrap()).discrepancy.is_none());
  }
}
