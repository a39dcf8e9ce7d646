use crate::ai_agent::parsing::score::ScoreMap;

pub const OVERALL_SCORE_KEY: &str = "Overall score";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringParameter {
  pub label: &'static str,
  pub weight: u32, // percent
  pub description: &'static str,
}

pub const SCORING_PARAMETERS: [ScoringParameter; 9] = [
  ScoringParameter { label: "Business Quality", weight: 15, description: "Core industry relevance, moat, sustainability of business model." },
  ScoringParameter { label: "Profitability", weight: 15, description: "Net profit margin, ROE, ROA." },
  ScoringParameter { label: "Growth Potential", weight: 20, description: "Revenue/profit CAGR, industry tailwinds, expansion plans." },
  ScoringParameter { label: "Asset Quality / Leverage", weight: 10, description: "Debt levels, interest coverage, debt-to-equity." },
  ScoringParameter { label: "Cost Efficiency", weight: 10, description: "Operating margin, cost ratios, overhead control." },
  ScoringParameter { label: "Valuation", weight: 10, description: "P/E, P/B, EV/EBITDA vs peers." },
  ScoringParameter { label: "Management & Governance", weight: 10, description: "Promoter history, auditors, transparency, related party transactions." },
  ScoringParameter { label: "Promoter Skin in the Game", weight: 5, description: "Shareholding levels, pledge status." },
  ScoringParameter { label: "Liquidity & Public Float", weight: 5, description: "Trading volumes, institutional holding, ease of entry/exit." },
];

/// Weighted sum over the nine parameters, or `None` unless every one of them
/// is present and numeric.
pub fn recompute_overall(scores: &ScoreMap) -> Option<f64> {
  let mut total : f64 = 0.0;
  for parameter in SCORING_PARAMETERS.iter() {
    let score : f64 = scores.get(parameter.label)?.to_f64().ok()?;
    total += score * parameter.weight as f64 / 100.0;
  }
  return Some(total);
}
