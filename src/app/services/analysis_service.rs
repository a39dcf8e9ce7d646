use crate::ai_agent::agents::fundamental_analyst::FundamentalAnalyst;
use crate::ai_agent::parsing::extract::extract_scores;
use crate::ai_agent::parsing::score::ScoreMap;
use crate::ai_agent::report::report::Report;
use crate::app::error::AnalysisError;

#[derive(Debug, Clone)]
pub struct Analysis {
  pub raw: String,
  pub report: Report,
}

pub struct AnalysisService {
  analyst : FundamentalAnalyst
}

impl AnalysisService {

  pub fn new(analyst: FundamentalAnalyst) -> Self {
    AnalysisService { analyst }
  }

  /// Validates the name, makes exactly one completion call, and turns the
  /// reply into a report. Blank input never reaches the network.
  pub async fn run(&self, stock: &str) -> Result<Analysis, AnalysisError> {
    let stock : &str = stock.trim();
    if stock.is_empty() {
      return Err(AnalysisError::Input("Please enter a valid stock name.".to_string()));
    }

    let raw : String = match self.analyst.analyze(stock).await {
      Ok(raw) => raw,
      Err(e) => {
        log::error!("Completion request for {} failed: {}", stock, e);
        return Err(AnalysisError::Service(e));
      }
    };

    let scores : ScoreMap = match extract_scores(&raw) {
      Ok(scores) => scores,
      Err(error) => {
        log::warn!("Parsing failed for {}: {}", stock, error);
        return Err(AnalysisError::Parse { raw, error });
      }
    };

    log::info!("Parsed {} scores for {}", scores.len(), stock);
    let report : Report = Report::build(stock, &scores);
    return Ok(Analysis { raw, report });
  }
}
