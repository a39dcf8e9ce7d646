use std::sync::Arc;
use actix_web::HttpResponse;
use actix_web::http::header::ContentType;

use crate::app::error::AnalysisError;
use crate::app::services::analysis_service::{Analysis, AnalysisService};
use crate::app::views::page::{render_page, PageOutcome};

pub struct AnalysisController {
  service : Arc<AnalysisService>
}

impl AnalysisController {
  pub fn new(service: Arc<AnalysisService>) -> Self {
    AnalysisController { service }
  }

  pub fn index(&self) -> HttpResponse {
    html_response(render_page("", None))
  }

  /// Form submission. Every outcome, failures included, comes back as the
  /// page so the user can retry from the same input.
  pub async fn analyze_page(&self, stock: &str) -> HttpResponse {
    let page : String = match self.service.run(stock).await {
      Ok(analysis) => render_page(stock, Some(PageOutcome::Success(&analysis))),
      Err(err) => render_page(stock, Some(PageOutcome::Failure(&err))),
    };
    return html_response(page);
  }

  pub async fn analyze_json(&self, stock: &str) -> Result<HttpResponse, AnalysisError> {
    let analysis : Analysis = self.service.run(stock).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
      "raw": analysis.raw,
      "report": analysis.report,
    })))
  }
}

fn html_response(page: String) -> HttpResponse {
  HttpResponse::Ok().content_type(ContentType::html()).body(page)
}
