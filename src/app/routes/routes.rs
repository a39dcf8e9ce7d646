use actix_web::{error::JsonPayloadError, web, HttpRequest, HttpResponse, Responder};
use std::sync::Arc;
use serde::{Serialize, Deserialize};

use crate::app::controller::analysis_controller::AnalysisController;
use crate::app::error::AnalysisError;

#[derive(Deserialize, Serialize)]
pub struct AnalysisRequest {
  #[serde(default)]
  stock: String,
}


pub struct Routes;

impl Routes {

  pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(Self::json_error));
    cfg.service(web::resource("/").route(web::get().to(Self::index)));
    cfg.service(web::resource("/health").route(web::get().to(Self::health)));
    cfg.service(web::resource("/analyze").route(web::post().to(Self::analyze_page)));
    cfg.service(web::resource("/api/analyze").route(web::post().to(Self::analyze_json)));
  }

  /// Bad JSON bodies answer in the same error shape as a blank stock name.
  fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log::warn!("Rejected /api/analyze body: {}", err);
    AnalysisError::Input(format!("Invalid request body: {}", err)).into()
  }

  async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
      "status": "ok",
      "Info": "Fundamental Stock Analyzer.",
      "code": 200,
    }))
  }

  async fn index(controller: web::Data<Arc<AnalysisController>>) -> impl Responder {
    controller.index()
  }

  async fn analyze_page(controller: web::Data<Arc<AnalysisController>>, form: web::Form<AnalysisRequest>) -> impl Responder {
    controller.analyze_page(&form.stock).await
  }

  async fn analyze_json(controller: web::Data<Arc<AnalysisController>>, request: web::Json<AnalysisRequest>) -> Result<HttpResponse, AnalysisError> {
    controller.analyze_json(&request.stock).await
  }
}
