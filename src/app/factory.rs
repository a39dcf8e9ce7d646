use actix_web::{web, App};
use std::sync::Arc;

use crate::ai_agent::agents::fundamental_analyst::FundamentalAnalyst;
use crate::ai_agent::llm::model_provider::{LLMChatter, ServiceError};
use crate::ai_agent::llm::models::get_model;
use crate::app::config::Config;
use crate::app::routes::routes::Routes;

use super::controller::analysis_controller::AnalysisController;
use super::services::analysis_service::AnalysisService;

#[derive(Clone)]
pub struct AppState {
  pub analysis_controller: Arc<AnalysisController>
}

impl AppState {

  pub fn new(app_config: &Config) -> Result<Self, ServiceError> {
    let chatter : Arc<dyn LLMChatter> = get_model(app_config)?;
    Ok(AppState::with_chatter(app_config, chatter))
  }

  pub fn with_chatter(app_config: &Config, chatter: Arc<dyn LLMChatter>) -> Self {
    let analyst : FundamentalAnalyst = FundamentalAnalyst::new(chatter, &app_config.model_name);
    let analysis_service : Arc<AnalysisService> = Arc::new(AnalysisService::new(analyst));
    let analysis_controller : Arc<AnalysisController> = Arc::new(AnalysisController::new(analysis_service));
    AppState { analysis_controller }
  }
}

pub struct CreateApp {
  app_state: AppState,
}

impl CreateApp {
  pub fn new(app_state: AppState) -> Self {
    CreateApp { app_state }
  }

  pub fn build_app(&self,) -> App<impl actix_web::dev::ServiceFactory<actix_web::dev::ServiceRequest,Config = (),Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,Error = actix_web::Error,InitError = (),>,> {
    App::new()
    .app_data(web::Data::new(self.app_state.analysis_controller.clone()))
    .configure(Routes::configure)
  }
}
