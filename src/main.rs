use actix_web::HttpServer;
use anyhow::Context;
use std::env;

use crate::app::config::Config;
use crate::app::factory::{AppState, CreateApp};

mod app;
mod ai_agent;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  if env::var_os("RUST_LOG").is_none() {
    env::set_var("RUST_LOG", "actix_web=info,info");
  }
  env_logger::init();

  let config : Config = Config::load().context("Invalid configuration")?;
  let app_state : AppState = AppState::new(&config).context("Failed to initialize the Groq client")?;
  let bind : (String, u16) = (config.bind_address.clone(), config.port);

  log::info!("Fundamental Stock Analyzer listening on http://{}:{}", bind.0, bind.1);

  let server_builder = HttpServer::new(move || {
    let factory: CreateApp = CreateApp::new(app_state.clone());
    factory.build_app().wrap(actix_web::middleware::Logger::default())
  });

  server_builder.bind(bind)?.run().await?;

  Ok(())
}
