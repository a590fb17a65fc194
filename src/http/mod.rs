pub mod handlers;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::config::ServerConfig;

pub const SERVICE_NAME: &str = "CSV Processor for Dify";
pub const SERVICE_VERSION: &str = "1.0";

pub fn build_router(config: ServerConfig) -> Router {
    Router::new()
        .route("/", get(handlers::home_handler))
        .route(
            "/process-csv",
            post(handlers::process_csv_handler).options(handlers::process_csv_options_handler),
        )
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
}
