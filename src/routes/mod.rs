use actix_web::web;

use crate::error::AppError;
use crate::handlers::health;

pub mod squads;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/health", web::get().to(health::health))
        .configure(squads::configure);
}

/// Bodies that fail to parse become 400s with the usual error envelope.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}
