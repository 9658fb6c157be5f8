use actix_web::web;

use crate::errors::DashboardError;

/// Malformed JSON bodies answer with the same error shape as every other failure.
pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        DashboardError::from(err).into()
    }));
}
