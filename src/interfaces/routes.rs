use actix_web::web;

use crate::handlers::{auth, json_error::not_found, overview::overview, system::health_check};

mod json_error;
mod resources;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(json_error::config_routes);

    cfg.service(health_check)
        .service(auth::login_page)
        .service(auth::logout)
        .route("/", web::get().to(overview))
        .route("/dashboard", web::get().to(overview));

    cfg.configure(resources::config_routes);

    cfg.default_service(web::to(not_found));
}
