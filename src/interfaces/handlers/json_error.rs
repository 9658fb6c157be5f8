use actix_web::{http::StatusCode, HttpRequest, HttpResponse};

use crate::errors::Notice;

pub fn json_error(status: StatusCode, error: &str, details: &str) -> HttpResponse {
    HttpResponse::build(status).json(serde_json::json!({
        "error": error,
        "details": details,
        "notice": Notice::error(details),
    }))
}

pub async fn not_found(request: HttpRequest) -> HttpResponse {
    json_error(
        StatusCode::NOT_FOUND,
        "Not found",
        &format!("No page at {}", request.path()),
    )
}
