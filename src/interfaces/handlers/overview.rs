use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use tracing::instrument;

use crate::{errors::DashboardError, use_cases::{extractors::Session, overview::load_overview}, AppState};

#[instrument(skip(session, state), fields(user = %session.key()))]
pub async fn overview(
    session: Session,
    state: web::Data<AppState>,
) -> Result<impl Responder, DashboardError> {
    let overview = load_overview(state.overview_sources(), Utc::now()).await?;
    Ok(HttpResponse::Ok().json(overview))
}
