use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use serde_json::{Map, Value};
use tracing::instrument;

use crate::{
    entities::resource::{Editable, Viewable},
    errors::DashboardError,
    table::TableCommand,
    use_cases::{editor, extractors::Session, manage::ActionOutcome},
    AppState, ManagedResource,
};

fn outcome_response(outcome: ActionOutcome) -> HttpResponse {
    let status = if outcome.notice.is_success() {
        StatusCode::OK
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };
    HttpResponse::build(status).json(outcome)
}

#[instrument(skip(session, state), fields(kind = %E::KIND))]
pub async fn list_page<E: ManagedResource>(
    session: Session,
    state: web::Data<AppState>,
) -> Result<impl Responder, DashboardError> {
    let page = E::views(&state).page(&session.key()).await?;
    Ok(HttpResponse::Ok().json(page))
}

#[instrument(skip(session, state, command), fields(kind = %E::KIND))]
pub async fn table_command<E: ManagedResource>(
    session: Session,
    state: web::Data<AppState>,
    command: web::Json<TableCommand>,
) -> Result<impl Responder, DashboardError> {
    let page = E::views(&state).apply(&session.key(), command.into_inner()).await?;
    Ok(HttpResponse::Ok().json(page))
}

#[instrument(skip(session, state, id), fields(kind = %E::KIND))]
pub async fn delete_item<E: ManagedResource>(
    session: Session,
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<impl Responder, DashboardError> {
    let outcome = E::views(&state)
        .delete(&session.key(), &session.context, &id)
        .await?;
    Ok(outcome_response(outcome))
}

#[instrument(skip(_session, state, id), fields(kind = %E::KIND))]
pub async fn detail<E: ManagedResource + Viewable>(
    _session: Session,
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<impl Responder, DashboardError> {
    let item = editor::fetch_item(E::views(&state).api(), &id).await?;
    Ok(HttpResponse::Ok().json(item.into_detail()))
}

#[instrument(skip(_session), fields(kind = %E::KIND))]
pub async fn create_form<E: ManagedResource + Editable>(_session: Session) -> impl Responder {
    HttpResponse::Ok().json(editor::create_form::<E>())
}

#[instrument(skip(session, state, input), fields(kind = %E::KIND))]
pub async fn create_submit<E: ManagedResource + Editable>(
    session: Session,
    state: web::Data<AppState>,
    input: web::Json<Map<String, Value>>,
) -> Result<impl Responder, DashboardError> {
    let outcome = editor::submit_create(E::views(&state).api(), &session.context, &input).await?;
    Ok(outcome_response(outcome))
}

#[instrument(skip(_session, state, id), fields(kind = %E::KIND))]
pub async fn update_form<E: ManagedResource + Editable>(
    _session: Session,
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<impl Responder, DashboardError> {
    let form = editor::update_form(E::views(&state).api(), &id).await?;
    Ok(HttpResponse::Ok().json(form))
}

#[instrument(skip(session, state, id, input), fields(kind = %E::KIND))]
pub async fn update_submit<E: ManagedResource + Editable>(
    session: Session,
    state: web::Data<AppState>,
    id: web::Path<String>,
    input: web::Json<Map<String, Value>>,
) -> Result<impl Responder, DashboardError> {
    let outcome = editor::submit_update(E::views(&state).api(), &session.context, &id, &input).await?;
    Ok(outcome_response(outcome))
}
