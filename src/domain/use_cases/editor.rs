use serde::Serialize;
use serde_json::{Map, Value};
use tracing::instrument;

use crate::{
    entities::{
        envelope::Envelope,
        resource::{Editable, ResourceKind, Viewable},
        session::RequestContext,
    },
    errors::{DashboardError, Notice, GENERIC_FAILURE},
    forms::{parse_payload, FieldSpec},
    http::ApiTransport,
    use_cases::{manage::ActionOutcome, resource::ResourceHandler},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormMode {
    Create,
    Update,
}

/// Everything needed to render a create or update form.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormView {
    pub kind: ResourceKind,
    pub mode: FormMode,
    pub title: String,
    pub submit_to: String,
    pub cancel_to: &'static str,
    pub fields: &'static [FieldSpec],
    pub values: Map<String, Value>,
}

pub fn create_form<E: Editable>() -> FormView {
    let kind = E::KIND;
    FormView {
        kind,
        mode: FormMode::Create,
        title: format!("Create {}", kind.label()),
        submit_to: kind.create_route().unwrap_or_else(|| kind.list_route().to_string()),
        cancel_to: kind.list_route(),
        fields: E::form_schema(),
        values: Map::new(),
    }
}

/// Update form prefilled with the item as the API returns it now.
#[instrument(skip(api), fields(kind = %E::KIND))]
pub async fn update_form<E, T>(api: &ResourceHandler<E, T>, id: &str) -> Result<FormView, DashboardError>
where
    E: Editable,
    T: ApiTransport,
{
    let item = fetch_item(api, id).await?;
    let kind = E::KIND;
    Ok(FormView {
        kind,
        mode: FormMode::Update,
        title: format!("Update {}", kind.label()),
        submit_to: kind.update_route(id).unwrap_or_else(|| kind.list_route().to_string()),
        cancel_to: kind.list_route(),
        fields: E::form_schema(),
        values: item.form_values(),
    })
}

/// Fetches one item, mapping an empty or rejected envelope to `NotFound`.
pub async fn fetch_item<E, T>(api: &ResourceHandler<E, T>, id: &str) -> Result<E, DashboardError>
where
    E: Viewable,
    T: ApiTransport,
{
    let envelope = api.get_by_id(id).await?;
    if !envelope.success || envelope.data.is_none() {
        let message = envelope.failure_message(&format!("{} not found", E::KIND.label()));
        return Err(DashboardError::NotFound(message));
    }
    envelope.into_data(GENERIC_FAILURE)
}

#[instrument(skip(api, ctx, input), fields(kind = %E::KIND))]
pub async fn submit_create<E, T>(
    api: &ResourceHandler<E, T>,
    ctx: &RequestContext,
    input: &Map<String, Value>,
) -> Result<ActionOutcome, DashboardError>
where
    E: Editable,
    T: ApiTransport,
{
    let payload = parse_payload::<E>(input)?;
    let label = E::KIND.label();
    let result = api.create(ctx, &payload).await;
    outcome::<E>(
        result,
        &format!("{label} created successfully"),
        &format!("Error creating {}", label.to_lowercase()),
    )
}

#[instrument(skip(api, ctx, input), fields(kind = %E::KIND))]
pub async fn submit_update<E, T>(
    api: &ResourceHandler<E, T>,
    ctx: &RequestContext,
    id: &str,
    input: &Map<String, Value>,
) -> Result<ActionOutcome, DashboardError>
where
    E: Editable,
    T: ApiTransport,
{
    let payload = parse_payload::<E>(input)?;
    let label = E::KIND.label();
    let result = api.update_by_id(ctx, id, &payload).await;
    outcome::<E>(
        result,
        &format!("{label} updated successfully"),
        &format!("Error updating {}", label.to_lowercase()),
    )
}

fn outcome<E: Editable>(
    result: Result<Envelope<Value>, DashboardError>,
    success_fallback: &str,
    failure_fallback: &str,
) -> Result<ActionOutcome, DashboardError> {
    match result {
        Ok(envelope) if envelope.success => Ok(ActionOutcome {
            notice: Notice::success(envelope.success_message(success_fallback)),
            redirect: Some(E::KIND.list_route().to_string()),
            table: None,
        }),
        Ok(envelope) => Ok(ActionOutcome {
            notice: Notice::error(envelope.failure_message(failure_fallback)),
            redirect: None,
            table: None,
        }),
        Err(DashboardError::Unauthenticated) => Err(DashboardError::Unauthenticated),
        Err(e) => {
            tracing::error!(kind = %E::KIND, "Form submission failed: {}", e);
            Ok(ActionOutcome { notice: Notice::error(e.user_message()), redirect: None, table: None })
        }
    }
}
