use std::{marker::PhantomData, sync::Arc};

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::instrument;

use crate::{
    cache::TagCache,
    entities::{
        envelope::Envelope,
        resource::{ChangeKind, Editable, InvalidationPolicy, ListQuery, Resource, ResourceChanged, Viewable},
        session::RequestContext,
    },
    errors::DashboardError,
    http::{ApiMethod, ApiRequest, ApiTransport},
};

/// Data access for one resource collection on the remote API.
///
/// Reads are cached under the resource tag. Mutations need an access token, then
/// invalidate the tag according to the configured policy and publish a change event.
pub struct ResourceHandler<E, T>
where
    T: ApiTransport,
{
    transport: Arc<T>,
    cache: Arc<TagCache>,
    policy: InvalidationPolicy,
    auth_scheme: Option<String>,
    _resource: PhantomData<fn() -> E>,
}

impl<E, T> Clone for ResourceHandler<E, T>
where
    T: ApiTransport,
{
    fn clone(&self) -> Self {
        ResourceHandler {
            transport: self.transport.clone(),
            cache: self.cache.clone(),
            policy: self.policy,
            auth_scheme: self.auth_scheme.clone(),
            _resource: PhantomData,
        }
    }
}

impl<E, T> ResourceHandler<E, T>
where
    E: Resource,
    T: ApiTransport,
{
    pub fn new(
        transport: Arc<T>,
        cache: Arc<TagCache>,
        policy: InvalidationPolicy,
        auth_scheme: Option<String>,
    ) -> Self {
        ResourceHandler { transport, cache, policy, auth_scheme, _resource: PhantomData }
    }

    pub fn cache(&self) -> &Arc<TagCache> {
        &self.cache
    }

    fn item_path(id: &str) -> String {
        format!("{}/{}", E::KIND.collection_path(), urlencoding::encode(id))
    }

    /// Fetches the collection. A `success:false` envelope is returned, not raised.
    #[instrument(skip(self), fields(kind = %E::KIND))]
    pub async fn list_all(&self, query: &ListQuery) -> Result<Envelope<Vec<E>>, DashboardError> {
        let request = ApiRequest::get(E::KIND.collection_path()).query(query.pairs());
        self.read(request).await
    }

    #[instrument(skip(self), fields(kind = %E::KIND))]
    pub async fn get_by_id(&self, id: &str) -> Result<Envelope<E>, DashboardError>
    where
        E: Viewable,
    {
        self.read(ApiRequest::get(Self::item_path(id))).await
    }

    #[instrument(skip(self, ctx, payload), fields(kind = %E::KIND))]
    pub async fn create(&self, ctx: &RequestContext, payload: &E::Payload) -> Result<Envelope<Value>, DashboardError>
    where
        E: Editable,
    {
        let body = serde_json::to_value(payload)?;
        let request = ApiRequest::new(ApiMethod::Post, E::KIND.collection_path()).json(body);
        self.mutate(ctx, request, None, ChangeKind::Created).await
    }

    #[instrument(skip(self, ctx, payload), fields(kind = %E::KIND))]
    pub async fn update_by_id(
        &self,
        ctx: &RequestContext,
        id: &str,
        payload: &E::Payload,
    ) -> Result<Envelope<Value>, DashboardError>
    where
        E: Editable,
    {
        let body = serde_json::to_value(payload)?;
        let request = ApiRequest::new(ApiMethod::Patch, Self::item_path(id)).json(body);
        self.mutate(ctx, request, Some(id), ChangeKind::Updated).await
    }

    #[instrument(skip(self, ctx), fields(kind = %E::KIND))]
    pub async fn delete_by_id(&self, ctx: &RequestContext, id: &str) -> Result<Envelope<Value>, DashboardError> {
        let request = ApiRequest::new(ApiMethod::Delete, Self::item_path(id));
        self.mutate(ctx, request, Some(id), ChangeKind::Deleted).await
    }

    async fn read<D>(&self, request: ApiRequest) -> Result<Envelope<D>, DashboardError>
    where
        D: DeserializeOwned,
    {
        let key = request.cache_key();
        if let Some(cached) = self.cache.get(&key) {
            tracing::debug!(%key, "Serving cached read");
            return Ok(serde_json::from_value(cached)?);
        }

        let generation = self.cache.generation(E::KIND.tag());
        let raw: Value = self.transport.send(request).await?.json()?;
        let envelope: Envelope<D> = serde_json::from_value(raw.clone())?;
        if envelope.success {
            self.cache.insert_if_current(key, E::KIND.tag(), generation, raw);
        }
        Ok(envelope)
    }

    async fn mutate(
        &self,
        ctx: &RequestContext,
        request: ApiRequest,
        id: Option<&str>,
        change: ChangeKind,
    ) -> Result<Envelope<Value>, DashboardError> {
        let token = ctx.require_token()?;
        let request = request.authorization(token.header_value(self.auth_scheme.as_deref()));

        let response = self.transport.send(request).await?;
        let envelope: Result<Envelope<Value>, DashboardError> = response.json();
        let succeeded = envelope.as_ref().is_ok_and(|e| e.success);

        if self.policy.should_invalidate(succeeded) {
            self.cache.invalidate(E::KIND.tag());
            self.cache.notify(ResourceChanged {
                kind: E::KIND,
                id: id.map(str::to_string),
                change,
            });
        }

        if !succeeded {
            tracing::warn!(kind = %E::KIND, status = response.status, "Mutation was not successful");
        }
        envelope
    }
}
