use std::sync::Arc;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;
pub mod background_task;
pub mod telemetry;

pub use domain::{entities, forms, table, use_cases};
pub use interfaces::{handlers, middlewares, routes};
pub use infrastructure::{auth, cache, http, utils};

use auth::TokenDecoder;
use cache::TagCache;
use entities::{
    resource::{ListQuery, Resource},
    BlogPost, ContactMessage, Project, Skill,
};
use errors::DashboardError;
use http::HttpApiClient;
use use_cases::{overview::OverviewSources, resource::ResourceHandler, manage::ViewStore};

pub type Api<E> = ResourceHandler<E, HttpApiClient>;
pub type Views<E> = ViewStore<E, HttpApiClient>;

pub struct AppState {
    pub config: settings::AppConfig,
    pub cache: Arc<TagCache>,
    pub token_decoder: TokenDecoder,
    pub blogs: Views<BlogPost>,
    pub projects: Views<Project>,
    pub skills: Views<Skill>,
    pub contacts: Views<ContactMessage>,
}

impl AppState {
    pub fn new(config: settings::AppConfig) -> Result<Self, DashboardError> {
        let transport = Arc::new(HttpApiClient::new(config.base_api())?);
        let cache = Arc::new(TagCache::new(config.cache_ttl()));

        let blogs = ViewStore::new(api_for(&transport, &cache, &config), ListQuery::default());
        let projects = ViewStore::new(api_for(&transport, &cache, &config), ListQuery::default());
        let skills = ViewStore::new(api_for(&transport, &cache, &config), ListQuery::default());
        let contacts = ViewStore::new(api_for(&transport, &cache, &config), Self::contacts_query(&config));

        Ok(AppState {
            token_decoder: TokenDecoder::from_config(&config),
            config,
            cache,
            blogs,
            projects,
            skills,
            contacts,
        })
    }

    fn contacts_query(config: &settings::AppConfig) -> ListQuery {
        ListQuery::page(1, config.contacts_fetch_limit)
    }

    pub fn overview_sources(&self) -> OverviewSources<'_, HttpApiClient> {
        OverviewSources {
            blogs: self.blogs.api(),
            projects: self.projects.api(),
            skills: self.skills.api(),
            contacts: self.contacts.api(),
            contacts_query: Self::contacts_query(&self.config),
        }
    }

    /// Drops every table view kept for a session.
    pub fn forget_session(&self, session: &str) {
        self.blogs.forget(session);
        self.projects.forget(session);
        self.skills.forget(session);
        self.contacts.forget(session);
    }
}

fn api_for<E: Resource>(transport: &Arc<HttpApiClient>, cache: &Arc<TagCache>, config: &settings::AppConfig) -> Api<E> {
    ResourceHandler::new(transport.clone(), cache.clone(), config.invalidation, config.auth_scheme.clone())
}

/// Resources with a management table in [`AppState`].
pub trait ManagedResource: Resource {
    fn views(state: &AppState) -> &Views<Self>;
}

impl ManagedResource for BlogPost {
    fn views(state: &AppState) -> &Views<Self> {
        &state.blogs
    }
}

impl ManagedResource for Project {
    fn views(state: &AppState) -> &Views<Self> {
        &state.projects
    }
}

impl ManagedResource for Skill {
    fn views(state: &AppState) -> &Views<Self> {
        &state.skills
    }
}

impl ManagedResource for ContactMessage {
    fn views(state: &AppState) -> &Views<Self> {
        &state.contacts
    }
}
