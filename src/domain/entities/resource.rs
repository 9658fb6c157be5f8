use std::fmt;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use crate::{forms::FieldSpec, table::Tabular};

/// The four collections managed by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Blog,
    Project,
    Skill,
    Contact,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Blog,
        ResourceKind::Project,
        ResourceKind::Skill,
        ResourceKind::Contact,
    ];

    /// Path of the collection on the remote API.
    pub fn collection_path(self) -> &'static str {
        match self {
            ResourceKind::Blog => "/blogs",
            ResourceKind::Project => "/projects",
            ResourceKind::Skill => "/skill",
            ResourceKind::Contact => "/contacts",
        }
    }

    /// Cache tag shared by every read of this collection.
    pub fn tag(self) -> &'static str {
        match self {
            ResourceKind::Blog => "BLOG",
            ResourceKind::Project => "PROJECT",
            ResourceKind::Skill => "SKILL",
            ResourceKind::Contact => "CONTACTS",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ResourceKind::Blog => "Blog",
            ResourceKind::Project => "Project",
            ResourceKind::Skill => "Skill",
            ResourceKind::Contact => "Message",
        }
    }

    pub fn list_route(self) -> &'static str {
        match self {
            ResourceKind::Blog => "/blogs",
            ResourceKind::Project => "/projects",
            ResourceKind::Skill => "/skill",
            ResourceKind::Contact => "/contacts",
        }
    }

    fn slug_segment(self) -> &'static str {
        match self {
            ResourceKind::Blog => "blog",
            ResourceKind::Project => "project",
            ResourceKind::Skill => "skill",
            ResourceKind::Contact => "contact",
        }
    }

    pub fn create_route(self) -> Option<String> {
        self.is_editable()
            .then(|| format!("{}/create-{}", self.list_route(), self.slug_segment()))
    }

    pub fn update_route(self, id: &str) -> Option<String> {
        self.is_editable().then(|| {
            format!("{}/update-{}/{}", self.list_route(), self.slug_segment(), urlencoding::encode(id))
        })
    }

    pub fn detail_route(self, id: &str) -> Option<String> {
        self.is_editable()
            .then(|| format!("{}/{}", self.list_route(), urlencoding::encode(id)))
    }

    pub fn is_editable(self) -> bool {
        !matches!(self, ResourceKind::Contact)
    }

    pub fn default_page_size(self) -> usize {
        match self {
            ResourceKind::Contact => 8,
            _ => 10,
        }
    }

    pub fn page_size_options(self) -> &'static [usize] {
        match self {
            ResourceKind::Contact => &[8, 16, 24, 32],
            _ => &[10, 20, 30, 40, 50],
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// An entity served by the remote API and listed in a management table.
pub trait Resource: Tabular + DeserializeOwned + Serialize + Clone + Send + Sync + 'static {
    const KIND: ResourceKind;
}

/// A resource with a detail page, fetched by id.
pub trait Viewable: Resource {
    type Detail: Serialize;

    fn into_detail(self) -> Self::Detail;
}

/// A resource the dashboard can create and update through a form.
pub trait Editable: Viewable {
    type Payload: Serialize + DeserializeOwned + Validate + Send + Sync;

    fn form_schema() -> &'static [FieldSpec];

    /// Adds fields derived from user input before the payload is decoded.
    fn derive_fields(_fields: &mut Map<String, Value>) {}

    /// Form values for editing an existing item.
    fn form_values(&self) -> Map<String, Value>;
}

/// Whether a mutation invalidates the resource's cache tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidationPolicy {
    /// Invalidate after every mutation that got a response, successful or not.
    #[default]
    Always,
    OnSuccess,
}

impl InvalidationPolicy {
    pub fn should_invalidate(self, succeeded: bool) -> bool {
        match self {
            InvalidationPolicy::Always => true,
            InvalidationPolicy::OnSuccess => succeeded,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
}

/// Published whenever a resource's cache tag is invalidated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceChanged {
    pub kind: ResourceKind,
    pub id: Option<String>,
    pub change: ChangeKind,
}

/// Pagination parameters forwarded to list endpoints that accept them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ListQuery {
    pub fn page(page: u32, limit: u32) -> Self {
        ListQuery { page: Some(page), limit: Some(limit) }
    }

    pub fn pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_follow_dashboard_layout() {
        assert_eq!(ResourceKind::Project.create_route().as_deref(), Some("/projects/create-project"));
        assert_eq!(ResourceKind::Skill.update_route("s1").as_deref(), Some("/skill/update-skill/s1"));
        assert_eq!(ResourceKind::Blog.detail_route("a b").as_deref(), Some("/blogs/a%20b"));
        assert_eq!(ResourceKind::Contact.detail_route("c1"), None);
        assert_eq!(ResourceKind::Contact.create_route(), None);
    }

    #[test]
    fn failed_mutation_invalidates_only_under_always() {
        assert!(InvalidationPolicy::Always.should_invalidate(false));
        assert!(!InvalidationPolicy::OnSuccess.should_invalidate(false));
        assert!(InvalidationPolicy::OnSuccess.should_invalidate(true));
    }

    #[test]
    fn list_query_pairs_skip_missing_values() {
        assert!(ListQuery::default().pairs().is_empty());
        assert_eq!(
            ListQuery::page(2, 8).pairs(),
            vec![("limit".to_string(), "8".to_string()), ("page".to_string(), "2".to_string())]
        );
    }
}
