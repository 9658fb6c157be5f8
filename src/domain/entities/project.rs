use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use validator::{Validate, ValidationError};

use crate::{
    entities::resource::{Editable, Resource, ResourceKind, Viewable},
    forms::{slugify, FieldKind, FieldSpec},
    table::{CellValue, ColumnDef, Tabular},
    utils::html::is_http_url,
};

pub const PROJECT_STATUSES: &[&str] = &["ongoing", "completed", "maintenance"];

pub const TECHNOLOGY_OPTIONS: &[&str] = &[
    "javascript",
    "typescript",
    "mongodb",
    "mongoose",
    "tailwindCss",
    "shadcnUi",
    "antDesign",
    "materialUi",
    "jwt",
    "other",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Ongoing,
    Completed,
    Maintenance,
}

impl ProjectStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectStatus::Ongoing => "ongoing",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Maintenance => "maintenance",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    /// Image URLs; the first is the thumbnail.
    #[serde(default)]
    pub image: Vec<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub project_goals: Option<String>,
    pub status: ProjectStatus,
    #[serde(default)]
    pub live_demo_link: String,
    #[serde(default)]
    pub repo_link_client: Option<String>,
    #[serde(default)]
    pub repo_link_server: Option<String>,
    #[serde(default)]
    pub is_published: Option<bool>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPayload {
    #[validate(length(min = 1, message = "Title could not be turned into a slug"))]
    pub slug: String,

    #[validate(length(min = 3, message = "Title must be at least 3 characters long"))]
    pub title: String,

    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,

    #[validate(length(min = 10, message = "Description should be more detailed"))]
    pub description: String,

    #[validate(custom(function = "validate_urls"))]
    pub image: Vec<String>,

    #[validate(length(min = 1, message = "Select at least one technology"))]
    pub technologies: Vec<String>,

    pub features: Vec<String>,

    pub project_goals: Option<String>,

    pub status: ProjectStatus,

    #[validate(url(message = "Live demo link must be a valid URL"))]
    pub live_demo_link: String,

    #[validate(url(message = "Client repository must be a valid URL"))]
    pub repo_link_client: Option<String>,

    #[validate(url(message = "Server repository must be a valid URL"))]
    pub repo_link_server: Option<String>,

    pub is_published: bool,
}

fn validate_urls(urls: &[String]) -> Result<(), ValidationError> {
    if urls.iter().all(|u| is_http_url(u)) {
        Ok(())
    } else {
        let mut err = ValidationError::new("invalid_image_url");
        err.message = Some("Every image must be a valid URL".into());
        Err(err)
    }
}

#[derive(Debug, Serialize)]
pub struct ProjectDetailView {
    #[serde(flatten)]
    pub project: Project,
    pub thumbnail: Option<String>,
}

impl Project {
    /// First image that is a usable URL.
    pub fn thumbnail(&self) -> Option<&str> {
        self.image.iter().map(String::as_str).find(|u| is_http_url(u))
    }

    fn links(&self) -> Vec<String> {
        std::iter::once(self.live_demo_link.as_str())
            .chain(self.repo_link_client.as_deref())
            .chain(self.repo_link_server.as_deref())
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect()
    }
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::unsorted("thumbnail", "Thumbnail"),
    ColumnDef::new("title", "Project Title").pinned(),
    ColumnDef::new("category", "Category"),
    ColumnDef::new("technologies", "Tech Stack"),
    ColumnDef::new("status", "Status"),
    ColumnDef::unsorted("links", "Links"),
];

impl Tabular for Project {
    fn row_id(&self) -> &str {
        &self.id
    }

    fn columns() -> &'static [ColumnDef] {
        COLUMNS
    }

    fn default_filter_column() -> &'static str {
        "title"
    }

    fn cell(&self, column: &str) -> CellValue {
        match column {
            "thumbnail" => CellValue::optional_text(self.thumbnail()),
            "title" => CellValue::text(&self.title),
            "category" => CellValue::text(&self.category),
            "technologies" => CellValue::List(self.technologies.clone()),
            "status" => CellValue::text(self.status.as_str()),
            "links" => CellValue::List(self.links()),
            _ => CellValue::Empty,
        }
    }
}

impl Resource for Project {
    const KIND: ResourceKind = ResourceKind::Project;
}

impl Viewable for Project {
    type Detail = ProjectDetailView;

    fn into_detail(self) -> ProjectDetailView {
        ProjectDetailView {
            thumbnail: self.thumbnail().map(str::to_string),
            project: self,
        }
    }
}

const FORM: &[FieldSpec] = &[
    FieldSpec::required("title", "Title", FieldKind::Text),
    FieldSpec::required("category", "Category", FieldKind::Text),
    FieldSpec::required("description", "Description", FieldKind::TextArea),
    FieldSpec::optional("image", "Image URLs", FieldKind::CommaList),
    FieldSpec::required("technologies", "Technologies", FieldKind::MultiSelect(TECHNOLOGY_OPTIONS)),
    FieldSpec::optional("features", "Key Features", FieldKind::LineList),
    FieldSpec::optional("projectGoals", "Project Goals", FieldKind::TextArea),
    FieldSpec::required("status", "Status", FieldKind::Select(PROJECT_STATUSES)),
    FieldSpec::required("liveDemoLink", "Live Demo Link", FieldKind::Url),
    FieldSpec::optional("repoLinkClient", "Client Repository", FieldKind::Url),
    FieldSpec::optional("repoLinkServer", "Server Repository", FieldKind::Url),
    FieldSpec::optional("isPublished", "Published", FieldKind::Checkbox),
];

impl Editable for Project {
    type Payload = ProjectPayload;

    fn form_schema() -> &'static [FieldSpec] {
        FORM
    }

    fn derive_fields(fields: &mut Map<String, Value>) {
        let slug = fields
            .get("title")
            .and_then(Value::as_str)
            .map(slugify)
            .unwrap_or_default();
        fields.insert("slug".to_string(), Value::String(slug));
    }

    fn form_values(&self) -> Map<String, Value> {
        let values = json!({
            "title": self.title,
            "category": self.category,
            "description": self.description,
            "image": self.image.join(", "),
            "technologies": self.technologies,
            "features": self.features.join("\n"),
            "projectGoals": self.project_goals,
            "status": self.status,
            "liveDemoLink": self.live_demo_link,
            "repoLinkClient": self.repo_link_client,
            "repoLinkServer": self.repo_link_server,
            "isPublished": self.is_published.unwrap_or(false),
        });
        values.as_object().cloned().unwrap_or_default()
    }
}
