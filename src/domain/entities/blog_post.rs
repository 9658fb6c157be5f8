use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use validator::Validate;

use crate::{
    entities::resource::{Editable, Resource, ResourceKind, Viewable},
    forms::{FieldKind, FieldSpec},
    table::{CellValue, ColumnDef, Tabular},
    utils::html::{object_id_timestamp, reading_time_minutes, sanitize_html},
};

// ───── Constants ──────────────────────────────────────────────────────
const MIN_TITLE_LENGTH: u64 = 3;
const MAX_TITLE_LENGTH: u64 = 150;
const MAX_TAGS: u64 = 20;

// ───── API Models ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub introduction: String,
    /// Rich-text HTML from the editor.
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BlogPayload {
    #[validate(length(min = MIN_TITLE_LENGTH, max = MAX_TITLE_LENGTH, message = "Title must be between 3 and 150 characters"))]
    pub title: String,

    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,

    #[validate(length(min = 1, message = "Author is required"))]
    pub author: String,

    #[validate(length(min = 1, message = "Introduction is required"))]
    pub introduction: String,

    #[validate(length(min = 1, message = "Content cannot be empty"))]
    pub content: String,

    #[validate(url(message = "Image must be a valid URL"))]
    pub image: Option<String>,

    #[validate(length(max = MAX_TAGS, message = "Too many tags provided"))]
    pub tags: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct BlogDetailView {
    #[serde(flatten)]
    pub blog: BlogPost,
    pub content_html: String,
    pub reading_minutes: usize,
    pub published_on: Option<DateTime<Utc>>,
}

// ───── Table ──────────────────────────────────────────────────────────

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::unsorted("image", "Image"),
    ColumnDef::new("title", "Blog Title").pinned(),
    ColumnDef::new("category", "Category"),
    ColumnDef::new("author", "Author"),
    ColumnDef::new("tags", "Tags"),
    ColumnDef::new("status", "Status"),
];

impl Tabular for BlogPost {
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
            "image" => CellValue::optional_text(self.image.as_deref()),
            "title" => CellValue::text(&self.title),
            "category" => CellValue::text(&self.category),
            "author" => CellValue::text(&self.author),
            "tags" => CellValue::List(self.tags.clone()),
            "status" => CellValue::text(if self.is_deleted { "Deleted" } else { "Published" }),
            _ => CellValue::Empty,
        }
    }
}

// ───── Resource ───────────────────────────────────────────────────────

impl Resource for BlogPost {
    const KIND: ResourceKind = ResourceKind::Blog;
}

impl Viewable for BlogPost {
    type Detail = BlogDetailView;

    fn into_detail(self) -> BlogDetailView {
        let published_on = self.created_at.or_else(|| object_id_timestamp(&self.id));
        BlogDetailView {
            content_html: sanitize_html(&self.content),
            reading_minutes: reading_time_minutes(&self.content),
            published_on,
            blog: self,
        }
    }
}

const FORM: &[FieldSpec] = &[
    FieldSpec::required("title", "Title", FieldKind::Text),
    FieldSpec::required("category", "Category", FieldKind::Text),
    FieldSpec::required("author", "Author", FieldKind::Text),
    FieldSpec::optional("image", "Image URL", FieldKind::Url),
    FieldSpec::optional("tags", "Tags", FieldKind::CommaList),
    FieldSpec::required("introduction", "Introduction", FieldKind::TextArea),
    FieldSpec::required("content", "Content", FieldKind::RichText),
];

impl Editable for BlogPost {
    type Payload = BlogPayload;

    fn form_schema() -> &'static [FieldSpec] {
        FORM
    }

    fn form_values(&self) -> Map<String, Value> {
        let values = json!({
            "title": self.title,
            "category": self.category,
            "author": self.author,
            "image": self.image,
            "tags": self.tags.join(", "),
            "introduction": self.introduction,
            "content": self.content,
        });
        values.as_object().cloned().unwrap_or_default()
    }
}
