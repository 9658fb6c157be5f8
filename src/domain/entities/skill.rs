use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use validator::Validate;

use crate::{
    entities::resource::{Editable, Resource, ResourceKind, Viewable},
    forms::{FieldKind, FieldSpec},
    table::{CellValue, ColumnDef, Tabular},
    utils::html::sanitize_html,
};

pub const SKILL_CATEGORIES: &[&str] = &["frontend", "backend", "devops", "tools", "softSkills", "others"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SkillCategory {
    Frontend,
    Backend,
    Devops,
    Tools,
    SoftSkills,
    Others,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 6] = [
        SkillCategory::Frontend,
        SkillCategory::Backend,
        SkillCategory::Devops,
        SkillCategory::Tools,
        SkillCategory::SoftSkills,
        SkillCategory::Others,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SkillCategory::Frontend => "frontend",
            SkillCategory::Backend => "backend",
            SkillCategory::Devops => "devops",
            SkillCategory::Tools => "tools",
            SkillCategory::SoftSkills => "softSkills",
            SkillCategory::Others => "others",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    /// Rich-text HTML.
    #[serde(default)]
    pub description: String,
    pub category: SkillCategory,
    #[serde(default)]
    pub is_deleted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SkillPayload {
    #[validate(length(min = 1, max = 60, message = "Name must be between 1 and 60 characters"))]
    pub name: String,

    #[validate(url(message = "Icon must be a valid URL"))]
    pub icon: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    pub category: SkillCategory,
}

#[derive(Debug, Serialize)]
pub struct SkillDetailView {
    #[serde(flatten)]
    pub skill: Skill,
    pub description_html: String,
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::unsorted("icon", "Icon"),
    ColumnDef::new("name", "Skill Name").pinned(),
    ColumnDef::new("description", "Description"),
    ColumnDef::new("category", "Category"),
];

impl Tabular for Skill {
    fn row_id(&self) -> &str {
        &self.id
    }

    fn columns() -> &'static [ColumnDef] {
        COLUMNS
    }

    fn default_filter_column() -> &'static str {
        "name"
    }

    fn cell(&self, column: &str) -> CellValue {
        match column {
            "icon" => CellValue::optional_text(Some(&self.icon)),
            "name" => CellValue::text(&self.name),
            "description" => CellValue::text(&self.description),
            "category" => CellValue::text(self.category.as_str()),
            _ => CellValue::Empty,
        }
    }
}

impl Resource for Skill {
    const KIND: ResourceKind = ResourceKind::Skill;
}

impl Viewable for Skill {
    type Detail = SkillDetailView;

    fn into_detail(self) -> SkillDetailView {
        SkillDetailView {
            description_html: sanitize_html(&self.description),
            skill: self,
        }
    }
}

const FORM: &[FieldSpec] = &[
    FieldSpec::required("name", "Name", FieldKind::Text),
    FieldSpec::required("icon", "Icon URL", FieldKind::Url),
    FieldSpec::required("description", "Description", FieldKind::RichText),
    FieldSpec::required("category", "Category", FieldKind::Select(SKILL_CATEGORIES)),
];

impl Editable for Skill {
    type Payload = SkillPayload;

    fn form_schema() -> &'static [FieldSpec] {
        FORM
    }

    fn form_values(&self) -> Map<String, Value> {
        let values = json!({
            "name": self.name,
            "icon": self.icon,
            "description": self.description,
            "category": self.category,
        });
        values.as_object().cloned().unwrap_or_default()
    }
}
