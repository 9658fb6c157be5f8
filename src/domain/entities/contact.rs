use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    entities::resource::{Resource, ResourceKind},
    table::{CellValue, ColumnDef, Tabular},
    utils::html::object_id_timestamp,
};

/// A message left through the public contact form. Read and delete only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl ContactMessage {
    /// `createdAt`, or the time embedded in the object id.
    pub fn received_at(&self) -> Option<DateTime<Utc>> {
        self.created_at.or_else(|| object_id_timestamp(&self.id))
    }
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("name", "Name").pinned(),
    ColumnDef::new("email", "Email"),
    ColumnDef::new("message", "Message"),
    ColumnDef::new("createdAt", "Received"),
];

impl Tabular for ContactMessage {
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
            "name" => CellValue::text(&self.name),
            "email" => CellValue::text(&self.email),
            "message" => CellValue::text(&self.message),
            "createdAt" => self.received_at().map(CellValue::Time).unwrap_or(CellValue::Empty),
            _ => CellValue::Empty,
        }
    }
}

impl Resource for ContactMessage {
    const KIND: ResourceKind = ResourceKind::Contact;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn received_at_falls_back_to_object_id() {
        let message: ContactMessage = serde_json::from_value(json!({
            "_id": "65a1b2c3d4e5f60718293a4b",
            "name": "Grace",
            "email": "grace@example.com",
            "message": "Hello"
        }))
        .unwrap();
        assert_eq!(message.received_at().map(|t| t.timestamp()), Some(0x65a1b2c3));
        assert!(matches!(message.cell("createdAt"), CellValue::Time(_)));
    }
}
