use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Static description of one table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnDef {
    pub id: &'static str,
    pub header: &'static str,
    pub sortable: bool,
    pub hideable: bool,
}

impl ColumnDef {
    pub const fn new(id: &'static str, header: &'static str) -> Self {
        ColumnDef { id, header, sortable: true, hideable: true }
    }

    /// Column whose values have no meaningful order, e.g. images or link groups.
    pub const fn unsorted(id: &'static str, header: &'static str) -> Self {
        ColumnDef { id, header, sortable: false, hideable: true }
    }

    pub const fn pinned(self) -> Self {
        ColumnDef { hideable: false, ..self }
    }
}

/// Value of one cell, as rendered and as compared for filtering and sorting.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    List(Vec<String>),
    Flag(bool),
    Time(DateTime<Utc>),
    Empty,
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    pub fn optional_text(value: Option<&str>) -> Self {
        match value {
            Some(v) if !v.is_empty() => CellValue::Text(v.to_string()),
            _ => CellValue::Empty,
        }
    }

    /// Stringified form used by the free-text filter.
    pub fn filter_text(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::List(items) => items.join(", "),
            CellValue::Flag(b) => b.to_string(),
            CellValue::Time(t) => t.to_rfc3339(),
            CellValue::Empty => String::new(),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            CellValue::Empty => 0,
            CellValue::Flag(_) => 1,
            CellValue::Time(_) => 2,
            CellValue::Text(_) => 3,
            CellValue::List(_) => 4,
        }
    }

    /// Total order used by column sorting. Text compares case-insensitively first.
    pub fn compare(&self, other: &CellValue) -> Ordering {
        match (self, other) {
            (CellValue::Text(a), CellValue::Text(b)) => compare_text(a, b),
            (CellValue::List(a), CellValue::List(b)) => compare_text(&a.join(", "), &b.join(", ")),
            (CellValue::Flag(a), CellValue::Flag(b)) => a.cmp(b),
            (CellValue::Time(a), CellValue::Time(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// A row type that can be shown in a management table.
pub trait Tabular {
    fn row_id(&self) -> &str;

    fn columns() -> &'static [ColumnDef];

    /// Column targeted by the search box.
    fn default_filter_column() -> &'static str;

    fn cell(&self, column: &str) -> CellValue;

    fn column(id: &str) -> Option<&'static ColumnDef> {
        Self::columns().iter().find(|c| c.id == id)
    }
}
