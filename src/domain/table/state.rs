use std::collections::BTreeMap;

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::forms::toggle_membership;

use super::{column::Tabular, derive::{apply_filter, page_count}};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub column: String,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnFilter {
    pub column: String,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page_index: usize,
    pub page_size: usize,
}

/// Everything a management table remembers between renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableState {
    /// At most one entry is kept.
    pub sorting: Vec<SortSpec>,
    pub filters: Vec<ColumnFilter>,
    /// Columns missing from the map are visible.
    pub visibility: BTreeMap<String, bool>,
    pub selection: Vec<String>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum TableCommand {
    SetFilter {
        #[serde(default)]
        column: Option<String>,
        value: String,
    },
    ClearFilters,
    SortBy {
        column: String,
        direction: SortDirection,
    },
    ToggleSort {
        column: String,
    },
    ClearSort,
    SetColumnVisibility {
        column: String,
        visible: bool,
    },
    ToggleRowSelection {
        id: String,
    },
    NextPage,
    PreviousPage,
    GoToPage {
        index: usize,
    },
    SetPageSize {
        size: usize,
    },
}

#[derive(Debug, Display, PartialEq, Eq)]
pub enum TableError {
    #[display("unknown column '{_0}'")]
    UnknownColumn(String),

    #[display("column '{_0}' cannot be sorted")]
    NotSortable(String),

    #[display("column '{_0}' cannot be hidden")]
    NotHideable(String),

    #[display("no row with id '{_0}'")]
    UnknownRow(String),

    #[display("page size must be positive")]
    InvalidPageSize,
}

impl std::error::Error for TableError {}

impl TableState {
    pub fn new(page_size: usize) -> Self {
        TableState {
            sorting: Vec::new(),
            filters: Vec::new(),
            visibility: BTreeMap::new(),
            selection: Vec::new(),
            pagination: Pagination { page_index: 0, page_size: page_size.max(1) },
        }
    }

    pub fn is_visible(&self, column: &str) -> bool {
        self.visibility.get(column).copied().unwrap_or(true)
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.iter().any(|s| s == id)
    }

    pub fn filter_value(&self, column: &str) -> Option<&str> {
        self.filters
            .iter()
            .find(|f| f.column == column)
            .map(|f| f.value.as_str())
    }

    /// Applies one reducer action. `rows` is the full source collection.
    pub fn apply<E: Tabular>(&mut self, command: TableCommand, rows: &[E]) -> Result<(), TableError> {
        match command {
            TableCommand::SetFilter { column, value } => {
                let column = column.unwrap_or_else(|| E::default_filter_column().to_string());
                require_column::<E>(&column)?;
                self.filters.retain(|f| f.column != column);
                if !value.is_empty() {
                    self.filters.push(ColumnFilter { column, value });
                }
                self.pagination.page_index = 0;
            }
            TableCommand::ClearFilters => {
                self.filters.clear();
                self.pagination.page_index = 0;
            }
            TableCommand::SortBy { column, direction } => {
                require_sortable::<E>(&column)?;
                self.sorting = vec![SortSpec { column, direction }];
            }
            TableCommand::ToggleSort { column } => {
                require_sortable::<E>(&column)?;
                let next = match self.sorting.first() {
                    Some(spec) if spec.column == column => match spec.direction {
                        SortDirection::Asc => Some(SortDirection::Desc),
                        SortDirection::Desc => None,
                    },
                    _ => Some(SortDirection::Asc),
                };
                self.sorting = next
                    .map(|direction| vec![SortSpec { column, direction }])
                    .unwrap_or_default();
            }
            TableCommand::ClearSort => self.sorting.clear(),
            TableCommand::SetColumnVisibility { column, visible } => {
                let def = E::column(&column).ok_or_else(|| TableError::UnknownColumn(column.clone()))?;
                if !visible && !def.hideable {
                    return Err(TableError::NotHideable(column));
                }
                self.visibility.insert(column, visible);
            }
            TableCommand::ToggleRowSelection { id } => {
                if !rows.iter().any(|r| r.row_id() == id) {
                    return Err(TableError::UnknownRow(id));
                }
                toggle_membership(&mut self.selection, &id);
            }
            TableCommand::NextPage => {
                let last = self.last_page_index(rows);
                if self.pagination.page_index < last {
                    self.pagination.page_index += 1;
                }
            }
            TableCommand::PreviousPage => {
                self.pagination.page_index = self.pagination.page_index.saturating_sub(1);
            }
            TableCommand::GoToPage { index } => {
                self.pagination.page_index = index.min(self.last_page_index(rows));
            }
            TableCommand::SetPageSize { size } => {
                if size == 0 {
                    return Err(TableError::InvalidPageSize);
                }
                self.pagination.page_size = size;
                self.pagination.page_index = 0;
            }
        }
        Ok(())
    }

    /// Drops a deleted row from the selection and pulls the page index back in range.
    pub fn forget_row<E: Tabular>(&mut self, id: &str, rows: &[E]) {
        self.selection.retain(|s| s != id);
        self.clamp_page(rows);
    }

    pub fn clamp_page<E: Tabular>(&mut self, rows: &[E]) {
        let last = self.last_page_index(rows);
        if self.pagination.page_index > last {
            self.pagination.page_index = last;
        }
    }

    /// Drops selections of rows that are gone after a reload and clamps the page.
    pub fn retain_known<E: Tabular>(&mut self, rows: &[E]) {
        self.selection.retain(|id| rows.iter().any(|r| r.row_id() == id));
        self.clamp_page(rows);
    }

    fn last_page_index<E: Tabular>(&self, rows: &[E]) -> usize {
        let filtered = apply_filter(rows, &self.filters).len();
        page_count(filtered, self.pagination.page_size).saturating_sub(1)
    }
}

fn require_column<E: Tabular>(column: &str) -> Result<(), TableError> {
    E::column(column)
        .map(|_| ())
        .ok_or_else(|| TableError::UnknownColumn(column.to_string()))
}

fn require_sortable<E: Tabular>(column: &str) -> Result<(), TableError> {
    match E::column(column) {
        Some(def) if def.sortable => Ok(()),
        Some(_) => Err(TableError::NotSortable(column.to_string())),
        None => Err(TableError::UnknownColumn(column.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::testing::{row, Row};

    fn rows(n: usize) -> Vec<Row> {
        (0..n).map(|i| row(&format!("p{i}"), &format!("Project {i:02}"), &[])).collect()
    }

    #[test]
    fn previous_on_first_page_is_a_no_op() {
        let data = rows(3);
        let mut state = TableState::new(10);
        state.apply(TableCommand::PreviousPage, &data).unwrap();
        assert_eq!(state.pagination.page_index, 0);
    }

    #[test]
    fn next_on_last_page_is_a_no_op() {
        let data = rows(12);
        let mut state = TableState::new(10);
        state.apply(TableCommand::NextPage, &data).unwrap();
        assert_eq!(state.pagination.page_index, 1);
        state.apply(TableCommand::NextPage, &data).unwrap();
        assert_eq!(state.pagination.page_index, 1);
    }

    #[test]
    fn next_on_empty_collection_stays_on_first_page() {
        let data: Vec<Row> = Vec::new();
        let mut state = TableState::new(8);
        state.apply(TableCommand::NextPage, &data).unwrap();
        assert_eq!(state.pagination.page_index, 0);
    }

    #[test]
    fn filter_change_resets_page() {
        let data = rows(25);
        let mut state = TableState::new(10);
        state.apply(TableCommand::GoToPage { index: 2 }, &data).unwrap();
        assert_eq!(state.pagination.page_index, 2);

        state
            .apply(TableCommand::SetFilter { column: None, value: "1".into() }, &data)
            .unwrap();
        assert_eq!(state.pagination.page_index, 0);
        assert_eq!(state.filter_value("title"), Some("1"));
    }

    #[test]
    fn empty_filter_value_removes_filter() {
        let data = rows(2);
        let mut state = TableState::new(10);
        state.apply(TableCommand::SetFilter { column: None, value: "x".into() }, &data).unwrap();
        state.apply(TableCommand::SetFilter { column: None, value: String::new() }, &data).unwrap();
        assert!(state.filters.is_empty());
    }

    #[test]
    fn go_to_page_is_clamped() {
        let data = rows(12);
        let mut state = TableState::new(5);
        state.apply(TableCommand::GoToPage { index: 99 }, &data).unwrap();
        assert_eq!(state.pagination.page_index, 2);
    }

    #[test]
    fn page_size_change_resets_page_and_rejects_zero() {
        let data = rows(30);
        let mut state = TableState::new(10);
        state.apply(TableCommand::NextPage, &data).unwrap();
        state.apply(TableCommand::SetPageSize { size: 20 }, &data).unwrap();
        assert_eq!(state.pagination, Pagination { page_index: 0, page_size: 20 });
        assert_eq!(
            state.apply(TableCommand::SetPageSize { size: 0 }, &data),
            Err(TableError::InvalidPageSize)
        );
    }

    #[test]
    fn toggle_sort_cycles_through_directions() {
        let data = rows(2);
        let mut state = TableState::new(10);
        let toggle = || TableCommand::ToggleSort { column: "title".into() };

        state.apply(toggle(), &data).unwrap();
        assert_eq!(state.sorting[0].direction, SortDirection::Asc);
        state.apply(toggle(), &data).unwrap();
        assert_eq!(state.sorting[0].direction, SortDirection::Desc);
        state.apply(toggle(), &data).unwrap();
        assert!(state.sorting.is_empty());
    }

    #[test]
    fn sort_replaces_previous_spec() {
        let data = rows(2);
        let mut state = TableState::new(10);
        state
            .apply(TableCommand::SortBy { column: "title".into(), direction: SortDirection::Desc }, &data)
            .unwrap();
        state
            .apply(TableCommand::SortBy { column: "tags".into(), direction: SortDirection::Asc }, &data)
            .unwrap();
        assert_eq!(state.sorting.len(), 1);
        assert_eq!(state.sorting[0].column, "tags");
    }

    #[test]
    fn rejects_unknown_and_unsortable_columns() {
        let data = rows(1);
        let mut state = TableState::new(10);
        assert_eq!(
            state.apply(TableCommand::ToggleSort { column: "nope".into() }, &data),
            Err(TableError::UnknownColumn("nope".into()))
        );
        assert_eq!(
            state.apply(TableCommand::ToggleSort { column: "image".into() }, &data),
            Err(TableError::NotSortable("image".into()))
        );
    }

    #[test]
    fn pinned_columns_cannot_be_hidden() {
        let data = rows(1);
        let mut state = TableState::new(10);
        assert_eq!(
            state.apply(TableCommand::SetColumnVisibility { column: "title".into(), visible: false }, &data),
            Err(TableError::NotHideable("title".into()))
        );
        state
            .apply(TableCommand::SetColumnVisibility { column: "tags".into(), visible: false }, &data)
            .unwrap();
        assert!(!state.is_visible("tags"));
        assert!(state.is_visible("title"));
    }

    #[test]
    fn row_selection_toggles_membership() {
        let data = rows(3);
        let mut state = TableState::new(10);
        let toggle = |id: &str| TableCommand::ToggleRowSelection { id: id.into() };

        state.apply(toggle("p1"), &data).unwrap();
        state.apply(toggle("p2"), &data).unwrap();
        state.apply(toggle("p1"), &data).unwrap();
        assert_eq!(state.selection, vec!["p2".to_string()]);
        assert_eq!(state.apply(toggle("zz"), &data), Err(TableError::UnknownRow("zz".into())));
    }

    #[test]
    fn forgetting_last_row_of_last_page_moves_back() {
        let mut data = rows(11);
        let mut state = TableState::new(10);
        state.apply(TableCommand::NextPage, &data).unwrap();
        state.apply(TableCommand::ToggleRowSelection { id: "p10".into() }, &data).unwrap();

        data.retain(|r| r.id != "p10");
        state.forget_row("p10", &data);

        assert_eq!(state.pagination.page_index, 0);
        assert!(state.selection.is_empty());
    }

    #[test]
    fn commands_deserialize_from_tagged_json() {
        let command: TableCommand =
            serde_json::from_str(r#"{"action":"set_filter","value":"React"}"#).unwrap();
        assert_eq!(command, TableCommand::SetFilter { column: None, value: "React".into() });

        let command: TableCommand =
            serde_json::from_str(r#"{"action":"sort_by","column":"title","direction":"desc"}"#).unwrap();
        assert_eq!(
            command,
            TableCommand::SortBy { column: "title".into(), direction: SortDirection::Desc }
        );
        let command: TableCommand = serde_json::from_str(r#"{"action":"next_page"}"#).unwrap();
        assert_eq!(command, TableCommand::NextPage);
    }
}
