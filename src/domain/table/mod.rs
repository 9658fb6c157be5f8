//! Client-side table state shared by every management view: free-text filter, single-column sort,
//! column visibility, row selection and pagination over an in-memory collection.

pub mod column;
pub mod derive;
pub mod state;

pub use column::{CellValue, ColumnDef, Tabular};
pub use derive::{apply_filter, apply_sort, derive_rows, page_count, paginate, DerivedRows};
pub use state::{ColumnFilter, Pagination, SortDirection, SortSpec, TableCommand, TableError, TableState};

#[cfg(test)]
pub(crate) mod testing {
    use super::{CellValue, ColumnDef, Tabular};

    #[derive(Debug, Clone, PartialEq)]
    pub struct Row {
        pub id: String,
        pub title: String,
        pub tags: Vec<String>,
    }

    pub fn row(id: &str, title: &str, tags: &[&str]) -> Row {
        Row {
            id: id.to_string(),
            title: title.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    const COLUMNS: &[ColumnDef] = &[
        ColumnDef::unsorted("image", "Image"),
        ColumnDef::new("title", "Title").pinned(),
        ColumnDef::new("tags", "Tags"),
    ];

    impl Tabular for Row {
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
                "title" => CellValue::text(&self.title),
                "tags" => CellValue::List(self.tags.clone()),
                _ => CellValue::Empty,
            }
        }
    }
}
