use super::{
    column::Tabular,
    state::{ColumnFilter, SortDirection, SortSpec, TableState},
};

/// Rows of one rendered page, derived from the source collection and the table state.
#[derive(Debug)]
pub struct DerivedRows<'a, E> {
    pub rows: Vec<&'a E>,
    pub filtered_count: usize,
    pub page_count: usize,
    /// Requested page index clamped to the pages that exist.
    pub page_index: usize,
}

impl<E> DerivedRows<'_, E> {
    pub fn can_previous(&self) -> bool {
        self.page_index > 0
    }

    pub fn can_next(&self) -> bool {
        self.page_index + 1 < self.page_count
    }
}

/// Keeps rows whose filtered columns contain the filter value, ignoring case. Order is preserved.
pub fn apply_filter<'a, E: Tabular>(rows: &'a [E], filters: &[ColumnFilter]) -> Vec<&'a E> {
    let needles: Vec<(&str, String)> = filters
        .iter()
        .filter(|f| !f.value.is_empty())
        .map(|f| (f.column.as_str(), f.value.to_lowercase()))
        .collect();

    rows.iter()
        .filter(|row| {
            needles.iter().all(|(column, needle)| {
                row.cell(column).filter_text().to_lowercase().contains(needle.as_str())
            })
        })
        .collect()
}

/// Stable sort by the first sort spec, if any.
pub fn apply_sort<E: Tabular>(rows: &mut [&E], sorting: &[SortSpec]) {
    let Some(spec) = sorting.first() else {
        return;
    };
    rows.sort_by(|a, b| {
        let ordering = a.cell(&spec.column).compare(&b.cell(&spec.column));
        match spec.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// `rows[index * size .. min((index + 1) * size, len)]`, empty when out of range.
pub fn paginate<T>(rows: &[T], page_size: usize, page_index: usize) -> &[T] {
    let start = page_index.saturating_mul(page_size).min(rows.len());
    let end = start.saturating_add(page_size).min(rows.len());
    &rows[start..end]
}

/// Filter, then sort, then slice the current page.
pub fn derive_rows<'a, E: Tabular>(rows: &'a [E], state: &TableState) -> DerivedRows<'a, E> {
    let mut filtered = apply_filter(rows, &state.filters);
    apply_sort(&mut filtered, &state.sorting);

    let page_size = state.pagination.page_size.max(1);
    let pages = page_count(filtered.len(), page_size);
    let page_index = state.pagination.page_index.min(pages.saturating_sub(1));
    let page = paginate(&filtered, page_size, page_index).to_vec();

    DerivedRows {
        rows: page,
        filtered_count: filtered.len(),
        page_count: pages,
        page_index,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{
        state::TableCommand,
        testing::{row, Row},
    };

    fn ids(rows: &[&Row]) -> Vec<String> {
        rows.iter().map(|r| r.id.clone()).collect()
    }

    fn sample() -> Vec<Row> {
        vec![
            row("1", "Rust CLI", &["Rust"]),
            row("2", "react dashboard", &["React", "TypeScript"]),
            row("3", "Portfolio", &["React Native"]),
            row("4", "API Server", &["Node"]),
        ]
    }

    fn filter(value: &str, column: &str) -> Vec<ColumnFilter> {
        vec![ColumnFilter { column: column.into(), value: value.into() }]
    }

    #[test]
    fn empty_filter_returns_everything_in_order() {
        let data = sample();
        assert_eq!(ids(&apply_filter(&data, &filter("", "title"))), vec!["1", "2", "3", "4"]);
        assert_eq!(ids(&apply_filter(&data, &[])), vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn filter_is_a_case_insensitive_substring_match() {
        let data = sample();
        assert_eq!(ids(&apply_filter(&data, &filter("REACT", "title"))), vec!["2"]);
        assert_eq!(ids(&apply_filter(&data, &filter("o", "title"))), vec!["2", "3"]);
    }

    #[test]
    fn filter_on_technologies_matches_list_members() {
        let data = sample();
        assert_eq!(ids(&apply_filter(&data, &filter("React", "tags"))), vec!["2", "3"]);
    }

    #[test]
    fn filtering_twice_is_idempotent() {
        let data = sample();
        let once: Vec<Row> = apply_filter(&data, &filter("r", "title")).into_iter().cloned().collect();
        let twice = apply_filter(&once, &filter("r", "title"));
        assert_eq!(ids(&twice), once.iter().map(|r| r.id.clone()).collect::<Vec<_>>());
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let data = vec![
            row("a", "Same", &[]),
            row("b", "Other", &[]),
            row("c", "same", &[]),
            row("d", "Same", &[]),
        ];
        let mut refs: Vec<&Row> = data.iter().collect();
        apply_sort(&mut refs, &[SortSpec { column: "title".into(), direction: SortDirection::Asc }]);
        assert_eq!(ids(&refs), vec!["b", "a", "d", "c"]);

        let mut refs: Vec<&Row> = data.iter().collect();
        apply_sort(&mut refs, &[SortSpec { column: "title".into(), direction: SortDirection::Desc }]);
        assert_eq!(ids(&refs), vec!["c", "a", "d", "b"]);
    }

    #[test]
    fn paginate_slices_within_bounds() {
        let data: Vec<u32> = (0..12).collect();
        assert_eq!(paginate(&data, 10, 0), &data[0..10]);
        assert_eq!(paginate(&data, 10, 1), &[10, 11]);
        assert!(paginate(&data, 10, 2).is_empty());
        assert!(paginate(&data, 10, usize::MAX).is_empty());
        for index in 0..3 {
            assert!(paginate(&data, 5, index).len() <= 5);
        }
    }

    #[test]
    fn twelve_projects_over_pages_of_ten() {
        let data: Vec<Row> = (0..12).map(|i| row(&format!("p{i}"), &format!("Project {i:02}"), &[])).collect();
        let mut state = TableState::new(10);

        let first = derive_rows(&data, &state);
        assert_eq!(first.rows.len(), 10);
        assert!(!first.can_previous());
        assert!(first.can_next());

        state.apply(TableCommand::NextPage, &data).unwrap();
        let second = derive_rows(&data, &state);
        assert_eq!(ids(&second.rows), vec!["p10", "p11"]);
        assert!(!second.can_next());

        state.apply(TableCommand::NextPage, &data).unwrap();
        assert_eq!(derive_rows(&data, &state).page_index, 1);
    }

    #[test]
    fn out_of_range_page_is_clamped_during_derivation() {
        let data: Vec<Row> = (0..12).map(|i| row(&format!("p{i}"), "x", &[])).collect();
        let mut state = TableState::new(5);
        state.pagination.page_index = 2;
        state.pagination.page_size = 10;

        let derived = derive_rows(&data, &state);
        assert_eq!(derived.page_index, 1);
        assert_eq!(derived.rows.len(), 2);
    }

    #[test]
    fn derivation_filters_before_sorting_and_paging() {
        let data = sample();
        let mut state = TableState::new(1);
        state.filters = filter("react", "tags");
        state.sorting = vec![SortSpec { column: "title".into(), direction: SortDirection::Asc }];

        let derived = derive_rows(&data, &state);
        assert_eq!(derived.filtered_count, 2);
        assert_eq!(derived.page_count, 2);
        assert_eq!(ids(&derived.rows), vec!["3"]);
    }
}
