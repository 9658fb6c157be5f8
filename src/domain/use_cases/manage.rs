use std::collections::BTreeMap;

use dashmap::{mapref::entry::Entry, DashMap};
use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::broadcast::{self, error::TryRecvError};

use crate::{
    entities::{
        resource::{ListQuery, Resource, ResourceChanged, ResourceKind},
        session::RequestContext,
    },
    errors::{DashboardError, Notice, GENERIC_FAILURE},
    http::ApiTransport,
    table::{derive_rows, CellValue, ColumnFilter, SortDirection, SortSpec, TableCommand, TableState},
    use_cases::resource::ResourceHandler,
};

/// One session's management table over a loaded collection.
#[derive(Debug, Clone)]
pub struct ManageView<E> {
    rows: Vec<E>,
    state: TableState,
    stale: bool,
}

impl<E: Resource> ManageView<E> {
    pub fn new(rows: Vec<E>) -> Self {
        ManageView { rows, state: TableState::new(E::KIND.default_page_size()), stale: false }
    }

    pub fn rows(&self) -> &[E] {
        &self.rows
    }

    pub fn state(&self) -> &TableState {
        &self.state
    }

    /// Replaces the rows after a reload, keeping filter, sort, visibility and page size.
    fn reload(&mut self, rows: Vec<E>) {
        self.rows = rows;
        self.stale = false;
        self.state.retain_known(&self.rows);
    }

    fn apply(&mut self, command: TableCommand) -> Result<(), DashboardError> {
        self.state.apply(command, &self.rows)?;
        Ok(())
    }

    /// Removes a row confirmed deleted by the API.
    fn remove(&mut self, id: &str) {
        self.rows.retain(|row| row.row_id() != id);
        self.state.forget_row(id, &self.rows);
    }

    pub fn render(&self) -> TablePage {
        let kind = E::KIND;
        let derived = derive_rows(&self.rows, &self.state);
        let sorted = self.state.sorting.first();

        let columns = E::columns()
            .iter()
            .map(|def| ColumnView {
                id: def.id,
                header: def.header,
                sortable: def.sortable,
                hideable: def.hideable,
                visible: self.state.is_visible(def.id),
                sorted: sorted.filter(|s| s.column == def.id).map(|s| s.direction),
            })
            .collect::<Vec<_>>();

        let rows = derived
            .rows
            .iter()
            .map(|row| {
                let id = row.row_id();
                RowView {
                    id: id.to_string(),
                    cells: columns
                        .iter()
                        .filter(|c| c.visible)
                        .map(|c| (c.id, row.cell(c.id)))
                        .collect(),
                    selected: self.state.is_selected(id),
                    view_link: kind.detail_route(id),
                    edit_link: kind.update_route(id),
                }
            })
            .collect();

        TablePage {
            kind,
            title: kind.label(),
            create_link: kind.create_route(),
            search_column: E::default_filter_column(),
            search: self.state.filter_value(E::default_filter_column()).map(str::to_string),
            filters: self.state.filters.clone(),
            sorting: self.state.sorting.clone(),
            columns,
            rows,
            selection: self.state.selection.clone(),
            page: PageInfo {
                index: derived.page_index,
                size: self.state.pagination.page_size,
                count: derived.page_count,
                filtered_count: derived.filtered_count,
                total_count: self.rows.len(),
                can_previous: derived.can_previous(),
                can_next: derived.can_next(),
                size_options: kind.page_size_options(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnView {
    pub id: &'static str,
    pub header: &'static str,
    pub sortable: bool,
    pub hideable: bool,
    pub visible: bool,
    pub sorted: Option<SortDirection>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowView {
    pub id: String,
    /// Visible cells only.
    pub cells: BTreeMap<&'static str, CellValue>,
    pub selected: bool,
    pub view_link: Option<String>,
    pub edit_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageInfo {
    pub index: usize,
    pub size: usize,
    pub count: usize,
    pub filtered_count: usize,
    pub total_count: usize,
    pub can_previous: bool,
    pub can_next: bool,
    pub size_options: &'static [usize],
}

/// Rendered management table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TablePage {
    pub kind: ResourceKind,
    pub title: &'static str,
    pub create_link: Option<String>,
    pub search_column: &'static str,
    pub search: Option<String>,
    pub filters: Vec<ColumnFilter>,
    pub sorting: Vec<SortSpec>,
    pub columns: Vec<ColumnView>,
    pub rows: Vec<RowView>,
    pub selection: Vec<String>,
    pub page: PageInfo,
}

/// Result of a user action: the toast, where to go next, and the refreshed table if any.
#[derive(Debug, Clone, Serialize)]
pub struct ActionOutcome {
    pub notice: Notice,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<TablePage>,
}

/// Management views of one resource, one per session.
///
/// Views go stale when a [`ResourceChanged`] event for the resource arrives and reload
/// from the API on their next use.
pub struct ViewStore<E, T>
where
    T: ApiTransport,
{
    api: ResourceHandler<E, T>,
    views: DashMap<String, ManageView<E>>,
    events: Mutex<broadcast::Receiver<ResourceChanged>>,
    load_query: ListQuery,
}

impl<E, T> ViewStore<E, T>
where
    E: Resource,
    T: ApiTransport,
{
    pub fn new(api: ResourceHandler<E, T>, load_query: ListQuery) -> Self {
        let events = Mutex::new(api.cache().subscribe());
        ViewStore { api, views: DashMap::new(), events, load_query }
    }

    pub fn api(&self) -> &ResourceHandler<E, T> {
        &self.api
    }

    /// Marks views stale for every pending change event of this resource.
    pub fn sync(&self) {
        let mut events = self.events.lock();
        let mut changed = false;
        loop {
            match events.try_recv() {
                Ok(event) if event.kind == E::KIND => changed = true,
                Ok(_) => {}
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(kind = %E::KIND, skipped, "Change events lagged; reloading all views");
                    changed = true;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        if changed {
            self.views.iter_mut().for_each(|mut view| view.stale = true);
        }
    }

    async fn load(&self) -> Result<Vec<E>, DashboardError> {
        self.api.list_all(&self.load_query).await?.into_data(GENERIC_FAILURE)
    }

    async fn ensure_loaded(&self, session: &str) -> Result<(), DashboardError> {
        self.sync();
        let needs_load = self.views.get(session).is_none_or(|view| view.stale);
        if !needs_load {
            return Ok(());
        }

        let rows = self.load().await?;
        match self.views.entry(session.to_string()) {
            Entry::Occupied(mut entry) => entry.get_mut().reload(rows),
            Entry::Vacant(entry) => {
                entry.insert(ManageView::new(rows));
            }
        }
        Ok(())
    }

    fn render(&self, session: &str) -> Result<TablePage, DashboardError> {
        self.views
            .get(session)
            .map(|view| view.render())
            .ok_or_else(|| DashboardError::Internal(format!("no {} view for session", E::KIND)))
    }

    pub async fn page(&self, session: &str) -> Result<TablePage, DashboardError> {
        self.ensure_loaded(session).await?;
        self.render(session)
    }

    pub async fn apply(&self, session: &str, command: TableCommand) -> Result<TablePage, DashboardError> {
        self.ensure_loaded(session).await?;
        {
            let mut view = self
                .views
                .get_mut(session)
                .ok_or_else(|| DashboardError::Internal(format!("no {} view for session", E::KIND)))?;
            view.apply(command)?;
        }
        self.render(session)
    }

    /// Deletes a row through the API. On success the row leaves this session's view at once;
    /// on failure the view is untouched and the API message becomes the notice.
    pub async fn delete(&self, session: &str, ctx: &RequestContext, id: &str) -> Result<ActionOutcome, DashboardError> {
        let notice = match self.api.delete_by_id(ctx, id).await {
            Ok(envelope) if envelope.success => {
                if let Some(mut view) = self.views.get_mut(session) {
                    view.remove(id);
                }
                Notice::success(envelope.success_message(&format!("{} deleted successfully", E::KIND.label())))
            }
            Ok(envelope) => Notice::error(envelope.failure_message(GENERIC_FAILURE)),
            Err(DashboardError::Unauthenticated) => return Err(DashboardError::Unauthenticated),
            Err(e) => {
                tracing::error!(kind = %E::KIND, id, "Delete failed: {}", e);
                Notice::error(e.user_message())
            }
        };

        let rendered = self.views.get(session).map(|view| view.render());
        let table = match rendered {
            Some(table) => table,
            None => self.page(session).await?,
        };
        Ok(ActionOutcome { notice, redirect: None, table: Some(table) })
    }

    /// Drops the session's views, e.g. on logout.
    pub fn forget(&self, session: &str) {
        self.views.remove(session);
    }
}
