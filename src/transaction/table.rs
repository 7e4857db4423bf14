//! The view engine for the transaction table.
//!
//! Everything here is a pure function over an in-memory transaction slice and
//! an explicit [ViewState] value: the web layer builds a `ViewState` from
//! query parameters, asks [compute_view] for the rows to render, and owns
//! nothing but the render loop. Filter, sort, and page semantics live here so
//! they can be tested without a database or an HTTP stack.

use std::{cmp::Ordering, collections::HashSet};

use serde::{Deserialize, Serialize};

use crate::Error;

use super::core::{Transaction, TransactionId, TransactionKind};

/// The fixed number of rows per table page.
pub const PAGE_SIZE: usize = 10;

/// The column the table is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortField {
    Date,
    Amount,
    Category,
}

/// The direction the sort column is ordered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortField {
    pub fn as_query_value(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Amount => "amount",
            Self::Category => "category",
        }
    }
}

impl SortDirection {
    fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub fn as_query_value(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Which recurring status the table is restricted to, when a restriction is
/// active at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecurringFilter {
    Recurring,
    NonRecurring,
}

/// The full set of user-controlled parameters governing what the transaction
/// table currently displays.
///
/// A fresh `ViewState` is built per request; transitions consume the old
/// value and return the new one. Nothing in here is shared or ambient.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// The transactions currently ticked for bulk actions.
    pub selected_ids: HashSet<TransactionId>,
    /// The sort column.
    pub sort_field: SortField,
    /// The sort direction.
    pub sort_direction: SortDirection,
    /// Case-insensitive substring to match against descriptions.
    pub search_term: String,
    /// Restrict to income or expenses, when set.
    pub type_filter: Option<TransactionKind>,
    /// Restrict to recurring or one-time transactions, when set.
    pub recurring_filter: Option<RecurringFilter>,
    /// The 1-based page number being viewed.
    pub current_page: u64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            selected_ids: HashSet::new(),
            sort_field: SortField::Date,
            sort_direction: SortDirection::Desc,
            search_term: String::new(),
            type_filter: None,
            recurring_filter: None,
            current_page: 1,
        }
    }
}

impl ViewState {
    /// Set the search term and jump back to the first page.
    pub fn with_search(mut self, term: &str) -> Self {
        self.search_term = term.to_owned();
        self.current_page = 1;
        self
    }

    /// Set the income/expense filter and jump back to the first page.
    pub fn with_type_filter(mut self, filter: Option<TransactionKind>) -> Self {
        self.type_filter = filter;
        self.current_page = 1;
        self
    }

    /// Set the recurring filter and jump back to the first page.
    pub fn with_recurring_filter(mut self, filter: Option<RecurringFilter>) -> Self {
        self.recurring_filter = filter;
        self.current_page = 1;
        self
    }

    /// Drop all three filters and jump back to the first page.
    pub fn with_cleared_filters(mut self) -> Self {
        self.search_term.clear();
        self.type_filter = None;
        self.recurring_filter = None;
        self.current_page = 1;
        self
    }

    /// Move to `page`. Changing page discards the selection, since the
    /// selected rows are no longer the ones on screen.
    pub fn with_page(mut self, page: u64) -> Self {
        self.current_page = page.max(1);
        self.selected_ids.clear();
        self
    }

    /// Sort by `field` and jump back to the first page. Selecting the
    /// current sort column flips its direction; selecting a new column
    /// starts ascending.
    pub fn with_sort(mut self, field: SortField) -> Self {
        if self.sort_field == field {
            self.sort_direction = self.sort_direction.flipped();
        } else {
            self.sort_field = field;
            self.sort_direction = SortDirection::Asc;
        }
        self.current_page = 1;
        self
    }

    /// Tick `id` if it is not selected, untick it if it is.
    pub fn toggle_select(mut self, id: TransactionId) -> Self {
        if !self.selected_ids.remove(&id) {
            self.selected_ids.insert(id);
        }
        self
    }

    /// Tick every visible row, or untick everything when the selection
    /// already covers exactly the visible rows.
    pub fn toggle_select_all_visible(mut self, visible_ids: &[TransactionId]) -> Self {
        let visible: HashSet<TransactionId> = visible_ids.iter().copied().collect();

        if self.selected_ids == visible {
            self.selected_ids.clear();
        } else {
            self.selected_ids = visible;
        }
        self
    }
}

/// The rows to render for the current page, plus pagination metadata.
#[derive(Debug, PartialEq)]
pub struct TableView {
    /// The transactions on the current page, in display order.
    pub rows: Vec<Transaction>,
    /// The number of pages the filtered rows span. Zero when nothing
    /// survived filtering; the paginator is hidden for 0 or 1 pages.
    pub total_pages: u64,
}

/// Filter, sort, and paginate `transactions` according to `state`.
///
/// The stages run in a fixed order: search filter, type filter, recurring
/// filter, stable sort, page slice. A transaction appears in the result iff
/// it satisfies every active filter. Ties under the sort key keep the order
/// they had after filtering, which itself keeps the input order.
pub fn compute_view(transactions: &[Transaction], state: &ViewState) -> TableView {
    let mut rows: Vec<&Transaction> = transactions.iter().collect();

    if !state.search_term.is_empty() {
        let needle = state.search_term.to_lowercase();
        rows.retain(|transaction| {
            transaction
                .description
                .as_deref()
                .is_some_and(|description| description.to_lowercase().contains(&needle))
        });
    }

    if let Some(kind) = state.type_filter {
        rows.retain(|transaction| transaction.kind == kind);
    }

    if let Some(filter) = state.recurring_filter {
        rows.retain(|transaction| match filter {
            RecurringFilter::Recurring => transaction.recurrence.is_some(),
            RecurringFilter::NonRecurring => transaction.recurrence.is_none(),
        });
    }

    // Vec::sort_by is stable, and reversing an Ordering keeps Equal equal,
    // so descending sorts preserve tie order too.
    rows.sort_by(|a, b| {
        let ordering = match state.sort_field {
            SortField::Date => a.date.cmp(&b.date),
            SortField::Amount => a.amount.partial_cmp(&b.amount).unwrap_or(Ordering::Equal),
            SortField::Category => compare_categories(&a.category, &b.category),
        };

        match state.sort_direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });

    let total_pages = (rows.len() as u64).div_ceil(PAGE_SIZE as u64);
    let offset = (state.current_page.saturating_sub(1) as usize).saturating_mul(PAGE_SIZE);
    let rows = rows
        .into_iter()
        .skip(offset)
        .take(PAGE_SIZE)
        .cloned()
        .collect();

    TableView { rows, total_pages }
}

/// Case-insensitive comparison for category keys.
fn compare_categories(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// What a bulk delete request ended up doing.
#[derive(Debug, PartialEq, Eq)]
pub enum BulkDeleteOutcome {
    /// The caller's confirmation came back negative; nothing was touched.
    Cancelled,
    /// The delete collaborator removed this many rows.
    Deleted(usize),
}

/// Run the bulk-delete contract over the current selection.
///
/// `confirm` is asked once with the selection size before anything happens.
/// On a yes, `delete` receives the full selection; when it reports success
/// the selection is cleared. A `delete` failure is returned unmodified and
/// the selection is left in place, so the user can retry.
///
/// # Errors
/// Returns [Error::EmptySelection] when nothing is selected, or whatever
/// `delete` returned.
pub fn bulk_delete<C, D>(
    state: &mut ViewState,
    confirm: C,
    delete: D,
) -> Result<BulkDeleteOutcome, Error>
where
    C: FnOnce(usize) -> bool,
    D: FnOnce(&HashSet<TransactionId>) -> Result<usize, Error>,
{
    if state.selected_ids.is_empty() {
        return Err(Error::EmptySelection);
    }

    if !confirm(state.selected_ids.len()) {
        return Ok(BulkDeleteOutcome::Cancelled);
    }

    let deleted = delete(&state.selected_ids)?;
    state.selected_ids.clear();

    Ok(BulkDeleteOutcome::Deleted(deleted))
}
