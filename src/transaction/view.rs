//! HTML rendering for the transaction table.

use maud::{Markup, PreEscaped, html};
use time::PrimitiveDateTime;
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    account::{AccountId, AccountPageQuery, aggregation::month_abbrev},
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, CATEGORY_BADGE_STYLE, FORM_SELECT_STYLE,
        FORM_TEXT_INPUT_STYLE, LINK_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        format_currency,
    },
    pagination::{MAX_PAGE_INDICATORS, PaginationIndicator, create_pagination_indicators},
    transaction::{
        core::{Transaction, TransactionKind},
        table::{RecurringFilter, SortDirection, SortField, TableView, ViewState},
    },
};

/// The max number of graphemes to display in the transaction table rows before
/// truncating and displaying ellipses.
const MAX_DESCRIPTION_GRAPHEMES: usize = 32;

/// Background colours for the category badges. Unknown categories get grey.
fn category_color(category: &str) -> &'static str {
    match category {
        "housing" => "#ef4444",
        "transportation" => "#f97316",
        "groceries" => "#84cc16",
        "utilities" => "#06b6d4",
        "entertainment" => "#8b5cf6",
        "food" => "#f43f5e",
        "shopping" => "#ec4899",
        "healthcare" => "#14b8a6",
        "education" => "#6366f1",
        "travel" => "#0ea5e9",
        "insurance" => "#64748b",
        "gifts" => "#d946ef",
        "personal" => "#f59e0b",
        "salary" => "#22c55e",
        "freelance" => "#10b981",
        "investments" => "#a855f7",
        "rental" => "#3b82f6",
        _ => "#9ca3af",
    }
}

fn format_date_label(date: PrimitiveDateTime) -> String {
    format!(
        "{} {} {}",
        date.day(),
        month_abbrev(date.month()),
        date.year()
    )
}

fn truncate_description(description: &str) -> String {
    let graphemes: Vec<&str> = description.graphemes(true).collect();

    if graphemes.len() <= MAX_DESCRIPTION_GRAPHEMES {
        description.to_owned()
    } else {
        let mut truncated: String = graphemes[..MAX_DESCRIPTION_GRAPHEMES].concat();
        truncated.push('…');
        truncated
    }
}

/// Renders the filter bar, table, bulk-delete controls, and paginator for an
/// account's transactions.
pub(crate) fn transaction_table(
    view: &TableView,
    state: &ViewState,
    query: &AccountPageQuery,
    account_id: AccountId,
) -> Markup {
    let account_url = format_endpoint(endpoints::ACCOUNT_VIEW, account_id);
    let has_filters = !state.search_term.is_empty()
        || state.type_filter.is_some()
        || state.recurring_filter.is_some();
    let redirect_url = format!("{account_url}?{}", query.to_query_string());
    let visible_ids: Vec<_> = view.rows.iter().map(|transaction| transaction.id).collect();
    // The header checkbox reads as ticked exactly when toggling select-all
    // would clear the selection.
    let all_selected = !visible_ids.is_empty()
        && state
            .clone()
            .toggle_select_all_visible(&visible_ids)
            .selected_ids
            .is_empty();

    html!(
        section id="transaction-table" class="w-full space-y-4"
        {
            (filter_bar(state, query, &account_url, has_filters))

            form
                hx-post=(endpoints::DELETE_TRANSACTIONS)
                hx-confirm="Delete the selected transactions?"
                hx-target-error="#alert-container"
            {
                input type="hidden" name="account_id" value=(account_id);
                input type="hidden" name="redirect_url" value=(redirect_url);

                div class="flex justify-end mb-2"
                {
                    button type="submit" class=(BUTTON_DELETE_STYLE)
                    {
                        "Delete Selected"
                    }
                }

                div class="relative overflow-x-auto rounded"
                {
                    table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class="px-4 py-3 w-[50px]"
                                {
                                    input
                                        type="checkbox"
                                        aria-label="Select all visible transactions"
                                        checked[all_selected]
                                        onclick="document.querySelectorAll('input[name=ids]').forEach(box => box.checked = this.checked)";
                                }
                                th scope="col" class="px-6 py-3"
                                {
                                    (sort_header("Date", SortField::Date, state, query, &account_url))
                                }
                                th scope="col" class="px-6 py-3" { "Description" }
                                th scope="col" class="px-6 py-3"
                                {
                                    (sort_header("Category", SortField::Category, state, query, &account_url))
                                }
                                th scope="col" class="px-6 py-3 text-right"
                                {
                                    (sort_header("Amount", SortField::Amount, state, query, &account_url))
                                }
                                th scope="col" class="px-6 py-3" { "Recurring" }
                            }
                        }

                        tbody
                        {
                            @if view.rows.is_empty() {
                                tr class=(TABLE_ROW_STYLE)
                                {
                                    td colspan="6" class="px-6 py-8 text-center"
                                    {
                                        "No transactions found"
                                    }
                                }
                            } @else {
                                @for transaction in &view.rows {
                                    (table_row(transaction, state))
                                }
                            }
                        }
                    }
                }
            }

            @if view.total_pages > 1 {
                (paginator(state.current_page, view.total_pages, query, &account_url))
            }
        }
    )
}

fn filter_bar(
    state: &ViewState,
    query: &AccountPageQuery,
    account_url: &str,
    has_filters: bool,
) -> Markup {
    html!(
        form method="get" action=(account_url) class="flex flex-col sm:flex-row gap-2"
        {
            @if let Some(range) = query.range_query_value() {
                input type="hidden" name="range" value=(range);
            }

            // Changing a filter keeps the sort but resets to page one.
            input type="hidden" name="sort" value=(state.sort_field.as_query_value());
            input type="hidden" name="dir" value=(state.sort_direction.as_query_value());

            input
                type="search"
                name="q"
                value=(state.search_term)
                placeholder="Search transactions..."
                class=(FORM_TEXT_INPUT_STYLE);

            select name="kind" class=(FORM_SELECT_STYLE)
            {
                option value="" selected[state.type_filter.is_none()] { "All Types" }
                option
                    value=(TransactionKind::Income.as_str())
                    selected[state.type_filter == Some(TransactionKind::Income)]
                {
                    "Income"
                }
                option
                    value=(TransactionKind::Expense.as_str())
                    selected[state.type_filter == Some(TransactionKind::Expense)]
                {
                    "Expense"
                }
            }

            select name="recurring" class=(FORM_SELECT_STYLE)
            {
                option value="" selected[state.recurring_filter.is_none()] { "All Transactions" }
                option
                    value="recurring"
                    selected[state.recurring_filter == Some(RecurringFilter::Recurring)]
                {
                    "Recurring Only"
                }
                option
                    value="non-recurring"
                    selected[state.recurring_filter == Some(RecurringFilter::NonRecurring)]
                {
                    "Non-recurring Only"
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Apply" }

            @if has_filters {
                a
                    href=(format!("{account_url}?{}", query.without_filters().to_query_string()))
                    class=(LINK_STYLE)
                    title="Clear filters"
                {
                    "Clear"
                }
            }
        }
    )
}

fn sort_header(
    label: &str,
    field: SortField,
    state: &ViewState,
    query: &AccountPageQuery,
    account_url: &str,
) -> Markup {
    let href = format!(
        "{account_url}?{}",
        query.for_sort(state, field).to_query_string()
    );
    let indicator = if state.sort_field == field {
        match state.sort_direction {
            SortDirection::Asc => Some(PreEscaped("&#9650;")),
            SortDirection::Desc => Some(PreEscaped("&#9660;")),
        }
    } else {
        None
    };

    html!(
        a href=(href) class="inline-flex items-center gap-1 hover:underline"
        {
            (label)

            @if let Some(indicator) = indicator {
                span aria-hidden="true" { (indicator) }
            }
        }
    )
}

fn table_row(transaction: &Transaction, state: &ViewState) -> Markup {
    let amount_text = match transaction.kind {
        TransactionKind::Expense => format!("-{}", format_currency(transaction.amount)),
        TransactionKind::Income => format!("+{}", format_currency(transaction.amount)),
    };
    let amount_class = match transaction.kind {
        TransactionKind::Expense => "px-6 py-4 text-right font-medium text-red-700 dark:text-red-300",
        TransactionKind::Income => "px-6 py-4 text-right font-medium text-green-700 dark:text-green-300",
    };

    html!(
        tr class=(TABLE_ROW_STYLE)
        {
            td class="px-4 py-4"
            {
                input
                    type="checkbox"
                    name="ids"
                    value=(transaction.id)
                    checked[state.selected_ids.contains(&transaction.id)];
            }

            td class=(TABLE_CELL_STYLE) { (format_date_label(transaction.date)) }

            td class=(TABLE_CELL_STYLE)
            {
                @if let Some(description) = &transaction.description {
                    span title=(description) { (truncate_description(description)) }
                }
            }

            td class=(TABLE_CELL_STYLE)
            {
                span
                    class=(CATEGORY_BADGE_STYLE)
                    style=(format!("background: {}", category_color(&transaction.category)))
                {
                    (transaction.category)
                }
            }

            td class=(amount_class) { (amount_text) }

            td class=(TABLE_CELL_STYLE)
            {
                @if let Some(recurrence) = &transaction.recurrence {
                    span
                        class="inline-flex items-center px-2.5 py-0.5 text-xs font-semibold
                            text-purple-800 bg-purple-100 rounded-full
                            dark:bg-purple-900 dark:text-purple-300"
                        title=(format!("Next date: {}", format_date_label(recurrence.next_date)))
                    {
                        (recurrence.interval.label())
                    }
                } @else {
                    span
                        class="inline-flex items-center px-2.5 py-0.5 text-xs font-semibold
                            text-gray-800 bg-gray-100 rounded-full
                            dark:bg-gray-700 dark:text-gray-300"
                    {
                        "One-time"
                    }
                }
            }
        }
    )
}

fn paginator(
    curr_page: u64,
    page_count: u64,
    query: &AccountPageQuery,
    account_url: &str,
) -> Markup {
    let indicators = create_pagination_indicators(curr_page, page_count, MAX_PAGE_INDICATORS);
    let page_url =
        |page: u64| format!("{account_url}?{}", query.for_page(page).to_query_string());

    html!(
        nav class="flex items-center justify-center gap-2" aria-label="Table pages"
        {
            @for indicator in indicators {
                @match indicator {
                    PaginationIndicator::BackButton(page) => {
                        a href=(page_url(page)) class=(LINK_STYLE) { "Previous" }
                    }
                    PaginationIndicator::NextButton(page) => {
                        a href=(page_url(page)) class=(LINK_STYLE) { "Next" }
                    }
                    PaginationIndicator::CurrPage(page) => {
                        span class="px-2 font-bold" aria-current="page" { (page) }
                    }
                    PaginationIndicator::Page(page) => {
                        a href=(page_url(page)) class=(LINK_STYLE) { (page) }
                    }
                    PaginationIndicator::Ellipsis => {
                        span class="px-1 text-gray-500" { "…" }
                    }
                }
            }
        }
    )
}
