//! Defines the route handler for the account page: the period chart and the
//! transaction table.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
// Must use axum_extra's Query since it parses an empty string (e.g. the
// "All Types" select option) as None instead of failing like axum::Query.
use axum_extra::extract::Query;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    account::{
        Account, AccountId,
        aggregation::{DateRangeBucket, PeriodSummary, aggregate},
        chart::{AccountChart, chart_container, chart_script},
        core::get_account,
    },
    endpoints::{self, format_endpoint},
    html::{HeadElement, PAGE_CONTAINER_STYLE, base, format_currency},
    navigation::NavBar,
    timezone::current_local_datetime,
    transaction::{
        core::get_transactions_for_account,
        table::{
            RecurringFilter, SortDirection, SortField, TableView, ViewState, compute_view,
        },
        view::transaction_table,
    },
};

/// URL encoding helper for the account page query params.
///
/// This is the serialized form of a [ViewState] plus the chart bucket; links
/// on the page are built by applying a state transition and re-encoding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountPageQuery {
    /// The search term for the description filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    /// The income/expense filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<crate::transaction::TransactionKind>,
    /// The recurring filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurring: Option<RecurringFilter>,
    /// The sort column.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortField>,
    /// The sort direction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<SortDirection>,
    /// The 1-based page number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    /// The chart date-range bucket.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<DateRangeBucket>,
}

impl AccountPageQuery {
    /// Build the view state these query params describe. Missing params get
    /// the documented defaults (date descending, no filters, page 1).
    pub(crate) fn view_state(&self) -> ViewState {
        let mut state = ViewState::default()
            .with_search(self.q.as_deref().unwrap_or(""))
            .with_type_filter(self.kind)
            .with_recurring_filter(self.recurring);

        if let Some(sort) = self.sort {
            state.sort_field = sort;
        }
        if let Some(dir) = self.dir {
            state.sort_direction = dir;
        }
        // Applied after the filters, whose transitions reset to page one.
        if let Some(page) = self.page {
            state.current_page = page.max(1);
        }

        state
    }

    fn from_state(state: &ViewState, range: Option<DateRangeBucket>) -> Self {
        Self {
            q: (!state.search_term.is_empty()).then(|| state.search_term.clone()),
            kind: state.type_filter,
            recurring: state.recurring_filter,
            sort: Some(state.sort_field),
            dir: Some(state.sort_direction),
            page: (state.current_page > 1).then_some(state.current_page),
            range,
        }
    }

    /// The bucket for the chart, defaulting to the last month.
    pub(crate) fn bucket(&self) -> DateRangeBucket {
        self.range.unwrap_or_default()
    }

    /// The query for jumping to `page` of the same view.
    pub(crate) fn for_page(&self, page: u64) -> Self {
        Self::from_state(&self.view_state().with_page(page), self.range)
    }

    /// The query a sort-header link for `field` should point at.
    pub(crate) fn for_sort(&self, state: &ViewState, field: SortField) -> Self {
        Self::from_state(&state.clone().with_sort(field), self.range)
    }

    /// The query for the same table view with a different chart bucket.
    pub(crate) fn for_range(&self, bucket: DateRangeBucket) -> Self {
        let mut query = self.clone();
        query.range = Some(bucket);
        query
    }

    /// The query with all filters dropped.
    pub(crate) fn without_filters(&self) -> Self {
        Self::from_state(&self.view_state().with_cleared_filters(), self.range)
    }

    /// The bucket as it appears in the URL, when one is set.
    pub(crate) fn range_query_value(&self) -> Option<&'static str> {
        self.range.map(DateRangeBucket::as_query_value)
    }

    pub(crate) fn to_query_string(&self) -> String {
        serde_urlencoded::to_string(self)
            .inspect_err(|error| {
                tracing::error!("Could not encode account page query: {error}");
            })
            .unwrap_or_default()
    }
}

/// The state needed for the account page.
#[derive(Debug, Clone)]
pub struct AccountPageState {
    /// The database connection for reading accounts and transactions.
    db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    local_timezone: String,
}

impl FromRef<AppState> for AccountPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Render an account's chart and transaction table.
pub async fn get_account_page(
    State(state): State<AccountPageState>,
    Path(account_id): Path<AccountId>,
    Query(query): Query<AccountPageQuery>,
) -> Result<Response, Error> {
    let now = current_local_datetime(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let account = get_account(account_id, &connection)?;
    let transactions = get_transactions_for_account(account_id, &connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;

    let view_state = query.view_state();
    let table_view = compute_view(&transactions, &view_state);
    let summary = aggregate(&transactions, query.bucket(), now);

    Ok(account_view(&account, &summary, &table_view, &view_state, &query).into_response())
}

fn account_view(
    account: &Account,
    summary: &PeriodSummary,
    table_view: &TableView,
    view_state: &ViewState,
    query: &AccountPageQuery,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();
    let chart = AccountChart::new(summary);

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    div
                    {
                        h1 class="text-xl font-bold" { (account.name) }
                        p class="text-sm text-gray-600 dark:text-gray-400"
                        {
                            (account.kind.label())
                        }
                    }

                    p class="text-2xl font-bold" { (format_currency(account.balance)) }
                }

                section class="rounded bg-gray-50 dark:bg-gray-800 p-4 space-y-4"
                {
                    header class="flex justify-between flex-wrap items-center"
                    {
                        h2 class="text-lg font-semibold" { "Transaction Overview" }

                        (range_selector(account.id, query))
                    }

                    (totals_row(summary))

                    (chart_container(&chart))
                }

                (transaction_table(table_view, view_state, query, account.id))
            }
        }
    );

    let scripts = [
        HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
        chart_script(&chart),
    ];

    base(&account.name, &scripts, &content)
}

fn range_selector(account_id: AccountId, query: &AccountPageQuery) -> Markup {
    let account_url = format_endpoint(endpoints::ACCOUNT_VIEW, account_id);
    let current = query.bucket();

    html!(
        nav class="flex gap-2 text-sm" aria-label="Chart date range"
        {
            @for bucket in DateRangeBucket::all_buckets() {
                @if bucket == current {
                    span class="px-2 py-1 rounded bg-blue-600 text-white" { (bucket.label()) }
                } @else {
                    a
                        href=(format!("{account_url}?{}", query.for_range(bucket).to_query_string()))
                        class="px-2 py-1 rounded hover:bg-blue-100 dark:hover:bg-gray-700"
                    {
                        (bucket.label())
                    }
                }
            }
        }
    )
}

fn totals_row(summary: &PeriodSummary) -> Markup {
    let net = summary.totals.net();
    let net_class = if net >= 0.0 {
        "text-lg font-bold text-green-700 dark:text-green-300"
    } else {
        "text-lg font-bold text-red-700 dark:text-red-300"
    };

    html!(
        div class="flex justify-around text-sm"
        {
            div class="text-center"
            {
                p class="text-gray-600 dark:text-gray-400" { "Total Income" }
                p class="text-lg font-bold text-green-700 dark:text-green-300"
                {
                    (format_currency(summary.totals.income))
                }
            }

            div class="text-center"
            {
                p class="text-gray-600 dark:text-gray-400" { "Total Expenses" }
                p class="text-lg font-bold text-red-700 dark:text-red-300"
                {
                    (format_currency(summary.totals.expense))
                }
            }

            div class="text-center"
            {
                p class="text-gray-600 dark:text-gray-400" { "Net" }
                p class=(net_class) { (format_currency(net)) }
            }
        }
    )
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        body::Body,
        extract::{Path, State},
        http::{Response, StatusCode},
    };
    use axum_extra::extract::Query;
    use rusqlite::Connection;
    use scraper::{Html, Selector};
    use time::macros::datetime;

    use crate::{
        Error,
        account::{AccountKind, create_account},
        db::initialize,
        transaction::{Transaction, TransactionKind, create_transaction},
    };

    use super::{AccountPageQuery, AccountPageState, get_account_page};

    fn get_test_state() -> AccountPageState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        create_account("Everyday", AccountKind::Current, 150.0, &conn).unwrap();

        for i in 1..=25 {
            create_transaction(
                Transaction::build(
                    i as f64,
                    datetime!(2024-03-01 09:00) + time::Duration::days(i),
                    "groceries",
                    TransactionKind::Expense,
                )
                .description(&format!("purchase #{i}")),
                1,
                &conn,
            )
            .unwrap();
        }

        AccountPageState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    async fn parse_html(response: Response<Body>) -> Html {
        let body = response.into_body();
        let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        let text = String::from_utf8_lossy(&body).to_string();

        Html::parse_document(&text)
    }

    #[track_caller]
    fn count_rows(html: &Html) -> usize {
        let selector = Selector::parse("input[name='ids']").unwrap();
        html.select(&selector).count()
    }

    #[tokio::test]
    async fn account_page_shows_chart_and_first_table_page() {
        let state = get_test_state();

        let response = get_account_page(
            State(state),
            Path(1),
            Query(AccountPageQuery::default()),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html(response).await;

        let chart_selector = Selector::parse("#account-period-chart").unwrap();
        assert!(html.select(&chart_selector).next().is_some());

        assert_eq!(count_rows(&html), 10);
    }

    #[tokio::test]
    async fn third_page_has_the_remaining_rows() {
        let state = get_test_state();

        let query = AccountPageQuery {
            page: Some(3),
            ..Default::default()
        };
        let response = get_account_page(State(state), Path(1), Query(query))
            .await
            .unwrap();

        let html = parse_html(response).await;
        assert_eq!(count_rows(&html), 5);
    }

    #[tokio::test]
    async fn search_filter_narrows_the_table() {
        let state = get_test_state();

        let query = AccountPageQuery {
            q: Some("purchase #7".to_owned()),
            ..Default::default()
        };
        let response = get_account_page(State(state), Path(1), Query(query))
            .await
            .unwrap();

        let html = parse_html(response).await;
        assert_eq!(count_rows(&html), 1);
    }

    #[tokio::test]
    async fn unknown_account_is_not_found() {
        let state = get_test_state();

        let result = get_account_page(
            State(state),
            Path(42),
            Query(AccountPageQuery::default()),
        )
        .await;

        assert_eq!(result.unwrap_err(), Error::NotFound);
    }

    #[test]
    fn query_round_trips_through_view_state() {
        let query = AccountPageQuery {
            q: Some("rent".to_owned()),
            kind: Some(TransactionKind::Expense),
            page: Some(3),
            ..Default::default()
        };

        let state = query.view_state();

        assert_eq!(state.search_term, "rent");
        assert_eq!(state.type_filter, Some(TransactionKind::Expense));
        assert_eq!(state.current_page, 3);

        let encoded = query.for_page(2).to_query_string();
        assert!(encoded.contains("q=rent"));
        assert!(encoded.contains("page=2"));
    }
}
