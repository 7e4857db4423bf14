//! Dashboard HTTP handler and view rendering.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::{Account, get_all_accounts},
    budget::{
        core::{Budget, current_month_expenses, get_budget},
        progress::budget_progress,
    },
    dashboard::cards::account_cards_view,
    endpoints,
    html::{PAGE_CONTAINER_STYLE, base, dollar_input_styles},
    navigation::NavBar,
    timezone::current_local_datetime,
    transaction::core::get_transactions_for_account,
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading accounts, budgets, and transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Holds all the data needed to render the dashboard.
struct DashboardData {
    accounts: Vec<Account>,
    default_account: Account,
    budget: Option<Budget>,
    current_expenses: f64,
}

/// Display a page with the user's accounts and the default account's budget.
pub async fn get_dashboard_page(State(state): State<DashboardState>) -> Result<Response, Error> {
    let today = current_local_datetime(&state.local_timezone)?.date();

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW);

    let accounts = get_all_accounts(&connection)
        .inspect_err(|error| tracing::error!("could not get accounts: {error}"))?;

    let Some(default_account) = accounts.iter().find(|account| account.is_default).cloned()
    else {
        return Ok(dashboard_no_data_view(nav_bar).into_response());
    };

    let budget = get_budget(default_account.id, &connection)
        .inspect_err(|error| tracing::error!("could not get budget: {error}"))?;

    let transactions = get_transactions_for_account(default_account.id, &connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;
    let current_expenses = current_month_expenses(&transactions, today);

    let data = DashboardData {
        accounts,
        default_account,
        budget,
        current_expenses,
    };

    Ok(dashboard_view(nav_bar, &data).into_response())
}

/// Renders the dashboard page when no accounts exist yet.
fn dashboard_no_data_view(nav_bar: NavBar) -> Markup {
    let nav_bar = nav_bar.into_html();

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold"
            {
                "Nothing here yet..."
            }

            p
            {
                "Account cards and your budget will show up here once the
                database has some accounts in it."
            }
        }
    );

    base("Dashboard", &[], &content)
}

/// Renders the main dashboard page: the budget progress widget for the
/// default account followed by the account card grid.
fn dashboard_view(nav_bar: NavBar, data: &DashboardData) -> Markup {
    let nav_bar = nav_bar.into_html();

    let content = html!(
        (nav_bar)

        main
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            (budget_progress(
                &data.default_account,
                data.budget.as_ref(),
                data.current_expenses,
            ))

            (account_cards_view(&data.accounts))
        }
    );

    base("Dashboard", &[dollar_input_styles()], &content)
}
