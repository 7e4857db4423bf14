//! Defines the endpoint for creating or updating an account's monthly budget.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::Response,
};
use axum_extra::extract::Form;
use maud::html;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    account::{AccountId, get_account},
    alert::AlertTemplate,
    budget::{
        core::{current_month_expenses, upsert_budget},
        progress::budget_progress,
    },
    shared_templates::render,
    timezone::current_local_datetime,
    transaction::core::get_transactions_for_account,
};

/// The state needed to update a budget.
#[derive(Debug, Clone)]
pub struct UpdateBudgetState {
    /// The database connection for managing budgets.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for UpdateBudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The form data for updating a budget.
///
/// The amount arrives as text so that a non-numeric submission becomes a
/// validation message rather than a bare 422 from the form extractor.
#[derive(Debug, Deserialize)]
pub struct UpdateBudgetForm {
    /// The account the budget belongs to.
    pub account_id: AccountId,
    /// The new budget amount, as typed by the user.
    pub amount: String,
}

/// A route handler for setting the monthly budget of an account.
///
/// Invalid amounts (non-numeric, zero, negative) are rejected here, before
/// anything touches the database, and surfaced as an error alert. On success
/// the budget widget is re-rendered with a success alert swapped out of band.
pub async fn update_budget_endpoint(
    State(state): State<UpdateBudgetState>,
    Form(form): Form<UpdateBudgetForm>,
) -> Response {
    let amount = match form.amount.trim().parse::<f64>() {
        Ok(amount) => amount,
        Err(_) => {
            return Error::InvalidBudgetAmount(format!(
                "\"{}\" is not a number",
                form.amount.trim()
            ))
            .into_alert_response();
        }
    };

    match update_budget_and_render(&state, form.account_id, amount).await {
        Ok(response) => response,
        Err(error) => error.into_alert_response(),
    }
}

async fn update_budget_and_render(
    state: &UpdateBudgetState,
    account_id: AccountId,
    amount: f64,
) -> Result<Response, Error> {
    let today = current_local_datetime(&state.local_timezone)?.date();

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let budget = upsert_budget(account_id, amount, &connection)?;
    tracing::info!("budget for account {account_id} set to {}", budget.amount);

    let account = get_account(account_id, &connection)?;
    let transactions = get_transactions_for_account(account_id, &connection)?;
    let current_expenses = current_month_expenses(&transactions, today);

    let markup = html!(
        (AlertTemplate::success("Budget updated", "").into_html())
        (budget_progress(&account, Some(&budget), current_expenses))
    );

    Ok(render(StatusCode::OK, markup))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode};
    use axum_extra::extract::Form;
    use rusqlite::Connection;

    use crate::{
        account::{AccountKind, create_account},
        budget::core::get_budget,
        db::initialize,
    };

    use super::{UpdateBudgetForm, UpdateBudgetState, update_budget_endpoint};

    fn get_test_state() -> UpdateBudgetState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        create_account("Everyday", AccountKind::Current, 100.0, &conn).unwrap();

        UpdateBudgetState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    async fn body_text(response: axum::response::Response) -> String {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8_lossy(&body).to_string()
    }

    #[tokio::test]
    async fn valid_amount_is_stored_and_rerenders_the_widget() {
        let state = get_test_state();

        let form = UpdateBudgetForm {
            account_id: 1,
            amount: "500".to_owned(),
        };
        let response = update_budget_endpoint(State(state.clone()), Form(form)).await;

        assert_eq!(response.status(), StatusCode::OK);

        let body = body_text(response).await;
        assert!(body.contains("Budget updated"));
        assert!(body.contains("$500.00"));

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_budget(1, &connection).unwrap().unwrap().amount, 500.0);
    }

    #[tokio::test]
    async fn non_numeric_amount_is_rejected_before_any_database_write() {
        let state = get_test_state();

        let form = UpdateBudgetForm {
            account_id: 1,
            amount: "lots".to_owned(),
        };
        let response = update_budget_endpoint(State(state.clone()), Form(form)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_budget(1, &connection).unwrap(), None);
    }

    #[tokio::test]
    async fn non_positive_amount_is_rejected() {
        let state = get_test_state();

        let form = UpdateBudgetForm {
            account_id: 1,
            amount: "-10".to_owned(),
        };
        let response = update_budget_endpoint(State(state.clone()), Form(form)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_budget(1, &connection).unwrap(), None);
    }
}
