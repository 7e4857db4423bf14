//! Defines the endpoint for deleting the selected transactions in bulk.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since it collects repeated `ids` fields into a
// Vec instead of failing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    account::AccountId,
    endpoints::{self, format_endpoint},
    transaction::{
        core::{TransactionId, delete_transactions},
        table::{ViewState, bulk_delete},
    },
};

/// The state needed to delete transactions.
#[derive(Debug, Clone)]
pub struct DeleteTransactionsState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for a bulk delete.
#[derive(Debug, Deserialize)]
pub struct DeleteTransactionsForm {
    /// The IDs of the transactions ticked in the table.
    #[serde(default)]
    pub ids: Vec<TransactionId>,
    /// The account whose page the delete was requested from.
    pub account_id: AccountId,
    /// Where to send the client afterwards, preserving its filters.
    #[serde(default)]
    pub redirect_url: Option<String>,
}

/// A route handler for deleting the selected transactions.
///
/// The yes/no confirmation happens on the client (`hx-confirm`); a request
/// reaching this handler is the affirmative answer. On success the client is
/// redirected back to the account page, which re-renders with an empty
/// selection.
pub async fn delete_transactions_endpoint(
    State(state): State<DeleteTransactionsState>,
    Form(form): Form<DeleteTransactionsForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let mut view_state = form
        .ids
        .iter()
        .fold(ViewState::default(), |state, id| state.toggle_select(*id));

    let outcome = bulk_delete(
        &mut view_state,
        |_| true,
        |selected| {
            let ids: Vec<TransactionId> = selected.iter().copied().collect();
            delete_transactions(&ids, &connection)
        },
    );

    match outcome {
        Ok(result) => {
            tracing::info!(
                "bulk delete for account {} finished: {result:?}",
                form.account_id
            );

            let redirect_url = form
                .redirect_url
                .unwrap_or_else(|| format_endpoint(endpoints::ACCOUNT_VIEW, form.account_id));

            (HxRedirect(redirect_url), StatusCode::SEE_OTHER).into_response()
        }
        Err(error) => {
            tracing::error!("could not delete transactions: {error}");
            error.into_alert_response()
        }
    }
}
