//! Defines the endpoint for making an account the default account.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::{AccountId, core::set_default_account},
    endpoints,
};

/// The state needed to change the default account.
#[derive(Debug, Clone)]
pub struct DefaultAccountState {
    /// The database connection for managing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DefaultAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that makes `account_id` the default account, then sends
/// the client back to the dashboard.
pub async fn set_default_account_endpoint(
    State(state): State<DefaultAccountState>,
    Path(account_id): Path<AccountId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = set_default_account(account_id, &connection) {
        tracing::error!("could not set default account {account_id}: {error}");
        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use axum_htmx::HX_REDIRECT;
    use rusqlite::Connection;

    use crate::{
        account::{AccountKind, create_account, get_account},
        db::initialize,
        endpoints,
    };

    use super::{DefaultAccountState, set_default_account_endpoint};

    fn get_test_state() -> DefaultAccountState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        create_account("Everyday", AccountKind::Current, 100.0, &conn).unwrap();
        create_account("Rainy Day", AccountKind::Savings, 2500.0, &conn).unwrap();

        DefaultAccountState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    #[tokio::test]
    async fn switches_default_and_redirects_to_dashboard() {
        let state = get_test_state();

        let response = set_default_account_endpoint(State(state.clone()), Path(2)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(HX_REDIRECT).unwrap(),
            endpoints::DASHBOARD_VIEW
        );

        let connection = state.db_connection.lock().unwrap();
        assert!(get_account(2, &connection).unwrap().is_default);
        assert!(!get_account(1, &connection).unwrap().is_default);
    }

    #[tokio::test]
    async fn missing_account_renders_an_error_alert() {
        let state = get_test_state();

        let response = set_default_account_endpoint(State(state), Path(42)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
