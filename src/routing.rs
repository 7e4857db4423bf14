//! Application router configuration.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    account::{get_account_page, set_default_account_endpoint},
    budget::update_budget_endpoint,
    dashboard::get_dashboard_page,
    endpoints,
    internal_server_error::get_internal_server_error_page,
    logging::logging_middleware,
    not_found::get_404_not_found,
    smart_budget::{get_smart_budget_page, recommend_budget_endpoint},
    transaction::delete_transactions_endpoint,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::ACCOUNT_VIEW, get(get_account_page))
        .route(endpoints::SMART_BUDGET_VIEW, get(get_smart_budget_page))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        )
        .route(
            endpoints::SET_DEFAULT_ACCOUNT,
            post(set_default_account_endpoint),
        )
        .route(endpoints::UPDATE_BUDGET, post(update_budget_endpoint))
        .route(
            endpoints::DELETE_TRANSACTIONS,
            post(delete_transactions_endpoint),
        )
        .route(endpoints::RECOMMEND_BUDGET, post(recommend_budget_endpoint))
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}
