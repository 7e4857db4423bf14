//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/accounts/{account_id}', use [format_endpoint].

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The landing page showing account cards and the budget progress widget.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page for a single account: its chart and transaction table.
pub const ACCOUNT_VIEW: &str = "/accounts/{account_id}";
/// The page for requesting a smart budget recommendation.
pub const SMART_BUDGET_VIEW: &str = "/smart-budget";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for making an account the default account.
pub const SET_DEFAULT_ACCOUNT: &str = "/api/accounts/{account_id}/default";
/// The route for creating or updating the monthly budget of an account.
pub const UPDATE_BUDGET: &str = "/api/budget";
/// The route for deleting the selected transactions.
pub const DELETE_TRANSACTIONS: &str = "/api/transactions/delete";
/// The route for fetching a budget recommendation from the external service.
pub const RECOMMEND_BUDGET: &str = "/api/smart-budget";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/accounts/{account_id}', '{account_id}'
/// is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::DASHBOARD_VIEW);
        assert_endpoint_is_valid_uri(endpoints::ACCOUNT_VIEW);
        assert_endpoint_is_valid_uri(endpoints::SMART_BUDGET_VIEW);
        assert_endpoint_is_valid_uri(endpoints::INTERNAL_ERROR_VIEW);
        assert_endpoint_is_valid_uri(endpoints::STATIC);

        assert_endpoint_is_valid_uri(endpoints::SET_DEFAULT_ACCOUNT);
        assert_endpoint_is_valid_uri(endpoints::UPDATE_BUDGET);
        assert_endpoint_is_valid_uri(endpoints::DELETE_TRANSACTIONS);
        assert_endpoint_is_valid_uri(endpoints::RECOMMEND_BUDGET);
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint("/accounts/{account_id}", 1);

        assert_eq!(formatted_path, "/accounts/1");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint("/accounts/all", 1);

        assert_eq!(formatted_path, "/accounts/all");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn parameter_in_middle() {
        let formatted_path = format_endpoint("/api/accounts/{account_id}/default", 7);

        assert_eq!(formatted_path, "/api/accounts/7/default");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }
}
