//! The smart budget page: a form that asks the external recommendation
//! service for a suggested monthly budget split.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    account::{Account, AccountId, get_all_accounts},
    endpoints,
    html::{
        FORM_LABEL_STYLE, FORM_SELECT_STYLE, FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE, base,
        dollar_input_styles, format_currency,
    },
    navigation::NavBar,
    shared_templates::render,
    smart_budget::client::{BudgetRecommendation, RecommendationClient},
};

/// The state needed for the smart budget page.
#[derive(Debug, Clone)]
pub struct SmartBudgetState {
    /// The database connection for listing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The client for the external recommendation service.
    pub recommendation_client: RecommendationClient,
}

impl FromRef<AppState> for SmartBudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            recommendation_client: state.recommendation_client.clone(),
        }
    }
}

/// Render the smart budget form.
pub async fn get_smart_budget_page(
    State(state): State<SmartBudgetState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let accounts = get_all_accounts(&connection)
        .inspect_err(|error| tracing::error!("could not get accounts: {error}"))?;

    Ok(smart_budget_view(&accounts).into_response())
}

/// The form data for requesting a recommendation.
#[derive(Debug, Deserialize)]
pub struct RecommendationForm {
    /// The account whose spending history the service should look at.
    pub account_id: AccountId,
    /// The total monthly budget to split, as typed by the user.
    pub total_budget: String,
}

/// Ask the external service for a recommendation and render the result.
///
/// The budget amount is validated here, before any network call; service
/// failures arrive as a single user-visible error alert.
pub async fn recommend_budget_endpoint(
    State(state): State<SmartBudgetState>,
    Form(form): Form<RecommendationForm>,
) -> Response {
    let total_budget = match form.total_budget.trim().parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount > 0.0 => amount,
        _ => {
            return Error::InvalidBudgetAmount(format!(
                "\"{}\" is not a valid budget amount",
                form.total_budget.trim()
            ))
            .into_alert_response();
        }
    };

    match state
        .recommendation_client
        .recommend(form.account_id, total_budget)
        .await
    {
        Ok(recommendation) => render(StatusCode::OK, recommendation_view(&recommendation)),
        Err(error) => error.into_alert_response(),
    }
}

fn smart_budget_view(accounts: &[Account]) -> Markup {
    let nav_bar = NavBar::new(endpoints::SMART_BUDGET_VIEW).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="w-full max-w-md space-y-4"
            {
                h1 class="text-xl font-bold" { "Smart Budget Recommendation" }

                p class="text-sm text-gray-600 dark:text-gray-400"
                {
                    "Get personalized budget suggestions based on your spending patterns."
                }

                form
                    hx-post=(endpoints::RECOMMEND_BUDGET)
                    hx-target="#recommendation-result"
                    hx-target-error="#alert-container"
                    class="space-y-4"
                {
                    div
                    {
                        label for="account_id" class=(FORM_LABEL_STYLE) { "Account" }

                        select
                            name="account_id"
                            id="account_id"
                            class=(FORM_SELECT_STYLE)
                        {
                            @for account in accounts {
                                option value=(account.id) selected[account.is_default]
                                {
                                    (account.name)
                                }
                            }
                        }
                    }

                    div
                    {
                        label for="total_budget" class=(FORM_LABEL_STYLE)
                        {
                            "Total monthly budget"
                        }

                        div class="input-wrapper"
                        {
                            input
                                type="number"
                                name="total_budget"
                                id="total_budget"
                                step="0.01"
                                min="0.01"
                                placeholder="Enter total monthly budget"
                                required
                                class=(FORM_TEXT_INPUT_STYLE);
                        }
                    }

                    button
                        type="submit"
                        class="px-4 py-2 bg-blue-500 hover:bg-blue-600 text-white rounded"
                    {
                        "Generate Recommendation"
                    }
                }

                div id="recommendation-result" {}
            }
        }
    );

    base("Smart Budget", &[dollar_input_styles()], &content)
}

fn recommendation_view(recommendation: &BudgetRecommendation) -> Markup {
    html!(
        section class="space-y-3"
        {
            h2 class="text-lg font-semibold"
            {
                "Recommended Monthly Limit: "
                span class="text-blue-600 dark:text-blue-400"
                {
                    (format_currency(recommendation.monthly_limit))
                }
            }

            ul class="space-y-2"
            {
                @for suggestion in &recommendation.suggested_categories {
                    li
                        class="flex justify-between bg-gray-50 dark:bg-gray-800 p-3 rounded
                            border border-gray-200 dark:border-gray-700"
                    {
                        span class="font-medium capitalize" { (suggestion.category) }

                        span class="text-gray-600 dark:text-gray-400"
                        {
                            (format_currency(suggestion.limit))
                            " (" (format!("{:.0}%", suggestion.percent)) ")"
                        }
                    }
                }
            }
        }
    )
}
