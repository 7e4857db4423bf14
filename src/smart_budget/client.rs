//! HTTP client for the external budget recommendation service.
//!
//! The service is a black box that takes an account identifier and a total
//! budget and returns a suggested monthly limit with per-category splits.
//! Its response is treated as an untrusted payload: it is parsed into typed
//! structs and rejected when the numbers make no sense. Every failure class
//! collapses into one user-visible message; the underlying cause is logged
//! here, where it was observed.

use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

use crate::{Error, account::AccountId};

/// Client for the budget recommendation service.
#[derive(Debug, Clone)]
pub struct RecommendationClient {
    http_client: HttpClient,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct RecommendationRequest {
    account_id: AccountId,
    total_budget: f64,
}

/// A suggested budget split for one category.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CategorySuggestion {
    /// The category the suggestion applies to.
    pub category: String,
    /// The suggested monthly limit for the category.
    pub limit: f64,
    /// The category's share of the monthly limit, in percent.
    pub percent: f64,
}

/// The recommendation returned by the service.
///
/// Unknown extra fields are ignored; the fields below must be present and
/// pass [validate_recommendation] before the payload is accepted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetRecommendation {
    /// The suggested overall monthly limit.
    pub monthly_limit: f64,
    /// Per-category splits of the monthly limit.
    pub suggested_categories: Vec<CategorySuggestion>,
}

impl RecommendationClient {
    /// Create a client for the service at `base_url`,
    /// e.g. "http://127.0.0.1:8000".
    pub fn new(base_url: &str) -> Self {
        Self {
            http_client: HttpClient::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// Ask the service for a budget recommendation.
    ///
    /// # Errors
    /// Returns [Error::RecommendationFailed] with a user-facing message when
    /// the service is unreachable, answers with a non-success status, or
    /// returns a body that does not match the expected shape.
    pub async fn recommend(
        &self,
        account_id: AccountId,
        total_budget: f64,
    ) -> Result<BudgetRecommendation, Error> {
        let url = format!("{}/recommend", self.base_url);
        let request = RecommendationRequest {
            account_id,
            total_budget,
        };

        let response = self
            .http_client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|error| {
                tracing::error!("could not reach recommendation service at {url}: {error}");
                Error::RecommendationFailed(
                    "The recommendation service could not be reached. Try again later.".to_owned(),
                )
            })?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            tracing::error!("recommendation service returned {status}: {body}");
            return Err(Error::RecommendationFailed(
                "The recommendation service returned an error. Try again later.".to_owned(),
            ));
        }

        parse_recommendation(&body)
    }
}

/// Parse and validate a response body from the service.
///
/// # Errors
/// Returns [Error::RecommendationFailed] when the body is not JSON of the
/// expected shape or contains non-finite or negative numbers.
pub(crate) fn parse_recommendation(body: &str) -> Result<BudgetRecommendation, Error> {
    let recommendation: BudgetRecommendation = serde_json::from_str(body).map_err(|error| {
        tracing::error!("could not parse recommendation response: {error}; body: {body}");
        Error::RecommendationFailed(
            "The recommendation service returned an unexpected response.".to_owned(),
        )
    })?;

    if let Err(reason) = validate_recommendation(&recommendation) {
        tracing::error!("rejecting malformed recommendation: {reason}; body: {body}");
        return Err(Error::RecommendationFailed(
            "The recommendation service returned an unexpected response.".to_owned(),
        ));
    }

    Ok(recommendation)
}

fn validate_recommendation(recommendation: &BudgetRecommendation) -> Result<(), String> {
    if !recommendation.monthly_limit.is_finite() || recommendation.monthly_limit < 0.0 {
        return Err(format!(
            "monthly limit {} is not a usable amount",
            recommendation.monthly_limit
        ));
    }

    for suggestion in &recommendation.suggested_categories {
        if !suggestion.limit.is_finite() || suggestion.limit < 0.0 {
            return Err(format!(
                "limit {} for category \"{}\" is not a usable amount",
                suggestion.limit, suggestion.category
            ));
        }

        if !suggestion.percent.is_finite() || !(0.0..=100.0).contains(&suggestion.percent) {
            return Err(format!(
                "percent {} for category \"{}\" is out of range",
                suggestion.percent, suggestion.category
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::Error;

    use super::{BudgetRecommendation, CategorySuggestion, parse_recommendation};

    #[test]
    fn parses_a_well_formed_response() {
        let body = r#"{
            "monthlyLimit": 1200.0,
            "suggestedCategories": [
                {"category": "groceries", "limit": 400.0, "percent": 33.3},
                {"category": "entertainment", "limit": 200.0, "percent": 16.7}
            ]
        }"#;

        let recommendation = parse_recommendation(body).unwrap();

        assert_eq!(
            recommendation,
            BudgetRecommendation {
                monthly_limit: 1200.0,
                suggested_categories: vec![
                    CategorySuggestion {
                        category: "groceries".to_owned(),
                        limit: 400.0,
                        percent: 33.3,
                    },
                    CategorySuggestion {
                        category: "entertainment".to_owned(),
                        limit: 200.0,
                        percent: 16.7,
                    },
                ],
            }
        );
    }

    #[test]
    fn ignores_unknown_extra_fields() {
        let body = r#"{
            "monthlyLimit": 800.0,
            "suggestedCategories": [],
            "modelVersion": "global-v3"
        }"#;

        let recommendation = parse_recommendation(body).unwrap();

        assert_eq!(recommendation.monthly_limit, 800.0);
    }

    #[test]
    fn rejects_a_missing_field() {
        let body = r#"{"suggestedCategories": []}"#;

        assert!(matches!(
            parse_recommendation(body),
            Err(Error::RecommendationFailed(_))
        ));
    }

    #[test]
    fn rejects_non_json_bodies() {
        assert!(matches!(
            parse_recommendation("<html>502 Bad Gateway</html>"),
            Err(Error::RecommendationFailed(_))
        ));
    }

    #[test]
    fn rejects_negative_limits() {
        let body = r#"{
            "monthlyLimit": -10.0,
            "suggestedCategories": []
        }"#;

        assert!(parse_recommendation(body).is_err());
    }

    #[test]
    fn rejects_out_of_range_percentages() {
        let body = r#"{
            "monthlyLimit": 100.0,
            "suggestedCategories": [
                {"category": "groceries", "limit": 40.0, "percent": 140.0}
            ]
        }"#;

        assert!(parse_recommendation(body).is_err());
    }
}
