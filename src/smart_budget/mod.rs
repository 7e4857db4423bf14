//! The smart budget feature: the client for the external recommendation
//! service and the page that drives it.

pub(crate) mod client;
mod page;

pub use client::{BudgetRecommendation, CategorySuggestion, RecommendationClient};
pub use page::{get_smart_budget_page, recommend_budget_endpoint};
