//! Dashboard module
//!
//! Provides the landing page showing account cards and the default account's
//! budget progress.

mod cards;
mod handlers;

pub use handlers::get_dashboard_page;
