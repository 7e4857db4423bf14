//! Account management: the account model, the account page with its chart
//! and transaction table, and the default-account switch.

mod account_page;
pub(crate) mod aggregation;
mod chart;
pub(crate) mod core;
mod default_endpoint;

pub use account_page::{AccountPageQuery, get_account_page};
pub use aggregation::{DateRangeBucket, aggregate};
pub use core::{
    Account, AccountId, AccountKind, create_account, create_account_table, get_account,
    get_all_accounts, set_default_account,
};
pub use default_endpoint::set_default_account_endpoint;
