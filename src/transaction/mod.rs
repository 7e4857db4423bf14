//! Transaction management for the application.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model, its boundary validation, and database functions
//! - The pure view engine that filters, sorts, and paginates the table
//! - The table HTML and the bulk-delete endpoint

pub(crate) mod core;
mod delete_endpoint;
pub(crate) mod table;
pub(crate) mod view;

pub use core::{
    Recurrence, RecurringInterval, Transaction, TransactionBuilder, TransactionId, TransactionKind,
    create_transaction, create_transaction_table, get_transactions_for_account,
    map_transaction_row,
};
pub use delete_endpoint::delete_transactions_endpoint;

#[cfg(test)]
pub use core::{count_transactions, delete_transactions};
