//! Database initialization for the application's domain models.

use rusqlite::Connection;

use crate::{
    account::create_account_table, budget::create_budget_table,
    transaction::create_transaction_table,
};

/// Create the tables for the application's domain models.
///
/// # Errors
/// Returns an error if a table cannot be created or if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    create_account_table(connection)?;
    create_transaction_table(connection)?;
    create_budget_table(connection)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::initialize;

    #[test]
    fn initialize_succeeds_on_empty_database() {
        let connection =
            Connection::open_in_memory().expect("Could not initialise in-memory SQLite database");

        assert_eq!(Ok(()), initialize(&connection));
    }

    #[test]
    fn initialize_is_idempotent() {
        let connection =
            Connection::open_in_memory().expect("Could not initialise in-memory SQLite database");

        initialize(&connection).expect("first initialize failed");

        assert_eq!(Ok(()), initialize(&connection));
    }
}
