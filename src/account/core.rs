//! Defines the core data model and database queries for accounts.

use rusqlite::{Connection, Row, types::Type};

use crate::Error;

/// The ID of an account in the database.
pub type AccountId = i64;

/// The kind of bank account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountKind {
    /// An everyday spending account.
    Current,
    /// A savings account.
    Savings,
}

impl AccountKind {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Current => "CURRENT",
            Self::Savings => "SAVINGS",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "CURRENT" => Some(Self::Current),
            "SAVINGS" => Some(Self::Savings),
            _ => None,
        }
    }

    /// The label shown on account cards.
    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::Current => "Current Account",
            Self::Savings => "Savings Account",
        }
    }
}

/// A bank account that transactions belong to.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// The id for the account.
    pub id: AccountId,
    /// The display name of the account.
    pub name: String,
    /// The kind of account.
    pub kind: AccountKind,
    /// The current balance.
    pub balance: f64,
    /// Whether this is the default account shown on the dashboard.
    pub is_default: bool,
}

pub fn create_account_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS account (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            kind TEXT NOT NULL,
            balance REAL NOT NULL,
            is_default INTEGER NOT NULL DEFAULT 0
        )",
        (),
    )?;

    Ok(())
}

pub fn map_row_to_account(row: &Row) -> Result<Account, rusqlite::Error> {
    let kind_text: String = row.get(2)?;
    let kind = AccountKind::parse(&kind_text).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            Type::Text,
            format!("unknown account kind \"{kind_text}\"").into(),
        )
    })?;

    Ok(Account {
        id: row.get(0)?,
        name: row.get(1)?,
        kind,
        balance: row.get(3)?,
        is_default: row.get(4)?,
    })
}

/// Create a new account.
///
/// The first account created becomes the default automatically, so the
/// dashboard always has a budget target once any account exists.
///
/// # Errors
/// Returns [Error::SqlError] if the insert fails, including when `name`
/// already exists.
pub fn create_account(
    name: &str,
    kind: AccountKind,
    balance: f64,
    connection: &Connection,
) -> Result<Account, Error> {
    let has_default: bool =
        connection.query_row("SELECT EXISTS(SELECT 1 FROM account WHERE is_default = 1)", [], |row| {
            row.get(0)
        })?;

    let account = connection
        .prepare(
            "INSERT INTO account (name, kind, balance, is_default) VALUES (?1, ?2, ?3, ?4)
             RETURNING id, name, kind, balance, is_default",
        )?
        .query_row((name, kind.as_str(), balance, !has_default), map_row_to_account)?;

    Ok(account)
}

/// Get all accounts, default account first.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn get_all_accounts(connection: &Connection) -> Result<Vec<Account>, Error> {
    connection
        .prepare(
            "SELECT id, name, kind, balance, is_default FROM account \
             ORDER BY is_default DESC, name ASC",
        )?
        .query_map([], map_row_to_account)?
        .map(|account_result| account_result.map_err(Error::SqlError))
        .collect()
}

/// Retrieve an account by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid account,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_account(id: AccountId, connection: &Connection) -> Result<Account, Error> {
    let account = connection
        .prepare("SELECT id, name, kind, balance, is_default FROM account WHERE id = :id")?
        .query_one(&[(":id", &id)], map_row_to_account)?;

    Ok(account)
}

/// Make `id` the default account, clearing the previous default.
///
/// # Errors
/// Returns [Error::UpdateMissingAccount] if `id` does not refer to a real
/// account, or [Error::SqlError] if the statements fail.
pub fn set_default_account(id: AccountId, connection: &Connection) -> Result<(), Error> {
    let exists: bool = connection.query_row(
        "SELECT EXISTS(SELECT 1 FROM account WHERE id = ?1)",
        [id],
        |row| row.get(0),
    )?;

    if !exists {
        return Err(Error::UpdateMissingAccount);
    }

    connection.execute("UPDATE account SET is_default = 0 WHERE is_default = 1", ())?;
    connection.execute("UPDATE account SET is_default = 1 WHERE id = ?1", [id])?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use crate::{Error, db::initialize};

    use super::{AccountKind, create_account, get_account, get_all_accounts, set_default_account};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn first_account_becomes_default() {
        let conn = get_test_connection();

        let first = create_account("Everyday", AccountKind::Current, 100.0, &conn).unwrap();
        let second = create_account("Rainy Day", AccountKind::Savings, 2500.0, &conn).unwrap();

        assert!(first.is_default);
        assert!(!second.is_default);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let conn = get_test_connection();
        create_account("Everyday", AccountKind::Current, 100.0, &conn).unwrap();

        let result = create_account("Everyday", AccountKind::Savings, 0.0, &conn);

        assert!(matches!(result, Err(Error::SqlError(_))));
    }

    #[test]
    fn get_all_accounts_lists_default_first() {
        let conn = get_test_connection();
        create_account("Everyday", AccountKind::Current, 100.0, &conn).unwrap();
        create_account("Rainy Day", AccountKind::Savings, 2500.0, &conn).unwrap();
        set_default_account(2, &conn).unwrap();

        let accounts = get_all_accounts(&conn).unwrap();

        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].name, "Rainy Day");
        assert!(accounts[0].is_default);
    }

    #[test]
    fn switching_the_default_clears_the_previous_one() {
        let conn = get_test_connection();
        create_account("Everyday", AccountKind::Current, 100.0, &conn).unwrap();
        create_account("Rainy Day", AccountKind::Savings, 2500.0, &conn).unwrap();

        set_default_account(2, &conn).unwrap();

        assert!(!get_account(1, &conn).unwrap().is_default);
        assert!(get_account(2, &conn).unwrap().is_default);
    }

    #[test]
    fn setting_a_missing_account_as_default_fails() {
        let conn = get_test_connection();
        create_account("Everyday", AccountKind::Current, 100.0, &conn).unwrap();

        let result = set_default_account(42, &conn);

        assert_eq!(result, Err(Error::UpdateMissingAccount));
        assert!(get_account(1, &conn).unwrap().is_default);
    }

    #[test]
    fn get_missing_account_returns_not_found() {
        let conn = get_test_connection();

        assert_eq!(get_account(7, &conn), Err(Error::NotFound));
    }
}
