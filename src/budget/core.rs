//! Defines the budget model, its database queries, and the current-month
//! expense sum the progress widget is driven by.

use rusqlite::Connection;
use time::Date;

use crate::{
    Error,
    account::AccountId,
    transaction::{Transaction, TransactionKind},
};

/// The monthly budget for an account.
#[derive(Debug, Clone, PartialEq)]
pub struct Budget {
    /// The account the budget belongs to.
    pub account_id: AccountId,
    /// The budgeted amount per calendar month. Always positive.
    pub amount: f64,
}

pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS budget (
            account_id INTEGER PRIMARY KEY,
            amount REAL NOT NULL,
            FOREIGN KEY(account_id) REFERENCES account(id) ON DELETE CASCADE
        )",
        (),
    )?;

    Ok(())
}

/// Get the budget for `account_id`, if one has been configured.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn get_budget(account_id: AccountId, connection: &Connection) -> Result<Option<Budget>, Error> {
    let mut statement =
        connection.prepare("SELECT account_id, amount FROM budget WHERE account_id = ?1")?;
    let mut rows = statement.query_map([account_id], |row| {
        Ok(Budget {
            account_id: row.get(0)?,
            amount: row.get(1)?,
        })
    })?;

    match rows.next() {
        Some(budget) => Ok(Some(budget?)),
        None => Ok(None),
    }
}

/// Create or replace the budget for `account_id`.
///
/// # Errors
/// Returns [Error::InvalidBudgetAmount] unless `amount` is a positive, finite
/// number, or [Error::SqlError] if the statement fails.
pub fn upsert_budget(
    account_id: AccountId,
    amount: f64,
    connection: &Connection,
) -> Result<Budget, Error> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::InvalidBudgetAmount(format!(
            "{amount} is not a positive amount"
        )));
    }

    connection.execute(
        "INSERT INTO budget (account_id, amount) VALUES (?1, ?2)
         ON CONFLICT(account_id) DO UPDATE SET amount = excluded.amount",
        (account_id, amount),
    )?;

    Ok(Budget { account_id, amount })
}

/// Sum the expense amounts that fall in the calendar month containing `today`.
///
/// Operates on the already-fetched transaction list rather than issuing its
/// own query, like the rest of the computation core.
pub fn current_month_expenses(transactions: &[Transaction], today: Date) -> f64 {
    transactions
        .iter()
        .filter(|transaction| {
            transaction.kind == TransactionKind::Expense
                && transaction.date.year() == today.year()
                && transaction.date.month() == today.month()
        })
        .map(|transaction| transaction.amount)
        .sum()
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::macros::{date, datetime};

    use crate::{
        Error,
        account::{AccountKind, create_account},
        db::initialize,
        transaction::{Transaction, TransactionKind},
    };

    use super::{Budget, current_month_expenses, get_budget, upsert_budget};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        create_account("Everyday", AccountKind::Current, 100.0, &conn).unwrap();
        conn
    }

    #[test]
    fn budget_round_trips() {
        let conn = get_test_connection();

        upsert_budget(1, 500.0, &conn).unwrap();

        assert_eq!(
            get_budget(1, &conn).unwrap(),
            Some(Budget {
                account_id: 1,
                amount: 500.0
            })
        );
    }

    #[test]
    fn upsert_replaces_the_existing_amount() {
        let conn = get_test_connection();
        upsert_budget(1, 500.0, &conn).unwrap();

        upsert_budget(1, 750.0, &conn).unwrap();

        assert_eq!(get_budget(1, &conn).unwrap().unwrap().amount, 750.0);
    }

    #[test]
    fn missing_budget_is_none() {
        let conn = get_test_connection();

        assert_eq!(get_budget(1, &conn).unwrap(), None);
    }

    #[test]
    fn non_positive_amounts_are_rejected() {
        let conn = get_test_connection();

        assert!(matches!(
            upsert_budget(1, 0.0, &conn),
            Err(Error::InvalidBudgetAmount(_))
        ));
        assert!(matches!(
            upsert_budget(1, -20.0, &conn),
            Err(Error::InvalidBudgetAmount(_))
        ));
        assert!(matches!(
            upsert_budget(1, f64::INFINITY, &conn),
            Err(Error::InvalidBudgetAmount(_))
        ));
    }

    fn transaction(date: time::PrimitiveDateTime, amount: f64, kind: TransactionKind) -> Transaction {
        Transaction {
            id: 0,
            account_id: 1,
            date,
            description: None,
            category: "groceries".to_owned(),
            amount,
            kind,
            recurrence: None,
        }
    }

    #[test]
    fn sums_only_this_months_expenses() {
        let transactions = vec![
            transaction(datetime!(2024-03-05 10:00), 40.0, TransactionKind::Expense),
            transaction(datetime!(2024-03-20 10:00), 60.0, TransactionKind::Expense),
            // Income in the same month must not count.
            transaction(datetime!(2024-03-10 10:00), 500.0, TransactionKind::Income),
            // Expenses in neighbouring months must not count.
            transaction(datetime!(2024-02-29 10:00), 99.0, TransactionKind::Expense),
            transaction(datetime!(2024-04-01 00:00), 99.0, TransactionKind::Expense),
            // Same month number, different year.
            transaction(datetime!(2023-03-15 10:00), 99.0, TransactionKind::Expense),
        ];

        let total = current_month_expenses(&transactions, date!(2024-03-15));

        assert_eq!(total, 100.0);
    }
}
