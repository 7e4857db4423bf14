//! Defines the core data models and database queries for transactions.

use rusqlite::{Connection, Row, types::Type};
use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;

use crate::{Error, account::AccountId};

// ============================================================================
// MODELS
// ============================================================================

/// The ID of a transaction in the database.
pub type TransactionId = i64;

/// Whether a transaction brought money into an account or sent it out.
///
/// Amounts are stored as non-negative magnitudes; the direction of the money
/// flow is carried by this enum alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    /// Money coming into the account.
    Income,
    /// Money leaving the account.
    Expense,
}

impl TransactionKind {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Income => "INCOME",
            Self::Expense => "EXPENSE",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "INCOME" => Some(Self::Income),
            "EXPENSE" => Some(Self::Expense),
            _ => None,
        }
    }
}

/// How often a recurring transaction repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecurringInterval {
    /// Repeats every day.
    Daily,
    /// Repeats every week.
    Weekly,
    /// Repeats every month.
    Monthly,
    /// Repeats every year.
    Yearly,
}

impl RecurringInterval {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
            Self::Yearly => "YEARLY",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "DAILY" => Some(Self::Daily),
            "WEEKLY" => Some(Self::Weekly),
            "MONTHLY" => Some(Self::Monthly),
            "YEARLY" => Some(Self::Yearly),
            _ => None,
        }
    }

    /// The label shown in the recurring badge of the transaction table.
    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
            Self::Yearly => "Yearly",
        }
    }
}

/// The repeat schedule of a recurring transaction.
///
/// Both fields are required together. A record that claims to be recurring
/// but is missing either one is rejected at the data boundary, so code
/// holding a `Recurrence` never needs to second-guess it.
#[derive(Debug, Clone, PartialEq)]
pub struct Recurrence {
    /// How often the transaction repeats.
    pub interval: RecurringInterval,
    /// When the transaction is next expected to occur.
    pub next_date: PrimitiveDateTime,
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The account the transaction belongs to.
    pub account_id: AccountId,
    /// When the transaction happened.
    pub date: PrimitiveDateTime,
    /// A text description of what the transaction was for, if one was given.
    pub description: Option<String>,
    /// The category key, e.g. "groceries". Maps to a badge colour in the table.
    pub category: String,
    /// The magnitude of the transaction. Always non-negative.
    pub amount: f64,
    /// Whether this transaction is income or an expense.
    pub kind: TransactionKind,
    /// The repeat schedule, for recurring transactions.
    pub recurrence: Option<Recurrence>,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        amount: f64,
        date: PrimitiveDateTime,
        category: &str,
        kind: TransactionKind,
    ) -> TransactionBuilder {
        TransactionBuilder {
            amount,
            date,
            category: category.to_owned(),
            kind,
            description: None,
            recurrence: None,
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// Optional fields default to absent. Required invariants (non-negative,
/// finite amount) are checked when the builder is handed to
/// [create_transaction].
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The magnitude of the transaction in dollars. Must be finite and
    /// non-negative; the direction is given by `kind`.
    pub amount: f64,
    /// The date and time when the transaction occurred.
    pub date: PrimitiveDateTime,
    /// The category key, e.g. "groceries".
    pub category: String,
    /// Whether this transaction is income or an expense.
    pub kind: TransactionKind,
    /// A human-readable description of the transaction.
    pub description: Option<String>,
    /// The repeat schedule, for recurring transactions.
    pub recurrence: Option<Recurrence>,
}

impl TransactionBuilder {
    /// Set the description for the transaction.
    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_owned());
        self
    }

    /// Mark the transaction as recurring.
    ///
    /// Taking the interval and the next occurrence together means a
    /// half-specified recurrence cannot be constructed.
    pub fn recurrence(mut self, interval: RecurringInterval, next_date: PrimitiveDateTime) -> Self {
        self.recurrence = Some(Recurrence {
            interval,
            next_date,
        });
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction in the database from a builder.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidAmount] if the amount is negative or not finite,
/// - or [Error::SqlError] if there is some other SQL error (including an
///   `account_id` that does not refer to a real account).
pub fn create_transaction(
    builder: TransactionBuilder,
    account_id: AccountId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    if !builder.amount.is_finite() || builder.amount < 0.0 {
        return Err(Error::InvalidAmount(builder.amount));
    }

    let (recurring_interval, next_recurring_date) = match &builder.recurrence {
        Some(recurrence) => (Some(recurrence.interval.as_str()), Some(recurrence.next_date)),
        None => (None, None),
    };

    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" \
             (account_id, date, description, category, amount, kind, recurring_interval, next_recurring_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             RETURNING id, account_id, date, description, category, amount, kind, \
             recurring_interval, next_recurring_date",
        )?
        .query_row(
            (
                account_id,
                builder.date,
                builder.description,
                builder.category,
                builder.amount,
                builder.kind.as_str(),
                recurring_interval,
                next_recurring_date,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Get every transaction belonging to `account_id`, newest first.
///
/// The returned order (date descending, then ID descending) is the baseline
/// order that the table view's stable sort preserves for equal keys.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails, or
/// [Error::InvalidRecurrence] if a stored record claims to be recurring but
/// is missing its interval or next occurrence.
pub fn get_transactions_for_account(
    account_id: AccountId,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, account_id, date, description, category, amount, kind, \
             recurring_interval, next_recurring_date \
             FROM \"transaction\" WHERE account_id = ?1 \
             ORDER BY date DESC, id DESC",
        )?
        .query_map([account_id], map_transaction_row)?
        .map(|transaction_result| {
            transaction_result.map_err(|error| match error {
                // Columns 7 and 8 hold the recurrence pair.
                rusqlite::Error::FromSqlConversionFailure(column, _, boxed) if column >= 7 => {
                    Error::InvalidRecurrence(boxed.to_string())
                }
                error => Error::SqlError(error),
            })
        })
        .collect()
}

/// Delete the given transactions, returning the number of rows removed.
///
/// The caller decides what a partial match means; this function reports the
/// row count as-is and never retries.
///
/// # Errors
/// Returns [Error::SqlError] if the statement fails.
pub fn delete_transactions(
    ids: &[TransactionId],
    connection: &Connection,
) -> Result<usize, Error> {
    if ids.is_empty() {
        return Ok(0);
    }

    let placeholders = vec!["?"; ids.len()].join(", ");
    let query = format!("DELETE FROM \"transaction\" WHERE id IN ({placeholders})");

    connection
        .execute(&query, rusqlite::params_from_iter(ids.iter()))
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                account_id INTEGER NOT NULL,
                date TEXT NOT NULL,
                description TEXT,
                category TEXT NOT NULL,
                amount REAL NOT NULL,
                kind TEXT NOT NULL,
                recurring_interval TEXT,
                next_recurring_date TEXT,
                FOREIGN KEY(account_id) REFERENCES account(id) ON DELETE CASCADE
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('transaction', 0)",
        (),
    )?;

    // Composite index used by the account page and budget queries.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_account_date \
         ON \"transaction\"(account_id, date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
///
/// A row with a recurring interval but no next occurrence (or the reverse, or
/// an interval string that matches no known value) fails the conversion
/// rather than being patched with a default.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let account_id = row.get(1)?;
    let date = row.get(2)?;
    let description = row.get(3)?;
    let category = row.get(4)?;
    let amount = row.get(5)?;
    let kind_text: String = row.get(6)?;
    let interval_text: Option<String> = row.get(7)?;
    let next_recurring_date: Option<PrimitiveDateTime> = row.get(8)?;

    let kind = TransactionKind::parse(&kind_text).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            6,
            Type::Text,
            format!("unknown transaction kind \"{kind_text}\"").into(),
        )
    })?;

    let recurrence = match (interval_text, next_recurring_date) {
        (None, None) => None,
        (Some(interval_text), Some(next_date)) => {
            let interval = RecurringInterval::parse(&interval_text).ok_or_else(|| {
                rusqlite::Error::FromSqlConversionFailure(
                    7,
                    Type::Text,
                    format!("unknown recurring interval \"{interval_text}\"").into(),
                )
            })?;

            Some(Recurrence {
                interval,
                next_date,
            })
        }
        _ => {
            return Err(rusqlite::Error::FromSqlConversionFailure(
                7,
                Type::Text,
                "recurring transaction is missing its interval or next occurrence".into(),
            ));
        }
    };

    Ok(Transaction {
        id,
        account_id,
        date,
        description,
        category,
        amount,
        kind,
        recurrence,
    })
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
#[cfg(test)]
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::datetime;

    use crate::{
        Error,
        account::{AccountKind, create_account},
        db::initialize,
        transaction::{
            RecurringInterval, Transaction, TransactionKind, count_transactions,
            create_transaction, delete_transactions, get_transactions_for_account,
        },
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        create_account("Everyday", AccountKind::Current, 100.0, &conn).unwrap();
        conn
    }

    #[test]
    fn create_succeeds() {
        let conn = get_test_connection();
        let amount = 12.3;

        let result = create_transaction(
            Transaction::build(
                amount,
                datetime!(2025-10-05 09:30),
                "groceries",
                TransactionKind::Expense,
            )
            .description("weekly shop"),
            1,
            &conn,
        );

        match result {
            Ok(transaction) => {
                assert_eq!(transaction.amount, amount);
                assert_eq!(transaction.kind, TransactionKind::Expense);
                assert_eq!(transaction.description.as_deref(), Some("weekly shop"));
            }
            Err(error) => panic!("Unexpected error: {error}"),
        }
    }

    #[test]
    fn create_fails_on_negative_amount() {
        let conn = get_test_connection();

        let result = create_transaction(
            Transaction::build(
                -5.0,
                datetime!(2025-10-05 09:30),
                "groceries",
                TransactionKind::Expense,
            ),
            1,
            &conn,
        );

        assert_eq!(result, Err(Error::InvalidAmount(-5.0)));
    }

    #[test]
    fn create_fails_on_non_finite_amount() {
        let conn = get_test_connection();

        let result = create_transaction(
            Transaction::build(
                f64::NAN,
                datetime!(2025-10-05 09:30),
                "groceries",
                TransactionKind::Expense,
            ),
            1,
            &conn,
        );

        assert!(matches!(result, Err(Error::InvalidAmount(_))));
    }

    #[test]
    fn round_trips_recurrence() {
        let conn = get_test_connection();
        let next_date = datetime!(2025-11-01 00:00);

        create_transaction(
            Transaction::build(
                15.0,
                datetime!(2025-10-01 08:00),
                "entertainment",
                TransactionKind::Expense,
            )
            .recurrence(RecurringInterval::Monthly, next_date),
            1,
            &conn,
        )
        .unwrap();

        let transactions = get_transactions_for_account(1, &conn).unwrap();

        assert_eq!(transactions.len(), 1);
        let recurrence = transactions[0]
            .recurrence
            .as_ref()
            .expect("expected a recurrence");
        assert_eq!(recurrence.interval, RecurringInterval::Monthly);
        assert_eq!(recurrence.next_date, next_date);
    }

    #[test]
    fn rejects_half_specified_recurrence_rows() {
        let conn = get_test_connection();

        // Bypass the builder to simulate a corrupt row from an old import.
        conn.execute(
            "INSERT INTO \"transaction\" \
             (account_id, date, description, category, amount, kind, recurring_interval) \
             VALUES (1, '2025-10-01 08:00:00', 'sub', 'entertainment', 15.0, 'EXPENSE', 'MONTHLY')",
            (),
        )
        .unwrap();

        let result = get_transactions_for_account(1, &conn);

        assert!(matches!(result, Err(Error::InvalidRecurrence(_))));
    }

    #[test]
    fn rejects_unknown_interval_rows() {
        let conn = get_test_connection();

        conn.execute(
            "INSERT INTO \"transaction\" \
             (account_id, date, description, category, amount, kind, recurring_interval, next_recurring_date) \
             VALUES (1, '2025-10-01 08:00:00', 'sub', 'entertainment', 15.0, 'EXPENSE', 'FORTNIGHTLY', '2025-10-15 08:00:00')",
            (),
        )
        .unwrap();

        let result = get_transactions_for_account(1, &conn);

        assert!(matches!(result, Err(Error::InvalidRecurrence(_))));
    }

    #[test]
    fn returns_transactions_newest_first() {
        let conn = get_test_connection();
        for day in 1..=3u8 {
            create_transaction(
                Transaction::build(
                    day as f64,
                    datetime!(2025-10-01 12:00).replace_day(day).unwrap(),
                    "groceries",
                    TransactionKind::Expense,
                ),
                1,
                &conn,
            )
            .unwrap();
        }

        let transactions = get_transactions_for_account(1, &conn).unwrap();

        let dates: Vec<_> = transactions.iter().map(|t| t.date).collect();
        let mut sorted = dates.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(dates, sorted);
    }

    #[test]
    fn delete_removes_only_requested_rows() {
        let conn = get_test_connection();
        for i in 1..=5 {
            create_transaction(
                Transaction::build(
                    i as f64,
                    datetime!(2025-10-05 12:00),
                    "groceries",
                    TransactionKind::Expense,
                ),
                1,
                &conn,
            )
            .unwrap();
        }

        let deleted = delete_transactions(&[1, 3, 5], &conn).unwrap();

        assert_eq!(deleted, 3);
        assert_eq!(count_transactions(&conn).unwrap(), 2);
    }

    #[test]
    fn delete_with_no_ids_is_a_no_op() {
        let conn = get_test_connection();

        assert_eq!(delete_transactions(&[], &conn), Ok(0));
    }
}
