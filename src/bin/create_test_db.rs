//! Creates a database seeded with demo accounts, transactions, and a budget.

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime, PrimitiveDateTime};

use smartspend_rs::{
    AccountKind, RecurringInterval, Transaction, TransactionKind, create_account,
    create_transaction, initialize_db, upsert_budget,
};

/// Create a SQLite database populated with demo data.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path for the new SQLite database.
    #[arg(long)]
    db_path: String,
}

const EXPENSE_CATEGORIES: [&str; 6] = [
    "groceries",
    "utilities",
    "entertainment",
    "transportation",
    "food",
    "shopping",
];

fn main() {
    let args = Args::parse();

    let connection = Connection::open(&args.db_path).expect("Could not open the database file.");
    initialize_db(&connection).expect("Could not initialize the database.");

    let everyday = create_account("Everyday", AccountKind::Current, 1243.50, &connection)
        .expect("Could not create account.");
    let savings = create_account("Rainy Day", AccountKind::Savings, 8420.00, &connection)
        .expect("Could not create account.");

    upsert_budget(everyday.id, 1500.0, &connection).expect("Could not create budget.");

    let now = OffsetDateTime::now_utc();
    let now = PrimitiveDateTime::new(now.date(), now.time());

    // A paycheck on the 1st of each of the last six months.
    for month in 0..6 {
        let date = now - Duration::days(30 * month);
        let date = date.replace_day(1).expect("the 1st is always valid");

        create_transaction(
            Transaction::build(3200.0, date, "salary", TransactionKind::Income)
                .description("Monthly salary")
                .recurrence(RecurringInterval::Monthly, date + Duration::days(30)),
            everyday.id,
            &connection,
        )
        .expect("Could not create transaction.");
    }

    // Day-to-day spending spread over the last six months.
    for i in 0..150i64 {
        let date = now - Duration::days(i) - Duration::hours(i % 12);
        let category = EXPENSE_CATEGORIES[(i % EXPENSE_CATEGORIES.len() as i64) as usize];
        let amount = 8.0 + ((i * 13) % 90) as f64 + 0.25 * (i % 4) as f64;

        create_transaction(
            Transaction::build(amount, date, category, TransactionKind::Expense)
                .description(&format!("{category} purchase")),
            everyday.id,
            &connection,
        )
        .expect("Could not create transaction.");
    }

    // A monthly transfer into savings.
    for month in 0..6 {
        let date = now - Duration::days(30 * month + 2);

        create_transaction(
            Transaction::build(400.0, date, "investments", TransactionKind::Income)
                .description("Savings transfer"),
            savings.id,
            &connection,
        )
        .expect("Could not create transaction.");
    }

    println!("Created demo database at {}", args.db_path);
}
