use std::error::Error;
use std::path::Path;
use std::process::exit;
use std::sync::{Arc, Mutex};

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use pocket_ledger::{
    AuthProvider, DocumentStore, SQLiteAuthProvider, SQLiteDocumentStore, Transaction,
    TransactionType, initialize_db, insert_transaction,
};

const DEMO_EMAIL: &str = "demo@example.com";
const DEMO_PASSWORD: &str = "quartz-lemon-harbor-91";

/// A utility for creating a database with a demo user for manual testing.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    if output_path.extension().is_none_or(|extension| extension.is_empty()) {
        eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
        exit(1);
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;
    initialize_db(&conn)?;
    let conn = Arc::new(Mutex::new(conn));

    println!("Creating demo user {DEMO_EMAIL} with the password {DEMO_PASSWORD}...");
    let now = OffsetDateTime::now_utc();
    let user = SQLiteAuthProvider::new(conn.clone()).sign_up(DEMO_EMAIL, DEMO_PASSWORD)?;
    SQLiteDocumentStore::new(conn.clone()).create_profile(user.id, "Demo", now)?;

    println!("Adding transactions...");
    let conn = conn
        .lock()
        .map_err(|error| format!("could not lock the database: {error}"))?;
    let mut count = 0;

    // One set of transactions per month, oldest first.
    for months_ago in (0..6).rev() {
        let month_start = now - Duration::days(30 * months_ago);

        for (days, description, amount, type_) in monthly_transactions(months_ago) {
            insert_transaction(
                user.id,
                Transaction::build(description, amount, type_),
                month_start + Duration::days(days),
                &conn,
            )?;
            count += 1;
        }
    }

    println!("Added {count} transactions. Success!");

    Ok(())
}

/// Day offsets within the month plus the description, amount and type.
fn monthly_transactions(months_ago: i64) -> Vec<(i64, &'static str, f64, TransactionType)> {
    // Spending varies a little each month so the trend lines are not flat.
    let variation = months_ago as f64 * 17.5;

    let mut transactions = vec![
        (-28, "Salary", 4200.0, TransactionType::Income),
        (-27, "Rent", 1650.0, TransactionType::Expense),
        (-24, "Groceries", 310.0 + variation, TransactionType::Expense),
        (-20, "Power", 145.0, TransactionType::Expense),
        (-15, "Groceries", 285.0 - variation / 2.0, TransactionType::Expense),
        (-11, "Dining out", 96.5 + variation, TransactionType::Expense),
        (-6, "Transport", 120.0, TransactionType::Expense),
    ];

    if months_ago % 2 == 0 {
        transactions.push((-9, "Freelance", 750.0, TransactionType::Income));
    }

    if months_ago % 3 == 1 {
        transactions.push((-3, "Interest", 32.4, TransactionType::Income));
    }

    transactions
}
