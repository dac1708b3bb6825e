use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use centsible::{
    AccountForm, AccountKind, RecurringInterval, Transaction, TransactionKind, create_account,
    create_transaction, initialize_db, next_occurrence, set_budget,
};

/// A utility for creating a test database for the centsible web server.
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

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test accounts...");

    let everyday = create_account(
        &AccountForm {
            name: "Everyday".to_owned(),
            kind: AccountKind::Current,
            balance: 2_500.0,
            is_default: Some(true),
        },
        &conn,
    )?;
    let savings = create_account(
        &AccountForm {
            name: "Rainy Day".to_owned(),
            kind: AccountKind::Savings,
            balance: 8_000.0,
            is_default: None,
        },
        &conn,
    )?;

    set_budget(everyday.id, 1_500.0, &conn)?;

    println!("Creating test transactions...");

    let today = OffsetDateTime::now_utc().date();

    create_transaction(
        Transaction::build(everyday.id, 3_200.0, TransactionKind::Income, today - Duration::days(3))
            .description("October salary")
            .category("salary")
            .recurring(
                RecurringInterval::Monthly,
                next_occurrence(today - Duration::days(3), RecurringInterval::Monthly),
            ),
        &conn,
    )?;
    create_transaction(
        Transaction::build(everyday.id, 9.99, TransactionKind::Expense, today - Duration::days(5))
            .description("Streaming subscription")
            .category("entertainment")
            .recurring(
                RecurringInterval::Monthly,
                next_occurrence(today - Duration::days(5), RecurringInterval::Monthly),
            ),
        &conn,
    )?;

    let one_off_expenses = [
        (0, 86.70, "Weekly shop", "groceries"),
        (1, 54.20, "Petrol", "transportation"),
        (2, 120.00, "Power bill", "utilities"),
        (4, 23.50, "Lunch with friends", "food"),
        (7, 86.70, "Weekly shop", "groceries"),
        (9, 35.00, "Movie night", "entertainment"),
        (12, 640.00, "Rent", "housing"),
        (14, 86.70, "Weekly shop", "groceries"),
        (18, 47.90, "Pharmacy", "healthcare"),
        (21, 86.70, "Weekly shop", "groceries"),
        (25, 15.00, "", "other-expense"),
    ];

    for (days_ago, amount, description, category) in one_off_expenses {
        create_transaction(
            Transaction::build(
                everyday.id,
                amount,
                TransactionKind::Expense,
                today - Duration::days(days_ago),
            )
            .description(description)
            .category(category),
            &conn,
        )?;
    }

    create_transaction(
        Transaction::build(savings.id, 62.15, TransactionKind::Income, today - Duration::days(10))
            .description("Interest payment")
            .category("investments"),
        &conn,
    )?;

    println!("Success!");

    Ok(())
}
