//! Defines the core data models and database queries for transactions.

use std::fmt::Display;

use rusqlite::{
    Connection, Row, params,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    database_id::{AccountId, TransactionId},
};

// ============================================================================
// MODELS
// ============================================================================

/// Whether a transaction adds money to an account or takes money out of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money coming in, e.g. a salary deposit.
    Income,
    /// Money going out, e.g. a grocery shop.
    Expense,
}

impl TransactionKind {
    /// The string stored in the database and used in query parameters.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(FromSqlError::Other(
                format!("invalid transaction kind {other:?}").into(),
            )),
        }
    }
}

/// How often a recurring transaction repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurringInterval {
    /// Repeats every day.
    Daily,
    /// Repeats every seven days.
    Weekly,
    /// Repeats on the same day each month.
    Monthly,
    /// Repeats on the same date each year.
    Yearly,
}

impl RecurringInterval {
    /// The string stored in the database and used in query parameters.
    pub fn as_str(self) -> &'static str {
        match self {
            RecurringInterval::Daily => "daily",
            RecurringInterval::Weekly => "weekly",
            RecurringInterval::Monthly => "monthly",
            RecurringInterval::Yearly => "yearly",
        }
    }

    /// The label displayed on the recurring badge, e.g. "Weekly".
    pub fn label(self) -> &'static str {
        match self {
            RecurringInterval::Daily => "Daily",
            RecurringInterval::Weekly => "Weekly",
            RecurringInterval::Monthly => "Monthly",
            RecurringInterval::Yearly => "Yearly",
        }
    }
}

impl ToSql for RecurringInterval {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for RecurringInterval {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "daily" => Ok(RecurringInterval::Daily),
            "weekly" => Ok(RecurringInterval::Weekly),
            "monthly" => Ok(RecurringInterval::Monthly),
            "yearly" => Ok(RecurringInterval::Yearly),
            other => Err(FromSqlError::Other(
                format!("invalid recurring interval {other:?}").into(),
            )),
        }
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// Amounts are stored as positive magnitudes; [Transaction::kind] determines
/// the direction money moved. To create a new `Transaction`, use
/// [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The ID of the account the money moved in or out of.
    pub account_id: AccountId,
    /// The amount of money spent or earned in this transaction.
    pub amount: f64,
    /// Whether this transaction is income or an expense.
    pub kind: TransactionKind,
    /// When the transaction happened.
    pub date: Date,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The key of the category the transaction belongs to.
    pub category: String,
    /// Whether this transaction repeats on a schedule.
    pub is_recurring: bool,
    /// How often the transaction repeats. Set iff `is_recurring` is true.
    pub recurring_interval: Option<RecurringInterval>,
    /// When the transaction next repeats. Set iff `is_recurring` is true.
    pub next_recurring_date: Option<Date>,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        account_id: AccountId,
        amount: f64,
        kind: TransactionKind,
        date: Date,
    ) -> TransactionBuilder {
        TransactionBuilder {
            account_id,
            amount,
            kind,
            date,
            description: String::new(),
            category: String::new(),
            recurring: None,
        }
    }

    /// The amount with its sign applied: negative for expenses, positive for
    /// income. This is the delta the transaction applies to its account's
    /// balance.
    pub fn signed_amount(&self) -> f64 {
        signed_amount(self.kind, self.amount)
    }
}

/// The amount with its sign applied: negative for expenses, positive for
/// income.
pub fn signed_amount(kind: TransactionKind, amount: f64) -> f64 {
    match kind {
        TransactionKind::Income => amount,
        TransactionKind::Expense => -amount,
    }
}

/// A builder for creating [Transaction] instances.
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The account the money moved in or out of.
    pub account_id: AccountId,
    /// The monetary amount of the transaction as a positive magnitude.
    pub amount: f64,
    /// Whether the transaction is income or an expense.
    pub kind: TransactionKind,
    /// The date when the transaction occurred.
    pub date: Date,
    /// A human-readable description of the transaction.
    pub description: String,
    /// The category key, e.g. "groceries", "salary".
    pub category: String,
    /// The repeat schedule, if the transaction recurs.
    pub recurring: Option<(RecurringInterval, Date)>,
}

impl TransactionBuilder {
    /// Set the description for the transaction.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    /// Set the category key for the transaction.
    pub fn category(mut self, category: &str) -> Self {
        self.category = category.to_owned();
        self
    }

    /// Mark the transaction as recurring with the given interval and next
    /// occurrence date.
    pub fn recurring(mut self, interval: RecurringInterval, next_date: Date) -> Self {
        self.recurring = Some((interval, next_date));
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction in the database from a builder and apply its
/// amount to the owning account's balance.
///
/// The insert and the balance adjustment happen in a single SQL transaction.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidAccount] if the account ID does not refer to a real account,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let sql_transaction = connection.unchecked_transaction()?;

    let (recurring_interval, next_recurring_date) = match builder.recurring {
        Some((interval, next_date)) => (Some(interval), Some(next_date)),
        None => (None, None),
    };

    let transaction = sql_transaction
        .prepare(
            "INSERT INTO \"transaction\"
             (account_id, amount, kind, date, description, category,
              is_recurring, recurring_interval, next_recurring_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             RETURNING id, account_id, amount, kind, date, description, category,
             is_recurring, recurring_interval, next_recurring_date",
        )?
        .query_row(
            params![
                builder.account_id,
                builder.amount,
                builder.kind,
                builder.date,
                builder.description,
                builder.category,
                builder.recurring.is_some(),
                recurring_interval,
                next_recurring_date,
            ],
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::InvalidAccount(Some(builder.account_id)),
            error => error.into(),
        })?;

    apply_balance_delta(
        transaction.account_id,
        transaction.signed_amount(),
        &sql_transaction,
    )?;

    sql_transaction.commit()?;

    Ok(transaction)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(
    id: TransactionId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, account_id, amount, kind, date, description, category,
             is_recurring, recurring_interval, next_recurring_date
             FROM \"transaction\" WHERE id = :id",
        )?
        .query_one(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Retrieve all transactions for the account `account_id`, most recent first.
///
/// Rows are ordered by date descending and then by ID so the collection has a
/// stable order for the list view-model to work from.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_transactions_for_account(
    account_id: AccountId,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, account_id, amount, kind, date, description, category,
             is_recurring, recurring_interval, next_recurring_date
             FROM \"transaction\" WHERE account_id = :account_id
             ORDER BY date DESC, id ASC",
        )?
        .query_map(&[(":account_id", &account_id)], map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(Error::from))
        .collect()
}

/// Update an existing transaction and reconcile the affected account
/// balances in a single SQL transaction.
///
/// The old amount is reversed on the old account and the new amount applied
/// to the new account, so moving a transaction between accounts keeps both
/// balances correct.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingTransaction] if `id` does not refer to a valid transaction,
/// - [Error::InvalidAccount] if the new account ID is invalid,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let old = match get_transaction(id, connection) {
        Ok(transaction) => transaction,
        Err(Error::NotFound) => return Err(Error::UpdateMissingTransaction),
        Err(error) => return Err(error),
    };

    let sql_transaction = connection.unchecked_transaction()?;

    let (recurring_interval, next_recurring_date) = match builder.recurring {
        Some((interval, next_date)) => (Some(interval), Some(next_date)),
        None => (None, None),
    };

    let updated = sql_transaction
        .prepare(
            "UPDATE \"transaction\"
             SET account_id = ?1, amount = ?2, kind = ?3, date = ?4,
                 description = ?5, category = ?6, is_recurring = ?7,
                 recurring_interval = ?8, next_recurring_date = ?9
             WHERE id = ?10
             RETURNING id, account_id, amount, kind, date, description, category,
             is_recurring, recurring_interval, next_recurring_date",
        )?
        .query_row(
            params![
                builder.account_id,
                builder.amount,
                builder.kind,
                builder.date,
                builder.description,
                builder.category,
                builder.recurring.is_some(),
                recurring_interval,
                next_recurring_date,
                id,
            ],
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::InvalidAccount(Some(builder.account_id)),
            rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingTransaction,
            error => error.into(),
        })?;

    apply_balance_delta(old.account_id, -old.signed_amount(), &sql_transaction)?;
    apply_balance_delta(updated.account_id, updated.signed_amount(), &sql_transaction)?;

    sql_transaction.commit()?;

    Ok(updated)
}

/// The number of rows a delete statement removed.
pub type RowsAffected = usize;

/// Delete a transaction and reverse its amount on the owning account's
/// balance in a single SQL transaction.
///
/// Returns the number of rows deleted: zero when `id` does not refer to a
/// transaction.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn delete_transaction(
    id: TransactionId,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    let transaction = match get_transaction(id, connection) {
        Ok(transaction) => transaction,
        Err(Error::NotFound) => return Ok(0),
        Err(error) => return Err(error),
    };

    let sql_transaction = connection.unchecked_transaction()?;

    let rows_affected =
        sql_transaction.execute("DELETE FROM \"transaction\" WHERE id = :id", &[(":id", &id)])?;
    apply_balance_delta(
        transaction.account_id,
        -transaction.signed_amount(),
        &sql_transaction,
    )?;

    sql_transaction.commit()?;

    Ok(rows_affected)
}

/// Delete a set of transactions as a single all-or-nothing operation.
///
/// Every delete and every balance adjustment happens inside one SQL
/// transaction: either all the given transactions are removed and their
/// accounts rebalanced, or the database is left untouched.
///
/// Identifiers that no longer exist are skipped; the returned count only
/// includes rows that were actually deleted.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error, in
/// which case no rows are deleted.
pub fn delete_transactions(
    ids: &[TransactionId],
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    let sql_transaction = connection.unchecked_transaction()?;

    let mut rows_affected = 0;

    for &id in ids {
        let transaction = match get_transaction(id, &sql_transaction) {
            Ok(transaction) => transaction,
            Err(Error::NotFound) => continue,
            Err(error) => return Err(error),
        };

        rows_affected += sql_transaction
            .execute("DELETE FROM \"transaction\" WHERE id = :id", &[(":id", &id)])?;
        apply_balance_delta(
            transaction.account_id,
            -transaction.signed_amount(),
            &sql_transaction,
        )?;
    }

    sql_transaction.commit()?;

    Ok(rows_affected)
}

/// Get the total number of transactions recorded against an account.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_transactions_for_account(
    account_id: AccountId,
    connection: &Connection,
) -> Result<u32, Error> {
    connection
        .query_row(
            "SELECT COUNT(id) FROM \"transaction\" WHERE account_id = :account_id",
            &[(":account_id", &account_id)],
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

fn apply_balance_delta(
    account_id: AccountId,
    delta: f64,
    connection: &Connection,
) -> Result<(), Error> {
    connection.execute(
        "UPDATE account SET balance = balance + ?1 WHERE id = ?2",
        params![delta, account_id],
    )?;

    Ok(())
}

/// Create the transaction table in the database.
///
/// The recurring columns carry a CHECK constraint mirroring the model
/// invariant: the interval and next date are set iff the row is recurring.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                account_id INTEGER NOT NULL,
                amount REAL NOT NULL,
                kind TEXT NOT NULL CHECK (kind IN ('income', 'expense')),
                date TEXT NOT NULL,
                description TEXT NOT NULL,
                category TEXT NOT NULL,
                is_recurring INTEGER NOT NULL DEFAULT 0,
                recurring_interval TEXT,
                next_recurring_date TEXT,
                FOREIGN KEY(account_id) REFERENCES account(id) ON UPDATE CASCADE ON DELETE CASCADE,
                CHECK (
                    (is_recurring = 0 AND recurring_interval IS NULL AND next_recurring_date IS NULL)
                    OR (is_recurring = 1 AND recurring_interval IS NOT NULL)
                )
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('transaction', 0)",
        (),
    )?;

    // Composite index used by the account page and the dashboard.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_account_date
         ON \"transaction\"(account_id, date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
///
/// Rows that violate the recurring invariant (e.g. hand-edited databases)
/// are normalized: a non-recurring row never exposes an interval or a next
/// date.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let account_id = row.get(1)?;
    let amount = row.get(2)?;
    let kind = row.get(3)?;
    let date = row.get(4)?;
    let description = row.get(5)?;
    let category = row.get(6)?;
    let is_recurring: bool = row.get(7)?;
    let recurring_interval = if is_recurring { row.get(8)? } else { None };
    let next_recurring_date = if is_recurring { row.get(9)? } else { None };

    Ok(Transaction {
        id,
        account_id,
        amount,
        kind,
        date,
        description,
        category,
        is_recurring,
        recurring_interval,
        next_recurring_date,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        account::{AccountForm, AccountKind, create_account, get_account},
        db::initialize,
        transaction::{
            RecurringInterval, Transaction, TransactionKind, count_transactions_for_account,
            create_transaction, delete_transaction, delete_transactions, get_transaction,
            get_transactions_for_account, update_transaction,
        },
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn create_test_account(conn: &Connection) -> crate::account::Account {
        create_account(
            &AccountForm {
                name: "Everyday".to_owned(),
                kind: AccountKind::Current,
                balance: 1_000.0,
                is_default: None,
            },
            conn,
        )
        .expect("Could not create account")
    }

    #[test]
    fn create_succeeds_and_subtracts_expense_from_balance() {
        let conn = get_test_connection();
        let account = create_test_account(&conn);
        let amount = 12.3;

        let result = create_transaction(
            Transaction::build(
                account.id,
                amount,
                TransactionKind::Expense,
                date!(2025 - 10 - 05),
            )
            .category("groceries"),
            &conn,
        );

        match result {
            Ok(transaction) => assert_eq!(transaction.amount, amount),
            Err(error) => panic!("Unexpected error: {error}"),
        }

        let got_balance = get_account(account.id, &conn).unwrap().balance;
        assert_eq!(got_balance, 1_000.0 - amount);
    }

    #[test]
    fn create_adds_income_to_balance() {
        let conn = get_test_connection();
        let account = create_test_account(&conn);

        create_transaction(
            Transaction::build(
                account.id,
                250.0,
                TransactionKind::Income,
                date!(2025 - 10 - 05),
            )
            .category("salary"),
            &conn,
        )
        .unwrap();

        let got_balance = get_account(account.id, &conn).unwrap().balance;
        assert_eq!(got_balance, 1_250.0);
    }

    #[test]
    fn create_fails_on_invalid_account_id() {
        let conn = get_test_connection();
        let account_id = 42;

        let result = create_transaction(
            Transaction::build(
                account_id,
                123.45,
                TransactionKind::Expense,
                date!(2025 - 10 - 04),
            ),
            &conn,
        );

        assert_eq!(result, Err(Error::InvalidAccount(Some(account_id))));
    }

    #[test]
    fn create_recurring_stores_interval_and_next_date() {
        let conn = get_test_connection();
        let account = create_test_account(&conn);

        let transaction = create_transaction(
            Transaction::build(
                account.id,
                9.99,
                TransactionKind::Expense,
                date!(2025 - 10 - 01),
            )
            .category("entertainment")
            .description("Streaming subscription")
            .recurring(RecurringInterval::Monthly, date!(2025 - 11 - 01)),
            &conn,
        )
        .unwrap();

        assert!(transaction.is_recurring);
        assert_eq!(
            transaction.recurring_interval,
            Some(RecurringInterval::Monthly)
        );
        assert_eq!(transaction.next_recurring_date, Some(date!(2025 - 11 - 01)));

        let got = get_transaction(transaction.id, &conn).unwrap();
        assert_eq!(got, transaction);
    }

    #[test]
    fn update_moves_amount_between_accounts() {
        let conn = get_test_connection();
        let first = create_test_account(&conn);
        let second = create_account(
            &AccountForm {
                name: "Savings".to_owned(),
                kind: AccountKind::Savings,
                balance: 500.0,
                is_default: None,
            },
            &conn,
        )
        .unwrap();

        let transaction = create_transaction(
            Transaction::build(
                first.id,
                100.0,
                TransactionKind::Expense,
                date!(2025 - 10 - 05),
            )
            .category("shopping"),
            &conn,
        )
        .unwrap();
        assert_eq!(get_account(first.id, &conn).unwrap().balance, 900.0);

        update_transaction(
            transaction.id,
            Transaction::build(
                second.id,
                100.0,
                TransactionKind::Expense,
                date!(2025 - 10 - 05),
            )
            .category("shopping"),
            &conn,
        )
        .unwrap();

        assert_eq!(get_account(first.id, &conn).unwrap().balance, 1_000.0);
        assert_eq!(get_account(second.id, &conn).unwrap().balance, 400.0);
    }

    #[test]
    fn update_missing_transaction_fails() {
        let conn = get_test_connection();
        let account = create_test_account(&conn);

        let result = update_transaction(
            1337,
            Transaction::build(
                account.id,
                1.0,
                TransactionKind::Expense,
                date!(2025 - 10 - 05),
            ),
            &conn,
        );

        assert_eq!(result, Err(Error::UpdateMissingTransaction));
    }

    #[test]
    fn delete_restores_balance() {
        let conn = get_test_connection();
        let account = create_test_account(&conn);
        let transaction = create_transaction(
            Transaction::build(
                account.id,
                100.0,
                TransactionKind::Expense,
                date!(2025 - 10 - 05),
            )
            .category("bills"),
            &conn,
        )
        .unwrap();

        let rows_affected = delete_transaction(transaction.id, &conn).unwrap();

        assert_eq!(rows_affected, 1);
        assert_eq!(get_account(account.id, &conn).unwrap().balance, 1_000.0);
        assert_eq!(get_transaction(transaction.id, &conn), Err(Error::NotFound));
    }

    #[test]
    fn delete_missing_transaction_affects_no_rows() {
        let conn = get_test_connection();
        create_test_account(&conn);

        let rows_affected = delete_transaction(1337, &conn).unwrap();

        assert_eq!(rows_affected, 0);
    }

    #[test]
    fn bulk_delete_removes_all_and_restores_balances() {
        let conn = get_test_connection();
        let account = create_test_account(&conn);
        let mut ids = Vec::new();
        for i in 1..=5 {
            let transaction = create_transaction(
                Transaction::build(
                    account.id,
                    i as f64 * 10.0,
                    TransactionKind::Expense,
                    date!(2025 - 10 - 05),
                )
                .category("food"),
                &conn,
            )
            .unwrap();
            ids.push(transaction.id);
        }
        assert_eq!(get_account(account.id, &conn).unwrap().balance, 850.0);

        let rows_affected = delete_transactions(&ids, &conn).unwrap();

        assert_eq!(rows_affected, 5);
        assert_eq!(get_account(account.id, &conn).unwrap().balance, 1_000.0);
        assert_eq!(
            count_transactions_for_account(account.id, &conn).unwrap(),
            0
        );
    }

    #[test]
    fn bulk_delete_skips_missing_ids() {
        let conn = get_test_connection();
        let account = create_test_account(&conn);
        let transaction = create_transaction(
            Transaction::build(
                account.id,
                10.0,
                TransactionKind::Expense,
                date!(2025 - 10 - 05),
            )
            .category("food"),
            &conn,
        )
        .unwrap();

        let rows_affected = delete_transactions(&[transaction.id, 999], &conn).unwrap();

        assert_eq!(rows_affected, 1);
    }

    #[test]
    fn transactions_for_account_are_most_recent_first() {
        let conn = get_test_connection();
        let account = create_test_account(&conn);
        let today = date!(2025 - 10 - 05);
        for i in 0..3 {
            create_transaction(
                Transaction::build(
                    account.id,
                    (i + 1) as f64,
                    TransactionKind::Expense,
                    today - time::Duration::days(i),
                )
                .category("food"),
                &conn,
            )
            .unwrap();
        }

        let got = get_transactions_for_account(account.id, &conn).unwrap();

        let got_dates: Vec<_> = got.iter().map(|transaction| transaction.date).collect();
        assert_eq!(
            got_dates,
            vec![
                today,
                today - time::Duration::days(1),
                today - time::Duration::days(2)
            ]
        );
    }
}
