//! Defines the core data model and database queries for accounts.

use rusqlite::{
    Connection, Row, params,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};

use crate::{Error, database_id::AccountId};

/// Whether an account is an everyday spending account or a savings account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    /// An everyday spending account.
    Current,
    /// A savings account.
    Savings,
}

impl AccountKind {
    /// The string stored in the database and used in form values.
    pub fn as_str(self) -> &'static str {
        match self {
            AccountKind::Current => "current",
            AccountKind::Savings => "savings",
        }
    }

    /// The human readable name, e.g. "Savings".
    pub fn label(self) -> &'static str {
        match self {
            AccountKind::Current => "Current",
            AccountKind::Savings => "Savings",
        }
    }
}

impl ToSql for AccountKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for AccountKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "current" => Ok(AccountKind::Current),
            "savings" => Ok(AccountKind::Savings),
            other => Err(FromSqlError::Other(
                format!("invalid account kind {other:?}").into(),
            )),
        }
    }
}

/// A bank or cash account that transactions are recorded against.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// The id for the account.
    pub id: AccountId,
    /// The name of the account.
    pub name: String,
    /// The current balance, maintained by transaction mutations.
    pub balance: f64,
    /// Whether this is a current or savings account.
    pub kind: AccountKind,
    /// Whether this account is preselected on the dashboard and forms.
    ///
    /// At most one account is the default at any time.
    pub is_default: bool,
}

/// The form data for creating an account.
#[derive(Debug, Deserialize)]
pub struct AccountForm {
    /// The account name.
    pub name: String,
    /// Whether the account is a current or savings account.
    pub kind: AccountKind,
    /// The opening balance in dollars.
    pub balance: f64,
    /// Whether the account should become the default account.
    #[serde(default)]
    pub is_default: Option<bool>,
}

pub fn create_account_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS account (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            balance REAL NOT NULL,
            kind TEXT NOT NULL CHECK (kind IN ('current', 'savings')),
            is_default INTEGER NOT NULL DEFAULT 0
        )",
        (),
    )?;

    Ok(())
}

pub fn map_row_to_account(row: &Row) -> Result<Account, rusqlite::Error> {
    let id = row.get(0)?;
    let name = row.get(1)?;
    let balance = row.get(2)?;
    let kind = row.get(3)?;
    let is_default = row.get(4)?;

    Ok(Account {
        id,
        name,
        balance,
        kind,
        is_default,
    })
}

/// Create a new account.
///
/// The first account ever created becomes the default account regardless of
/// the form value. Creating an account with the default flag set clears the
/// flag on every other account in the same SQL transaction.
///
/// # Errors
/// This function will return a:
/// - [Error::DuplicateAccountName] if an account with the same name exists,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_account(form: &AccountForm, connection: &Connection) -> Result<Account, Error> {
    let sql_transaction = connection.unchecked_transaction()?;

    let account_count: i64 =
        sql_transaction.query_row("SELECT COUNT(id) FROM account", [], |row| row.get(0))?;
    let is_default = account_count == 0 || form.is_default.unwrap_or(false);

    if is_default {
        sql_transaction.execute("UPDATE account SET is_default = 0", ())?;
    }

    sql_transaction
        .execute(
            "INSERT INTO account (name, balance, kind, is_default) VALUES (?1, ?2, ?3, ?4)",
            params![form.name, form.balance, form.kind, is_default],
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(error, Some(_))
                if error.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                Error::DuplicateAccountName(form.name.clone())
            }
            error => error.into(),
        })?;

    let id = sql_transaction.last_insert_rowid();
    sql_transaction.commit()?;

    Ok(Account {
        id,
        name: form.name.clone(),
        balance: form.balance,
        kind: form.kind,
        is_default,
    })
}

/// Retrieve an account by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid account,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_account(id: AccountId, connection: &Connection) -> Result<Account, Error> {
    let account = connection
        .prepare("SELECT id, name, balance, kind, is_default FROM account WHERE id = :id")?
        .query_one(&[(":id", &id)], map_row_to_account)?;

    Ok(account)
}

/// Retrieve all accounts in creation order.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_all_accounts(connection: &Connection) -> Result<Vec<Account>, Error> {
    connection
        .prepare("SELECT id, name, balance, kind, is_default FROM account ORDER BY id ASC")?
        .query_map([], map_row_to_account)?
        .map(|account_result| account_result.map_err(Error::from))
        .collect()
}

/// Retrieve the default account, if any account exists.
///
/// Falls back to the oldest account when no account carries the default
/// flag.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_default_account(connection: &Connection) -> Result<Option<Account>, Error> {
    let account = connection
        .prepare(
            "SELECT id, name, balance, kind, is_default FROM account
             ORDER BY is_default DESC, id ASC LIMIT 1",
        )?
        .query_map([], map_row_to_account)?
        .next()
        .transpose()?;

    Ok(account)
}

/// Rename or rekind an account.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingAccount] if `id` does not refer to a valid account,
/// - [Error::DuplicateAccountName] if the new name is taken,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_account(
    id: AccountId,
    name: &str,
    kind: AccountKind,
    connection: &Connection,
) -> Result<Account, Error> {
    let rows_affected = connection
        .execute(
            "UPDATE account SET name = ?1, kind = ?2 WHERE id = ?3",
            params![name, kind, id],
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(error, Some(_))
                if error.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                Error::DuplicateAccountName(name.to_owned())
            }
            error => error.into(),
        })?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingAccount);
    }

    get_account(id, connection)
}

/// The number of rows a delete statement removed.
type RowsAffected = usize;

/// Delete an account.
///
/// The account's transactions and budget are removed by the schema's
/// cascading foreign keys.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn delete_account(id: AccountId, connection: &Connection) -> Result<RowsAffected, Error> {
    connection
        .execute("DELETE FROM account WHERE id = :id", &[(":id", &id)])
        .map_err(Error::from)
}

/// Mark the account `id` as the default account, clearing the flag on every
/// other account in the same SQL transaction.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingAccount] if `id` does not refer to a valid account,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn set_default_account(id: AccountId, connection: &Connection) -> Result<(), Error> {
    let sql_transaction = connection.unchecked_transaction()?;

    sql_transaction.execute("UPDATE account SET is_default = 0", ())?;
    let rows_affected = sql_transaction.execute(
        "UPDATE account SET is_default = 1 WHERE id = :id",
        &[(":id", &id)],
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingAccount);
    }

    sql_transaction.commit()?;

    Ok(())
}
