//! Defines the core data models, validation and database queries for
//! finance records.

use std::fmt::Display;

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::Date;
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    Error,
    category::is_known_category,
    database_id::RecordId,
    user::UserID,
};

// ============================================================================
// MODELS
// ============================================================================

/// Whether a finance record represents money earned or money spent.
///
/// The type supplies the sign semantics; the record amount itself is
/// interpreted positively regardless of type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    /// Money earned, e.g. a salary payment.
    Income,
    /// Money spent, e.g. groceries.
    Expense,
}

impl Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordType::Income => write!(f, "income"),
            RecordType::Expense => write!(f, "expense"),
        }
    }
}

impl ToSql for RecordType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let text = match self {
            RecordType::Income => "income",
            RecordType::Expense => "expense",
        };

        Ok(ToSqlOutput::from(text))
    }
}

impl FromSql for RecordType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "income" => Ok(RecordType::Income),
            "expense" => Ok(RecordType::Expense),
            other => Err(FromSqlError::Other(
                format!("unknown record type \"{other}\"").into(),
            )),
        }
    }
}

/// A single income or expense entry belonging to a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceRecord {
    /// The ID of the record.
    pub id: RecordId,
    /// The ID of the user that owns the record.
    pub user_id: UserID,
    /// The calendar date of the transaction. For monthly records this is the
    /// date the recurring entry starts at.
    pub date: Date,
    /// The category the record belongs to, a member of the category set for
    /// its type.
    pub category: String,
    /// An optional free-text name for the record.
    pub name: Option<String>,
    /// The amount of money earned or spent. The record type supplies the
    /// sign semantics, so this is usually entered as a positive number.
    pub amount: f64,
    /// A subjective 1-5 score the user assigned to the transaction.
    pub rating: Option<i64>,
    /// Whether the record is income or expense.
    pub record_type: RecordType,
    /// Marks the record as a recurring monthly entry starting at `date`.
    pub is_monthly: bool,
}

/// The validated fields of a finance record that has not been persisted yet.
///
/// Construct via [NewRecord::validate] so that invalid records cannot reach
/// the database.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    /// The calendar date of the transaction.
    pub date: Date,
    /// The category the record belongs to.
    pub category: String,
    /// An optional free-text name.
    pub name: Option<String>,
    /// The amount of money earned or spent.
    pub amount: f64,
    /// The subjective score the user assigned.
    pub rating: i64,
    /// Whether the record is income or expense.
    pub record_type: RecordType,
    /// Marks the record as a recurring monthly entry.
    pub is_monthly: bool,
}

/// The maximum length of the optional record name in characters.
const NAME_MAX_LENGTH: usize = 100;

impl NewRecord {
    /// Validate the fields of a record before insertion.
    ///
    /// `today` is the current calendar date on the server clock, used to
    /// reject monthly records that would start in the future. The date of a
    /// one-off record is not checked against the clock.
    ///
    /// # Errors
    ///
    /// This function will return:
    /// - [Error::UnknownCategory] if `category` is not in the category set
    ///   for `record_type`,
    /// - [Error::RecordNameTooLong] if `name` is longer than 100 characters,
    /// - [Error::FutureMonthlyDate] if `is_monthly` is set and `date` is
    ///   after `today`.
    #[allow(clippy::too_many_arguments)]
    pub fn validate(
        record_type: RecordType,
        date: Date,
        category: &str,
        name: Option<&str>,
        amount: f64,
        rating: i64,
        is_monthly: bool,
        today: Date,
    ) -> Result<Self, Error> {
        if !is_known_category(record_type, category) {
            return Err(Error::UnknownCategory {
                record_type,
                category: category.to_owned(),
            });
        }

        if let Some(name) = name
            && name.graphemes(true).count() > NAME_MAX_LENGTH
        {
            return Err(Error::RecordNameTooLong);
        }

        if is_monthly && date > today {
            return Err(Error::FutureMonthlyDate(date));
        }

        Ok(Self {
            date,
            category: category.to_owned(),
            name: name.map(str::to_owned),
            amount,
            rating,
            record_type,
            is_monthly,
        })
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the record table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_record_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS record (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                date TEXT NOT NULL,
                category TEXT NOT NULL,
                name TEXT,
                amount REAL NOT NULL,
                rating INTEGER,
                type TEXT NOT NULL,
                is_monthly INTEGER NOT NULL DEFAULT 0,
                FOREIGN KEY(user_id) REFERENCES user(id)
                )",
        (),
    )?;

    // Index used by the dashboard and delete queries.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_record_user ON record(user_id);",
        (),
    )?;

    Ok(())
}

/// Insert a validated record into the database for `user_id`.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn create_record(
    new_record: NewRecord,
    user_id: UserID,
    connection: &Connection,
) -> Result<FinanceRecord, Error> {
    let record = connection
        .prepare(
            "INSERT INTO record (user_id, date, category, name, amount, rating, type, is_monthly)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             RETURNING id, user_id, date, category, name, amount, rating, type, is_monthly",
        )?
        .query_one(
            (
                user_id.as_i64(),
                new_record.date,
                &new_record.category,
                &new_record.name,
                new_record.amount,
                new_record.rating,
                new_record.record_type,
                new_record.is_monthly,
            ),
            map_record_row,
        )?;

    Ok(record)
}

/// Retrieve all of a user's records ordered by insertion (ID).
///
/// The stable read order keeps the dashboard aggregation deterministic.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn get_records_by_user(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<FinanceRecord>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, date, category, name, amount, rating, type, is_monthly
             FROM record WHERE user_id = :user_id ORDER BY id",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_record_row)?
        .map(|row| row.map_err(|error| error.into()))
        .collect()
}

/// Retrieve a record from the database by its `id`.
///
/// # Errors
/// This function will return an [Error::NotFound] if `id` does not refer to
/// a valid record, or an [Error::SqlError] if there is some other SQL error.
pub fn get_record(id: RecordId, connection: &Connection) -> Result<FinanceRecord, Error> {
    connection
        .prepare(
            "SELECT id, user_id, date, category, name, amount, rating, type, is_monthly
             FROM record WHERE id = :id",
        )?
        .query_one(&[(":id", &id)], map_record_row)
        .map_err(|error| error.into())
}

/// The number of rows removed by a delete query.
pub type RowsAffected = usize;

/// Delete the record with `id` if it belongs to `user_id`.
///
/// The ownership check is folded into the existence check: deleting a record
/// that exists but belongs to another user affects zero rows, the same as
/// deleting a record that does not exist.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn delete_record(
    id: RecordId,
    user_id: UserID,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "DELETE FROM record WHERE id = :id AND user_id = :user_id",
            &[(":id", &id), (":user_id", &user_id.as_i64())],
        )
        .map_err(|error| error.into())
}

fn map_record_row(row: &Row) -> Result<FinanceRecord, rusqlite::Error> {
    Ok(FinanceRecord {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        date: row.get(2)?,
        category: row.get(3)?,
        name: row.get(4)?,
        amount: row.get(5)?,
        rating: row.get(6)?,
        record_type: row.get(7)?,
        is_monthly: row.get(8)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================
