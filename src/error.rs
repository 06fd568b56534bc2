//! Defines the app level error type and conversions to rendered HTML pages and alerts.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use time::Date;

use crate::{
    alert::Alert, internal_server_error::InternalServerError, not_found::get_404_not_found_response,
    record::RecordType,
};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The full name given at registration does not match the expected
    /// "Surname Firstname Patronymic" pattern.
    #[error("the full name must be three capitalized words")]
    InvalidFullName,

    /// The full name given at registration is longer than the column allows.
    #[error("the full name must be at most 100 characters long")]
    FullNameTooLong,

    /// The password given at registration does not meet the format policy.
    #[error("the password does not meet the strength requirements")]
    WeakPassword,

    /// A user with the same full name is already registered.
    #[error("a user with the full name \"{0}\" already exists")]
    DuplicateFullName(String),

    /// No user is registered under the given full name.
    #[error("no user found with the given full name")]
    UserNotFound,

    /// The password did not match the stored password hash.
    #[error("invalid password")]
    InvalidCredentials,

    /// The auth token cookie is missing from the cookie jar in the request.
    #[error("no cookies in the cookie jar :(")]
    CookieMissing,

    /// There was an error creating or formatting the cookie expiry date time.
    #[error("could not create the expiry date time")]
    DateError,

    /// The auth token could not be serialized to JSON for the cookie value.
    #[error("could not serialize the auth token: {0}")]
    JsonSerializationError(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The category submitted with a record does not belong to the category
    /// set for the record's type.
    #[error("\"{category}\" is not a known {record_type} category")]
    UnknownCategory {
        /// The type of the rejected record.
        record_type: RecordType,
        /// The category string that was submitted.
        category: String,
    },

    /// The optional record name is longer than the column allows.
    #[error("the record name must be at most 100 characters long")]
    RecordNameTooLong,

    /// A monthly record was given a start date in the future.
    ///
    /// Recurring records start accruing from their date, so a start date
    /// later than today is not allowed.
    #[error("{0} is a date in the future, which is not allowed for monthly records")]
    FutureMonthlyDate(Date),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    && desc.contains("user.full_name") =>
            {
                Error::DuplicateFullName(String::new())
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to a valid, canonical timezone string"
                ),
            }
            .into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Render the error as an htmx alert partial for requests made from a
    /// page that should stay on screen.
    pub(crate) fn into_alert_response(self) -> Response {
        match self {
            Error::UnknownCategory {
                record_type,
                category,
            } => Alert::error(
                "Unknown category",
                &format!("\"{category}\" is not a valid {record_type} category."),
            )
            .into_response(StatusCode::BAD_REQUEST),
            Error::RecordNameTooLong => Alert::error(
                "Name too long",
                "The record name must be at most 100 characters long.",
            )
            .into_response(StatusCode::BAD_REQUEST),
            Error::FutureMonthlyDate(date) => Alert::error(
                "Invalid start date",
                &format!("{date} is in the future. A monthly record must start today or earlier."),
            )
            .into_response(StatusCode::BAD_REQUEST),
            Error::NotFound => Alert::error(
                "Could not delete record",
                "The record could not be found. \
                Try refreshing the page to see if the record has already been deleted.",
            )
            .into_response(StatusCode::NOT_FOUND),
            Error::InvalidTimezoneError(timezone) => Alert::error(
                "Invalid Timezone Settings",
                &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to a valid, canonical timezone string"
                ),
            )
            .into_response(StatusCode::INTERNAL_SERVER_ERROR),
            _ => Alert::error(
                "Something went wrong",
                "An unexpected error occurred, check the server logs for more details.",
            )
            .into_response(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }
}
