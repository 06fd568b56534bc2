//! Defines the endpoint for deleting a record.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    response::{Html, IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error, database_id::RecordId, record::core::delete_record, user::UserID,
};

/// The state needed to delete a record.
#[derive(Debug, Clone)]
pub struct DeleteRecordState {
    /// The database connection for managing records.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteRecordState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting one of the logged in user's records.
///
/// Records belonging to another user are treated the same as records that do
/// not exist, so the endpoint does not reveal which record IDs are in use.
pub async fn delete_record_endpoint(
    State(state): State<DeleteRecordState>,
    Extension(user_id): Extension<UserID>,
    Path(record_id): Path<RecordId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_record(record_id, user_id, &connection) {
        Ok(0) => Error::NotFound.into_alert_response(),
        // The status code has to be 200 OK or HTMX will not delete the table row.
        Ok(_) => Html("").into_response(),
        Err(error) => {
            tracing::error!("Could not delete record {record_id}: {error}");
            error.into_alert_response()
        }
    }
}
