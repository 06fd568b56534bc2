//! Defines the endpoint for creating a new income or expense record.
use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;
use time::{Date, OffsetDateTime};

use crate::{
    AppState, Error, endpoints,
    record::{NewRecord, RecordType, core::create_record},
    timezone::get_local_offset,
    user::UserID,
};

/// The state needed to create a record.
#[derive(Debug, Clone)]
pub struct CreateRecordState {
    /// The database connection for managing records.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Europe/Kyiv".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateRecordState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The form data for creating a record.
#[derive(Debug, Deserialize)]
pub struct RecordForm {
    /// Whether the record is income or expense.
    pub record_type: RecordType,
    /// The date of the transaction.
    pub date: Date,
    /// The category the record belongs to.
    pub category: String,
    /// An optional free-text name for the record.
    #[serde(default)]
    pub name: Option<String>,
    /// The value of the transaction.
    pub amount: f64,
    /// The 1-5 score the user assigned to the transaction.
    pub rating: i64,
    /// HTML checkboxes submit "on" when ticked and nothing otherwise.
    #[serde(default)]
    pub is_monthly: Option<String>,
}

/// A route handler for creating a new record, redirects to the dashboard on
/// success.
pub async fn create_record_endpoint(
    State(state): State<CreateRecordState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<RecordForm>,
) -> Response {
    let Some(local_timezone) = get_local_offset(&state.local_timezone) else {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        return Error::InvalidTimezoneError(state.local_timezone).into_alert_response();
    };

    let today = OffsetDateTime::now_utc().to_offset(local_timezone).date();
    let is_monthly = form.is_monthly.as_deref() == Some("on");
    // An empty name field means the user left it blank.
    let name = form.name.as_deref().filter(|name| !name.is_empty());

    let new_record = match NewRecord::validate(
        form.record_type,
        form.date,
        &form.category,
        name,
        form.amount,
        form.rating,
        is_monthly,
        today,
    ) {
        Ok(new_record) => new_record,
        Err(error) => {
            tracing::debug!("rejected record: {error}");
            return error.into_alert_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = create_record(new_record, user_id, &connection) {
        tracing::error!("could not create record: {error}");

        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod create_record_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, body::Body, extract::State, http::Response, response::IntoResponse};
    use axum_extra::extract::Form;
    use axum_htmx::HX_REDIRECT;
    use rusqlite::Connection;
    use time::{Duration, OffsetDateTime, macros::date};

    use crate::{
        db::initialize,
        endpoints,
        password::PasswordHash,
        record::{RecordType, get_records_by_user},
        user::{User, create_user},
    };

    use super::{CreateRecordState, RecordForm, create_record_endpoint};

    fn get_test_state() -> (CreateRecordState, User) {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let user = create_user(
            "Іван Петров Сидорович",
            PasswordHash::new_unchecked("hunter2"),
            &conn,
        )
        .unwrap();

        let state = CreateRecordState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "Etc/UTC".to_owned(),
        };

        (state, user)
    }

    fn get_test_form() -> RecordForm {
        RecordForm {
            record_type: RecordType::Expense,
            date: date!(2026 - 08 - 01),
            category: "Food".to_owned(),
            name: Some("Groceries".to_owned()),
            amount: 54.3,
            rating: 4,
            is_monthly: None,
        }
    }

    #[tokio::test]
    async fn can_create_record() {
        let (state, user) = get_test_state();

        let response = create_record_endpoint(
            State(state.clone()),
            Extension(user.id),
            Form(get_test_form()),
        )
        .await
        .into_response();

        assert_redirects_to_dashboard(response);

        let connection = state.db_connection.lock().unwrap();
        let records = get_records_by_user(user.id, &connection).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].category, "Food");
        assert_eq!(records[0].amount, 54.3);
        assert_eq!(records[0].name.as_deref(), Some("Groceries"));
        assert!(!records[0].is_monthly);
    }

    #[tokio::test]
    async fn checkbox_value_on_marks_record_as_monthly() {
        let (state, user) = get_test_state();
        let form = RecordForm {
            is_monthly: Some("on".to_owned()),
            ..get_test_form()
        };

        let response = create_record_endpoint(State(state.clone()), Extension(user.id), Form(form))
            .await
            .into_response();

        assert_redirects_to_dashboard(response);

        let connection = state.db_connection.lock().unwrap();
        let records = get_records_by_user(user.id, &connection).unwrap();
        assert!(records[0].is_monthly);
    }

    #[tokio::test]
    async fn empty_name_is_stored_as_null() {
        let (state, user) = get_test_state();
        let form = RecordForm {
            name: Some(String::new()),
            ..get_test_form()
        };

        create_record_endpoint(State(state.clone()), Extension(user.id), Form(form))
            .await
            .into_response();

        let connection = state.db_connection.lock().unwrap();
        let records = get_records_by_user(user.id, &connection).unwrap();
        assert_eq!(records[0].name, None);
    }

    #[tokio::test]
    async fn rejects_monthly_record_with_future_date() {
        let (state, user) = get_test_state();
        let tomorrow = (OffsetDateTime::now_utc() + Duration::days(1)).date();
        let form = RecordForm {
            date: tomorrow,
            is_monthly: Some("on".to_owned()),
            ..get_test_form()
        };

        let response = create_record_endpoint(State(state.clone()), Extension(user.id), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), axum::http::StatusCode::BAD_REQUEST);

        let connection = state.db_connection.lock().unwrap();
        let records = get_records_by_user(user.id, &connection).unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn rejects_unknown_category() {
        let (state, user) = get_test_state();
        let form = RecordForm {
            category: "Salary".to_owned(),
            ..get_test_form()
        };

        let response = create_record_endpoint(State(state.clone()), Extension(user.id), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[track_caller]
    fn assert_redirects_to_dashboard(response: Response<Body>) {
        let location = response
            .headers()
            .get(HX_REDIRECT)
            .expect("expected response to have the header hx-redirect");
        assert_eq!(
            location,
            endpoints::DASHBOARD_VIEW,
            "got redirect to {location:?}, want redirect to {}",
            endpoints::DASHBOARD_VIEW
        );
    }
}
