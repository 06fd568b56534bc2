//! This file defines the routes for displaying the registration page and
//! creating new users.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::Duration;
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    AppState, Error,
    auth::{invalidate_auth_cookie, set_auth_cookie},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base, full_name_input,
        link, log_in_register, password_input,
    },
    password::PasswordHash,
    user::create_user,
    validation::{is_strong_password, is_valid_full_name},
};

/// The minimum number of characters a password must have.
const PASSWORD_MIN_LENGTH: u8 = 8;

/// The maximum number of grapheme clusters a full name may have.
const FULL_NAME_MAX_LENGTH: usize = 100;

/// The error shown when the full name does not match the expected pattern.
pub const INVALID_FULL_NAME_ERROR_MSG: &str =
    "The full name must be three capitalized words, e.g. Прізвище Ім'я По-батькові.";

/// The error shown when the full name exceeds the length limit.
pub const FULL_NAME_TOO_LONG_ERROR_MSG: &str =
    "The full name must be at most 100 characters long.";

/// The error shown when a user with the submitted full name already exists.
pub const DUPLICATE_FULL_NAME_ERROR_MSG: &str =
    "A user with this name is already registered. Try logging in instead.";

/// The error shown when the two password fields do not match.
pub const PASSWORD_MISMATCH_ERROR_MSG: &str = "The passwords do not match.";

/// The error shown when the password does not meet the format policy.
pub const WEAK_PASSWORD_ERROR_MSG: &str = "The password must be at least 8 characters long and \
    contain at least one letter, one digit and one special character.";

/// The data submitted through the registration form.
#[derive(Clone, Deserialize)]
pub struct RegisterForm {
    /// The full name the user wants to register under.
    pub full_name: String,
    /// The raw password.
    pub password: String,
    /// The raw password, entered a second time.
    pub confirm_password: String,
}

fn confirm_password_input(error_message: Option<&str>) -> Markup {
    html! {
        div
        {
            label for="confirm-password" class=(FORM_LABEL_STYLE) { "Confirm password" }

            input
                type="password"
                name="confirm_password"
                id="confirm-password"
                placeholder="••••••••"
                class=(FORM_TEXT_INPUT_STYLE)
                required
                minlength=(PASSWORD_MIN_LENGTH)
            ;

            @if let Some(error_message) = error_message
            {
                p class="text-red-500 text-base" { (error_message) }
            }
        }
    }
}

fn register_form(
    full_name_value: &str,
    full_name_error: Option<&str>,
    password_error: Option<&str>,
    confirm_password_error: Option<&str>,
) -> Markup {
    let log_in_link = link(endpoints::LOG_IN_VIEW, "Log in here");

    html! {
        form
            hx-post=(endpoints::USERS)
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="space-y-4 md:space-y-6"
        {
            (full_name_input(full_name_value, full_name_error))
            (password_input("", PASSWORD_MIN_LENGTH, password_error))
            (confirm_password_input(confirm_password_error))

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Register" }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Already have an account? " (log_in_link)
            }
        }
    }
}

/// Display the registration page.
pub async fn get_register_page() -> Response {
    let form = register_form("", None, None, None);
    let content = log_in_register("Create an account", &form);

    base("Register", &[], &content).into_response()
}

/// The state needed to register a new user.
#[derive(Debug, Clone)]
pub struct RegisterState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The database connection for storing the new user.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RegisterState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<RegisterState> for Key {
    fn from_ref(state: &RegisterState) -> Self {
        state.cookie_key.clone()
    }
}

/// Validate the registration form against the credential format policy.
///
/// The first failing check wins.
fn validate_registration(form: &RegisterForm) -> Result<(), Error> {
    if !is_valid_full_name(&form.full_name) {
        return Err(Error::InvalidFullName);
    }

    if !is_strong_password(&form.password) {
        return Err(Error::WeakPassword);
    }

    if form.full_name.graphemes(true).count() > FULL_NAME_MAX_LENGTH {
        return Err(Error::FullNameTooLong);
    }

    if form.password != form.confirm_password {
        return Err(Error::InvalidCredentials);
    }

    Ok(())
}

/// Handler for registration requests via the POST method.
///
/// On success, the new user is logged in straight away: the auth cookie is
/// set and the client is redirected to the dashboard page. Validation
/// failures re-render the form with an error under the offending field.
pub async fn register_user(
    State(state): State<RegisterState>,
    jar: PrivateCookieJar,
    Form(form): Form<RegisterForm>,
) -> Response {
    if let Err(error) = validate_registration(&form) {
        return register_error_response(&form.full_name, error);
    }

    let password_hash =
        match PasswordHash::from_raw_password(&form.password, PasswordHash::DEFAULT_COST) {
            Ok(password_hash) => password_hash,
            Err(error) => {
                tracing::error!("Error hashing password: {error}");
                return error.into_alert_response();
            }
        };

    let user = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(error) => {
                tracing::error!("could not acquire database lock: {error}");
                return Error::DatabaseLockError.into_alert_response();
            }
        };

        match create_user(&form.full_name, password_hash, &connection) {
            Ok(user) => user,
            Err(error @ Error::DuplicateFullName(_)) => {
                return register_error_response(&form.full_name, error);
            }
            Err(error) => {
                tracing::error!("Unhandled error while creating user: {error}");
                return error.into_alert_response();
            }
        }
    };

    set_auth_cookie(jar.clone(), user.id, state.cookie_duration)
        .map(|updated_jar| {
            (
                StatusCode::SEE_OTHER,
                HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
                updated_jar,
            )
        })
        .map_err(|err| {
            tracing::error!("Error setting auth cookie: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                HxRedirect(endpoints::INTERNAL_ERROR_VIEW.to_owned()),
                invalidate_auth_cookie(jar),
            )
        })
        .into_response()
}

/// Re-render the form with the message for `error` under the right field.
fn register_error_response(full_name_value: &str, error: Error) -> Response {
    let form = match error {
        Error::InvalidFullName => {
            register_form(full_name_value, Some(INVALID_FULL_NAME_ERROR_MSG), None, None)
        }
        Error::FullNameTooLong => {
            register_form(full_name_value, Some(FULL_NAME_TOO_LONG_ERROR_MSG), None, None)
        }
        Error::DuplicateFullName(_) => {
            register_form(full_name_value, Some(DUPLICATE_FULL_NAME_ERROR_MSG), None, None)
        }
        Error::WeakPassword => {
            register_form(full_name_value, None, Some(WEAK_PASSWORD_ERROR_MSG), None)
        }
        Error::InvalidCredentials => {
            register_form(full_name_value, None, None, Some(PASSWORD_MISMATCH_ERROR_MSG))
        }
        error => return error.into_alert_response(),
    };

    (StatusCode::OK, form).into_response()
}


#[cfg(test)]
mod register_user_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Form,
        body::Body,
        extract::State,
        http::{Response, StatusCode},
    };
    use axum_extra::extract::{PrivateCookieJar, cookie::Key};
    use axum_htmx::HX_REDIRECT;
    use rusqlite::Connection;
    use sha2::{Digest, Sha512};
    use time::Duration;

    use crate::{endpoints, user::create_user_table, user::get_user_by_full_name};

    use super::{
        DUPLICATE_FULL_NAME_ERROR_MSG, FULL_NAME_TOO_LONG_ERROR_MSG, INVALID_FULL_NAME_ERROR_MSG,
        PASSWORD_MISMATCH_ERROR_MSG, RegisterForm, RegisterState, WEAK_PASSWORD_ERROR_MSG,
        register_user,
    };

    const TEST_FULL_NAME: &str = "Іван Петров Сидорович";
    const TEST_PASSWORD: &str = "Abc12345!";

    fn get_test_state() -> RegisterState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        create_user_table(&connection).expect("Could not create user table");

        let hash = Sha512::digest(b"foobar");

        RegisterState {
            cookie_key: Key::from(&hash),
            cookie_duration: Duration::minutes(30),
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn matching_passwords_form(full_name: &str, password: &str) -> RegisterForm {
        RegisterForm {
            full_name: full_name.to_owned(),
            password: password.to_owned(),
            confirm_password: password.to_owned(),
        }
    }

    async fn new_register_request(state: RegisterState, form: RegisterForm) -> Response<Body> {
        let jar = PrivateCookieJar::new(state.cookie_key.clone());

        register_user(State(state), jar, Form(form)).await
    }

    #[tokio::test]
    async fn register_succeeds_and_logs_the_user_in() {
        let state = get_test_state();
        let db_connection = state.db_connection.clone();

        let response =
            new_register_request(state, matching_passwords_form(TEST_FULL_NAME, TEST_PASSWORD))
                .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(HX_REDIRECT).unwrap(),
            endpoints::DASHBOARD_VIEW
        );
        assert!(
            response
                .headers()
                .contains_key(axum::http::header::SET_COOKIE),
            "expected a set-cookie header for the auth token"
        );

        let connection = db_connection.lock().unwrap();
        let user = get_user_by_full_name(TEST_FULL_NAME, &connection).unwrap();
        assert!(user.password_hash.verify(TEST_PASSWORD));
    }

    #[tokio::test]
    async fn register_fails_with_invalid_full_name() {
        let state = get_test_state();

        let response =
            new_register_request(state, matching_passwords_form("ivan petrov", TEST_PASSWORD))
                .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_body_contains_message(response, INVALID_FULL_NAME_ERROR_MSG).await;
    }

    #[tokio::test]
    async fn register_fails_with_too_long_full_name() {
        let state = get_test_state();
        // Three capitalized words, but 125 characters in total.
        let long_name = format!("П{0} І{0} С{0}", "о".repeat(40));

        let response =
            new_register_request(state, matching_passwords_form(&long_name, TEST_PASSWORD)).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_body_contains_message(response, FULL_NAME_TOO_LONG_ERROR_MSG).await;
    }

    #[tokio::test]
    async fn register_fails_with_weak_password() {
        let state = get_test_state();

        let response =
            new_register_request(state, matching_passwords_form(TEST_FULL_NAME, "password"))
                .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_body_contains_message(response, WEAK_PASSWORD_ERROR_MSG).await;
    }

    #[tokio::test]
    async fn register_fails_with_mismatched_passwords() {
        let state = get_test_state();
        let form = RegisterForm {
            full_name: TEST_FULL_NAME.to_owned(),
            password: TEST_PASSWORD.to_owned(),
            confirm_password: "Different1!".to_owned(),
        };

        let response = new_register_request(state, form).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_body_contains_message(response, PASSWORD_MISMATCH_ERROR_MSG).await;
    }

    #[tokio::test]
    async fn register_fails_with_duplicate_full_name() {
        let state = get_test_state();

        let first_response = new_register_request(
            state.clone(),
            matching_passwords_form(TEST_FULL_NAME, TEST_PASSWORD),
        )
        .await;
        assert_eq!(first_response.status(), StatusCode::SEE_OTHER);

        let response =
            new_register_request(state, matching_passwords_form(TEST_FULL_NAME, TEST_PASSWORD))
                .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_body_contains_message(response, DUPLICATE_FULL_NAME_ERROR_MSG).await;
    }

    async fn assert_body_contains_message(response: Response<Body>, message: &str) {
        let body = response.into_body();
        let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        let text = String::from_utf8_lossy(&body).to_string();

        assert!(
            text.contains(message),
            "response body should contain the text '{}' but got {}",
            message,
            text
        );
    }
}
