//! This file defines the routes for displaying the log-in page and handling
//! log-in requests. The auth module handles the lower level cookie logic.

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

use crate::{
    AppState, Error,
    auth::{invalidate_auth_cookie, set_auth_cookie},
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, base, full_name_input, link, log_in_register, password_input},
    user::{User, get_user_by_full_name},
};

/// The error shown when no user is registered under the submitted full name.
pub const USER_NOT_FOUND_ERROR_MSG: &str = "No user found with this name.";

/// The error shown when the password does not match the stored hash.
pub const INVALID_PASSWORD_ERROR_MSG: &str = "Incorrect password.";

/// The raw data entered by the user in the log-in form.
///
/// The full name and password are stored as plain strings. There is no need
/// for validation here since they will be compared against the data in the
/// database, which has been verified.
#[derive(Clone, Deserialize)]
pub struct LogInData {
    /// Full name entered during log-in.
    pub full_name: String,
    /// Password entered during log-in.
    pub password: String,
}

fn log_in_form(
    full_name_value: &str,
    full_name_error: Option<&str>,
    password_error: Option<&str>,
) -> Markup {
    let register_link = link(endpoints::REGISTER_VIEW, "Register here");

    html! {
        form
            hx-post=(endpoints::LOG_IN_API)
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="space-y-4 md:space-y-6"
        {
            (full_name_input(full_name_value, full_name_error))
            (password_input("", 0, password_error))

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Log in" }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Don't have an account yet? " (register_link)
            }
        }
    }
}

/// Display the log-in page.
pub async fn get_log_in_page() -> Response {
    let form = log_in_form("", None, None);
    let content = log_in_register("Log in to your account", &form);

    base("Log In", &[], &content).into_response()
}

/// The state needed to perform a log in.
#[derive(Debug, Clone)]
pub struct LogInState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The database connection for looking up users.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LogInState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LogInState> for Key {
    fn from_ref(state: &LogInState) -> Self {
        state.cookie_key.clone()
    }
}

/// Handler for log-in requests via the POST method.
///
/// On a successful log-in request, the auth cookie is set and the client is
/// redirected to the dashboard page. Otherwise, the form is returned with an
/// error message explaining the problem.
///
/// The response distinguishes an unknown full name from a wrong password,
/// matching how registration reports duplicate names.
pub async fn post_log_in(
    State(state): State<LogInState>,
    jar: PrivateCookieJar,
    Form(user_data): Form<LogInData>,
) -> Response {
    let user: User = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(error) => {
                tracing::error!("could not acquire database lock: {error}");
                return Error::DatabaseLockError.into_alert_response();
            }
        };

        match get_user_by_full_name(&user_data.full_name, &connection) {
            Ok(user) => user,
            Err(Error::UserNotFound) => {
                return log_in_error_response(
                    &user_data.full_name,
                    Some(USER_NOT_FOUND_ERROR_MSG),
                    None,
                );
            }
            Err(error) => {
                tracing::error!("Unhandled error while verifying credentials: {error}");
                return error.into_alert_response();
            }
        }
    };

    if !user.password_hash.verify(&user_data.password) {
        return log_in_error_response(
            &user_data.full_name,
            None,
            Some(INVALID_PASSWORD_ERROR_MSG),
        );
    }

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

fn log_in_error_response(
    full_name_value: &str,
    full_name_error: Option<&str>,
    password_error: Option<&str>,
) -> Response {
    (
        StatusCode::OK,
        log_in_form(full_name_value, full_name_error, password_error),
    )
        .into_response()
}

#[cfg(test)]
mod log_in_page_tests {
    use axum::http::StatusCode;
    use scraper::Selector;

    use crate::{
        endpoints,
        test_utils::html::{assert_valid_html, parse_html_document},
    };

    use super::get_log_in_page;

    #[tokio::test]
    async fn log_in_page_displays_form() {
        let response = get_log_in_page().await;

        assert_eq!(response.status(), StatusCode::OK);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);

        let form_selector = Selector::parse("form").unwrap();
        let forms = document.select(&form_selector).collect::<Vec<_>>();
        assert_eq!(forms.len(), 1, "want 1 form, got {}", forms.len());

        let form = forms.first().unwrap();
        assert_eq!(form.value().attr("hx-post"), Some(endpoints::LOG_IN_API));

        for selector_string in ["input[type=text]", "input[type=password]", "button[type=submit]"]
        {
            let selector = Selector::parse(selector_string).unwrap();
            assert_eq!(
                form.select(&selector).count(),
                1,
                "want 1 {selector_string} in form"
            );
        }

        let link_selector = Selector::parse("a[href]").unwrap();
        let links: Vec<_> = form.select(&link_selector).collect();
        assert_eq!(links.len(), 1, "want 1 link, got {}", links.len());
        assert_eq!(
            links[0].value().attr("href"),
            Some(endpoints::REGISTER_VIEW)
        );
    }
}
