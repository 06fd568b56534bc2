//! Alert partials for displaying error and success messages to users.
//!
//! Alerts are swapped out-of-band by htmx into the `#alert-container`
//! element that [crate::html::base] adds to every page.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

/// Alert message types for styling.
#[derive(Debug, Clone, Copy, PartialEq)]
enum AlertType {
    Success,
    Error,
}

/// An alert message with a title and details.
#[derive(Debug, Clone)]
pub struct Alert<'a> {
    alert_type: AlertType,
    message: &'a str,
    details: &'a str,
}

impl<'a> Alert<'a> {
    /// Create a new success alert.
    pub fn success(message: &'a str, details: &'a str) -> Self {
        Self {
            alert_type: AlertType::Success,
            message,
            details,
        }
    }

    /// Create a new error alert.
    pub fn error(message: &'a str, details: &'a str) -> Self {
        Self {
            alert_type: AlertType::Error,
            message,
            details,
        }
    }

    /// Render the alert.
    pub fn into_html(self) -> Markup {
        let color_style = match self.alert_type {
            AlertType::Success => {
                "text-green-800 bg-green-50 dark:bg-gray-800 dark:text-green-400"
            }
            AlertType::Error => "text-red-800 bg-red-50 dark:bg-gray-800 dark:text-red-400",
        };

        html! {
            div
                id="alert-container"
                hx-swap-oob="true"
                class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                div class={ "flex items-center p-4 mb-4 rounded-lg " (color_style) } role="alert"
                {
                    div class="ms-3 text-sm font-medium"
                    {
                        p class="font-semibold" { (self.message) }

                        @if !self.details.is_empty()
                        {
                            p { (self.details) }
                        }
                    }

                    button
                        type="button"
                        class="ms-auto -mx-1.5 -my-1.5 rounded-lg p-1.5 inline-flex items-center justify-center h-8 w-8"
                        onclick="this.closest('#alert-container').classList.add('hidden')"
                        aria-label="Close"
                    {
                        "✕"
                    }
                }
            }
        }
    }

    /// Render the alert as an HTTP response with `status_code`.
    pub fn into_response(self, status_code: StatusCode) -> Response {
        (status_code, self.into_html()).into_response()
    }
}
