//! Defines the route handlers for the pages for adding income and expense
//! records.

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use time::{Date, OffsetDateTime};

use crate::{
    AppState, Error, endpoints,
    category::categories_for,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base, loading_spinner,
    },
    navigation::NavBar,
    record::RecordType,
    timezone::get_local_offset,
};

fn create_record_view(record_type: RecordType, today: Date) -> Markup {
    let (title, view_endpoint) = match record_type {
        RecordType::Income => ("Add Income", endpoints::NEW_INCOME_VIEW),
        RecordType::Expense => ("Add Expense", endpoints::NEW_EXPENSE_VIEW),
    };
    let nav_bar = NavBar::new(view_endpoint).into_html();
    let spinner = loading_spinner();

    let content = html! {
        (nav_bar)

        div class="flex flex-col items-center justify-center px-6 py-8 mx-auto"
        {
            form
                hx-post=(endpoints::RECORDS_API)
                hx-target-error="#alert-container"
                class="w-full sm:max-w-md space-y-4 md:space-y-6 text-gray-900 dark:text-white"
            {
                h2 class="text-xl font-bold" { (title) }

                input type="hidden" name="record_type" value=(record_type);

                div
                {
                    label for="date" class=(FORM_LABEL_STYLE) { "Date" }

                    input
                        name="date"
                        id="date"
                        type="date"
                        required
                        value=(today)
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="category" class=(FORM_LABEL_STYLE) { "Category" }

                    select
                        name="category"
                        id="category"
                        required
                        class=(FORM_TEXT_INPUT_STYLE)
                    {
                        @for category in categories_for(record_type) {
                            option value=(category) { (category) }
                        }
                    }
                }

                div
                {
                    label for="name" class=(FORM_LABEL_STYLE) { "Name (optional)" }

                    input
                        name="name"
                        id="name"
                        type="text"
                        maxlength="100"
                        placeholder="e.g. August rent"
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

                    input
                        name="amount"
                        id="amount"
                        type="number"
                        step="0.01"
                        placeholder="0.00"
                        required
                        autofocus
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="rating" class=(FORM_LABEL_STYLE) { "Rating" }

                    select
                        name="rating"
                        id="rating"
                        required
                        class=(FORM_TEXT_INPUT_STYLE)
                    {
                        @for rating in 1..=5 {
                            option value=(rating) selected[rating == 3] { (rating) }
                        }
                    }
                }

                div class="flex items-center gap-2"
                {
                    input
                        name="is_monthly"
                        id="is-monthly"
                        type="checkbox"
                        class="w-4 h-4 rounded";

                    label for="is-monthly" class="text-sm font-medium" { "Repeats monthly" }
                }

                button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    span
                        id="indicator"
                        class="inline htmx-indicator"
                    {
                        (spinner)
                    }
                    " " (title)
                }
            }
        }
    };

    base(title, &[], &content)
}

/// The state needed for the add income and add expense pages.
#[derive(Debug, Clone)]
pub struct CreateRecordPageState {
    /// The local timezone as a canonical timezone name, e.g. "Europe/Kyiv".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateRecordPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
        }
    }
}

fn get_create_record_page(
    record_type: RecordType,
    state: CreateRecordPageState,
) -> Result<Response, Error> {
    let local_timezone = get_local_offset(&state.local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        Error::InvalidTimezoneError(state.local_timezone)
    })?;

    let today = OffsetDateTime::now_utc().to_offset(local_timezone).date();

    Ok(create_record_view(record_type, today).into_response())
}

/// Renders the page for adding an income record.
pub async fn get_new_income_page(
    State(state): State<CreateRecordPageState>,
) -> Result<Response, Error> {
    get_create_record_page(RecordType::Income, state)
}

/// Renders the page for adding an expense record.
pub async fn get_new_expense_page(
    State(state): State<CreateRecordPageState>,
) -> Result<Response, Error> {
    get_create_record_page(RecordType::Expense, state)
}
