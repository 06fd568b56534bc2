//! The route handler and view rendering for the dashboard page.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::Date;

use crate::{
    AppState, Error,
    dashboard::{
        aggregation::{DashboardSummary, summarize},
        charts::{DashboardChart, amount_chart, charts_script, rating_chart},
        table::record_table,
    },
    endpoints,
    html::{HeadElement, base, link},
    navigation::NavBar,
    record::{FinanceRecord, get_records_by_user},
    user::UserID,
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading the user's records.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Display a page with an overview of the logged in user's records.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let records = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_records_by_user(user_id, &connection)
            .inspect_err(|error| tracing::error!("could not get records: {error}"))?
    };

    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW);

    if records.is_empty() {
        return Ok(dashboard_no_data_view(nav_bar).into_response());
    }

    let summary = summarize(&records);
    let charts = build_dashboard_charts(&summary);

    Ok(dashboard_view(nav_bar, &charts, summary.min_date, &records).into_response())
}

/// Creates the array of dashboard charts from the aggregated summary.
fn build_dashboard_charts(summary: &DashboardSummary) -> [DashboardChart; 4] {
    [
        DashboardChart {
            id: "income-rating-chart",
            options: rating_chart("Income", &summary.income).to_string(),
        },
        DashboardChart {
            id: "income-amount-chart",
            options: amount_chart("Income", &summary.income).to_string(),
        },
        DashboardChart {
            id: "expense-rating-chart",
            options: rating_chart("Expenses", &summary.expense).to_string(),
        },
        DashboardChart {
            id: "expense-amount-chart",
            options: amount_chart("Expenses", &summary.expense).to_string(),
        },
    ]
}

/// Renders the dashboard page when the user has no records yet.
fn dashboard_no_data_view(nav_bar: NavBar) -> Markup {
    let nav_bar = nav_bar.into_html();
    let new_income_link = link(endpoints::NEW_INCOME_VIEW, "income");
    let new_expense_link = link(endpoints::NEW_EXPENSE_VIEW, "expense");

    let content = html!(
        (nav_bar)

        div class="flex flex-col items-center px-6 py-8 mx-auto text-gray-900 dark:text-white"
        {
            h2 class="text-xl font-bold"
            {
                "Nothing here yet..."
            }

            p
            {
                "Charts will show up here once you add some records.
                Start by adding an " (new_income_link) " or an "
                (new_expense_link) " record."
            }
        }
    );

    base("Dashboard", &[], &content)
}

/// Renders the main dashboard page with charts and the record table.
fn dashboard_view(
    nav_bar: NavBar,
    charts: &[DashboardChart],
    min_date: Option<Date>,
    records: &[FinanceRecord],
) -> Markup {
    let nav_bar = nav_bar.into_html();

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            @if let Some(min_date) = min_date {
                p class="w-full mb-4 text-sm text-gray-600 dark:text-gray-400"
                {
                    "Tracking since " (min_date)
                }
            }

            section
                id="charts"
                class="w-full mx-auto mb-4"
            {
                div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
                {
                    @for chart in charts {
                        div
                            id=(chart.id)
                            class="min-h-[380px] rounded dark:bg-gray-100"
                        {}
                    }
                }
            }

            (record_table(records))
        }
    );

    let scripts = [
        HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
        charts_script(charts),
    ];

    base("Dashboard", &scripts, &content)
}
