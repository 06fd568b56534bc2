//! The dashboard page: per-category aggregation, charts and the record table.

pub mod aggregation;
mod charts;
pub mod handlers;
mod table;

pub use aggregation::{CategoryAverages, DashboardSummary, summarize};
pub use handlers::{DashboardState, get_dashboard_page};
