//! Income and expense records: models, validation, database queries and the
//! HTTP routes for adding and deleting records.

pub mod core;
pub mod create_endpoint;
pub mod create_page;
pub mod delete_endpoint;

pub use core::{
    FinanceRecord, NewRecord, RecordType, create_record, create_record_table, get_records_by_user,
};
pub use create_endpoint::create_record_endpoint;
pub use create_page::{get_new_expense_page, get_new_income_page};
pub use delete_endpoint::delete_record_endpoint;
