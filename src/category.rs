//! The fixed category sets for finance records.
//!
//! Categories are static configuration: each record type has its own closed
//! list, and a record's category must be a member of the list matching its
//! type.

use crate::record::RecordType;

/// The categories an income record may use.
pub const INCOME_CATEGORIES: [&str; 5] =
    ["Salary", "Scholarship", "Gift", "Investment", "Other"];

/// The categories an expense record may use.
pub const EXPENSE_CATEGORIES: [&str; 7] = [
    "Food",
    "Transport",
    "Housing",
    "Health",
    "Entertainment",
    "Clothing",
    "Other",
];

/// The category list for `record_type`.
pub fn categories_for(record_type: RecordType) -> &'static [&'static str] {
    match record_type {
        RecordType::Income => &INCOME_CATEGORIES,
        RecordType::Expense => &EXPENSE_CATEGORIES,
    }
}

/// Check that `category` belongs to the category set for `record_type`.
///
/// The comparison is an exact, case-sensitive string match.
pub fn is_known_category(record_type: RecordType, category: &str) -> bool {
    categories_for(record_type).contains(&category)
}
