//! The record table shown below the dashboard charts.

use maud::{Markup, html};

use crate::{
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_amount,
    },
    record::{FinanceRecord, RecordType},
};

/// Renders the table listing every record with a delete button per row.
pub(super) fn record_table(records: &[FinanceRecord]) -> Markup {
    let table_row = |record: &FinanceRecord| {
        let type_label = match record.record_type {
            RecordType::Income => "Income",
            RecordType::Expense => "Expense",
        };
        let rating = record
            .rating
            .map(|rating| rating.to_string())
            .unwrap_or_default();
        let delete_url = format_endpoint(endpoints::DELETE_RECORD, record.id);

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE) { (record.date) }
                td class=(TABLE_CELL_STYLE) { (type_label) }
                td class=(TABLE_CELL_STYLE) { (record.category) }
                td class=(TABLE_CELL_STYLE) { (record.name.as_deref().unwrap_or("")) }
                td class=(TABLE_CELL_STYLE) { (format_amount(record.amount)) }
                td class=(TABLE_CELL_STYLE) { (rating) }
                td class=(TABLE_CELL_STYLE) { @if record.is_monthly { "Monthly" } }
                td class=(TABLE_CELL_STYLE)
                {
                    button
                        hx-delete=(delete_url)
                        hx-confirm="Are you sure you want to delete this record?"
                        hx-target="closest tr"
                        hx-target-error="#alert-container"
                        hx-swap="delete"
                        class=(BUTTON_DELETE_STYLE)
                    {
                        "Delete"
                    }
                }
            }
        )
    };

    html!(
        section id="records" class="w-full mx-auto mb-8"
        {
            h3 class="text-xl font-semibold mb-4" { "Records" }

            div class="dark:bg-gray-800 overflow-x-auto"
            {
                table class="w-full text-sm text-left rtl:text-right
                    text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Rating" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Monthly" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                        }
                    }

                    tbody
                    {
                        @for record in records {
                            (table_row(record))
                        }
                    }
                }
            }
        }
    )
}

#[cfg(test)]
mod record_table_tests {
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        record::{FinanceRecord, RecordType},
        user::UserID,
    };

    use super::record_table;

    fn get_test_record(id: i64) -> FinanceRecord {
        FinanceRecord {
            id,
            user_id: UserID::new(1),
            date: date!(2026 - 08 - 01),
            category: "Food".to_owned(),
            name: Some("Groceries".to_owned()),
            amount: 1234.5,
            rating: Some(4),
            record_type: RecordType::Expense,
            is_monthly: false,
        }
    }

    #[test]
    fn renders_one_row_per_record() {
        let records = [get_test_record(1), get_test_record(2)];

        let markup = record_table(&records).into_string();
        let html = Html::parse_fragment(&markup);
        let row_selector = Selector::parse("tbody tr").unwrap();

        assert_eq!(html.select(&row_selector).count(), 2);
    }

    #[test]
    fn delete_button_targets_record_endpoint() {
        let records = [get_test_record(42)];

        let markup = record_table(&records).into_string();
        let html = Html::parse_fragment(&markup);
        let button_selector = Selector::parse("button[hx-delete]").unwrap();
        let button = html.select(&button_selector).next().unwrap();

        assert_eq!(button.value().attr("hx-delete"), Some("/api/records/42"));
        assert_eq!(button.value().attr("hx-target"), Some("closest tr"));
    }

    #[test]
    fn formats_amount_with_thousands_separator() {
        let records = [get_test_record(1)];

        let markup = record_table(&records).into_string();

        assert!(markup.contains("1,234.50"));
    }
}
