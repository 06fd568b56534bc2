//! Per-category aggregation of finance records for the dashboard.
//!
//! Records are partitioned by type (income, expense) and grouped by category,
//! producing parallel label/average vectors in a presentation-ready shape for
//! the dashboard charts.

use std::collections::HashMap;

use time::Date;

use crate::record::{FinanceRecord, RecordType};

/// Average rating and amount per category for one record type, as parallel
/// vectors ready for charting.
///
/// `labels` holds the categories in the order they first appear with a
/// *rated* record. Only categories with at least one rated record get a
/// label: the label set is driven by the rating averages, and the amount
/// averages are looked up per label with a default of zero. A category whose
/// records all lack a rating does not chart at all, even though its amount
/// average exists, and unrated records do not influence the label order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CategoryAverages {
    /// Category labels in first-seen order.
    pub labels: Vec<String>,
    /// The average rating per label, rounded to 2 decimal places.
    pub avg_ratings: Vec<f64>,
    /// The average amount per label, rounded to 2 decimal places.
    pub avg_amounts: Vec<f64>,
}

/// The aggregated dashboard data for one user.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardSummary {
    /// Per-category averages over the user's income records.
    pub income: CategoryAverages,
    /// Per-category averages over the user's expense records.
    pub expense: CategoryAverages,
    /// The earliest record date, or `None` if the user has no records.
    pub min_date: Option<Date>,
}

/// Accumulates a running sum and count for averaging.
#[derive(Default)]
struct Averager {
    sum: f64,
    count: u32,
}

impl Averager {
    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn average(&self) -> f64 {
        round2(self.sum / self.count as f64)
    }
}

/// One type's bucket of per-category accumulators, keeping first-seen order.
#[derive(Default)]
struct CategoryBucket {
    order: Vec<String>,
    ratings: HashMap<String, Averager>,
    amounts: HashMap<String, Averager>,
}

impl CategoryBucket {
    fn push(&mut self, record: &FinanceRecord) {
        if let Some(rating) = record.rating {
            if !self.order.contains(&record.category) {
                self.order.push(record.category.clone());
            }

            self.ratings
                .entry(record.category.clone())
                .or_default()
                .push(rating as f64);
        }

        self.amounts
            .entry(record.category.clone())
            .or_default()
            .push(record.amount);
    }

    fn into_averages(self) -> CategoryAverages {
        let mut averages = CategoryAverages::default();

        for category in self.order {
            // Every ordered category was pushed alongside a rating entry.
            averages.avg_ratings.push(self.ratings[&category].average());
            averages.avg_amounts.push(
                self.amounts
                    .get(&category)
                    .map(Averager::average)
                    .unwrap_or(0.0),
            );
            averages.labels.push(category);
        }

        averages
    }
}

/// Aggregate `records` into the per-category averages and the earliest record
/// date shown on the dashboard.
///
/// The output ordering follows the order rated records appear in `records`,
/// so callers should pass records in a stable read order such as insertion
/// order.
pub fn summarize(records: &[FinanceRecord]) -> DashboardSummary {
    let mut income = CategoryBucket::default();
    let mut expense = CategoryBucket::default();

    for record in records {
        match record.record_type {
            RecordType::Income => income.push(record),
            RecordType::Expense => expense.push(record),
        }
    }

    DashboardSummary {
        income: income.into_averages(),
        expense: expense.into_averages(),
        min_date: records.iter().map(|record| record.date).min(),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod summarize_tests {
    use time::macros::date;

    use crate::{
        record::{FinanceRecord, RecordType},
        user::UserID,
    };

    use super::summarize;

    fn record(
        record_type: RecordType,
        category: &str,
        rating: Option<i64>,
        amount: f64,
    ) -> FinanceRecord {
        FinanceRecord {
            id: 0,
            user_id: UserID::new(1),
            date: date!(2026 - 08 - 01),
            category: category.to_owned(),
            name: None,
            amount,
            rating,
            record_type,
            is_monthly: false,
        }
    }

    #[test]
    fn averages_rating_and_amount_per_category() {
        let records = [
            record(RecordType::Income, "Salary", Some(4), 100.0),
            record(RecordType::Income, "Salary", Some(2), 50.0),
        ];

        let summary = summarize(&records);

        assert_eq!(summary.income.labels, ["Salary"]);
        assert_eq!(summary.income.avg_ratings, [3.0]);
        assert_eq!(summary.income.avg_amounts, [75.0]);
    }

    #[test]
    fn rounds_averages_to_two_decimal_places() {
        let records = [
            record(RecordType::Expense, "Food", Some(1), 10.0),
            record(RecordType::Expense, "Food", Some(2), 10.0),
            record(RecordType::Expense, "Food", Some(2), 11.0),
        ];

        let summary = summarize(&records);

        assert_eq!(summary.expense.avg_ratings, [1.67]);
        assert_eq!(summary.expense.avg_amounts, [10.33]);
    }

    #[test]
    fn partitions_by_record_type() {
        let records = [
            record(RecordType::Income, "Salary", Some(5), 1000.0),
            record(RecordType::Expense, "Food", Some(3), 50.0),
        ];

        let summary = summarize(&records);

        assert_eq!(summary.income.labels, ["Salary"]);
        assert_eq!(summary.expense.labels, ["Food"]);
    }

    #[test]
    fn labels_keep_first_seen_order() {
        let records = [
            record(RecordType::Expense, "Transport", Some(3), 5.0),
            record(RecordType::Expense, "Food", Some(4), 20.0),
            record(RecordType::Expense, "Transport", Some(5), 7.0),
        ];

        let summary = summarize(&records);

        assert_eq!(summary.expense.labels, ["Transport", "Food"]);
    }

    #[test]
    fn unrated_records_do_not_affect_the_rating_average() {
        let records = [
            record(RecordType::Income, "Salary", Some(4), 100.0),
            record(RecordType::Income, "Salary", None, 200.0),
        ];

        let summary = summarize(&records);

        assert_eq!(summary.income.avg_ratings, [4.0]);
        // The amount average still counts every record.
        assert_eq!(summary.income.avg_amounts, [150.0]);
    }

    #[test]
    fn labels_follow_first_rated_record_order() {
        let records = [
            record(RecordType::Expense, "Food", None, 12.0),
            record(RecordType::Expense, "Transport", Some(5), 5.0),
            record(RecordType::Expense, "Food", Some(3), 20.0),
        ];

        let summary = summarize(&records);

        // "Food" appears first but is not rated until after "Transport".
        assert_eq!(summary.expense.labels, ["Transport", "Food"]);
        assert_eq!(summary.expense.avg_ratings, [5.0, 3.0]);
        assert_eq!(summary.expense.avg_amounts, [5.0, 16.0]);
    }

    #[test]
    fn category_with_no_rated_records_is_absent() {
        let records = [
            record(RecordType::Income, "Gift", None, 30.0),
            record(RecordType::Income, "Salary", Some(5), 100.0),
        ];

        let summary = summarize(&records);

        assert_eq!(summary.income.labels, ["Salary"]);
        assert_eq!(summary.income.avg_amounts, [100.0]);
    }

    #[test]
    fn min_date_spans_both_record_types() {
        let mut records = [
            record(RecordType::Income, "Salary", Some(5), 100.0),
            record(RecordType::Expense, "Food", Some(3), 20.0),
        ];
        records[1].date = date!(2024 - 01 - 15);

        let summary = summarize(&records);

        assert_eq!(summary.min_date, Some(date!(2024 - 01 - 15)));
    }

    #[test]
    fn empty_input_produces_empty_summary() {
        let summary = summarize(&[]);

        assert!(summary.income.labels.is_empty());
        assert!(summary.expense.labels.is_empty());
        assert_eq!(summary.min_date, None);
    }
}
