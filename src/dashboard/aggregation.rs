//! Summaries of a user's transactions for the dashboard.
//!
//! Everything here is a pure function of the transaction list. Callers pass
//! the user's full collection, usually newest first as the store returns it.

use std::collections::HashMap;

use time::Month;

use crate::transaction::{Transaction, TransactionType};

/// The number of months shown in the dashboard trends chart.
pub const MONTHLY_WINDOW: usize = 6;

/// Income, expenses and their difference.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Totals {
    pub income: f64,
    pub expenses: f64,
    /// Income minus expenses, may be negative.
    pub balance: f64,
}

impl Totals {
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let income = compute_totals(transactions, TransactionType::Income);
        let expenses = compute_totals(transactions, TransactionType::Expense);

        Self {
            income,
            expenses,
            balance: income - expenses,
        }
    }
}

/// Sum the amounts of the transactions of type `type_`.
///
/// Returns zero when nothing matches.
pub fn compute_totals(transactions: &[Transaction], type_: TransactionType) -> f64 {
    transactions
        .iter()
        .filter(|transaction| transaction.type_ == type_)
        .fold(0.0, |total, transaction| total + transaction.amount)
}

/// A category's share of the total for one transaction type.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShare {
    /// The transaction description.
    pub category: String,
    /// Rounded to one decimal place.
    pub percentage: f64,
}

/// Group the transactions of type `type_` by description and give each
/// group's share of the type's total.
///
/// Categories appear in the order they first occur in `transactions`. If the
/// total is zero every category gets 0%.
pub fn compute_category_breakdown(
    transactions: &[Transaction],
    type_: TransactionType,
) -> Vec<CategoryShare> {
    let mut sums: Vec<(&str, f64)> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut total = 0.0;

    for transaction in transactions.iter().filter(|t| t.type_ == type_) {
        let category = transaction.description.as_str();
        total += transaction.amount;

        match positions.get(category) {
            Some(&position) => sums[position].1 += transaction.amount,
            None => {
                positions.insert(category, sums.len());
                sums.push((category, transaction.amount));
            }
        }
    }

    sums.into_iter()
        .map(|(category, sum)| CategoryShare {
            category: category.to_owned(),
            percentage: percentage_of(sum, total),
        })
        .collect()
}

fn percentage_of(value: f64, total: f64) -> f64 {
    if total == 0.0 {
        return 0.0;
    }

    let percentage = (value / total * 100.0 * 10.0).round() / 10.0;

    if percentage.is_finite() {
        percentage
    } else {
        0.0
    }
}

/// Income and expenses for one month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySummary {
    /// Three letter month name, e.g. "Jan". The year is not part of the key.
    pub month: &'static str,
    pub income: f64,
    pub expenses: f64,
    /// Income minus expenses within this month only.
    pub balance: f64,
}

impl MonthlySummary {
    fn empty(month: &'static str) -> Self {
        Self {
            month,
            income: 0.0,
            expenses: 0.0,
            balance: 0.0,
        }
    }
}

/// Bucket the transactions by month and keep the last `window_size` buckets.
///
/// Buckets are ordered by the first time their month appears in
/// `transactions`, not by date. The same month in different years shares a
/// bucket. Timestamps are bucketed in whatever offset they carry, so convert
/// them to local time first.
pub fn compute_monthly_series(
    transactions: &[Transaction],
    window_size: usize,
) -> Vec<MonthlySummary> {
    let mut buckets: Vec<MonthlySummary> = Vec::new();

    for transaction in transactions {
        let month = month_abbreviation(transaction.timestamp.month());
        let position = match buckets.iter().position(|bucket| bucket.month == month) {
            Some(position) => position,
            None => {
                buckets.push(MonthlySummary::empty(month));
                buckets.len() - 1
            }
        };
        let bucket = &mut buckets[position];

        match transaction.type_ {
            TransactionType::Income => {
                bucket.income += transaction.amount;
                bucket.balance += transaction.amount;
            }
            TransactionType::Expense => {
                bucket.expenses += transaction.amount;
                bucket.balance -= transaction.amount;
            }
        }
    }

    let skip = buckets.len().saturating_sub(window_size);
    buckets.into_iter().skip(skip).collect()
}

pub(super) fn month_abbreviation(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}
