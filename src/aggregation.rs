//! Pure derivations over a transaction collection.
//!
//! Provides the totals, expense breakdown by category, monthly
//! income/expense series and savings-rate statistics shown on the
//! dashboard. None of these functions mutate their input or touch the
//! store; they work on whatever snapshot the caller hands them.

use std::collections::BTreeMap;

use serde::Serialize;
use time::{Date, Month};

use crate::{Category, transaction::Transaction};

/// Income, expense and balance across a collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Totals {
    /// Sum of amounts across `Income` transactions.
    pub income: f64,
    /// Sum of amounts across every other transaction.
    pub expense: f64,
    /// `income - expense`.
    pub balance: f64,
}

/// Sum a collection into income, expense and balance.
pub fn totals(transactions: &[Transaction]) -> Totals {
    let mut totals = Totals::default();

    for transaction in transactions {
        if transaction.category.is_income() {
            totals.income += transaction.amount;
        } else {
            totals.expense += transaction.amount;
        }
    }

    totals.balance = totals.income - totals.expense;
    totals
}

/// The expense total for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    /// The expense category.
    pub category: Category,
    /// Sum of amounts across the category's transactions.
    pub total: f64,
}

/// Sum expenses per category, largest total first.
///
/// `Income` entries never appear. Entries dated before `since` are skipped
/// when a cutoff is given. Equal totals keep the order their categories were
/// first encountered in; no qualifying expenses yields an empty vector.
pub fn category_breakdown(transactions: &[Transaction], since: Option<Date>) -> Vec<CategoryTotal> {
    let mut breakdown: Vec<CategoryTotal> = Vec::new();

    for transaction in transactions {
        if transaction.category.is_income() {
            continue;
        }
        if since.is_some_and(|cutoff| transaction.date < cutoff) {
            continue;
        }

        match breakdown
            .iter_mut()
            .find(|entry| entry.category == transaction.category)
        {
            Some(entry) => entry.total += transaction.amount,
            None => breakdown.push(CategoryTotal {
                category: transaction.category,
                total: transaction.amount,
            }),
        }
    }

    // Stable sort, so ties stay in first-encountered order.
    breakdown.sort_by(|a, b| b.total.total_cmp(&a.total));
    breakdown
}

/// One calendar month of aggregated income and expense.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthBucket {
    /// The first day of the bucket's month.
    pub month: Date,
    /// Human-readable period label, e.g. `"Jan 24"`.
    pub label: String,
    /// Income total for the month.
    pub income: f64,
    /// Expense total for the month.
    pub expense: f64,
    /// `income - expense`.
    pub net: f64,
}

/// Bucket a collection by calendar month, oldest first.
///
/// Truncation is UTC-naive: the bucket is the year-month written on the
/// transaction. Months with no transactions do not appear, and at most the
/// last `months_back` buckets present in the data are returned.
pub fn monthly_series(transactions: &[Transaction], months_back: usize) -> Vec<MonthBucket> {
    let mut buckets: BTreeMap<Date, (f64, f64)> = BTreeMap::new();

    for transaction in transactions {
        let month = transaction.date.replace_day(1).unwrap();
        let (income, expense) = buckets.entry(month).or_default();
        if transaction.category.is_income() {
            *income += transaction.amount;
        } else {
            *expense += transaction.amount;
        }
    }

    let mut series: Vec<MonthBucket> = buckets
        .into_iter()
        .map(|(month, (income, expense))| MonthBucket {
            month,
            label: month_label(month),
            income,
            expense,
            net: income - expense,
        })
        .collect();

    let excess = series.len().saturating_sub(months_back);
    series.drain(..excess);
    series
}

/// The percentage of income retained after expenses, rounded to the nearest
/// whole percent.
///
/// Zero when there is no income. Negative when expenses exceed income; the
/// signed value is canonical and clamping for display belongs to the
/// presentation layer.
pub fn savings_rate(income: f64, expense: f64) -> i32 {
    if income > 0.0 {
        (100.0 * (income - expense) / income).round() as i32
    } else {
        0
    }
}

/// Totals across the last `months_back` months of data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct WindowTotals {
    /// Income summed over the window's buckets.
    pub income: f64,
    /// Expense summed over the window's buckets.
    pub expense: f64,
    /// `income - expense`.
    pub net: f64,
    /// The arithmetic mean of the per-month savings rates, not the savings
    /// rate of the summed totals.
    pub avg_savings_rate: f64,
}

/// Combine the last `months_back` months of [monthly_series] into scalars.
///
/// `avg_savings_rate` averages the per-bucket rates rather than rating the
/// summed totals, matching how the dashboard has always reported it. An
/// empty window yields all zeroes.
pub fn totals_over_window(transactions: &[Transaction], months_back: usize) -> WindowTotals {
    let series = monthly_series(transactions, months_back);
    if series.is_empty() {
        return WindowTotals::default();
    }

    let mut window = WindowTotals::default();
    let mut rate_sum = 0.0;
    for bucket in &series {
        window.income += bucket.income;
        window.expense += bucket.expense;
        rate_sum += f64::from(savings_rate(bucket.income, bucket.expense));
    }

    window.net = window.income - window.expense;
    window.avg_savings_rate = rate_sum / series.len() as f64;
    window
}

/// Format a month the way the charts label it, e.g. `"Jan 24"`.
fn month_label(month: Date) -> String {
    format!("{} {:02}", month_abbrev(month.month()), month.year() % 100)
}

fn month_abbrev(month: Month) -> &'static str {
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
