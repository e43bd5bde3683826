//! Defines the filter specification applied to the transactions list.

use serde::{Deserialize, Deserializer};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{Category, transaction::Transaction};

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// The filter state driven by the UI's search box, category select and date
/// range inputs.
///
/// The wire shape uses sentinel values (`"All"` for the category, `""` for
/// an open date bound) which deserialize into `None` here. The default
/// specification matches every transaction.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterSpec {
    /// Case-insensitive substring matched against titles. Empty matches
    /// everything.
    pub search: String,
    /// The category to keep, or `None` for every category.
    #[serde(deserialize_with = "category_filter")]
    pub category: Option<Category>,
    /// Inclusive lower bound on the transaction date, unbounded when `None`.
    #[serde(deserialize_with = "date_bound")]
    pub date_from: Option<Date>,
    /// Inclusive upper bound on the transaction date, unbounded when `None`.
    #[serde(deserialize_with = "date_bound")]
    pub date_to: Option<Date>,
}

fn category_filter<'de, D>(deserializer: D) -> Result<Option<Category>, D::Error>
where
    D: Deserializer<'de>,
{
    let name = String::deserialize(deserializer)?;
    if name == "All" {
        return Ok(None);
    }

    name.parse().map(Some).map_err(serde::de::Error::custom)
}

fn date_bound<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    if text.is_empty() {
        return Ok(None);
    }

    Date::parse(&text, DATE_FORMAT)
        .map(Some)
        .map_err(|_| serde::de::Error::custom(crate::Error::InvalidDateFormat(text)))
}

/// Return the transactions matching every active predicate in `spec`,
/// preserving the input order.
///
/// The predicates combine with logical AND, so applying them in any order
/// yields the same subset. An empty collection, or a specification nothing
/// matches, yields an empty vector.
pub fn apply(transactions: &[Transaction], spec: &FilterSpec) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|transaction| matches(transaction, spec))
        .cloned()
        .collect()
}

fn matches(transaction: &Transaction, spec: &FilterSpec) -> bool {
    let matches_search = spec.search.is_empty()
        || transaction
            .title
            .to_lowercase()
            .contains(&spec.search.to_lowercase());
    let matches_category = spec
        .category
        .is_none_or(|category| transaction.category == category);
    let matches_from = spec.date_from.is_none_or(|from| transaction.date >= from);
    let matches_to = spec.date_to.is_none_or(|to| transaction.date <= to);

    matches_search && matches_category && matches_from && matches_to
}
