//! Defines the core transaction model and its validation rules.

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{Category, Error};

/// Alias for the opaque identifier the remote store assigns to a transaction.
pub type TransactionId = String;

/// Alias for the opaque key that scopes a collection to a single user.
pub type OwnerId = String;

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::draft] and pass the
/// draft to [crate::TransactionStore::create].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The identifier assigned by the remote store, or a provisional
    /// `local-` id until the remote create confirms.
    pub id: TransactionId,
    /// A short label for what the transaction was.
    pub title: String,
    /// The amount of money moved. Always greater than zero; the direction
    /// of the flow is carried by `category`.
    pub amount: f64,
    /// The category the transaction belongs to.
    pub category: Category,
    /// When the transaction happened. User-assigned and independent of when
    /// the record was created.
    pub date: Date,
    /// Free-form notes. Empty when the user did not add any.
    #[serde(default)]
    pub notes: String,
    /// When the record was created. Assigned by the remote store and used
    /// for the default newest-first ordering.
    pub created_at: OffsetDateTime,
    /// When the record was last updated, if ever.
    pub updated_at: Option<OffsetDateTime>,
}

impl Transaction {
    /// Start a draft for a new transaction.
    ///
    /// Shortcut for [TransactionDraft::new] for discoverability.
    pub fn draft(title: &str, amount: f64, category: Category, date: Date) -> TransactionDraft {
        TransactionDraft::new(title, amount, category, date)
    }
}

/// The user-supplied payload for creating a [Transaction].
///
/// A draft carries everything except the id and the server-assigned
/// timestamps. [TransactionDraft::validate] checks the payload against the
/// model invariants before any state changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDraft {
    /// A short label for what the transaction was.
    pub title: String,
    /// The amount of money moved. Must be greater than zero.
    pub amount: f64,
    /// The category the transaction belongs to.
    pub category: Category,
    /// When the transaction happened.
    pub date: Date,
    /// Free-form notes.
    #[serde(default)]
    pub notes: String,
}

impl TransactionDraft {
    /// Create a draft with empty notes.
    pub fn new(title: &str, amount: f64, category: Category, date: Date) -> Self {
        Self {
            title: title.to_owned(),
            amount,
            category,
            date,
            notes: String::new(),
        }
    }

    /// Set the free-form notes for the transaction.
    pub fn notes(mut self, notes: &str) -> Self {
        self.notes = notes.to_owned();
        self
    }

    /// Check the draft against the model invariants, trimming the title.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::EmptyTitle] if the title is empty after trimming,
    /// - or [Error::NonPositiveAmount] if the amount is zero or negative.
    pub fn validate(mut self) -> Result<Self, Error> {
        self.title = self.title.trim().to_owned();

        if self.title.is_empty() {
            return Err(Error::EmptyTitle);
        }

        if self.amount <= 0.0 {
            return Err(Error::NonPositiveAmount(self.amount));
        }

        Ok(self)
    }
}

/// A partial update to an existing [Transaction].
///
/// Fields left as `None` keep their current value. Build a patch with the
/// chained setters:
///
/// ```ignore
/// let patch = TransactionPatch::new()
///     .title("Weekly groceries")
///     .amount(1450.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionPatch {
    /// Replacement title, if any.
    pub title: Option<String>,
    /// Replacement amount, if any. Must be greater than zero.
    pub amount: Option<f64>,
    /// Replacement category, if any. Changing between an expense category
    /// and `Income` reclassifies the transaction; the stored amount is
    /// untouched.
    pub category: Option<Category>,
    /// Replacement date, if any.
    pub date: Option<Date>,
    /// Replacement notes, if any.
    pub notes: Option<String>,
}

impl TransactionPatch {
    /// An empty patch that changes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a replacement title.
    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_owned());
        self
    }

    /// Set a replacement amount.
    pub fn amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Set a replacement category.
    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Set a replacement date.
    pub fn date(mut self, date: Date) -> Self {
        self.date = Some(date);
        self
    }

    /// Set replacement notes.
    pub fn notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.to_owned());
        self
    }

    /// Check the present fields against the model invariants.
    ///
    /// The same rules apply as for a draft: a present title must be
    /// non-empty after trimming, a present amount must be greater than zero.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::EmptyTitle] if a present title is empty after trimming,
    /// - or [Error::NonPositiveAmount] if a present amount is zero or negative.
    pub fn validate(mut self) -> Result<Self, Error> {
        if let Some(title) = self.title {
            let title = title.trim().to_owned();
            if title.is_empty() {
                return Err(Error::EmptyTitle);
            }
            self.title = Some(title);
        }

        if let Some(amount) = self.amount {
            if amount <= 0.0 {
                return Err(Error::NonPositiveAmount(amount));
            }
        }

        Ok(self)
    }

    /// Merge the present fields into `transaction`.
    pub(crate) fn apply_to(&self, transaction: &mut Transaction) {
        if let Some(title) = &self.title {
            transaction.title = title.clone();
        }
        if let Some(amount) = self.amount {
            transaction.amount = amount;
        }
        if let Some(category) = self.category {
            transaction.category = category;
        }
        if let Some(date) = self.date {
            transaction.date = date;
        }
        if let Some(notes) = &self.notes {
            transaction.notes = notes.clone();
        }
    }
}


#[cfg(test)]
mod patch_tests {
    use time::macros::date;

    use crate::{Category, Error};

    use super::{Transaction, TransactionPatch};

    fn create_test_transaction() -> Transaction {
        Transaction {
            id: "srv-1".to_owned(),
            title: "Groceries".to_owned(),
            amount: 1200.0,
            category: Category::Food,
            date: date!(2024 - 01 - 15),
            notes: String::new(),
            created_at: time::macros::datetime!(2024-01-15 12:00 UTC),
            updated_at: None,
        }
    }

    #[test]
    fn empty_patch_changes_nothing() {
        let mut transaction = create_test_transaction();
        let want = transaction.clone();

        TransactionPatch::new()
            .validate()
            .unwrap()
            .apply_to(&mut transaction);

        assert_eq!(want, transaction);
    }

    #[test]
    fn apply_merges_present_fields_only() {
        let mut transaction = create_test_transaction();

        TransactionPatch::new()
            .title("Weekly groceries")
            .amount(1450.0)
            .apply_to(&mut transaction);

        assert_eq!(transaction.title, "Weekly groceries");
        assert_eq!(transaction.amount, 1450.0);
        assert_eq!(transaction.category, Category::Food);
        assert_eq!(transaction.date, date!(2024 - 01 - 15));
    }

    #[test]
    fn category_change_keeps_the_amount() {
        let mut transaction = create_test_transaction();

        TransactionPatch::new()
            .category(Category::Income)
            .apply_to(&mut transaction);

        assert_eq!(transaction.category, Category::Income);
        assert_eq!(transaction.amount, 1200.0);
    }

    #[test]
    fn validate_fails_on_empty_replacement_title() {
        let result = TransactionPatch::new().title("  ").validate();

        assert_eq!(result, Err(Error::EmptyTitle));
    }

    #[test]
    fn validate_fails_on_non_positive_replacement_amount() {
        let result = TransactionPatch::new().amount(-1.0).validate();

        assert_eq!(result, Err(Error::NonPositiveAmount(-1.0)));
    }
}
