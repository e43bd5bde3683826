//! Fintrack is the core engine of a personal finance tracker.
//!
//! It keeps a locally cached collection of income and expense transactions
//! synchronized with a remote per-user store, and derives everything the
//! surrounding application displays: running totals, expense breakdowns by
//! category, monthly income/expense series, savings-rate statistics,
//! filtered views, and CSV/JSON exports.
//!
//! The crate is UI-agnostic. Rendering, routing and identity management live
//! in the embedding application; the remote persistence backend sits behind
//! the [RemoteStore] trait, with [InMemoryRemote] as the bundled
//! single-process implementation.

#![warn(missing_docs)]

pub mod aggregation;
mod category;
pub mod export;
pub mod filter;
pub mod logging;
mod store;
mod transaction;

pub use aggregation::Totals;
pub use category::Category;
pub use filter::FilterSpec;
pub use store::{InMemoryRemote, RemoteError, RemoteStore, TransactionStore};
pub use transaction::{OwnerId, Transaction, TransactionDraft, TransactionId, TransactionPatch};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An empty or whitespace-only string was used as a transaction title.
    #[error("transaction titles cannot be empty")]
    EmptyTitle,

    /// A zero or negative amount was used to create or update a transaction.
    ///
    /// Amounts are always stored positive; the direction of the money flow
    /// is carried by the category, never by the sign.
    #[error("{0} is not a valid amount, amounts must be greater than zero")]
    NonPositiveAmount(f64),

    /// A string did not name any known category.
    #[error("\"{0}\" is not a recognised category")]
    InvalidCategory(String),

    /// A date string was not a calendar date in `YYYY-MM-DD` form.
    ///
    /// Callers should pass in the date string that caused the error.
    #[error("could not parse \"{0}\" as a calendar date")]
    InvalidDateFormat(String),

    /// Tried to update a transaction that is not in the local collection
    #[error("tried to update a transaction that is not in the local collection")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that is not in the local collection
    #[error("tried to delete a transaction that is not in the local collection")]
    DeleteMissingTransaction,

    /// The remote store could not be listed.
    ///
    /// The previous local collection is preserved when this occurs; callers
    /// may retry the load at any time.
    #[error("could not fetch transactions from the remote store: {0}")]
    RemoteFetch(String),

    /// A remote write failed after the optimistic local change was applied.
    ///
    /// The local collection is not rolled back; the affected record is
    /// reported by [TransactionStore::unsynced].
    #[error("a remote write failed after the local change was applied: {0}")]
    RemoteWrite(String),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// An error occurred while writing CSV records
    #[error("could not serialize as CSV: {0}")]
    CSVSerializationError(String),
}
