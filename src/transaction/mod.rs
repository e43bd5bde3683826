//! Transaction model for the finance tracker.
//!
//! This module contains the `Transaction` record itself, the validated
//! payloads used to create and update records, and the id aliases shared
//! with the remote store boundary.

mod core;

pub use core::{OwnerId, Transaction, TransactionDraft, TransactionId, TransactionPatch};
