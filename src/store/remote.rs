//! Defines the trait boundary to the remote persistent store.

use async_trait::async_trait;

use crate::transaction::{OwnerId, Transaction, TransactionDraft, TransactionId, TransactionPatch};

/// The error reported by the remote persistence collaborator.
///
/// Transport failures and backend failures are indistinguishable at this
/// boundary; the string carries whatever detail the underlying client had.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct RemoteError(pub String);

/// The operations the remote per-user document store exposes.
///
/// All four calls are asynchronous and may fail with a generic
/// [RemoteError]. Implementations are expected to scope every call to the
/// given owner and to assign ids and `created_at`/`updated_at` timestamps
/// themselves.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Persist a new transaction for `owner` and return its assigned id.
    async fn create(
        &self,
        owner: &OwnerId,
        draft: TransactionDraft,
    ) -> Result<TransactionId, RemoteError>;

    /// All transactions belonging to `owner`, newest-created first.
    async fn list(&self, owner: &OwnerId) -> Result<Vec<Transaction>, RemoteError>;

    /// Merge `patch` into the stored transaction with the given id.
    async fn update(
        &self,
        owner: &OwnerId,
        id: &TransactionId,
        patch: TransactionPatch,
    ) -> Result<(), RemoteError>;

    /// Remove the stored transaction with the given id.
    async fn delete(&self, owner: &OwnerId, id: &TransactionId) -> Result<(), RemoteError>;
}
