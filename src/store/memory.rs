//! An in-memory implementation of the remote store boundary.
//!
//! Stands in for the real per-user document store in tests and
//! single-process embeddings. Reads and writes can be made to fail on
//! demand so the error paths of [crate::TransactionStore] can be exercised.

use std::collections::HashMap;
use std::sync::{
    Mutex,
    atomic::{AtomicBool, AtomicU64, Ordering},
};

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::transaction::{OwnerId, Transaction, TransactionDraft, TransactionId, TransactionPatch};

use super::remote::{RemoteError, RemoteStore};

/// A remote store backed by per-owner vectors in process memory.
///
/// Ids are assigned as `srv-1`, `srv-2`, ... in creation order and
/// timestamps are taken from the wall clock, mirroring what a hosted
/// document store would do.
#[derive(Debug, Default)]
pub struct InMemoryRemote {
    collections: Mutex<HashMap<OwnerId, Vec<Transaction>>>,
    next_id: AtomicU64,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl InMemoryRemote {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent list call fail until switched back off.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::Relaxed);
    }

    /// Make every subsequent create/update/delete call fail until switched
    /// back off.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Relaxed);
    }

    fn check_write(&self) -> Result<(), RemoteError> {
        if self.fail_writes.load(Ordering::Relaxed) {
            Err(RemoteError("injected write failure".to_owned()))
        } else {
            Ok(())
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<OwnerId, Vec<Transaction>>> {
        // A poisoned lock still holds valid collections.
        self.collections
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl RemoteStore for InMemoryRemote {
    async fn create(
        &self,
        owner: &OwnerId,
        draft: TransactionDraft,
    ) -> Result<TransactionId, RemoteError> {
        self.check_write()?;

        let id = format!("srv-{}", self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let record = Transaction {
            id: id.clone(),
            title: draft.title,
            amount: draft.amount,
            category: draft.category,
            date: draft.date,
            notes: draft.notes,
            created_at: OffsetDateTime::now_utc(),
            updated_at: None,
        };

        self.lock().entry(owner.clone()).or_default().push(record);

        Ok(id)
    }

    async fn list(&self, owner: &OwnerId) -> Result<Vec<Transaction>, RemoteError> {
        if self.fail_reads.load(Ordering::Relaxed) {
            return Err(RemoteError("injected read failure".to_owned()));
        }

        let mut records = self.lock().get(owner).cloned().unwrap_or_default();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(records)
    }

    async fn update(
        &self,
        owner: &OwnerId,
        id: &TransactionId,
        patch: TransactionPatch,
    ) -> Result<(), RemoteError> {
        self.check_write()?;

        let mut collections = self.lock();
        let record = collections
            .get_mut(owner)
            .and_then(|records| records.iter_mut().find(|record| &record.id == id))
            .ok_or_else(|| RemoteError(format!("no transaction with id {id}")))?;

        patch.apply_to(record);
        record.updated_at = Some(OffsetDateTime::now_utc());

        Ok(())
    }

    async fn delete(&self, owner: &OwnerId, id: &TransactionId) -> Result<(), RemoteError> {
        self.check_write()?;

        let mut collections = self.lock();
        let records = collections
            .get_mut(owner)
            .ok_or_else(|| RemoteError(format!("no transaction with id {id}")))?;

        let position = records
            .iter()
            .position(|record| &record.id == id)
            .ok_or_else(|| RemoteError(format!("no transaction with id {id}")))?;
        records.remove(position);

        Ok(())
    }
}

#[cfg(test)]
mod in_memory_remote_tests {
    use time::macros::date;

    use crate::{
        Category, RemoteStore,
        transaction::{Transaction, TransactionPatch},
    };

    use super::InMemoryRemote;

    #[tokio::test]
    async fn list_returns_newest_created_first() {
        let remote = InMemoryRemote::new();
        let owner = "user-1".to_owned();

        for title in ["first", "second", "third"] {
            remote
                .create(
                    &owner,
                    Transaction::draft(title, 10.0, Category::Other, date!(2024 - 01 - 01)),
                )
                .await
                .expect("create should succeed");
        }

        let titles: Vec<String> = remote
            .list(&owner)
            .await
            .expect("list should succeed")
            .into_iter()
            .map(|record| record.title)
            .collect();

        assert_eq!(titles, vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn collections_are_scoped_by_owner() {
        let remote = InMemoryRemote::new();

        remote
            .create(
                &"user-1".to_owned(),
                Transaction::draft("Rent", 15000.0, Category::Utilities, date!(2024 - 02 - 01)),
            )
            .await
            .unwrap();

        let other = remote.list(&"user-2".to_owned()).await.unwrap();

        assert!(other.is_empty());
    }

    #[tokio::test]
    async fn update_merges_patch_and_sets_updated_at() {
        let remote = InMemoryRemote::new();
        let owner = "user-1".to_owned();
        let id = remote
            .create(
                &owner,
                Transaction::draft("Groceries", 1200.0, Category::Food, date!(2024 - 01 - 15)),
            )
            .await
            .unwrap();

        remote
            .update(&owner, &id, TransactionPatch::new().amount(1450.0))
            .await
            .expect("update should succeed");

        let records = remote.list(&owner).await.unwrap();
        assert_eq!(records[0].amount, 1450.0);
        assert_eq!(records[0].title, "Groceries");
        assert!(records[0].updated_at.is_some());
    }

    #[tokio::test]
    async fn update_fails_on_missing_id() {
        let remote = InMemoryRemote::new();

        let result = remote
            .update(
                &"user-1".to_owned(),
                &"missing-id".to_owned(),
                TransactionPatch::new().amount(1.0),
            )
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn injected_write_failure_fails_creates() {
        let remote = InMemoryRemote::new();
        remote.set_fail_writes(true);

        let result = remote
            .create(
                &"user-1".to_owned(),
                Transaction::draft("Rent", 15000.0, Category::Utilities, date!(2024 - 02 - 01)),
            )
            .await;

        assert!(result.is_err());
    }
}
