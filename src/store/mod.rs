//! The locally cached transaction collection and its synchronization with
//! the remote store.
//!
//! Mutations are optimistic: the local collection changes before the
//! matching remote call completes, so reads issued right after a mutation
//! always observe it. Remote failures are reported asynchronously and never
//! roll the local change back; affected records are tracked as unsynced
//! instead.

mod memory;
mod remote;

pub use memory::InMemoryRemote;
pub use remote::{RemoteError, RemoteStore};

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use time::OffsetDateTime;
use tokio::task::JoinHandle;

use crate::{
    Error,
    aggregation::{self, Totals},
    transaction::{OwnerId, Transaction, TransactionDraft, TransactionId, TransactionPatch},
};

/// The authoritative local view of one user's transactions.
///
/// The store owns the collection outright and is the only component that
/// mutates it; filters, aggregations and exports all work on snapshots
/// taken with [TransactionStore::transactions]. Every store is scoped to a
/// single owner; switching users means [TransactionStore::teardown] (or
/// dropping the store) and constructing a new one.
///
/// Remote writes are dispatched on the tokio runtime with `tokio::spawn`,
/// so mutations must be issued from within a runtime.
pub struct TransactionStore {
    owner_id: OwnerId,
    remote: Arc<dyn RemoteStore>,
    inner: Arc<Mutex<Inner>>,
    tasks: Mutex<Vec<JoinHandle<Result<(), RemoteError>>>>,
    provisional_seq: AtomicU64,
}

#[derive(Debug, Default)]
struct Inner {
    transactions: Vec<Transaction>,
    unsynced: HashSet<TransactionId>,
}

impl TransactionStore {
    /// Create a store scoped to `owner_id`, mediating against `remote`.
    ///
    /// The collection starts empty; call [TransactionStore::load] to fetch
    /// the persisted records.
    pub fn new(owner_id: impl Into<OwnerId>, remote: Arc<dyn RemoteStore>) -> Self {
        Self {
            owner_id: owner_id.into(),
            remote,
            inner: Arc::new(Mutex::new(Inner::default())),
            tasks: Mutex::new(Vec::new()),
            provisional_seq: AtomicU64::new(0),
        }
    }

    /// The owner every remote call is scoped to.
    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    /// Replace the local collection with the remote one, newest-created
    /// first.
    ///
    /// # Errors
    /// This function will return a [Error::RemoteFetch] if the remote list
    /// call fails. The previous local collection is left untouched on that
    /// path.
    pub async fn load(&self) -> Result<(), Error> {
        let records = self
            .remote
            .list(&self.owner_id)
            .await
            .map_err(|error| Error::RemoteFetch(error.to_string()))?;

        let mut inner = lock(&self.inner);
        inner.transactions = records;
        inner.unsynced.clear();

        Ok(())
    }

    /// Validate `draft`, prepend the new record to the local collection and
    /// issue the remote create in the background.
    ///
    /// The local collection reflects the new entry when this returns; the
    /// remote round-trip completes later. The returned record carries a
    /// provisional `local-` id which is swapped for the server id once the
    /// remote create confirms.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::EmptyTitle] if the draft title is empty after trimming,
    /// - or [Error::NonPositiveAmount] if the draft amount is zero or negative.
    ///
    /// Nothing changes locally or remotely on the error path.
    pub fn create(&self, draft: TransactionDraft) -> Result<Transaction, Error> {
        let draft = draft.validate()?;

        let sequence = self.provisional_seq.fetch_add(1, Ordering::Relaxed);
        let provisional = provisional_id(&draft, sequence);
        let record = Transaction {
            id: provisional.clone(),
            title: draft.title.clone(),
            amount: draft.amount,
            category: draft.category,
            date: draft.date,
            notes: draft.notes.clone(),
            created_at: OffsetDateTime::now_utc(),
            updated_at: None,
        };

        lock(&self.inner).transactions.insert(0, record.clone());

        let remote = Arc::clone(&self.remote);
        let inner = Arc::clone(&self.inner);
        let owner = self.owner_id.clone();
        self.spawn(async move {
            match remote.create(&owner, draft).await {
                Ok(server_id) => {
                    let mut inner = lock(&inner);
                    // The record may have been deleted locally before the
                    // create confirmed; nothing left to reconcile then.
                    if let Some(transaction) = inner
                        .transactions
                        .iter_mut()
                        .find(|transaction| transaction.id == provisional)
                    {
                        transaction.id = server_id;
                    }
                    Ok(())
                }
                Err(error) => {
                    tracing::error!("remote create of transaction {provisional} failed: {error}");
                    lock(&inner).unsynced.insert(provisional);
                    Err(error)
                }
            }
        });

        Ok(record)
    }

    /// Validate `patch`, merge it into the matching local record and issue
    /// the remote update in the background.
    ///
    /// `updated_at` is set to the current time optimistically; the backend's
    /// authoritative timestamp replaces it on the next [TransactionStore::load].
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::EmptyTitle] / [Error::NonPositiveAmount] if the patch fails
    ///   validation,
    /// - or [Error::UpdateMissingTransaction] if `id` is not in the local
    ///   collection.
    ///
    /// Nothing changes locally or remotely on the error path.
    pub fn update(&self, id: &TransactionId, patch: TransactionPatch) -> Result<Transaction, Error> {
        let patch = patch.validate()?;

        let updated = {
            let mut inner = lock(&self.inner);
            let transaction = inner
                .transactions
                .iter_mut()
                .find(|transaction| &transaction.id == id)
                .ok_or(Error::UpdateMissingTransaction)?;

            patch.apply_to(transaction);
            transaction.updated_at = Some(OffsetDateTime::now_utc());
            transaction.clone()
        };

        let remote = Arc::clone(&self.remote);
        let inner = Arc::clone(&self.inner);
        let owner = self.owner_id.clone();
        let id = id.clone();
        self.spawn(async move {
            match remote.update(&owner, &id, patch).await {
                Ok(()) => {
                    lock(&inner).unsynced.remove(&id);
                    Ok(())
                }
                Err(error) => {
                    tracing::error!("remote update of transaction {id} failed: {error}");
                    lock(&inner).unsynced.insert(id);
                    Err(error)
                }
            }
        });

        Ok(updated)
    }

    /// Remove the matching local record and issue the remote delete in the
    /// background.
    ///
    /// # Errors
    /// This function will return a [Error::DeleteMissingTransaction] if `id`
    /// is not in the local collection; nothing changes on that path.
    pub fn delete(&self, id: &TransactionId) -> Result<(), Error> {
        {
            let mut inner = lock(&self.inner);
            let position = inner
                .transactions
                .iter()
                .position(|transaction| &transaction.id == id)
                .ok_or(Error::DeleteMissingTransaction)?;
            inner.transactions.remove(position);
            inner.unsynced.remove(id);
        }

        let remote = Arc::clone(&self.remote);
        let owner = self.owner_id.clone();
        let id = id.clone();
        self.spawn(async move {
            match remote.delete(&owner, &id).await {
                Ok(()) => Ok(()),
                Err(error) => {
                    // The record is already gone locally; there is nothing
                    // left to mark, so the failure is only reported.
                    tracing::error!("remote delete of transaction {id} failed: {error}");
                    Err(error)
                }
            }
        });

        Ok(())
    }

    /// Income, expense and balance across the local collection, recomputed
    /// from scratch on every call so the numbers always reflect the latest
    /// local mutation.
    pub fn totals(&self) -> Totals {
        aggregation::totals(&lock(&self.inner).transactions)
    }

    /// A snapshot of the local collection in display order (newest first).
    pub fn transactions(&self) -> Vec<Transaction> {
        lock(&self.inner).transactions.clone()
    }

    /// Ids whose most recent remote write failed.
    ///
    /// The optimistic local state for these records stands; callers decide
    /// whether to retry the write or reload from the remote store.
    pub fn unsynced(&self) -> Vec<TransactionId> {
        let mut ids: Vec<TransactionId> = lock(&self.inner).unsynced.iter().cloned().collect();
        ids.sort();
        ids
    }

    /// Wait until every remote call issued so far has completed, reporting
    /// the first write failure observed along the way.
    ///
    /// Mutations never wait for the network; this is how their failures are
    /// surfaced after the fact. Embedders should flush before shutting
    /// down, and tests use it to observe the asynchronous bookkeeping
    /// deterministically. The unsynced marks are kept regardless of the
    /// returned value.
    ///
    /// # Errors
    /// This function will return a [Error::RemoteWrite] if any awaited
    /// remote call had failed.
    pub async fn flush(&self) -> Result<(), Error> {
        let handles = std::mem::take(&mut *lock(&self.tasks));

        let mut first_failure: Option<RemoteError> = None;
        for handle in handles {
            if let Ok(Err(error)) = handle.await {
                first_failure.get_or_insert(error);
            }
        }

        match first_failure {
            Some(error) => Err(Error::RemoteWrite(error.to_string())),
            None => Ok(()),
        }
    }

    /// Discard the local collection and the unsynced bookkeeping.
    ///
    /// Remote calls already in flight are not cancelled. Used when the
    /// session ends or the owner changes; the replacement store starts
    /// empty and loads its own collection.
    pub fn teardown(&self) {
        let mut inner = lock(&self.inner);
        inner.transactions.clear();
        inner.unsynced.clear();
    }

    fn spawn(&self, task: impl Future<Output = Result<(), RemoteError>> + Send + 'static) {
        lock(&self.tasks).push(tokio::spawn(task));
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A poisoned lock still holds a valid collection.
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Content-hash id for an optimistically created record, distinct from any
/// server id. The sequence number keeps identical drafts apart.
fn provisional_id(draft: &TransactionDraft, sequence: u64) -> TransactionId {
    let digest = md5::compute(format!(
        "{}|{}|{}|{}",
        sequence, draft.title, draft.amount, draft.date
    ));
    format!("local-{digest:x}")
}
