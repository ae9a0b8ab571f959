use crate::domain::ports::{SessionStore, TransactionGateway};
use crate::domain::session::Credentials;
use crate::domain::transaction::{NewTransaction, TransactionRecord};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// A thread-safe in-memory session store.
///
/// Holds the single persisted-session slot behind `Arc<RwLock<..>>` for
/// shared access. Ideal for tests or setups where durability is not wanted.
#[derive(Default, Clone)]
pub struct InMemorySessionStore {
    slot: Arc<RwLock<Option<Credentials>>>,
}

impl InMemorySessionStore {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with a persisted credential.
    pub fn with_credentials(credentials: Credentials) -> Self {
        Self {
            slot: Arc::new(RwLock::new(Some(credentials))),
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self) -> Result<Option<Credentials>> {
        Ok(self.slot.read().await.clone())
    }

    async fn save(&self, credentials: &Credentials) -> Result<()> {
        *self.slot.write().await = Some(credentials.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.slot.write().await = None;
        Ok(())
    }
}

/// A thread-safe in-memory transaction store.
///
/// Assigns ids the way the remote backend does, so it can stand in for it
/// during tests and offline runs.
#[derive(Default, Clone)]
pub struct InMemoryTransactionGateway {
    records: Arc<RwLock<Vec<TransactionRecord>>>,
    next_id: Arc<AtomicU64>,
}

impl InMemoryTransactionGateway {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransactionGateway for InMemoryTransactionGateway {
    async fn list(&self) -> Result<Vec<TransactionRecord>> {
        Ok(self.records.read().await.clone())
    }

    async fn create(&self, input: NewTransaction) -> Result<TransactionRecord> {
        input.validate()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let record = TransactionRecord {
            id: format!("{id:03}"),
            date: input.date,
            notes: input.notes,
            kind: input.kind,
        };
        self.records.write().await.push(record.clone());
        Ok(record)
    }
}
