use super::session::{Credentials, SignInParams};
use super::transaction::{NewTransaction, TransactionRecord};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// The remote auth collaborator: exchanges credentials or a refresh token
/// for a new credential set.
#[async_trait]
pub trait AuthClient: Send + Sync {
    async fn sign_in(&self, params: &SignInParams) -> Result<Credentials>;
    async fn refresh(&self, refresh_token: &str) -> Result<Credentials>;
    /// Server-side session invalidation. Callers treat failure as non-fatal.
    async fn sign_out(&self) -> Result<()>;
}

/// Durable single-slot store for the persisted session.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self) -> Result<Option<Credentials>>;
    async fn save(&self, credentials: &Credentials) -> Result<()>;
    async fn clear(&self) -> Result<()>;
}

/// The remote transaction store: lists stored records and creates new ones.
#[async_trait]
pub trait TransactionGateway: Send + Sync {
    async fn list(&self) -> Result<Vec<TransactionRecord>>;
    /// Stores a new transaction; the backend assigns its `id`.
    async fn create(&self, input: NewTransaction) -> Result<TransactionRecord>;
}

pub type AuthClientRef = Arc<dyn AuthClient>;
pub type SessionStoreRef = Arc<dyn SessionStore>;
pub type TransactionGatewayRef = Arc<dyn TransactionGateway>;
