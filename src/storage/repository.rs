use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by repository operations
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No item with the requested id exists
    #[error("item not found")]
    NotFound,

    /// The backing store could not be read or written
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// The persisted document could not be parsed
    #[error("corrupt store document: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// A stored entity with repository-managed identity and timestamps
///
/// `Draft` carries the caller-supplied fields for creation and `Patch` the
/// optional replacements for update. The repository owns id generation and
/// both timestamps, so entities can neither forge nor lose them.
pub trait Entity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    type Draft: Send;
    type Patch: Send;

    /// Build a new entity from a draft plus generated identity
    fn from_draft(draft: Self::Draft, id: String, created_at: DateTime<Utc>) -> Self;

    fn id(&self) -> &str;

    fn created_at(&self) -> DateTime<Utc>;

    /// Fold a patch into the entity, leaving id and created_at untouched
    fn apply_patch(&mut self, patch: Self::Patch);

    /// Record the moment of the latest update
    fn touch(&mut self, at: DateTime<Utc>);
}

/// Generic keyed collection store
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// All items, newest first
    async fn get_all(&self) -> Result<Vec<T>, RepositoryError>;

    async fn get_by_id(&self, id: &str) -> Result<T, RepositoryError>;

    /// Persist a new item under a generated id with a creation timestamp
    async fn create(&self, draft: T::Draft) -> Result<T, RepositoryError>;

    /// Patch an existing item and stamp its update time
    async fn update(&self, id: &str, patch: T::Patch) -> Result<T, RepositoryError>;

    async fn delete(&self, id: &str) -> Result<(), RepositoryError>;

    /// Whether an item with this id exists; storage failures read as absent
    async fn exists(&self, id: &str) -> bool;
}
