use std::marker::PhantomData;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::repository::{Entity, Repository, RepositoryError};

/// Configuration for a JSON-file repository slot
#[derive(Debug, Clone)]
pub struct RepositoryConfig {
    /// Directory the slot file lives in
    pub data_dir: PathBuf,

    /// Slot name; the backing file is `<slot>.json` and generated ids are
    /// prefixed with it
    pub slot: String,

    /// Current document schema version
    pub version: String,
}

/// On-disk layout: one versioned document holding the whole collection
#[derive(Debug, Serialize, Deserialize)]
struct StoreDocument<T> {
    version: String,
    items: Vec<T>,
}

/// Repository persisting a versioned JSON document under a single named slot
///
/// Every operation reads the whole document, modifies it and writes it back,
/// the same discipline a key-value slot imposes. A mutex serializes the
/// read-modify-write cycles so concurrent writers cannot lose items.
pub struct JsonFileRepository<T> {
    config: RepositoryConfig,
    path: PathBuf,
    write_lock: Mutex<()>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Entity> JsonFileRepository<T> {
    /// Open the slot, creating an empty versioned document on first use
    pub async fn open(config: RepositoryConfig) -> Result<Self, RepositoryError> {
        tokio::fs::create_dir_all(&config.data_dir).await?;
        let path = config.data_dir.join(format!("{}.json", config.slot));

        let repo = Self {
            path,
            config,
            write_lock: Mutex::new(()),
            _marker: PhantomData,
        };
        if !tokio::fs::try_exists(&repo.path).await? {
            repo.write_document(&StoreDocument {
                version: repo.config.version.clone(),
                items: Vec::new(),
            })
            .await?;
            info!(
                "Initialized store slot {} at {}",
                repo.config.slot,
                repo.path.display()
            );
        }
        Ok(repo)
    }

    /// Path of the backing file
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    async fn read_document(&self) -> Result<StoreDocument<T>, RepositoryError> {
        let raw = tokio::fs::read(&self.path).await?;
        let document: StoreDocument<T> = serde_json::from_slice(&raw)?;
        if document.version != self.config.version {
            // Tolerated: old documents keep working and keep their version
            // until a migration rewrites them.
            warn!(
                "Store document version {} does not match current version {}",
                document.version, self.config.version
            );
        }
        Ok(document)
    }

    async fn write_document(&self, document: &StoreDocument<T>) -> Result<(), RepositoryError> {
        let raw = serde_json::to_vec_pretty(document)?;
        tokio::fs::write(&self.path, raw).await?;
        Ok(())
    }

    fn generate_id(&self) -> String {
        format!("{}-{}", self.config.slot, Uuid::new_v4())
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for JsonFileRepository<T> {
    async fn get_all(&self) -> Result<Vec<T>, RepositoryError> {
        let document = self.read_document().await?;
        let mut items = document.items;
        items.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(items)
    }

    async fn get_by_id(&self, id: &str) -> Result<T, RepositoryError> {
        let document = self.read_document().await?;
        document
            .items
            .into_iter()
            .find(|item| item.id() == id)
            .ok_or(RepositoryError::NotFound)
    }

    async fn create(&self, draft: T::Draft) -> Result<T, RepositoryError> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.read_document().await?;
        let item = T::from_draft(draft, self.generate_id(), Utc::now());
        document.items.push(item.clone());
        self.write_document(&document).await?;
        debug!("Created {} item {}", self.config.slot, item.id());
        Ok(item)
    }

    async fn update(&self, id: &str, patch: T::Patch) -> Result<T, RepositoryError> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.read_document().await?;
        let item = document
            .items
            .iter_mut()
            .find(|item| item.id() == id)
            .ok_or(RepositoryError::NotFound)?;
        item.apply_patch(patch);
        item.touch(Utc::now());
        let updated = item.clone();
        self.write_document(&document).await?;
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.read_document().await?;
        let before = document.items.len();
        document.items.retain(|item| item.id() != id);
        if document.items.len() == before {
            return Err(RepositoryError::NotFound);
        }
        self.write_document(&document).await?;
        debug!("Deleted {} item {}", self.config.slot, id);
        Ok(())
    }

    async fn exists(&self, id: &str) -> bool {
        match self.read_document().await {
            Ok(document) => document.items.iter().any(|item| item.id() == id),
            Err(_) => false,
        }
    }
}
