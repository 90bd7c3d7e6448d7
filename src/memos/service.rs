use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::storage::{Repository, RepositoryError};

use super::memo::{Memo, MemoDraft, MemoPatch};

/// Errors from memo operations, phrased for direct display
#[derive(Debug, Error)]
pub enum MemoError {
    #[error("Invalid memo ID")]
    InvalidId,

    #[error("Memo not found")]
    NotFound,

    #[error("Memo title is required")]
    TitleRequired,

    #[error("Memo description is required")]
    DescriptionRequired,

    #[error("Memo title cannot be empty")]
    TitleEmpty,

    #[error("Memo description cannot be empty")]
    DescriptionEmpty,

    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for MemoError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => MemoError::NotFound,
            other => MemoError::Repository(other),
        }
    }
}

/// Memo CRUD with the validation rules callers rely on
///
/// Owns an injected repository rather than reaching for a global store, so
/// any backend works and tests construct the service directly.
pub struct MemoService {
    repository: Arc<dyn Repository<Memo>>,
}

impl MemoService {
    pub fn new(repository: Arc<dyn Repository<Memo>>) -> Self {
        Self { repository }
    }

    /// All memos, newest first
    pub async fn get_all_memos(&self) -> Result<Vec<Memo>, MemoError> {
        Ok(self.repository.get_all().await?)
    }

    pub async fn get_memo(&self, id: &str) -> Result<Memo, MemoError> {
        if id.is_empty() {
            return Err(MemoError::InvalidId);
        }
        Ok(self.repository.get_by_id(id).await?)
    }

    /// Create a memo; title and description are trimmed before storage
    pub async fn create_memo(&self, draft: MemoDraft) -> Result<Memo, MemoError> {
        if draft.title.trim().is_empty() {
            return Err(MemoError::TitleRequired);
        }
        if draft.description.trim().is_empty() {
            return Err(MemoError::DescriptionRequired);
        }

        let memo = self
            .repository
            .create(MemoDraft {
                title: draft.title.trim().to_string(),
                description: draft.description.trim().to_string(),
            })
            .await?;
        info!("Created memo {}", memo.id);
        Ok(memo)
    }

    /// Patch a memo; provided fields must not be blank, absent fields keep
    /// their stored values
    pub async fn update_memo(&self, id: &str, patch: MemoPatch) -> Result<Memo, MemoError> {
        if id.is_empty() {
            return Err(MemoError::InvalidId);
        }
        if !self.repository.exists(id).await {
            return Err(MemoError::NotFound);
        }
        if matches!(&patch.title, Some(title) if title.trim().is_empty()) {
            return Err(MemoError::TitleEmpty);
        }
        if matches!(&patch.description, Some(description) if description.trim().is_empty()) {
            return Err(MemoError::DescriptionEmpty);
        }

        Ok(self.repository.update(id, patch).await?)
    }

    pub async fn delete_memo(&self, id: &str) -> Result<(), MemoError> {
        if id.is_empty() {
            return Err(MemoError::InvalidId);
        }
        self.repository.delete(id).await?;
        info!("Deleted memo {}", id);
        Ok(())
    }

    pub async fn memo_exists(&self, id: &str) -> bool {
        if id.is_empty() {
            return false;
        }
        self.repository.exists(id).await
    }
}
