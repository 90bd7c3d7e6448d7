use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::Entity;

/// A saved voice memo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memo {
    pub id: String,
    pub title: String,

    /// Memo body; for recorded memos this is the session transcript
    pub description: String,

    pub created_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Caller-supplied fields for a new memo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoDraft {
    pub title: String,
    pub description: String,
}

/// Optional replacements for an existing memo
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Entity for Memo {
    type Draft = MemoDraft;
    type Patch = MemoPatch;

    fn from_draft(draft: MemoDraft, id: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            created_at,
            updated_at: None,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn apply_patch(&mut self, patch: MemoPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
    }

    fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = Some(at);
    }
}
