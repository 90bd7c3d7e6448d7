// Integration tests for the JSON file repository
//
// These tests verify the versioned document format, id and timestamp
// management, and how the store behaves when its file is stale or corrupt.

use anyhow::Result;
use serde_json::json;
use tempfile::TempDir;

use voice_memos::memos::{Memo, MemoDraft, MemoPatch};
use voice_memos::storage::{JsonFileRepository, Repository, RepositoryConfig, RepositoryError};

fn test_config(dir: &TempDir) -> RepositoryConfig {
    RepositoryConfig {
        data_dir: dir.path().to_path_buf(),
        slot: "test-memos".to_string(),
        version: "1.0.0".to_string(),
    }
}

fn draft(title: &str, description: &str) -> MemoDraft {
    MemoDraft {
        title: title.to_string(),
        description: description.to_string(),
    }
}

#[tokio::test]
async fn test_open_initializes_versioned_document() -> Result<()> {
    let dir = TempDir::new()?;
    let repo: JsonFileRepository<Memo> = JsonFileRepository::open(test_config(&dir)).await?;

    // The slot file exists immediately, holding an empty versioned document
    let raw = std::fs::read_to_string(repo.path())?;
    let document: serde_json::Value = serde_json::from_str(&raw)?;
    assert_eq!(document["version"], "1.0.0");
    assert_eq!(document["items"], json!([]));

    assert!(repo.get_all().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_create_assigns_identity_and_timestamps() -> Result<()> {
    let dir = TempDir::new()?;
    let repo: JsonFileRepository<Memo> = JsonFileRepository::open(test_config(&dir)).await?;

    let memo = repo.create(draft("Standup", "Talked about the release")).await?;

    assert!(
        memo.id.starts_with("test-memos-"),
        "ids carry the slot prefix, got {}",
        memo.id
    );
    assert_eq!(memo.title, "Standup");
    assert_eq!(memo.description, "Talked about the release");
    assert!(memo.updated_at.is_none(), "a fresh memo has no update timestamp");

    // The item is durable, not just in memory
    let fetched = repo.get_by_id(&memo.id).await?;
    assert_eq!(fetched, memo);

    Ok(())
}

#[tokio::test]
async fn test_get_all_returns_newest_first() -> Result<()> {
    let dir = TempDir::new()?;
    let repo: JsonFileRepository<Memo> = JsonFileRepository::open(test_config(&dir)).await?;

    // Small gaps keep the creation timestamps strictly ordered
    let first = repo.create(draft("first", "a")).await?;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = repo.create(draft("second", "b")).await?;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let third = repo.create(draft("third", "c")).await?;

    let all = repo.get_all().await?;
    let ids: Vec<&str> = all.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![third.id.as_str(), second.id.as_str(), first.id.as_str()],
        "listing must be sorted by creation time, newest first"
    );

    Ok(())
}

#[tokio::test]
async fn test_get_by_id_missing_is_not_found() -> Result<()> {
    let dir = TempDir::new()?;
    let repo: JsonFileRepository<Memo> = JsonFileRepository::open(test_config(&dir)).await?;

    let result = repo.get_by_id("test-memos-does-not-exist").await;
    assert!(matches!(result, Err(RepositoryError::NotFound)));

    Ok(())
}

#[tokio::test]
async fn test_update_patches_fields_and_stamps_time() -> Result<()> {
    let dir = TempDir::new()?;
    let repo: JsonFileRepository<Memo> = JsonFileRepository::open(test_config(&dir)).await?;

    let memo = repo.create(draft("Title", "Body")).await?;

    // Patch only the title; the description must survive
    let updated = repo
        .update(
            &memo.id,
            MemoPatch {
                title: Some("New title".to_string()),
                description: None,
            },
        )
        .await?;

    assert_eq!(updated.id, memo.id, "update must not change identity");
    assert_eq!(updated.created_at, memo.created_at, "update must not change created_at");
    assert_eq!(updated.title, "New title");
    assert_eq!(updated.description, "Body", "absent patch fields keep stored values");
    assert!(updated.updated_at.is_some(), "update must stamp updated_at");

    let fetched = repo.get_by_id(&memo.id).await?;
    assert_eq!(fetched, updated);

    Ok(())
}

#[tokio::test]
async fn test_update_missing_is_not_found() -> Result<()> {
    let dir = TempDir::new()?;
    let repo: JsonFileRepository<Memo> = JsonFileRepository::open(test_config(&dir)).await?;

    let result = repo
        .update("test-memos-missing", MemoPatch::default())
        .await;
    assert!(matches!(result, Err(RepositoryError::NotFound)));

    Ok(())
}

#[tokio::test]
async fn test_delete_removes_item() -> Result<()> {
    let dir = TempDir::new()?;
    let repo: JsonFileRepository<Memo> = JsonFileRepository::open(test_config(&dir)).await?;

    let keep = repo.create(draft("keep", "a")).await?;
    let removed = repo.create(draft("remove", "b")).await?;

    repo.delete(&removed.id).await?;

    assert!(!repo.exists(&removed.id).await);
    assert!(repo.exists(&keep.id).await);
    assert!(matches!(
        repo.delete(&removed.id).await,
        Err(RepositoryError::NotFound)
    ));

    Ok(())
}

#[tokio::test]
async fn test_exists_swallows_storage_failures() -> Result<()> {
    let dir = TempDir::new()?;
    let repo: JsonFileRepository<Memo> = JsonFileRepository::open(test_config(&dir)).await?;
    let memo = repo.create(draft("x", "y")).await?;
    assert!(repo.exists(&memo.id).await);

    // Corrupt the backing file; existence checks degrade to false
    std::fs::write(repo.path(), b"{ not json")?;
    assert!(!repo.exists(&memo.id).await);

    Ok(())
}

#[tokio::test]
async fn test_corrupt_document_surfaces_as_error() -> Result<()> {
    let dir = TempDir::new()?;
    let repo: JsonFileRepository<Memo> = JsonFileRepository::open(test_config(&dir)).await?;
    repo.create(draft("x", "y")).await?;

    std::fs::write(repo.path(), b"{\"version\": 42}")?;

    let result = repo.get_all().await;
    assert!(
        matches!(result, Err(RepositoryError::Corrupt(_))),
        "unparseable documents must fail loudly on reads"
    );

    Ok(())
}

#[tokio::test]
async fn test_version_mismatch_is_tolerated() -> Result<()> {
    let dir = TempDir::new()?;
    let repo: JsonFileRepository<Memo> = JsonFileRepository::open(test_config(&dir)).await?;
    let memo = repo.create(draft("old data", "still readable")).await?;

    // Rewrite the document claiming an older schema version
    let raw = std::fs::read_to_string(repo.path())?;
    let mut document: serde_json::Value = serde_json::from_str(&raw)?;
    document["version"] = json!("0.9.0");
    std::fs::write(repo.path(), serde_json::to_vec_pretty(&document)?)?;

    // Reads keep working and the document keeps its version
    let all = repo.get_all().await?;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, memo.id);

    repo.create(draft("new data", "appended")).await?;
    let raw = std::fs::read_to_string(repo.path())?;
    let document: serde_json::Value = serde_json::from_str(&raw)?;
    assert_eq!(
        document["version"], "0.9.0",
        "writes preserve the stored version until a migration rewrites it"
    );
    assert_eq!(document["items"].as_array().map(Vec::len), Some(2));

    Ok(())
}

#[tokio::test]
async fn test_reopen_preserves_existing_items() -> Result<()> {
    let dir = TempDir::new()?;
    let memo = {
        let repo: JsonFileRepository<Memo> = JsonFileRepository::open(test_config(&dir)).await?;
        repo.create(draft("durable", "survives reopen")).await?
    };

    let reopened: JsonFileRepository<Memo> = JsonFileRepository::open(test_config(&dir)).await?;
    let all = reopened.get_all().await?;
    assert_eq!(all.len(), 1, "reopening must not reinitialize the slot");
    assert_eq!(all[0], memo);

    Ok(())
}

#[tokio::test]
async fn test_slots_are_isolated() -> Result<()> {
    let dir = TempDir::new()?;
    let memos: JsonFileRepository<Memo> = JsonFileRepository::open(test_config(&dir)).await?;
    let archive: JsonFileRepository<Memo> = JsonFileRepository::open(RepositoryConfig {
        slot: "archive".to_string(),
        ..test_config(&dir)
    })
    .await?;

    let memo = memos.create(draft("mine", "here")).await?;

    assert!(archive.get_all().await?.is_empty(), "slots must not share items");
    assert!(!archive.exists(&memo.id).await);

    Ok(())
}
