//! Tests for StateManager

use super::*;
use serde_json::json;
use tempfile::tempdir;

// ============================================================================
// Construction Tests
// ============================================================================

#[test]
fn test_state_manager_new() {
    let manager = StateManager::new("/tmp/test-state.json");
    assert!(!manager.is_in_memory());
    assert_eq!(manager.path().to_str().unwrap(), "/tmp/test-state.json");
}

#[test]
fn test_state_manager_in_memory() {
    let manager = StateManager::in_memory();
    assert!(manager.is_in_memory());
}

#[test]
fn test_from_json_valid() {
    let state = StateManager::from_json(
        r#"{"bookmarks": {"users": {"updated_at": "2024-01-01"}}, "currently_syncing": null}"#,
    )
    .unwrap();
    assert_eq!(
        state.get_bookmark("users", "updated_at"),
        Some(&json!("2024-01-01"))
    );
}

#[test]
fn test_from_json_invalid() {
    let result = StateManager::from_json("not json");
    assert!(result.is_err());
}

// ============================================================================
// Load / Save Tests
// ============================================================================

#[tokio::test]
async fn test_load_missing_file_returns_empty() {
    let dir = tempdir().unwrap();
    let manager = StateManager::new(dir.path().join("state.json"));

    let state = manager.load().await.unwrap();
    assert!(state.bookmarks.is_empty());
}

#[tokio::test]
async fn test_save_and_load_round_trip() {
    let dir = tempdir().unwrap();
    let manager = StateManager::new(dir.path().join("state.json"));

    let mut state = State::new();
    state.write_bookmark("users", "updated_at", json!("2024-06-01T00:00:00Z"));
    state.set_currently_syncing(Some("users"));

    manager.save(&state).await.unwrap();
    let loaded = manager.load().await.unwrap();

    assert_eq!(loaded, state);
}

#[tokio::test]
async fn test_save_is_idempotent() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    let manager = StateManager::new(&path);

    let mut state = State::new();
    state.write_bookmark("users", "id", json!(7));

    manager.save(&state).await.unwrap();
    let first = std::fs::read_to_string(&path).unwrap();

    manager.save(&state).await.unwrap();
    let second = std::fs::read_to_string(&path).unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_save_leaves_no_temp_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    let manager = StateManager::new(&path);

    manager.save(&State::new()).await.unwrap();

    assert!(path.exists());
    assert!(!path.with_extension("tmp").exists());
}

#[tokio::test]
async fn test_in_memory_save_is_noop() {
    let manager = StateManager::in_memory();
    let mut state = State::new();
    state.write_bookmark("users", "id", json!(1));

    manager.save(&state).await.unwrap();
    let loaded = manager.load().await.unwrap();

    // In-memory mode never persists anything
    assert!(loaded.bookmarks.is_empty());
}
