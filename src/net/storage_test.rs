use super::*;

// =============================================================================
// MemoryStorage
// =============================================================================

#[test]
fn memory_storage_starts_empty() {
    let storage = MemoryStorage::new();
    assert!(storage.get(TOKEN_KEY).is_none());
    assert!(!storage.contains(TOKEN_KEY));
}

#[test]
fn memory_storage_set_then_remove() {
    let storage = MemoryStorage::new();
    storage.set(TOKEN_KEY, "abc").unwrap();
    assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some("abc"));

    storage.remove(TOKEN_KEY).unwrap();
    assert!(!storage.contains(TOKEN_KEY));
}

#[test]
fn memory_storage_with_token() {
    let storage = MemoryStorage::with_token("seeded");
    assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some("seeded"));
}

// =============================================================================
// FileStorage
// =============================================================================

#[test]
fn file_storage_missing_file_reads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path().join("session.json"));
    assert!(storage.get(TOKEN_KEY).is_none());
}

#[test]
fn file_storage_persists_across_instances() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("session.json");

    FileStorage::new(&path).set(TOKEN_KEY, "tok123").unwrap();
    let reopened = FileStorage::new(&path);
    assert_eq!(reopened.get(TOKEN_KEY).as_deref(), Some("tok123"));
}

#[test]
fn file_storage_remove_last_key_deletes_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let storage = FileStorage::new(&path);

    storage.set(TOKEN_KEY, "tok").unwrap();
    assert!(path.exists());
    storage.remove(TOKEN_KEY).unwrap();
    assert!(!path.exists());
    assert!(storage.get(TOKEN_KEY).is_none());
}

#[test]
fn file_storage_remove_keeps_other_keys() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path().join("session.json"));

    storage.set(TOKEN_KEY, "tok").unwrap();
    storage.set("locale", "pt-br").unwrap();
    storage.remove(TOKEN_KEY).unwrap();
    assert!(storage.get(TOKEN_KEY).is_none());
    assert_eq!(storage.get("locale").as_deref(), Some("pt-br"));
}

#[test]
fn file_storage_corrupt_file_reads_none_and_rejects_writes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, "{oops").unwrap();

    let storage = FileStorage::new(&path);
    assert!(storage.get(TOKEN_KEY).is_none());
    assert!(matches!(storage.set(TOKEN_KEY, "tok"), Err(StorageError::Json(_))));
}
