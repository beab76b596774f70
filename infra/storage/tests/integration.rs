use mymeds_storage::*;
use tempfile::TempDir;

#[tokio::test]
async fn test_path_traversal_blocked() {
    let temp = TempDir::new().unwrap();

    let storage = Storage::builder().root(temp.path()).connect().await.unwrap();

    assert!(storage.resolve("../etc/passwd").is_err());
    assert!(storage.resolve("foo/../../bar").is_err());
}

#[tokio::test]
async fn test_write_read_roundtrip_uncompressed() {
    let temp = TempDir::new().unwrap();
    let storage = Storage::builder().root(temp.path()).connect().await.unwrap();

    let payload = b"hello world";
    storage.write("foo/bar.bin", payload).await.unwrap();
    assert!(storage.exists("foo/bar.bin").unwrap());

    let data = storage.read("foo/bar.bin").await.unwrap();
    assert_eq!(data, payload);

    let meta = storage.metadata("foo/bar.bin").await.unwrap();
    assert!(meta.len() > 0);
}

#[tokio::test]
async fn test_write_read_roundtrip_compressed() {
    let temp = TempDir::new().unwrap();
    let storage =
        Storage::builder().root(temp.path()).compression(Compression::Lz4).connect().await.unwrap();

    let payload = vec![1u8; 4096];
    storage.write("bin/data.dat", &payload).await.unwrap();

    let data = storage.read("bin/data.dat").await.unwrap();
    assert_eq!(data, payload);
}

#[tokio::test]
async fn test_overwrite_replaces_contents() {
    let temp = TempDir::new().unwrap();
    let storage = Storage::builder().root(temp.path()).connect().await.unwrap();

    storage.write("record.bin", b"first").await.unwrap();
    storage.write("record.bin", b"second").await.unwrap();

    assert_eq!(storage.read("record.bin").await.unwrap(), b"second");
}

#[tokio::test]
async fn test_namespace_isolation() {
    let temp = TempDir::new().unwrap();
    let storage = Storage::builder().root(temp.path()).connect().await.unwrap();

    let ns_a = storage.namespace("vaults").unwrap();
    let ns_b = storage.namespace("settings").unwrap();

    ns_a.write("shared_name", b"a").await.unwrap();
    ns_b.write("shared_name", b"b").await.unwrap();

    let a_path = ns_a.resolve("shared_name").unwrap();
    let b_path = ns_b.resolve("shared_name").unwrap();
    assert_ne!(a_path, b_path, "paths must differ across namespaces");

    assert_eq!(ns_a.read("shared_name").await.unwrap(), b"a");
    assert_eq!(ns_b.read("shared_name").await.unwrap(), b"b");
}

#[tokio::test]
async fn test_namespace_list() {
    let temp = TempDir::new().unwrap();
    let storage = Storage::builder().root(temp.path()).connect().await.unwrap();

    let ns = storage.namespace("vaults").unwrap();
    assert!(ns.list().await.unwrap().is_empty(), "fresh namespace must list empty");

    ns.write("bravo", b"2").await.unwrap();
    ns.write("alpha", b"1").await.unwrap();

    assert_eq!(ns.list().await.unwrap(), vec!["alpha".to_string(), "bravo".to_string()]);

    ns.delete("alpha").await.unwrap();
    assert_eq!(ns.list().await.unwrap(), vec!["bravo".to_string()]);
}

#[tokio::test]
async fn test_namespace_rejects_illegal_names() {
    let temp = TempDir::new().unwrap();
    let storage = Storage::builder().root(temp.path()).connect().await.unwrap();

    assert!(storage.namespace("").is_err());
    assert!(storage.namespace("../escape").is_err());
    assert!(storage.namespace("with space").is_err());
    assert!(storage.namespace("ok_name").is_ok());
}

#[tokio::test]
async fn test_delete_and_exists() {
    let temp = TempDir::new().unwrap();
    let storage = Storage::builder().root(temp.path()).connect().await.unwrap();

    storage.write("tmp/file.txt", b"x").await.unwrap();
    assert!(storage.exists("tmp/file.txt").unwrap());

    storage.delete("tmp/file.txt").await.unwrap();
    assert!(!storage.exists("tmp/file.txt").unwrap());
}

#[tokio::test]
async fn test_read_missing_returns_file_not_found() {
    let temp = TempDir::new().unwrap();
    let storage = Storage::builder().root(temp.path()).connect().await.unwrap();

    let err = storage.read("missing.bin").await.expect_err("expected error");
    match err {
        StorageError::FileNotFound { .. } => {},
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_stale_tmp_files_purged_on_connect() {
    let temp = TempDir::new().unwrap();

    let stale = temp.path().join("record.mmtmp.42");
    std::fs::write(&stale, b"half written").unwrap();
    // Age the file past the staleness threshold.
    let old = std::time::SystemTime::now() - std::time::Duration::from_secs(600);
    let file = std::fs::File::options().write(true).open(&stale).unwrap();
    file.set_modified(old).unwrap();
    drop(file);

    let _storage = Storage::builder().root(temp.path()).connect().await.unwrap();

    assert!(!stale.exists(), "stale temp file must be removed during connect");
}
