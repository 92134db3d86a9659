use dupsweep::duplicates::{scan, DuplicateIndex, FileLocation};
use dupsweep::store::{index_path, load_index, save_index, StoreError, INDEX_FILE_NAME};
use serde_json::Value;
use std::fs;
use tempfile::tempdir;

fn populated_root() -> tempfile::TempDir {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("a")).unwrap();
    fs::create_dir_all(dir.path().join("b")).unwrap();
    fs::write(dir.path().join("a/x.txt"), "same").unwrap();
    fs::write(dir.path().join("b/x.txt"), "same").unwrap();
    fs::write(dir.path().join("a/y.txt"), "other").unwrap();
    dir
}

#[test]
fn test_index_round_trip_after_scan() {
    let dir = populated_root();
    let index = scan(dir.path(), &[]).unwrap();

    let path = save_index(dir.path(), &index).unwrap();
    assert_eq!(path, index_path(dir.path()));
    assert_eq!(path.file_name().unwrap(), INDEX_FILE_NAME);

    let loaded = load_index(&path).unwrap();
    assert_eq!(loaded.index, index);
    assert!(loaded.created_at.is_some());
}

#[test]
fn test_index_document_shape() {
    let dir = populated_root();
    let index = scan(dir.path(), &[]).unwrap();
    let path = save_index(dir.path(), &index).unwrap();

    let value: Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(value["version"], 1);
    assert!(value["checksum"].as_str().unwrap().len() == 64);

    let files = value["files"].as_object().unwrap();
    assert_eq!(files.len(), 2);
    for (fingerprint, locations) in files {
        assert_eq!(fingerprint.len(), 32);
        for pair in locations.as_array().unwrap() {
            let pair = pair.as_array().unwrap();
            assert_eq!(pair.len(), 2);
            assert!(pair[0].is_string() && pair[1].is_string());
        }
    }
}

#[test]
fn test_legacy_index_is_accepted() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(INDEX_FILE_NAME);
    fs::write(
        &path,
        r#"{
  "acbd18db4cc2f85cedef654fccc4a4d8": [
    ["/root/a", "foo.txt"],
    ["/root/b dir", "foo.txt"]
  ],
  "37b51d194a7513e45b56f6524f2d51f2": [
    ["/root/c", "bar.txt"]
  ]
}"#,
    )
    .unwrap();

    let loaded = load_index(&path).unwrap();
    assert_eq!(loaded.version, None);
    assert_eq!(loaded.index.len(), 2);
    assert_eq!(loaded.index.duplicate_groups(), 1);

    let mut expected = DuplicateIndex::new();
    let fp = "acbd18db4cc2f85cedef654fccc4a4d8".parse().unwrap();
    expected.insert(fp, FileLocation::new("/root/a", "foo.txt"));
    expected.insert(fp, FileLocation::new("/root/b dir", "foo.txt"));
    let fp = "37b51d194a7513e45b56f6524f2d51f2".parse().unwrap();
    expected.insert(fp, FileLocation::new("/root/c", "bar.txt"));
    assert_eq!(loaded.index, expected);
}

#[test]
fn test_truncated_index_is_corruption() {
    let dir = populated_root();
    let index = scan(dir.path(), &[]).unwrap();
    let path = save_index(dir.path(), &index).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    fs::write(&path, &content[..content.len() / 2]).unwrap();

    let err = load_index(&path).unwrap_err();
    assert!(err.is_corruption());
    assert!(matches!(err, StoreError::Corrupted { .. }));
}

#[test]
fn test_edited_index_fails_checksum() {
    let dir = populated_root();
    let index = scan(dir.path(), &[]).unwrap();
    let path = save_index(dir.path(), &index).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    fs::write(&path, content.replace("y.txt", "z.txt")).unwrap();

    assert!(matches!(
        load_index(&path).unwrap_err(),
        StoreError::ChecksumMismatch { .. }
    ));
}
