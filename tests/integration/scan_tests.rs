use dupsweep::duplicates::{scan, DuplicateFinder, FileLocation, FinderConfig, ScanReport};
use dupsweep::scanner::{Hasher, IgnoreMatch, IgnoreRules};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::tempdir;

fn write(path: &Path, content: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    File::create(path).unwrap().write_all(content).unwrap();
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let finder = DuplicateFinder::with_defaults();

    let (index, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert!(index.is_empty());
    assert_eq!(summary.files_hashed, 0);
    assert_eq!(summary.duplicate_groups, 0);
}

#[test]
fn test_scan_duplicates_and_unique() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(&root.join("a/x.txt"), b"same content");
    write(&root.join("b/x.txt"), b"same content");
    write(&root.join("c/y.txt"), b"different");

    let index = scan(root, &[]).unwrap();

    assert_eq!(index.len(), 2);
    assert_eq!(index.total_files(), 3);
    assert_eq!(index.duplicate_groups(), 1);

    let (_, group) = index.duplicates().next().unwrap();
    assert_eq!(
        group,
        &[
            FileLocation::new(root.join("a"), "x.txt"),
            FileLocation::new(root.join("b"), "x.txt"),
        ]
    );

    let report = ScanReport::from_index(&index);
    assert_eq!(
        report.appearing_once,
        vec![FileLocation::new(root.join("c"), "y.txt")]
    );
    assert_eq!(report.appearing_more_than_once.len(), 2);
}

#[test]
fn test_scan_fingerprint_matches_hasher() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("f.bin"), b"abc");

    let index = scan(dir.path(), &[]).unwrap();
    let (fingerprint, _) = index.iter().next().unwrap();

    assert_eq!(fingerprint.to_string(), "900150983cd24fb0d6963f7d28e17f72");
    assert_eq!(
        *fingerprint,
        Hasher::new().fingerprint(&dir.path().join("f.bin")).unwrap()
    );
}

#[test]
fn test_scan_binary_content_is_not_decoded() {
    let dir = tempdir().unwrap();
    // Invalid UTF-8 that a lossy decode would collapse to the same text
    write(&dir.path().join("a.bin"), &[0xff, 0xfe, 0x00]);
    write(&dir.path().join("b.bin"), &[0xfe, 0xff, 0x00]);

    let index = scan(dir.path(), &[]).unwrap();
    assert_eq!(index.len(), 2);
    assert_eq!(index.duplicate_groups(), 0);
}

#[test]
fn test_scan_skips_ignored_file_patterns() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(&root.join(".DS_Store"), b"meta");
    write(&root.join("VTS_01_0.BUP"), b"dvd");
    write(&root.join("VTS_01_0.IFO"), b"dvd");
    write(&root.join("VTS_01_1.VOB"), b"dvd");
    write(&root.join("movie.vob"), b"lowercase is kept");

    let finder = DuplicateFinder::with_defaults();
    let (index, summary) = finder.find_duplicates(root).unwrap();

    assert_eq!(index.total_files(), 1);
    assert_eq!(summary.files_ignored, 4);
}

#[test]
fn test_scan_ignored_dirs_substring() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(&root.join("notscratched/a.txt"), b"1");
    write(&root.join("scratch/b.txt"), b"2");
    write(&root.join("keep/c.txt"), b"3");

    // Substring matching also skips "notscratched"
    let index = scan(root, &["scratch".to_string()]).unwrap();
    let names: Vec<_> = index
        .iter()
        .flat_map(|(_, locs)| locs.iter().map(|l| l.file_name.clone()))
        .collect();
    assert_eq!(names, vec!["c.txt"]);
}

#[test]
fn test_scan_ignored_dirs_segment() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(&root.join("notscratched/a.txt"), b"1");
    write(&root.join("scratch/b.txt"), b"2");

    let rules = IgnoreRules {
        dir_match: IgnoreMatch::Segment,
        ..IgnoreRules::with_ignored_dirs(vec!["scratch".to_string()])
    };
    let finder = DuplicateFinder::new(FinderConfig::default().with_rules(rules));
    let (index, _) = finder.find_duplicates(root).unwrap();

    assert_eq!(index.total_files(), 1);
    let (_, locs) = index.iter().next().unwrap();
    assert_eq!(locs[0].file_name, "a.txt");
}

#[test]
fn test_scan_is_idempotent() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    for i in 0..20 {
        write(&root.join(format!("d{}/f{}.txt", i % 4, i)), format!("{}", i % 5).as_bytes());
    }

    let first = scan(root, &[]).unwrap();
    let second = scan(root, &[]).unwrap();
    assert_eq!(first, second);
    assert!(first.same_content(&second));
}

#[test]
fn test_scan_parallel_matches_sequential() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    for i in 0..30 {
        write(&root.join(format!("f{i:02}.txt")), format!("{}", i % 7).as_bytes());
    }

    let sequential = DuplicateFinder::with_defaults()
        .find_duplicates(root)
        .unwrap()
        .0;
    let parallel = DuplicateFinder::new(FinderConfig::default().with_io_threads(4))
        .find_duplicates(root)
        .unwrap()
        .0;
    assert_eq!(sequential, parallel);
}

#[test]
fn test_scan_excluded_index_file() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(&root.join("a.txt"), b"a");
    write(&root.join("files_and_md5_sums.json"), b"{}");

    let rules = IgnoreRules::default().exclude_path(root.join("files_and_md5_sums.json"));
    let finder = DuplicateFinder::new(FinderConfig::default().with_rules(rules));
    let (index, _) = finder.find_duplicates(root).unwrap();
    assert_eq!(index.total_files(), 1);
}

#[cfg(unix)]
#[test]
fn test_scan_broken_symlink_is_collected() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(&root.join("a.txt"), b"a");
    std::os::unix::fs::symlink(root.join("missing"), root.join("dangling")).unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (index, summary) = finder.find_duplicates(root).unwrap();
    assert_eq!(index.total_files(), 1);
    assert!(summary.has_failures());

    // The strict entry point aborts instead
    assert!(scan(root, &[]).is_err());
}

#[test]
fn test_scan_missing_root() {
    let dir = tempdir().unwrap();
    assert!(scan(&dir.path().join("nope"), &[]).is_err());
}
