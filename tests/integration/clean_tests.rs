use dupsweep::actions::{apply, classify, CleansePaths, Quarantine, RelocateConfig};
use dupsweep::duplicates::{scan, FileLocation};
use dupsweep::store::{load_index, prune_stale, save_index};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// Root with `a/x.txt` and `b/x.txt` identical and `c/y.txt` unique.
fn scenario_tree(root: &Path) {
    for (dir, name, content) in [
        ("a", "x.txt", "duplicate"),
        ("b", "x.txt", "duplicate"),
        ("c", "y.txt", "unique"),
    ] {
        fs::create_dir_all(root.join(dir)).unwrap();
        fs::write(root.join(dir).join(name), content).unwrap();
    }
}

#[test]
fn test_clean_relocates_only_cleanse_side() {
    let dir = tempdir().unwrap();
    let quarantine_dir = tempdir().unwrap();
    let root = dir.path();
    scenario_tree(root);

    let index = scan(root, &[]).unwrap();
    let quarantine = Quarantine::new(quarantine_dir.path());
    let plan = classify(&index, &CleansePaths::new([root.join("b")]), &quarantine);

    assert_eq!(plan.total_files, 3);
    assert_eq!(plan.to_relocate(), 1);
    assert_eq!(plan.decisions[0].keep, vec![FileLocation::new(root.join("a"), "x.txt")]);

    let summary = apply(&plan.actions, &RelocateConfig::default(), None).unwrap();
    assert!(summary.all_succeeded());

    let target = quarantine
        .target_dir_for(&root.join("b"))
        .join("x.txt");
    assert_eq!(summary.relocated[0].target, target);
    assert!(target.is_file());
    assert!(!root.join("b/x.txt").exists());
    assert!(root.join("a/x.txt").exists());
    assert!(root.join("c/y.txt").exists());
}

#[test]
fn test_clean_all_copies_under_cleanse_paths_is_noop() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    scenario_tree(root);

    let index = scan(root, &[]).unwrap();
    let plan = classify(
        &index,
        &CleansePaths::new([root.join("a"), root.join("b")]),
        &Quarantine::new(root.join("q")),
    );

    assert!(plan.is_empty());
    let summary = apply(&plan.actions, &RelocateConfig::default(), None).unwrap();
    assert_eq!(summary.success_count(), 0);
    assert!(root.join("a/x.txt").exists());
    assert!(root.join("b/x.txt").exists());
}

#[test]
fn test_clean_sibling_prefix_not_matched() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("b")).unwrap();
    fs::create_dir_all(root.join("bb")).unwrap();
    fs::write(root.join("b/f"), "same").unwrap();
    fs::write(root.join("bb/f"), "same").unwrap();

    let index = scan(root, &[]).unwrap();
    let plan = classify(
        &index,
        &CleansePaths::new([root.join("b")]),
        &Quarantine::new("/q"),
    );

    assert_eq!(plan.to_relocate(), 1);
    assert_eq!(plan.actions[0].source, FileLocation::new(root.join("b"), "f"));
}

#[test]
fn test_clean_from_persisted_index_with_stale_entry() {
    let dir = tempdir().unwrap();
    let quarantine_dir = tempdir().unwrap();
    let root = dir.path();
    scenario_tree(root);
    fs::create_dir_all(root.join("d")).unwrap();
    fs::write(root.join("d/x.txt"), "duplicate").unwrap();

    let index = scan(root, &[]).unwrap();
    let path = save_index(root, &index).unwrap();

    // Deleted between scan and clean
    fs::remove_file(root.join("d/x.txt")).unwrap();

    let loaded = load_index(&path).unwrap();
    assert_eq!(loaded.index, index);

    let (fresh, stale) = prune_stale(&loaded.index);
    assert_eq!(stale, vec![FileLocation::new(root.join("d"), "x.txt")]);

    let plan = classify(
        &fresh,
        &CleansePaths::new([root.join("b"), root.join("d")]),
        &Quarantine::new(quarantine_dir.path()),
    );
    assert_eq!(plan.to_relocate(), 1);

    let summary = apply(&plan.actions, &RelocateConfig::default(), None).unwrap();
    assert!(summary.all_succeeded());
    assert!(!root.join("b/x.txt").exists());
}

#[test]
fn test_clean_demo_matches_real_pairs() {
    let dir = tempdir().unwrap();
    let quarantine_dir = tempdir().unwrap();
    let root = dir.path();
    scenario_tree(root);

    let index = scan(root, &[]).unwrap();
    let plan = classify(
        &index,
        &CleansePaths::new([root.join("b")]),
        &Quarantine::new(quarantine_dir.path().join("q")),
    );

    let demo = apply(&plan.actions, &RelocateConfig::demo(), None).unwrap();
    assert!(root.join("b/x.txt").exists());
    assert!(!quarantine_dir.path().join("q").exists());

    let real = apply(&plan.actions, &RelocateConfig::default(), None).unwrap();
    assert_eq!(demo.relocated, real.relocated);
    assert!(!root.join("b/x.txt").exists());
}
