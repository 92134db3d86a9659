use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dupsweep::actions::{classify, CleansePaths, Quarantine};
use dupsweep::duplicates::{DuplicateFinder, DuplicateIndex, FileLocation, FinderConfig};
use dupsweep::scanner::{Hasher, IgnoreRules, Walker};
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tempfile::TempDir;

// Helper to create a test directory with a specific structure
fn setup_test_dir(depth: usize, files_per_dir: usize) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    create_dir_recursive(temp_dir.path().to_path_buf(), depth, files_per_dir);
    temp_dir
}

fn create_dir_recursive(path: PathBuf, depth: usize, files_per_dir: usize) {
    if depth == 0 {
        return;
    }

    if !path.exists() {
        fs::create_dir_all(&path).expect("Failed to create dir");
    }

    for i in 0..files_per_dir {
        let file_path = path.join(format!("file_{}.txt", i));
        fs::write(file_path, "some content to make it a real file").expect("Failed to write file");
    }

    if depth > 1 {
        for i in 0..2 {
            // 2 subdirectories per level
            let sub_dir = path.join(format!("dir_{}", i));
            create_dir_recursive(sub_dir, depth - 1, files_per_dir);
        }
    }
}
// 1. Directory Walking Benchmarks
fn bench_walker(c: &mut Criterion) {
    let temp_dir = setup_test_dir(4, 10); // depth 4, 10 files per dir -> roughly 150 files
    let rules = IgnoreRules::default();

    c.bench_function("walker_150_files", |b| {
        b.iter(|| {
            let walker = Walker::new(temp_dir.path(), rules.clone());
            let files: Vec<_> = walker.walk().collect();
            black_box(files);
        })
    });
}

// 2. Hashing Benchmarks
fn bench_hasher(c: &mut Criterion) {
    let mut group = c.benchmark_group("hasher");
    let hasher = Hasher::new();

    for size_kb in [1, 1024, 10240] {
        // 1KB, 1MB, 10MB
        let data = vec![b'a'; size_kb * 1024];
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("bench_file.dat");
        fs::write(&file_path, &data).expect("Failed to write bench file");

        group.bench_with_input(format!("md5_{}KB", size_kb), &file_path, |b, path| {
            b.iter(|| {
                let hash = hasher.fingerprint(path).unwrap();
                black_box(hash);
            });
        });
    }
    group.finish();
}

// 3. Full Scan Benchmark
fn bench_scan(c: &mut Criterion) {
    let temp_dir = setup_test_dir(3, 10); // ~70 files
                                          // Create some duplicates
    let src = temp_dir.path().join("file_0.txt");
    if src.exists() {
        for i in 1..10 {
            let dst = temp_dir.path().join(format!("dup_{}.txt", i));
            fs::copy(&src, &dst).expect("Failed to copy duplicate");
        }
    }

    let mut group = c.benchmark_group("scan_approx_80_files");
    for threads in [1, 4] {
        let shutdown_flag = Arc::new(AtomicBool::new(false));
        let finder = DuplicateFinder::new(
            FinderConfig::default()
                .with_io_threads(threads)
                .with_shutdown_flag(shutdown_flag),
        );

        group.bench_function(format!("io_threads_{}", threads), |b| {
            b.iter(|| {
                let results = finder.find_duplicates(temp_dir.path()).unwrap();
                black_box(results);
            })
        });
    }
    group.finish();
}

// 4. Classification Benchmark
fn bench_classify(c: &mut Criterion) {
    let mut index = DuplicateIndex::new();
    for group in 0..5_000u32 {
        let fingerprint = Hasher::fingerprint_bytes(&group.to_le_bytes());
        for copy in 0..3 {
            index.insert(
                fingerprint,
                FileLocation::new(format!("/data/dir_{copy}/sub_{}", group % 50), format!("file_{group}.txt")),
            );
        }
    }

    let cleanse_paths = CleansePaths::new(["/data/dir_1", "/data/dir_2/sub_7"]);
    let quarantine = Quarantine::new("/quarantine");

    c.bench_function("classify_15000_locations", |b| {
        b.iter(|| {
            let plan = classify(black_box(&index), &cleanse_paths, &quarantine);
            black_box(plan);
        })
    });
}

criterion_group!(benches, bench_walker, bench_hasher, bench_scan, bench_classify);
criterion_main!(benches);
