//! # Insertion Benchmarks
//!
//! Measures row insertion through the Database facade for sequential and
//! shuffled key orders. Each iteration starts from a fresh database file
//! so split behavior is comparable across runs.
//!
//! ## Running
//!
//! ```bash
//! cargo bench --bench insertion
//! cargo bench --bench insertion -- sequential   # One order only
//! ```

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use tempfile::tempdir;
use unodb::{Database, Row};

const ROWS_PER_RUN: u32 = 100;

fn test_row(id: u32) -> Row {
    Row {
        id,
        username: format!("user{}", id),
        email: format!("person{}@example.com", id),
    }
}

fn fresh_db() -> (Database, tempfile::TempDir) {
    let dir = tempdir().unwrap();
    let db = Database::open(dir.path().join("bench.db")).unwrap();
    (db, dir)
}

fn bench_sequential_inserts(c: &mut Criterion) {
    c.bench_function("insert_sequential_100", |b| {
        b.iter_batched(
            fresh_db,
            |(mut db, _dir)| {
                for id in 0..ROWS_PER_RUN {
                    db.insert(&test_row(id)).unwrap();
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_shuffled_inserts(c: &mut Criterion) {
    // 73 is coprime to 100, so this visits every id once.
    let ids: Vec<u32> = (0..ROWS_PER_RUN).map(|i| (i * 73) % ROWS_PER_RUN).collect();

    c.bench_function("insert_shuffled_100", |b| {
        b.iter_batched(
            fresh_db,
            |(mut db, _dir)| {
                for &id in &ids {
                    db.insert(&test_row(id)).unwrap();
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_full_scan(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    let mut db = Database::open(dir.path().join("bench.db")).unwrap();
    for id in 0..ROWS_PER_RUN {
        db.insert(&test_row(id)).unwrap();
    }

    c.bench_function("select_all_100", |b| {
        b.iter(|| {
            let rows = db.select().unwrap();
            assert_eq!(rows.len(), ROWS_PER_RUN as usize);
        })
    });
}

criterion_group!(
    benches,
    bench_sequential_inserts,
    bench_shuffled_inserts,
    bench_full_scan
);
criterion_main!(benches);
