use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use engine::{Engine, IndexType, Options};
use tempfile::tempdir;

const N_KEYS: usize = 10_000;
const VALUE_SIZE: usize = 100;

fn open_engine(dir: &std::path::Path) -> Engine {
    Engine::open(Options {
        dir_path: dir.to_path_buf(),
        data_file_size: 64 * 1024 * 1024,
        sync_writes: false,
        index_type: IndexType::BTree,
    })
    .unwrap()
}

fn populate(engine: &Engine) {
    for i in 0..N_KEYS {
        engine
            .put(format!("key{}", i).into_bytes(), vec![b'x'; VALUE_SIZE])
            .unwrap();
    }
}

fn put_benchmark(c: &mut Criterion) {
    c.bench_function("engine_put_10k", |b| {
        b.iter_batched(
            || {
                let dir = tempdir().unwrap();
                let engine = open_engine(dir.path());
                (dir, engine)
            },
            |(_dir, engine)| {
                populate(&engine);
            },
            BatchSize::SmallInput,
        );
    });
}

fn get_hit_benchmark(c: &mut Criterion) {
    c.bench_function("engine_get_hit_10k", |b| {
        b.iter_batched(
            || {
                let dir = tempdir().unwrap();
                let engine = open_engine(dir.path());
                populate(&engine);
                (dir, engine)
            },
            |(_dir, engine)| {
                for i in 0..N_KEYS {
                    let key = format!("key{}", i).into_bytes();
                    let v = engine.get(&key).unwrap();
                    assert_eq!(v.len(), VALUE_SIZE);
                }
            },
            BatchSize::LargeInput,
        );
    });
}

fn reopen_benchmark(c: &mut Criterion) {
    c.bench_function("engine_reopen_10k", |b| {
        b.iter_batched(
            || {
                let dir = tempdir().unwrap();
                {
                    let engine = open_engine(dir.path());
                    populate(&engine);
                }
                dir
            },
            |dir| {
                let engine = open_engine(dir.path());
                assert_eq!(engine.list_keys().len(), N_KEYS);
            },
            BatchSize::LargeInput,
        );
    });
}

criterion_group!(
    benches,
    put_benchmark,
    get_hit_benchmark,
    reopen_benchmark
);
criterion_main!(benches);
