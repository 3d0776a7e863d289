use criterion::{black_box, criterion_group, criterion_main, Criterion};
use indexed_skiplist::SkipList;

fn filled(upper: u32) -> SkipList<u32> {
    let mut sk = SkipList::with_seed(16, 0);
    for i in 0..upper {
        sk.insert(i);
    }
    sk.relevel();
    sk
}

fn iter_bench(c: &mut Criterion) {
    let sk = filled(500);
    c.bench_function("iter(500)", |b| {
        b.iter(|| {
            for i in sk.iter() {
                black_box(i);
            }
        })
    });
}

fn bench_insert_linear_500(c: &mut Criterion) {
    c.bench_function("insert_500", |b| {
        b.iter(|| {
            let mut sk = SkipList::<u32>::with_seed(8, 0);
            let upper = 500;
            for i in 0..upper {
                black_box(sk.insert(i));
            }
        })
    });
}

fn bench_find_50000(c: &mut Criterion) {
    let sk = filled(50000);
    c.bench_function("find_50000", |b| {
        b.iter(|| {
            black_box(sk.find(&33333));
        })
    });
}

fn bench_get_at(c: &mut Criterion) {
    let sk = filled(5000);
    c.bench_function("get_at", |b| {
        b.iter(|| {
            black_box(sk.get_at(4001));
        })
    });
}

fn bench_index_of(c: &mut Criterion) {
    let sk = filled(5000);
    c.bench_function("index_of", |b| {
        b.iter(|| {
            black_box(sk.index_of(&4001));
        })
    });
}

fn bench_remove_insert(c: &mut Criterion) {
    let mut sk = filled(5000);
    c.bench_function("remove_insert", |b| {
        b.iter(|| {
            black_box(sk.remove(&2500));
            black_box(sk.insert(2500));
        })
    });
}

fn bench_relevel_5000(c: &mut Criterion) {
    let mut sk = filled(5000);
    c.bench_function("relevel_5000", |b| b.iter(|| sk.relevel()));
}

criterion_group!(
    benches,
    iter_bench,
    bench_insert_linear_500,
    bench_find_50000,
    bench_get_at,
    bench_index_of,
    bench_remove_insert,
    bench_relevel_5000,
);

criterion_main!(benches);
