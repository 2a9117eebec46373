use amm_pool::{AssetId, InvariantMode};
use amm_txscript::{CovenantCommitment, CovenantScript};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn benchmark_covenant(c: &mut Criterion) {
    let asset_a = AssetId::from_bytes([0x11; 32]);
    let asset_b = AssetId::from_bytes([0x22; 32]);
    let product = 100_000_000u128 * 200_000_000;

    let mut group = c.benchmark_group("covenant");
    group.bench_function("build", |b| {
        b.iter(|| CovenantScript::build(black_box(asset_a), black_box(asset_b), black_box(product), InvariantMode::Genesis).unwrap())
    });
    let covenant = CovenantScript::build(asset_a, asset_b, product, InvariantMode::RollingPrevious).unwrap();
    group.bench_function("commit", |b| b.iter(|| CovenantCommitment::with_nums_key(black_box(&covenant)).unwrap()));
    group.finish();
}

criterion_group!(benches, benchmark_covenant);
criterion_main!(benches);
