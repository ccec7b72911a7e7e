use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use braindriver_core::catalog::Catalog;
use braindriver_core::pool::{PoolBuilder, PoolSize};
use braindriver_core::traits::RngSource;

fn bench_build_pool(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_pool");
    let catalog = Arc::new(Catalog::builtin());
    let mut source = RngSource(StdRng::seed_from_u64(7));

    for (stage1, stage2) in [(6, 6), (20, 20)] {
        let builder = PoolBuilder::new(Arc::clone(&catalog), PoolSize { stage1, stage2 })
            .expect("sizes fit the built-in catalog");
        group.bench_function(format!("{stage1}+{stage2}"), |b| {
            b.iter(|| builder.build_pool(&mut source))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build_pool);
criterion_main!(benches);
