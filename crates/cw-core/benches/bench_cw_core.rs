use criterion::{black_box, criterion_group, criterion_main, Criterion};
use cw_core::config::CostwiseConfig;

fn bench_config(c: &mut Criterion) {
    c.bench_function("config_default_1000", |b| {
        b.iter(|| {
            for _ in 0..1000 {
                black_box(CostwiseConfig::default());
            }
        })
    });

    let json = serde_json::to_string(&CostwiseConfig::default()).unwrap();
    c.bench_function("config_parse_and_validate", |b| {
        b.iter(|| black_box(CostwiseConfig::from_json_str(&json).unwrap()))
    });
}

criterion_group!(benches, bench_config);
criterion_main!(benches);
