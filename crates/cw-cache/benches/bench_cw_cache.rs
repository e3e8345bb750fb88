use criterion::{black_box, criterion_group, criterion_main, Criterion};
use cw_cache::{generate_key, ResultCache};
use cw_core::CacheConfig;

fn bench_cache(c: &mut Criterion) {
    c.bench_function("generate_key", |b| {
        b.iter(|| black_box(generate_key("Hello, how are you doing today?", "gpt-4")))
    });

    let cache = ResultCache::new(&CacheConfig { max_size: 256, default_ttl_seconds: None }).unwrap();
    let keys: Vec<String> = (0..512).map(|i| generate_key(&format!("prompt {}", i), "gpt-4")).collect();

    c.bench_function("set_get_512_keys_lru_256", |b| {
        b.iter(|| {
            for key in &keys {
                if cache.get(key).is_none() {
                    cache.set(key.clone(), "cached answer");
                }
            }
        })
    });
}

criterion_group!(benches, bench_cache);
criterion_main!(benches);
