use abuse_protection_service::core::RateLimiter;
use abuse_protection_service::models::RateLimitConfig;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn rate_limiter_benchmark(c: &mut Criterion) {
    c.bench_function("rate_limiter_check", |b| {
        let mut limiter = RateLimiter::new(RateLimitConfig::default());
        let mut now = 0u64;
        b.iter(|| {
            now += 7;
            black_box(limiter.check_request_at(black_box("203.0.113.7"), now))
        })
    });

    c.bench_function("rate_limiter_check_many_addresses", |b| {
        let mut limiter = RateLimiter::new(RateLimitConfig::default());
        let addresses: Vec<String> = (0..1_000).map(|i| format!("10.0.{}.{}", i / 256, i % 256)).collect();
        let mut now = 0u64;
        let mut i = 0usize;
        b.iter(|| {
            now += 7;
            i = (i + 1) % addresses.len();
            black_box(limiter.check_request_at(black_box(&addresses[i]), now))
        })
    });
}

criterion_group!(benches, rate_limiter_benchmark);
criterion_main!(benches);
