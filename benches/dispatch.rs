//! Dispatch benchmark suite.
//!
//! Benchmarks the bridge hot paths against an in-process echo host:
//! - Correlated request round trips, serial and concurrent
//! - Fire-and-forget enqueue throughput
//! - Event fan-out across listener counts
//!
//! Run with: cargo bench --bench dispatch
//! Results saved to: target/criterion/

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use serde_json::json;
use tokio::runtime::Runtime;

use webui_bridge::protocol::Response;
use webui_bridge::{BrowserProxy, Channel, FeatureId, RawChannel};

// ============================================================================
// Benchmark Parameters
// ============================================================================

const CONCURRENT_CALLS: &[usize] = &[1, 8, 64];
const LISTENER_COUNTS: &[usize] = &[1, 16, 128];

// ============================================================================
// Harness
// ============================================================================

/// Builds a proxy backed by a native end that echoes every request's
/// first argument back as the result.
fn echo_proxy() -> BrowserProxy {
    let (raw, mut native) = RawChannel::pair();
    let channel = Channel::new(raw);

    tokio::spawn(async move {
        while let Some(request) = native.next_request().await {
            let value = request.args.first().cloned().unwrap_or(json!(null));
            native.respond(&Response::success(request.id, value));
        }
    });

    BrowserProxy::new(FeatureId::new("bench"), channel)
}

// ============================================================================
// Benchmark: Request Round Trip
// ============================================================================

fn bench_request_round_trip(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    let mut group = c.benchmark_group("request_round_trip");

    for &calls in CONCURRENT_CALLS {
        group.bench_with_input(BenchmarkId::new("concurrent", calls), &calls, |b, &calls| {
            b.to_async(&rt).iter(|| async move {
                let proxy = echo_proxy();
                let futures: Vec<_> = (0..calls)
                    .map(|i| proxy.send_with_promise("echo", vec![json!(i)]))
                    .collect();
                for result in futures_util::future::join_all(futures).await {
                    result.expect("echo resolves");
                }
            });
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: Fire-and-Forget
// ============================================================================

fn bench_fire(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    c.bench_function("fire_enqueue_1000", |b| {
        b.to_async(&rt).iter(|| async {
            let proxy = echo_proxy();
            for i in 0..1000 {
                proxy.send("recordP3A", vec![json!("metric"), json!(i)]);
            }
        });
    });
}

// ============================================================================
// Benchmark: Listener Fan-Out
// ============================================================================

fn bench_listener_dispatch(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    let mut group = c.benchmark_group("listener_dispatch");

    for &count in LISTENER_COUNTS {
        group.bench_with_input(BenchmarkId::new("listeners", count), &count, |b, &count| {
            b.to_async(&rt).iter(|| async move {
                let proxy = echo_proxy();
                let hits = Arc::new(AtomicUsize::new(0));

                let handles: Vec<_> = (0..count)
                    .map(|_| {
                        let hits = Arc::clone(&hits);
                        proxy.add_listener("bench-event", move |_| {
                            hits.fetch_add(1, Ordering::Relaxed);
                        })
                    })
                    .collect();

                proxy
                    .listeners()
                    .dispatch(&webui_bridge::Event::new("bench-event", json!([])));
                assert_eq!(hits.load(Ordering::Relaxed), count);

                drop(handles);
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_request_round_trip,
    bench_fire,
    bench_listener_dispatch
);
criterion_main!(benches);
