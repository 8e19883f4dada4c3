use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use pebble_core::{DEFAULT_MARKER_KEY, ManualClock, SessionMap};
use pebble_session::{FlashAge, InMemorySessionStore, Marker, MarkerTable, Session};
use serde_json::json;
use std::sync::Arc;

const NOW: i64 = 1_700_000_000;

/// `size` values, every other one tracked, cycling through all marker kinds.
fn build(size: usize) -> (SessionMap, MarkerTable) {
    let mut data = SessionMap::new();
    let mut table = MarkerTable::new();

    for i in 0..size {
        let key = format!("key_{i}");
        data.insert(key.clone(), json!({ "index": i }));
        if i % 2 == 0 {
            let marker = match i % 8 {
                0 => Marker::Flash(FlashAge::New),
                2 => Marker::Flash(FlashAge::Old),
                4 => Marker::Temp(NOW - 1),
                _ => Marker::Temp(NOW + 3_600),
            };
            table.insert(key, marker);
        }
    }

    (data, table)
}

fn benchmark_sweep(c: &mut Criterion) {
    for size in [10, 100, 1_000] {
        c.bench_function(&format!("sweep_{size}_keys"), |b| {
            b.iter_batched(
                || build(size),
                |(mut data, mut table)| black_box(table.sweep(&mut data, NOW)),
                BatchSize::SmallInput,
            );
        });
    }
}

fn benchmark_extract(c: &mut Criterion) {
    let (mut data, table) = build(1_000);
    if let Some(encoded) = table.encode() {
        data.insert(DEFAULT_MARKER_KEY.to_string(), encoded);
    }

    c.bench_function("extract_1000_keys", |b| {
        b.iter_batched(
            || data.clone(),
            |mut data| black_box(MarkerTable::extract(&mut data, DEFAULT_MARKER_KEY)),
            BatchSize::SmallInput,
        );
    });
}

fn benchmark_open_close(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let (data, table) = build(100);
    let mut seeded = data;
    if let Some(encoded) = table.encode() {
        seeded.insert(DEFAULT_MARKER_KEY.to_string(), encoded);
    }

    c.bench_function("open_close_100_keys", |b| {
        b.to_async(&rt).iter(|| {
            let seeded = seeded.clone();
            async move {
                let store = Arc::new(InMemorySessionStore::new());
                store.insert("bench", seeded);
                let mut session =
                    Session::new(store).with_clock(Arc::new(ManualClock::new(NOW)));
                session.open_with_id("bench").await.unwrap();
                session.set_flash("notice", "saved").unwrap();
                session.close().await.unwrap();
            }
        });
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default();
    targets = benchmark_sweep, benchmark_extract, benchmark_open_close
}
criterion_main!(benches);
