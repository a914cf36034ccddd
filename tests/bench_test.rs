//! Benchmark tests for critical operations
//!
//! Run with: cargo test --release bench -- --ignored --nocapture

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::json;
use tempfile::NamedTempFile;

use templink::database::{init_db, RedbLinkStore};
use templink::model::CreateRequest;
use templink::service::LinkService;

/// Prints timing figures for a finished benchmark loop
fn report(name: &str, iterations: usize, duration: Duration) {
    let avg_ms = duration.as_millis() as f64 / iterations as f64;
    let ops_per_sec = (iterations as f64 / duration.as_secs_f64()) as u64;

    println!("  {} ({} iterations)", name, iterations);
    println!("    Total time: {:?}", duration);
    println!("    Avg time: {:.3}ms", avg_ms);
    println!("    Throughput: {} ops/sec\n", ops_per_sec);
}

fn setup_service() -> (LinkService, NamedTempFile) {
    let temp_db = NamedTempFile::new().unwrap();
    let db = init_db(temp_db.path().to_str().unwrap()).unwrap();
    let store = RedbLinkStore::new(Arc::new(db));
    (LinkService::new(Arc::new(store), "http://localhost:8000"), temp_db)
}

fn clicks_request(i: usize, max_clicks: u64) -> CreateRequest {
    serde_json::from_value(json!({
        "redirectTo": format!("https://example.com/bench{}", i),
        "type": "CLICKS",
        "maxClicks": max_clicks
    }))
    .unwrap()
}

fn days_request(i: usize) -> CreateRequest {
    serde_json::from_value(json!({
        "redirectTo": format!("https://example.com/days{}", i),
        "type": "DAYS",
        "expirationDate": "2099-12-31T23:59:59.999Z"
    }))
    .unwrap()
}

#[tokio::test]
#[ignore]
async fn bench_create_links() {
    println!("\n=== Benchmark: Create Links ===\n");

    let (service, _temp_db) = setup_service();
    let iterations = 1000;

    let start = Instant::now();
    for i in 0..iterations {
        service.create(clicks_request(i, 10)).await.unwrap();
    }
    report("Create CLICKS link (insert + short id)", iterations, start.elapsed());

    let start = Instant::now();
    for i in 0..iterations {
        service.create(days_request(i)).await.unwrap();
    }
    report("Create DAYS link (insert + short id)", iterations, start.elapsed());
}

#[tokio::test]
#[ignore]
async fn bench_visit_links() {
    println!("\n=== Benchmark: Visit Links ===\n");

    let (service, _temp_db) = setup_service();

    println!("  Preparing: Creating 1000 links...");
    let mut short_ids = Vec::with_capacity(1000);
    for i in 0..1000 {
        let url = service.create(clicks_request(i, u64::MAX)).await.unwrap();
        short_ids.push(url.rsplit('/').next().unwrap().to_string());
    }
    println!("  Done!\n");

    let start = Instant::now();
    for short_id in &short_ids {
        service.visit(short_id).await.unwrap();
    }
    report("Visit with click counting", short_ids.len(), start.elapsed());

    let start = Instant::now();
    for _ in 0..1000 {
        service.visit("nope42").await.unwrap();
    }
    report("Visit unknown short id", 1000, start.elapsed());
}

#[tokio::test(flavor = "multi_thread")]
#[ignore]
async fn bench_concurrent_visits() {
    println!("\n=== Benchmark: Concurrent Visits ===\n");

    let (service, _temp_db) = setup_service();
    let url = service.create(clicks_request(0, 100_000)).await.unwrap();
    let short_id = url.rsplit('/').next().unwrap().to_string();

    let num_tasks = 100;
    let ops_per_task = 10;

    println!(
        "  Running {} concurrent tasks with {} visits each...",
        num_tasks, ops_per_task
    );

    let start = Instant::now();
    let mut handles = vec![];

    for _ in 0..num_tasks {
        let service = service.clone();
        let short_id = short_id.clone();
        handles.push(tokio::spawn(async move {
            for _ in 0..ops_per_task {
                service.visit(&short_id).await.unwrap();
            }
        }));
    }

    for handle in handles {
        handle.await.unwrap();
    }

    let duration = start.elapsed();
    let total_ops = num_tasks * ops_per_task;
    let clicks = service
        .store()
        .find_by_short_id(&short_id)
        .unwrap()
        .unwrap()
        .clicks;

    println!("  Total visits: {}", total_ops);
    // Unsynchronized read-then-write: concurrent visits can overwrite each other's count.
    println!("  Recorded clicks: {}", clicks);
    println!("  Total time: {:?}", duration);
    println!(
        "  Throughput: {:.0} ops/sec\n",
        total_ops as f64 / duration.as_secs_f64()
    );
}
