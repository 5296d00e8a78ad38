//! Event listeners and fire-and-forget over an in-process channel.
//!
//! Demonstrates:
//! - Building a Channel over an in-process RawChannel pair
//! - Scoped listener handles: drop unregisters, detach pins
//! - Fire-and-forget commands observed on the native end
//!
//! Usage:
//!   cargo run --example 002_event_listeners
//!   cargo run --example 002_event_listeners -- --debug

mod common;

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use serde_json::json;
use webui_bridge::{Channel, ProxyRegistry, RawChannel, Result};

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    let args = common::Args::parse();
    common::init_logging(args.debug);

    if let Err(e) = run().await {
        eprintln!("\n[ERROR] {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    println!("=== 002: Event Listeners ===\n");

    let (raw, mut native) = RawChannel::pair();
    let registry = ProxyRegistry::new(Channel::new(raw));
    let proxy = registry.instance("sync");

    // ========================================================================
    // Listener Registration
    // ========================================================================

    println!("[1] Registering listeners...");
    let hits = Arc::new(AtomicUsize::new(0));

    let hits_scoped = Arc::clone(&hits);
    let scoped = proxy.add_listener("device-info-changed", move |payload| {
        println!("    [scoped]  device-info-changed: {payload}");
        hits_scoped.fetch_add(1, Ordering::SeqCst);
    });

    let hits_pinned = Arc::clone(&hits);
    proxy
        .add_listener("device-info-changed", move |payload| {
            println!("    [pinned]  device-info-changed: {payload}");
            hits_pinned.fetch_add(1, Ordering::SeqCst);
        })
        .detach();
    println!("    ✓ Two listeners registered\n");

    // ========================================================================
    // Event Delivery
    // ========================================================================

    println!("[2] Emitting an event...");
    native.emit("device-info-changed", json!([{"id": 1}]));
    tokio::time::sleep(Duration::from_millis(50)).await;
    println!("    ✓ {} callbacks ran\n", hits.load(Ordering::SeqCst));

    println!("[3] Dropping the scoped handle...");
    drop(scoped);
    native.emit("device-info-changed", json!([{"id": 1}, {"id": 2}]));
    tokio::time::sleep(Duration::from_millis(50)).await;
    println!(
        "    ✓ {} callbacks total (pinned listener only)\n",
        hits.load(Ordering::SeqCst)
    );

    // ========================================================================
    // Fire-and-Forget
    // ========================================================================

    println!("[4] Fire-and-forget command...");
    proxy.send(
        "recordP3A",
        vec![json!("Brave.NTP.CustomizeUsageStatus"), json!(2)],
    );
    let request = native.next_request().await.expect("frame on native end");
    println!(
        "    ✓ Native end observed '{}' with args {:?}\n",
        request.method, request.args
    );

    registry.shutdown();
    println!("Done.");
    Ok(())
}
