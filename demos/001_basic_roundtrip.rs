//! Basic request round trip over the WebSocket binding.
//!
//! Demonstrates:
//! - Binding a SocketHost and accepting a native host connection
//! - Building a Channel and ProxyRegistry over the raw channel
//! - Promise-style and typed requests through a feature proxy
//!
//! The native host side is played by a plain WebSocket client in this
//! process, speaking the wire format directly.
//!
//! Usage:
//!   cargo run --example 001_basic_roundtrip
//!   cargo run --example 001_basic_roundtrip -- --debug

mod common;

// ============================================================================
// Imports
// ============================================================================

use std::net::{IpAddr, Ipv4Addr};

use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio_tungstenite::tungstenite::Message;
use webui_bridge::protocol::{Request, Response};
use webui_bridge::transport::socket::SocketHost;
use webui_bridge::{Channel, ProxyRegistry, Result, StringsCommand};

// ============================================================================
// Native Host
// ============================================================================

/// Dials the endpoint and answers requests the way a native host would.
async fn run_native_host(ws_url: String) {
    let (ws, _) = tokio_tungstenite::connect_async(&ws_url)
        .await
        .expect("dial endpoint");
    let (mut write, mut read) = ws.split();

    while let Some(Ok(Message::Text(text))) = read.next().await {
        let request: Request = serde_json::from_str(&text).expect("request frame");

        let response = match request.method.as_str() {
            "getPluralString" => {
                Response::success(request.id, json!(format!("{} items", request.args[1])))
            }
            "getString" => Response::success(request.id, json!("Brave Sync")),
            other => Response::unknown_method(request.id, other),
        };

        let frame = serde_json::to_string(&response).expect("serialize response");
        if write.send(Message::Text(frame.into())).await.is_err() {
            break;
        }
    }
}

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
    println!("=== 001: Basic Roundtrip ===\n");

    // ========================================================================
    // Bind and Connect
    // ========================================================================

    println!("[1] Binding socket host...");
    let host = SocketHost::bind(IpAddr::V4(Ipv4Addr::LOCALHOST), 0).await?;
    let ws_url = host.ws_url();
    println!("    ✓ Listening on {ws_url}\n");

    let native = tokio::spawn(run_native_host(ws_url));

    println!("[2] Accepting the native host...");
    let raw = host.accept().await?;
    let registry = ProxyRegistry::new(Channel::new(raw));
    println!("    ✓ Channel up\n");

    // ========================================================================
    // Requests
    // ========================================================================

    println!("[3] Promise-style request...");
    let proxy = registry.instance("new-tab");
    let text = proxy
        .send_with_promise("getPluralString", vec![json!("itemsKey"), json!(5)])
        .await?;
    println!("    ✓ getPluralString -> {text}\n");

    println!("[4] Typed request...");
    let title = proxy
        .call(StringsCommand::GetString {
            key: "braveSyncTitle".to_string(),
        })
        .await?;
    println!("    ✓ getString -> {title}\n");

    // ========================================================================
    // Teardown
    // ========================================================================

    registry.shutdown();
    native.abort();
    println!("Done.");
    Ok(())
}
