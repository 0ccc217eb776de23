// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::Parser;
use rashtra_ai_node::{
    api::{start_server, AppState},
    log_filter,
    vision::ExpertModelManager,
    NodeConfig,
};
use std::env;
use tokio::signal;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging, RUST_LOG defaults to info
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(env::var("RUST_LOG").ok().as_deref()))
        .init();

    let config = NodeConfig::parse();
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

    println!("🚀 Starting Rashtra AI Node...\n");
    println!("📦 BUILD VERSION: {}", rashtra_ai_node::version::VERSION);
    println!("📅 Build Date: {}", rashtra_ai_node::version::BUILD_DATE);
    println!(
        "🧩 Features: {}",
        rashtra_ai_node::version::FEATURES.join(", ")
    );
    println!();
    tracing::info!("{}", rashtra_ai_node::version::get_version_string());

    // Load both experts once; a failed load leaves that expert unavailable
    println!("🧠 Loading detection experts...");
    let models = ExpertModelManager::load(&config.expert_model_config());
    println!(
        "   Model 1 (pothole):        {}",
        if models.has_pothole() { "✅ ready" } else { "❌ not loaded" }
    );
    println!(
        "   Model 2 (general damage): {}",
        if models.has_general_damage() { "✅ ready" } else { "❌ not loaded" }
    );

    let registry = models.into_registry(config.pothole_profile(), config.damage_profile());
    if registry.loaded_count() == 0 {
        tracing::warn!("⚠️ No expert loaded, every detection request will return 503");
    }

    let state = AppState::new(registry, config.max_upload_bytes);

    println!("\n🌐 API listening on http://{}", config.listen);
    println!("   POST /api/detect/potholes");
    println!("   POST /api/detect/general-damage");
    println!("   POST /api/detect");
    println!("   GET  /health\n");

    start_server(config.listen, state, shutdown_signal()).await?;

    println!("👋 Rashtra AI Node stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
