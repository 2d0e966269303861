// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use privalert_node::{
    api::{start_server, AppState},
    config::NodeConfig,
    inference::InferenceClient,
    pii::NegativePhraseClassifier,
    version,
};
use std::{env, sync::Arc};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before anything reads the environment
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    println!("🚀 Starting PrivAlert Node...\n");
    println!("📦 BUILD VERSION: {}", version::VERSION);
    println!("📅 Build Date: {}", version::BUILD_DATE);
    println!();

    // Parse environment variables for configuration
    let config = NodeConfig::from_env()?;

    // Construct the provider client once; handlers share it through AppState
    println!("🧠 Initializing inference client...");
    let inference = Arc::new(InferenceClient::new(&config.provider)?);
    println!("✅ Inference client ready");
    println!("   Vision model: {}", config.provider.vision_model);
    println!("   Text model:   {}", config.provider.text_model);

    let state = AppState {
        inference,
        classifier: Arc::new(NegativePhraseClassifier),
    };

    println!("\n🌐 Starting API server on http://0.0.0.0:{}", config.port);
    println!("\nAPI Endpoints:");
    println!("  Health:       http://localhost:{}/health", config.port);
    println!(
        "  Analyze:      POST http://localhost:{}/analyze",
        config.port
    );
    println!("\nTest with curl:");
    println!("  curl -X POST http://localhost:{}/analyze \\", config.port);
    println!("    -F 'image=@photo.jpg' \\");
    println!("    -F 'prompt=Describe this image'");
    println!("\nPress Ctrl+C to shutdown...\n");

    start_server(state, config.port).await
}
