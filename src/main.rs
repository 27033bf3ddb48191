use std::sync::Arc;

use ankh_clients::{HttpOcrEngine, HttpTranslator};
use ankh_engine::{GlyphMap, LanguageConfig, Pipeline};
use ankh_ledger::WordLedger;
use ankh_server::ServerConfig;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting ankh server");

    let config = ServerConfig::from_env();

    // Glyph map: configured file or the built-in table
    let glyphs = match &config.glyph_map_path {
        Some(path) => {
            let map = GlyphMap::from_path(path).expect("Failed to load glyph map");
            tracing::info!(path = %path.display(), "Glyph map loaded");
            map
        }
        None => GlyphMap::builtin(),
    };

    // Word ledger
    if let Some(parent) = config.ledger_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).expect("Failed to create ledger directory");
    }
    let ledger = WordLedger::open(&config.ledger_path);
    tracing::info!(path = %config.ledger_path.display(), "Word ledger ready");

    // Collaborators
    let translator = Arc::new(HttpTranslator::new(
        &config.translate_base_url,
        config.translate_timeout(),
    ));
    let ocr = Arc::new(HttpOcrEngine::new(&config.ocr_base_url, config.ocr_timeout()));

    let languages = LanguageConfig {
        source_lang: config.source_lang.clone(),
        target_lang: config.target_lang.clone(),
        ocr_languages: config.ocr_languages.clone(),
    };

    let pipeline = Arc::new(Pipeline::new(
        Arc::new(glyphs),
        ledger,
        translator,
        ocr,
        languages,
    ));

    // Start server
    let handle = ankh_server::start(config, pipeline)
        .await
        .expect("Failed to start server");

    tracing::info!(port = handle.port, "ankh server ready");

    // Wait for shutdown signal
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to listen for ctrl+c");

    tracing::info!("Shutting down");
}
