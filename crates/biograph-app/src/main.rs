//! Biograph application binary - composition root.
//!
//! 1. Parse CLI arguments and load configuration from TOML
//! 2. Load the biographical corpus (directory, plus optional URL batch)
//! 3. Build the language model and speech clients
//! 4. Start the axum REST API server

mod cli;

use std::path::Path;
use std::sync::Arc;

use clap::Parser;

use biograph_api::state::AppState;
use biograph_chat::{LanguageModel, OpenAiCompatibleModel};
use biograph_core::BiographConfig;
use biograph_corpus::{CorpusLoader, CorpusSource};
use biograph_story::HttpSpeechSynthesizer;

use cli::CliArgs;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    if args.init_config {
        BiographConfig::default().save(&config_file)?;
        println!("Default configuration written to {}", config_file.display());
        return Ok(());
    }
    let mut config = BiographConfig::load_or_default(&config_file)?;
    config.general.port = args.resolve_port(config.general.port);
    if let Some(dir) = args.resolve_corpus_dir() {
        config.corpus.dir = dir;
    }
    if let Some(level) = args.resolve_log_level() {
        config.general.log_level = level;
    }

    // Tracing. RUST_LOG wins over the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.general.log_level)),
        )
        .init();

    tracing::info!("Starting Biograph v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration resolved");

    // Corpus.
    let loader = CorpusLoader::new(config.corpus.extensions.clone());
    let context = loader.load_dir(Path::new(&config.corpus.dir)).await;
    if context.is_sentinel() {
        tracing::warn!(dir = %config.corpus.dir, corpus = %context, "Corpus unavailable; answering from placeholder");
    } else {
        tracing::info!(
            dir = %config.corpus.dir,
            documents = context.document_count(),
            chars = context.char_len(),
            "Corpus loaded"
        );
    }

    // Capabilities.
    let model: Arc<dyn LanguageModel> =
        Arc::new(OpenAiCompatibleModel::from_config(config.llm.clone()));
    let speech = Arc::new(HttpSpeechSynthesizer::from_config(config.speech.clone()));

    let mut state = AppState::new(config.clone(), Arc::clone(&model), speech, context);

    // The profiler corpus must load completely or not at all.
    if !config.corpus.urls.is_empty() {
        let sources: Vec<CorpusSource> = config
            .corpus
            .urls
            .iter()
            .map(|locator| CorpusSource::parse(locator))
            .collect();
        let profile = match loader.load(&sources).await {
            Ok(profile) => profile,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load profiler corpus");
                return Err(e.into());
            }
        };
        tracing::info!(
            documents = profile.document_count(),
            chars = profile.char_len(),
            "Profiler corpus loaded"
        );
        state = state.with_profiler(model, profile);
    }

    // API server.
    biograph_api::start_server(&config, state).await?;

    Ok(())
}
