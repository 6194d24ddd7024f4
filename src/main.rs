//! docudraft entry point: a stdin/stdout conversation loop.
//!
//! Wires the built-in schema catalog, the HTTP oracle and a state store
//! (file-backed when configured, in-memory otherwise) into one interactive
//! session. Intended for development and manual testing; a transport layer
//! is expected to embed `CollectionService` the same way.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use docudraft::adapters::document::PromptDocumentGenerator;
use docudraft::adapters::oracle::{HttpOracle, HttpOracleConfig};
use docudraft::adapters::storage::{FileStateStore, InMemoryStateStore};
use docudraft::application::{CollectionEngine, CollectionService, OracleGateway};
use docudraft::config::AppConfig;
use docudraft::domain::foundation::ConversationKey;
use docudraft::domain::schema::default_registry;
use docudraft::ports::{Oracle, StateStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::load()?;
    config.validate()?;

    let api_key = config.oracle.api_key.clone().unwrap_or_default();
    let oracle_config = HttpOracleConfig::new(api_key)
        .with_model(config.oracle.model.clone())
        .with_base_url(config.oracle.base_url.clone())
        .with_timeout(config.oracle.timeout())
        .with_max_retries(config.oracle.max_retries);
    let oracle: Arc<dyn Oracle> = Arc::new(HttpOracle::new(oracle_config)?);

    let store: Arc<dyn StateStore> = match &config.storage.data_dir {
        Some(dir) if !dir.is_empty() => Arc::new(FileStateStore::new(dir)),
        _ => Arc::new(InMemoryStateStore::new()),
    };

    let registry = default_registry();
    let generator = Arc::new(PromptDocumentGenerator::new(
        oracle.clone(),
        registry.clone(),
    ));
    let engine = CollectionEngine::new(OracleGateway::new(oracle), registry, generator);
    let service = CollectionService::new(engine, store);

    let key = ConversationKey::new();
    info!(conversation = %key, "session started");
    println!("docudraft — tell me which document you need. Ctrl-D to quit.");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        let outcome = service.handle_message(key, message).await?;
        println!("{}\n", outcome.assistant_text);
    }

    Ok(())
}
