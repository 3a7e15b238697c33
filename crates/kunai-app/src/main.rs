use std::sync::Arc;

use kunai_app::app::api::routes;
use kunai_app::config::ConfigHandler;
use kunai_app::engine_handler::EngineHandler;
use kunai_core::config::load_config;
use kunai_engine::engine::DavEngineBuilder;
use kunai_engine::memory::MemBackend;
use salvo::conn::TcpListener;
use salvo::{Listener, Router};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    tracing::info!("Starting Kunai WebDAV server");

    let config = load_config()?;

    tracing::info!(config = ?config, "Configuration loaded");

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping debug");
    }

    let backend = MemBackend::new();
    seed_principal_tree(&backend, &config.dav.current_user_principal)?;

    let engine = DavEngineBuilder::new(Arc::new(backend))
        .current_user_principal(config.dav.current_user_principal.clone())
        .max_put_body(config.dav.max_put_body_bytes)
        .build();

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let acceptor = TcpListener::new(bind_addr.clone()).bind().await;

    let router = Router::new()
        .hoop(ConfigHandler {
            settings: config.clone(),
        })
        .hoop(EngineHandler {
            engine: Arc::new(engine),
        })
        .push(routes());

    tracing::info!("Server listening on {bind_addr}");

    salvo::Server::new(acceptor).serve(router).await;

    Ok(())
}

/// Seeds the principal collection so `current-user-principal` resolves.
fn seed_principal_tree(backend: &MemBackend, principal_href: &str) -> anyhow::Result<()> {
    let path = principal_href.trim_end_matches('/');
    if path.is_empty() {
        return Ok(());
    }

    // Intermediate collections first, principal last.
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let mut built = String::new();
    for (index, segment) in segments.iter().enumerate() {
        built.push('/');
        built.push_str(segment);
        if index + 1 == segments.len() {
            backend.add_principal(&built)?;
        } else {
            backend.mkcol(&built)?;
        }
    }

    Ok(())
}
