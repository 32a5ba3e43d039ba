mod config;
mod handlers;
mod response;
mod store;
mod types;

use std::{
    io,
    sync::Arc,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use timer_core::{seed_founder, BlockList, MemoryStore, PlayerStore};

pub(crate) use config::{AppState, ServerConfig, StoreBackend};
pub(crate) use store::SqliteStore;
pub(crate) use types::{AttemptBody, HealthResponse, UpdateMessageBody, UpdateMessageResponse};

pub(crate) fn now_unix_s() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_secs())
        .unwrap_or(0)
}

pub(crate) fn open_store(config: &ServerConfig) -> Result<Arc<dyn PlayerStore>, String> {
    match config.store_backend {
        StoreBackend::Sqlite => Ok(Arc::new(SqliteStore::open(&config.data_dir)?)),
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::new())),
    }
}

pub(crate) fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(handlers::health))
        .route("/api/attempt", web::post().to(handlers::submit_attempt))
        .route(
            "/api/update-message",
            web::post().to(handlers::update_message),
        )
        .route("/api/leaderboard", web::get().to(handlers::leaderboard));
}

pub(crate) fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(response::json_payload_error)
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = ServerConfig::from_env();
    let store = open_store(&config).map_err(|e| {
        tracing::error!("failed to open player store: {e}");
        io::Error::other(e)
    })?;

    if config.seed_founder {
        match seed_founder(store.as_ref(), now_unix_s()) {
            Ok(true) => tracing::info!("seeded founder record"),
            Ok(false) => tracing::info!("store not empty, founder seed skipped"),
            Err(e) => tracing::warn!("founder seed failed: {e}"),
        }
    }

    let filter = BlockList::default().with_words(&config.blocked_words);

    tracing::info!(
        "starting perfect-ten api: bind_addr={} store_backend={} data_dir={} blocked_words={} json_limit={}",
        config.bind_addr,
        config.store_backend.as_str(),
        config.data_dir.display(),
        filter.len(),
        config.json_limit,
    );

    let state = AppState {
        store,
        filter: Arc::new(filter),
        store_backend: config.store_backend,
    };
    let json_limit = config.json_limit;

    let mut server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(json_config(json_limit))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .configure(routes)
    })
    .keep_alive(Duration::from_secs(config.http_keep_alive_secs));

    if let Some(workers) = config.http_workers {
        server = server.workers(workers);
    }

    server.bind(config.bind_addr.as_str())?.run().await
}
