use std::sync::Arc;

use schedule_server::cache::ScheduleCache;
use schedule_server::catalog::CatalogClient;
use schedule_server::clock::{Clock, SystemClock};
use schedule_server::config::ServerConfig;
use schedule_server::parser::RemoteParser;
use schedule_server::service::ScheduleService;
use schedule_server::web::{AppState, create_router};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = ServerConfig::from_env().expect("Invalid configuration");
    if !config.parser_url_set {
        warn!(
            parser_url = %config.parser.base_url,
            "PARSER_URL not set, using default parser endpoint"
        );
    }

    let catalog =
        CatalogClient::new(config.catalog.clone()).expect("Failed to create catalog client");
    let parser = RemoteParser::new(config.parser.clone()).expect("Failed to create parser client");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let cache = Arc::new(ScheduleCache::new(&config.cache, clock.clone()));

    let service = ScheduleService::new(
        Arc::new(catalog),
        Arc::new(parser),
        cache,
        clock,
        config.defaults.clone(),
    );

    let app = create_router(AppState::new(service));

    let addr = config.bind_addr;
    info!(
        catalog = %config.catalog.base_url,
        parser = %config.parser.base_url,
        cache_ttl_secs = config.cache.ttl.as_secs(),
        "Meeting schedule server listening on http://{addr}"
    );
    info!("  GET  /health      - Health check");
    info!("  GET  /api/parse   - Resolve, parse and filter a schedule");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("Server error");
}
