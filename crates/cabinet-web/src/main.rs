mod api;
mod auth;
mod config;
mod dto;
mod error;
mod middleware;
mod state;
mod static_files;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, Method};
use axum::middleware::from_fn;
use tower_governor::{governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer};
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cabinet_core::{FsObjectStore, ObjectStore};

use crate::config::ServerConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cabinet_web=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::load()?;
    let bind_addr = config.bind_addr;
    let tls_config = config.tls.clone();
    let tls_enabled = tls_config.cert_path.is_some() && tls_config.key_path.is_some();
    let rate_limit_rpm = config.rate_limit.login_requests_per_minute;
    let body_limit = (config.storage.max_upload_size_mb + 1) * 1024 * 1024;

    std::fs::create_dir_all(&config.storage.root)?;
    let store: Arc<dyn ObjectStore> = Arc::new(FsObjectStore::new(&config.storage.root));
    tracing::info!("storing files under {}", config.storage.root.display());

    let revoked_tokens = Arc::new(dashmap::DashMap::new());
    let jwt_ttl = std::time::Duration::from_secs(config.auth.jwt_ttl_hours * 3600);

    let state = AppState {
        config: Arc::new(config),
        store,
        registries: Arc::new(dashmap::DashMap::new()),
        revoked_tokens: revoked_tokens.clone(),
    };

    // Revoked tokens only matter until the token itself expires.
    let cleanup_revoked = revoked_tokens.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(60));
        loop {
            interval.tick().await;
            cleanup_revoked.retain(|_, revoked_at: &mut std::time::Instant| {
                revoked_at.elapsed() < jwt_ttl
            });
        }
    });

    // CORS: same-origin only by default (no cross-origin requests allowed)
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    // Rate limit config (per-IP)
    let governor_config = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(state.config.rate_limit.replenish_period_secs())
            .burst_size(rate_limit_rpm.max(1))
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .expect("Failed to build rate limit config"),
    );

    // Rate limit only on auth routes (not file API or static files)
    let auth_routes = api::auth_router()
        .layer(GovernorLayer::<_, _, axum::body::Body>::new(governor_config));

    let base_router = axum::Router::new()
        .nest("/api", auth_routes.merge(api::protected_router()))
        .fallback(static_files::static_handler);

    let app = if tls_enabled {
        base_router
            .layer(from_fn(middleware::security_headers::security_headers_with_hsts))
            .layer(DefaultBodyLimit::max(body_limit))
            .layer(RequestBodyLimitLayer::new(body_limit))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    } else {
        base_router
            .layer(from_fn(middleware::security_headers::security_headers))
            .layer(DefaultBodyLimit::max(body_limit))
            .layer(RequestBodyLimitLayer::new(body_limit))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    };

    if let (Some(cert), Some(key)) = (&tls_config.cert_path, &tls_config.key_path) {
        use axum_server::tls_rustls::RustlsConfig;
        let rustls_config = RustlsConfig::from_pem_file(cert, key).await?;
        tracing::info!("cabinet-web listening on https://{}", bind_addr);
        axum_server::bind_rustls(bind_addr, rustls_config)
            .serve(app.into_make_service_with_connect_info::<std::net::SocketAddr>())
            .await?;
    } else {
        let listener = tokio::net::TcpListener::bind(bind_addr).await?;
        tracing::info!("cabinet-web listening on http://{}", bind_addr);
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
        )
        .await?;
    }

    Ok(())
}
