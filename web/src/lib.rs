use axum_login::AuthManagerLayerBuilder;
use domain::profile::Backend;
use log::*;
use std::error::Error as StdError;
use time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

pub use error::Error;
pub use service::AppState;

pub(crate) mod controller;
pub(crate) mod error;
pub(crate) mod extractors;
pub(crate) mod middleware;
pub(crate) mod params;
pub(crate) mod protect;
pub mod router;

/// Binds the listener and serves the API with session-cookie authentication,
/// CORS, and the full route tree.
pub async fn init_server(app_state: AppState) -> Result<(), Box<dyn StdError + Send + Sync>> {
    let config = app_state.config.clone();

    // Sessions are stored in Postgres next to the application data, reusing
    // the sea-orm connection pool.
    let pool = app_state
        .db_conn_ref()
        .get_postgres_connection_pool()
        .clone();
    let session_store = PostgresStore::new(pool);
    session_store.migrate().await?;

    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(config.is_production())
        .with_expiry(Expiry::OnInactivity(Duration::seconds(
            config.backend_session_expiry_seconds as i64,
        )));

    let backend = Backend::new(&app_state.database_connection);
    let auth_layer = AuthManagerLayerBuilder::new(backend, session_layer).build();

    let allowed_origins: Vec<_> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    let cors_layer = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::HeaderName::from_static("x-version"),
        ])
        .allow_credentials(true);

    let router = router::define_routes(app_state)
        .layer(auth_layer)
        .layer(cors_layer);

    let interface = config.interface.as_deref().unwrap_or("127.0.0.1");
    let listen_addr = format!("{}:{}", interface, config.port);
    info!("Server starting... listening for connections on http://{listen_addr}");

    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
