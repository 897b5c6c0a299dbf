//! # Laundrybook API
//!
//! The web server for the shared laundry-room booking service. It exposes
//! the slot ledger over JSON endpoints: signing in, browsing a day's slots,
//! booking and cancelling.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Turn requests into service calls
//! - **Service**: Owns the live ledger and writes it back to the store
//! - **Middleware**: Session guard and error mapping
//! - **Config**: Environment configuration

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Session guard and error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;
/// Ledger ownership and persistence
pub mod service;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    error_handling::HandleErrorLayer,
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    BoxError, Router,
};
use eyre::Result;
use laundrybook_db::LedgerStore;
use mockable::DefaultClock;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use crate::middleware::session::USER_HEADER;
use crate::service::BookingService;

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    pub service: BookingService,
}

/// Install the global log subscriber at `level`.
pub fn init_tracing(level: Level) -> Result<()> {
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// The application router with every endpoint and request tracing.
pub fn app(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Login and logout
        .merge(routes::session::routes())
        // Slot catalog and day views
        .merge(routes::slots::routes())
        // Booking, cancelling and lookups
        .merge(routes::booking::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            // a wildcard cannot be combined with credentials
            Ok(value) if origin != "*" => Some(value),
            _ => {
                warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static(USER_HEADER),
        ])
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
}

/// Starts the API server over the ledger held in `store`
///
/// Expects [`init_tracing`] to have been called.
///
/// # Example
///
/// ```no_run
/// use laundrybook_api::config::ApiConfig;
/// use laundrybook_db::MemoryStore;
///
/// # async fn run() -> eyre::Result<()> {
/// let config = ApiConfig::from_env()?;
/// laundrybook_api::start_server(config, Box::new(MemoryStore::new())).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_server(config: config::ApiConfig, store: Box<dyn LedgerStore>) -> Result<()> {
    let rules = config.rules()?;
    info!(
        "Booking policy {} with {} full and {} short slots",
        rules.policy,
        rules.catalog.full_slots().len(),
        rules.catalog.short_slots().len()
    );

    let service = BookingService::open(store, rules, Arc::new(DefaultClock)).await?;
    let state = Arc::new(ApiState { service });
    let app = app(state);

    // Apply CORS configuration if origins are specified
    let app = match &config.cors_origins {
        Some(origins) => app.layer(cors_layer(origins)),
        None => app,
    };

    // Add request timeout middleware
    let app = app.layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(|_: BoxError| async {
                StatusCode::REQUEST_TIMEOUT
            }))
            .timeout(Duration::from_secs(config.request_timeout)),
    );

    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
