//! HTTP front end.
//!
//! Routes:
//!
//! | Method | Path                         | Page |
//! |--------|------------------------------|------|
//! | GET    | `/`                          | login |
//! | POST   | `/showSummary`               | club dashboard |
//! | GET    | `/book/{competition}/{club}` | booking form |
//! | POST   | `/purchasePlaces`            | dashboard with booking outcome |
//! | GET    | `/pointsDisplay`             | public points board |
//! | GET    | `/logout`                    | redirect to `/` |
//!
//! All state lives in one [`Dataset`] behind an async `RwLock`. A purchase
//! holds the write lock from its first check to its last deduction.

mod handlers;
pub mod views;

use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use chrono::{Local, NaiveDateTime};
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::RwLock;
use tracing::{info, Instrument};

use crate::config::{BookingRules, Config};
use crate::dataset::Dataset;
use crate::error::{Error, Result};

/// Source of the current local time.
pub type Clock = fn() -> NaiveDateTime;

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    dataset: Arc<RwLock<Dataset>>,
    rules: BookingRules,
    clock: Clock,
}

impl AppState {
    /// Wrap a dataset for serving, using the local wall clock.
    #[must_use]
    pub fn new(dataset: Dataset, rules: BookingRules) -> Self {
        Self {
            dataset: Arc::new(RwLock::new(dataset)),
            rules,
            clock: local_now,
        }
    }

    /// Replace the clock used to decide whether a competition is past.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Handle to the shared dataset.
    #[must_use]
    pub fn dataset(&self) -> Arc<RwLock<Dataset>> {
        Arc::clone(&self.dataset)
    }

    /// Booking rules in force.
    #[must_use]
    pub fn rules(&self) -> &BookingRules {
        &self.rules
    }

    fn now(&self) -> NaiveDateTime {
        (self.clock)()
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index_handler))
        .route("/showSummary", post(handlers::show_summary_handler))
        .route("/book/{competition}/{club}", get(handlers::book_handler))
        .route("/purchasePlaces", post(handlers::purchase_places_handler))
        .route("/pointsDisplay", get(handlers::points_display_handler))
        .route("/logout", get(handlers::logout_handler))
        .fallback(handlers::fallback_handler)
        .layer(middleware::from_fn(request_logging))
        .with_state(state)
}

async fn request_logging(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let route = request.uri().path().to_string();
    let started = Instant::now();

    let span = tracing::info_span!("http.request", method = %method, route = %route);
    let response = next.run(request).instrument(span).await;

    info!(
        method = %method,
        route = %route,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis(),
        "Request handled"
    );
    response
}

/// Load the dataset named by `config` and serve it until Ctrl-C or SIGTERM.
///
/// # Errors
///
/// Returns an error if the data files cannot be loaded, the address cannot
/// be bound, or the server fails while running.
pub async fn serve(config: &Config) -> Result<()> {
    info!("Loading dataset...");
    let dataset = Dataset::load(&config.data.clubs_path, &config.data.competitions_path)?;
    let state = AppState::new(dataset, config.booking);

    let address = config.bind_addr()?;
    let listener = TcpListener::bind(address)
        .await
        .map_err(|source| Error::Bind {
            address: address.to_string(),
            source,
        })?;
    info!("Server running on http://{address}");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
