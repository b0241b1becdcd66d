//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the mounted route groups
//! - Wire up middleware in a fixed order
//! - Bind server to listener
//! - Stop on the shutdown signal
//!
//! # Layer Order (outermost first)
//! ```text
//! request id → trace → request id propagation → CORS headers
//!     → panic catcher → preflight → JSON body → [form body] → routes
//! ```

use std::any::Any;

use axum::{
    middleware::{from_fn, from_fn_with_state},
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::{AppConfig, BodyConfig};
use crate::db::DatabaseHandle;
use crate::http::body::{self, BodyLimits};
use crate::http::cors;
use crate::http::error::ApiError;
use crate::http::request::MakeRequestUuid;
use crate::observability::tracing::make_span;
use crate::routes;

/// Application state injected into handlers.
#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub db: DatabaseHandle,
}

impl AppState {
    pub fn new(db: DatabaseHandle) -> Self {
        Self { db }
    }
}

/// HTTP server for the service.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server mounting `auth` under the auth prefix.
    pub fn new(config: &AppConfig, state: AppState, auth: Router<AppState>) -> Self {
        let router = Self::build_router(&config.body, state, auth);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    pub fn build_router(body_config: &BodyConfig, state: AppState, auth: Router<AppState>) -> Router {
        let limits = BodyLimits::from(body_config);
        let mut app = routes::mount(auth).with_state(state);

        if body_config.urlencoded {
            app = app.layer(from_fn_with_state(limits, body::urlencoded));
        }

        app.layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(cors::layer())
                .layer(CatchPanicLayer::custom(handle_panic))
                .layer(from_fn(cors::preflight))
                .layer(from_fn_with_state(limits, body::json)),
        )
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    ApiError::from_panic(payload).into_response()
}
