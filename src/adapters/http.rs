use crate::core::bridge::NoteBridge;
use crate::domain::model::ErrorResponse;
use crate::utils::error::{BridgeError, Result};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    bridge: Arc<NoteBridge>,
    expose_error_details: bool,
}

impl AppState {
    pub fn new(bridge: NoteBridge) -> Self {
        Self {
            bridge: Arc::new(bridge),
            expose_error_details: true,
        }
    }

    /// When false, write failures answer with a generic message instead of the I/O error.
    pub fn with_error_details(mut self, expose: bool) -> Self {
        self.expose_error_details = expose;
        self
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/send-note", post(send_note))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn send_note(State(state): State<AppState>, body: Bytes) -> Response {
    match state.bridge.handle_send_note(&body).await {
        Ok(sent) => (StatusCode::OK, Json(sent)).into_response(),
        Err(e) => error_response(&e, state.expose_error_details),
    }
}

fn error_response(err: &BridgeError, expose_details: bool) -> Response {
    let status = err.status_code();
    if status.is_server_error() {
        tracing::error!("Error: {}", err);
    } else {
        tracing::warn!("Rejected request: {}", err);
    }

    (status, Json(ErrorResponse::new(err.public_message(expose_details)))).into_response()
}

/// Serves the bridge on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Listening on http://{}", addr);
    }

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
