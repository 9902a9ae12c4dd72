use std::net::SocketAddr;

use anyhow::Context;
use axum::{extract::State, response::Html, routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::pages::page_context;
use crate::sessions::CurrentSession;
use crate::state::AppState;
use crate::{auth, fitness, reminders};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(auth::router())
        .merge(fitness::router())
        .merge(reminders::router())
        .route("/contact", get(contact))
        .route("/health", get(|| async { "ok" }))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!(
                        "http_request",
                        %method,
                        uri = %uri,
                        status = tracing::field::Empty
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        let latency_ms = latency.as_millis() as u64;
                        if status.is_server_error() {
                            tracing::error!(%status, latency_ms, "response");
                        } else {
                            tracing::info!(%status, latency_ms, "response");
                        }
                    },
                ),
        )
}

async fn contact(
    State(state): State<AppState>,
    session: Option<CurrentSession>,
) -> Result<Html<String>, AppError> {
    state
        .pages
        .render("contact.html", &page_context(session.is_some()))
}

/// Binds `listen` and serves `app` until the process is stopped.
pub async fn serve(app: Router, listen: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .with_context(|| format!("binding {listen}"))?;
    tracing::info!(addr = %listener.local_addr()?, "stepfit listening");
    axum::serve(listener, app).await?;
    Ok(())
}
