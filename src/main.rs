use std::time::Duration;

use tracing_subscriber::EnvFilter;

mod app;
mod auth;
mod config;
mod db;
mod error;
mod fitness;
mod pages;
mod reminders;
mod sessions;
mod state;

const DEFAULT_LOG_FILTER: &str = "stepfit=debug,axum=info,tower_http=info";

/// `RUST_LOG` picks levels; `LOG_FORMAT=json` switches to one JSON object per line.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);

    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => subscriber.with_target(false).json().init(),
        _ => subscriber.init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let app_state = state::AppState::init().await?;
    let listen = app_state.config.listen;

    let purge_every = Duration::from_secs(app_state.config.session.purge_interval_secs.max(1));
    sessions::spawn_purger(app_state.sessions.clone(), purge_every);

    app::serve(app::build_app(app_state), listen).await
}
