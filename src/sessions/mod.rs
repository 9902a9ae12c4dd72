//! Login sessions: a server-side record per browser, named by a signed
//! token in an HttpOnly cookie.

pub mod extractors;
pub mod store;
pub mod token;

use std::{sync::Arc, time::Duration};

use tracing::{error, info};

pub use extractors::CurrentSession;
pub use store::{MemorySessionStore, PgSessionStore, SessionStore};
pub use token::SessionKeys;

/// Periodically drops expired session records until the runtime shuts down.
pub fn spawn_purger(store: Arc<dyn SessionStore>, every: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            match store.purge_expired().await {
                Ok(0) => {}
                Ok(n) => info!(purged = n, "expired sessions removed"),
                Err(e) => error!(error = %e, "session purge failed"),
            }
        }
    })
}
