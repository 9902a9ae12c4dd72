use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use crate::auth::repo::{AccountStore, MemoryAccountStore, PgAccountStore};
use crate::config::{AppConfig, StorageBackend};
use crate::db;
use crate::pages::Pages;
use crate::reminders::repo::{MemoryReminderStore, PgReminderStore, ReminderStore};
use crate::sessions::{MemorySessionStore, PgSessionStore, SessionStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub accounts: Arc<dyn AccountStore>,
    pub reminders: Arc<dyn ReminderStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub pages: Arc<Pages>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;
        match config.storage {
            StorageBackend::Postgres => {
                let url = config
                    .database_url
                    .clone()
                    .context("DATABASE_URL is required for the postgres backend")?;
                let db = db::connect(&url).await?;
                db::migrate(&db).await?;
                info!("using postgres storage");
                Ok(Self {
                    config: Arc::new(config),
                    accounts: Arc::new(PgAccountStore::new(db.clone())),
                    reminders: Arc::new(PgReminderStore::new(db.clone())),
                    sessions: Arc::new(PgSessionStore::new(db)),
                    pages: Arc::new(Pages::new()?),
                })
            }
            StorageBackend::Memory => {
                info!("using in-memory storage; data is lost on restart");
                Self::in_memory(config)
            }
        }
    }

    pub fn in_memory(config: AppConfig) -> anyhow::Result<Self> {
        Ok(Self {
            config: Arc::new(config),
            accounts: Arc::new(MemoryAccountStore::default()),
            reminders: Arc::new(MemoryReminderStore::default()),
            sessions: Arc::new(MemorySessionStore::default()),
            pages: Arc::new(Pages::new()?),
        })
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        let config = AppConfig {
            listen: ([127, 0, 0, 1], 0).into(),
            storage: StorageBackend::Memory,
            database_url: None,
            session: crate::config::SessionConfig {
                secret: "test".into(),
                issuer: "test".into(),
                audience: "test".into(),
                ttl_minutes: 5,
                cookie_name: "stepfit_session".into(),
                secure_cookie: false,
                purge_interval_secs: 60,
            },
        };
        Self::in_memory(config).expect("templates compile")
    }
}
