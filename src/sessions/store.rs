use std::collections::HashMap;

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow, PgPool};
use time::{Duration, OffsetDateTime};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::fitness::metrics::StepResult;

/// Server-side state for one logged-in browser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub result: Option<StepResult>,
    pub created_at: OffsetDateTime,
    pub expires_at: OffsetDateTime,
}

impl Session {
    fn new(user_id: Uuid, ttl: Duration) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: Uuid::new_v4(),
            user_id,
            result: None,
            created_at: now,
            expires_at: now + ttl,
        }
    }

    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.expires_at <= now
    }
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create(&self, user_id: Uuid, ttl: Duration) -> anyhow::Result<Session>;
    /// Expired sessions load as `None`.
    async fn load(&self, id: Uuid) -> anyhow::Result<Option<Session>>;
    /// Replaces whatever result the session held before.
    async fn store_result(&self, id: Uuid, result: &StepResult) -> anyhow::Result<()>;
    async fn destroy(&self, id: Uuid) -> anyhow::Result<()>;
    /// Returns how many sessions were removed.
    async fn purge_expired(&self) -> anyhow::Result<u64>;
}

#[derive(FromRow)]
struct SessionRow {
    id: Uuid,
    user_id: Uuid,
    result: Option<Json<StepResult>>,
    created_at: OffsetDateTime,
    expires_at: OffsetDateTime,
}

impl From<SessionRow> for Session {
    fn from(r: SessionRow) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            result: r.result.map(|Json(result)| result),
            created_at: r.created_at,
            expires_at: r.expires_at,
        }
    }
}

#[derive(Clone)]
pub struct PgSessionStore {
    db: PgPool,
}

impl PgSessionStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn create(&self, user_id: Uuid, ttl: Duration) -> anyhow::Result<Session> {
        let session = Session::new(user_id, ttl);
        sqlx::query(
            r#"
            INSERT INTO sessions (id, user_id, created_at, expires_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(session.id)
        .bind(session.user_id)
        .bind(session.created_at)
        .bind(session.expires_at)
        .execute(&self.db)
        .await
        .context("insert session")?;
        Ok(session)
    }

    async fn load(&self, id: Uuid) -> anyhow::Result<Option<Session>> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT id, user_id, result, created_at, expires_at
              FROM sessions
             WHERE id = $1 AND expires_at > now()
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("load session")?;
        Ok(row.map(Session::from))
    }

    async fn store_result(&self, id: Uuid, result: &StepResult) -> anyhow::Result<()> {
        let done = sqlx::query(r#"UPDATE sessions SET result = $1 WHERE id = $2"#)
            .bind(Json(result))
            .bind(id)
            .execute(&self.db)
            .await
            .context("store step result")?;
        anyhow::ensure!(done.rows_affected() == 1, "session {id} not found");
        Ok(())
    }

    async fn destroy(&self, id: Uuid) -> anyhow::Result<()> {
        sqlx::query(r#"DELETE FROM sessions WHERE id = $1"#)
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete session")?;
        Ok(())
    }

    async fn purge_expired(&self) -> anyhow::Result<u64> {
        let done = sqlx::query(r#"DELETE FROM sessions WHERE expires_at <= now()"#)
            .execute(&self.db)
            .await
            .context("purge expired sessions")?;
        Ok(done.rows_affected())
    }
}

#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<Uuid, Session>>,
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, user_id: Uuid, ttl: Duration) -> anyhow::Result<Session> {
        let session = Session::new(user_id, ttl);
        self.sessions.write().await.insert(session.id, session.clone());
        Ok(session)
    }

    async fn load(&self, id: Uuid) -> anyhow::Result<Option<Session>> {
        let now = OffsetDateTime::now_utc();
        let sessions = self.sessions.read().await;
        Ok(sessions.get(&id).filter(|s| !s.is_expired(now)).cloned())
    }

    async fn store_result(&self, id: Uuid, result: &StepResult) -> anyhow::Result<()> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&id)
            .with_context(|| format!("session {id} not found"))?;
        session.result = Some(result.clone());
        Ok(())
    }

    async fn destroy(&self, id: Uuid) -> anyhow::Result<()> {
        self.sessions.write().await.remove(&id);
        Ok(())
    }

    async fn purge_expired(&self) -> anyhow::Result<u64> {
        let now = OffsetDateTime::now_utc();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired(now));
        Ok((before - sessions.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn new_session_has_no_result_until_steps_are_logged() {
        let store = MemorySessionStore::default();
        let user_id = Uuid::new_v4();
        let session = store.create(user_id, Duration::hours(1)).await.unwrap();
        assert_eq!(session.user_id, user_id);
        assert!(session.result.is_none());

        store
            .store_result(session.id, &StepResult::from_steps(5_000))
            .await
            .unwrap();
        store
            .store_result(session.id, &StepResult::from_steps(12_000))
            .await
            .unwrap();

        let loaded = store.load(session.id).await.unwrap().unwrap();
        assert_eq!(loaded.result.map(|r| r.steps), Some(12_000));
    }

    #[tokio::test]
    async fn destroyed_sessions_are_gone() {
        let store = MemorySessionStore::default();
        let session = store.create(Uuid::new_v4(), Duration::hours(1)).await.unwrap();
        store.destroy(session.id).await.unwrap();
        assert!(store.load(session.id).await.unwrap().is_none());
        assert!(store
            .store_result(session.id, &StepResult::from_steps(1))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn expired_sessions_do_not_load_and_get_purged() {
        let store = MemorySessionStore::default();
        let stale = store.create(Uuid::new_v4(), Duration::seconds(-1)).await.unwrap();
        let fresh = store.create(Uuid::new_v4(), Duration::hours(1)).await.unwrap();

        assert!(store.load(stale.id).await.unwrap().is_none());
        assert_eq!(store.purge_expired().await.unwrap(), 1);
        assert!(store.load(fresh.id).await.unwrap().is_some());
        assert_eq!(store.purge_expired().await.unwrap(), 0);
    }
}
