use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Reminder {
    pub id: Uuid,
    pub user_id: Uuid,
    pub message: String,
    pub time: String, // free-form, whatever the user typed
    pub created_at: OffsetDateTime,
}

#[async_trait]
pub trait ReminderStore: Send + Sync {
    async fn insert(&self, user_id: Uuid, message: &str, time: &str) -> anyhow::Result<Reminder>;
    /// Oldest first.
    async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Reminder>>;
}

#[derive(Clone)]
pub struct PgReminderStore {
    db: PgPool,
}

impl PgReminderStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReminderStore for PgReminderStore {
    async fn insert(&self, user_id: Uuid, message: &str, time: &str) -> anyhow::Result<Reminder> {
        let reminder = sqlx::query_as::<_, Reminder>(
            r#"
            INSERT INTO reminders (id, user_id, message, time)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, message, time, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(message)
        .bind(time)
        .fetch_one(&self.db)
        .await
        .context("insert reminder")?;
        Ok(reminder)
    }

    async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Reminder>> {
        let rows = sqlx::query_as::<_, Reminder>(
            r#"
            SELECT id, user_id, message, time, created_at
              FROM reminders
             WHERE user_id = $1
             ORDER BY created_at ASC, seq ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .context("list reminders by user")?;
        Ok(rows)
    }
}

#[derive(Default)]
pub struct MemoryReminderStore {
    next_seq: AtomicU64,
    reminders: RwLock<Vec<(u64, Reminder)>>,
}

#[async_trait]
impl ReminderStore for MemoryReminderStore {
    async fn insert(&self, user_id: Uuid, message: &str, time: &str) -> anyhow::Result<Reminder> {
        let reminder = Reminder {
            id: Uuid::new_v4(),
            user_id,
            message: message.to_owned(),
            time: time.to_owned(),
            created_at: OffsetDateTime::now_utc(),
        };
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        self.reminders.write().await.push((seq, reminder.clone()));
        Ok(reminder)
    }

    async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Reminder>> {
        let reminders = self.reminders.read().await;
        let mut mine: Vec<_> = reminders.iter().filter(|(_, r)| r.user_id == user_id).collect();
        mine.sort_by_key(|(seq, _)| *seq);
        Ok(mine.into_iter().map(|(_, r)| r.clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reminders_are_private_to_their_owner() {
        let store = MemoryReminderStore::default();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        store.insert(alice, "Drink water", "09:00").await.unwrap();
        store.insert(bob, "Stretch", "18:30").await.unwrap();

        let alices = store.list_by_user(alice).await.unwrap();
        assert_eq!(alices.len(), 1);
        assert_eq!(alices[0].message, "Drink water");

        let bobs = store.list_by_user(bob).await.unwrap();
        assert!(bobs.iter().all(|r| r.user_id == bob));
        assert!(!bobs.iter().any(|r| r.message == "Drink water"));
    }

    #[tokio::test]
    async fn listing_keeps_insertion_order() {
        let store = MemoryReminderStore::default();
        let user = Uuid::new_v4();
        for (msg, at) in [("walk", "07:00"), ("lunch", "12:00"), ("sleep", "whenever")] {
            store.insert(user, msg, at).await.unwrap();
        }
        let listed: Vec<_> = store
            .list_by_user(user)
            .await
            .unwrap()
            .into_iter()
            .map(|r| (r.message, r.time))
            .collect();
        assert_eq!(
            listed,
            vec![
                ("walk".to_string(), "07:00".to_string()),
                ("lunch".to_string(), "12:00".to_string()),
                ("sleep".to_string(), "whenever".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn unknown_user_has_no_reminders() {
        let store = MemoryReminderStore::default();
        assert!(store.list_by_user(Uuid::new_v4()).await.unwrap().is_empty());
    }
}
