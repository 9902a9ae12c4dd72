use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // Argon2 PHC string, never rendered
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub age: Option<i32>,
    pub created_at: OffsetDateTime,
}

/// Body metrics submitted from the profile form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Profile {
    pub height: f64,
    pub weight: f64,
    pub age: i32,
}
