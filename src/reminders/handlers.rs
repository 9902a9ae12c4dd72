use axum::{extract::State, response::Html, routing::get, Form, Router};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{error::AppError, pages::page_context, sessions::CurrentSession, state::AppState};

#[derive(Debug, Deserialize)]
pub struct ReminderForm {
    pub message: String,
    #[serde(default)]
    pub time: String,
}

pub fn reminder_routes() -> Router<AppState> {
    Router::new().route("/reminder", get(list_reminders).post(add_reminder))
}

#[instrument(skip(state, session), fields(user_id = %session.0.user_id))]
pub async fn list_reminders(
    State(state): State<AppState>,
    session: CurrentSession,
) -> Result<Html<String>, AppError> {
    render_list(&state, session.0.user_id).await
}

#[instrument(skip(state, session, form), fields(user_id = %session.0.user_id))]
pub async fn add_reminder(
    State(state): State<AppState>,
    session: CurrentSession,
    Form(form): Form<ReminderForm>,
) -> Result<Html<String>, AppError> {
    let user_id = session.0.user_id;
    let message = form.message.trim();
    if message.is_empty() {
        return Err(AppError::invalid("Reminder message is required"));
    }

    let reminder = state
        .reminders
        .insert(user_id, message, form.time.trim())
        .await?;
    info!(reminder_id = %reminder.id, "reminder added");

    render_list(&state, user_id).await
}

async fn render_list(state: &AppState, user_id: Uuid) -> Result<Html<String>, AppError> {
    let reminders = state.reminders.list_by_user(user_id).await?;
    let mut ctx = page_context(true);
    ctx.insert("reminders", &reminders);
    state.pages.render("reminder.html", &ctx)
}
