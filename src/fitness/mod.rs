//! Step-count derived metrics: calories, weight lost, badge tier, diet plan,
//! plus the motivational quote page.

pub mod diet;
mod dto;
pub mod handlers;
pub mod metrics;
pub mod quotes;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::fitness_routes()
}
