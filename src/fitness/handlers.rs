use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use tracing::{info, instrument};

use super::{diet::DietPlan, dto::StepsForm, metrics::StepResult, quotes::random_quote};
use crate::{
    error::AppError,
    pages::page_context,
    sessions::CurrentSession,
    state::AppState,
};

pub fn fitness_routes() -> Router<AppState> {
    Router::new()
        .route("/steps", get(steps_page).post(submit_steps))
        .route("/diet", get(diet))
        .route("/result", get(result))
        .route("/quotes", get(quotes))
}

pub async fn steps_page(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Result<Html<String>, AppError> {
    let mut ctx = page_context(true);
    ctx.insert("last_steps", &session.result.map(|r| r.steps));
    state.pages.render("steps.html", &ctx)
}

#[instrument(skip(state, session, form), fields(user_id = %session.0.user_id))]
pub async fn submit_steps(
    State(state): State<AppState>,
    session: CurrentSession,
    Form(form): Form<StepsForm>,
) -> Result<Redirect, AppError> {
    let CurrentSession(session) = session;
    let steps = form.parse().map_err(AppError::InvalidInput)?;

    let result = StepResult::from_steps(steps);
    state.sessions.store_result(session.id, &result).await?;

    info!(
        steps,
        calories = result.calories,
        badge = %result.badge,
        "steps logged"
    );
    Ok(Redirect::to("/diet"))
}

/// The session's latest result, or a redirect to the steps form.
fn require_result(session: Option<CurrentSession>) -> Result<StepResult, Response> {
    session
        .and_then(|CurrentSession(s)| s.result)
        .ok_or_else(|| Redirect::to("/steps").into_response())
}

pub async fn diet(
    State(state): State<AppState>,
    session: Option<CurrentSession>,
) -> Result<Response, AppError> {
    let result = match require_result(session) {
        Ok(r) => r,
        Err(redirect) => return Ok(redirect),
    };
    let plan = DietPlan::for_calories(result.calories);

    let mut ctx = page_context(true);
    ctx.insert("plan", plan.label());
    ctx.insert("garnish", plan.garnish());
    ctx.insert("calories", &format!("{:.2}", result.calories));
    Ok(state.pages.render("diet.html", &ctx)?.into_response())
}

pub async fn result(
    State(state): State<AppState>,
    session: Option<CurrentSession>,
) -> Result<Response, AppError> {
    let result = match require_result(session) {
        Ok(r) => r,
        Err(redirect) => return Ok(redirect),
    };

    let mut ctx = page_context(true);
    ctx.insert("steps", &result.steps);
    ctx.insert("calories", &format!("{:.2}", result.calories));
    ctx.insert("weight_lost", &format!("{:.4}", result.weight_lost));
    ctx.insert("badge", result.badge.label());
    ctx.insert("medal", result.badge.medal());
    Ok(state.pages.render("result.html", &ctx)?.into_response())
}

pub async fn quotes(
    State(state): State<AppState>,
    _session: CurrentSession,
) -> Result<Html<String>, AppError> {
    let mut ctx = page_context(true);
    ctx.insert("quote", random_quote());
    state.pages.render("quotes.html", &ctx)
}
