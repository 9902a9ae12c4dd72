use anyhow::Context as _;
use axum::{
    extract::{FromRef, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{normalize_username, CredentialsForm, ProfileForm},
        password::{check_policy, hash_password, verify_password},
    },
    error::{AppError, StoreError},
    pages::page_context,
    sessions::{
        extractors::{issue_cookie, removal_cookie},
        CurrentSession, SessionKeys,
    },
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(login_page).post(login))
        .route("/register", get(register_page).post(register))
        .route("/logout", get(logout))
}

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/profile", get(profile_page).post(update_profile))
}

pub async fn login_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    state.pages.render("login.html", &page_context(false))
}

#[instrument(skip(state, prior, form))]
pub async fn login(
    State(state): State<AppState>,
    prior: Option<CurrentSession>,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, AppError> {
    let username = form.username.trim();

    let user = match state.accounts.find_by_username(username).await? {
        Some(u) => u,
        None => {
            warn!(%username, "login unknown username");
            return rejected_login(&state);
        }
    };

    if !verify_password(&form.password, &user.password_hash)? {
        warn!(%username, user_id = %user.id, "login invalid password");
        return rejected_login(&state);
    }

    if let Some(CurrentSession(old)) = prior {
        state.sessions.destroy(old.id).await?;
    }

    let keys = SessionKeys::from_ref(&state);
    let session = state.sessions.create(user.id, keys.ttl).await?;
    let token = keys.sign(session.id)?;

    info!(user_id = %user.id, username = %user.username, "user logged in");
    Ok((
        [(header::SET_COOKIE, issue_cookie(&state.config.session, token))],
        Redirect::to("/profile"),
    )
        .into_response())
}

/// Same page for unknown users and wrong passwords.
fn rejected_login(state: &AppState) -> Result<Response, AppError> {
    let page = state.pages.render("login.html", &page_context(false))?;
    Ok((StatusCode::UNAUTHORIZED, page).into_response())
}

pub async fn register_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    state.pages.render("register.html", &page_context(false))
}

#[instrument(skip(state, form))]
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, AppError> {
    let username = match normalize_username(&form.username) {
        Ok(u) => u,
        Err(msg) => {
            warn!(username = %form.username, "invalid username");
            return rejected_registration(&state, StatusCode::BAD_REQUEST, msg);
        }
    };

    if let Err(msg) = check_policy(&form.password) {
        warn!(%username, "password rejected by policy");
        return rejected_registration(&state, StatusCode::BAD_REQUEST, msg);
    }

    if state.accounts.find_by_username(&username).await?.is_some() {
        warn!(%username, "username already registered");
        return rejected_registration(&state, StatusCode::CONFLICT, "Username already exists");
    }

    let hash = hash_password(&form.password)?;
    match state.accounts.create(&username, &hash).await {
        Ok(user) => {
            info!(user_id = %user.id, username = %user.username, "user registered");
            Ok(Redirect::to("/").into_response())
        }
        Err(StoreError::UsernameTaken) => {
            warn!(%username, "username taken by a concurrent registration");
            rejected_registration(&state, StatusCode::CONFLICT, "Username already exists")
        }
        Err(e) => Err(e.into()),
    }
}

fn rejected_registration(
    state: &AppState,
    status: StatusCode,
    msg: &str,
) -> Result<Response, AppError> {
    let mut ctx = page_context(false);
    ctx.insert("error", msg);
    let page = state.pages.render("register.html", &ctx)?;
    Ok((status, page).into_response())
}

#[instrument(skip(state, session), fields(user_id = %session.0.user_id))]
pub async fn profile_page(
    State(state): State<AppState>,
    session: CurrentSession,
) -> Result<Html<String>, AppError> {
    let CurrentSession(session) = session;
    let user = state
        .accounts
        .find_by_id(session.user_id)
        .await?
        .with_context(|| format!("user {} behind session {} is missing", session.user_id, session.id))?;

    let mut ctx = page_context(true);
    ctx.insert("username", &user.username);
    if let Some(height) = user.height {
        ctx.insert("height", &height);
    }
    if let Some(weight) = user.weight {
        ctx.insert("weight", &weight);
    }
    if let Some(age) = user.age {
        ctx.insert("age", &age);
    }
    state.pages.render("profile.html", &ctx)
}

#[instrument(skip(state, session, form), fields(user_id = %session.0.user_id))]
pub async fn update_profile(
    State(state): State<AppState>,
    session: CurrentSession,
    Form(form): Form<ProfileForm>,
) -> Result<Redirect, AppError> {
    let CurrentSession(session) = session;
    let profile = form.parse().map_err(AppError::InvalidInput)?;
    state.accounts.update_profile(session.user_id, profile).await?;
    info!(
        height = profile.height,
        weight = profile.weight,
        age = profile.age,
        "profile updated"
    );
    Ok(Redirect::to("/steps"))
}

/// Ends the server-side session and clears the cookie. If the session store
/// cannot be read, the request fails and the cookie stays.
#[instrument(skip(state, session))]
pub async fn logout(
    State(state): State<AppState>,
    session: Result<CurrentSession, Response>,
) -> Result<Response, AppError> {
    match session {
        Ok(CurrentSession(session)) => {
            state.sessions.destroy(session.id).await?;
            info!(user_id = %session.user_id, "user logged out");
        }
        Err(rejection) if rejection.status().is_server_error() => {
            warn!(status = %rejection.status(), "logout could not load the session");
            return Ok(rejection);
        }
        Err(_) => {}
    }
    Ok((
        [(header::SET_COOKIE, removal_cookie(&state.config.session))],
        Redirect::to("/"),
    )
        .into_response())
}
