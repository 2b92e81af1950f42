use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use crate::{
    api::{middleware::auth::session_token, state::AppState},
    auth::AuthService,
    error::Result,
    service::account_service::AuthOutcome,
};

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

fn with_session_cookie(state: &AppState, jar: CookieJar, outcome: &AuthOutcome) -> CookieJar {
    let cookie = state.service_context.auth_service
        .create_session_cookie(&outcome.token, state.settings.auth.secure_cookies);
    jar.add(cookie)
}

pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<CredentialsRequest>,
) -> Result<(StatusCode, CookieJar, Json<AuthOutcome>)> {
    let outcome = state.service_context.account_service
        .register(&req.email, &req.password)
        .await?;

    let jar = with_session_cookie(&state, jar, &outcome);
    Ok((StatusCode::CREATED, jar, Json(outcome)))
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<CredentialsRequest>,
) -> Result<(CookieJar, Json<AuthOutcome>)> {
    let outcome = state.service_context.account_service
        .login(&req.email, &req.password)
        .await?;

    let jar = with_session_cookie(&state, jar, &outcome);
    Ok((jar, Json(outcome)))
}

pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Result<(CookieJar, StatusCode)> {
    if let Some(token) = session_token(&jar, &headers) {
        if let Err(e) = state.service_context.account_service.logout(&token).await {
            tracing::warn!("Failed to invalidate session on logout: {}", e);
        }
    }

    // Remove cookie
    let jar = jar.add(AuthService::create_logout_cookie());

    Ok((jar, StatusCode::NO_CONTENT))
}
