use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;

use crate::{
    api::state::AppState,
    auth::SESSION_COOKIE,
    domain::Identity,
    error::AppError,
};

#[derive(Clone)]
pub struct CurrentUser {
    pub identity: Identity,
}

/// Session token from the `session` cookie, or from a bearer header for
/// clients that do not keep cookies.
pub fn session_token(jar: &CookieJar, headers: &HeaderMap) -> Option<String> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }

    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

pub async fn require_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = session_token(&jar, request.headers())
        .ok_or(AppError::Unauthorized)?;

    let identity = state.service_context.auth_service
        .authenticate(&token)
        .await?;

    // Insert current user into request extensions
    request.extensions_mut().insert(CurrentUser { identity });

    Ok(next.run(request).await)
}
