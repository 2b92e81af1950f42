use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use crate::{
    api::{middleware::auth::CurrentUser, state::AppState},
    domain::{Comment, CommentForm},
    error::Result,
};

pub async fn list(
    State(state): State<AppState>,
    Extension(_user): Extension<CurrentUser>,
    Path(announcement_id): Path<String>,
) -> Result<Json<Vec<Comment>>> {
    let comments = state.service_context.comment_service
        .list(&announcement_id)
        .await?;

    Ok(Json(comments))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(announcement_id): Path<String>,
    Json(form): Json<CommentForm>,
) -> Result<(StatusCode, Json<Comment>)> {
    let comment = state.service_context.comment_service
        .add(&user.identity, &announcement_id, form)
        .await?;

    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    state.service_context.comment_service
        .delete(&user.identity, id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
