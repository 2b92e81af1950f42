use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

use crate::{
    api::{forms::FormData, middleware::auth::CurrentUser, state::AppState},
    domain::{Announcement, AnnouncementForm},
    error::Result,
    service::announcement_service::{AnnouncementDetail, FeedView},
};

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    pub q: Option<String>,
}

fn announcement_form(form: &mut FormData) -> AnnouncementForm {
    AnnouncementForm {
        title: form.take_or_default("title"),
        description: form.take_or_default("description"),
    }
}

pub async fn feed(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<FeedQuery>,
) -> Result<Json<FeedView>> {
    let view = state.service_context.announcement_service
        .feed(&user.identity, params.q.as_deref())
        .await?;

    Ok(Json(view))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Announcement>)> {
    let mut form = FormData::parse(multipart).await?;
    let fields = announcement_form(&mut form);

    let announcement = state.service_context.announcement_service
        .create(&user.identity, fields, form.image)
        .await?;

    Ok((StatusCode::CREATED, Json(announcement)))
}

pub async fn detail(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<AnnouncementDetail>> {
    let detail = state.service_context.announcement_service
        .detail(&user.identity, &id)
        .await?;

    Ok(Json(detail))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<Announcement>> {
    let mut form = FormData::parse(multipart).await?;
    let fields = announcement_form(&mut form);

    let announcement = state.service_context.announcement_service
        .update(&user.identity, &id, fields, form.image)
        .await?;

    Ok(Json(announcement))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.service_context.announcement_service
        .delete(&user.identity, &id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
