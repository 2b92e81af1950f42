use axum::{
    extract::{Multipart, Path, State},
    Extension, Json,
};

use crate::{
    api::{forms::FormData, middleware::auth::CurrentUser, state::AppState},
    domain::{ProfileForm, User},
    error::Result,
    service::profile_service::ProfileView,
};

fn profile_form(form: &mut FormData) -> ProfileForm {
    ProfileForm {
        display_name: form.take("display_name"),
        contact_number: form.take("contact_number"),
        document_number: form.take("document_number"),
        apartment_number: form.take("apartment_number"),
        about_me: form.take("about_me"),
    }
}

pub async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ProfileView>> {
    let view = state.service_context.profile_service
        .my_profile(&user.identity.uid)
        .await?;

    Ok(Json(view))
}

pub async fn setup(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    multipart: Multipart,
) -> Result<Json<User>> {
    let mut form = FormData::parse(multipart).await?;
    let fields = profile_form(&mut form);

    let profile = state.service_context.profile_service
        .setup_profile(&user.identity, fields, form.image)
        .await?;

    Ok(Json(profile))
}

pub async fn edit(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    multipart: Multipart,
) -> Result<Json<User>> {
    let mut form = FormData::parse(multipart).await?;
    let fields = profile_form(&mut form);

    let profile = state.service_context.profile_service
        .edit_profile(&user.identity, fields, form.image)
        .await?;

    Ok(Json(profile))
}

pub async fn preview(
    State(state): State<AppState>,
    Extension(_user): Extension<CurrentUser>,
    Path(uid): Path<String>,
) -> Result<Json<User>> {
    let profile = state.service_context.profile_service
        .preview(&uid)
        .await?;

    Ok(Json(profile))
}
