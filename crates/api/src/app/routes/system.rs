use std::sync::Arc;

use axum::{extract::Extension, response::IntoResponse, Json};
use serde_json::json;

use crate::app::{errors, services::AppServices};
use crate::context::CurrentUser;

pub async fn healthz() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

pub async fn whoami(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<axum::response::Response, axum::response::Response> {
    let account = services
        .users
        .get(user.user_id())
        .await
        .map_err(errors::repository_error_to_response)?;

    Ok(Json(json!({
        "user_id": account.id.to_string(),
        "email": account.email,
    }))
    .into_response())
}
