use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use serde_json::json;

use flipstock_auth::{Credentials, User};

use crate::app::{dto, errors, services::AppServices};

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::RegisterRequest>,
) -> Result<axum::response::Response, axum::response::Response> {
    let credentials = Credentials::parse(&body.email, &body.password)
        .map_err(errors::domain_error_to_response)?;

    let user =
        User::register(&credentials, Utc::now()).map_err(errors::domain_error_to_response)?;

    let user = services
        .users
        .create(user)
        .await
        .map_err(errors::repository_error_to_response)?;

    tracing::info!(user_id = %user.id, "account registered");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": user.id.to_string(),
            "email": user.email,
        })),
    )
        .into_response())
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginRequest>,
) -> Result<axum::response::Response, axum::response::Response> {
    let invalid = || {
        errors::json_error(
            StatusCode::UNAUTHORIZED,
            "invalid_credentials",
            "invalid email or password",
        )
    };

    // Parsing normalizes the email the same way registration does; parse
    // failures read as bad credentials, not validation hints.
    let credentials = Credentials::parse(&body.email, &body.password).map_err(|_| invalid())?;

    let user = services
        .users
        .find_by_email(credentials.email())
        .await
        .map_err(errors::repository_error_to_response)?
        .ok_or_else(invalid)?;

    if !user.verify_password(credentials.password()) {
        return Err(invalid());
    }

    let token = services.jwt.issue(user.id, Utc::now()).map_err(|e| {
        errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "token_error", e.to_string())
    })?;

    Ok(Json(json!({ "token": token })).into_response())
}
