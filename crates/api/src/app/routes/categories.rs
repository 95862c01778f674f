use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;

use flipstock_inventory::Category;

use crate::app::{dto, errors, services::AppServices};
use crate::context::CurrentUser;

pub async fn list(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<axum::response::Response, axum::response::Response> {
    let categories = services
        .categories
        .list(user.user_id())
        .await
        .map_err(errors::repository_error_to_response)?;

    let categories: Vec<_> = categories.iter().map(dto::category_to_json).collect();
    Ok(Json(json!({ "categories": categories })).into_response())
}

/// Idempotent create: an existing name answers 200 with `created: false`,
/// so the scanner page can "ensure" a category without a pre-check.
pub async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<dto::CreateCategoryRequest>,
) -> Result<axum::response::Response, axum::response::Response> {
    let user_id = user.user_id();

    let category =
        Category::create(user_id, &body.name).map_err(errors::domain_error_to_response)?;

    if let Some(existing) = services
        .categories
        .find_by_name(user_id, &category.name)
        .await
        .map_err(errors::repository_error_to_response)?
    {
        return Ok(Json(json!({
            "id": existing.id.to_string(),
            "name": existing.name,
            "created": false,
        }))
        .into_response());
    }

    let category = services
        .categories
        .create(category)
        .await
        .map_err(errors::repository_error_to_response)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": category.id.to_string(),
            "name": category.name,
            "created": true,
        })),
    )
        .into_response())
}

pub async fn delete_category(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<axum::response::Response, axum::response::Response> {
    let category_id = dto::parse_category_id(&id)?;

    services
        .categories
        .delete(user.user_id(), category_id)
        .await
        .map_err(errors::repository_error_to_response)?;

    Ok(Json(json!({ "ok": true })).into_response())
}
