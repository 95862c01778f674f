//! Server side of the scan intake: the endpoint the one-shot scan session
//! (or a USB scanner form) POSTs its decoded barcode to.

use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    Form, Json,
};
use chrono::Utc;
use serde_json::json;

use flipstock_inventory::{Barcode, Item, NewItem};

use crate::app::{dto, errors, services::AppServices};
use crate::context::CurrentUser;

/// `POST /scan`, form-encoded, sole field `barcode`.
///
/// Looks the barcode up among the caller's items; creates a minimal
/// "Untitled" item carrying the barcode when it's new.
pub async fn intake(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Form(form): Form<dto::ScanForm>,
) -> Result<axum::response::Response, axum::response::Response> {
    let user_id = user.user_id();

    let barcode = Barcode::parse(&form.barcode).map_err(|_| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_barcode", "barcode is required")
    })?;

    if let Some(existing) = services
        .items
        .find_by_barcode(user_id, &barcode)
        .await
        .map_err(errors::repository_error_to_response)?
    {
        return Ok((
            StatusCode::OK,
            Json(json!({
                "found": true,
                "item": dto::item_to_json(&existing)?,
            })),
        )
            .into_response());
    }

    let new = NewItem {
        barcode: Some(barcode.clone()),
        ..NewItem::default()
    };
    let item =
        Item::create(user_id, new, Utc::now()).map_err(errors::domain_error_to_response)?;
    let item = services
        .items
        .create(item)
        .await
        .map_err(errors::repository_error_to_response)?;

    tracing::info!(barcode = %barcode, item_id = %item.id, "scan created a new item");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "found": false,
            "item": dto::item_to_json(&item)?,
        })),
    )
        .into_response())
}

/// `GET /api/items/lookup?barcode=`: the quick check the scanner page uses
/// to decide where to navigate. Always 200; unusable input is just "not
/// found".
pub async fn lookup(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<dto::LookupParams>,
) -> Result<axum::response::Response, axum::response::Response> {
    let raw = params.barcode.unwrap_or_default();
    let Ok(barcode) = Barcode::parse(&raw) else {
        return Ok(Json(json!({ "found": false })).into_response());
    };

    let found = services
        .items
        .find_by_barcode(user.user_id(), &barcode)
        .await
        .map_err(errors::repository_error_to_response)?;

    Ok(match found {
        Some(item) => Json(json!({ "found": true, "id": item.id.to_string() })).into_response(),
        None => Json(json!({ "found": false })).into_response(),
    })
}
