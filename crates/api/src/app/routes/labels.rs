use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use flipstock_infra::RepositoryError;
use flipstock_labels::{plan_sheet, SheetOptions, SheetPreset};

use crate::app::{dto, errors, services::AppServices};
use crate::context::CurrentUser;

/// `GET /labels/sheet?ids=a,b&copies=&cols=&show_text=&size=`
///
/// Plans a printable label sheet for the selected items. Ids that don't
/// resolve to the caller's items are skipped.
pub async fn sheet(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<dto::SheetParams>,
) -> Result<axum::response::Response, axum::response::Response> {
    let ids_param = params.ids.unwrap_or_default();
    let raw_ids: Vec<&str> = ids_param
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if raw_ids.is_empty() {
        return Err(errors::json_error(
            StatusCode::BAD_REQUEST,
            "missing_ids",
            "ids query parameter is required",
        ));
    }

    let mut items = Vec::with_capacity(raw_ids.len());
    for raw in raw_ids {
        let item_id = dto::parse_item_id(raw)?;
        match services.items.get(user.user_id(), item_id).await {
            Ok(item) => items.push(item),
            Err(RepositoryError::NotFound) => {}
            Err(e) => return Err(errors::repository_error_to_response(e)),
        }
    }

    let preset = match params.size.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => Some(
            raw.parse::<SheetPreset>()
                .map_err(errors::domain_error_to_response)?,
        ),
        None => None,
    };

    let options = SheetOptions::new(
        params.copies.unwrap_or(1),
        params.cols.unwrap_or(3),
        params.show_text.as_deref() != Some("0"),
        preset,
    );

    let sheet = plan_sheet(&items, &options).map_err(errors::domain_error_to_response)?;
    Ok(Json(sheet).into_response())
}
