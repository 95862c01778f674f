use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde_json::json;

use flipstock_core::CategoryId;
use flipstock_infra::RepositoryError;
use flipstock_inventory::{Barcode, Item, NewItem};

use crate::app::{dto, errors, services::AppServices};
use crate::context::CurrentUser;

/// Resolve an optional category-id string against the caller's categories.
///
/// Form semantics: an unparsable or foreign category is silently dropped
/// rather than rejected.
async fn resolve_category(
    services: &AppServices,
    user: CurrentUser,
    raw: Option<&str>,
) -> Result<Option<CategoryId>, axum::response::Response> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    let Ok(category_id) = raw.parse::<CategoryId>() else {
        return Ok(None);
    };

    match services.categories.get(user.user_id(), category_id).await {
        Ok(category) => Ok(Some(category.id)),
        Err(RepositoryError::NotFound) => Ok(None),
        Err(e) => Err(errors::repository_error_to_response(e)),
    }
}

pub async fn list(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<dto::ListItemsParams>,
) -> Result<axum::response::Response, axum::response::Response> {
    let category = match params.category.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(dto::parse_category_id(raw)?),
    };

    let items = services
        .items
        .list(user.user_id(), category)
        .await
        .map_err(errors::repository_error_to_response)?;

    let items = items
        .iter()
        .map(dto::item_to_json)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(json!({ "items": items })).into_response())
}

pub async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<dto::CreateItemRequest>,
) -> Result<axum::response::Response, axum::response::Response> {
    let user_id = user.user_id();

    let barcode = match body.barcode.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(Barcode::parse(raw).map_err(errors::domain_error_to_response)?),
    };

    // Duplicate barcodes point the caller at the existing item instead of
    // creating a twin.
    if let Some(barcode) = &barcode {
        if let Some(existing) = services
            .items
            .find_by_barcode(user_id, barcode)
            .await
            .map_err(errors::repository_error_to_response)?
        {
            return Err((
                StatusCode::CONFLICT,
                Json(json!({
                    "error": "duplicate_barcode",
                    "message": "an item with that barcode already exists",
                    "existing_id": existing.id.to_string(),
                })),
            )
                .into_response());
        }
    }

    let category_id = resolve_category(&services, user, body.category_id.as_deref()).await?;

    let new = NewItem {
        title: body.title.unwrap_or_default(),
        category_id,
        barcode,
        brand: body.brand,
        size: body.size,
        color: body.color,
        condition: body.condition,
        notes: body.notes,
        purchase_source: body.purchase_source,
        purchase_price: dto::parse_optional_money("purchase_price", body.purchase_price.as_deref())?,
        purchase_date: dto::parse_optional_date("purchase_date", body.purchase_date.as_deref())?,
        list_price: dto::parse_optional_money("list_price", body.list_price.as_deref())?,
        sold_price: dto::parse_optional_money("sold_price", body.sold_price.as_deref())?,
        sold_date: dto::parse_optional_date("sold_date", body.sold_date.as_deref())?,
    };

    let item = Item::create(user_id, new, Utc::now()).map_err(errors::domain_error_to_response)?;
    let item = services
        .items
        .create(item)
        .await
        .map_err(errors::repository_error_to_response)?;

    Ok((StatusCode::CREATED, Json(dto::item_to_json(&item)?)).into_response())
}

pub async fn get_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<axum::response::Response, axum::response::Response> {
    let item_id = dto::parse_item_id(&id)?;
    let item = services
        .items
        .get(user.user_id(), item_id)
        .await
        .map_err(errors::repository_error_to_response)?;

    Ok(Json(dto::item_to_json(&item)?).into_response())
}

pub async fn update(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateItemRequest>,
) -> Result<axum::response::Response, axum::response::Response> {
    let user_id = user.user_id();
    let item_id = dto::parse_item_id(&id)?;

    let mut item = services
        .items
        .get(user_id, item_id)
        .await
        .map_err(errors::repository_error_to_response)?;

    let now = Utc::now();

    if let Some(title) = &body.title {
        item.rename(title, now).map_err(errors::domain_error_to_response)?;
    }

    if let Some(raw) = body.barcode.as_deref().map(str::trim) {
        let barcode = if raw.is_empty() {
            None
        } else {
            Some(Barcode::parse(raw).map_err(errors::domain_error_to_response)?)
        };
        item.set_barcode(barcode, now);
    }

    if let Some(raw) = body.category_id.as_deref().map(str::trim) {
        if raw.is_empty() {
            item.set_category(None, now);
        } else if let Some(category_id) =
            resolve_category(&services, user, Some(raw)).await?
        {
            item.set_category(Some(category_id), now);
        }
    }

    if let Some(price) = dto::parse_optional_money("purchase_price", body.purchase_price.as_deref())?
    {
        item.set_purchase_price(price, now)
            .map_err(errors::domain_error_to_response)?;
    }

    if body.purchase_date.is_some() {
        let date = dto::parse_optional_date("purchase_date", body.purchase_date.as_deref())?;
        item.set_purchase_date(date, now);
    }

    if let Some(source) = body.purchase_source.clone() {
        item.set_purchase_source(Some(source), now);
    }

    if body.list_price.is_some() {
        let price = dto::parse_optional_money("list_price", body.list_price.as_deref())?;
        item.set_list_price(price, now)
            .map_err(errors::domain_error_to_response)?;
    }

    if let Some(price) = dto::parse_optional_money("sold_price", body.sold_price.as_deref())? {
        let date = dto::parse_optional_date("sold_date", body.sold_date.as_deref())?;
        item.record_sale(price, date, now)
            .map_err(errors::domain_error_to_response)?;
    }

    if let Some(notes) = body.notes.clone() {
        item.set_notes(Some(notes), now);
    }

    let item = services
        .items
        .update(item)
        .await
        .map_err(errors::repository_error_to_response)?;

    Ok(Json(dto::item_to_json(&item)?).into_response())
}

pub async fn delete_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<axum::response::Response, axum::response::Response> {
    let item_id = dto::parse_item_id(&id)?;
    services
        .items
        .delete(user.user_id(), item_id)
        .await
        .map_err(errors::repository_error_to_response)?;

    Ok(Json(json!({ "ok": true })).into_response())
}

pub async fn bulk_delete(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<dto::BulkDeleteRequest>,
) -> Result<axum::response::Response, axum::response::Response> {
    let mut ids = Vec::with_capacity(body.ids.len());
    for raw in &body.ids {
        ids.push(dto::parse_item_id(raw)?);
    }

    let deleted = services
        .items
        .delete_many(user.user_id(), &ids)
        .await
        .map_err(errors::repository_error_to_response)?;

    Ok(Json(json!({ "deleted": deleted })).into_response())
}

pub async fn by_barcode(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(barcode): Path<String>,
) -> Result<axum::response::Response, axum::response::Response> {
    let barcode = Barcode::parse(&barcode).map_err(errors::domain_error_to_response)?;

    let item = services
        .items
        .find_by_barcode(user.user_id(), &barcode)
        .await
        .map_err(errors::repository_error_to_response)?
        .ok_or_else(|| {
            errors::json_error(StatusCode::NOT_FOUND, "not_found", "no item with that barcode")
        })?;

    Ok(Json(dto::item_to_json(&item)?).into_response())
}

pub async fn record_sale(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(body): Json<dto::SaleRequest>,
) -> Result<axum::response::Response, axum::response::Response> {
    let user_id = user.user_id();
    let item_id = dto::parse_item_id(&id)?;

    let sold_price = dto::parse_money_field("sold_price", &body.sold_price)?;
    let sold_date = dto::parse_optional_date("sold_date", body.sold_date.as_deref())?;

    let mut item = services
        .items
        .get(user_id, item_id)
        .await
        .map_err(errors::repository_error_to_response)?;

    item.record_sale(sold_price, sold_date, Utc::now())
        .map_err(errors::domain_error_to_response)?;

    let item = services
        .items
        .update(item)
        .await
        .map_err(errors::repository_error_to_response)?;

    Ok(Json(dto::item_to_json(&item)?).into_response())
}

pub async fn economics(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<axum::response::Response, axum::response::Response> {
    let item_id = dto::parse_item_id(&id)?;
    let item = services
        .items
        .get(user.user_id(), item_id)
        .await
        .map_err(errors::repository_error_to_response)?;

    let econ = item.economics().map_err(errors::domain_error_to_response)?;

    Ok(Json(json!({
        "id": item.id.to_string(),
        "status": dto::status_str(econ.status),
        "break_even_price": dto::money_opt(econ.break_even_price),
        "payout": dto::money_opt(econ.payout),
        "profit": dto::money_opt(econ.profit),
    }))
    .into_response())
}
