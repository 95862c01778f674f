use axum::http::StatusCode;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};

use flipstock_core::{CategoryId, ItemId, Money};
use flipstock_inventory::{Category, Item, ItemStatus};

use crate::app::errors;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// The form-encoded scan submission: the sole `barcode` field.
#[derive(Debug, Deserialize)]
pub struct ScanForm {
    pub barcode: String,
}

#[derive(Debug, Deserialize)]
pub struct LookupParams {
    pub barcode: Option<String>,
}

/// Item creation. Money and date fields arrive as strings (`"12.95"`,
/// `"2026-08-01"`), the way the entry form posts them.
#[derive(Debug, Deserialize, Default)]
pub struct CreateItemRequest {
    pub title: Option<String>,
    pub category_id: Option<String>,
    pub barcode: Option<String>,
    pub brand: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub condition: Option<String>,
    pub notes: Option<String>,
    pub purchase_source: Option<String>,
    pub purchase_price: Option<String>,
    pub purchase_date: Option<String>,
    pub list_price: Option<String>,
    pub sold_price: Option<String>,
    pub sold_date: Option<String>,
}

/// Item update. Absent fields are left untouched; an empty string clears an
/// optional field (clearing the list price re-derives break-even).
#[derive(Debug, Deserialize, Default)]
pub struct UpdateItemRequest {
    pub title: Option<String>,
    pub category_id: Option<String>,
    pub barcode: Option<String>,
    pub brand: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub condition: Option<String>,
    pub notes: Option<String>,
    pub purchase_source: Option<String>,
    pub purchase_price: Option<String>,
    pub purchase_date: Option<String>,
    pub list_price: Option<String>,
    pub sold_price: Option<String>,
    pub sold_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SaleRequest {
    pub sold_price: String,
    pub sold_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BulkDeleteRequest {
    pub ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ListItemsParams {
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SheetParams {
    /// Comma-separated item ids.
    pub ids: Option<String>,
    pub copies: Option<u32>,
    pub cols: Option<u32>,
    /// `"0"` hides the human-readable text under each barcode.
    pub show_text: Option<String>,
    /// Label stock preset name (`avery5160`, `avery5167`, `2x1`, `1.5x1`).
    pub size: Option<String>,
}

// -------------------------
// Field parsing helpers
// -------------------------

pub fn parse_item_id(s: &str) -> Result<ItemId, axum::response::Response> {
    s.parse().map_err(|_| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid item id")
    })
}

pub fn parse_category_id(s: &str) -> Result<CategoryId, axum::response::Response> {
    s.parse().map_err(|_| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid category id")
    })
}

pub fn parse_money_field(
    field: &'static str,
    value: &str,
) -> Result<Money, axum::response::Response> {
    value.parse().map_err(|_| {
        errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_amount",
            format!("{field} must be a decimal amount like 12.95"),
        )
    })
}

pub fn parse_date_field(
    field: &'static str,
    value: &str,
) -> Result<NaiveDate, axum::response::Response> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_date",
            format!("{field} must be a date like 2026-08-01"),
        )
    })
}

/// Parse an optional money field; empty strings count as absent.
pub fn parse_optional_money(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<Money>, axum::response::Response> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => parse_money_field(field, v).map(Some),
    }
}

/// Parse an optional date field; empty strings count as absent.
pub fn parse_optional_date(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<NaiveDate>, axum::response::Response> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => parse_date_field(field, v).map(Some),
    }
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn money_opt(value: Option<Money>) -> Value {
    match value {
        Some(v) => Value::String(v.to_string()),
        None => Value::Null,
    }
}

pub fn status_str(status: ItemStatus) -> &'static str {
    match status {
        ItemStatus::Listed => "listed",
        ItemStatus::Sold => "sold",
    }
}

pub fn item_to_json(item: &Item) -> Result<Value, axum::response::Response> {
    let econ = item.economics().map_err(errors::domain_error_to_response)?;

    Ok(json!({
        "id": item.id.to_string(),
        "title": item.title,
        "category_id": item.category_id.map(|c| c.to_string()),
        "barcode": item.barcode.as_ref().map(|b| b.as_str()),
        "brand": item.brand,
        "size": item.size,
        "color": item.color,
        "condition": item.condition,
        "notes": item.notes,
        "purchase_source": item.purchase_source,
        "purchase_price": item.purchase_price.to_string(),
        "purchase_date": item.purchase_date.map(|d| d.to_string()),
        "list_price": money_opt(item.list_price),
        "photo_path": item.photo_path,
        "sold_price": money_opt(item.sold_price),
        "sold_date": item.sold_date.map(|d| d.to_string()),
        "status": status_str(econ.status),
        "economics": {
            "break_even_price": money_opt(econ.break_even_price),
            "payout": money_opt(econ.payout),
            "profit": money_opt(econ.profit),
        },
        "created_at": item.created_at.to_rfc3339(),
        "updated_at": item.updated_at.to_rfc3339(),
    }))
}

pub fn category_to_json(category: &Category) -> Value {
    json!({
        "id": category.id.to_string(),
        "name": category.name,
    })
}
