use axum::{
    routing::{delete, get, post},
    Router,
};

pub mod auth;
pub mod categories;
pub mod items;
pub mod labels;
pub mod scan;
pub mod system;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        // The path the client-side scan session submits to.
        .route(flipstock_scan::SCAN_ENDPOINT, post(scan::intake))
        .route("/api/items/lookup", get(scan::lookup))
        .route("/items", get(items::list).post(items::create))
        .route("/items/bulk_delete", post(items::bulk_delete))
        .route("/items/by_barcode/:barcode", get(items::by_barcode))
        .route(
            "/items/:id",
            get(items::get_item).put(items::update).delete(items::delete_item),
        )
        .route("/items/:id/sale", post(items::record_sale))
        .route("/items/:id/economics", get(items::economics))
        .route("/categories", get(categories::list).post(categories::create))
        .route("/categories/:id", delete(categories::delete_category))
        .route("/labels/sheet", get(labels::sheet))
}
