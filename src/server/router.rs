//! Route table for the order wizard REST surface

use axum::{
    Router,
    routing::{get, post, put},
};

use super::handlers::{self, AppState};

/// Build the order routes
///
/// - `/orders` and `/orders/{id}/...` address any order by id
/// - `/current/...` acts on the selected order
/// - `/catalog` and `/health` are read-only
pub fn build_order_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/catalog", get(handlers::get_catalog))
        .route(
            "/orders",
            get(handlers::list_orders).post(handlers::create_order),
        )
        .route(
            "/orders/{id}",
            get(handlers::get_order).delete(handlers::delete_order),
        )
        .route("/orders/{id}/title", put(handlers::update_title))
        .route("/orders/{id}/load", post(handlers::load_order))
        .route("/orders/{id}/status", put(handlers::update_status))
        .route("/orders/{id}/approval", post(handlers::approve_request))
        .route("/current", get(handlers::get_current))
        .route("/current/navigation", get(handlers::get_navigation))
        .route("/current/step", put(handlers::navigate))
        .route("/current/step/next", post(handlers::next_step))
        .route("/current/step/previous", post(handlers::previous_step))
        .route("/current/category", put(handlers::set_category))
        .route("/current/product-type", put(handlers::set_product_type))
        .route("/current/model", put(handlers::set_model))
        .route(
            "/current/images/{view}",
            put(handlers::put_image).delete(handlers::delete_image),
        )
        .route("/current/details", post(handlers::add_detail))
        .route("/current/details/order", put(handlers::reorder_details))
        .route("/current/details/move", post(handlers::move_detail))
        .route(
            "/current/details/{id}",
            axum::routing::delete(handlers::delete_detail),
        )
        .route(
            "/current/details/{id}/position",
            put(handlers::set_detail_position),
        )
        .route(
            "/current/details/{id}/content-position",
            put(handlers::set_detail_content_position),
        )
        .route("/current/details/{id}/value", put(handlers::set_detail_value))
        .route("/current/sizes", put(handlers::update_sizes))
        .route("/current/exports", post(handlers::add_export_record))
        .route(
            "/current/exports/{id}",
            axum::routing::delete(handlers::delete_export_record),
        )
        .route("/current/export", post(handlers::export_current))
        .with_state(state)
}
