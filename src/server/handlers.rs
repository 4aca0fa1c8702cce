//! HTTP handlers for the order wizard
//!
//! Handlers take the store lock for one synchronous call each. The lock is
//! never held across an `.await`; export and approval go through
//! [`crate::export`], which copies the order out first.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::config::WizardConfig;
use crate::core::catalog::{CatalogEntry, ProductCategory, ProductModel, ProductType, catalog};
use crate::core::detail::{ArtworkView, Detail, DetailDraft, Position};
use crate::core::error::{ExportError, OrderError, ValidationError, WizardError};
use crate::core::order::{
    Customer, DetailId, ExportKind, ExportRecord, Order, OrderId, OrderStatus, OrderSummary,
};
use crate::core::query::{OrderListParams, PaginatedResponse};
use crate::core::service::{ApprovalNotifier, ExportSink};
use crate::core::sizes::SizeGroup;
use crate::core::validation::{ImagePayload, ValidatedJson, validate_customer, validate_title};
use crate::export::{export_current_order, request_approval};
use crate::store::{OrderStore, SharedStore};
use crate::workflow::{NavigationState, WizardStep};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub config: Arc<WizardConfig>,
    pub notifier: Arc<dyn ApprovalNotifier>,
    /// `None` when no export sink is configured
    pub export_sink: Option<Arc<dyn ExportSink>>,
}

// ----------------------------------------------------------------------
// Request bodies
// ----------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct TitleRequest {
    #[validate(custom(function = "crate::core::validation::not_blank"))]
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: OrderStatus,
    #[serde(default)]
    pub customer: Option<Customer>,
}

#[derive(Debug, Deserialize)]
pub struct StepRequest {
    pub step: WizardStep,
}

#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    pub category: Option<ProductCategory>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductTypeRequest {
    pub product_type: Option<ProductType>,
}

#[derive(Debug, Deserialize)]
pub struct ModelRequest {
    pub model: Option<ProductModel>,
}

#[derive(Debug, Deserialize)]
pub struct ImageRequest {
    pub payload: ImagePayload,
}

#[derive(Debug, Deserialize)]
pub struct DetailOrderRequest {
    pub ids: Vec<DetailId>,
}

#[derive(Debug, Deserialize)]
pub struct MoveDetailRequest {
    pub dragged: DetailId,
    pub target: DetailId,
}

#[derive(Debug, Deserialize)]
pub struct DetailValueRequest {
    pub value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizesRequest {
    pub size_groups: Vec<SizeGroup>,
}

#[derive(Debug, Deserialize)]
pub struct ExportRecordRequest {
    #[serde(rename = "type")]
    pub kind: ExportKind,
    #[serde(default)]
    pub metadata: Value,
}

/// One row of the order list
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderListItem {
    pub id: OrderId,
    pub title: String,
    pub status: OrderStatus,
    pub step: WizardStep,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub summary: OrderSummary,
}

impl From<&Order> for OrderListItem {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id,
            title: order.title.clone(),
            status: order.status,
            step: order.step,
            created_at: order.created_at,
            updated_at: order.updated_at,
            summary: order.summary(),
        }
    }
}

// ----------------------------------------------------------------------
// Helpers
// ----------------------------------------------------------------------

/// Run a mutation on the current order and return it afterwards.
///
/// A mutation that changed nothing (unknown detail id, same value) still
/// answers with the current order.
fn on_current<F>(state: &AppState, edit: F) -> Result<Json<Order>, WizardError>
where
    F: FnOnce(&mut OrderStore) -> Result<bool, WizardError>,
{
    let mut store = state.store.write()?;
    store.require_current()?;
    edit(&mut *store)?;
    Ok(Json(store.require_current()?.clone()))
}

fn order_by_id(store: &OrderStore, id: OrderId) -> Result<Order, WizardError> {
    store
        .order(id)
        .cloned()
        .ok_or_else(|| OrderError::NotFound { id }.into())
}

fn parse_view(view: &str) -> Result<ArtworkView, WizardError> {
    ArtworkView::parse(view).ok_or_else(|| {
        ValidationError::field("view", format!("'{}' is not one of front, back", view)).into()
    })
}

// ----------------------------------------------------------------------
// Service
// ----------------------------------------------------------------------

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "order-wizard"
    }))
}

/// Product options and the configured size chart
pub async fn get_catalog(State(state): State<AppState>) -> Json<Value> {
    let categories: Vec<CatalogEntry> = catalog();
    Json(json!({
        "categories": categories,
        "sizes": state.config.size_chart(),
    }))
}

// ----------------------------------------------------------------------
// Orders
// ----------------------------------------------------------------------

pub async fn list_orders(
    State(state): State<AppState>,
    Query(params): Query<OrderListParams>,
) -> Result<Json<PaginatedResponse<OrderListItem>>, WizardError> {
    let store = state.store.read()?;
    let items = store
        .list_orders(&params.filter())
        .into_iter()
        .map(OrderListItem::from)
        .collect();
    Ok(Json(params.paginate(items)))
}

pub async fn create_order(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<TitleRequest>,
) -> Result<impl IntoResponse, WizardError> {
    let title = validate_title(&body.title)?;
    let mut store = state.store.write()?;
    let id = store.create_order(title)?;
    Ok((StatusCode::CREATED, Json(order_by_id(&store, id)?)))
}

pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>, WizardError> {
    Ok(Json(order_by_id(&*state.store.read()?, id)?))
}

pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<StatusCode, WizardError> {
    if state.store.write()?.delete_order(id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(OrderError::NotFound { id }.into())
    }
}

pub async fn update_title(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    ValidatedJson(body): ValidatedJson<TitleRequest>,
) -> Result<Json<Order>, WizardError> {
    let title = validate_title(&body.title)?;
    let mut store = state.store.write()?;
    order_by_id(&store, id)?;
    store.update_order_title(id, title)?;
    Ok(Json(order_by_id(&store, id)?))
}

pub async fn load_order(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>, WizardError> {
    let mut store = state.store.write()?;
    if !store.load_order(id)? {
        return Err(OrderError::NotFound { id }.into());
    }
    Ok(Json(order_by_id(&store, id)?))
}

pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    Json(body): Json<StatusRequest>,
) -> Result<Json<Order>, WizardError> {
    if let Some(customer) = &body.customer {
        validate_customer(customer)?;
    }
    let mut store = state.store.write()?;
    store.update_order_status(id, body.status, body.customer)?;
    Ok(Json(order_by_id(&store, id)?))
}

pub async fn approve_request(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    ValidatedJson(customer): ValidatedJson<Customer>,
) -> Result<Json<Order>, WizardError> {
    let order = request_approval(&state.store, state.notifier.as_ref(), id, customer).await?;
    Ok(Json(order))
}

// ----------------------------------------------------------------------
// Current order and navigation
// ----------------------------------------------------------------------

pub async fn get_current(State(state): State<AppState>) -> Result<Json<Order>, WizardError> {
    Ok(Json(state.store.read()?.require_current()?.clone()))
}

pub async fn get_navigation(
    State(state): State<AppState>,
) -> Result<Json<NavigationState>, WizardError> {
    state
        .store
        .read()?
        .navigation_state()
        .map(Json)
        .ok_or_else(|| OrderError::NoCurrentOrder.into())
}

fn navigation_after(
    state: &AppState,
    step: impl FnOnce(&mut OrderStore) -> Result<WizardStep, WizardError>,
) -> Result<Json<NavigationState>, WizardError> {
    let mut store = state.store.write()?;
    step(&mut *store)?;
    store
        .navigation_state()
        .map(Json)
        .ok_or_else(|| OrderError::NoCurrentOrder.into())
}

pub async fn navigate(
    State(state): State<AppState>,
    Json(body): Json<StepRequest>,
) -> Result<Json<NavigationState>, WizardError> {
    navigation_after(&state, |store| store.navigate_to(body.step))
}

pub async fn next_step(
    State(state): State<AppState>,
) -> Result<Json<NavigationState>, WizardError> {
    navigation_after(&state, OrderStore::next_step)
}

pub async fn previous_step(
    State(state): State<AppState>,
) -> Result<Json<NavigationState>, WizardError> {
    navigation_after(&state, OrderStore::previous_step)
}

// ----------------------------------------------------------------------
// Product selection and artwork
// ----------------------------------------------------------------------

pub async fn set_category(
    State(state): State<AppState>,
    Json(body): Json<CategoryRequest>,
) -> Result<Json<Order>, WizardError> {
    on_current(&state, |store| store.set_category(body.category))
}

pub async fn set_product_type(
    State(state): State<AppState>,
    Json(body): Json<ProductTypeRequest>,
) -> Result<Json<Order>, WizardError> {
    on_current(&state, |store| store.set_product_type(body.product_type))
}

pub async fn set_model(
    State(state): State<AppState>,
    Json(body): Json<ModelRequest>,
) -> Result<Json<Order>, WizardError> {
    on_current(&state, |store| store.set_model(body.model))
}

pub async fn put_image(
    State(state): State<AppState>,
    Path(view): Path<String>,
    Json(body): Json<ImageRequest>,
) -> Result<Json<Order>, WizardError> {
    let view = parse_view(&view)?;
    on_current(&state, |store| {
        store.set_image(view, Some(body.payload.into_inner()))
    })
}

pub async fn delete_image(
    State(state): State<AppState>,
    Path(view): Path<String>,
) -> Result<Json<Order>, WizardError> {
    let view = parse_view(&view)?;
    on_current(&state, |store| store.set_image(view, None))
}

// ----------------------------------------------------------------------
// Details
// ----------------------------------------------------------------------

pub async fn add_detail(
    State(state): State<AppState>,
    Json(draft): Json<DetailDraft>,
) -> Result<impl IntoResponse, WizardError> {
    let mut store = state.store.write()?;
    let id = store
        .add_detail(draft)?
        .ok_or(OrderError::NoCurrentOrder)?;
    let detail: Option<Detail> = store
        .current_order()
        .and_then(|order| order.detail(id))
        .cloned();
    let detail = detail.ok_or(OrderError::NoCurrentOrder)?;
    Ok((StatusCode::CREATED, Json(detail)))
}

pub async fn reorder_details(
    State(state): State<AppState>,
    Json(body): Json<DetailOrderRequest>,
) -> Result<Json<Order>, WizardError> {
    on_current(&state, |store| store.update_details_order(&body.ids))
}

pub async fn move_detail(
    State(state): State<AppState>,
    Json(body): Json<MoveDetailRequest>,
) -> Result<Json<Order>, WizardError> {
    on_current(&state, |store| store.move_detail(body.dragged, body.target))
}

pub async fn delete_detail(
    State(state): State<AppState>,
    Path(id): Path<DetailId>,
) -> Result<Json<Order>, WizardError> {
    on_current(&state, |store| store.remove_detail(id))
}

pub async fn set_detail_position(
    State(state): State<AppState>,
    Path(id): Path<DetailId>,
    Json(position): Json<Position>,
) -> Result<Json<Order>, WizardError> {
    on_current(&state, |store| store.update_detail_position(id, position))
}

pub async fn set_detail_content_position(
    State(state): State<AppState>,
    Path(id): Path<DetailId>,
    Json(position): Json<Position>,
) -> Result<Json<Order>, WizardError> {
    on_current(&state, |store| {
        store.update_detail_content_position(id, position)
    })
}

pub async fn set_detail_value(
    State(state): State<AppState>,
    Path(id): Path<DetailId>,
    Json(body): Json<DetailValueRequest>,
) -> Result<Json<Order>, WizardError> {
    on_current(&state, |store| store.update_detail_value(id, body.value))
}

// ----------------------------------------------------------------------
// Sizes and exports
// ----------------------------------------------------------------------

pub async fn update_sizes(
    State(state): State<AppState>,
    Json(body): Json<SizesRequest>,
) -> Result<Json<Order>, WizardError> {
    on_current(&state, |store| store.update_sizes(body.size_groups))
}

pub async fn add_export_record(
    State(state): State<AppState>,
    Json(body): Json<ExportRecordRequest>,
) -> Result<impl IntoResponse, WizardError> {
    let record = ExportRecord::new(body.kind, body.metadata);
    let mut store = state.store.write()?;
    store.require_current()?;
    store.add_export_record(record.clone())?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn delete_export_record(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Order>, WizardError> {
    on_current(&state, |store| store.remove_export_record(id))
}

pub async fn export_current(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, WizardError> {
    let sink = state.export_sink.clone().ok_or_else(|| ExportError::NotConfigured {
        sink: "export".to_string(),
    })?;
    let record = export_current_order(&state.store, sink.as_ref()).await?;
    Ok((StatusCode::CREATED, Json(record)))
}
