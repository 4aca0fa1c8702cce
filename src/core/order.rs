//! The order aggregate and its owned records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use validator::Validate;

use crate::core::catalog::{ProductCategory, ProductModel, ProductType};
use crate::core::detail::{ArtworkView, Detail};
use crate::core::sizes::SizeGroup;
use crate::workflow::WizardStep;

pub type OrderId = Uuid;
pub type DetailId = Uuid;

/// Approval status of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Draft,
    Pending,
    Approved,
    Rejected,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Draft => "draft",
            OrderStatus::Pending => "pending",
            OrderStatus::Approved => "approved",
            OrderStatus::Rejected => "rejected",
        }
    }

    /// Statuses reachable from this one
    pub fn allowed_transitions(&self) -> &'static [OrderStatus] {
        match self {
            OrderStatus::Draft => &[OrderStatus::Pending],
            OrderStatus::Pending => &[OrderStatus::Approved, OrderStatus::Rejected],
            OrderStatus::Approved | OrderStatus::Rejected => &[],
        }
    }

    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }

    pub fn is_final(&self) -> bool {
        self.allowed_transitions().is_empty()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Customer attached to an approval request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[validate(custom(function = "crate::core::validation::not_blank"))]
    pub full_name: String,
    #[validate(custom(function = "crate::core::validation::email_address"))]
    pub email: String,
}

impl Customer {
    pub fn new(full_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            email: email.into(),
        }
    }
}

/// Kind of export an [`ExportRecord`] logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    Trello,
}

impl ExportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportKind::Trello => "trello",
        }
    }
}

/// One entry of the append-only export log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: ExportKind,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl ExportRecord {
    pub fn new(kind: ExportKind, metadata: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            timestamp: Utc::now(),
            metadata,
        }
    }
}

/// Metadata logged for a Trello card export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrelloExportMetadata {
    pub card_id: String,
    pub card_url: String,
    pub board_name: String,
    pub list_id: String,
    pub list_name: String,
}

impl TrelloExportMetadata {
    pub fn into_record(self) -> ExportRecord {
        // Plain string fields always serialize
        let metadata = serde_json::to_value(&self).unwrap_or(serde_json::Value::Null);
        ExportRecord::new(ExportKind::Trello, metadata)
    }
}

/// The root purchase-order aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<Customer>,
    pub step: WizardStep,
    #[serde(default)]
    pub category: Option<ProductCategory>,
    #[serde(default)]
    pub product_type: Option<ProductType>,
    #[serde(default)]
    pub model: Option<ProductModel>,
    #[serde(default)]
    pub front_image: Option<String>,
    #[serde(default)]
    pub back_image: Option<String>,
    #[serde(default)]
    pub details: Vec<Detail>,
    #[serde(default)]
    pub size_groups: Vec<SizeGroup>,
    #[serde(default)]
    pub exports: Vec<ExportRecord>,
}

impl Order {
    /// A fresh draft on the first step
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            created_at: now,
            updated_at: now,
            status: OrderStatus::Draft,
            customer: None,
            step: WizardStep::Product,
            category: None,
            product_type: None,
            model: None,
            front_image: None,
            back_image: None,
            details: Vec::new(),
            size_groups: Vec::new(),
            exports: Vec::new(),
        }
    }

    /// Refresh `updated_at`, never moving it backwards
    pub fn touch(&mut self) {
        let now = Utc::now();
        if now > self.updated_at {
            self.updated_at = now;
        }
    }

    /// Setting a category invalidates the narrower selections
    pub fn set_category(&mut self, category: Option<ProductCategory>) {
        self.category = category;
        self.product_type = None;
        self.model = None;
    }

    pub fn set_product_type(&mut self, product_type: Option<ProductType>) {
        self.product_type = product_type;
        self.model = None;
    }

    pub fn set_model(&mut self, model: Option<ProductModel>) {
        self.model = model;
    }

    pub fn image(&self, view: ArtworkView) -> Option<&str> {
        match view {
            ArtworkView::Front => self.front_image.as_deref(),
            ArtworkView::Back => self.back_image.as_deref(),
        }
    }

    pub fn set_image(&mut self, view: ArtworkView, payload: Option<String>) {
        match view {
            ArtworkView::Front => self.front_image = payload,
            ArtworkView::Back => self.back_image = payload,
        }
    }

    /// An empty payload does not count as an uploaded image
    pub fn has_image(&self, view: ArtworkView) -> bool {
        self.image(view).is_some_and(|payload| !payload.is_empty())
    }

    pub fn detail(&self, id: DetailId) -> Option<&Detail> {
        self.details.iter().find(|d| d.id == id)
    }

    pub fn detail_mut(&mut self, id: DetailId) -> Option<&mut Detail> {
        self.details.iter_mut().find(|d| d.id == id)
    }

    pub fn total_quantity(&self) -> u32 {
        self.size_groups.iter().map(SizeGroup::total).sum()
    }

    pub fn summary(&self) -> OrderSummary {
        OrderSummary {
            category: self.category,
            product_type: self.product_type,
            model: self.model,
            front_image: self.has_image(ArtworkView::Front),
            back_image: self.has_image(ArtworkView::Back),
            detail_count: self.details.len(),
            total_quantity: self.total_quantity(),
        }
    }
}

/// Compact progress view of an order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub category: Option<ProductCategory>,
    pub product_type: Option<ProductType>,
    pub model: Option<ProductModel>,
    pub front_image: bool,
    pub back_image: bool,
    pub detail_count: usize,
    pub total_quantity: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_order_defaults() {
        let order = Order::new("Team A");
        assert_eq!(order.step, WizardStep::Product);
        assert_eq!(order.status, OrderStatus::Draft);
        assert_eq!(order.created_at, order.updated_at);
        assert!(order.details.is_empty());
        assert!(order.exports.is_empty());
    }

    #[test]
    fn test_category_cascade() {
        let mut order = Order::new("Team A");
        order.set_category(Some(ProductCategory::Football));
        order.set_product_type(Some(ProductType::Jersey));
        order.set_model(Some(ProductModel::Flex));

        order.set_product_type(Some(ProductType::Pants));
        assert_eq!(order.model, None);

        order.set_model(Some(ProductModel::Speed));
        order.set_category(Some(ProductCategory::Basketball));
        assert_eq!(order.product_type, None);
        assert_eq!(order.model, None);
    }

    #[test]
    fn test_status_transition_table() {
        assert!(OrderStatus::Draft.can_transition_to(OrderStatus::Pending));
        assert!(!OrderStatus::Draft.can_transition_to(OrderStatus::Approved));
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Rejected));
        assert!(OrderStatus::Approved.is_final());
        assert!(!OrderStatus::Rejected.can_transition_to(OrderStatus::Draft));
    }

    #[test]
    fn test_empty_image_is_not_set() {
        let mut order = Order::new("Team A");
        order.set_image(ArtworkView::Front, Some(String::new()));
        assert!(!order.has_image(ArtworkView::Front));
        order.set_image(ArtworkView::Front, Some("data:image/png;base64,AA".into()));
        assert!(order.has_image(ArtworkView::Front));
        assert!(order.summary().front_image);
    }

    #[test]
    fn test_order_json_shape() {
        let order = Order::new("Team A");
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["step"], 1);
        assert_eq!(json["status"], "draft");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("sizeGroups").is_some());

        let back: Order = serde_json::from_value(json).unwrap();
        assert_eq!(back, order);
    }

    #[test]
    fn test_trello_metadata_record() {
        let record = TrelloExportMetadata {
            card_id: "c1".into(),
            card_url: "https://trello.com/c/c1".into(),
            board_name: "Your Board".into(),
            list_id: "l1".into(),
            list_name: "Orders".into(),
        }
        .into_record();
        assert_eq!(record.kind, ExportKind::Trello);
        assert_eq!(record.metadata["cardUrl"], "https://trello.com/c/c1");
    }
}
