//! Order list filtering and pagination

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::catalog::{ProductCategory, ProductModel, ProductType};
use crate::core::order::Order;

/// A product selection an order must carry to match a filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderTag {
    Category(ProductCategory),
    ProductType(ProductType),
    Model(ProductModel),
}

impl OrderTag {
    /// Resolve a display label to a tag, categories first
    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim();
        ProductCategory::from_label(label)
            .map(OrderTag::Category)
            .or_else(|| ProductType::from_label(label).map(OrderTag::ProductType))
            .or_else(|| ProductModel::from_label(label).map(OrderTag::Model))
    }

    pub fn matches(&self, order: &Order) -> bool {
        match self {
            OrderTag::Category(c) => order.category == Some(*c),
            OrderTag::ProductType(t) => order.product_type == Some(*t),
            OrderTag::Model(m) => order.model == Some(*m),
        }
    }
}

/// Criteria for listing orders; every set criterion must hold
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderFilter {
    /// Case-insensitive title substring
    pub search: Option<String>,
    /// First creation day included
    pub created_from: Option<NaiveDate>,
    /// Last creation day included
    pub created_to: Option<NaiveDate>,
    pub tags: Vec<OrderTag>,
}

impl OrderFilter {
    pub fn matches(&self, order: &Order) -> bool {
        if let Some(search) = self.search.as_deref().map(str::trim)
            && !search.is_empty()
            && !order.title.to_lowercase().contains(&search.to_lowercase())
        {
            return false;
        }

        let created = order.created_at.date_naive();
        if self.created_from.is_some_and(|from| created < from) {
            return false;
        }
        if self.created_to.is_some_and(|to| created > to) {
            return false;
        }

        self.tags.iter().all(|tag| tag.matches(order))
    }
}

/// Query parameters accepted by the order list
///
/// # Example
/// ```text
/// GET /orders?search=team&from=2026-01-01&to=2026-03-31&tags=Football,Flex&page=2&limit=10
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OrderListParams {
    pub page: usize,
    pub limit: usize,
    pub search: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    /// Comma separated catalog labels
    pub tags: Option<String>,
}

impl Default for OrderListParams {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 20,
            search: None,
            from: None,
            to: None,
            tags: None,
        }
    }
}

impl OrderListParams {
    pub fn page(&self) -> usize {
        self.page.max(1)
    }

    pub fn limit(&self) -> usize {
        self.limit.clamp(1, 100)
    }

    /// Unknown tag labels are ignored
    pub fn filter(&self) -> OrderFilter {
        let tags = self
            .tags
            .as_deref()
            .map(|raw| raw.split(',').filter_map(OrderTag::parse).collect())
            .unwrap_or_default();
        OrderFilter {
            search: self.search.clone(),
            created_from: self.from,
            created_to: self.to,
            tags,
        }
    }

    /// Cut one page out of an already filtered list
    pub fn paginate<T>(&self, items: Vec<T>) -> PaginatedResponse<T> {
        let (page, limit) = (self.page(), self.limit());
        let total = items.len();
        let data = items
            .into_iter()
            .skip(page.saturating_sub(1).saturating_mul(limit))
            .take(limit)
            .collect();
        PaginatedResponse {
            data,
            pagination: PaginationMeta::new(page, limit, total),
        }
    }
}

/// Paginated response structure
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    pub page: usize,
    pub limit: usize,
    /// Total number of items after filters
    pub total: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMeta {
    pub fn new(page: usize, limit: usize, total: usize) -> Self {
        let limit = limit.max(1);
        let page = page.max(1);
        let total_pages = if total == 0 { 0 } else { total.div_ceil(limit) };
        let start = page.saturating_sub(1).saturating_mul(limit);

        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: start.saturating_add(limit) < total,
            has_prev: page > 1,
        }
    }
}
