//! Product catalog: the categories, product types and models an order can pick
//!
//! The catalog only describes what a selector offers. Store setters accept any
//! value; the step gate is the only place selections are checked.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sport category of the order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductCategory {
    Football,
    #[serde(rename = "Flag Football")]
    FlagFootball,
    Basketball,
}

impl ProductCategory {
    pub const ALL: [ProductCategory; 3] = [
        ProductCategory::Football,
        ProductCategory::FlagFootball,
        ProductCategory::Basketball,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ProductCategory::Football => "Football",
            ProductCategory::FlagFootball => "Flag Football",
            ProductCategory::Basketball => "Basketball",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }

    /// Product types offered for this category
    pub fn product_types(&self) -> &'static [ProductType] {
        match self {
            ProductCategory::Football => &[
                ProductType::Jersey,
                ProductType::Pants,
                ProductType::JerseyAndPants,
            ],
            ProductCategory::FlagFootball | ProductCategory::Basketball => &[
                ProductType::Jersey,
                ProductType::Shorts,
                ProductType::JerseyAndPants,
            ],
        }
    }
}

/// Garment being ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductType {
    Jersey,
    Pants,
    Shorts,
    #[serde(rename = "Jersey + Pants")]
    JerseyAndPants,
}

impl ProductType {
    pub const ALL: [ProductType; 4] = [
        ProductType::Jersey,
        ProductType::Pants,
        ProductType::Shorts,
        ProductType::JerseyAndPants,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ProductType::Jersey => "Jersey",
            ProductType::Pants => "Pants",
            ProductType::Shorts => "Shorts",
            ProductType::JerseyAndPants => "Jersey + Pants",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.label() == label)
    }

    /// Whether the artwork step needs a model before it opens.
    ///
    /// The combined set has no single model selector.
    pub fn requires_model(&self) -> bool {
        !matches!(self, ProductType::JerseyAndPants)
    }
}

/// Cut/fabric model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductModel {
    Flex,
    Hybrid,
    Speed,
    Velocity,
}

impl ProductModel {
    pub const ALL: [ProductModel; 4] = [
        ProductModel::Flex,
        ProductModel::Hybrid,
        ProductModel::Speed,
        ProductModel::Velocity,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ProductModel::Flex => "Flex",
            ProductModel::Hybrid => "Hybrid",
            ProductModel::Speed => "Speed",
            ProductModel::Velocity => "Velocity",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.label() == label)
    }
}

macro_rules! display_via_label {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        })*
    };
}

display_via_label!(ProductCategory, ProductType, ProductModel);

/// Models offered for a category/product type pair
pub fn models_for(category: ProductCategory, product_type: ProductType) -> &'static [ProductModel] {
    match (category, product_type) {
        (ProductCategory::Football, ProductType::Jersey | ProductType::Pants) => {
            &ProductModel::ALL
        }
        _ => &[],
    }
}

/// One product type as offered under a category
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductTypeOption {
    pub product_type: ProductType,
    pub models: Vec<ProductModel>,
}

/// One category with everything it offers
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub category: ProductCategory,
    pub product_types: Vec<ProductTypeOption>,
}

/// The full selector tree
pub fn catalog() -> Vec<CatalogEntry> {
    ProductCategory::ALL
        .into_iter()
        .map(|category| CatalogEntry {
            category,
            product_types: category
                .product_types()
                .iter()
                .map(|&product_type| ProductTypeOption {
                    product_type,
                    models: models_for(category, product_type).to_vec(),
                })
                .collect(),
        })
        .collect()
}
