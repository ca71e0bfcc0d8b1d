//! Closed vocabularies used by product records on the wire.
//!
//! Each enum mirrors the string values the storefront traffics. Parsing is
//! strict here; callers that tolerate unknown values fall back with
//! `.parse().ok()` or `.unwrap_or_default()`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Product type as reported by the storefront.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    #[default]
    Simple,
    Grouped,
    External,
    Variable,
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductType::Simple => write!(f, "simple"),
            ProductType::Grouped => write!(f, "grouped"),
            ProductType::External => write!(f, "external"),
            ProductType::Variable => write!(f, "variable"),
        }
    }
}

impl FromStr for ProductType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "simple" => Ok(ProductType::Simple),
            "grouped" => Ok(ProductType::Grouped),
            "external" => Ok(ProductType::External),
            "variable" => Ok(ProductType::Variable),
            _ => Err(anyhow::anyhow!("Invalid product type: {}", s)),
        }
    }
}

/// Publication status of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    Publish,
    Draft,
    Pending,
    Private,
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductStatus::Publish => write!(f, "publish"),
            ProductStatus::Draft => write!(f, "draft"),
            ProductStatus::Pending => write!(f, "pending"),
            ProductStatus::Private => write!(f, "private"),
        }
    }
}

impl FromStr for ProductStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "publish" => Ok(ProductStatus::Publish),
            "draft" => Ok(ProductStatus::Draft),
            "pending" => Ok(ProductStatus::Pending),
            "private" => Ok(ProductStatus::Private),
            _ => Err(anyhow::anyhow!("Invalid product status: {}", s)),
        }
    }
}

/// Stock availability of a product.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStockStatus {
    #[default]
    InStock,
    OutOfStock,
    OnBackorder,
}

impl fmt::Display for ProductStockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductStockStatus::InStock => write!(f, "instock"),
            ProductStockStatus::OutOfStock => write!(f, "outofstock"),
            ProductStockStatus::OnBackorder => write!(f, "onbackorder"),
        }
    }
}

impl FromStr for ProductStockStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "instock" => Ok(ProductStockStatus::InStock),
            "outofstock" => Ok(ProductStockStatus::OutOfStock),
            "onbackorder" => Ok(ProductStockStatus::OnBackorder),
            _ => Err(anyhow::anyhow!("Invalid stock status: {}", s)),
        }
    }
}

/// Whether customers may order a product that is out of stock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductBackorderStatus {
    #[default]
    No,
    Yes,
    Notify,
}

impl fmt::Display for ProductBackorderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductBackorderStatus::No => write!(f, "no"),
            ProductBackorderStatus::Yes => write!(f, "yes"),
            ProductBackorderStatus::Notify => write!(f, "notify"),
        }
    }
}

impl FromStr for ProductBackorderStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "no" => Ok(ProductBackorderStatus::No),
            "yes" => Ok(ProductBackorderStatus::Yes),
            "notify" => Ok(ProductBackorderStatus::Notify),
            _ => Err(anyhow::anyhow!("Invalid backorder status: {}", s)),
        }
    }
}

/// Tax treatment applied to a product at checkout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductTaxStatus {
    #[default]
    Taxable,
    Shipping,
    None,
}

impl fmt::Display for ProductTaxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductTaxStatus::Taxable => write!(f, "taxable"),
            ProductTaxStatus::Shipping => write!(f, "shipping"),
            ProductTaxStatus::None => write!(f, "none"),
        }
    }
}

impl FromStr for ProductTaxStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "taxable" => Ok(ProductTaxStatus::Taxable),
            "shipping" => Ok(ProductTaxStatus::Shipping),
            "none" => Ok(ProductTaxStatus::None),
            _ => Err(anyhow::anyhow!("Invalid tax status: {}", s)),
        }
    }
}

/// Where a product appears in catalog and search listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductCatalogVisibility {
    Visible,
    Catalog,
    Search,
    Hidden,
}

impl fmt::Display for ProductCatalogVisibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductCatalogVisibility::Visible => write!(f, "visible"),
            ProductCatalogVisibility::Catalog => write!(f, "catalog"),
            ProductCatalogVisibility::Search => write!(f, "search"),
            ProductCatalogVisibility::Hidden => write!(f, "hidden"),
        }
    }
}

impl FromStr for ProductCatalogVisibility {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "visible" => Ok(ProductCatalogVisibility::Visible),
            "catalog" => Ok(ProductCatalogVisibility::Catalog),
            "search" => Ok(ProductCatalogVisibility::Search),
            "hidden" => Ok(ProductCatalogVisibility::Hidden),
            _ => Err(anyhow::anyhow!("Invalid catalog visibility: {}", s)),
        }
    }
}
