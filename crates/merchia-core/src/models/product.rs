//! Product domain model and change detection.
//!
//! [`Product`] is the app-side view of a storefront product. Edit screens hold
//! a stored copy and a draft copy; the grouped `has_*_changes` predicates
//! decide which sections of a draft differ, [`Product::is_same_product`]
//! decides whether anything publishable differs at all, and
//! [`Product::merge_product`] folds a draft back over a stored copy without
//! touching server-derived fields.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::html::strip_html;

use super::ids::{MediaId, ProductId};
use super::product_enums::{
    ProductBackorderStatus, ProductCatalogVisibility, ProductStatus, ProductStockStatus,
    ProductTaxStatus, ProductType,
};

/// Tax class applied when the storefront reports an empty one.
pub const TAX_CLASS_DEFAULT: &str = "standard";

/// An image attached to a product, in display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub id: MediaId,
    pub name: String,
    pub source: String,
    pub date_created: DateTime<Utc>,
}

/// A product attribute such as colour or size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub id: i64,
    pub name: String,
    pub options: Vec<String>,
    pub is_visible: bool,
}

/// A category the product is filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCategory {
    pub remote_category_id: i64,
    pub name: String,
    pub slug: String,
}

/// A tag attached to the product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductTag {
    pub remote_tag_id: i64,
    pub name: String,
    pub slug: String,
}

/// App-side product model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub remote_id: ProductId,
    pub name: String,
    pub description: String,
    pub short_description: String,
    pub product_type: ProductType,
    pub status: Option<ProductStatus>,
    pub catalog_visibility: Option<ProductCatalogVisibility>,
    pub is_featured: bool,
    pub stock_status: ProductStockStatus,
    pub backorder_status: ProductBackorderStatus,
    pub date_created: DateTime<Utc>,
    /// URL of the first image, kept denormalized for list views.
    pub first_image_url: Option<String>,
    pub total_sales: i32,
    pub reviews_allowed: bool,
    pub is_virtual: bool,
    pub rating_count: i32,
    pub average_rating: f32,
    pub permalink: String,
    pub external_url: String,
    pub button_text: String,
    pub sale_price: Option<Decimal>,
    pub regular_price: Option<Decimal>,
    pub tax_class: String,
    pub manage_stock: bool,
    pub stock_quantity: i32,
    pub sku: String,
    pub slug: String,
    pub length: f32,
    pub width: f32,
    pub height: f32,
    pub weight: f32,
    pub shipping_class: String,
    pub shipping_class_id: i64,
    pub is_downloadable: bool,
    pub file_count: i32,
    pub download_limit: i64,
    pub download_expiry: i32,
    pub purchase_note: String,
    pub num_variations: i32,
    pub images: Vec<Image>,
    pub attributes: Vec<Attribute>,
    pub sale_end_date_gmt: Option<DateTime<Utc>>,
    pub sale_start_date_gmt: Option<DateTime<Utc>>,
    pub is_on_sale: bool,
    /// Whether a sale window is scheduled, derived from the sale dates.
    pub is_sale_scheduled: bool,
    pub menu_order: i32,
    pub categories: Vec<ProductCategory>,
    pub tags: Vec<ProductTag>,
    pub sold_individually: bool,
    pub tax_status: ProductTaxStatus,
}

/// Prices compare by numeric value with an absent price treated as zero, so a
/// missing price and an explicit `0.00` describe the same storefront state.
fn is_equivalent_price(current: Option<Decimal>, updated: Option<Decimal>) -> bool {
    current.unwrap_or_default() == updated.unwrap_or_default()
}

impl Product {
    pub fn has_categories(&self) -> bool {
        !self.categories.is_empty()
    }

    pub fn has_tags(&self) -> bool {
        !self.tags.is_empty()
    }

    pub fn has_short_description(&self) -> bool {
        !self.short_description.is_empty()
    }

    pub fn has_shipping(&self) -> bool {
        self.weight > 0.0
            || self.length > 0.0
            || self.width > 0.0
            || self.height > 0.0
            || !self.shipping_class.is_empty()
    }

    /// Whether two copies describe the same publishable product state.
    ///
    /// Names compare with markup stripped and prices compare numerically, so
    /// formatting-only differences do not register as edits. Server-derived
    /// fields (creation date, sales counters, ratings, permalink) are ignored.
    pub fn is_same_product(&self, product: &Product) -> bool {
        self.remote_id == product.remote_id
            && self.stock_quantity == product.stock_quantity
            && self.stock_status == product.stock_status
            && self.status == product.status
            && self.manage_stock == product.manage_stock
            && self.backorder_status == product.backorder_status
            && self.sold_individually == product.sold_individually
            && self.reviews_allowed == product.reviews_allowed
            && self.sku == product.sku
            && self.slug == product.slug
            && self.product_type == product.product_type
            && self.num_variations == product.num_variations
            && strip_html(&self.name) == strip_html(&product.name)
            && self.description == product.description
            && self.short_description == product.short_description
            && self.tax_class == product.tax_class
            && self.tax_status == product.tax_status
            && self.is_sale_scheduled == product.is_sale_scheduled
            && self.sale_end_date_gmt == product.sale_end_date_gmt
            && self.sale_start_date_gmt == product.sale_start_date_gmt
            && is_equivalent_price(self.regular_price, product.regular_price)
            && is_equivalent_price(self.sale_price, product.sale_price)
            && self.weight == product.weight
            && self.length == product.length
            && self.height == product.height
            && self.width == product.width
            && self.shipping_class == product.shipping_class
            && self.shipping_class_id == product.shipping_class_id
            && self.catalog_visibility == product.catalog_visibility
            && self.is_featured == product.is_featured
            && self.purchase_note == product.purchase_note
            && self.external_url == product.external_url
            && self.button_text == product.button_text
            && self.menu_order == product.menu_order
            && self.is_same_images(&product.images)
            && self.is_same_categories(&product.categories)
    }

    pub fn has_inventory_changes(&self, updated_product: Option<&Product>) -> bool {
        updated_product
            .map(|it| {
                self.sku != it.sku
                    || self.manage_stock != it.manage_stock
                    || self.stock_status != it.stock_status
                    || self.stock_quantity != it.stock_quantity
                    || self.backorder_status != it.backorder_status
                    || self.sold_individually != it.sold_individually
            })
            .unwrap_or(false)
    }

    pub fn has_pricing_changes(&self, updated_product: Option<&Product>) -> bool {
        updated_product
            .map(|it| {
                !is_equivalent_price(self.regular_price, it.regular_price)
                    || !is_equivalent_price(self.sale_price, it.sale_price)
                    || self.sale_start_date_gmt != it.sale_start_date_gmt
                    || self.sale_end_date_gmt != it.sale_end_date_gmt
                    || self.is_on_sale != it.is_on_sale
                    || self.tax_class != it.tax_class
                    || self.tax_status != it.tax_status
            })
            .unwrap_or(false)
    }

    pub fn has_shipping_changes(&self, updated_product: Option<&Product>) -> bool {
        updated_product
            .map(|it| {
                self.weight != it.weight
                    || self.length != it.length
                    || self.width != it.width
                    || self.height != it.height
                    || self.shipping_class != it.shipping_class
            })
            .unwrap_or(false)
    }

    pub fn has_image_changes(&self, updated_product: Option<&Product>) -> bool {
        updated_product
            .map(|it| !self.is_same_images(&it.images))
            .unwrap_or(false)
    }

    pub fn has_external_link_changes(&self, updated_product: Option<&Product>) -> bool {
        updated_product
            .map(|it| self.external_url != it.external_url || self.button_text != it.button_text)
            .unwrap_or(false)
    }

    pub fn has_settings_changes(&self, updated_product: Option<&Product>) -> bool {
        updated_product
            .map(|it| {
                self.status != it.status
                    || self.catalog_visibility != it.catalog_visibility
                    || self.is_featured != it.is_featured
                    || self.slug != it.slug
                    || self.reviews_allowed != it.reviews_allowed
                    || self.purchase_note != it.purchase_note
                    || self.menu_order != it.menu_order
            })
            .unwrap_or(false)
    }

    pub fn has_category_changes(&self, updated_product: Option<&Product>) -> bool {
        updated_product
            .map(|it| !self.is_same_categories(&it.categories))
            .unwrap_or(false)
    }

    /// Images compare positionally by id: reordering counts as a change.
    fn is_same_images(&self, updated_images: &[Image]) -> bool {
        self.images.len() == updated_images.len()
            && self
                .images
                .iter()
                .zip(updated_images)
                .all(|(current, updated)| current.id == updated.id)
    }

    /// Categories compare as a set: reordering does not count as a change.
    fn is_same_categories(&self, updated_categories: &[ProductCategory]) -> bool {
        self.categories.len() == updated_categories.len()
            && updated_categories
                .iter()
                .all(|category| self.categories.contains(category))
    }

    /// Folds an edited draft over this stored copy.
    ///
    /// Only store-editable fields are taken from the draft; server-derived
    /// fields keep their stored values. With no draft the stored copy is
    /// returned unchanged.
    pub fn merge_product(&self, updated_product: Option<&Product>) -> Product {
        match updated_product {
            Some(updated) => Product {
                description: updated.description.clone(),
                short_description: updated.short_description.clone(),
                name: updated.name.clone(),
                sku: updated.sku.clone(),
                slug: updated.slug.clone(),
                status: updated.status,
                catalog_visibility: updated.catalog_visibility,
                is_featured: updated.is_featured,
                manage_stock: updated.manage_stock,
                stock_status: updated.stock_status,
                stock_quantity: updated.stock_quantity,
                backorder_status: updated.backorder_status,
                sold_individually: updated.sold_individually,
                regular_price: updated.regular_price,
                sale_price: updated.sale_price,
                is_on_sale: updated.is_on_sale,
                is_sale_scheduled: updated.is_sale_scheduled,
                sale_start_date_gmt: updated.sale_start_date_gmt,
                sale_end_date_gmt: updated.sale_end_date_gmt,
                tax_status: updated.tax_status,
                tax_class: updated.tax_class.clone(),
                length: updated.length,
                width: updated.width,
                height: updated.height,
                weight: updated.weight,
                shipping_class: updated.shipping_class.clone(),
                images: updated.images.clone(),
                shipping_class_id: updated.shipping_class_id,
                reviews_allowed: updated.reviews_allowed,
                purchase_note: updated.purchase_note.clone(),
                external_url: updated.external_url.clone(),
                button_text: updated.button_text.clone(),
                menu_order: updated.menu_order,
                categories: updated.categories.clone(),
                ..self.clone()
            },
            None => self.clone(),
        }
    }

    /// Formats the weight with an optional unit, or an empty string when the
    /// product has no weight set.
    pub fn weight_with_units(&self, weight_unit: Option<&str>) -> String {
        if self.weight > 0.0 {
            format!("{}{}", self.weight, weight_unit.unwrap_or(""))
        } else {
            String::new()
        }
    }

    /// Formats dimensions as "L x W x H unit" when all three are set, or
    /// "W x H unit" when only length is missing. Anything less formats empty.
    pub fn size_with_units(&self, dimension_unit: Option<&str>) -> String {
        let unit = dimension_unit.unwrap_or("");
        let has_length = self.length > 0.0;
        let has_width = self.width > 0.0;
        let has_height = self.height > 0.0;

        let size = if has_length && has_width && has_height {
            format!(
                "{} x {} x {} {}",
                self.length, self.width, self.height, unit
            )
        } else if has_width && has_height {
            format!("{} x {} {}", self.width, self.height, unit)
        } else {
            String::new()
        };
        size.trim().to_string()
    }
}
