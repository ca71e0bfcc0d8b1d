//! Stringly product record as trafficked by the storefront sync layer.
//!
//! Records keep numeric and date fields as strings and nest list-valued
//! fields (images, categories, tags, attributes) as embedded JSON documents.
//! Mapping to the domain model is lenient: malformed values fall back to
//! defaults instead of failing the whole record.

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ids::{MediaId, ProductId};
use super::product::{
    Attribute, Image, Product, ProductCategory, ProductTag, TAX_CLASS_DEFAULT,
};

const WIRE_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Parses a GMT timestamp in the record wire format ("2023-05-17T10:00:00").
/// Empty or malformed input yields `None`.
pub fn parse_wire_date(raw: &str) -> Option<DateTime<Utc>> {
    if raw.is_empty() {
        return None;
    }
    NaiveDateTime::parse_from_str(raw.trim_end_matches('Z'), WIRE_DATE_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Formats a timestamp in the record wire format.
pub fn format_wire_date(date: DateTime<Utc>) -> String {
    date.format(WIRE_DATE_FORMAT).to_string()
}

/// Product record in storefront sync shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductRecord {
    pub remote_product_id: i64,
    pub name: String,
    pub slug: String,
    pub permalink: String,
    pub date_created: String,
    #[serde(rename = "type")]
    pub product_type: String,
    pub status: String,
    pub featured: bool,
    pub catalog_visibility: String,
    pub description: String,
    pub short_description: String,
    pub sku: String,
    pub regular_price: String,
    pub sale_price: String,
    pub on_sale: bool,
    pub total_sales: i32,
    pub date_on_sale_from_gmt: String,
    pub date_on_sale_to_gmt: String,
    #[serde(rename = "virtual")]
    pub is_virtual: bool,
    pub downloadable: bool,
    pub download_limit: i64,
    pub download_expiry: i32,
    /// Embedded JSON array of downloadable files.
    pub downloads: String,
    pub external_url: String,
    pub button_text: String,
    pub tax_status: String,
    pub tax_class: String,
    pub manage_stock: bool,
    pub stock_quantity: i32,
    pub stock_status: String,
    pub backorders: String,
    pub sold_individually: bool,
    pub weight: String,
    pub length: String,
    pub width: String,
    pub height: String,
    pub shipping_class: String,
    pub shipping_class_id: i64,
    pub reviews_allowed: bool,
    pub average_rating: String,
    pub rating_count: i32,
    pub purchase_note: String,
    /// Embedded JSON array of category terms.
    pub categories: String,
    /// Embedded JSON array of tag terms.
    pub tags: String,
    /// Embedded JSON array of image entries.
    pub images: String,
    /// Embedded JSON array of attribute entries.
    pub attributes: String,
    /// Embedded JSON array of variation ids.
    pub variations: String,
    pub menu_order: i32,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct ImageEntry {
    id: i64,
    name: String,
    src: String,
    alt: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct TermEntry {
    id: i64,
    name: String,
    slug: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct AttributeEntry {
    id: i64,
    name: String,
    options: Vec<String>,
    visible: bool,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct DownloadEntry {
    id: String,
    name: String,
    file: String,
}

fn decode_json_list<T: serde::de::DeserializeOwned>(raw: &str, name: &str) -> Vec<T> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    match serde_json::from_str(raw) {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(field = name, error = %e, "Ignoring malformed embedded record list");
            Vec::new()
        }
    }
}

fn encode_json_list<T: Serialize>(items: &[T], name: &str) -> String {
    match serde_json::to_string(items) {
        Ok(json) => json,
        Err(e) => {
            tracing::warn!(field = name, error = %e, "Failed to encode embedded record list");
            "[]".to_string()
        }
    }
}

/// Zero and absent prices are written as empty strings on the wire.
fn price_to_wire(price: Option<Decimal>) -> String {
    match price {
        Some(value) if !value.is_zero() => value.to_string(),
        _ => String::new(),
    }
}

fn dimension_to_wire(value: f32) -> String {
    if value > 0.0 {
        value.to_string()
    } else {
        String::new()
    }
}

impl ProductRecord {
    /// Maps this record into the app-side [`Product`] model.
    ///
    /// Unknown enum values fall back to their defaults (or `None` for
    /// optional vocabularies), malformed numbers to zero, malformed embedded
    /// lists to empty lists, and an empty tax class to the standard class.
    pub fn to_product(&self) -> Product {
        let date_created = parse_wire_date(&self.date_created).unwrap_or_else(Utc::now);

        let image_entries: Vec<ImageEntry> = decode_json_list(&self.images, "images");
        let first_image_url = image_entries
            .first()
            .filter(|entry| !entry.src.is_empty())
            .map(|entry| entry.src.clone());
        let images = image_entries
            .into_iter()
            .map(|entry| Image {
                id: MediaId(entry.id),
                name: entry.name,
                source: entry.src,
                date_created,
            })
            .collect();

        let attributes = decode_json_list::<AttributeEntry>(&self.attributes, "attributes")
            .into_iter()
            .map(|entry| Attribute {
                id: entry.id,
                name: entry.name,
                options: entry.options,
                is_visible: entry.visible,
            })
            .collect();

        let categories = decode_json_list::<TermEntry>(&self.categories, "categories")
            .into_iter()
            .map(|entry| ProductCategory {
                remote_category_id: entry.id,
                name: entry.name,
                slug: entry.slug,
            })
            .collect();

        let tags = decode_json_list::<TermEntry>(&self.tags, "tags")
            .into_iter()
            .map(|entry| ProductTag {
                remote_tag_id: entry.id,
                name: entry.name,
                slug: entry.slug,
            })
            .collect();

        let file_count = decode_json_list::<DownloadEntry>(&self.downloads, "downloads").len();
        let num_variations = decode_json_list::<i64>(&self.variations, "variations").len();

        Product {
            remote_id: ProductId(self.remote_product_id),
            name: self.name.clone(),
            description: self.description.clone(),
            short_description: self.short_description.clone(),
            product_type: self.product_type.parse().unwrap_or_default(),
            status: self.status.parse().ok(),
            catalog_visibility: self.catalog_visibility.parse().ok(),
            is_featured: self.featured,
            stock_status: self.stock_status.parse().unwrap_or_default(),
            backorder_status: self.backorders.parse().unwrap_or_default(),
            date_created,
            first_image_url,
            total_sales: self.total_sales,
            reviews_allowed: self.reviews_allowed,
            is_virtual: self.is_virtual,
            rating_count: self.rating_count,
            average_rating: self.average_rating.parse().unwrap_or(0.0),
            permalink: self.permalink.clone(),
            external_url: self.external_url.clone(),
            button_text: self.button_text.clone(),
            sale_price: self.sale_price.parse().ok(),
            regular_price: self.regular_price.parse().ok(),
            tax_class: if self.tax_class.is_empty() {
                TAX_CLASS_DEFAULT.to_string()
            } else {
                self.tax_class.clone()
            },
            manage_stock: self.manage_stock,
            stock_quantity: self.stock_quantity,
            sku: self.sku.clone(),
            slug: self.slug.clone(),
            length: self.length.parse().unwrap_or(0.0),
            width: self.width.parse().unwrap_or(0.0),
            height: self.height.parse().unwrap_or(0.0),
            weight: self.weight.parse().unwrap_or(0.0),
            shipping_class: self.shipping_class.clone(),
            shipping_class_id: self.shipping_class_id,
            is_downloadable: self.downloadable,
            file_count: file_count as i32,
            download_limit: self.download_limit,
            download_expiry: self.download_expiry,
            purchase_note: self.purchase_note.clone(),
            num_variations: num_variations as i32,
            images,
            attributes,
            sale_end_date_gmt: parse_wire_date(&self.date_on_sale_to_gmt),
            sale_start_date_gmt: parse_wire_date(&self.date_on_sale_from_gmt),
            is_on_sale: self.on_sale,
            is_sale_scheduled: !self.date_on_sale_from_gmt.is_empty()
                || !self.date_on_sale_to_gmt.is_empty(),
            menu_order: self.menu_order,
            categories,
            tags,
            sold_individually: self.sold_individually,
            tax_status: self.tax_status.parse().unwrap_or_default(),
        }
    }
}

impl Product {
    /// Writes the store-editable portion of this product over a stored record.
    ///
    /// Starts from `stored` (or a blank record) and overwrites only the fields
    /// the app can edit; server-derived record fields keep their stored
    /// values. When no sale is scheduled both sale dates are cleared; when one
    /// is, a missing start date leaves the stored start date in place.
    pub fn to_record(&self, stored: Option<&ProductRecord>) -> ProductRecord {
        let mut record = stored.cloned().unwrap_or_default();

        record.remote_product_id = self.remote_id.0;
        record.description = self.description.clone();
        record.short_description = self.short_description.clone();
        record.name = self.name.clone();
        record.sku = self.sku.clone();
        record.slug = self.slug.clone();
        record.status = self.status.map(|s| s.to_string()).unwrap_or_default();
        record.catalog_visibility = self
            .catalog_visibility
            .map(|v| v.to_string())
            .unwrap_or_default();
        record.featured = self.is_featured;
        record.manage_stock = self.manage_stock;
        record.stock_quantity = self.stock_quantity;
        record.stock_status = self.stock_status.to_string();
        record.backorders = self.backorder_status.to_string();
        record.sold_individually = self.sold_individually;
        record.regular_price = price_to_wire(self.regular_price);
        record.sale_price = price_to_wire(self.sale_price);
        record.on_sale = self.is_on_sale;
        record.tax_status = self.tax_status.to_string();
        record.tax_class = self.tax_class.clone();
        record.length = dimension_to_wire(self.length);
        record.width = dimension_to_wire(self.width);
        record.height = dimension_to_wire(self.height);
        record.weight = dimension_to_wire(self.weight);
        record.shipping_class = self.shipping_class.clone();
        record.shipping_class_id = self.shipping_class_id;
        record.reviews_allowed = self.reviews_allowed;
        record.purchase_note = self.purchase_note.clone();
        record.external_url = self.external_url.clone();
        record.button_text = self.button_text.clone();
        record.menu_order = self.menu_order;

        let image_entries: Vec<ImageEntry> = self
            .images
            .iter()
            .map(|image| ImageEntry {
                id: image.id.0,
                name: image.name.clone(),
                src: image.source.clone(),
                alt: String::new(),
            })
            .collect();
        record.images = encode_json_list(&image_entries, "images");

        let category_entries: Vec<TermEntry> = self
            .categories
            .iter()
            .map(|category| TermEntry {
                id: category.remote_category_id,
                name: category.name.clone(),
                slug: category.slug.clone(),
            })
            .collect();
        record.categories = encode_json_list(&category_entries, "categories");

        if self.is_sale_scheduled {
            if let Some(from) = self.sale_start_date_gmt {
                record.date_on_sale_from_gmt = format_wire_date(from);
            }
            record.date_on_sale_to_gmt = self
                .sale_end_date_gmt
                .map(format_wire_date)
                .unwrap_or_default();
        } else {
            record.date_on_sale_from_gmt = String::new();
            record.date_on_sale_to_gmt = String::new();
        }

        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::product_enums::{ProductStockStatus, ProductTaxStatus, ProductType};
    use chrono::TimeZone;

    fn sample_record() -> ProductRecord {
        ProductRecord {
            remote_product_id: 42,
            name: "Canvas Tote".to_string(),
            slug: "canvas-tote".to_string(),
            permalink: "https://example.com/product/canvas-tote".to_string(),
            date_created: "2023-05-17T10:00:00".to_string(),
            product_type: "simple".to_string(),
            status: "publish".to_string(),
            catalog_visibility: "visible".to_string(),
            description: "Sturdy tote".to_string(),
            sku: "TOTE-1".to_string(),
            regular_price: "24.00".to_string(),
            stock_status: "instock".to_string(),
            backorders: "no".to_string(),
            tax_status: "taxable".to_string(),
            average_rating: "4.2".to_string(),
            rating_count: 11,
            weight: "0.4".to_string(),
            images: r#"[{"id":100,"name":"front","src":"https://example.com/tote.jpg","alt":""}]"#
                .to_string(),
            categories: r#"[{"id":5,"name":"Bags","slug":"bags"}]"#.to_string(),
            tags: r#"[{"id":3,"name":"Canvas","slug":"canvas"}]"#.to_string(),
            variations: "[7,8,9]".to_string(),
            ..ProductRecord::default()
        }
    }

    #[test]
    fn test_wire_dates_parse_and_format() {
        let parsed = parse_wire_date("2023-05-17T10:00:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2023, 5, 17, 10, 0, 0).unwrap());
        assert_eq!(format_wire_date(parsed), "2023-05-17T10:00:00");

        assert_eq!(parse_wire_date("2023-05-17T10:00:00Z"), Some(parsed));
        assert_eq!(parse_wire_date(""), None);
        assert_eq!(parse_wire_date("yesterday"), None);
    }

    #[test]
    fn test_record_maps_to_product() {
        let product = sample_record().to_product();

        assert_eq!(product.remote_id, ProductId(42));
        assert_eq!(product.product_type, ProductType::Simple);
        assert_eq!(product.stock_status, ProductStockStatus::InStock);
        assert_eq!(product.tax_status, ProductTaxStatus::Taxable);
        assert_eq!(product.regular_price, Some(Decimal::new(2400, 2)));
        assert_eq!(product.sale_price, None);
        assert_eq!(product.weight, 0.4);
        assert_eq!(product.average_rating, 4.2);
        assert_eq!(product.num_variations, 3);
        assert_eq!(product.images.len(), 1);
        assert_eq!(product.images[0].id, MediaId(100));
        assert_eq!(
            product.first_image_url.as_deref(),
            Some("https://example.com/tote.jpg")
        );
        assert_eq!(product.categories[0].name, "Bags");
        assert_eq!(product.tags[0].slug, "canvas");
    }

    #[test]
    fn test_empty_tax_class_maps_to_standard() {
        let mut record = sample_record();
        record.tax_class = String::new();
        assert_eq!(record.to_product().tax_class, TAX_CLASS_DEFAULT);

        record.tax_class = "reduced".to_string();
        assert_eq!(record.to_product().tax_class, "reduced");
    }

    #[test]
    fn test_unknown_vocabulary_values_fall_back() {
        let mut record = sample_record();
        record.product_type = "bundle".to_string();
        record.status = "trash".to_string();
        record.stock_status = "perhaps".to_string();

        let product = record.to_product();
        assert_eq!(product.product_type, ProductType::Simple);
        assert_eq!(product.status, None);
        assert_eq!(product.stock_status, ProductStockStatus::InStock);
    }

    #[test]
    fn test_malformed_embedded_lists_map_to_empty() {
        let mut record = sample_record();
        record.images = "not json".to_string();
        record.categories = "{".to_string();

        let product = record.to_product();
        assert!(product.images.is_empty());
        assert!(product.categories.is_empty());
        assert_eq!(product.first_image_url, None);
    }

    #[test]
    fn test_sale_schedule_is_derived_from_dates() {
        let mut record = sample_record();
        record.date_on_sale_from_gmt = "2023-06-01T00:00:00".to_string();
        let product = record.to_product();
        assert!(product.is_sale_scheduled);
        assert!(product.sale_start_date_gmt.is_some());
        assert_eq!(product.sale_end_date_gmt, None);

        record.date_on_sale_from_gmt = String::new();
        assert!(!record.to_product().is_sale_scheduled);
    }

    #[test]
    fn test_zero_and_absent_prices_write_empty() {
        let mut product = sample_record().to_product();
        product.regular_price = Some(Decimal::ZERO);
        product.sale_price = None;

        let record = product.to_record(None);
        assert_eq!(record.regular_price, "");
        assert_eq!(record.sale_price, "");
    }

    #[test]
    fn test_zero_dimensions_write_empty() {
        let mut product = sample_record().to_product();
        product.weight = 0.0;
        product.length = 12.0;

        let record = product.to_record(None);
        assert_eq!(record.weight, "");
        assert_eq!(record.length, "12");
    }

    #[test]
    fn test_to_record_preserves_server_derived_fields() {
        let stored = sample_record();
        let mut product = stored.to_product();
        product.name = "Renamed Tote".to_string();

        let record = product.to_record(Some(&stored));
        assert_eq!(record.name, "Renamed Tote");
        assert_eq!(record.permalink, stored.permalink);
        assert_eq!(record.date_created, stored.date_created);
        assert_eq!(record.average_rating, stored.average_rating);
        assert_eq!(record.rating_count, stored.rating_count);
        assert_eq!(record.product_type, stored.product_type);
        assert_eq!(record.tags, stored.tags);
    }

    #[test]
    fn test_unscheduled_sale_clears_both_dates() {
        let mut stored = sample_record();
        stored.date_on_sale_from_gmt = "2023-06-01T00:00:00".to_string();
        stored.date_on_sale_to_gmt = "2023-06-08T00:00:00".to_string();

        let mut product = stored.to_product();
        product.is_sale_scheduled = false;

        let record = product.to_record(Some(&stored));
        assert_eq!(record.date_on_sale_from_gmt, "");
        assert_eq!(record.date_on_sale_to_gmt, "");
    }

    #[test]
    fn test_scheduled_sale_without_start_keeps_stored_start() {
        let mut stored = sample_record();
        stored.date_on_sale_from_gmt = "2023-06-01T00:00:00".to_string();

        let mut product = stored.to_product();
        product.is_sale_scheduled = true;
        product.sale_start_date_gmt = None;
        product.sale_end_date_gmt = Some(Utc.with_ymd_and_hms(2023, 6, 8, 0, 0, 0).unwrap());

        let record = product.to_record(Some(&stored));
        assert_eq!(record.date_on_sale_from_gmt, "2023-06-01T00:00:00");
        assert_eq!(record.date_on_sale_to_gmt, "2023-06-08T00:00:00");
    }

    #[test]
    fn test_images_encode_with_wire_keys() {
        let product = sample_record().to_product();
        let record = product.to_record(None);

        let entries: Vec<serde_json::Value> = serde_json::from_str(&record.images).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["id"], 100);
        assert_eq!(entries[0]["src"], "https://example.com/tote.jpg");
        assert_eq!(entries[0]["name"], "front");
    }

    #[test]
    fn test_editable_state_survives_a_record_round_trip() {
        let stored = sample_record();
        let product = stored.to_product();
        let rewritten = product.to_record(Some(&stored));

        assert_eq!(rewritten.name, stored.name);
        assert_eq!(rewritten.sku, stored.sku);
        assert_eq!(rewritten.regular_price, "24.00");
        assert_eq!(rewritten.stock_status, stored.stock_status);
        assert_eq!(rewritten.categories, stored.categories);
    }
}
