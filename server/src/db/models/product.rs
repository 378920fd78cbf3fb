//! Product Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Product model
///
/// `stock_quantity` never goes negative: the only decrement path is the
/// checkout transaction, which performs the floor check inside the same
/// transaction as the write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    pub price: f64,
    pub stock_quantity: i64,
    #[serde(with = "serde_helpers::record_id")]
    pub category: RecordId,
    /// Unique SKU, derived at creation time when not supplied
    pub sku: String,
    #[serde(default)]
    pub variant: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub description: Option<String>,
    pub brand: Option<String>,
    pub price: f64,
    pub stock_quantity: i64,
    /// "category:..." record id
    pub category: String,
    pub sku: Option<String>,
    pub variant: Option<String>,
    pub images: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub brand: Option<String>,
    pub price: Option<f64>,
    pub stock_quantity: Option<i64>,
    pub category: Option<String>,
    pub variant: Option<String>,
    pub images: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

/// Derive a SKU from brand + category + record key + variant.
///
/// Uses the first three characters of each naming component and the first
/// six of the record key, uppercased: `BRA-CAT-A1B2C3-VAR`.
pub fn derive_sku(
    brand: Option<&str>,
    category_name: &str,
    record_key: &str,
    variant: Option<&str>,
) -> String {
    fn prefix(s: &str, n: usize) -> String {
        s.chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .take(n)
            .collect::<String>()
            .to_ascii_uppercase()
    }

    let mut parts = Vec::new();
    if let Some(brand) = brand
        && !brand.is_empty()
    {
        parts.push(prefix(brand, 3));
    }
    parts.push(prefix(category_name, 3));
    parts.push(prefix(record_key, 6));
    if let Some(variant) = variant
        && !variant.is_empty()
    {
        parts.push(prefix(variant, 3));
    }
    parts.retain(|p| !p.is_empty());
    parts.join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sku_uses_brand_category_key_variant() {
        let sku = derive_sku(Some("Acme"), "Shoes", "a1b2c3d4e5", Some("Red"));
        assert_eq!(sku, "ACM-SHO-A1B2C3-RED");
    }

    #[test]
    fn sku_without_brand_or_variant() {
        let sku = derive_sku(None, "Electronics", "xyz789", None);
        assert_eq!(sku, "ELE-XYZ789");
    }

    #[test]
    fn sku_skips_non_alphanumeric() {
        let sku = derive_sku(Some("É-b"), "T shirts", "0f3c11", None);
        assert_eq!(sku, "B-TSH-0F3C11");
    }
}
