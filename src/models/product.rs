use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One product detail panel, read field by field. Every field is
/// independently optional; partial records are valid and expected.
/// Serialized keys match the site's Hebrew labels so the output file
/// reads like the store's own data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractedProduct {
    /// Always present, possibly empty.
    #[serde(rename = "שם המוצר")]
    pub title: String,

    #[serde(rename = "מחיר", skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,

    #[serde(rename = "מחיר ליחידה", skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<String>,

    #[serde(rename = "מותג", skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,

    #[serde(rename = "תמונה", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    #[serde(rename = "רכיבים", skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<String>,

    #[serde(rename = "ערכים תזונתיים", skip_serializing_if = "Option::is_none")]
    pub nutrition: Option<BTreeMap<String, String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_preview: Option<String>,
}
