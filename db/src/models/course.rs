use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A row in the `courses` collection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub title: String,
    pub price: f64,
    /// Pinned to the pre-discount price the first time a discount is applied,
    /// then never changed. Repeated discounting is computed against this, not
    /// against the already-discounted price.
    pub original_price: Option<f64>,
    /// Current discount percentage, 0-100.
    pub discount: u32,
    /// Public path of the uploaded course image, if any.
    pub image: Option<String>,
}

impl Course {
    pub fn new(title: impl Into<String>, price: f64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            price,
            original_price: None,
            discount: 0,
            image: None,
        }
    }

    /// Applies a percentage discount relative to the original price.
    pub fn apply_discount(&mut self, percentage: u32) {
        let original = self.original_price.unwrap_or(self.price);
        self.price = original * f64::from(100 - percentage) / 100.0;
        self.discount = percentage;
        self.original_price = Some(original);
    }
}
