//! Request DTOs for the product API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::cache::RecordId;
use crate::models::{Price, ProductRecord};

/// Request body for a product update (PUT /product/:id)
///
/// # Fields
/// - `name`: Display name of the product
/// - `current_price`: New price and currency
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProductRequest {
    /// Display name
    pub name: String,
    /// New price
    pub current_price: Price,
}

impl UpdateProductRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.name.trim().is_empty() {
            return Some("Name cannot be empty".to_string());
        }
        let code = &self.current_price.currency_code;
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
            return Some(format!(
                "Currency code '{}' must be three uppercase letters",
                code
            ));
        }
        let value = self.current_price.value;
        if !value.is_finite() || value < 0.0 {
            return Some("Price must be a finite, non-negative number".to_string());
        }
        None
    }

    /// Builds the record stored under `id`.
    pub fn into_record(self, id: RecordId) -> ProductRecord {
        ProductRecord {
            id,
            name: self.name,
            current_price: self.current_price,
        }
    }
}
