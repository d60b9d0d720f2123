//! Product record model
//!
//! The payload stored in the item cache and served by the product endpoints.

use serde::{Deserialize, Serialize};

use crate::cache::{Record, RecordId};

/// Price of a product in a given currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's major unit
    pub value: f64,
    /// ISO 4217 currency code, e.g. "USD"
    pub currency_code: String,
}

/// A product with its current price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Product identifier
    pub id: RecordId,
    /// Display name
    pub name: String,
    /// Current selling price
    pub current_price: Price,
}

impl ProductRecord {
    /// Creates a new ProductRecord
    pub fn new(
        id: RecordId,
        name: impl Into<String>,
        value: f64,
        currency_code: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            current_price: Price {
                value,
                currency_code: currency_code.into(),
            },
        }
    }
}

impl Record for ProductRecord {
    fn id(&self) -> RecordId {
        self.id
    }
}
