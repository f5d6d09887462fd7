use serde::{Deserialize, Serialize};
use std::fmt;

/// Body of the create-product request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    pub quantity: i64,
}

impl Default for NewProduct {
    fn default() -> Self {
        Self {
            name: "Test Widget".to_string(),
            price: 19.99,
            quantity: 5,
        }
    }
}

/// Identifier assigned by the API; some backends return it as a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    Int(i64),
    Text(String),
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductId::Int(id) => write!(f, "{}", id),
            ProductId::Text(id) => f.write_str(id),
        }
    }
}

/// A product as stored in the `Products` table.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRow {
    pub name: String,
    pub price: f64,
    pub quantity: i64,
}
