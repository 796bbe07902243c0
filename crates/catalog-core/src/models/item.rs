//! Catalog item model and the validated payload used to create one

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A persisted catalog record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: u64,
    pub name: String,
    pub price: f64,
    pub category: String,
}

impl Item {
    /// Case-insensitive substring match on the name.
    ///
    /// `needle` must already be lowercased.
    pub fn name_matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
    }
}

/// Item fields as submitted by a client, before an id is assigned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    pub price: f64,
    pub category: String,
}

impl NewItem {
    /// Validate an untyped JSON payload.
    ///
    /// Checks run in field order (name, price, category) and the first failure wins,
    /// so the error message always names exactly one offending field.
    pub fn from_json(payload: &Value) -> Result<Self, CoreError> {
        let Some(fields) = payload.as_object() else {
            return Err(CoreError::validation(
                "body",
                "Request body must be a JSON object",
            ));
        };

        let name = match fields.get("name").and_then(Value::as_str) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => {
                return Err(CoreError::validation(
                    "name",
                    r#"Item "name" is required and must be a string."#,
                ))
            }
        };

        let price = match fields.get("price").and_then(Value::as_f64) {
            Some(price) if price >= 0.0 => price,
            _ => {
                return Err(CoreError::validation(
                    "price",
                    r#"Item "price" is required and must be a non-negative number."#,
                ))
            }
        };

        let category = match fields.get("category").and_then(Value::as_str) {
            Some(category) if !category.is_empty() => category.to_string(),
            _ => {
                return Err(CoreError::validation(
                    "category",
                    "Item must have a category which needs to be a string",
                ))
            }
        };

        Ok(Self {
            name,
            price,
            category,
        })
    }

    /// Attach a server-assigned id
    pub fn with_id(self, id: u64) -> Item {
        Item {
            id,
            name: self.name,
            price: self.price,
            category: self.category,
        }
    }
}

/// One page of query results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemsPage {
    pub items: Vec<Item>,
    pub page: usize,
    pub total_pages: usize,
}
