//! Embedded JSON schemas

use rust_embed::Embed;
use serde_json::Value;
use std::collections::HashMap;

#[derive(Embed)]
#[folder = "schemas/"]
struct EmbeddedSchemas;

/// File name of the ticket store schema
pub const TICKETS_SCHEMA: &str = "tickets.schema.json";

/// Registry of the schemas compiled into the binary
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    schemas: HashMap<String, String>,
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        let mut schemas = HashMap::new();
        for file in EmbeddedSchemas::iter() {
            let name = file.as_ref();
            if let Some(content) = EmbeddedSchemas::get(name) {
                if let Ok(text) = std::str::from_utf8(&content.data) {
                    schemas.insert(name.to_string(), text.to_string());
                }
            }
        }
        Self { schemas }
    }
}

impl SchemaRegistry {
    /// Raw schema text by file name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.schemas.get(name).map(String::as_str)
    }

    /// Schema of the ticket store
    pub fn tickets(&self) -> Option<&str> {
        self.get(TICKETS_SCHEMA)
    }

    /// Schema of a single ticket record (the store's `items`)
    pub fn ticket_item(&self) -> Option<Value> {
        let schema: Value = serde_json::from_str(self.tickets()?).ok()?;
        schema.get("items").cloned()
    }

    /// Enum options declared for a ticket field, in schema order
    pub fn ticket_field_options(&self, field: &str) -> Vec<String> {
        self.ticket_item()
            .and_then(|item| {
                item.get("properties")?
                    .get(field)?
                    .get("enum")?
                    .as_array()
                    .map(|values| {
                        values
                            .iter()
                            .filter_map(|v| v.as_str())
                            .map(String::from)
                            .collect()
                    })
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tickets_schema_is_embedded() {
        let registry = SchemaRegistry::default();
        let schema: Value = serde_json::from_str(registry.tickets().unwrap()).unwrap();
        assert_eq!(schema["type"], "array");
    }

    #[test]
    fn test_field_options_follow_schema() {
        let registry = SchemaRegistry::default();
        assert_eq!(
            registry.ticket_field_options("glassColor"),
            vec!["chrome", "black", "brushed nickel"]
        );
        assert_eq!(registry.ticket_field_options("doorSide"), vec!["left", "right"]);
        assert!(registry.ticket_field_options("customerName").is_empty());
    }
}
