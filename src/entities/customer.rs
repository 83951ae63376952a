//! Customer records returned by the lookup endpoint

use serde::{Deserialize, Serialize};
use std::fmt;

/// Customer id as sent by the endpoint, which may use numbers or strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomerId {
    Number(i64),
    Text(String),
}

impl Default for CustomerId {
    fn default() -> Self {
        CustomerId::Text(String::new())
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CustomerId::Number(n) => write!(f, "{}", n),
            CustomerId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// A customer as returned by `GET <endpoint>?q=<query>`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(default)]
    pub id: CustomerId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub phone: String,
}

impl Customer {
    /// Single-line postal address
    pub fn full_address(&self) -> String {
        format!(
            "{}, {}, {} {}",
            self.address, self.city, self.state, self.zip_code
        )
        .trim_matches(|c: char| c == ',' || c.is_whitespace())
        .to_string()
    }
}

/// Customers offered when the lookup endpoint is unreachable
pub fn fallback_customers() -> Vec<Customer> {
    vec![
        Customer {
            id: CustomerId::Number(1),
            name: "Jordan Miller".to_string(),
            address: "118 Birch Lane".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            zip_code: "62704".to_string(),
            phone: "(217) 555-0142".to_string(),
        },
        Customer {
            id: CustomerId::Number(2),
            name: "Priya Patel".to_string(),
            address: "4410 Harbor View Dr".to_string(),
            city: "Tampa".to_string(),
            state: "FL".to_string(),
            zip_code: "33611".to_string(),
            phone: "(813) 555-0187".to_string(),
        },
        Customer {
            id: CustomerId::Number(3),
            name: "Marcus Chen".to_string(),
            address: "72 Ridgecrest Ct".to_string(),
            city: "Boulder".to_string(),
            state: "CO".to_string(),
            zip_code: "80302".to_string(),
            phone: "(303) 555-0119".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_has_three_customers() {
        let customers = fallback_customers();
        assert_eq!(customers.len(), 3);
        assert!(customers.iter().all(|c| !c.name.is_empty()));
    }

    #[test]
    fn test_customer_accepts_numeric_and_string_ids() {
        let numeric: Customer =
            serde_json::from_str(r#"{"id": 7, "name": "A", "zipCode": "10001"}"#).unwrap();
        assert_eq!(numeric.id, CustomerId::Number(7));
        assert_eq!(numeric.zip_code, "10001");

        let text: Customer = serde_json::from_str(r#"{"id": "c-9", "name": "B"}"#).unwrap();
        assert_eq!(text.id.to_string(), "c-9");
    }

    #[test]
    fn test_full_address() {
        let customer = &fallback_customers()[0];
        assert_eq!(customer.full_address(), "118 Birch Lane, Springfield, IL 62704");
        assert_eq!(Customer::default().full_address(), "");
    }
}
