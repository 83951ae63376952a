//! Customer lookup against an optional HTTP endpoint
//!
//! The endpoint is queried as `GET <url>?q=<query>` and must answer with a
//! JSON array of customers. Anything else, including no endpoint at all,
//! yields the static fallback list so ticket entry never blocks on it.

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use crate::core::Config;
use crate::entities::customer::{fallback_customers, Customer};

/// Where a lookup result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupSource {
    Endpoint,
    Fallback,
}

/// Customers found for a query
#[derive(Debug, Clone)]
pub struct LookupResult {
    pub customers: Vec<Customer>,
    pub source: LookupSource,
}

impl LookupResult {
    fn fallback() -> Self {
        Self {
            customers: fallback_customers(),
            source: LookupSource::Fallback,
        }
    }
}

/// Blocking customer lookup client
pub struct CustomerLookup {
    endpoint: Option<String>,
    http_client: Option<reqwest::blocking::Client>,
}

impl CustomerLookup {
    /// Create a lookup client; `None` means always use the fallback list
    pub fn new(endpoint: Option<&str>, timeout: Duration) -> Self {
        let http_client = match reqwest::blocking::Client::builder()
            .user_agent(concat!("glazier/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
        {
            Ok(client) => Some(client),
            Err(e) => {
                warn!(error = %e, "could not build HTTP client, customer lookup will use fallback data");
                None
            }
        };

        Self {
            endpoint: endpoint.map(str::to_string),
            http_client,
        }
    }

    /// Create a lookup client from the loaded configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.lookup_url(), config.lookup_timeout())
    }

    /// Look up customers matching `query`
    pub fn search(&self, query: &str) -> LookupResult {
        let (endpoint, client) = match (&self.endpoint, &self.http_client) {
            (Some(endpoint), Some(client)) => (endpoint, client),
            _ => {
                debug!("no lookup endpoint configured, using fallback customers");
                return LookupResult::fallback();
            }
        };

        let response = client
            .get(endpoint)
            .query(&[("q", query.trim())])
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.json::<Value>());

        match response {
            Ok(body) => match customers_from_body(body) {
                Some(customers) => {
                    debug!(count = customers.len(), "customer lookup succeeded");
                    LookupResult {
                        customers,
                        source: LookupSource::Endpoint,
                    }
                }
                None => {
                    warn!(endpoint = %endpoint, "customer lookup returned a non-array response, using fallback");
                    LookupResult::fallback()
                }
            },
            Err(e) => {
                warn!(endpoint = %endpoint, error = %e, "customer lookup failed, using fallback");
                LookupResult::fallback()
            }
        }
    }
}

/// Decode a lookup response body; `None` unless it is an array of customers
pub fn customers_from_body(body: Value) -> Option<Vec<Customer>> {
    if !body.is_array() {
        return None;
    }
    serde_json::from_value(body).ok()
}
