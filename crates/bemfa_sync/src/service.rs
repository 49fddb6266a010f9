use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use strum::Display;

/// Host platform service invoked by a decoded message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Service {
    TurnOn,
    TurnOff,
}

/// A (domain, service, data) triple handed to the host's service-call mechanism.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceCall {
    pub domain: &'static str,
    pub service: Service,
    pub service_data: Map<String, Value>,
}

impl ServiceCall {
    pub fn new(domain: &'static str, service: Service) -> Self {
        Self {
            domain,
            service,
            service_data: Map::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.service_data.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.service_data.get(key)
    }
}
