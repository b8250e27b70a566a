//! Content store seam.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;

use super::error::ContentError;

/// Named query parameters, referenced as `$name` inside GROQ
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams(BTreeMap<String, Value>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter (builder style)
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

/// Read-only query access to the content store
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Run a GROQ query and return its raw `result`
    async fn query(&self, groq: &str, params: &QueryParams) -> Result<Value, ContentError>;

    /// Cheap round trip used by readiness checks
    async fn ping(&self) -> Result<(), ContentError> {
        self.query("1", &QueryParams::new()).await.map(|_| ())
    }
}

/// Run a query and decode its result into `T`
pub async fn fetch_as<T: DeserializeOwned>(
    store: &dyn ContentStore,
    groq: &str,
    params: &QueryParams,
) -> Result<T, ContentError> {
    let value = store.query(groq, params).await?;
    serde_json::from_value(value).map_err(|e| ContentError::Decode(e.to_string()))
}
