//! In-memory content store for tests.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;

use super::queries::AGENT_ID_BY_USER_QUERY;
use super::{AnalyticsQuery, ContentError, ContentStore, QueryParams};

/// Results keyed by GROQ text; unknown queries return null. Every call is recorded.
#[derive(Default)]
pub(crate) struct MemoryStore {
    pub(crate) results: HashMap<&'static str, Value>,
    pub(crate) failing: Option<&'static str>,
    calls: Mutex<Vec<(String, QueryParams)>>,
}

impl MemoryStore {
    pub(crate) fn with_agent(agent_id: &str) -> Self {
        let mut store = Self::default();
        store
            .results
            .insert(AGENT_ID_BY_USER_QUERY, json!({ "_id": agent_id }));
        store
    }

    pub(crate) fn set(mut self, query: AnalyticsQuery, value: Value) -> Self {
        self.results.insert(query.groq(), value);
        self
    }

    pub(crate) fn fail(mut self, query: AnalyticsQuery) -> Self {
        self.failing = Some(query.groq());
        self
    }

    pub(crate) fn fail_lookup(mut self) -> Self {
        self.failing = Some(AGENT_ID_BY_USER_QUERY);
        self
    }

    pub(crate) fn calls(&self) -> Vec<(String, QueryParams)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn query(&self, groq: &str, params: &QueryParams) -> Result<Value, ContentError> {
        self.calls
            .lock()
            .unwrap()
            .push((groq.to_string(), params.clone()));

        if self.failing == Some(groq) {
            return Err(ContentError::Api {
                status: 500,
                message: "boom".to_string(),
            });
        }

        Ok(self.results.get(groq).cloned().unwrap_or(Value::Null))
    }
}
