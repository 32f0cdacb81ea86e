//! 📨 Requests — from "what the caller asked for" to "what goes on the wire".
//!
//! 🧠 Knowledge graph:
//! - [`ActionCall`]: one variant per action, carrying only that action's own fields.
//!   Serde-tagged by `action`, so `{"action":"search","index":"logs","query_string":"x:1"}`
//!   is a complete call.
//! - [`ActionRequest`]: method, rendered path, headers, query params, parsed body.
//!   Built by [`ActionCall::into_request`] from the static table in [`crate::endpoints`],
//!   so every action shares one recipe and none of them can drift. 🦆

use std::collections::BTreeMap;

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::endpoints::{Action, Endpoint};
use crate::error::{AdapterError, Result};
use crate::normalize::{ParsedBody, is_truthy, parse_json_input, parse_string_map};

/// 🎯 A fully described call to one action.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ActionCall {
    ClusterHealth,
    ListIndices,
    GetIndex {
        index: String,
    },
    CreateIndex {
        index: String,
        #[serde(default)]
        body: Option<Value>,
    },
    DeleteIndex {
        index: String,
    },
    IndexDocument {
        index: String,
        document_id: String,
        #[serde(default)]
        body: Option<Value>,
        #[serde(default)]
        refresh: Option<String>,
    },
    CreateDocument {
        index: String,
        #[serde(default)]
        body: Option<Value>,
        #[serde(default)]
        refresh: Option<String>,
    },
    GetDocument {
        index: String,
        document_id: String,
    },
    UpdateDocument {
        index: String,
        document_id: String,
        #[serde(default)]
        body: Option<Value>,
        #[serde(default)]
        refresh: Option<String>,
    },
    DeleteDocument {
        index: String,
        document_id: String,
        #[serde(default)]
        refresh: Option<String>,
    },
    Search {
        index: String,
        #[serde(default)]
        query_body: Option<Value>,
        #[serde(default)]
        query_string: Option<String>,
    },
    Bulk {
        #[serde(default)]
        payload: Option<Value>,
        #[serde(default)]
        refresh: Option<String>,
    },
    RawRequest {
        method: String,
        path: String,
        #[serde(default)]
        body: Option<Value>,
        #[serde(default)]
        headers: Option<Value>,
        #[serde(default)]
        params: Option<Value>,
    },
}

/// 📨 One HTTP request, ready to send.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionRequest {
    pub method: Method,
    pub path: String,
    pub headers: BTreeMap<String, String>,
    pub params: Vec<(String, String)>,
    pub body: Option<ParsedBody>,
}

impl ActionRequest {
    /// 🏗️ A bare request with nothing attached yet.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: BTreeMap::new(),
            params: Vec::new(),
            body: None,
        }
    }

    /// 🗺️ Seed a request from a table row: method, rendered path, fixed params and headers.
    fn from_endpoint(endpoint: &Endpoint, index: &str, id: &str, has_body: bool) -> Result<Self> {
        for (placeholder, value, label) in [("{index}", index, "index"), ("{id}", id, "document_id")] {
            if endpoint.path.contains(placeholder) && value.trim().is_empty() {
                return Err(AdapterError::InvalidInput(format!(
                    "{} needs a non-empty {}",
                    endpoint.name, label
                )));
            }
        }
        let method = endpoint.method_for(has_body).ok_or_else(|| {
            AdapterError::InvalidInput(format!("{} needs a caller-supplied method", endpoint.name))
        })?;

        let mut request = Self::new(method, endpoint.render_path(index, id));
        for (name, value) in endpoint.params {
            request.params.push((name.to_string(), value.to_string()));
        }
        for (name, value) in endpoint.headers {
            request.headers.insert(name.to_string(), value.to_string());
        }
        Ok(request)
    }

    /// 🔄 Add `refresh` when it says anything at all.
    pub fn with_refresh(self, refresh: Option<&str>) -> Self {
        self.with_param("refresh", refresh)
    }

    /// 🔧 Add a query param, skipping absent or empty values.
    pub fn with_param(mut self, name: &str, value: Option<&str>) -> Self {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.params.push((name.to_string(), value.to_string()));
        }
        self
    }

    /// 📦 Attach a body after the three-stage parse.
    pub fn with_body(mut self, body: Option<&Value>) -> Self {
        self.body = parse_json_input(body);
        self
    }

    /// 🔍 Look up a query param by name. First match wins.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

impl ActionCall {
    pub fn action(&self) -> Action {
        match self {
            ActionCall::ClusterHealth => Action::ClusterHealth,
            ActionCall::ListIndices => Action::ListIndices,
            ActionCall::GetIndex { .. } => Action::GetIndex,
            ActionCall::CreateIndex { .. } => Action::CreateIndex,
            ActionCall::DeleteIndex { .. } => Action::DeleteIndex,
            ActionCall::IndexDocument { .. } => Action::IndexDocument,
            ActionCall::CreateDocument { .. } => Action::CreateDocument,
            ActionCall::GetDocument { .. } => Action::GetDocument,
            ActionCall::UpdateDocument { .. } => Action::UpdateDocument,
            ActionCall::DeleteDocument { .. } => Action::DeleteDocument,
            ActionCall::Search { .. } => Action::Search,
            ActionCall::Bulk { .. } => Action::Bulk,
            ActionCall::RawRequest { .. } => Action::RawRequest,
        }
    }

    /// 🚀 Turn the call into a wire-ready request, using the action table for everything
    /// that isn't the caller's own data.
    pub fn into_request(self) -> Result<ActionRequest> {
        let endpoint = self.action().endpoint();
        let request = match self {
            ActionCall::ClusterHealth | ActionCall::ListIndices => {
                ActionRequest::from_endpoint(endpoint, "", "", false)?
            }
            ActionCall::GetIndex { index } | ActionCall::DeleteIndex { index } => {
                ActionRequest::from_endpoint(endpoint, &index, "", false)?
            }
            ActionCall::CreateIndex { index, body } => {
                ActionRequest::from_endpoint(endpoint, &index, "", false)?.with_body(body.as_ref())
            }
            ActionCall::IndexDocument { index, document_id, body, refresh }
            | ActionCall::UpdateDocument { index, document_id, body, refresh } => {
                ActionRequest::from_endpoint(endpoint, &index, &document_id, false)?
                    .with_refresh(refresh.as_deref())
                    .with_body(body.as_ref())
            }
            ActionCall::CreateDocument { index, body, refresh } => {
                ActionRequest::from_endpoint(endpoint, &index, "", false)?
                    .with_refresh(refresh.as_deref())
                    .with_body(body.as_ref())
            }
            ActionCall::GetDocument { index, document_id } => {
                ActionRequest::from_endpoint(endpoint, &index, &document_id, false)?
            }
            ActionCall::DeleteDocument { index, document_id, refresh } => {
                ActionRequest::from_endpoint(endpoint, &index, &document_id, false)?
                    .with_refresh(refresh.as_deref())
            }
            ActionCall::Search { index, query_body, query_string } => {
                // -- 🔎 a body that says something means POST; q rides along either way
                let has_body = is_truthy(query_body.as_ref());
                let request = ActionRequest::from_endpoint(endpoint, &index, "", has_body)?
                    .with_param("q", query_string.as_deref());
                if has_body {
                    request.with_body(query_body.as_ref())
                } else {
                    request
                }
            }
            ActionCall::Bulk { payload, refresh } => {
                let request = ActionRequest::from_endpoint(endpoint, "", "", false)?
                    .with_refresh(refresh.as_deref())
                    .with_body(payload.as_ref());
                if let Some(ParsedBody::Raw(ndjson)) = &request.body {
                    debug!(
                        "📦 bulk payload: {} bytes, {} ndjson lines",
                        ndjson.len(),
                        memchr::memchr_iter(b'\n', ndjson.as_bytes()).count()
                    );
                }
                request
            }
            ActionCall::RawRequest { method, path, body, headers, params } => {
                let method = parse_method(&method)?;
                let path = if path.starts_with('/') { path } else { format!("/{path}") };
                let mut request = ActionRequest::new(method, path).with_body(body.as_ref());
                request.headers = parse_string_map(headers.as_ref(), "headers")?;
                request.params = parse_string_map(params.as_ref(), "params")?
                    .into_iter()
                    .collect();
                request
            }
        };
        Ok(request)
    }
}

/// 📡 Upper-case and validate a caller-supplied method token.
fn parse_method(method: &str) -> Result<Method> {
    let upper = method.trim().to_uppercase();
    if upper.is_empty() {
        return Err(AdapterError::InvalidInput("raw_request needs a method".to_string()));
    }
    Method::from_bytes(upper.as_bytes())
        .map_err(|_| AdapterError::InvalidInput(format!("'{method}' is not an HTTP method")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn the_one_where_create_document_carries_refresh_and_json() -> Result<()> {
        let request = ActionCall::CreateDocument {
            index: "logs".to_string(),
            body: Some(json!({"x": 1})),
            refresh: Some("true".to_string()),
        }
        .into_request()?;

        assert_eq!(request.method, Method::POST);
        assert_eq!(request.path, "/logs/_doc");
        assert_eq!(request.param("refresh"), Some("true"));
        assert_eq!(request.body, Some(ParsedBody::Structured(json!({"x": 1}))));
        Ok(())
    }

    #[test]
    fn the_one_where_search_without_a_body_stays_a_get() -> Result<()> {
        let request = ActionCall::Search {
            index: "logs".to_string(),
            query_body: None,
            query_string: Some("x:1".to_string()),
        }
        .into_request()?;

        assert_eq!(request.method, Method::GET);
        assert_eq!(request.path, "/logs/_search");
        assert_eq!(request.params, vec![("q".to_string(), "x:1".to_string())]);
        assert_eq!(request.body, None);
        Ok(())
    }

    #[test]
    fn the_one_where_an_empty_query_body_does_not_count() -> Result<()> {
        for empty in [json!(""), json!({}), Value::Null] {
            let request = ActionCall::Search {
                index: "logs".to_string(),
                query_body: Some(empty),
                query_string: None,
            }
            .into_request()?;
            assert_eq!(request.method, Method::GET);
            assert!(request.params.is_empty());
        }
        Ok(())
    }

    #[test]
    fn the_one_where_bulk_keeps_its_ndjson_and_skips_refresh() -> Result<()> {
        let ndjson = "{\"index\":{\"_index\":\"logs\"}}\n{\"x\":1}\n";
        let request = ActionCall::Bulk {
            payload: Some(json!(ndjson)),
            refresh: None,
        }
        .into_request()?;

        assert_eq!(request.method, Method::POST);
        assert_eq!(request.path, "/_bulk");
        assert_eq!(request.param("refresh"), None);
        assert_eq!(
            request.headers.get("Content-Type").map(String::as_str),
            Some("application/x-ndjson")
        );
        assert_eq!(request.body, Some(ParsedBody::Raw(ndjson.to_string())));
        Ok(())
    }

    #[test]
    fn the_one_where_empty_refresh_is_no_refresh() -> Result<()> {
        let request = ActionCall::DeleteDocument {
            index: "logs".to_string(),
            document_id: "7".to_string(),
            refresh: Some(String::new()),
        }
        .into_request()?;
        assert_eq!(request.method, Method::DELETE);
        assert_eq!(request.path, "/logs/_doc/7");
        assert!(request.params.is_empty());
        Ok(())
    }

    #[test]
    fn the_one_where_raw_request_tidies_up_after_the_caller() -> Result<()> {
        let request = ActionCall::RawRequest {
            method: "patch".to_string(),
            path: "_plugins/_security/api/account".to_string(),
            body: Some(json!("{\"a\": 1}")),
            headers: Some(json!("{\"X-Opaque-Id\": \"trace-1\"}")),
            params: Some(json!({"pretty": true})),
        }
        .into_request()?;

        assert_eq!(request.method, Method::PATCH);
        assert_eq!(request.path, "/_plugins/_security/api/account");
        assert_eq!(request.headers.get("X-Opaque-Id").map(String::as_str), Some("trace-1"));
        assert_eq!(request.param("pretty"), Some("true"));
        assert_eq!(request.body, Some(ParsedBody::Structured(json!({"a": 1}))));
        Ok(())
    }

    #[test]
    fn the_one_where_raw_request_refuses_garbage_headers() {
        let call = ActionCall::RawRequest {
            method: "GET".to_string(),
            path: "/".to_string(),
            body: None,
            headers: Some(json!("{broken")),
            params: None,
        };
        assert!(matches!(call.into_request(), Err(AdapterError::InvalidInput(_))));

        let call = ActionCall::RawRequest {
            method: "NOT A METHOD".to_string(),
            path: "/".to_string(),
            body: None,
            headers: None,
            params: None,
        };
        assert!(matches!(call.into_request(), Err(AdapterError::InvalidInput(_))));
    }

    #[test]
    fn the_one_where_a_blank_index_never_leaves_the_building() {
        let call = ActionCall::DeleteIndex { index: "  ".to_string() };
        assert!(matches!(call.into_request(), Err(AdapterError::InvalidInput(_))));
    }

    #[test]
    fn the_one_where_calls_arrive_as_tagged_json() -> anyhow::Result<()> {
        let call: ActionCall = serde_json::from_value(json!({
            "action": "index_document",
            "index": "logs",
            "document_id": "1",
            "body": {"msg": "hi"}
        }))?;
        assert_eq!(
            call,
            ActionCall::IndexDocument {
                index: "logs".to_string(),
                document_id: "1".to_string(),
                body: Some(json!({"msg": "hi"})),
                refresh: None,
            }
        );
        let health: ActionCall = serde_json::from_value(json!({"action": "cluster_health"}))?;
        assert_eq!(health.action(), Action::ClusterHealth);
        Ok(())
    }
}
