//! # 📡 THE REQUEST ADAPTER
//!
//! 🎬 COLD OPEN — INT. WORKFLOW RUNNER — 9:03 AM
//!
//! A step fires: "create_document". It carries an index name, a body that might be JSON
//! or might be a dict someone pasted from a notebook, a refresh flag spelled "true", a
//! client cert as inline PEM and a key as a file reference. It wants one thing: an answer.
//!
//! 🚀 This module gives it one. Per call, and only per call:
//! 1. normalize the base URL (or refuse, with a `Configuration` error);
//! 2. materialize TLS files (inline PEM or file store), scoped to this call;
//! 3. pick the verify policy and the client certificate;
//! 4. coerce the timeout;
//! 5. parse the body (JSON, then literal, then raw);
//! 6. send exactly one request with a freshly built client;
//! 7. fold whatever came back into a [`NormalizedResponse`].
//!
//! ⚠️ No retries. No pooling across calls. No caching. If the cluster says 500, you get
//! an envelope that says 500. If the network says nothing, you get `AdapterError::Transport`.
//!
//! 🦆 (mandatory duck, no context provided, none shall be requested)

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info};

use crate::connection::{ConnectionInput, ConnectionParams};
use crate::error::Result;
use crate::file_stores::{FileStore, FileStoreBackend};
use crate::normalize::ParsedBody;
use crate::request::{ActionCall, ActionRequest};
use crate::response::NormalizedResponse;
use crate::tls::TlsMaterial;

/// 🔌 The adapter. Holds a file store and nothing else; every call starts from scratch.
#[derive(Debug, Clone)]
pub struct RequestAdapter<S = FileStoreBackend> {
    file_store: S,
}

impl<S: FileStore> RequestAdapter<S> {
    pub fn new(file_store: S) -> Self {
        Self { file_store }
    }

    pub fn file_store(&self) -> &S {
        &self.file_store
    }

    /// 🎯 Run any action from its tagged description.
    pub async fn dispatch(&self, conn: &ConnectionInput, call: ActionCall) -> Result<NormalizedResponse> {
        let action = call.action();
        info!("🚀 {} -> {}", action, conn.base_url.trim());
        let request = call.into_request()?;
        self.execute(conn, request).await
    }

    /// 📡 The shared recipe: resolve connection and TLS, send one request, normalize the reply.
    pub async fn execute(&self, conn: &ConnectionInput, request: ActionRequest) -> Result<NormalizedResponse> {
        let params = ConnectionParams::resolve(conn)?;
        let tls = TlsMaterial::resolve(
            &self.file_store,
            conn.client_cert.as_deref(),
            conn.client_key.as_deref(),
            conn.ca_cert.as_deref(),
        )
        .await?;

        let client = tls
            .configure(Client::builder().timeout(params.timeout), params.verify)?
            .build()?;

        let url = params.url_for(&request.path);
        debug!("📡 {} {} ({} query params)", request.method, url, request.params.len());

        let mut builder = client.request(request.method, &url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !request.params.is_empty() {
            builder = builder.query(&request.params);
        }
        // -- 📦 headers go on first, so an explicit Content-Type beats json()'s default
        builder = match request.body {
            Some(ParsedBody::Structured(value)) => builder.json(&value),
            Some(ParsedBody::Raw(text)) => builder.body(text),
            None => builder,
        };

        let response = builder.send().await?;
        let normalized = NormalizedResponse::from_response(response).await?;
        debug!(
            "📬 {} answered {} (success: {})",
            normalized.url, normalized.status, normalized.success
        );

        // -- 🗑️ the PEMs leave with the call
        drop(tls);
        Ok(normalized)
    }

    /// 🩺 `GET /_cluster/health`
    pub async fn cluster_health(&self, conn: &ConnectionInput) -> Result<NormalizedResponse> {
        self.dispatch(conn, ActionCall::ClusterHealth).await
    }

    /// 📋 `GET /_cat/indices?format=json`
    pub async fn list_indices(&self, conn: &ConnectionInput) -> Result<NormalizedResponse> {
        self.dispatch(conn, ActionCall::ListIndices).await
    }

    /// 🔍 `GET /{index}`
    pub async fn get_index(&self, conn: &ConnectionInput, index: &str) -> Result<NormalizedResponse> {
        self.dispatch(conn, ActionCall::GetIndex { index: index.to_string() })
            .await
    }

    /// 🏗️ `PUT /{index}` with settings/mappings.
    pub async fn create_index(
        &self,
        conn: &ConnectionInput,
        index: &str,
        body: Option<Value>,
    ) -> Result<NormalizedResponse> {
        let call = ActionCall::CreateIndex {
            index: index.to_string(),
            body,
        };
        self.dispatch(conn, call).await
    }

    /// 🗑️ `DELETE /{index}`
    pub async fn delete_index(&self, conn: &ConnectionInput, index: &str) -> Result<NormalizedResponse> {
        self.dispatch(conn, ActionCall::DeleteIndex { index: index.to_string() })
            .await
    }

    /// 📝 `PUT /{index}/_doc/{id}`
    pub async fn index_document(
        &self,
        conn: &ConnectionInput,
        index: &str,
        document_id: &str,
        body: Option<Value>,
        refresh: Option<&str>,
    ) -> Result<NormalizedResponse> {
        let call = ActionCall::IndexDocument {
            index: index.to_string(),
            document_id: document_id.to_string(),
            body,
            refresh: refresh.map(str::to_string),
        };
        self.dispatch(conn, call).await
    }

    /// ✨ `POST /{index}/_doc`, letting the cluster pick the id.
    pub async fn create_document(
        &self,
        conn: &ConnectionInput,
        index: &str,
        body: Option<Value>,
        refresh: Option<&str>,
    ) -> Result<NormalizedResponse> {
        let call = ActionCall::CreateDocument {
            index: index.to_string(),
            body,
            refresh: refresh.map(str::to_string),
        };
        self.dispatch(conn, call).await
    }

    /// 📄 `GET /{index}/_doc/{id}`
    pub async fn get_document(
        &self,
        conn: &ConnectionInput,
        index: &str,
        document_id: &str,
    ) -> Result<NormalizedResponse> {
        let call = ActionCall::GetDocument {
            index: index.to_string(),
            document_id: document_id.to_string(),
        };
        self.dispatch(conn, call).await
    }

    /// 🔄 `POST /{index}/_update/{id}`
    pub async fn update_document(
        &self,
        conn: &ConnectionInput,
        index: &str,
        document_id: &str,
        body: Option<Value>,
        refresh: Option<&str>,
    ) -> Result<NormalizedResponse> {
        let call = ActionCall::UpdateDocument {
            index: index.to_string(),
            document_id: document_id.to_string(),
            body,
            refresh: refresh.map(str::to_string),
        };
        self.dispatch(conn, call).await
    }

    /// 💀 `DELETE /{index}/_doc/{id}`
    pub async fn delete_document(
        &self,
        conn: &ConnectionInput,
        index: &str,
        document_id: &str,
        refresh: Option<&str>,
    ) -> Result<NormalizedResponse> {
        let call = ActionCall::DeleteDocument {
            index: index.to_string(),
            document_id: document_id.to_string(),
            refresh: refresh.map(str::to_string),
        };
        self.dispatch(conn, call).await
    }

    /// 🔎 `GET /{index}/_search?q=…`, or `POST` when there's a query body.
    pub async fn search(
        &self,
        conn: &ConnectionInput,
        index: &str,
        query_body: Option<Value>,
        query_string: Option<&str>,
    ) -> Result<NormalizedResponse> {
        let call = ActionCall::Search {
            index: index.to_string(),
            query_body,
            query_string: query_string.map(str::to_string),
        };
        self.dispatch(conn, call).await
    }

    /// 📦 `POST /_bulk` with an ndjson payload.
    pub async fn bulk(
        &self,
        conn: &ConnectionInput,
        payload: Option<Value>,
        refresh: Option<&str>,
    ) -> Result<NormalizedResponse> {
        let call = ActionCall::Bulk {
            payload,
            refresh: refresh.map(str::to_string),
        };
        self.dispatch(conn, call).await
    }

    /// 🎛️ Anything else: caller picks method and path; headers and params are JSON objects.
    pub async fn raw_request(
        &self,
        conn: &ConnectionInput,
        method: &str,
        path: &str,
        body: Option<Value>,
        headers: Option<Value>,
        params: Option<Value>,
    ) -> Result<NormalizedResponse> {
        let call = ActionCall::RawRequest {
            method: method.to_string(),
            path: path.to_string(),
            body,
            headers,
            params,
        };
        self.dispatch(conn, call).await
    }
}
