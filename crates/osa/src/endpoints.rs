//! 🗺️ The action table — every action the adapter speaks, written down exactly once.
//!
//! 🎬 *[thirteen actions walk into a match statement. twelve of them are the same joke
//! with a different path. the table says "you're all rows now", and the match goes home.]*
//!
//! 🧠 Knowledge graph:
//! - [`ENDPOINTS`] is static data: method, path template, refresh support, fixed params,
//!   fixed headers. The adapter reads it; it never re-states it.
//! - Path templates use `{index}` and `{id}`. Identifiers are substituted as-is, no escaping,
//!   so the caller's index pattern (`logs-*`, `a,b`) reaches the cluster untouched.
//! - `search` is the only shape-shifter: POST with a body, GET without ([`RouteMethod::GetOrPost`]).
//! - `raw_request` has no template at all; the caller brings method and path. 🦆

use std::fmt;
use std::str::FromStr;

use reqwest::Method;

/// 📡 The four verbs the fixed actions use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_method(self) -> Method {
        match self {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        }
    }
}

/// 🎭 How an action picks its method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteMethod {
    Fixed(HttpMethod),
    /// 🔎 POST when a query body is present, GET otherwise.
    GetOrPost,
    /// 🎛️ raw_request: whatever the caller says.
    CallerSpecified,
}

/// 🎯 Every action the adapter exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ClusterHealth,
    ListIndices,
    GetIndex,
    CreateIndex,
    DeleteIndex,
    IndexDocument,
    CreateDocument,
    GetDocument,
    UpdateDocument,
    DeleteDocument,
    Search,
    Bulk,
    RawRequest,
}

/// 📜 One row of the action table.
#[derive(Debug)]
pub struct Endpoint {
    pub action: Action,
    pub name: &'static str,
    pub method: RouteMethod,
    pub path: &'static str,
    pub takes_refresh: bool,
    pub params: &'static [(&'static str, &'static str)],
    pub headers: &'static [(&'static str, &'static str)],
}

const fn row(
    action: Action,
    name: &'static str,
    method: RouteMethod,
    path: &'static str,
    takes_refresh: bool,
) -> Endpoint {
    Endpoint {
        action,
        name,
        method,
        path,
        takes_refresh,
        params: &[],
        headers: &[],
    }
}

use HttpMethod::{Delete, Get, Post, Put};
use RouteMethod::Fixed;

/// 🗺️ The table. Row order matches [`Action`] declaration order.
pub static ENDPOINTS: [Endpoint; 13] = [
    row(Action::ClusterHealth, "cluster_health", Fixed(Get), "/_cluster/health", false),
    Endpoint {
        params: &[("format", "json")],
        ..row(Action::ListIndices, "list_indices", Fixed(Get), "/_cat/indices", false)
    },
    row(Action::GetIndex, "get_index", Fixed(Get), "/{index}", false),
    row(Action::CreateIndex, "create_index", Fixed(Put), "/{index}", false),
    row(Action::DeleteIndex, "delete_index", Fixed(Delete), "/{index}", false),
    row(Action::IndexDocument, "index_document", Fixed(Put), "/{index}/_doc/{id}", true),
    row(Action::CreateDocument, "create_document", Fixed(Post), "/{index}/_doc", true),
    row(Action::GetDocument, "get_document", Fixed(Get), "/{index}/_doc/{id}", false),
    row(Action::UpdateDocument, "update_document", Fixed(Post), "/{index}/_update/{id}", true),
    row(Action::DeleteDocument, "delete_document", Fixed(Delete), "/{index}/_doc/{id}", true),
    row(Action::Search, "search", RouteMethod::GetOrPost, "/{index}/_search", false),
    Endpoint {
        headers: &[("Content-Type", "application/x-ndjson")],
        ..row(Action::Bulk, "bulk", Fixed(Post), "/_bulk", true)
    },
    row(Action::RawRequest, "raw_request", RouteMethod::CallerSpecified, "", false),
];

impl Action {
    pub const ALL: [Action; 13] = [
        Action::ClusterHealth,
        Action::ListIndices,
        Action::GetIndex,
        Action::CreateIndex,
        Action::DeleteIndex,
        Action::IndexDocument,
        Action::CreateDocument,
        Action::GetDocument,
        Action::UpdateDocument,
        Action::DeleteDocument,
        Action::Search,
        Action::Bulk,
        Action::RawRequest,
    ];

    pub fn endpoint(self) -> &'static Endpoint {
        &ENDPOINTS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.endpoint().name
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ENDPOINTS
            .iter()
            .find(|endpoint| endpoint.name == s)
            .map(|endpoint| endpoint.action)
            .ok_or_else(|| format!("💀 '{s}' is not an action we know. Try one of: cluster_health, search, bulk, …"))
    }
}

impl Endpoint {
    /// 🔧 Fill `{index}` and `{id}` into the path template.
    pub fn render_path(&self, index: &str, id: &str) -> String {
        self.path.replace("{index}", index).replace("{id}", id)
    }

    /// 📡 Method for this call. `has_body` only matters to search.
    /// `None` means the caller has to supply one (raw_request).
    pub fn method_for(&self, has_body: bool) -> Option<Method> {
        match self.method {
            RouteMethod::Fixed(method) => Some(method.as_method()),
            RouteMethod::GetOrPost if has_body => Some(Method::POST),
            RouteMethod::GetOrPost => Some(Method::GET),
            RouteMethod::CallerSpecified => None,
        }
    }
}
