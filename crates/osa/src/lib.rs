//! 🔎 osa — a stateless adapter between action calls and the OpenSearch REST API.
//!
//! One call in, one HTTP request out, one [`NormalizedResponse`] back. In between:
//! a base URL gets a scheme, a cert gets a temp file, a body gets parsed (or left alone),
//! and a boolean spelled "Y " becomes `true`. Nothing is remembered afterwards. 🦆

pub mod adapter;
pub mod app_config;
pub mod connection;
pub mod endpoints;
pub mod error;
pub mod file_stores;
pub mod literal;
pub mod normalize;
pub mod request;
pub mod response;
pub mod tls;

pub use adapter::RequestAdapter;
pub use app_config::{AppConfig, load_config};
pub use connection::{ConnectionInput, ConnectionParams};
pub use endpoints::Action;
pub use error::{AdapterError, Result};
pub use file_stores::{FileStore, FileStoreBackend, FileStoreConfig};
pub use request::{ActionCall, ActionRequest};
pub use response::{NormalizedResponse, ResponseBody};

/// 🚀 Build the configured file store and run one call against the configured cluster.
pub async fn run(app_config: &AppConfig, call: ActionCall) -> Result<NormalizedResponse> {
    let adapter = RequestAdapter::new(FileStoreBackend::from_config(&app_config.file_store));
    adapter.dispatch(&app_config.connection, call).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn the_one_where_run_goes_from_config_to_cluster_and_back() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/logs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"logs": {"aliases": {}}})))
            .expect(1)
            .mount(&server)
            .await;

        let app_config = AppConfig {
            connection: ConnectionInput::new(server.uri()),
            file_store: FileStoreConfig::InMemory,
        };
        let response = run(&app_config, ActionCall::GetIndex { index: "logs".to_string() }).await?;

        assert_eq!(response.status, 200);
        assert!(response.success);
        assert_eq!(response.body, ResponseBody::Json(json!({"logs": {"aliases": {}}})));
        Ok(())
    }
}
