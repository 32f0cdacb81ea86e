//! 📡 Connection parameters — the "where" and "how" of every call.
//!
//! [`ConnectionInput`] is what callers hand us: loose, stringly, straight from a config file
//! or a workflow form. [`ConnectionParams`] is what survives normalization: a real URL, a
//! real bool, a real `Duration`. TLS material is resolved separately in [`crate::tls`],
//! because that part needs the file store and a place on disk.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::normalize::{coerce_timeout, normalize_base_url, to_bool};

/// 📦 Caller-facing connection settings. Nothing here has been trusted yet.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ConnectionInput {
    /// 📡 Cluster root. Scheme optional, https assumed.
    #[serde(default)]
    pub base_url: String,
    /// 🪪 Client certificate: inline PEM or a file store reference.
    #[serde(default)]
    pub client_cert: Option<String>,
    /// 🔑 Client private key: inline PEM or a file store reference.
    #[serde(default)]
    pub client_key: Option<String>,
    /// 📜 CA bundle to trust: inline PEM or a file store reference.
    #[serde(default)]
    pub ca_cert: Option<String>,
    /// 🛡️ "true", "no", false, "Y", nothing at all. Coerced later, default true.
    #[serde(default)]
    pub verify: Option<Value>,
    /// ⏱️ Seconds, in whatever shape they arrive. Coerced later, default 30.
    #[serde(default)]
    pub timeout: Option<Value>,
}

impl ConnectionInput {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_client_cert(mut self, cert: impl Into<String>, key: impl Into<String>) -> Self {
        self.client_cert = Some(cert.into());
        self.client_key = Some(key.into());
        self
    }

    pub fn with_ca_cert(mut self, ca_cert: impl Into<String>) -> Self {
        self.ca_cert = Some(ca_cert.into());
        self
    }

    pub fn with_verify(mut self, verify: impl Into<Value>) -> Self {
        self.verify = Some(verify.into());
        self
    }

    pub fn with_timeout(mut self, timeout: impl Into<Value>) -> Self {
        self.timeout = Some(timeout.into());
        self
    }
}

/// ✅ Connection settings after normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionParams {
    pub base_url: String,
    pub verify: bool,
    pub timeout: Duration,
}

impl ConnectionParams {
    /// 🔧 Normalize URL, verify flag and timeout. Only the URL can fail.
    pub fn resolve(input: &ConnectionInput) -> Result<Self> {
        Ok(Self {
            base_url: normalize_base_url(&input.base_url)?,
            verify: to_bool(input.verify.as_ref(), true),
            timeout: coerce_timeout(input.timeout.as_ref()),
        })
    }

    /// 🎯 Join the base URL and an already-rendered path.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn the_one_where_defaults_fill_in_the_blanks() -> Result<()> {
        let params = ConnectionParams::resolve(&ConnectionInput::new("os.internal:9200/"))?;
        assert_eq!(
            params,
            ConnectionParams {
                base_url: "https://os.internal:9200".to_string(),
                verify: true,
                timeout: Duration::from_secs(30),
            }
        );
        assert_eq!(params.url_for("/_cluster/health"), "https://os.internal:9200/_cluster/health");
        Ok(())
    }

    #[test]
    fn the_one_where_loose_inputs_get_tightened() -> Result<()> {
        let input = ConnectionInput::new("http://localhost:9200")
            .with_verify("false")
            .with_timeout(json!("5"));
        let params = ConnectionParams::resolve(&input)?;
        assert!(!params.verify);
        assert_eq!(params.timeout, Duration::from_secs(5));
        Ok(())
    }

    #[test]
    fn the_one_where_no_url_means_no_call() {
        assert!(ConnectionParams::resolve(&ConnectionInput::default()).is_err());
    }
}
