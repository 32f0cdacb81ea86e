//! 📬 The response envelope — one shape for every answer the cluster gives.
//!
//! Status, body, headers, final URL, and a `success` flag that is true for 200..=399.
//! A 404 is still an envelope. A 500 is still an envelope. Only transport failures escape
//! as errors; everything the cluster actually SAYS comes home in here. 🦆

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use tracing::trace;

use crate::error::Result;

/// 📦 The body, decoded if it was JSON, verbatim text if it wasn't.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    /// 🔍 Try JSON first; keep the text if JSON says no.
    pub fn from_text(text: String) -> Self {
        match serde_json::from_str::<Value>(&text) {
            Ok(value) => ResponseBody::Json(value),
            Err(_) => ResponseBody::Text(text),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Text(_) => None,
        }
    }
}

/// 📬 What every action returns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedResponse {
    pub status: u16,
    pub body: ResponseBody,
    pub headers: BTreeMap<String, String>,
    pub url: String,
    pub success: bool,
}

impl NormalizedResponse {
    /// ✅ 200 through 399. Redirects that reqwest didn't follow still count as "not an error".
    pub fn is_success_status(status: u16) -> bool {
        (200..400).contains(&status)
    }

    /// 📥 Drain a reqwest response into the envelope.
    pub async fn from_response(response: reqwest::Response) -> Result<Self> {
        let status = response.status().as_u16();
        let url = response.url().to_string();

        let mut headers: BTreeMap<String, String> = BTreeMap::new();
        for (name, value) in response.headers() {
            let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
            headers
                .entry(name.as_str().to_string())
                // -- 🔧 repeated headers fold into one, comma-joined. same as every browser's devtools.
                .and_modify(|existing| {
                    existing.push_str(", ");
                    existing.push_str(&value);
                })
                .or_insert(value);
        }

        let text = response.text().await?;
        trace!("📬 {} from {} ({} bytes)", status, url, text.len());

        Ok(Self {
            status,
            body: ResponseBody::from_text(text),
            headers,
            url,
            success: Self::is_success_status(status),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn the_one_where_json_bodies_get_decoded_and_text_stays_text() {
        assert_eq!(
            ResponseBody::from_text("{\"acknowledged\":true}".to_string()),
            ResponseBody::Json(json!({"acknowledged": true}))
        );
        assert_eq!(
            ResponseBody::from_text("green open logs".to_string()),
            ResponseBody::Text("green open logs".to_string())
        );
        assert_eq!(
            ResponseBody::from_text(String::new()),
            ResponseBody::Text(String::new())
        );
    }

    #[test]
    fn the_one_where_success_is_a_range_not_a_feeling() {
        assert!(NormalizedResponse::is_success_status(200));
        assert!(NormalizedResponse::is_success_status(201));
        assert!(NormalizedResponse::is_success_status(304));
        assert!(!NormalizedResponse::is_success_status(199));
        assert!(!NormalizedResponse::is_success_status(404));
        assert!(!NormalizedResponse::is_success_status(503));
    }

    #[test]
    fn the_one_where_the_envelope_serializes_flat() -> anyhow::Result<()> {
        let envelope = NormalizedResponse {
            status: 404,
            body: ResponseBody::Json(json!({"found": false})),
            headers: BTreeMap::from([("content-type".to_string(), "application/json".to_string())]),
            url: "https://os.local/logs/_doc/1".to_string(),
            success: false,
        };
        assert_eq!(
            serde_json::to_value(&envelope)?,
            json!({
                "status": 404,
                "body": {"found": false},
                "headers": {"content-type": "application/json"},
                "url": "https://os.local/logs/_doc/1",
                "success": false
            })
        );
        Ok(())
    }
}
