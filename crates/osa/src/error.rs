//! 💀 The error taxonomy — every way a call can die before the cluster gets a say.
//!
//! 🧠 Knowledge graph:
//! - `Configuration`: the base URL was missing or blank. We never even dialed.
//! - `FileRetrieval`: a cert/key/CA reference went to the file store and came back empty-handed.
//! - `InvalidInput`: raw_request got headers/params/method it could not make sense of.
//! - `TempFile`: the PEM could not be written to its scoped temp file. Disk full, tmp gone, vibes off.
//! - `Transport`: reqwest said no. Network, TLS handshake, client build. Passed through untouched.
//!
//! ⚠️ HTTP 4xx/5xx are NOT in here. A 404 is an answer, not an error. It rides home inside
//! `NormalizedResponse` with `success = false`, like a rejection letter: still mail. 🦆

use thiserror::Error;

/// 💀 Everything the adapter itself can refuse to do.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// 🔧 Bad or missing base URL.
    #[error("💀 Configuration error: {0}")]
    Configuration(String),

    /// 📂 The file store could not produce the bytes behind a credential reference.
    #[error("💀 Failed to read file '{reference}' from the file store")]
    FileRetrieval {
        reference: String,
        #[source]
        source: anyhow::Error,
    },

    /// 🎯 Caller handed raw_request something that is not a method or not a JSON object.
    #[error("💀 Invalid input: {0}")]
    InvalidInput(String),

    /// 📁 Could not materialize TLS material into its temp file.
    #[error("💀 Failed to write TLS material to a temporary file")]
    TempFile(#[from] std::io::Error),

    /// 📡 Network, TLS or client construction failure, straight from reqwest.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// 📦 Shorthand so signatures stay on one line. Mostly.
pub type Result<T> = std::result::Result<T, AdapterError>;
