//! 🔒 TLS material — turning "a cert, somehow" into files reqwest can use.
//!
//! 🎬 COLD OPEN — INT. /tmp — SOME TIME AGO
//!
//! A directory full of `*_client_key.pem` files. Hundreds of them. Nobody remembers
//! writing them. Nobody deleted them either. Private keys, just lying around, like
//! house keys under a doormat the size of a filesystem.
//!
//! Not here. Every PEM this module writes lives in a [`NamedTempFile`] owned by
//! [`TlsMaterial`]. When the call is done and `TlsMaterial` drops, the files go with it.
//!
//! 🧠 Knowledge graph:
//! - value contains `-----BEGIN` -> inline PEM, written verbatim.
//! - otherwise -> opaque reference, fetched from the [`FileStore`], bytes written verbatim.
//! - store failure -> `AdapterError::FileRetrieval`, and the call ends right there.
//! - [`VerifyPolicy`]: explicit `verify=false` wins; else the CA file if we have one; else defaults.
//! - [`ClientCert`]: (cert, key) if both, cert alone if only cert, nothing otherwise. 🦆

use std::io::Write;
use std::path::Path;

use reqwest::{Certificate, ClientBuilder, Identity};
use tempfile::NamedTempFile;
use tracing::{debug, trace};

use crate::error::{AdapterError, Result};
use crate::file_stores::FileStore;

#[cfg(test)]
pub(crate) mod fixtures;

/// 🔍 The marker that tells inline PEM apart from a file reference.
pub const PEM_MARKER: &str = "-----BEGIN";

const CLIENT_CERT_SUFFIX: &str = "_client_cert.pem";
const CLIENT_KEY_SUFFIX: &str = "_client_key.pem";
const CA_CERT_SUFFIX: &str = "_ca_cert.pem";

/// 🛡️ How the server's certificate gets checked.
#[derive(Debug, PartialEq, Eq)]
pub enum VerifyPolicy<'a> {
    /// 💀 Verification off. The caller said so, explicitly.
    Disabled,
    /// 📜 Trust this CA bundle and nothing else. Public roots sit this one out.
    CaFile(&'a PemFile),
    /// ✅ Whatever reqwest trusts out of the box.
    Default,
}

/// 🪪 What we present to the server as our own identity.
#[derive(Debug, PartialEq, Eq)]
pub enum ClientCert<'a> {
    Pair(&'a PemFile, &'a PemFile),
    /// 📎 One file that has to carry both the cert and its key.
    Single(&'a PemFile),
    None,
}

/// 📄 One PEM on disk, plus the exact bytes that went there.
///
/// The path is for whoever wants a file. The bytes are for the client builder, so nobody
/// reads the file back on the async path.
#[derive(Debug)]
pub struct PemFile {
    file: NamedTempFile,
    pem: Vec<u8>,
}

impl PemFile {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn pem(&self) -> &[u8] {
        &self.pem
    }
}

// -- 🔍 two PemFiles are the same file when they share a path. the bytes follow.
impl PartialEq for PemFile {
    fn eq(&self, other: &Self) -> bool {
        self.path() == other.path()
    }
}

impl Eq for PemFile {}

/// 🔒 The per-call TLS files. Drop it and the PEMs are gone from disk.
#[derive(Debug, Default)]
pub struct TlsMaterial {
    cert: Option<PemFile>,
    key: Option<PemFile>,
    ca: Option<PemFile>,
}

impl TlsMaterial {
    /// 🚀 Materialize cert, key and CA for one call.
    pub async fn resolve<S: FileStore + ?Sized>(
        store: &S,
        client_cert: Option<&str>,
        client_key: Option<&str>,
        ca_cert: Option<&str>,
    ) -> Result<Self> {
        let cert = resolve_material(store, client_cert, CLIENT_CERT_SUFFIX).await?;
        let key = resolve_material(store, client_key, CLIENT_KEY_SUFFIX).await?;
        let ca = resolve_material(store, ca_cert, CA_CERT_SUFFIX).await?;
        Ok(Self { cert, key, ca })
    }

    pub fn cert_path(&self) -> Option<&Path> {
        self.cert.as_ref().map(PemFile::path)
    }

    pub fn key_path(&self) -> Option<&Path> {
        self.key.as_ref().map(PemFile::path)
    }

    pub fn ca_path(&self) -> Option<&Path> {
        self.ca.as_ref().map(PemFile::path)
    }

    /// 🛡️ Explicit false disables verification; otherwise the CA file if present; otherwise default.
    pub fn verify_policy(&self, verify: bool) -> VerifyPolicy<'_> {
        match (verify, self.ca.as_ref()) {
            (false, _) => VerifyPolicy::Disabled,
            (true, Some(ca)) => VerifyPolicy::CaFile(ca),
            (true, None) => VerifyPolicy::Default,
        }
    }

    /// 🪪 The client certificate tuple, in the shape the server will see it.
    pub fn client_cert(&self) -> ClientCert<'_> {
        match (self.cert.as_ref(), self.key.as_ref()) {
            (Some(cert), Some(key)) => ClientCert::Pair(cert, key),
            (Some(cert), None) => ClientCert::Single(cert),
            // -- ⚠️ a key with no cert is a key to nothing. we leave it on the table.
            (None, _) => ClientCert::None,
        }
    }

    /// 🔧 Wire verify policy and client identity into a reqwest client builder.
    ///
    /// A CA bundle replaces the built-in roots entirely. A PEM reqwest can't parse comes
    /// back as `AdapterError::Transport`; a CA file with no certificates in it is
    /// `AdapterError::InvalidInput`.
    pub fn configure(&self, mut builder: ClientBuilder, verify: bool) -> Result<ClientBuilder> {
        match self.verify_policy(verify) {
            VerifyPolicy::Disabled => {
                debug!("⚠️ TLS verification disabled for this call. living dangerously, on request.");
                builder = builder.danger_accept_invalid_certs(true);
            }
            VerifyPolicy::CaFile(ca) => {
                let roots = Certificate::from_pem_bundle(ca.pem())?;
                if roots.is_empty() {
                    return Err(AdapterError::InvalidInput(format!(
                        "CA bundle at '{}' holds no certificates",
                        ca.path().display()
                    )));
                }
                trace!("📜 trusting only the {} CA cert(s) at '{}'", roots.len(), ca.path().display());
                builder = builder.tls_certs_only(roots);
            }
            VerifyPolicy::Default => {}
        }

        let identity_pem = match self.client_cert() {
            ClientCert::Pair(cert, key) => {
                let mut pem = cert.pem().to_vec();
                pem.push(b'\n');
                pem.extend_from_slice(key.pem());
                Some(pem)
            }
            ClientCert::Single(cert) => Some(cert.pem().to_vec()),
            ClientCert::None => None,
        };
        if let Some(pem) = identity_pem {
            trace!("🪪 presenting a client certificate for mutual TLS");
            builder = builder.identity(Identity::from_pem(&pem)?);
        }
        Ok(builder)
    }
}

/// 📁 Resolve one piece of TLS material into a scoped temp file.
///
/// Blank or absent -> `None`. Inline PEM -> written as-is. Anything else -> file store lookup.
pub async fn resolve_material<S: FileStore + ?Sized>(
    store: &S,
    value: Option<&str>,
    suffix: &str,
) -> Result<Option<PemFile>> {
    let Some(value) = value.filter(|v| !v.trim().is_empty()) else {
        return Ok(None);
    };

    if value.contains(PEM_MARKER) {
        trace!("🔒 inline PEM for '{}', writing it down", suffix);
        return write_temp_file(value.as_bytes().to_vec(), suffix).map(Some);
    }

    debug!("📂 fetching TLS material '{}' from the file store", value);
    let data = store
        .get_file(value)
        .await
        .map_err(|source| AdapterError::FileRetrieval {
            reference: value.to_string(),
            source,
        })?;
    write_temp_file(data, suffix).map(Some)
}

fn write_temp_file(pem: Vec<u8>, suffix: &str) -> Result<PemFile> {
    let mut file = tempfile::Builder::new()
        .prefix("osa_")
        .suffix(suffix)
        .tempfile()?;
    file.write_all(&pem)?;
    file.flush()?;
    Ok(PemFile { file, pem })
}
