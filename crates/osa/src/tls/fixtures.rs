//! 🧪 Real PEMs and a pocket-sized HTTPS server, for tests that need TLS to actually happen.
//!
//! `ca.pem` signed both `server.pem` (SAN 127.0.0.1 / localhost) and `client.pem`.
//! `other_ca.pem` signed nothing we serve. It's the stranger at the door.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;
use tokio_rustls::rustls::crypto::aws_lc_rs;
use tokio_rustls::rustls::pki_types::pem::PemObject;
use tokio_rustls::rustls::pki_types::{CertificateDer, PrivateKeyDer};
use tokio_rustls::rustls::server::WebPkiClientVerifier;
use tokio_rustls::rustls::{RootCertStore, ServerConfig};

pub const CA_PEM: &str = include_str!("../../tests/fixtures/tls/ca.pem");
pub const OTHER_CA_PEM: &str = include_str!("../../tests/fixtures/tls/other_ca.pem");
pub const SERVER_CERT_PEM: &str = include_str!("../../tests/fixtures/tls/server.pem");
pub const SERVER_KEY_PEM: &str = include_str!("../../tests/fixtures/tls/server.key");
pub const CLIENT_CERT_PEM: &str = include_str!("../../tests/fixtures/tls/client.pem");
pub const CLIENT_KEY_PEM: &str = include_str!("../../tests/fixtures/tls/client.key");

/// The body every successful handshake gets back.
pub const GREEN: &str = r#"{"status":"green"}"#;

/// 🚀 Serve one canned `200 {"status":"green"}` per connection over TLS on 127.0.0.1.
///
/// With `require_client_cert`, only clients presenting a cert signed by [`CA_PEM`] get through.
pub async fn spawn_https_server(require_client_cert: bool) -> anyhow::Result<SocketAddr> {
    let provider = Arc::new(aws_lc_rs::default_provider());
    let chain = CertificateDer::pem_slice_iter(SERVER_CERT_PEM.as_bytes())
        .collect::<Result<Vec<_>, _>>()?;
    let key = PrivateKeyDer::from_pem_slice(SERVER_KEY_PEM.as_bytes())?;

    let builder = ServerConfig::builder_with_provider(provider.clone())
        .with_safe_default_protocol_versions()?;
    let builder = if require_client_cert {
        let mut roots = RootCertStore::empty();
        for ca in CertificateDer::pem_slice_iter(CA_PEM.as_bytes()) {
            roots.add(ca?)?;
        }
        let verifier = WebPkiClientVerifier::builder_with_provider(Arc::new(roots), provider).build()?;
        builder.with_client_cert_verifier(verifier)
    } else {
        builder.with_no_client_auth()
    };
    let acceptor = TlsAcceptor::from(Arc::new(builder.with_single_cert(chain, key)?));

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        while let Ok((tcp, _)) = listener.accept().await {
            let acceptor = acceptor.clone();
            tokio::spawn(async move {
                // -- 🚪 failed handshakes are some tests' whole point. the server just moves on.
                let Ok(mut tls) = acceptor.accept(tcp).await else {
                    return;
                };
                let mut seen = Vec::new();
                let mut buf = [0u8; 1024];
                while !seen.windows(4).any(|w| w == b"\r\n\r\n") {
                    match tls.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => seen.extend_from_slice(&buf[..n]),
                    }
                }
                let response = format!(
                    "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    GREEN.len(),
                    GREEN
                );
                let _ = tls.write_all(response.as_bytes()).await;
                let _ = tls.shutdown().await;
            });
        }
    });
    Ok(addr)
}
