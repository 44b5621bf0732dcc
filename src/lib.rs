//! `secure-dispatch` — client-side HTTP layer that never sends the
//! application identifier in plaintext.
//!
//! Callers mark an outgoing request with [`marker::set_marker`]; at dispatch
//! time [`SecureDispatcher`] strips the marker, encrypts the identifier with
//! AES-256-GCM, and injects the base64 token under the same reserved header
//! name before delegating to the transport.
//!
//! ```no_run
//! use bytes::Bytes;
//! use http::Request;
//! use secure_dispatch::{marker, Config, SecureDispatcher};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let dispatcher = SecureDispatcher::from_config(&Config::from_env()?)?;
//!
//! let mut request = Request::new(Bytes::new());
//! *request.uri_mut() = "https://api.example.com/v1/ping".parse()?;
//! marker::set_marker(request.headers_mut(), true);
//!
//! let (body, parts) = dispatcher.dispatch(&request).await?;
//! # let _ = (body, parts);
//! # Ok(())
//! # }
//! ```
//!
//! This crate is sender-only: it exposes no decryption API, and it owns no
//! transport policy — TLS, pooling, retries, and response validation are the
//! transport collaborator's and the caller's business.

pub mod config;
pub mod crypto;
pub mod dispatcher;
pub mod identity;
pub mod marker;
pub mod transport;

pub use config::Config;
pub use crypto::cipher::CipherError;
pub use crypto::StringEncryptor;
pub use dispatcher::{DispatchError, SecureDispatcher};
pub use identity::{EnvIdentityProvider, IdentityProvider, StaticIdentityProvider};
pub use marker::{ENCRYPTED_IDENTIFIER_HEADER, MARKER_SENTINEL};
pub use transport::{ReqwestTransport, Transport, TransportError};
