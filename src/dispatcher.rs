//! The secure dispatcher: marker-driven header rewriting in front of transport.
//!
//! # Dispatch pipeline
//!
//! 1. Clone the caller's request — the original is never mutated.
//! 2. If the working copy is not marked, hand it to the transport unchanged.
//! 3. Otherwise strip the marker, obtain the application identifier, encrypt
//!    it, and insert the token under the same reserved header name.
//! 4. Delegate to the transport and return its result verbatim.
//!
//! # Fail-closed invariant
//!
//! A marked request is never sent unless the identifier was successfully
//! encrypted: a missing identifier or a cipher failure aborts the dispatch
//! before the transport is invoked, so neither the sentinel nor a plaintext
//! identifier can ever reach the wire.

use std::time::Duration;

use anyhow::Context as _;
use bytes::Bytes;
use http::{response, HeaderValue, Request};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;
use crate::crypto::cipher::CipherError;
use crate::crypto::StringEncryptor;
use crate::identity::{EnvIdentityProvider, IdentityProvider};
use crate::marker;
use crate::transport::{ReqwestTransport, Transport, TransportError};

/// Errors produced by [`SecureDispatcher::dispatch`].
///
/// Every variant except [`DispatchError::Transport`] aborts the dispatch
/// before any bytes are sent.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The identity provider could not supply an application identifier.
    #[error("application identifier could not be retrieved for encryption")]
    IdentifierUnavailable,

    /// Encrypting the identifier failed; the underlying cause is attached.
    #[error("encryption of application identifier failed: {0}")]
    Encryption(#[source] CipherError),

    /// An internal invariant was violated (e.g. a produced token was not a
    /// valid header value). Not expected to occur in practice.
    #[error("internal error: {0}")]
    Internal(String),

    /// The transport collaborator failed; passed through unmodified.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Request dispatcher that encrypts the application identifier into marked
/// requests before handing them to the transport.
///
/// Holds no mutable state: the key is fixed inside the [`StringEncryptor`]
/// and every dispatch works on its own copy of the request, so a shared
/// dispatcher can serve any number of concurrent callers. Each dispatch
/// draws its own fresh nonce, so concurrency never causes nonce reuse.
#[derive(Debug)]
pub struct SecureDispatcher<T, I> {
    encryptor: StringEncryptor,
    transport: T,
    identity: I,
}

impl<T, I> SecureDispatcher<T, I>
where
    T: Transport,
    I: IdentityProvider,
{
    /// Build a dispatcher from a transport, an identity provider, and raw
    /// key bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidKeyLength`] unless `key` is exactly
    /// 32 bytes; no dispatcher is produced in that case.
    pub fn new(transport: T, identity: I, key: &[u8]) -> Result<Self, CipherError> {
        Ok(Self {
            encryptor: StringEncryptor::new(key)?,
            transport,
            identity,
        })
    }

    /// Dispatch a request, encrypting the identifier first if the request
    /// is marked.
    ///
    /// The caller's `request` is read but never mutated; all header
    /// rewriting happens on an internal working copy. Unmarked requests are
    /// forwarded without touching the identity provider or the encryptor.
    /// The transport's result — success or failure — is returned verbatim;
    /// no retries are performed here.
    ///
    /// Cancellation: dropping the returned future before the transport call
    /// means the identifier is never sent; in-flight cancellation follows
    /// the transport's own semantics.
    ///
    /// # Errors
    ///
    /// See [`DispatchError`]. All pre-transport failures are fail-closed:
    /// nothing is sent.
    pub async fn dispatch(
        &self,
        request: &Request<Bytes>,
    ) -> Result<(Bytes, response::Parts), DispatchError> {
        let mut outgoing = clone_request(request);

        if marker::wants_encrypted_identifier(outgoing.headers()) {
            outgoing.headers_mut().remove(marker::ENCRYPTED_IDENTIFIER_HEADER);

            let identifier = self.identity.app_identifier().ok_or_else(|| {
                warn!("application identifier unavailable, aborting dispatch");
                DispatchError::IdentifierUnavailable
            })?;

            // The identifier itself must never appear in logs or traces.
            let token = self.encryptor.encrypt(&identifier).map_err(|e| {
                warn!(error = %e, "identifier encryption failed, aborting dispatch");
                DispatchError::Encryption(e)
            })?;

            let value = HeaderValue::from_str(&token).map_err(|e| {
                DispatchError::Internal(format!("encrypted token is not a valid header value: {e}"))
            })?;
            outgoing
                .headers_mut()
                .insert(marker::ENCRYPTED_IDENTIFIER_HEADER, value);
            debug!("encrypted application identifier injected");
        }

        Ok(self.transport.send(outgoing).await?)
    }
}

impl SecureDispatcher<ReqwestTransport, EnvIdentityProvider> {
    /// Build the production dispatcher from a validated [`Config`].
    ///
    /// # Errors
    ///
    /// Returns an error if the key material does not decode to 32 bytes or
    /// the HTTP client cannot be constructed.
    pub fn from_config(cfg: &Config) -> anyhow::Result<Self> {
        let key = cfg.decode_key()?;
        let transport = ReqwestTransport::new(Duration::from_secs(cfg.request_timeout_secs))
            .context("failed to build HTTP transport")?;
        let identity = EnvIdentityProvider::new(cfg.identifier_env_var.clone());
        Self::new(transport, identity, &key).context("invalid key material")
    }
}

/// Copy a request's method, target, version, headers, and body.
///
/// Request extensions are not carried over; this layer only ever forwards
/// the parts the transport serialises.
fn clone_request(request: &Request<Bytes>) -> Request<Bytes> {
    let mut copy = Request::new(request.body().clone());
    *copy.method_mut() = request.method().clone();
    *copy.uri_mut() = request.uri().clone();
    *copy.version_mut() = request.version();
    *copy.headers_mut() = request.headers().clone();
    copy
}
