//! Transport collaborator: hands a finished request to the network.
//!
//! The dispatcher is generic over [`Transport`] so the encryption pipeline
//! can be exercised without sockets. [`ReqwestTransport`] is the production
//! implementation; connection pooling, TLS, and timeouts all live inside its
//! [`reqwest::Client`] and are deliberately outside this crate's scope.
//! Transport failures are propagated verbatim, never reinterpreted, and this
//! layer adds no retries of its own.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http::{response, Request};
#[cfg(test)]
use mockall::automock;
use thiserror::Error;

/// Opaque failure raised by a [`Transport`] implementation.
///
/// The dispatcher passes values of this type through untouched. The cause is
/// embedded in the display message; it is deliberately not re-exposed as a
/// [`std::error::Error::source`], which would print it twice when callers
/// render the full chain.
#[derive(Debug, Error)]
#[error("transport failure: {0}")]
pub struct TransportError(Box<dyn std::error::Error + Send + Sync>);

impl TransportError {
    /// Wrap an underlying transport-level error.
    pub fn new(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self(error.into())
    }
}

/// A one-shot request/response round trip.
///
/// `send` consumes the fully prepared request (the dispatcher has already
/// finished all header rewriting by this point) and resolves to the response
/// body plus its metadata. Each call is independent; implementations must be
/// safe to invoke concurrently from multiple tasks.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Dispatch `request` and await the full response.
    async fn send(
        &self,
        request: Request<Bytes>,
    ) -> Result<(Bytes, response::Parts), TransportError>;
}

/// Production transport built on a pooled [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the underlying client cannot be
    /// constructed (e.g. the TLS backend fails to initialise).
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(TransportError::new)?;
        Ok(Self { client })
    }

    /// Wrap an already-configured client.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(
        &self,
        request: Request<Bytes>,
    ) -> Result<(Bytes, response::Parts), TransportError> {
        let request = reqwest::Request::try_from(request).map_err(TransportError::new)?;
        let response = self.client.execute(request).await.map_err(TransportError::new)?;

        let status = response.status();
        let version = response.version();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(TransportError::new)?;

        let mut builder = http::Response::builder().status(status).version(version);
        if let Some(h) = builder.headers_mut() {
            *h = headers;
        }
        let (parts, ()) = builder.body(()).map_err(TransportError::new)?.into_parts();

        Ok((body, parts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_with_timeout_builds() {
        assert!(ReqwestTransport::new(Duration::from_secs(30)).is_ok());
    }

    #[test]
    fn error_display_includes_cause() {
        let err = TransportError::new(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "connection refused",
        ));
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn error_reports_cause_exactly_once() {
        let err = TransportError::new(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "connection refused",
        ));
        assert_eq!(err.to_string().matches("connection refused").count(), 1);
        // The cause lives in the message only; a source would render it twice
        // in chain-printing formats.
        assert!(std::error::Error::source(&err).is_none());
    }
}
