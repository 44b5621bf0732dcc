//! Host-identity collaborator: supplies the application identifier to encrypt.
//!
//! The dispatcher never hard-codes where the identifier comes from. On
//! platforms with real bundle metadata the host application implements
//! [`IdentityProvider`] over that source; here the crate ships a process-
//! environment provider and a fixed-value provider.

#[cfg(test)]
use mockall::automock;

/// Source of the application identifier (bundle/package id).
///
/// Returning `None` means the host cannot supply an identifier, which makes
/// a marked dispatch fail closed. An empty string is *not* `None`: it is a
/// valid identifier and will be encrypted as-is.
#[cfg_attr(test, automock)]
pub trait IdentityProvider: Send + Sync {
    /// The application identifier, or `None` if the host has none.
    fn app_identifier(&self) -> Option<String>;
}

/// Default environment variable consulted by [`EnvIdentityProvider`].
pub const DEFAULT_IDENTIFIER_VAR: &str = "APP_BUNDLE_ID";

/// Reads the identifier from a process environment variable.
#[derive(Debug, Clone)]
pub struct EnvIdentityProvider {
    var: String,
}

impl EnvIdentityProvider {
    /// Provider reading the given environment variable.
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvIdentityProvider {
    fn default() -> Self {
        Self::new(DEFAULT_IDENTIFIER_VAR)
    }
}

impl IdentityProvider for EnvIdentityProvider {
    fn app_identifier(&self) -> Option<String> {
        std::env::var(&self.var).ok()
    }
}

/// Always returns the identifier it was constructed with.
///
/// Useful when the identifier is known at configuration time, and in tests.
#[derive(Debug, Clone)]
pub struct StaticIdentityProvider {
    identifier: String,
}

impl StaticIdentityProvider {
    /// Provider returning `identifier` on every call.
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
        }
    }
}

impl IdentityProvider for StaticIdentityProvider {
    fn app_identifier(&self) -> Option<String> {
        Some(self.identifier.clone())
    }
}
