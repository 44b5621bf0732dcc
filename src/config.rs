//! Configuration loading and validation for the secure dispatcher.
//!
//! All values are read from environment variables. Construction via
//! [`Config::from_env`] fails with a clear error if a required variable is
//! missing or invalid; the key itself is only decoded on demand and is never
//! stored decoded inside the config value.

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;

use crate::crypto::KEY_LEN;

/// Validated dispatcher configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Standard base64 encoding of the 32-byte AES-256 key. **Required.**
    ///
    /// Provisioning the key material (secure storage, provisioning server)
    /// is the caller's concern; this layer only consumes it.
    pub key_b64: String,

    /// Environment variable holding the application identifier.
    #[serde(default = "default_identifier_var")]
    pub identifier_env_var: String,

    /// Per-request transport timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_identifier_var() -> String {
    crate::identity::DEFAULT_IDENTIFIER_VAR.into()
}
fn default_request_timeout() -> u64 {
    30
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required variable is absent or cannot be
    /// parsed, or if validation fails.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        if self.key_b64.trim().is_empty() {
            anyhow::bail!("KEY_B64 is required and must not be empty");
        }
        if self.identifier_env_var.trim().is_empty() {
            anyhow::bail!("IDENTIFIER_ENV_VAR must not be empty");
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("REQUEST_TIMEOUT_SECS must be > 0");
        }
        Ok(())
    }

    /// Decode the configured key material.
    ///
    /// # Errors
    ///
    /// Returns an error if `key_b64` is not valid standard base64 or does
    /// not decode to exactly [`KEY_LEN`] bytes.
    pub fn decode_key(&self) -> Result<Vec<u8>> {
        let key = STANDARD
            .decode(self.key_b64.trim())
            .context("KEY_B64 is not valid standard base64")?;
        if key.len() != KEY_LEN {
            anyhow::bail!(
                "KEY_B64 must decode to exactly {KEY_LEN} bytes, got {}",
                key.len()
            );
        }
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config {
            key_b64: STANDARD.encode([0x42u8; KEY_LEN]),
            identifier_env_var: default_identifier_var(),
            request_timeout_secs: default_request_timeout(),
        }
    }

    #[test]
    fn defaults_are_correct() {
        assert_eq!(default_identifier_var(), "APP_BUNDLE_ID");
        assert_eq!(default_request_timeout(), 30);
    }

    #[test]
    fn valid_config_passes_validation() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_key() {
        let mut cfg = valid_config();
        cfg.key_b64 = "  ".into();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut cfg = valid_config();
        cfg.request_timeout_secs = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn decode_key_round_trips() {
        let key = valid_config().decode_key().unwrap();
        assert_eq!(key, vec![0x42u8; KEY_LEN]);
    }

    #[test]
    fn decode_key_rejects_wrong_length() {
        let mut cfg = valid_config();
        cfg.key_b64 = STANDARD.encode([0u8; 16]);
        assert!(cfg.decode_key().is_err());
    }

    #[test]
    fn decode_key_rejects_bad_base64() {
        let mut cfg = valid_config();
        cfg.key_b64 = "!!!not-base64!!!".into();
        assert!(cfg.decode_key().is_err());
    }
}
