//! AES-256-GCM encryption of the application identifier.
//!
//! This module is intentionally free of HTTP dependencies. It provides the
//! one-way string-to-token operation used by the dispatcher.
//!
//! # Token format
//!
//! ```text
//! base64_standard_padded(nonce ∥ ciphertext ∥ tag)
//! ```
//!
//! 12-byte nonce, 16-byte tag, concatenated with the ciphertext and encoded
//! as a single standard-alphabet base64 string. The token is opaque to the
//! rest of the crate: it is placed into a header value and never parsed back.

pub mod cipher;

pub use cipher::{StringEncryptor, KEY_LEN};
