//! # Identity Newtypes
//!
//! The two keys the registry is indexed by:
//!
//! - [`Principal`] — an opaque identity handle. It is both the key of a DID
//!   record and the subject of role checks (admins, platform wallets).
//! - [`CredentialDigest`] — the fixed-width digest that stands in for a
//!   verifiable credential. The registry never sees credential content; the
//!   digest is computed off-chain and is opaque here.
//!
//! ## Validation
//!
//! Both types validate at construction. A `Principal` is compared
//! byte-for-byte (no case folding). A `CredentialDigest` accepts hex with or
//! without a `0x` prefix in either case and always renders as lowercase with
//! the prefix.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// Maximum byte length of a principal identifier.
pub const MAX_PRINCIPAL_LEN: usize = 256;

/// Byte length of a credential digest (SHA-512 width).
pub const CREDENTIAL_DIGEST_LEN: usize = 64;

// ---------------------------------------------------------------------------
// Principal
// ---------------------------------------------------------------------------

/// An opaque, unique principal identifier.
///
/// Used as a map key (DID ledger) and as an authorization subject (role
/// store). Typical values are account addresses (`0x…`) or DIDs
/// (`did:method:id`), but the registry attaches no meaning to the format.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    /// Create a principal from a string, validating format.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidPrincipal`] if the value is empty,
    /// longer than [`MAX_PRINCIPAL_LEN`] bytes, or contains whitespace or
    /// control characters.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if s.is_empty()
            || s.len() > MAX_PRINCIPAL_LEN
            || s.chars().any(|c| c.is_whitespace() || c.is_control())
        {
            return Err(ValidationError::InvalidPrincipal(s));
        }
        Ok(Self(s))
    }

    /// Access the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Principal {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl<'de> Deserialize<'de> for Principal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// CredentialDigest
// ---------------------------------------------------------------------------

/// A fixed-width, opaque digest identifying one verifiable credential.
///
/// Produced off-chain from the credential's content, issuer, owner, and
/// signature. The registry only stores and compares it.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CredentialDigest([u8; CREDENTIAL_DIGEST_LEN]);

impl CredentialDigest {
    /// Wrap raw digest bytes.
    pub fn from_bytes(bytes: [u8; CREDENTIAL_DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    /// Parse a digest from hex, with or without a `0x` prefix.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidDigest`] if the input is not exactly
    /// `2 * CREDENTIAL_DIGEST_LEN` hex characters after the optional prefix.
    pub fn from_hex(value: &str) -> Result<Self, ValidationError> {
        let hex = value
            .strip_prefix("0x")
            .or_else(|| value.strip_prefix("0X"))
            .unwrap_or(value);
        if hex.len() != CREDENTIAL_DIGEST_LEN * 2 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ValidationError::InvalidDigest(value.to_string()));
        }
        let mut bytes = [0u8; CREDENTIAL_DIGEST_LEN];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16)
                .map_err(|_| ValidationError::InvalidDigest(value.to_string()))?;
        }
        Ok(Self(bytes))
    }

    /// Access the raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; CREDENTIAL_DIGEST_LEN] {
        &self.0
    }

    /// Render as `0x` followed by lowercase hex.
    pub fn to_hex(&self) -> String {
        let mut out = String::with_capacity(2 + CREDENTIAL_DIGEST_LEN * 2);
        out.push_str("0x");
        for b in &self.0 {
            out.push_str(&format!("{b:02x}"));
        }
        out
    }
}

impl std::fmt::Display for CredentialDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::fmt::Debug for CredentialDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CredentialDigest({})", self.to_hex())
    }
}

impl std::str::FromStr for CredentialDigest {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for CredentialDigest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for CredentialDigest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
