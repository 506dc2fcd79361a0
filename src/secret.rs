//! Versioned at-rest encoding for secret settings.
//!
//! | version | stored form                  |
//! |---------|------------------------------|
//! | 0       | clear text (legacy)          |
//! | 1       | `base64(value XOR key)`      |
//!
//! Keeping version 0 readable lets an old clear-text file be re-encoded the
//! first time each secret is written back.
use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

use crate::error::SecretError;

pub const CLEAR_TEXT: u8 = 0;
pub const XOR_BASE64: u8 = 1;

/// Key used when the host application does not supply its own.
pub const DEFAULT_KEY: &str = "config-migrator";

/// Returns `true` for keys whose values must never be logged or stored in clear.
pub fn is_secret(key: &str) -> bool {
    key.contains("password")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCodec")]
pub struct SecretCodec {
    version: u8,
    key: String,
}

#[derive(Deserialize)]
struct RawCodec {
    #[serde(default = "default_version")]
    version: u8,
    #[serde(default = "default_key")]
    key: String,
}

fn default_version() -> u8 {
    XOR_BASE64
}

fn default_key() -> String {
    DEFAULT_KEY.to_string()
}

impl TryFrom<RawCodec> for SecretCodec {
    type Error = SecretError;

    fn try_from(raw: RawCodec) -> Result<Self, Self::Error> {
        Self::new(raw.version, raw.key)
    }
}

impl Default for SecretCodec {
    fn default() -> Self {
        Self {
            version: XOR_BASE64,
            key: DEFAULT_KEY.to_string(),
        }
    }
}

impl SecretCodec {
    pub fn new(version: u8, key: impl Into<String>) -> Result<Self, SecretError> {
        let key = key.into();
        match version {
            CLEAR_TEXT | XOR_BASE64 => {}
            other => return Err(SecretError::UnsupportedVersion(other)),
        }
        if key.is_empty() {
            return Err(SecretError::EmptyKey);
        }
        Ok(Self { version, key })
    }

    /// A codec that stores secrets in clear text.
    pub fn clear() -> Self {
        Self {
            version: CLEAR_TEXT,
            key: DEFAULT_KEY.to_string(),
        }
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    /// The same key under another scheme version.
    pub fn with_version(&self, version: u8) -> Result<Self, SecretError> {
        Self::new(version, self.key.clone())
    }

    pub fn encrypt(&self, value: &str) -> String {
        match self.version {
            XOR_BASE64 => STANDARD.encode(self.xor(value.as_bytes())),
            _ => value.to_string(),
        }
    }

    pub fn decrypt(&self, stored: &str) -> Result<String, SecretError> {
        match self.version {
            XOR_BASE64 => {
                let bytes = STANDARD.decode(stored)?;
                String::from_utf8(self.xor(&bytes)).map_err(|_| SecretError::Utf8)
            }
            _ => Ok(stored.to_string()),
        }
    }

    fn xor(&self, data: &[u8]) -> Vec<u8> {
        data.iter()
            .zip(self.key.as_bytes().iter().cycle())
            .map(|(byte, key)| byte ^ key)
            .collect()
    }
}
