//! Typed accessors over a [`Document`].
//!
//! Every `check_setting_*` getter follows the same read-or-heal contract:
//! the stored string is coerced to the requested type, and when the section
//! or key is absent, or the value does not coerce, the supplied default is
//! returned *and* written back to the document. After any read the document
//! holds a valid value at that location, so callers never validate twice.
//!
//! Keys containing `password` are secrets. They are stored through the
//! store's [`SecretCodec`] and logged as `******`. A document records the
//! scheme its secrets were written with in `General.encryption_version`.
use tracing::{debug, warn};

use crate::{
    Document,
    secret::{CLEAR_TEXT, SecretCodec, is_secret},
};

const MASK: &str = "******";

pub const ENCRYPTION_VERSION_KEY: &str = "encryption_version";

/// Document plus the codec used for its secret values.
#[derive(Debug, Clone, Default)]
pub struct SettingsStore {
    document: Document,
    codec: SecretCodec,
}

impl SettingsStore {
    pub fn new(document: Document, codec: SecretCodec) -> Self {
        Self { document, codec }
    }

    /// Opens `document` with the scheme it records, keyed by `host`.
    ///
    /// A document without `General.encryption_version` predates encryption
    /// and is healed to clear text. An unknown scheme is also read as clear
    /// text so stored secrets are kept rather than reset to defaults.
    pub fn open(document: Document, host: &SecretCodec) -> Self {
        let mut store = Self::new(document, SecretCodec::clear());
        let recorded =
            store.check_setting_int("General", ENCRYPTION_VERSION_KEY, i64::from(CLEAR_TEXT));

        match u8::try_from(recorded).ok().map(|version| host.with_version(version)) {
            Some(Ok(codec)) => store.codec = codec,
            _ => {
                warn!("Unknown encryption version {recorded}, reading secrets as clear text");
                store.set_int("General", ENCRYPTION_VERSION_KEY, i64::from(CLEAR_TEXT));
            }
        }

        store
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn codec(&self) -> &SecretCodec {
        &self.codec
    }

    pub fn check_setting_int(&mut self, section: &str, key: &str, default: i64) -> i64 {
        let value = match self.document.get(section, key).and_then(parse_int) {
            Some(value) => value,
            None => {
                self.document.set(section, key, default.to_string());
                default
            }
        };
        debug!("{key} -> {value}");
        value
    }

    pub fn check_setting_float(&mut self, section: &str, key: &str, default: f64) -> f64 {
        let parsed = self
            .document
            .get(section, key)
            .and_then(|raw| raw.trim().parse::<f64>().ok());
        let value = match parsed {
            Some(value) => value,
            None => {
                self.document.set(section, key, default.to_string());
                default
            }
        };
        debug!("{key} -> {value}");
        value
    }

    /// Reads a string setting, decrypting secrets.
    ///
    /// A stored literal `None` reads as `default` without being rewritten.
    pub fn check_setting_str(&mut self, section: &str, key: &str, default: &str) -> String {
        let codec = self.codec_for(key);
        let decoded = self
            .document
            .get(section, key)
            .map(|stored| codec.decrypt(stored));

        let value = match decoded {
            Some(Ok(value)) => value,
            Some(Err(err)) => {
                debug!("{key} could not be decoded ({err}), resetting to default");
                self.document.set(section, key, codec.encrypt(default));
                default.to_string()
            }
            None => {
                self.document.set(section, key, codec.encrypt(default));
                default.to_string()
            }
        };

        if is_secret(key) {
            debug!("{key} -> {MASK}");
        } else {
            debug!("{key} -> {value}");
        }

        if value == "None" {
            default.to_string()
        } else {
            value
        }
    }

    /// Reads a `1`/`0` flag. Any non-zero integer is `true`.
    pub fn check_setting_bool(&mut self, section: &str, key: &str, default: bool) -> bool {
        self.check_setting_int(section, key, i64::from(default)) != 0
    }

    pub fn set_int(&mut self, section: &str, key: &str, value: i64) {
        self.document.set(section, key, value.to_string());
    }

    pub fn set_float(&mut self, section: &str, key: &str, value: f64) {
        self.document.set(section, key, value.to_string());
    }

    pub fn set_str(&mut self, section: &str, key: &str, value: &str) {
        let stored = self.codec_for(key).encrypt(value);
        self.document.set(section, key, stored);
    }

    pub fn set_bool(&mut self, section: &str, key: &str, value: bool) {
        self.set_int(section, key, i64::from(value));
    }

    fn codec_for(&self, key: &str) -> SecretCodec {
        if is_secret(key) {
            self.codec.clone()
        } else {
            SecretCodec::clear()
        }
    }
}

fn parse_int(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

/// Parses `value` as an integer, falling back to `default`.
pub fn to_int(value: &str, default: i64) -> i64 {
    parse_int(value).unwrap_or(default)
}

/// Clamps `value` into `low..=high`.
pub fn minimax(value: i64, low: i64, high: i64) -> i64 {
    value.clamp(low, high)
}
