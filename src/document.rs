//! The raw settings document.
//!
//! A [`Document`] is an ordered mapping of section name to an ordered
//! mapping of key to string value. Every value is kept as a string no matter
//! what it logically represents; typing happens in
//! [`SettingsStore`](crate::SettingsStore). Insertion order is preserved so a
//! file written by this crate reads the same way a person last left it.
//!
//! # File format
//!
//! The on-disk form is TOML restricted to one level of tables:
//!
//! ```toml
//! [General]
//! config_version = "22"
//! naming_pattern = "%SN - %Sx%0E - %EN"
//!
//! [GUI]
//! episode_view_layout = "banner"
//! ```
//!
//! Loading is lenient about scalar types so that a hand-edited
//! `config_version = 22` is read as the string `"22"`. Writing always quotes.
use std::{fmt, str::FromStr};

use indexmap::IndexMap;
use toml::Value;
use tracing::warn;

use crate::error::DocumentError;

/// Keys and values of one `[Section]`.
pub type Section = IndexMap<String, String>;

/// Ordered section/key/value settings document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    sections: IndexMap<String, Section>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the TOML text form of a document.
    ///
    /// # Errors
    ///
    /// - [`DocumentError::TomlDeserialization`] for text that is not TOML
    /// - [`DocumentError::OrphanKey`] for a top-level key outside any section
    pub fn parse(contents: &str) -> Result<Self, DocumentError> {
        let table: toml::Table = toml::from_str(contents)?;
        let mut document = Self::new();

        for (section_name, value) in table {
            let Value::Table(entries) = value else {
                return Err(DocumentError::OrphanKey(section_name));
            };

            document.ensure_section(&section_name);
            for (key, value) in entries {
                match scalar_to_string(&value) {
                    Some(text) => document.set(&section_name, &key, text),
                    None => warn!("Skipping nested table [{section_name}] {key}"),
                }
            }
        }

        Ok(document)
    }

    /// Renders the document back to its TOML text form.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (index, (name, section)) in self.sections.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            out.push('[');
            out.push_str(&render_key(name));
            out.push_str("]\n");
            for (key, value) in section {
                out.push_str(&render_key(key));
                out.push_str(" = ");
                out.push_str(&Value::String(value.clone()).to_string());
                out.push('\n');
            }
        }
        out
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    /// Creates `name` as an empty section unless it already exists.
    ///
    /// Returns `true` when the section had to be created.
    pub fn ensure_section(&mut self, name: &str) -> bool {
        if self.sections.contains_key(name) {
            return false;
        }
        self.sections.insert(name.to_string(), Section::new());
        true
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|entries| entries.get(key))
            .map(String::as_str)
    }

    /// Writes `value`, creating the section first when it is missing.
    pub fn set(&mut self, section: &str, key: &str, value: impl Into<String>) {
        self.ensure_section(section);
        if let Some(entries) = self.sections.get_mut(section) {
            entries.insert(key.to_string(), value.into());
        }
    }

    pub fn remove(&mut self, section: &str, key: &str) -> Option<String> {
        self.sections
            .get_mut(section)
            .and_then(|entries| entries.shift_remove(key))
    }

    pub fn remove_section(&mut self, name: &str) -> Option<Section> {
        self.sections.shift_remove(name)
    }

    /// Moves the value at `from` to `to` within one section.
    ///
    /// Returns `false` when there was nothing to move. An existing value at
    /// `to` is overwritten.
    pub fn rename_key(&mut self, section: &str, from: &str, to: &str) -> bool {
        match self.remove(section, from) {
            Some(value) => {
                self.set(section, to, value);
                true
            }
            None => false,
        }
    }

    pub fn sections(&self) -> impl Iterator<Item = (&str, &Section)> {
        self.sections
            .iter()
            .map(|(name, entries)| (name.as_str(), entries))
    }
}

impl FromStr for Document {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Integer(i) => Some(i.to_string()),
        Value::Float(f) => Some(f.to_string()),
        Value::Boolean(b) => Some(if *b { "1" } else { "0" }.to_string()),
        Value::Datetime(d) => Some(d.to_string()),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(scalar_to_string)
                .collect::<Vec<_>>()
                .join(", "),
        ),
        Value::Table(_) => None,
    }
}

fn render_key(key: &str) -> String {
    let bare = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if bare {
        key.to_string()
    } else {
        Value::String(key.to_string()).to_string()
    }
}
