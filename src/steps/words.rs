//! Ignore word list steps.
//!
//! The list is stored as one comma separated string, prefixed with `regex:`
//! when its entries are regular expressions. Inside this module the prefix
//! only exists as [`WordList::is_regex`].
use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{Collaborators, SettingsStore, migration_step};

pub const REGEX_PREFIX: &str = "regex:";

static PORTUGUESE_SPANISH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(portuguese)\|spanish(\|swedish)").expect("valid regex"));

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordList {
    pub words: Vec<String>,
    pub is_regex: bool,
}

impl WordList {
    pub fn parse(stored: &str) -> Self {
        let stored = stored.trim();
        let (body, is_regex) = match stored.strip_prefix(REGEX_PREFIX) {
            Some(body) => (body, true),
            None => (stored, false),
        };
        let words = body
            .split(',')
            .map(str::trim)
            .filter(|word| !word.is_empty())
            .map(str::to_string)
            .collect();
        Self { words, is_regex }
    }

    pub fn render(&self) -> String {
        let prefix = if self.is_regex { REGEX_PREFIX } else { "" };
        format!("{prefix}{}", self.words.join(", "))
    }

    /// Merges `additions` into the list and drops `removals`.
    ///
    /// Words compare case-insensitively and the first spelling seen wins. An
    /// entry written as `regex:...` switches the whole list to regex mode.
    /// Combined `portuguese|spanish|swedish` entries lose their `spanish`
    /// part, since Spanish is covered by a word of its own.
    pub fn merge(&self, additions: &[&str], removals: &[&str]) -> Self {
        let removals: HashSet<String> = removals.iter().map(|word| word.to_lowercase()).collect();
        let mut seen = HashSet::new();
        let mut merged = Self {
            words: Vec::new(),
            is_regex: self.is_regex,
        };

        let candidates = self
            .words
            .iter()
            .map(String::as_str)
            .chain(additions.iter().copied());

        for candidate in candidates {
            let mut word = candidate.trim();
            if let Some(rest) = word.strip_prefix(REGEX_PREFIX) {
                word = rest.trim();
                merged.is_regex = true;
            }
            if word.is_empty() {
                continue;
            }

            let check = word.to_lowercase();
            if removals.contains(&check) || !seen.insert(check.clone()) {
                continue;
            }

            let word = if check.contains("spanish") {
                PORTUGUESE_SPANISH.replace_all(word, "${1}${2}").into_owned()
            } else {
                word.to_string()
            };
            merged.words.push(word);
        }

        merged
    }
}

/// Merges words into `General.ignore_words`.
pub fn add_ignore_words(settings: &mut SettingsStore, additions: &[&str], removals: &[&str]) {
    let current = WordList::parse(&settings.check_setting_str("General", "ignore_words", ""));
    let merged = current.merge(additions, removals);
    settings.set_str("General", "ignore_words", &merged.render());
}

#[migration_step(
    version = 12,
    name = "Add \"hevc\" and some non-english languages to ignore words if not found"
)]
fn add_codec_and_language_words(settings: &mut SettingsStore, _: &mut Collaborators<'_>) {
    add_ignore_words(
        settings,
        &[
            "hevc", "reenc", "x265", "danish", "deutsch", "flemish", "italian", "nordic",
            "norwegian", "portuguese", "spanish", "turkish",
        ],
        &[],
    );
}

#[migration_step(version = 17, name = "Add \"vp9\", \"av1\" to ignore words if not found")]
fn add_vp9_av1(settings: &mut SettingsStore, _: &mut Collaborators<'_>) {
    add_ignore_words(settings, &["vp9", "av1"], &[]);
}

#[migration_step(version = 18, name = "Update \"Spanish\" ignore word")]
fn update_spanish(settings: &mut SettingsStore, _: &mut Collaborators<'_>) {
    add_ignore_words(
        settings,
        &[r"regex:^(?=.*?\bspanish\b)((?!spanish.?princess).)*$"],
        &["spanish"],
    );
}
