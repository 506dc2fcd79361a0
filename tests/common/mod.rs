//! Fixtures shared by the integration tests.
#![allow(dead_code, unused_macros)]

use std::collections::HashMap;

use config_migrator::{
    AccountLinker, AttrValue, Document, ProviderHandle, ProviderRegistry, SecretCodec,
    SettingsStore, ShowLibrary, StepRegistry,
};
use tempfile::TempDir;

/// Helper to create a temporary directory for tests
pub fn temp_config_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

pub fn builtin() -> StepRegistry {
    StepRegistry::builtin().expect("Built-in steps should form a complete table")
}

pub fn store(contents: &str) -> SettingsStore {
    let document = Document::parse(contents).expect("Failed to parse fixture document");
    SettingsStore::new(document, SecretCodec::default())
}

pub struct FakeProvider {
    pub id: String,
    pub name: String,
    pub attrs: HashMap<String, AttrValue>,
}

impl FakeProvider {
    pub fn new(id: &str, name: &str, attrs: &[(&str, AttrValue)]) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            attrs: attrs
                .iter()
                .map(|(attr, value)| (attr.to_string(), value.clone()))
                .collect(),
        }
    }
}

impl ProviderHandle for FakeProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn has_attr(&self, attr: &str) -> bool {
        self.attrs.contains_key(attr)
    }

    fn get_attr(&self, attr: &str) -> Option<AttrValue> {
        self.attrs.get(attr).cloned()
    }

    fn set_attr(&mut self, attr: &str, value: AttrValue) -> bool {
        self.attrs.insert(attr.to_string(), value);
        true
    }
}

#[derive(Default)]
pub struct FakeProviders {
    pub providers: Vec<FakeProvider>,
}

impl FakeProviders {
    pub fn with(providers: Vec<FakeProvider>) -> Self {
        Self { providers }
    }

    pub fn attr(&self, id: &str, attr: &str) -> Option<AttrValue> {
        self.providers
            .iter()
            .find(|provider| provider.id == id)
            .and_then(|provider| provider.attrs.get(attr).cloned())
    }
}

impl ProviderRegistry for FakeProviders {
    fn ids(&self) -> Vec<String> {
        self.providers.iter().map(|provider| provider.id.clone()).collect()
    }

    fn lookup(&mut self, name_or_id: &str) -> Option<&mut dyn ProviderHandle> {
        self.providers
            .iter_mut()
            .find(|provider| provider.id == name_or_id || provider.name.contains(name_or_id))
            .map(|provider| provider as &mut dyn ProviderHandle)
    }
}

#[derive(Default)]
pub struct FakeAccounts {
    pub linked: Vec<(String, String, Option<String>)>,
}

impl AccountLinker for FakeAccounts {
    fn add_account(&mut self, token: &str, refresh_token: &str, profile_id: Option<&str>) {
        self.linked.push((
            token.to_string(),
            refresh_token.to_string(),
            profile_id.map(str::to_string),
        ));
    }
}

#[derive(Default)]
pub struct FakeLibrary {
    pub season_folders: bool,
    pub flatten_cleared: bool,
}

impl ShowLibrary for FakeLibrary {
    fn uses_season_folders(&self) -> bool {
        self.season_folders
    }

    fn clear_flatten_folders(&mut self) {
        self.flatten_cleared = true;
    }
}

/// Owns one of each fake so tests can build [`Collaborators`] and inspect
/// the fakes afterwards.
///
/// [`Collaborators`]: config_migrator::Collaborators
#[derive(Default)]
pub struct Fakes {
    pub providers: FakeProviders,
    pub accounts: FakeAccounts,
    pub library: FakeLibrary,
}

macro_rules! collaborators {
    ($fakes:expr) => {
        config_migrator::Collaborators {
            providers: &mut $fakes.providers,
            accounts: &mut $fakes.accounts,
            library: &mut $fakes.library,
            cache_dir: None,
        }
    };
}
