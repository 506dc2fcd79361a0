//! Services outside the settings document that some steps call into.
//!
//! Steps never depend on concrete provider, account or library types; they
//! see these traits through [`Collaborators`]. A host without one of the
//! services can pass [`Detached`], which finds nothing and records nothing.
use std::{fmt, path::PathBuf};

use tracing::debug;

/// A value written to a provider attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Bool(value) => write!(f, "{value}"),
            AttrValue::Int(value) => write!(f, "{value}"),
            AttrValue::Str(value) => f.write_str(value),
        }
    }
}

/// One configured download provider.
pub trait ProviderHandle {
    /// Stable lower-case id, also the stem of the provider's config section.
    fn id(&self) -> &str;

    /// Display name.
    fn name(&self) -> &str;

    fn has_attr(&self, attr: &str) -> bool;

    fn get_attr(&self, attr: &str) -> Option<AttrValue>;

    /// Sets `attr`. Returns `false` when the provider has no such attribute.
    fn set_attr(&mut self, attr: &str, value: AttrValue) -> bool;
}

pub trait ProviderRegistry {
    /// Ids of every known provider, in display order.
    fn ids(&self) -> Vec<String>;

    /// Finds a provider by exact id, or by a name containing `name_or_id`.
    fn lookup(&mut self, name_or_id: &str) -> Option<&mut dyn ProviderHandle>;
}

pub trait AccountLinker {
    fn add_account(&mut self, token: &str, refresh_token: &str, profile_id: Option<&str>);
}

/// The show library, consulted when legacy naming settings are converted.
pub trait ShowLibrary {
    /// `true` when at least one show keeps its episodes in season folders.
    fn uses_season_folders(&self) -> bool;

    /// Turns off folder flattening for every show.
    fn clear_flatten_folders(&mut self);
}

/// Everything a step may reach outside the document.
pub struct Collaborators<'a> {
    pub providers: &'a mut dyn ProviderRegistry,
    pub accounts: &'a mut dyn AccountLinker,
    pub library: &'a mut dyn ShowLibrary,
    /// Image cache root; steps that tidy the cache skip when unset.
    pub cache_dir: Option<PathBuf>,
}

/// Stand-in for a service the host does not provide.
#[derive(Debug, Default, Clone, Copy)]
pub struct Detached;

impl ProviderRegistry for Detached {
    fn ids(&self) -> Vec<String> {
        Vec::new()
    }

    fn lookup(&mut self, name_or_id: &str) -> Option<&mut dyn ProviderHandle> {
        debug!("No provider registry attached, {name_or_id} not found");
        None
    }
}

impl AccountLinker for Detached {
    fn add_account(&mut self, _token: &str, _refresh_token: &str, _profile_id: Option<&str>) {
        debug!("No account client attached, legacy account not linked");
    }
}

impl ShowLibrary for Detached {
    fn uses_season_folders(&self) -> bool {
        false
    }

    fn clear_flatten_folders(&mut self) {}
}
