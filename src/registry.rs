use std::{collections::BTreeMap, fmt};

use crate::{Collaborators, SettingsStore, error::RegistryError};

/// Transformation that takes a document from `version - 1` to `version`.
pub type StepFn = fn(&mut SettingsStore, &mut Collaborators<'_>);

/// A registered migration step.
#[derive(Clone, Copy)]
pub struct MigrationStep {
    version: u32,
    name: &'static str,
    run: StepFn,
}

impl MigrationStep {
    pub const fn new(version: u32, name: &'static str, run: StepFn) -> Self {
        Self { version, name, run }
    }

    /// The version the document is at once this step has run.
    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn apply(&self, settings: &mut SettingsStore, collaborators: &mut Collaborators<'_>) {
        (self.run)(settings, collaborators)
    }
}

impl fmt::Debug for MigrationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MigrationStep")
            .field("version", &self.version)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

inventory::collect!(MigrationStep);

/// Ordered, gap-free table of migration steps starting at version 1.
#[derive(Debug, Clone)]
pub struct StepRegistry {
    steps: BTreeMap<u32, MigrationStep>,
}

impl StepRegistry {
    /// Collects every step registered with
    /// [`#[migration_step]`](crate::migration_step).
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::from_steps(inventory::iter::<MigrationStep>.into_iter().copied())
    }

    /// Builds a registry from explicit steps.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::ZeroVersion`] when a step claims version 0
    /// - [`RegistryError::Duplicate`] when two steps share a version
    /// - [`RegistryError::Gap`] naming the first missing version
    pub fn from_steps(
        steps: impl IntoIterator<Item = MigrationStep>,
    ) -> Result<Self, RegistryError> {
        let mut table = BTreeMap::new();
        for step in steps {
            if step.version == 0 {
                return Err(RegistryError::ZeroVersion);
            }
            if table.insert(step.version, step).is_some() {
                return Err(RegistryError::Duplicate(step.version));
            }
        }

        for (expected, version) in (1..).zip(table.keys()) {
            if *version != expected {
                return Err(RegistryError::Gap(expected));
            }
        }

        Ok(Self { steps: table })
    }

    /// Highest registered version, 0 for an empty registry.
    pub fn latest(&self) -> u32 {
        self.steps.keys().next_back().copied().unwrap_or(0)
    }

    pub fn get(&self, version: u32) -> Option<&MigrationStep> {
        self.steps.get(&version)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MigrationStep> {
        self.steps.values()
    }
}
