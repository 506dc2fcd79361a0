//! The migration state machine.
//!
//! The recorded `General.config_version` is the state. While it is behind the
//! expected version the engine repeats one transition:
//!
//! 1. back up the file on disk,
//! 2. run the step for `current + 1`,
//! 3. record `current + 1` in the document and persist it atomically,
//! 4. advance.
//!
//! The step's changes and the new version number reach disk in a single
//! atomic write, so an interrupted run leaves the file exactly one or more
//! whole steps behind and the next start resumes from there.
use std::path::PathBuf;

use tracing::{error, info, warn};

use crate::{
    BackupManager, BackupOutcome, Collaborators, DocumentFile, SettingsStore, StepRegistry,
    error::{MigrationError, RegistryError},
};

pub const VERSION_SECTION: &str = "General";
pub const VERSION_KEY: &str = "config_version";

/// What a completed run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub from: u32,
    pub to: u32,
    /// Archives written, one per transition that could be backed up.
    pub backups: Vec<PathBuf>,
    /// Versions that were reached without a backup because the file on disk
    /// did not validate.
    pub unbacked: Vec<u32>,
}

impl MigrationReport {
    pub fn steps_run(&self) -> u32 {
        self.to - self.from
    }
}

pub struct Migrator<'r> {
    registry: &'r StepRegistry,
    backups: BackupManager,
    expected: u32,
}

impl<'r> Migrator<'r> {
    /// A migrator that brings documents up to the registry's latest version.
    pub fn new(registry: &'r StepRegistry, backups: BackupManager) -> Self {
        Self {
            registry,
            expected: registry.latest(),
            backups,
        }
    }

    /// Stops at `version` instead of the latest registered step.
    pub fn targeting(mut self, version: u32) -> Result<Self, MigrationError> {
        if version > self.registry.latest() {
            return Err(RegistryError::Gap(self.registry.latest() + 1).into());
        }
        self.expected = version;
        Ok(self)
    }

    pub fn expected_version(&self) -> u32 {
        self.expected
    }

    /// Reads the recorded version, healing a missing or malformed value to
    /// the expected version rather than to 0 so that a lost version tag never
    /// replays every step.
    pub fn recorded_version(&self, settings: &mut SettingsStore) -> u32 {
        let expected = i64::from(self.expected);
        let recorded = settings.check_setting_int(VERSION_SECTION, VERSION_KEY, expected);
        if recorded < 0 {
            warn!("Config version {recorded} is negative, treating it as {expected}");
            settings.set_int(VERSION_SECTION, VERSION_KEY, expected);
            return self.expected;
        }
        u32::try_from(recorded).unwrap_or(u32::MAX)
    }

    /// Walks `settings` up to the expected version, persisting to `file`
    /// after every step.
    ///
    /// # Errors
    ///
    /// - [`MigrationError::VersionTooNew`] when the document is ahead of this
    ///   release; the document is not modified
    /// - [`MigrationError::BackupFailed`] when a snapshot could not be written
    /// - [`MigrationError::Persist`] when the migrated document could not be
    ///   saved
    pub fn migrate(
        &self,
        file: &DocumentFile,
        settings: &mut SettingsStore,
        collaborators: &mut Collaborators<'_>,
    ) -> Result<MigrationReport, MigrationError> {
        let found = self.recorded_version(settings);
        if found > self.expected {
            error!(
                "Config version {found} is newer than the supported version {}",
                self.expected
            );
            return Err(MigrationError::VersionTooNew {
                found,
                supported: self.expected,
            });
        }

        let mut report = MigrationReport {
            from: found,
            to: found,
            ..MigrationReport::default()
        };

        let mut current = found;
        while current < self.expected {
            let next = current + 1;
            let step = self.registry.get(next).ok_or(RegistryError::Gap(next))?;

            info!("Backing up config before upgrade");
            match self.backups.backup(file.path(), Some(current)) {
                Ok(BackupOutcome::Archived(archive)) => {
                    info!("Proceeding with upgrade");
                    report.backups.push(archive);
                }
                Ok(BackupOutcome::Skipped) => {
                    warn!("Proceeding with upgrade to version {next} without a backup");
                    report.unbacked.push(next);
                }
                Err(source) => {
                    error!("Config backup failed, abort upgrading config: {source}");
                    return Err(MigrationError::BackupFailed {
                        version: next,
                        source,
                    });
                }
            }

            info!("Migrating config up to version {next}: {}", step.name());
            step.apply(settings, collaborators);
            settings.set_int(VERSION_SECTION, VERSION_KEY, i64::from(next));

            info!("Saving config file to disk");
            file.save(settings.document())
                .map_err(|source| MigrationError::Persist {
                    version: next,
                    source,
                })?;

            current = next;
            report.to = current;
        }

        Ok(report)
    }
}
