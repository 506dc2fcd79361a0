//! Compressed, rotated snapshots of the settings document.
//!
//! A backup copies the live document under its own file name into a staging
//! directory inside the backup directory, checks that the copy is a sound
//! document, deflates it into a dated `config_*.zip` archive, then removes
//! the staging directory. Old archives are pruned newest-first down to the
//! retention count.
//!
//! A document that fails validation is never archived. That case is reported
//! as [`BackupOutcome::Skipped`], not as an error.
use std::{
    fs::{self, File},
    io::{self, Read},
    path::{Path, PathBuf},
    time::SystemTime,
};

use chrono::Local;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use tempfile::TempDir;
use tracing::{error, info, warn};
use zip::{CompressionMethod, ZipArchive, ZipWriter, write::SimpleFileOptions};

use crate::{atomic::write_atomic, error::BackupError, validate::is_valid_file};

const ARCHIVE_PREFIX: &str = "config_";
const ARCHIVE_EXTENSION: &str = "zip";

/// Where backups go and how many are kept.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[serde(default)]
pub struct BackupSettings {
    /// Backup directory. Defaults to `backup/` next to the document.
    #[builder(setter(into, strip_option), default)]
    pub root: Option<PathBuf>,

    #[builder(default = "3")]
    pub max_count: usize,

    /// Keep only the newest archive, i.e. at most one per day when backups
    /// run daily.
    #[builder(default)]
    pub one_per_day: bool,
}

impl Default for BackupSettings {
    fn default() -> Self {
        Self {
            root: None,
            max_count: 3,
            one_per_day: false,
        }
    }
}

impl BackupSettings {
    pub fn retention(&self) -> usize {
        if self.one_per_day { 1 } else { self.max_count }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupOutcome {
    Archived(PathBuf),
    /// The document or its copy did not validate; nothing was archived.
    Skipped,
}

#[derive(Debug, Clone, Default)]
pub struct BackupManager {
    settings: BackupSettings,
}

impl BackupManager {
    pub fn new(settings: BackupSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &BackupSettings {
        &self.settings
    }

    pub fn target_dir(&self, document_path: &Path) -> PathBuf {
        match &self.settings.root {
            Some(root) => root.clone(),
            None => document_path
                .parent()
                .unwrap_or(Path::new("."))
                .join("backup"),
        }
    }

    /// Snapshots the document at `document_path`.
    ///
    /// `trigger` is the config version a migration is leaving; it becomes
    /// part of the archive name so each step of a run keeps its own archive.
    ///
    /// # Errors
    ///
    /// Only filesystem failures are errors: the backup directory cannot be
    /// created, the document cannot be copied, or the archive cannot be
    /// written. An invalid document yields `Ok(BackupOutcome::Skipped)`.
    pub fn backup(
        &self,
        document_path: &Path,
        trigger: Option<u32>,
    ) -> Result<BackupOutcome, BackupError> {
        info!("Backing up {}", document_path.display());

        if !is_valid_file(document_path) {
            error!("Config file seems to be invalid, not backing up");
            return Ok(BackupOutcome::Skipped);
        }

        let target_dir = self.target_dir(document_path);
        fs::create_dir_all(&target_dir).map_err(|source| BackupError::CreateDir {
            path: target_dir.clone(),
            source,
        })?;

        // Staged apart so the copy never lands on the live file
        let staging = tempfile::Builder::new()
            .prefix(".staging-")
            .tempdir_in(&target_dir)
            .map_err(|source| BackupError::CreateDir {
                path: target_dir.clone(),
                source,
            })?;
        let entry_name = entry_name(document_path);
        let intermediate = staging.path().join(&entry_name);
        fs::copy(document_path, &intermediate).map_err(|source| BackupError::Copy {
            from: document_path.to_path_buf(),
            to: intermediate.clone(),
            source,
        })?;

        if !is_valid_file(&intermediate) {
            error!("Config file copy seems to be invalid, not backing up");
            close_quietly(staging);
            return Ok(BackupOutcome::Skipped);
        }

        let archive = target_dir.join(archive_name(trigger));
        let compressed = compress(&intermediate, &entry_name, &archive);
        close_quietly(staging);
        compressed?;
        info!("Config backed up to {}", archive.display());

        if let Err(err) = self.prune(&target_dir) {
            warn!("Could not remove old config backups: {err}");
        }

        Ok(BackupOutcome::Archived(archive))
    }

    /// Deletes all but the newest `retention` archives in `dir`.
    ///
    /// Returns the removed paths.
    pub fn prune(&self, dir: &Path) -> Result<Vec<PathBuf>, BackupError> {
        let keep = self.settings.retention();
        let archives = list_archives(dir)?;

        let mut removed = Vec::new();
        for path in archives.into_iter().skip(keep) {
            fs::remove_file(&path).map_err(|source| BackupError::Prune {
                path: path.clone(),
                source,
            })?;
            info!("Removed old config backup {}", path.display());
            removed.push(path);
        }

        Ok(removed)
    }

    /// Writes the document stored in `archive` to `destination`, byte for
    /// byte. The archive entry is looked up by the destination's file name.
    pub fn restore(&self, archive: &Path, destination: &Path) -> Result<(), BackupError> {
        let file = File::open(archive).map_err(|source| BackupError::Archive {
            path: archive.to_path_buf(),
            source,
        })?;
        let mut zip = ZipArchive::new(file)?;

        let entry = entry_name(destination);
        let mut contents = Vec::new();
        match zip.by_name(&entry) {
            Ok(mut stored) => {
                stored
                    .read_to_end(&mut contents)
                    .map_err(|source| BackupError::Archive {
                        path: archive.to_path_buf(),
                        source,
                    })?;
            }
            Err(zip::result::ZipError::FileNotFound) => {
                return Err(BackupError::MissingEntry {
                    archive: archive.to_path_buf(),
                    entry,
                });
            }
            Err(err) => return Err(err.into()),
        }

        write_atomic(destination, &contents).map_err(|source| BackupError::Restore {
            path: destination.to_path_buf(),
            source,
        })?;
        info!(
            "Restored {} from {}",
            destination.display(),
            archive.display()
        );

        Ok(())
    }
}

/// Lists `config_*.zip` archives in `dir`, newest modification time first.
pub fn list_archives(dir: &Path) -> Result<Vec<PathBuf>, BackupError> {
    let prune_error = |source| BackupError::Prune {
        path: dir.to_path_buf(),
        source,
    };

    let mut archives: Vec<(SystemTime, PathBuf)> = Vec::new();
    for entry in fs::read_dir(dir).map_err(prune_error)? {
        let entry = entry.map_err(prune_error)?;
        let path = entry.path();
        if !is_archive(&path) {
            continue;
        }
        let metadata = entry.metadata().map_err(prune_error)?;
        if !metadata.is_file() {
            continue;
        }
        let modified = metadata.modified().map_err(prune_error)?;
        archives.push((modified, path));
    }

    archives.sort_by(|a, b| b.cmp(a));
    Ok(archives.into_iter().map(|(_, path)| path).collect())
}

fn is_archive(path: &Path) -> bool {
    let name_matches = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with(ARCHIVE_PREFIX));
    let extension_matches = path
        .extension()
        .is_some_and(|extension| extension == ARCHIVE_EXTENSION);
    name_matches && extension_matches
}

fn archive_name(trigger: Option<u32>) -> String {
    let now = Local::now();
    let date = now.format("%Y-%m-%d");
    let time = now.format("%H-%M");
    match trigger {
        Some(version) => format!("{ARCHIVE_PREFIX}v{version}_{date}_{time}.{ARCHIVE_EXTENSION}"),
        None => format!("{ARCHIVE_PREFIX}{date}_{time}.{ARCHIVE_EXTENSION}"),
    }
}

fn entry_name(document_path: &Path) -> String {
    document_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "config.ini".to_string())
}

fn compress(source: &Path, entry_name: &str, archive: &Path) -> Result<(), BackupError> {
    let archive_error = |source| BackupError::Archive {
        path: archive.to_path_buf(),
        source,
    };

    let mut input = File::open(source).map_err(archive_error)?;
    let output = File::create(archive).map_err(archive_error)?;

    let mut zip = ZipWriter::new(output);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    zip.start_file(entry_name.to_string(), options)?;
    io::copy(&mut input, &mut zip).map_err(archive_error)?;
    let output = zip.finish()?;
    output.sync_all().map_err(archive_error)?;

    Ok(())
}

fn close_quietly(staging: TempDir) {
    let path = staging.path().to_path_buf();
    if let Err(err) = staging.close() {
        warn!("Could not remove {}: {err}", path.display());
    }
}
