use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("I/O on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML Deserialization: {0}")]
    TomlDeserialization(#[from] toml::de::Error),

    /// The file holds a value outside of any `[Section]`.
    ///
    /// Every setting belongs to a section, so a bare top-level key means the
    /// file was not written by this crate and cannot be round-tripped safely.
    #[error("key `{0}` is not inside a section")]
    OrphanKey(String),
}

#[derive(Debug, Error)]
pub enum BackupError {
    #[error("cannot create backup directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write backup archive {path}: {source}")]
    Archive {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("zip: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("cannot prune backups in {path}: {source}")]
    Prune {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("archive {archive} has no entry named `{entry}`")]
    MissingEntry { archive: PathBuf, entry: String },

    #[error("cannot restore to {path}: {source}")]
    Restore {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("migration step versions start at 1, found a step for version 0")]
    ZeroVersion,

    #[error("two migration steps are registered for version {0}")]
    Duplicate(u32),

    #[error("no migration step is registered for version {0}")]
    Gap(u32),
}

/// Conditions that stop a migration run and, with it, application startup.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error(
        "Your config version ({found}) has been incremented past what this version supports \
         ({supported}). If you have used a newer release, restore a config backup made by this \
         release or upgrade again; the config file was left untouched."
    )]
    VersionTooNew { found: u32, supported: u32 },

    #[error(
        "Config backup failed before upgrading to version {version}, aborting the upgrade. \
         Check that the backup folder is writable: {source}"
    )]
    BackupFailed {
        version: u32,
        #[source]
        source: BackupError,
    },

    #[error(
        "Could not save the config file after upgrading to version {version}. The file on disk \
         is still at the previous version: {source}"
    )]
    Persist {
        version: u32,
        #[source]
        source: DocumentError,
    },

    #[error("The built-in migration table is incomplete: {0}")]
    Registry(#[from] RegistryError),
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Could not read the config file: {0}")]
    Load(#[from] DocumentError),

    #[error(transparent)]
    Migration(#[from] MigrationError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SecretError {
    #[error("unsupported encryption version {0}")]
    UnsupportedVersion(u8),

    #[error("encryption key must not be empty")]
    EmptyKey,

    #[error("stored secret is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("stored secret does not decode to UTF-8")]
    Utf8,
}
