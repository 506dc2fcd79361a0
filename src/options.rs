use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::{BackupManager, BackupSettings, SecretCodec};

/// Host-supplied settings for a migration run.
///
/// Build one in code:
///
/// ```rust
/// use config_migrator::MigratorOptionsBuilder;
///
/// let options = MigratorOptionsBuilder::default()
///     .config_path("/var/lib/app/config.ini")
///     .build()
///     .unwrap();
/// assert_eq!(options.backup.max_count, 3);
/// ```
///
/// or read it from TOML, where everything but `config_path` is optional:
///
/// ```toml
/// config_path = "/var/lib/app/config.ini"
/// cache_dir = "/var/cache/app"
///
/// [backup]
/// root = "/var/backups/app"
/// max_count = 5
///
/// [secrets]
/// version = 1
/// key = "machine-specific"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
pub struct MigratorOptions {
    #[builder(setter(into))]
    pub config_path: PathBuf,

    #[builder(default)]
    #[serde(default)]
    pub backup: BackupSettings,

    /// Key for secret settings. Its version only applies to a fresh document;
    /// an existing one keeps the scheme in `General.encryption_version`.
    #[builder(default)]
    #[serde(default)]
    pub secrets: SecretCodec,

    #[builder(setter(into, strip_option), default)]
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
}

impl MigratorOptions {
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn backup_manager(&self) -> BackupManager {
        BackupManager::new(self.backup.clone())
    }
}
