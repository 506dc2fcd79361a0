//! Versioned migration of a persistent section/key/value settings document.
//!
//! At startup the host loads its settings file, and [`Migrator`] walks it
//! from the recorded `General.config_version` up to the version this release
//! expects, one registered step at a time, backing the file up before and
//! saving it after every step. [`startup::load_and_migrate`] wires the whole
//! sequence together.
//!
//! ```rust,no_run
//! use config_migrator::{Collaborators, Detached, MigratorOptionsBuilder, startup};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let options = MigratorOptionsBuilder::default()
//!     .config_path("/var/lib/app/config.ini")
//!     .build()?;
//!
//! let (mut providers, mut accounts, mut library) = (Detached, Detached, Detached);
//! let mut collaborators = Collaborators {
//!     providers: &mut providers,
//!     accounts: &mut accounts,
//!     library: &mut library,
//!     cache_dir: None,
//! };
//!
//! let mut settings = startup::load_and_migrate(&options, &mut collaborators)?;
//! let port = settings.check_setting_int("General", "web_port", 8081);
//! # Ok(())
//! # }
//! ```
extern crate self as config_migrator;

pub mod atomic;
pub mod backup;
pub mod collaborators;
pub mod document;
pub mod engine;
pub mod error;
pub mod options;
pub mod registry;
pub mod secret;
pub mod settings;
pub mod startup;
pub mod steps;
pub mod validate;

pub use atomic::DocumentFile;
pub use backup::{BackupManager, BackupOutcome, BackupSettings, BackupSettingsBuilder};
pub use collaborators::{
    AccountLinker, AttrValue, Collaborators, Detached, ProviderHandle, ProviderRegistry,
    ShowLibrary,
};
pub use document::{Document, Section};
pub use engine::{MigrationReport, Migrator};
pub use options::{MigratorOptions, MigratorOptionsBuilder};
pub use registry::{MigrationStep, StepFn, StepRegistry};
pub use secret::SecretCodec;
pub use settings::{SettingsStore, minimax, to_int};

// re-export macro
pub use config_migrator_macros::migration_step;

#[doc(hidden)]
pub use inventory;
