use tracing::info;

use crate::{
    Collaborators, Document, DocumentFile, MigratorOptions, SettingsStore, StepRegistry,
    engine::Migrator,
    error::{MigrationError, StartupError},
    settings::ENCRYPTION_VERSION_KEY,
    validate::REQUIRED_SECTIONS,
};

/// Loads the settings document and brings it up to date.
///
/// A missing file starts a fresh document at the current version and writes
/// it out. Any error returned here is fatal for the host application; its
/// `Display` text is meant to be shown to the user as is.
pub fn load_and_migrate(
    options: &MigratorOptions,
    collaborators: &mut Collaborators<'_>,
) -> Result<SettingsStore, StartupError> {
    let registry = StepRegistry::builtin().map_err(MigrationError::from)?;
    let file = DocumentFile::new(&options.config_path);

    let fresh = !file.exists();
    let document = if fresh {
        info!(
            "No config found at {}, starting with defaults",
            file.path().display()
        );
        let mut document = Document::new();
        document.set(
            "General",
            ENCRYPTION_VERSION_KEY,
            options.secrets.version().to_string(),
        );
        document
    } else {
        file.load()?
    };

    let mut settings = SettingsStore::open(document, &options.secrets);
    for section in REQUIRED_SECTIONS {
        settings.document_mut().ensure_section(section);
    }

    if collaborators.cache_dir.is_none() {
        collaborators.cache_dir = options.cache_dir.clone();
    }

    let migrator = Migrator::new(&registry, options.backup_manager());
    let report = migrator.migrate(&file, &mut settings, collaborators)?;
    if report.steps_run() > 0 {
        info!(
            "Config upgraded from version {} to {}",
            report.from, report.to
        );
    }

    if fresh {
        file.save(settings.document())?;
    }

    Ok(settings)
}
