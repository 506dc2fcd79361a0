//! Anonymous redirect service steps.
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::info;

use crate::{Collaborators, SettingsStore, migration_step};

pub const ANON_REDIRECT_SERVICE: &str = "https://anonymz.com/?";

static DEPRECATED_SERVICE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://(?:nullrefer.com|dereferer.org)").expect("valid regex"));

/// Points `General.anon_redirect` away from services that stopped working.
pub fn deprecate_anon_service(settings: &mut SettingsStore) {
    let current = settings.check_setting_str("General", "anon_redirect", "");
    if DEPRECATED_SERVICE.is_match(&current) {
        info!("Replacing deprecated anonymous redirect {current} with {ANON_REDIRECT_SERVICE}");
        settings.set_str("General", "anon_redirect", ANON_REDIRECT_SERVICE);
    }
}

#[migration_step(version = 13, name = "Change default dereferrer url to blank")]
fn dereferrer_blank(settings: &mut SettingsStore, _: &mut Collaborators<'_>) {
    deprecate_anon_service(settings);
}

#[migration_step(
    version = 19,
    name = "Change (mis)use of Anonymous redirect dereferer.org service to nullrefer.com"
)]
fn dereferer_to_nullrefer(settings: &mut SettingsStore, _: &mut Collaborators<'_>) {
    deprecate_anon_service(settings);
}

#[migration_step(version = 22, name = "Change Anonymous redirect")]
fn change_anon_redirect(settings: &mut SettingsStore, _: &mut Collaborators<'_>) {
    deprecate_anon_service(settings);
}
