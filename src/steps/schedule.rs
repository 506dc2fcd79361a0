//! Search and task interval steps.
use crate::{Collaborators, SettingsStore, minimax, migration_step};

pub const DEFAULT_RECENTSEARCH_INTERVAL: i64 = 40;
pub const MIN_RECENTSEARCH_INTERVAL: i64 = 10;
pub const DEFAULT_BACKLOG_PERIOD: i64 = 21;
pub const DEFAULT_BACKLOG_LIMITED_PERIOD: i64 = 7;
pub const DEFAULT_MEDIAPROCESS_INTERVAL: i64 = 10;
pub const DEFAULT_UPDATE_INTERVAL: i64 = 1;
pub const DEFAULT_WATCHEDSTATE_INTERVAL: i64 = 10;
pub const MIN_WATCHEDSTATE_INTERVAL: i64 = 10;
pub const MAX_WATCHEDSTATE_INTERVAL: i64 = 60;
pub const DEFAULT_SUBTITLES_FINDER_INTERVAL: i64 = 1;

#[migration_step(version = 8, name = "Disable searches on start")]
fn disable_startup_search(settings: &mut SettingsStore, _: &mut Collaborators<'_>) {
    settings.set_bool("General", "recentsearch_startup", false);
}

#[migration_step(version = 10, name = "Reset backlog interval to default")]
fn reset_backlog_interval(settings: &mut SettingsStore, _: &mut Collaborators<'_>) {
    settings.set_int("General", "backlog_frequency", DEFAULT_BACKLOG_PERIOD);
}

/// `(section, old key, new key, default)` of plain interval renames.
const RENAMES: [(&str, &str, &str, i64); 6] = [
    (
        "General",
        "autopostprocesser_frequency",
        "mediaprocess_interval",
        DEFAULT_MEDIAPROCESS_INTERVAL,
    ),
    ("General", "backlog_frequency", "backlog_period", DEFAULT_BACKLOG_PERIOD),
    ("General", "backlog_days", "backlog_limited_period", DEFAULT_BACKLOG_LIMITED_PERIOD),
    ("General", "recentsearch_frequency", "recentsearch_interval", DEFAULT_RECENTSEARCH_INTERVAL),
    ("General", "update_frequency", "update_interval", DEFAULT_UPDATE_INTERVAL),
    (
        "Subtitles",
        "subtitles_finder_frequency",
        "subtitles_finder_interval",
        DEFAULT_SUBTITLES_FINDER_INTERVAL,
    ),
];

/// `(section, old key, new key)` of watched state intervals, which are also
/// clamped into range.
const WATCHED_RENAMES: [(&str, &str, &str); 2] = [
    ("Emby", "emby_watchedstate_frequency", "emby_watched_interval"),
    ("Plex", "plex_watchedstate_frequency", "plex_watched_interval"),
];

#[migration_step(version = 21, name = "Rename vars misusing frequency")]
fn rename_frequencies(settings: &mut SettingsStore, _: &mut Collaborators<'_>) {
    for (section, old_key, new_key, default) in RENAMES {
        let value = settings.check_setting_int(section, old_key, default);
        settings.set_int(section, new_key, value);
        settings.document_mut().remove(section, old_key);
    }

    for (section, old_key, new_key) in WATCHED_RENAMES {
        let value = settings.check_setting_int(section, old_key, DEFAULT_WATCHEDSTATE_INTERVAL);
        let value = minimax(value, MIN_WATCHEDSTATE_INTERVAL, MAX_WATCHEDSTATE_INTERVAL);
        settings.set_int(section, new_key, value);
        settings.document_mut().remove(section, old_key);
    }
}
