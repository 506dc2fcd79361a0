//! Web interface layout steps.
use crate::{Collaborators, SettingsStore, migration_step};

#[migration_step(version = 7, name = "Rename coming episodes to episode view")]
fn rename_coming_episodes(settings: &mut SettingsStore, _: &mut Collaborators<'_>) {
    let layout = settings.check_setting_str("GUI", "coming_eps_layout", "banner");
    let mut sort = settings.check_setting_str("GUI", "coming_eps_sort", "time");
    if sort == "date" {
        sort = "time".to_string();
    }
    let display_paused = settings.check_setting_int("GUI", "coming_eps_display_paused", 0);
    let missed_range = settings.check_setting_int("GUI", "coming_eps_missed_range", 7);

    settings.set_str("GUI", "episode_view_layout", &layout);
    settings.set_str("GUI", "episode_view_sort", &sort);
    settings.set_int("GUI", "episode_view_display_paused", display_paused);
    settings.set_int("GUI", "episode_view_missed_range", missed_range);

    let document = settings.document_mut();
    for key in [
        "coming_eps_layout",
        "coming_eps_sort",
        "coming_eps_display_paused",
        "coming_eps_missed_range",
    ] {
        document.remove("GUI", key);
    }
}

#[migration_step(version = 11, name = "Migrate anime split view to new layout")]
fn anime_split_view(settings: &mut SettingsStore, _: &mut Collaborators<'_>) {
    let tag_view = if settings.check_setting_bool("ANIME", "anime_split_home", false) {
        "anime"
    } else {
        "default"
    };
    settings.set_str("GUI", "showlist_tagview", tag_view);
    settings.document_mut().remove("ANIME", "anime_split_home");
}
