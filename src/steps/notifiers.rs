//! Notifier and linked account steps.
use tracing::info;

use crate::{Collaborators, SettingsStore, migration_step};

#[migration_step(version = 9, name = "Rename pushbullet variables")]
fn rename_pushbullet(settings: &mut SettingsStore, _: &mut Collaborators<'_>) {
    for (old_key, new_key) in [
        ("pushbullet_api", "pushbullet_access_token"),
        ("pushbullet_device", "pushbullet_device_iden"),
    ] {
        if !settings.document_mut().rename_key("Pushbullet", old_key, new_key) {
            settings.set_str("Pushbullet", new_key, "");
        }
    }
}

#[migration_step(version = 14, name = "Convert Trakt to multi-account")]
fn trakt_multi_account(settings: &mut SettingsStore, collaborators: &mut Collaborators<'_>) {
    let token = settings.check_setting_str("Trakt", "trakt_token", "");
    let refresh_token = settings.check_setting_str("Trakt", "trakt_refresh_token", "");
    if !token.is_empty() && !refresh_token.is_empty() {
        collaborators
            .accounts
            .add_account(&token, &refresh_token, None);
        info!("Linked legacy Trakt account");
    }

    let document = settings.document_mut();
    document.remove("Trakt", "trakt_token");
    document.remove("Trakt", "trakt_refresh_token");
}

#[migration_step(version = 20, name = "Change Growl")]
fn merge_growl_password(settings: &mut SettingsStore, _: &mut Collaborators<'_>) {
    let host = settings.check_setting_str("Growl", "growl_host", "");
    let password = settings.check_setting_str("Growl", "growl_password", "");
    if let Some(merged) = merge_growl_host(&host, &password) {
        settings.set_str("Growl", "growl_host", &merged);
    }
}

/// `password@host`, or `None` when either part is empty.
pub fn merge_growl_host(host: &str, password: &str) -> Option<String> {
    if host.is_empty() || password.is_empty() {
        return None;
    }
    Some(format!("{password}@{host}"))
}
