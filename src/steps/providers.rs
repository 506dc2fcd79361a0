//! Steps that move legacy provider settings.
use tracing::{error, info};

use crate::{AttrValue, Collaborators, SettingsStore, migration_step};

use super::schedule::{DEFAULT_RECENTSEARCH_INTERVAL, MIN_RECENTSEARCH_INTERVAL};

/// Record separator in the newznab provider list.
pub const RECORD_SEPARATOR: &str = "!!!";
pub const DEFAULT_NEWZNAB_CATEGORIES: &str = "5030,5040,5060";

#[migration_step(version = 3, name = "Rename omgwtfnzb variables")]
fn rename_omgwtfnzbs(settings: &mut SettingsStore, collaborators: &mut Collaborators<'_>) {
    if let Some(provider) = collaborators.providers.lookup("omgwtfnzbs") {
        let uid = settings.check_setting_str("omgwtfnzbs", "omgwtfnzbs_uid", "");
        let key = settings.check_setting_str("omgwtfnzbs", "omgwtfnzbs_key", "");
        provider.set_attr("username", AttrValue::Str(uid));
        provider.set_attr("api_key", AttrValue::Str(key));
    }

    let document = settings.document_mut();
    document.remove("omgwtfnzbs", "omgwtfnzbs_uid");
    document.remove("omgwtfnzbs", "omgwtfnzbs_key");
}

#[migration_step(version = 4, name = "Add newznab cat_ids")]
fn add_newznab_cat_ids(settings: &mut SettingsStore, _: &mut Collaborators<'_>) {
    let old_data = settings.check_setting_str("Newznab", "newznab_data", "");
    if old_data.is_empty() {
        return;
    }
    let new_data = add_newznab_categories(&old_data);
    settings.set_str("Newznab", "newznab_data", &new_data);
}

/// Rewrites `name|url|key|enabled` records as
/// `name|url|key|<categories>|enabled`.
///
/// Records with any other field count are dropped and logged; the rest of
/// the list still converts.
pub fn add_newznab_categories(records: &str) -> String {
    records
        .split(RECORD_SEPARATOR)
        .filter_map(|record| {
            let fields: Vec<&str> = record.split('|').collect();
            match fields.as_slice() {
                [name, url, key, enabled] => Some(
                    [*name, *url, *key, DEFAULT_NEWZNAB_CATEGORIES, *enabled].join("|"),
                ),
                _ => {
                    error!("Skipping Newznab provider string: \"{record}\", incorrect format");
                    None
                }
            }
        })
        .collect::<Vec<_>>()
        .join(RECORD_SEPARATOR)
}

#[migration_step(version = 6, name = "Rename daily search to recent search")]
fn rename_daily_search(settings: &mut SettingsStore, collaborators: &mut Collaborators<'_>) {
    let interval = settings
        .check_setting_int("General", "dailysearch_frequency", DEFAULT_RECENTSEARCH_INTERVAL)
        .max(MIN_RECENTSEARCH_INTERVAL);
    let startup = settings.check_setting_bool("General", "dailysearch_startup", true);

    settings.set_int("General", "recentsearch_frequency", interval);
    settings.set_bool("General", "recentsearch_startup", startup);

    for id in collaborators.providers.ids() {
        let Some(provider) = collaborators.providers.lookup(&id) else {
            continue;
        };
        let section = id.to_uppercase();
        let legacy_key = format!("{id}_enable_dailysearch");
        if provider.has_attr("enable_recentsearch") {
            let enabled = settings.check_setting_bool(&section, &legacy_key, true);
            provider.set_attr("enable_recentsearch", AttrValue::Bool(enabled));
        }
        settings.document_mut().remove(&section, &legacy_key);
    }

    let document = settings.document_mut();
    document.remove("General", "dailysearch_frequency");
    document.remove("General", "dailysearch_startup");
}

const TRANSMITHE_NET_ID: &str = "transmithe_net";
const TRANSMITHE_NET_SECTION: &str = "TRANSMITHE_NET";

fn legacy_key(suffix: &str) -> String {
    format!("{TRANSMITHE_NET_ID}_{suffix}")
}

fn legacy_bool(settings: &mut SettingsStore, suffix: &str, default: bool) -> AttrValue {
    let key = legacy_key(suffix);
    AttrValue::Bool(settings.check_setting_bool(TRANSMITHE_NET_SECTION, &key, default))
}

fn legacy_int(settings: &mut SettingsStore, suffix: &str, default: i64) -> AttrValue {
    let key = legacy_key(suffix);
    AttrValue::Int(settings.check_setting_int(TRANSMITHE_NET_SECTION, &key, default))
}

fn legacy_str(settings: &mut SettingsStore, suffix: &str, default: &str) -> AttrValue {
    let key = legacy_key(suffix);
    AttrValue::Str(settings.check_setting_str(TRANSMITHE_NET_SECTION, &key, default))
}

#[migration_step(version = 15, name = "Transmithe.net rebranded Nebulance")]
fn rebrand_nebulance(settings: &mut SettingsStore, collaborators: &mut Collaborators<'_>) {
    let Some(neb) = collaborators.providers.lookup("Nebulance") else {
        return;
    };

    let supports_backlog = matches!(neb.get_attr("supports_backlog"), Some(AttrValue::Bool(true)));
    let enabled = settings.check_setting_bool(TRANSMITHE_NET_SECTION, TRANSMITHE_NET_ID, false);
    let recent_search = settings.check_setting_bool(
        TRANSMITHE_NET_SECTION,
        &legacy_key("enable_recentsearch"),
        true,
    );

    let attrs = [
        ("enabled", AttrValue::Bool(enabled)),
        ("username", legacy_str(settings, "username", "")),
        ("password", legacy_str(settings, "password", "")),
        ("minseed", legacy_int(settings, "minseed", 0)),
        ("minleech", legacy_int(settings, "minleech", 0)),
        ("freeleech", legacy_bool(settings, "freeleech", false)),
        ("enable_recentsearch", AttrValue::Bool(recent_search || !supports_backlog)),
        ("enable_backlog", legacy_bool(settings, "enable_backlog", true)),
        ("search_mode", legacy_str(settings, "search_mode", "eponly")),
        ("search_fallback", legacy_bool(settings, "search_fallback", false)),
        ("seed_time", legacy_int(settings, "seed_time", 0)),
        ("seed_ratio", legacy_str(settings, "seed_ratio", "")),
    ];

    for (attr, value) in attrs {
        neb.set_attr(attr, value);
    }
    info!("Moved {} settings to {}", TRANSMITHE_NET_ID, neb.name());

    settings.document_mut().remove_section(TRANSMITHE_NET_SECTION);
}
