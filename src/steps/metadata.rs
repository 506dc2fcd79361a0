//! Metadata provider flags, widened from six to ten fields.
//!
//! | new | old | meaning (new)     |
//! |-----|-----|-------------------|
//! | 1   | 1   | show metadata     |
//! | 2   | 2   | episode metadata  |
//! | 3   | 4   | show fanart       |
//! | 4   | 3   | show poster       |
//! | 5   | -   | show banner       |
//! | 6   | 5   | episode thumb     |
//! | 7   | 6   | season poster     |
//! | 8   | -   | season banner     |
//! | 9   | -   | season all poster |
//! | 10  | -   | season all banner |
use tracing::{error, info};

use crate::{Collaborators, SettingsStore, migration_step};

pub const LEGACY_WIDTH: usize = 6;
pub const WIDTH: usize = 10;

const LEGACY_DEFAULT: &str = "0|0|0|0|0|0";
const RESET: &str = "0|0|0|0|0|0|0|0|0|0";

/// Config key and display name of every metadata consumer.
const CONSUMERS: [(&str, &str); 8] = [
    ("metadata_xbmc", "XBMC"),
    ("metadata_xbmc_12plus", "XBMC 12+"),
    ("metadata_mediabrowser", "MediaBrowser"),
    ("metadata_ps3", "PS3"),
    ("metadata_wdtv", "WDTV"),
    ("metadata_tivo", "TIVO"),
    ("metadata_mede8er", "Mede8er"),
    ("metadata_kodi", "Kodi"),
];

#[migration_step(version = 5, name = "Metadata update")]
fn metadata_update(settings: &mut SettingsStore, _: &mut Collaborators<'_>) {
    let use_banner = settings.check_setting_bool("General", "use_banner", false);

    for (key, name) in CONSUMERS {
        let current = settings.check_setting_str("General", key, LEGACY_DEFAULT);
        let migrated = widen_metadata(&current, name, use_banner);
        settings.set_str("General", key, &migrated);
    }

    settings.document_mut().remove("General", "use_banner");
}

/// Converts one `|`-separated metadata record to the ten field layout.
///
/// Ten field records are returned unchanged. Records of any other width are
/// reset to all zeros. For XBMC with `use_banner` set, the poster flag moves
/// to the banner slot.
pub fn widen_metadata(record: &str, name: &str, use_banner: bool) -> String {
    let mut fields: Vec<&str> = record.split('|').collect();

    match fields.len() {
        LEGACY_WIDTH => {
            info!("Upgrading {name} metadata, old value: {record}");
            fields.insert(4, "0");
            fields.extend(["0", "0", "0"]);
            fields.swap(2, 3);
            if name == "XBMC" && use_banner {
                fields[4] = fields[3];
                fields[3] = "0";
            }
            let widened = fields.join("|");
            info!("Upgrading {name} metadata, new value: {widened}");
            widened
        }
        WIDTH => {
            info!("Keeping {name} metadata, value: {record}");
            record.to_string()
        }
        _ => {
            error!("Skipping {name}: \"{record}\", incorrect format");
            info!("Setting {name} metadata, new value: {RESET}");
            RESET.to_string()
        }
    }
}
