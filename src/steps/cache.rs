use std::{fs, io::ErrorKind};

use tracing::{info, warn};

use crate::{Collaborators, SettingsStore, migration_step};

/// Image cache folders that no longer have an owner.
pub const DEAD_IMAGE_DIRS: [&str; 3] = ["anidb", "imdb", "trakt"];

#[migration_step(version = 16, name = "Purge old cache image folders")]
fn purge_image_cache(_: &mut SettingsStore, collaborators: &mut Collaborators<'_>) {
    let Some(cache_dir) = collaborators.cache_dir.as_deref() else {
        return;
    };
    if !cache_dir.is_dir() {
        return;
    }

    for name in DEAD_IMAGE_DIRS {
        let path = cache_dir.join("images").join(name);
        match fs::remove_dir_all(&path) {
            Ok(()) => info!("Removed old image cache {}", path.display()),
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => warn!("Could not remove old image cache {}: {err}", path.display()),
        }
    }
}
