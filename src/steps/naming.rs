//! Episode naming steps.
use std::path::MAIN_SEPARATOR;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{error, info, warn};

use crate::{Collaborators, SettingsStore, migration_step};

/// First air-by-date preset, used when no custom air-by-date naming existed.
pub const DEFAULT_ABD_PATTERN: &str = "%SN - %A-D - %EN";

const EP_TEMPLATES: [&str; 4] = ["%Sx%0E", "s%0Se%0E", "S%0SE%0E", "%0Sx%0E"];
const SEPARATORS: [&str; 2] = [" - ", " "];

const MAX_FIELD_WIDTH: usize = u16::MAX as usize;

const LEGACY_KEYS: [&str; 9] = [
    "naming_use_periods",
    "naming_ep_type",
    "naming_sep_type",
    "naming_quality",
    "naming_show_name",
    "naming_ep_name",
    "naming_dates",
    "naming_multi_ep_type",
    "season_folders_format",
];

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Legacy boolean/enum naming flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegacyNaming {
    pub use_periods: bool,
    pub ep_type: usize,
    pub sep_type: usize,
    pub use_quality: bool,
    pub use_show_name: bool,
    pub use_ep_name: bool,
}

impl LegacyNaming {
    pub fn read(settings: &mut SettingsStore) -> Self {
        Self {
            use_periods: settings.check_setting_bool("General", "naming_use_periods", false),
            ep_type: read_index(settings, "naming_ep_type", EP_TEMPLATES.len()),
            sep_type: read_index(settings, "naming_sep_type", SEPARATORS.len()),
            use_quality: settings.check_setting_bool("General", "naming_quality", false),
            use_show_name: settings.check_setting_bool("General", "naming_show_name", true),
            use_ep_name: settings.check_setting_bool("General", "naming_ep_name", true),
        }
    }

    /// Builds the naming template these flags describe. With `air_by_date`
    /// the season/episode token is replaced by the air date token.
    pub fn to_pattern(&self, air_by_date: bool) -> String {
        let (show_name, ep_name, ep_quality, abd) = if self.use_periods {
            ("%S.N", "%E.N", "%Q.N", "%A.D")
        } else {
            ("%SN", "%EN", "%QN", "%A-D")
        };
        let separator = SEPARATORS[self.sep_type];

        let mut pattern = String::new();
        if self.use_show_name {
            pattern.push_str(show_name);
            pattern.push_str(separator);
        }

        pattern.push_str(if air_by_date {
            abd
        } else {
            EP_TEMPLATES[self.ep_type]
        });

        if self.use_ep_name {
            pattern.push_str(separator);
            pattern.push_str(ep_name);
        }

        if self.use_quality {
            pattern.push_str(separator);
            pattern.push_str(ep_quality);
        }

        if self.use_periods {
            pattern = WHITESPACE.replace_all(&pattern, ".").into_owned();
        }

        pattern
    }
}

fn read_index(settings: &mut SettingsStore, key: &str, len: usize) -> usize {
    let value = settings.check_setting_int("General", key, 0);
    match usize::try_from(value) {
        Ok(index) if index < len => index,
        _ => {
            warn!("{key} value {value} is out of range, using the first preset");
            0
        }
    }
}

#[migration_step(version = 1, name = "Custom naming")]
fn custom_naming(settings: &mut SettingsStore, collaborators: &mut Collaborators<'_>) {
    let legacy = LegacyNaming::read(settings);

    let mut pattern = legacy.to_pattern(false);
    info!("Based on your old settings the new naming pattern is: {pattern}");

    let custom_abd = settings.check_setting_bool("General", "naming_dates", false);
    let abd_pattern = if custom_abd {
        let abd_pattern = legacy.to_pattern(true);
        info!("Adding a custom air-by-date naming pattern to your config: {abd_pattern}");
        abd_pattern
    } else {
        DEFAULT_ABD_PATTERN.to_string()
    };

    let multi_ep = settings.check_setting_int("General", "naming_multi_ep_type", 1);

    if collaborators.library.uses_season_folders() {
        let old_format =
            settings.check_setting_str("General", "season_folders_format", "Season %02d");
        if !old_format.is_empty() {
            match season_folder_template(&old_format) {
                Some(new_format) => {
                    info!(
                        "Changed season folder format from {old_format} to {new_format}, \
                         prepending it to your naming config"
                    );
                    pattern = format!("{new_format}{MAIN_SEPARATOR}{pattern}");
                }
                None => error!("Can not change {old_format} to new season format"),
            }
        }
    } else {
        info!("No shows were using season folders before, disabling flattening on all shows");
        collaborators.library.clear_flatten_folders();
    }

    settings.set_str("General", "naming_pattern", &pattern);
    settings.set_bool("General", "naming_custom_abd", custom_abd);
    settings.set_str("General", "naming_abd_pattern", &abd_pattern);
    settings.set_int("General", "naming_multi_ep", multi_ep);

    for key in LEGACY_KEYS {
        settings.document_mut().remove("General", key);
    }
}

#[migration_step(version = 2, name = "Sync backup number with version number")]
fn sync_backup_number(_: &mut SettingsStore, _: &mut Collaborators<'_>) {}

/// Renders a printf style season folder format for season 9 and turns the
/// result into a naming template (`09` becomes `%0S`, `9` becomes `%S`).
///
/// Returns `None` when the format does not take exactly one number.
pub fn season_folder_template(format: &str) -> Option<String> {
    let rendered = format_one_int(format, 9)?;
    Some(rendered.replace("09", "%0S").replace('9', "%S"))
}

/// Substitutes `value` for the single `%d`/`%i`/`%u`/`%s` conversion in
/// `format`, honouring `0` and `-` flags, width and precision. `%%` is a
/// literal percent sign.
fn format_one_int(format: &str, value: i64) -> Option<String> {
    let mut out = String::new();
    let mut chars = format.chars().peekable();
    let mut converted = false;

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        if chars.peek() == Some(&'%') {
            chars.next();
            out.push('%');
            continue;
        }

        let mut zero_pad = false;
        let mut left_align = false;
        while let Some(&flag) = chars.peek() {
            match flag {
                '0' => zero_pad = true,
                '-' => left_align = true,
                '+' | ' ' | '#' => {}
                _ => break,
            }
            chars.next();
        }

        let width = take_number(&mut chars)?;
        let precision = if chars.peek() == Some(&'.') {
            chars.next();
            Some(take_number(&mut chars)?)
        } else {
            None
        };

        let body = match chars.next()? {
            'd' | 'i' | 'u' => {
                let digits = value.unsigned_abs().to_string();
                let digits = match precision {
                    Some(min) if digits.len() < min => format!("{digits:0>min$}"),
                    _ => digits,
                };
                if value < 0 { format!("-{digits}") } else { digits }
            }
            's' => value.to_string(),
            _ => return None,
        };

        if converted {
            return None;
        }
        converted = true;

        let padded = if left_align {
            format!("{body:<width$}")
        } else if zero_pad {
            format!("{body:0>width$}")
        } else {
            format!("{body:>width$}")
        };
        out.push_str(&padded);
    }

    converted.then_some(out)
}

/// Reads a width or precision. Anything above [`MAX_FIELD_WIDTH`] is `None`.
fn take_number(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<usize> {
    let mut number = 0usize;
    while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
        number = number * 10 + digit as usize;
        if number > MAX_FIELD_WIDTH {
            return None;
        }
        chars.next();
    }
    Some(number)
}
