//! Tests for the built-in migration steps.

#[macro_use]
mod common;

use std::{fs, path::MAIN_SEPARATOR};

use common::{FakeProvider, FakeProviders, Fakes, builtin, store, temp_config_dir};
use config_migrator::{
    AttrValue, BackupManager, Document, DocumentFile, Migrator, SecretCodec, SettingsStore,
    steps::{
        CONFIG_VERSION,
        metadata::widen_metadata,
        notifiers::merge_growl_host,
        providers::add_newznab_categories,
        redirect::ANON_REDIRECT_SERVICE,
        words::{WordList, add_ignore_words},
    },
};

fn run_step(version: u32, settings: &mut SettingsStore, fakes: &mut Fakes) {
    let registry = builtin();
    let step = registry
        .get(version)
        .unwrap_or_else(|| panic!("No built-in step for version {version}"));
    step.apply(settings, &mut collaborators!(fakes));
}

fn general<'a>(settings: &'a SettingsStore, key: &str) -> Option<&'a str> {
    settings.document().get("General", key)
}

#[test]
fn test_full_upgrade_from_version_zero() {
    let temp_dir = temp_config_dir();
    let path = temp_dir.path().join("config.ini");
    fs::write(
        &path,
        r#"
[General]
config_version = "0"
anon_redirect = "http://dereferer.org/?"
ignore_words = "germany, SPANISH"

[GUI]
coming_eps_sort = "date"

[Newznab]
newznab_data = "NZBgeek|https://api.nzbgeek.info/|abc|1"
"#,
    )
    .expect("Failed to write config");

    let file = DocumentFile::new(&path);
    let mut settings = SettingsStore::new(
        file.load().expect("Failed to load config"),
        SecretCodec::default(),
    );
    let registry = builtin();
    let mut fakes = Fakes::default();

    let report = Migrator::new(&registry, BackupManager::default())
        .migrate(&file, &mut settings, &mut collaborators!(fakes))
        .expect("Failed to migrate");

    assert_eq!(report.from, 0);
    assert_eq!(report.to, CONFIG_VERSION);
    assert_eq!(report.backups.len(), CONFIG_VERSION as usize);
    assert!(fakes.library.flatten_cleared);

    let on_disk = file.load().expect("Failed to reload config");
    assert_eq!(&on_disk, settings.document());
    assert_eq!(on_disk.get("General", "config_version"), Some("22"));
    assert_eq!(on_disk.get("General", "naming_pattern"), Some("%SN - %Sx%0E - %EN"));
    assert_eq!(on_disk.get("General", "naming_multi_ep"), Some("1"));
    assert_eq!(on_disk.get("General", "anon_redirect"), Some(ANON_REDIRECT_SERVICE));
    assert_eq!(on_disk.get("General", "backlog_period"), Some("21"));
    assert_eq!(on_disk.get("General", "backlog_frequency"), None);
    assert_eq!(on_disk.get("General", "recentsearch_interval"), Some("40"));
    assert_eq!(on_disk.get("General", "recentsearch_startup"), Some("0"));
    assert_eq!(on_disk.get("GUI", "episode_view_sort"), Some("time"));
    assert_eq!(on_disk.get("GUI", "showlist_tagview"), Some("default"));
    assert_eq!(
        on_disk.get("Newznab", "newznab_data"),
        Some("NZBgeek|https://api.nzbgeek.info/|abc|5030,5040,5060|1")
    );
    assert_eq!(
        on_disk.get("General", "metadata_xbmc"),
        Some("0|0|0|0|0|0|0|0|0|0")
    );

    let words = WordList::parse(on_disk.get("General", "ignore_words").unwrap_or_default());
    assert!(words.is_regex);
    assert!(words.words.iter().any(|word| word == "vp9"));
    assert!(!words.words.iter().any(|word| word.eq_ignore_ascii_case("spanish")));

    // Only the newest archives survive rotation
    let kept = config_migrator::backup::list_archives(&temp_dir.path().join("backup"))
        .expect("Failed to list archives");
    assert_eq!(kept.len(), 3);
}

#[test]
fn test_custom_naming_with_periods() {
    let mut settings = store(
        r#"
[General]
naming_use_periods = "1"
naming_ep_type = "2"
naming_sep_type = "0"
naming_quality = "1"
naming_show_name = "1"
naming_ep_name = "0"
naming_dates = "1"
naming_multi_ep_type = "4"
"#,
    );
    let mut fakes = Fakes::default();

    run_step(1, &mut settings, &mut fakes);

    assert_eq!(
        general(&settings, "naming_pattern"),
        Some("%S.N.-.S%0SE%0E.-.%Q.N")
    );
    assert_eq!(general(&settings, "naming_custom_abd"), Some("1"));
    assert_eq!(general(&settings, "naming_abd_pattern"), Some("%S.N.-.%A.D.-.%Q.N"));
    assert_eq!(general(&settings, "naming_multi_ep"), Some("4"));
    for key in ["naming_use_periods", "naming_ep_type", "naming_dates"] {
        assert_eq!(general(&settings, key), None, "{key} should be removed");
    }
}

#[test]
fn test_custom_naming_out_of_range_preset() {
    let mut settings = store("[General]\nnaming_ep_type = \"9\"\nnaming_sep_type = \"1\"\n");
    let mut fakes = Fakes::default();

    run_step(1, &mut settings, &mut fakes);

    assert_eq!(general(&settings, "naming_pattern"), Some("%SN %Sx%0E %EN"));
    assert_eq!(general(&settings, "naming_abd_pattern"), Some("%SN - %A-D - %EN"));
}

#[test]
fn test_custom_naming_prepends_season_folder() {
    let mut settings = store("[General]\nseason_folders_format = \"Season %02d\"\n");
    let mut fakes = Fakes::default();
    fakes.library.season_folders = true;

    run_step(1, &mut settings, &mut fakes);

    assert_eq!(
        general(&settings, "naming_pattern").map(str::to_string),
        Some(format!("Season %0S{MAIN_SEPARATOR}%SN - %Sx%0E - %EN"))
    );
    assert!(!fakes.library.flatten_cleared);
    assert_eq!(general(&settings, "season_folders_format"), None);
}

#[test]
fn test_omgwtfnzbs_credentials_move_to_provider() {
    let mut settings = store(
        "[omgwtfnzbs]\nomgwtfnzbs_uid = \"someone\"\nomgwtfnzbs_key = \"k3y\"\n",
    );
    let mut fakes = Fakes {
        providers: FakeProviders::with(vec![FakeProvider::new("omgwtfnzbs", "omgwtfnzbs", &[])]),
        ..Fakes::default()
    };

    run_step(3, &mut settings, &mut fakes);

    assert_eq!(
        fakes.providers.attr("omgwtfnzbs", "username"),
        Some(AttrValue::Str("someone".to_string()))
    );
    assert_eq!(
        fakes.providers.attr("omgwtfnzbs", "api_key"),
        Some(AttrValue::Str("k3y".to_string()))
    );
    assert_eq!(settings.document().get("omgwtfnzbs", "omgwtfnzbs_uid"), None);
    assert_eq!(settings.document().get("omgwtfnzbs", "omgwtfnzbs_key"), None);
}

#[test]
fn test_newznab_categories() {
    assert_eq!(
        add_newznab_categories("a|http://a|k|1!!!bad|record!!!b|http://b|k2|0"),
        "a|http://a|k|5030,5040,5060|1!!!b|http://b|k2|5030,5040,5060|0"
    );
    assert_eq!(add_newznab_categories("only|three|fields"), "");
}

#[test]
fn test_newznab_step_leaves_empty_list_alone() {
    let mut settings = store("[General]\nconfig_version = \"3\"\n");
    let mut fakes = Fakes::default();

    run_step(4, &mut settings, &mut fakes);

    assert_eq!(settings.document().get("Newznab", "newznab_data"), Some(""));
}

#[test]
fn test_metadata_widening() {
    assert_eq!(
        widen_metadata("1|1|1|1|1|1", "WDTV", false),
        "1|1|1|1|0|1|0|0|0|0"
    );
    assert_eq!(
        widen_metadata("1|2|3|4|5|6", "PS3", true),
        "1|2|4|3|0|5|6|0|0|0"
    );
    assert_eq!(
        widen_metadata("1|2|3|4|5|6", "XBMC", true),
        "1|2|4|0|3|5|6|0|0|0"
    );
    assert_eq!(
        widen_metadata("1|2|4|0|3|5|6|0|0|0", "XBMC", true),
        "1|2|4|0|3|5|6|0|0|0"
    );
    assert_eq!(widen_metadata("1|2", "Kodi", false), "0|0|0|0|0|0|0|0|0|0");
}

#[test]
fn test_metadata_step_is_idempotent() {
    let mut settings = store(
        r#"
[General]
use_banner = "1"
metadata_xbmc = "1|1|1|1|1|1"
metadata_kodi = "1|0|1|0|1|0"
"#,
    );
    let mut fakes = Fakes::default();

    run_step(5, &mut settings, &mut fakes);
    let once = settings.document().clone();
    run_step(5, &mut settings, &mut fakes);

    assert_eq!(settings.document(), &once);
    assert_eq!(general(&settings, "metadata_xbmc"), Some("1|1|1|0|1|1|0|0|0|0"));
    assert_eq!(general(&settings, "metadata_kodi"), Some("1|0|0|1|0|1|0|0|0|0"));
    assert_eq!(general(&settings, "metadata_tivo"), Some("0|0|0|0|0|0|0|0|0|0"));
    assert_eq!(general(&settings, "use_banner"), None);
}

#[test]
fn test_daily_search_becomes_recent_search() {
    let mut settings = store(
        r#"
[General]
dailysearch_frequency = "5"
dailysearch_startup = "0"

[WOMBLE]
womble_enable_dailysearch = "0"

[NYAA]
nyaa_enable_dailysearch = "1"
"#,
    );
    let mut fakes = Fakes {
        providers: FakeProviders::with(vec![
            FakeProvider::new(
                "womble",
                "Womble's Index",
                &[("enable_recentsearch", AttrValue::Bool(true))],
            ),
            FakeProvider::new("nyaa", "NyaaTorrents", &[]),
        ]),
        ..Fakes::default()
    };

    run_step(6, &mut settings, &mut fakes);

    assert_eq!(general(&settings, "recentsearch_frequency"), Some("10"));
    assert_eq!(general(&settings, "recentsearch_startup"), Some("0"));
    assert_eq!(general(&settings, "dailysearch_frequency"), None);
    assert_eq!(
        fakes.providers.attr("womble", "enable_recentsearch"),
        Some(AttrValue::Bool(false))
    );
    assert_eq!(fakes.providers.attr("nyaa", "enable_recentsearch"), None);
    assert_eq!(settings.document().get("WOMBLE", "womble_enable_dailysearch"), None);
    assert_eq!(settings.document().get("NYAA", "nyaa_enable_dailysearch"), None);
}

#[test]
fn test_coming_episodes_renamed() {
    let mut settings = store(
        r#"
[GUI]
coming_eps_layout = "poster"
coming_eps_sort = "network"
coming_eps_missed_range = "3"
"#,
    );
    let mut fakes = Fakes::default();

    run_step(7, &mut settings, &mut fakes);

    let gui = |key| settings.document().get("GUI", key);
    assert_eq!(gui("episode_view_layout"), Some("poster"));
    assert_eq!(gui("episode_view_sort"), Some("network"));
    assert_eq!(gui("episode_view_display_paused"), Some("0"));
    assert_eq!(gui("episode_view_missed_range"), Some("3"));
    assert_eq!(gui("coming_eps_layout"), None);
}

#[test]
fn test_pushbullet_keys_renamed_or_created() {
    let mut settings = store("[Pushbullet]\npushbullet_api = \"abc\"\n");
    let mut fakes = Fakes::default();

    run_step(9, &mut settings, &mut fakes);

    let pushbullet = |key| settings.document().get("Pushbullet", key);
    assert_eq!(pushbullet("pushbullet_access_token"), Some("abc"));
    assert_eq!(pushbullet("pushbullet_device_iden"), Some(""));
    assert_eq!(pushbullet("pushbullet_api"), None);
}

#[test]
fn test_anime_split_home_becomes_tag_view() {
    let mut settings = store("[ANIME]\nanime_split_home = \"1\"\n");
    let mut fakes = Fakes::default();

    run_step(11, &mut settings, &mut fakes);

    assert_eq!(settings.document().get("GUI", "showlist_tagview"), Some("anime"));
    assert_eq!(settings.document().get("ANIME", "anime_split_home"), None);
}

#[test]
fn test_ignore_word_merge() {
    let list = WordList::parse("HEVC, portuguese|spanish|swedish, reenc");
    let merged = list.merge(&["hevc", "reenc", "spanish"], &[]);
    assert_eq!(merged.render(), "HEVC, portuguese|swedish, reenc, spanish");

    let removed = merged.merge(&[], &["SPANISH"]);
    assert_eq!(removed.render(), "HEVC, portuguese|swedish, reenc");
}

#[test]
fn test_ignore_words_switch_to_regex_mode() {
    let mut settings = store("[General]\nignore_words = \"spanish, x265\"\n");

    add_ignore_words(&mut settings, &["regex:^foo$"], &["spanish"]);

    assert_eq!(general(&settings, "ignore_words"), Some("regex:x265, ^foo$"));
}

#[test]
fn test_spanish_word_becomes_regex() {
    let mut settings = store("[General]\nignore_words = \"spanish, german\"\n");
    let mut fakes = Fakes::default();

    run_step(18, &mut settings, &mut fakes);

    assert_eq!(
        general(&settings, "ignore_words"),
        Some(r"regex:german, ^(?=.*?\bspanish\b)((?!spanish.?princess).)*$")
    );
}

#[test]
fn test_vp9_av1_added_once() {
    let mut settings = store("[General]\nignore_words = \"VP9\"\n");
    let mut fakes = Fakes::default();

    run_step(17, &mut settings, &mut fakes);
    run_step(17, &mut settings, &mut fakes);

    assert_eq!(general(&settings, "ignore_words"), Some("VP9, av1"));
}

#[test]
fn test_anon_redirect_replacement() {
    let mut settings = store("[General]\nanon_redirect = \"https://nullrefer.com/?\"\n");
    let mut fakes = Fakes::default();
    run_step(22, &mut settings, &mut fakes);
    assert_eq!(general(&settings, "anon_redirect"), Some(ANON_REDIRECT_SERVICE));

    let mut settings = store("[General]\nanon_redirect = \"https://example.org/?\"\n");
    run_step(19, &mut settings, &mut fakes);
    assert_eq!(general(&settings, "anon_redirect"), Some("https://example.org/?"));
}

#[test]
fn test_trakt_account_linked() {
    let mut settings = store("[Trakt]\ntrakt_token = \"tok\"\ntrakt_refresh_token = \"ref\"\n");
    let mut fakes = Fakes::default();

    run_step(14, &mut settings, &mut fakes);

    assert_eq!(
        fakes.accounts.linked,
        vec![("tok".to_string(), "ref".to_string(), None)]
    );
    assert_eq!(settings.document().get("Trakt", "trakt_token"), None);
    assert_eq!(settings.document().get("Trakt", "trakt_refresh_token"), None);
}

#[test]
fn test_trakt_without_refresh_token_is_dropped() {
    let mut settings = store("[Trakt]\ntrakt_token = \"tok\"\n");
    let mut fakes = Fakes::default();

    run_step(14, &mut settings, &mut fakes);

    assert!(fakes.accounts.linked.is_empty());
    assert_eq!(settings.document().get("Trakt", "trakt_token"), None);
}

#[test]
fn test_nebulance_takes_over_transmithe_net() {
    let mut settings = store(
        r#"
[TRANSMITHE_NET]
transmithe_net = "1"
transmithe_net_username = "someone"
transmithe_net_minseed = "3"
transmithe_net_enable_recentsearch = "0"
"#,
    );
    settings.set_str("TRANSMITHE_NET", "transmithe_net_password", "s3cret");
    let mut fakes = Fakes {
        providers: FakeProviders::with(vec![FakeProvider::new(
            "nebulance",
            "Nebulance",
            &[("supports_backlog", AttrValue::Bool(true))],
        )]),
        ..Fakes::default()
    };

    run_step(15, &mut settings, &mut fakes);

    let attr = |name| fakes.providers.attr("nebulance", name);
    assert_eq!(attr("enabled"), Some(AttrValue::Bool(true)));
    assert_eq!(attr("username"), Some(AttrValue::Str("someone".to_string())));
    assert_eq!(attr("password"), Some(AttrValue::Str("s3cret".to_string())));
    assert_eq!(attr("minseed"), Some(AttrValue::Int(3)));
    assert_eq!(attr("enable_recentsearch"), Some(AttrValue::Bool(false)));
    assert_eq!(attr("search_mode"), Some(AttrValue::Str("eponly".to_string())));
    assert!(!settings.document().has_section("TRANSMITHE_NET"));
}

#[test]
fn test_nebulance_missing_keeps_section() {
    let mut settings = store("[TRANSMITHE_NET]\ntransmithe_net = \"1\"\n");
    let mut fakes = Fakes::default();

    run_step(15, &mut settings, &mut fakes);

    assert!(settings.document().has_section("TRANSMITHE_NET"));
}

#[test]
fn test_cache_image_folders_purged() {
    let temp_dir = temp_config_dir();
    let images = temp_dir.path().join("images");
    for name in ["anidb", "imdb", "thumbnails"] {
        fs::create_dir_all(images.join(name).join("nested")).expect("Failed to create cache dir");
    }

    let mut settings = SettingsStore::default();
    let mut fakes = Fakes::default();
    let registry = builtin();
    let mut collaborators = collaborators!(fakes);
    collaborators.cache_dir = Some(temp_dir.path().to_path_buf());
    registry
        .get(16)
        .expect("No built-in step for version 16")
        .apply(&mut settings, &mut collaborators);

    assert!(!images.join("anidb").exists());
    assert!(!images.join("imdb").exists());
    assert!(images.join("thumbnails").exists());
}

#[test]
fn test_growl_password_merged_into_host() {
    let mut settings = store("[Growl]\ngrowl_host = \"localhost:23053\"\n");
    settings.set_str("Growl", "growl_password", "pw");
    let mut fakes = Fakes::default();

    run_step(20, &mut settings, &mut fakes);

    assert_eq!(
        settings.document().get("Growl", "growl_host"),
        Some("pw@localhost:23053")
    );
    assert_eq!(merge_growl_host("", "pw"), None);
    assert_eq!(merge_growl_host("host", ""), None);
}

#[test]
fn test_frequencies_renamed_to_intervals() {
    let mut settings = store(
        r#"
[General]
autopostprocesser_frequency = "15"
backlog_frequency = "30"
update_frequency = "6"

[Emby]
emby_watchedstate_frequency = "600"

[Plex]
plex_watchedstate_frequency = "2"

[Subtitles]
subtitles_finder_frequency = "4"
"#,
    );
    let mut fakes = Fakes::default();

    run_step(21, &mut settings, &mut fakes);

    let document = settings.document();
    assert_eq!(document.get("General", "mediaprocess_interval"), Some("15"));
    assert_eq!(document.get("General", "backlog_period"), Some("30"));
    assert_eq!(document.get("General", "backlog_limited_period"), Some("7"));
    assert_eq!(document.get("General", "recentsearch_interval"), Some("40"));
    assert_eq!(document.get("General", "update_interval"), Some("6"));
    assert_eq!(document.get("Subtitles", "subtitles_finder_interval"), Some("4"));
    assert_eq!(document.get("Emby", "emby_watched_interval"), Some("60"));
    assert_eq!(document.get("Plex", "plex_watched_interval"), Some("10"));
    assert_eq!(document.get("General", "autopostprocesser_frequency"), None);
    assert_eq!(document.get("Emby", "emby_watchedstate_frequency"), None);
}

#[test]
fn test_clear_text_growl_password_survives_merge() {
    let document = Document::parse(
        r#"
[General]
encryption_version = "0"

[Growl]
growl_host = "host:23053"
growl_password = "secret"
"#,
    )
    .expect("Failed to parse document");
    let mut settings = SettingsStore::open(document, &SecretCodec::default());
    let mut fakes = Fakes::default();

    run_step(20, &mut settings, &mut fakes);

    let growl = |key| settings.document().get("Growl", key);
    assert_eq!(growl("growl_host"), Some("secret@host:23053"));
    assert_eq!(growl("growl_password"), Some("secret"));
}
