use config_migrator::{Collaborators, Detached, MigratorOptionsBuilder, startup};
use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = tempfile::tempdir()?;
    let config_path = temp_dir.path().join("config.ini");

    // A config written by a release from before custom naming patterns
    let v1_config = r#"
[General]
config_version = "0"
naming_use_periods = "1"
naming_ep_type = "2"
naming_sep_type = "0"
naming_quality = "1"
naming_show_name = "1"
naming_ep_name = "0"
anon_redirect = "http://dereferer.org/?"

[GUI]
coming_eps_sort = "date"

[Newznab]
newznab_data = "NZBgeek|https://api.nzbgeek.info/|abc|1!!!broken|record|0"
"#;

    println!("Before migration:");
    println!("{v1_config}");
    std::fs::write(&config_path, v1_config)?;

    let options = MigratorOptionsBuilder::default()
        .config_path(&config_path)
        .build()?;

    let (mut providers, mut accounts, mut library) = (Detached, Detached, Detached);
    let mut collaborators = Collaborators {
        providers: &mut providers,
        accounts: &mut accounts,
        library: &mut library,
        cache_dir: None,
    };

    // Fatal conditions come back as errors whose text is meant for the user
    let settings = startup::load_and_migrate(&options, &mut collaborators)?;

    println!("After migration:");
    println!("{}", settings.document());

    Ok(())
}
