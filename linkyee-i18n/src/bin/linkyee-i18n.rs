use clap::{Arg, ArgAction, Command};
use linkyee_i18n::{compile_config, load_config, render_for};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = Command::new("linkyee-i18n")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Compile a translation table into i18n markup fragments")
        .arg(
            Arg::new("config")
                .help("Plugin configuration (JSON with supported_langs and translations)")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf))
                .index(1),
        )
        .arg(
            Arg::new("key")
                .long("key")
                .short('k')
                .help("Print only the fragment for this key (use 'script' for the runtime script)"),
        )
        .arg(
            Arg::new("lang")
                .long("lang")
                .short('l')
                .help("Pre-render fragments for this visitor language preference (e.g. es-MX)"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log fallback resolution details")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let default_level = if matches.get_flag("verbose") { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let Some(config_path) = matches.get_one::<PathBuf>("config") else {
        return Err("Missing configuration path".into());
    };
    let config = load_config(config_path)?;
    info!(
        "Loaded {} translation keys for languages {:?}",
        config.translations.len(),
        config.supported_langs
    );

    let mut fragments = compile_config(&config);
    if let Some(preference) = matches.get_one::<String>("lang") {
        fragments = render_for(&config.supported_langs, &fragments, Some(preference.as_str()));
    }

    match matches.get_one::<String>("key") {
        Some(key) => match fragments.get(key) {
            Some(fragment) => println!("{}", fragment),
            None => {
                eprintln!("❌ No fragment for key '{}'", key);
                return Err(format!("Unknown key: {}", key).into());
            }
        },
        None => println!("{}", serde_json::to_string_pretty(&fragments)?),
    }

    Ok(())
}
