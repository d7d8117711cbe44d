use clap::{Arg, ArgAction, ArgMatches, Command};
use linkyee_preview::{BuildCommand, PreviewOptions, run, shutdown_signal};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("linkyee-preview")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Build the site and serve it locally for preview")
        .arg(
            Arg::new("port")
                .help("Port to listen on")
                .value_parser(clap::value_parser!(u16))
                .default_value("4000")
                .index(1),
        )
        .arg(
            Arg::new("root")
                .long("root")
                .short('r')
                .help("Site root, where the build runs")
                .value_parser(clap::value_parser!(PathBuf))
                .default_value("."),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .help("Build output directory, relative to the root")
                .value_parser(clap::value_parser!(PathBuf))
                .default_value("_output"),
        )
        .arg(
            Arg::new("build-cmd")
                .long("build-cmd")
                .short('b')
                .help("Command that builds the site, split on whitespace")
                .value_parser(|s: &str| s.parse::<BuildCommand>())
                .default_value("ruby scaffold.rb"),
        )
        .arg(
            Arg::new("skip-build")
                .long("skip-build")
                .help("Serve the existing output without building")
                .conflicts_with("build-cmd")
                .action(ArgAction::SetTrue),
        )
}

fn options_from(matches: &ArgMatches) -> PreviewOptions {
    let mut options = PreviewOptions::default();
    if let Some(port) = matches.get_one::<u16>("port") {
        options.port = *port;
    }
    if let Some(root) = matches.get_one::<PathBuf>("root") {
        options.root = root.clone();
    }
    if let Some(output) = matches.get_one::<PathBuf>("output") {
        options.output = output.clone();
    }
    options.build = if matches.get_flag("skip-build") {
        None
    } else {
        matches.get_one::<BuildCommand>("build-cmd").cloned()
    };
    options
}

#[tokio::main]
async fn main() -> ExitCode {
    let options = options_from(&cli().get_matches());

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    match run(&options, shutdown_signal()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
