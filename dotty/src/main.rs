use std::path::PathBuf;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use dotty_frontend::{params, settings::Settings};
use thiserror::Error;
use tracing::{debug, error};
use url::Url;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Application error")]
    App,
    #[error("Initialization error")]
    Initialization,
    #[error("Invalid dashboard url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let logpath = get_logging_path()?;

    let logfile = tracing_appender::rolling::daily(logpath, "log");
    tracing_subscriber::fmt()
        .compact()
        .with_writer(logfile)
        .init();

    debug!("starting application");

    let settings = map_args_to_settings(&cli().get_matches())?;

    match dotty_frontend::run(settings).await {
        Ok(()) => {
            debug!("closing application");
            Ok(())
        }
        Err(err) => {
            error!("closing application with error: {:?}", err);
            Err(Error::App)
        }
    }
}

fn cli() -> Command {
    Command::new("dotty")
        .about("dotty - follow graphviz dashboards from the terminal")
        .args([
            // NOTE: arguments
            Arg::new("url")
                .action(ArgAction::Set)
                .required(true)
                .help("dashboard page url, query and fragment are read like in the browser"),
            // NOTE: options
            Arg::new("file")
                .long("file")
                .action(ArgAction::Set)
                .help("dot file to open, by name, path or index in the listing"),
            Arg::new("refresh")
                .long("refresh")
                .action(ArgAction::Set)
                .value_parser(value_parser!(u64))
                .help("poll interval in milliseconds"),
            Arg::new("debug")
                .long("debug")
                .action(ArgAction::Set)
                .value_parser(value_parser!(u8))
                .help("history verbosity, 0 ignores tooltip-only changes"),
            Arg::new("dot")
                .long("dot")
                .action(ArgAction::Set)
                .value_parser(value_parser!(PathBuf))
                .help("graphviz program used to render svg"),
            Arg::new("svg-out")
                .long("svg-out")
                .action(ArgAction::Set)
                .value_parser(value_parser!(PathBuf))
                .help("write the displayed snapshot as svg to this path"),
            Arg::new("rankdir")
                .long("rankdir")
                .action(ArgAction::Set)
                .value_parser(["TB", "LR", "BT", "RL"])
                .help("graph direction injected into the dot source"),
            Arg::new("size")
                .long("size")
                .action(ArgAction::Set)
                .help("graph size injected into the dot source"),
            Arg::new("no-unit-details")
                .long("no-unit-details")
                .action(ArgAction::SetTrue)
                .default_value("false")
                .help("hide unit rows of the graph on startup"),
        ])
}

fn map_args_to_settings(args: &ArgMatches) -> Result<Settings, Error> {
    let url = match args.get_one::<String>("url") {
        Some(it) => Url::parse(it)?,
        None => return Err(Error::Initialization),
    };

    let mut settings = Settings::new(url);
    if let Some(file) = args.get_one::<String>("file") {
        settings.file = Some(file.trim_end_matches('/').to_owned());
    }

    if let Some(refresh) = args.get_one::<u64>("refresh") {
        settings.refresh = params::refresh_interval(*refresh);
    }

    if let Some(debug) = args.get_one::<u8>("debug") {
        settings.debug = *debug;
    }

    if let Some(dot) = args.get_one::<PathBuf>("dot") {
        settings.renderer = dot.clone();
    }

    settings.svg_output = args.get_one("svg-out").cloned();
    settings.view.rankdir = args.get_one("rankdir").cloned();
    settings.view.size = args.get_one("size").cloned();
    settings.view.unit_details = !args.get_flag("no-unit-details");

    Ok(settings)
}

fn get_logging_path() -> Result<String, Error> {
    let cache_dir = match dirs::cache_dir() {
        Some(cache_dir) => match cache_dir.to_str() {
            Some(cache_dir_string) => cache_dir_string.to_string(),
            None => return Err(Error::Initialization),
        },
        None => return Err(Error::Initialization),
    };

    Ok(format!("{}{}", cache_dir, "/dotty/logs"))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn map_args_overrides_query() {
        let args = cli().get_matches_from([
            "dotty",
            "http://viz.local/index.html?file=dot/a.dot&refresh=1000",
            "--refresh",
            "5000",
            "--rankdir",
            "LR",
            "--no-unit-details",
        ]);

        let settings = map_args_to_settings(&args).unwrap();

        assert_eq!(Some("dot/a.dot".to_string()), settings.file);
        assert_eq!(std::time::Duration::from_millis(5000), settings.refresh);
        assert_eq!(Some("LR".to_string()), settings.view.rankdir);
        assert!(!settings.view.unit_details);
        assert_eq!(None, settings.svg_output);
    }

    #[test]
    fn map_args_zero_refresh_keeps_default() {
        let args = cli().get_matches_from([
            "dotty",
            "http://viz.local/index.html",
            "--refresh",
            "0",
        ]);

        let settings = map_args_to_settings(&args).unwrap();

        assert_eq!(
            std::time::Duration::from_millis(params::DEFAULT_REFRESH_MS),
            settings.refresh
        );
    }

    #[test]
    fn map_args_rejects_invalid_url() {
        let args = cli().get_matches_from(["dotty", "not a url"]);

        assert!(matches!(
            map_args_to_settings(&args),
            Err(Error::InvalidUrl(_))
        ));
    }
}
