/// Command-line entry point.
///
/// Usage:
///   floodrisk_service [--config PATH] <location>
///   floodrisk_service [--config PATH] --reports [--week DATE | --province NAME]
///
/// `<location>` is a city name or a "lat,lon" pair; the analysis outcome is
/// printed to stdout as JSON. `--reports` prints the stored weekly provincial
/// reports instead. Logs go to stderr. Exits non-zero on failure.

use floodrisk_service::analysis::reports;
use floodrisk_service::config::{self, DEFAULT_CONFIG_PATH, ServiceConfig};
use floodrisk_service::ingest::reports::{ReportQuery, WeeklyReportsClient};
use floodrisk_service::logging::{self, DataSource};
use floodrisk_service::pipeline::HttpPipeline;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

enum Command {
    Analyze(String),
    Reports(ReportQuery),
}

fn usage() -> ExitCode {
    eprintln!("Usage: floodrisk_service [--config PATH] <location>");
    eprintln!("       floodrisk_service [--config PATH] --reports [--week DATE | --province NAME]");
    eprintln!("  <location>  city name, or \"lat,lon\" (e.g. \"33.6131,73.0729\")");
    ExitCode::from(2)
}

fn parse_args() -> Option<(PathBuf, Command)> {
    let mut args = std::env::args().skip(1);
    let mut config_path = PathBuf::from(DEFAULT_CONFIG_PATH);
    let mut location: Option<String> = None;
    let mut reports = false;
    let mut query = ReportQuery::Latest;

    while let Some(arg) = args.next() {
        if arg == "--config" || arg == "-c" {
            config_path = PathBuf::from(args.next()?);
        } else if arg == "--reports" {
            reports = true;
        } else if arg == "--week" {
            query = ReportQuery::Week(args.next()?);
        } else if arg == "--province" {
            query = ReportQuery::Province(args.next()?);
        } else if arg.starts_with('-') || location.is_some() {
            return None;
        } else {
            location = Some(arg);
        }
    }

    let command = match (reports, location) {
        (true, None) => Command::Reports(query),
        (false, Some(location)) if query == ReportQuery::Latest => Command::Analyze(location),
        _ => return None,
    };
    Some((config_path, command))
}

fn print_json<T: Serialize>(value: &T) -> bool {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            true
        }
        Err(e) => {
            logging::error(DataSource::System, None, &format!("Cannot serialize output: {}", e));
            false
        }
    }
}

fn run_analysis(config: &ServiceConfig, location: &str) -> ExitCode {
    let pipeline = match HttpPipeline::from_config(config) {
        Ok(p) => p,
        Err(e) => {
            logging::error(DataSource::System, None, &e.to_string());
            return ExitCode::FAILURE;
        }
    };

    let outcome = pipeline.analyze(location);
    if print_json(&outcome) && outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn run_reports(config: &ServiceConfig, query: &ReportQuery) -> ExitCode {
    let fetched = config
        .http_client()
        .and_then(|client| WeeklyReportsClient::new(client, &config.backend.reports_url).fetch(query));

    match fetched {
        Ok(list) => {
            if print_json(&reports::report_batch(list)) {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            logging::log_failure(DataSource::Backend, None, "Weekly reports", &e);
            eprintln!("Failed to load provincial reports: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn main() -> ExitCode {
    let Some((config_path, command)) = parse_args() else {
        return usage();
    };

    let config = match config::load_config(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    // validate() has already checked the level string
    let level = config.log_level().unwrap_or(logging::LogLevel::Info);
    logging::init_logger(level, config.logging.file.as_deref(), config.logging.timestamps);

    match command {
        Command::Analyze(location) => run_analysis(&config, &location),
        Command::Reports(query) => run_reports(&config, &query),
    }
}
