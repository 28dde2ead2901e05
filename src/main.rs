use anyhow::Context;
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use env_logger::Builder;
use log::{LevelFilter, info};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::dashboard::{Dashboard, LoadOutcome, ViewSnapshot, render_json, render_text};
use crate::data::FilterCriteria;
use crate::source::{DashboardConfig, SourceFetcher};

mod dashboard;
mod data;
mod source;

fn cli() -> Command {
    Command::new("ics-advisory-dashboard")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Summarize ICS security advisories from a CSV feed")
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_parser(value_parser!(PathBuf))
                .help("Path to a config.toml with data source settings"),
        )
        .arg(Arg::new("base-url").long("base-url").help("Base URL that relative sources resolve against"))
        .arg(Arg::new("primary").long("primary").help("Primary advisory CSV (URL or path)"))
        .arg(Arg::new("fallback").long("fallback").help("Fallback sample CSV (URL or path)"))
        .arg(
            Arg::new("page-size")
                .long("page-size")
                .value_parser(value_parser!(u64).range(1..))
                .help("Table rows per page"),
        )
        .arg(Arg::new("severity").long("severity").help("Severity filter (critical, high, medium, low or all)"))
        .arg(Arg::new("vendor").long("vendor").help("Vendor filter, matched as a case-insensitive substring"))
        .arg(
            Arg::new("page")
                .long("page")
                .default_value("1")
                .value_parser(value_parser!(usize))
                .help("Table page to show"),
        )
        .arg(Arg::new("json").long("json").action(ArgAction::SetTrue).help("Output the dashboard view as JSON"))
        .arg(
            Arg::new("export")
                .long("export")
                .value_parser(value_parser!(PathBuf))
                .help("Write the filtered advisories to this CSV file"),
        )
}

fn load_config(matches: &ArgMatches) -> anyhow::Result<DashboardConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => DashboardConfig::load(path).map_err(anyhow::Error::msg).with_context(|| format!("Config: {}", path.display()))?,
        None => DashboardConfig::default(),
    };

    if let Some(base_url) = matches.get_one::<String>("base-url") {
        config.base_url = Some(base_url.clone());
    }
    if let Some(primary) = matches.get_one::<String>("primary") {
        config.primary_source = primary.clone();
    }
    if let Some(fallback) = matches.get_one::<String>("fallback") {
        config.fallback_source = fallback.clone();
    }
    if let Some(page_size) = matches.get_one::<u64>("page-size") {
        config.page_size = *page_size as usize;
    }
    Ok(config)
}

fn write_export(path: &Path, csv: &str) -> anyhow::Result<()> {
    std::fs::write(path, csv).with_context(|| format!("Failed to write export file: {}", path.display()))?;
    info!("Exported filtered advisories to {}", path.display());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    // Logging setup
    Builder::new()
        .filter_level(LevelFilter::Info)
        .filter(Some("ics_advisory_dashboard"), LevelFilter::Debug)
        .parse_default_env()
        .init();

    let matches = cli().get_matches();
    let config = load_config(&matches)?;
    let criteria = FilterCriteria::new(matches.get_one::<String>("severity").cloned(), matches.get_one::<String>("vendor").cloned());

    let fetcher = SourceFetcher::new(Duration::from_secs(config.request_timeout_secs)).map_err(anyhow::Error::msg)?;
    let mut dashboard = Dashboard::new(fetcher, ViewSnapshot::new(), config);

    if dashboard.load() == LoadOutcome::Empty {
        log::error!("Failed to load data from every configured source");
    }
    dashboard.apply_filters(criteria);

    let page = matches.get_one::<usize>("page").copied().unwrap_or(1);
    if page != 1 && !dashboard.set_page(page) {
        log::warn!("Page {} is out of range, showing page 1", page);
    }

    if let Some(path) = matches.get_one::<PathBuf>("export") {
        write_export(path, &dashboard.export_filtered())?;
    }

    let Some(view) = dashboard.presenter().latest() else {
        anyhow::bail!("No dashboard view was published");
    };
    if matches.get_flag("json") {
        println!("{}", render_json(view).context("Failed to serialize dashboard view")?);
    } else {
        print!("{}", render_text(view));
    }
    Ok(())
}
