use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use sales_dashboard::{
    config::DashboardConfig,
    export::export_snapshot,
    load::load_path,
    DateRange, FilterSelection, Pipeline,
};
use std::{env, path::PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

const USAGE: &str = "usage: sales-dashboard <file> [--region R]... [--state S]... [--city C]... \
[--start YYYY-MM-DD] [--end YYYY-MM-DD] [--config FILE] [--out DIR]";

struct Args {
    input: PathBuf,
    selection: FilterSelection,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    config: Option<PathBuf>,
    out: Option<PathBuf>,
}

fn parse_date(flag: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("{} expects YYYY-MM-DD, got {:?}", flag, value))
}

fn parse_args() -> Result<Args> {
    let mut args = env::args().skip(1);
    let mut input = None;
    let mut selection = FilterSelection::new();
    let (mut start, mut end, mut config, mut out) = (None, None, None, None);

    while let Some(arg) = args.next() {
        let mut value = || {
            args.next()
                .with_context(|| format!("{} needs a value\n{}", arg, USAGE))
        };
        match arg.as_str() {
            "--region" => {
                selection.regions.insert(value()?);
            }
            "--state" => {
                selection.states.insert(value()?);
            }
            "--city" => {
                selection.cities.insert(value()?);
            }
            "--start" => start = Some(parse_date("--start", &value()?)?),
            "--end" => end = Some(parse_date("--end", &value()?)?),
            "--config" => config = Some(PathBuf::from(value()?)),
            "--out" => out = Some(PathBuf::from(value()?)),
            "-h" | "--help" => bail!(USAGE),
            flag if flag.starts_with("--") => bail!("unknown flag {}\n{}", flag, USAGE),
            _ if input.is_none() => input = Some(PathBuf::from(&arg)),
            _ => bail!("unexpected argument {:?}\n{}", arg, USAGE),
        }
    }

    Ok(Args {
        input: input.context(USAGE)?,
        selection,
        start,
        end,
        config,
        out,
    })
}

fn main() -> Result<()> {
    let args = parse_args()?;
    let cfg = DashboardConfig::load(args.config.as_deref()).context("loading configuration")?;

    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log_filter));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();
    info!(input = %args.input.display(), "startup");

    let raw = load_path(&args.input)
        .with_context(|| format!("loading {}", args.input.display()))?;
    let session = Pipeline::from_config(&cfg)
        .ingest(&raw)
        .with_context(|| format!("validating {}", args.input.display()))?;

    // An open end of the range falls back to the upload's own bounds.
    let mut selection = args.selection;
    if args.start.is_some() || args.end.is_some() {
        if let Some(bounds) = session.default_range() {
            selection.range = Some(DateRange::new(
                args.start.unwrap_or(bounds.start),
                args.end.unwrap_or(bounds.end),
            ));
        }
    }

    let snapshot = session.refresh(&selection).context("applying selection")?;
    if let Some(w) = snapshot.warning {
        info!(?w, "no data for the current selection");
    }

    println!("{}", serde_json::to_string_pretty(&snapshot.views)?);

    let out_dir = args.out.unwrap_or_else(|| cfg.output_dir.clone());
    let written = export_snapshot(&snapshot, &out_dir, cfg.export_format)
        .with_context(|| format!("exporting to {}", out_dir.display()))?;
    info!(files = written.len(), dir = %out_dir.display(), "done");
    Ok(())
}
