//! EWS CLI — fetch, cache and inspect early-warning microlensing events.
//!
//! Commands:
//! - `path` — show where an event's files live locally and remotely
//! - `save` — download an event's files into the data directory
//! - `params` — print the parsed parameter file
//! - `data` — print the light curve
//! - `stats` — reduced chi-square (flat and point-lens) and periodogram summary

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use ews_core::data::{relative_path, DataError, DataKind, EventId, FileGrabber, HttpSource};
use ews_core::event::{DataOptions, Event, MODEL_DOF};
use ews_core::stats::StatsError;
use ews_core::GrabberConfig;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(
    name = "ews",
    about = "Early-warning microlensing event data: download, cache, inspect"
)]
struct Cli {
    /// TOML config file. Defaults to `<config dir>/ews/config.toml` when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Local data directory. Defaults to $OGLEDATADIR.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Allow downloading from the remote archive.
    #[arg(long, global = true, default_value_t = false)]
    remote: bool,

    /// Remote archive root.
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Debug logging (RUST_LOG overrides).
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct EventArgs {
    /// Alert year (e.g. 2019).
    year: i32,

    /// Event number within the year and field.
    number: u32,

    /// Survey field: blg, lmc, smc.
    #[arg(long, default_value = "blg")]
    field: String,
}

impl EventArgs {
    fn id(&self) -> Result<EventId> {
        match EventId::new(self.year, &self.field, self.number) {
            Some(id) => Ok(id),
            None => bail!(
                "invalid event: year {} field '{}' number {}",
                self.year,
                self.field,
                self.number
            ),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print an event's label and the relative paths of its files.
    Path {
        #[command(flatten)]
        event: EventArgs,
    },
    /// Download an event's parameter and photometry files into the data directory.
    Save {
        #[command(flatten)]
        event: EventArgs,
    },
    /// Print the parsed parameter file.
    Params {
        #[command(flatten)]
        event: EventArgs,

        /// Emit JSON instead of a table.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print the light curve (time, I, Ierr).
    Data {
        #[command(flatten)]
        event: EventArgs,

        /// Drop placeholder magnitudes and apply --sigma-min.
        #[arg(long, default_value_t = false)]
        cleanse: bool,

        /// Systematic error added in quadrature when cleansing.
        #[arg(long, default_value_t = 0.0)]
        sigma_min: f64,

        /// Emit JSON with keys t, I, Ierr.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Reduced chi-square and periodogram summary of the light curve.
    Stats {
        #[command(flatten)]
        event: EventArgs,

        /// Use the raw photometry (no placeholder removal).
        #[arg(long, default_value_t = false)]
        raw: bool,

        /// Systematic error added in quadrature.
        #[arg(long, default_value_t = 0.0)]
        sigma_min: f64,

        /// Fitted parameters subtracted for the point-lens chi-square.
        #[arg(long, default_value_t = MODEL_DOF)]
        dof: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = resolve_config(&cli)?;
    debug!(?config, "resolved configuration");

    match cli.command {
        Commands::Path { event } => run_path(&config, &event),
        Commands::Save { event } => run_save(config, &event),
        Commands::Params { event, json } => run_params(config, &event, json),
        Commands::Data {
            event,
            cleanse,
            sigma_min,
            json,
        } => {
            let options = if cleanse {
                DataOptions::cleansed(sigma_min)
            } else {
                DataOptions::raw()
            };
            run_data(config, &event, options, json)
        }
        Commands::Stats {
            event,
            raw,
            sigma_min,
            dof,
        } => {
            let options = if raw {
                DataOptions::raw()
            } else {
                DataOptions::cleansed(sigma_min)
            };
            run_stats(config, &event, options, dof)
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Flags > config file > default config file > environment.
fn resolve_config(cli: &Cli) -> Result<GrabberConfig> {
    let default_file = dirs::config_dir()
        .map(|d| d.join("ews").join("config.toml"))
        .filter(|p| p.is_file());
    resolve_config_with(cli, default_file, GrabberConfig::from_env())
}

/// [`resolve_config`] with the default config file and environment supplied.
fn resolve_config_with(
    cli: &Cli,
    default_file: Option<PathBuf>,
    env: GrabberConfig,
) -> Result<GrabberConfig> {
    let mut config = match cli.config.clone().or(default_file) {
        Some(path) => GrabberConfig::from_toml_file(&path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GrabberConfig::default(),
    };

    if config.data_dir.is_none() {
        config.data_dir = env.data_dir;
    }
    if let Some(dir) = &cli.data_dir {
        config.data_dir = Some(dir.clone());
    }
    if cli.remote {
        config.remote_enabled = true;
    }
    if let Some(url) = &cli.base_url {
        config.base_url = url.clone();
    }
    Ok(config)
}

fn open_event(config: GrabberConfig, args: &EventArgs) -> Result<Event> {
    let grabber = FileGrabber::new(config)?;
    Ok(Event::new(args.id()?, Arc::new(grabber)))
}

fn run_path(config: &GrabberConfig, args: &EventArgs) -> Result<()> {
    let id = args.id()?;
    let source = HttpSource::new(&config.base_url, Duration::from_secs(config.timeout_secs))?;
    println!("{id}");
    for kind in DataKind::ALL {
        let rel = relative_path(&id, kind);
        let local = match &config.data_dir {
            Some(dir) => {
                let full = dir.join(&rel);
                let state = if full.is_file() { "saved" } else { "not saved" };
                format!("{} ({state})", full.display())
            }
            None => "-".to_string(),
        };
        let remote = source.url_for(&rel).unwrap_or_else(|| "-".to_string());
        println!("  {kind:<6} {rel}");
        println!("         local:  {local}");
        println!("         remote: {remote}");
    }
    Ok(())
}

fn run_save(config: GrabberConfig, args: &EventArgs) -> Result<()> {
    if !config.remote_enabled {
        bail!("save needs remote access; pass --remote");
    }
    let grabber = FileGrabber::new(config)?;
    let summary = grabber.save(&args.id()?)?;
    for file in &summary.files {
        println!("{} saved ({} bytes)", file.path.display(), file.bytes);
    }
    Ok(())
}

fn run_params(config: GrabberConfig, args: &EventArgs, json: bool) -> Result<()> {
    let event = open_event(config, args)?;
    let params = event.params()?;

    if json {
        println!("{}", serde_json::to_string_pretty(params)?);
        return Ok(());
    }

    let h = &params.header;
    println!("{}", h.title);
    let show = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".into());
    println!("  Field    {}", show(&h.field));
    println!("  StarNo   {}", show(&h.star_no));
    match (h.ra_deg, h.dec_deg) {
        (Some(ra), Some(dec)) => println!(
            "  RA/Dec   {} {} ({ra:.3}, {dec:.3} deg)",
            show(&h.ra),
            show(&h.dec)
        ),
        _ => println!("  RA/Dec   {} {}", show(&h.ra), show(&h.dec)),
    }
    if !h.remarks.is_empty() {
        println!("  Remarks  {}", h.remarks);
    }
    println!();
    for name in params.names() {
        match params.measurement(name) {
            Some(m) => println!("  {name:<8} {:>14} ± {}", m.value, m.err),
            None => println!("  {name:<8} {:>14}", "-"),
        }
    }
    Ok(())
}

fn run_data(
    config: GrabberConfig,
    args: &EventArgs,
    options: DataOptions,
    json: bool,
) -> Result<()> {
    let event = open_event(config, args)?;
    let curve = event.data_with(options)?;

    if json {
        println!("{}", serde_json::to_string(&curve)?);
        return Ok(());
    }
    for (t, mag, err) in curve.observations() {
        println!("{t:.5} {mag:.3} {err:.3}");
    }
    Ok(())
}

fn run_stats(
    config: GrabberConfig,
    args: &EventArgs,
    options: DataOptions,
    dof: usize,
) -> Result<()> {
    let event = open_event(config, args)?.with_options(options);
    let curve = event.data_with(options)?;

    println!("{}", event.title());
    println!("  observations   {}", curve.len());
    if let Some((first, last)) = curve.time_span() {
        println!("  time span      {first:.5} .. {last:.5}");
    }
    println!("  rcs (flat)     {:.3}", event.rcs_of(&curve)?);

    match event.model_rcs_of(&curve, dof) {
        Ok(rcs) => println!("  rcs (model)    {rcs:.3}"),
        Err(DataError::Statistics {
            source: StatsError::MissingParameter(name),
            ..
        }) => println!("  rcs (model)    - (no '{name}' parameter)"),
        Err(e) => return Err(e.into()),
    }

    let summary = event.periodogram_of(&curve)?.summary();
    println!("  periodogram");
    println!("    max power        {:.4}", summary.max_power);
    println!("    freq at max      {:.6}", summary.freq_at_max);
    println!("    period           {:.4} d", summary.parallax_period);
    println!("    yearly power     {:.4}", summary.yearly_power);
    println!("    yearly / max     {:.8}", summary.yearly_power_norm);
    println!("    fwhm             {:.6}", summary.fwhm);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "ews", "stats", "2019", "12", "--field", "lmc", "--remote", "--dof", "3",
        ])
        .unwrap();
        assert!(cli.remote);
        match cli.command {
            Commands::Stats { event, dof, raw, .. } => {
                assert_eq!(event.id().unwrap().to_string(), "OGLE-2019-LMC-0012");
                assert_eq!(dof, 3);
                assert!(!raw);
            }
            _ => panic!("expected stats command"),
        }
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::try_parse_from([
            "ews",
            "--data-dir",
            "/tmp/ews-data",
            "--base-url",
            "https://mirror.example/ogle",
            "path",
            "2019",
            "1",
        ])
        .unwrap();
        let env = GrabberConfig::default().with_data_dir("/from/env");
        let config = resolve_config_with(&cli, None, env).unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/ews-data")));
        assert_eq!(config.base_url, "https://mirror.example/ogle");
        assert!(!config.remote_enabled);
    }

    #[test]
    fn config_file_beats_environment_and_flags_beat_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("config.toml");
        std::fs::write(&file, "data_dir = \"/from/file\"\nremote_enabled = true\n").unwrap();

        let cli = Cli::try_parse_from(["ews", "path", "2019", "1"]).unwrap();
        let env = GrabberConfig::default().with_data_dir("/from/env");
        let config = resolve_config_with(&cli, Some(file.clone()), env.clone()).unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/from/file")));
        assert!(config.remote_enabled);

        let none = resolve_config_with(&cli, None, env).unwrap();
        assert_eq!(none.data_dir, Some(PathBuf::from("/from/env")));
        assert!(!none.remote_enabled);
    }

    #[test]
    fn zero_event_number_is_rejected() {
        let args = EventArgs {
            year: 2019,
            number: 0,
            field: "blg".into(),
        };
        assert!(args.id().is_err());
    }
}
