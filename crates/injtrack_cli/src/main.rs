//! Command-line front end for injtrack.
//!
//! # Responsibility
//! - Act as the form layer: parse and validate input before it reaches the
//!   core repository.
//! - Render core read models as plain text.

use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use injtrack_core::db::open_db;
use injtrack_core::service::backup::{read_backup_file, write_backup_file};
use injtrack_core::service::dashboard::summarize;
use injtrack_core::{
    aggregate_history, default_log_level, init_logging, site_label, ActivityLevel, HistoryEntry,
    InjectionSite, NewInjection, NewMeasurement, NewSideEffect, NewWeightEntry, RecordKind,
    SqliteKvStore, Theme, ThemeRepository, TrackerConfig, TrackerData, TrackerRepository,
    DEFAULT_DOSES,
};
use log::info;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

type CliResult<T> = Result<T, Box<dyn Error>>;

#[derive(Debug, Parser)]
#[command(name = "injtrack", version, about = "Track injections, weight and side effects")]
struct Cli {
    /// SQLite file backing the key/value store.
    #[arg(long, env = "INJTRACK_DB", default_value = "injtrack.sqlite3")]
    db: PathBuf,

    /// Absolute directory for rolling log files; logging is off when unset.
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print core liveness and version.
    Ping,
    AddInjection(AddInjectionArgs),
    AddWeight {
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        #[arg(long)]
        weight: f64,
    },
    AddSideEffect {
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        #[arg(long)]
        description: String,
    },
    AddMeasurement(AddMeasurementArgs),
    /// Delete one record by collection and id.
    Delete {
        #[arg(value_enum)]
        kind: KindArg,
        id: String,
    },
    /// List all records, newest first.
    History,
    /// Show the recommended next injection site.
    NextSite,
    Dashboard,
    /// Estimate daily calories and store the result on the profile.
    Calories {
        #[arg(long, default_value = "sedentary")]
        activity: ActivityLevel,
    },
    /// Write a dated backup file into the given directory.
    Export {
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Replace all data with the contents of a backup file.
    Import { file: PathBuf },
    /// Delete all data.
    Reset {
        #[arg(long)]
        yes: bool,
    },
    /// Show, set or toggle the theme.
    Theme { value: Option<String> },
}

#[derive(Debug, Args)]
struct AddInjectionArgs {
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,
    /// Milligrams; defaults to the smallest preset dose.
    #[arg(long)]
    dose: Option<f64>,
    /// abdomen_left|abdomen_right|arm_left|arm_right; defaults to the
    /// recommended next site.
    #[arg(long)]
    site: Option<InjectionSite>,
    #[arg(long)]
    comment: Option<String>,
}

#[derive(Debug, Args)]
struct AddMeasurementArgs {
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,
    #[arg(long)]
    neck: Option<f64>,
    #[arg(long)]
    waist: Option<f64>,
    #[arg(long)]
    hips: Option<f64>,
    #[arg(long)]
    shoulders: Option<f64>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    Injection,
    Weight,
    SideEffect,
    Measurement,
}

impl From<KindArg> for RecordKind {
    fn from(value: KindArg) -> Self {
        match value {
            KindArg::Injection => RecordKind::Injection,
            KindArg::Weight => RecordKind::Weight,
            KindArg::SideEffect => RecordKind::SideEffect,
            KindArg::Measurement => RecordKind::Measurement,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<()> {
    if let Some(log_dir) = &cli.log_dir {
        init_logging(effective_log_level(cli.log_level.as_deref()), log_dir)?;
    }

    if let Command::Ping = cli.command {
        println!("injtrack_core ping={}", injtrack_core::ping());
        println!("injtrack_core version={}", injtrack_core::core_version());
        return Ok(());
    }

    let config = TrackerConfig::default();
    let conn = open_db(&cli.db)?;
    let mut repo = TrackerRepository::open(SqliteKvStore::new(&conn), &config)?;
    let today = Utc::now().date_naive();
    info!("event=cli_command module=cli status=start");

    match cli.command {
        Command::Ping => {}
        Command::AddInjection(args) => {
            let site = match args.site {
                Some(site) => site,
                None => summarize(repo.data(), today)
                    .recommended_site
                    .ok_or("no injection site available")?,
            };
            let fields = NewInjection {
                date: args.date.unwrap_or(today),
                dose: args.dose.unwrap_or(DEFAULT_DOSES[0]),
                site,
                comment: args.comment.filter(|comment| !comment.trim().is_empty()),
            };
            fields.validate()?;
            let id = repo.add_injection(fields)?;
            println!("injection added: {id} ({site})");
        }
        Command::AddWeight { date, weight } => {
            let fields = NewWeightEntry {
                date: date.unwrap_or(today),
                weight,
            };
            fields.validate()?;
            println!("weight added: {}", repo.add_weight(fields)?);
        }
        Command::AddSideEffect { date, description } => {
            let fields = NewSideEffect {
                date: date.unwrap_or(today),
                description: description.trim().to_string(),
            };
            fields.validate()?;
            println!("side effect added: {}", repo.add_side_effect(fields)?);
        }
        Command::AddMeasurement(args) => {
            let fields = NewMeasurement {
                date: args.date.unwrap_or(today),
                neck: args.neck,
                waist: args.waist,
                hips: args.hips,
                shoulders: args.shoulders,
            };
            fields.validate()?;
            println!("measurement added: {}", repo.add_measurement(fields)?);
        }
        Command::Delete { kind, id } => {
            repo.delete_record(kind.into(), &id)?;
            println!("deleted {} {id}", RecordKind::from(kind));
        }
        Command::History => print_history(repo.data()),
        Command::NextSite => {
            let data = repo.data();
            match summarize(data, today).recommended_site {
                Some(site) => println!("{site} ({})", site_label(&data.injection_sites, site)),
                None => println!("n/a"),
            }
        }
        Command::Dashboard => print_dashboard(repo.data(), today),
        Command::Calories { activity } => {
            let calories = repo.apply_daily_calories(activity)?;
            println!("estimated daily calories: {calories} kcal");
        }
        Command::Export { out_dir } => {
            let path = write_backup_file(&out_dir, &config, repo.data(), today)?;
            println!("backup written: {}", path.display());
        }
        Command::Import { file } => {
            let text = read_backup_file(&file)?;
            let data = repo.import_document(&text)?;
            println!("imported {} records", data.record_count());
        }
        Command::Reset { yes } => {
            if !yes {
                return Err("refusing to delete all data without --yes".into());
            }
            repo.reset_all()?;
            println!("all data deleted");
        }
        Command::Theme { value } => {
            let mut themes = ThemeRepository::open(SqliteKvStore::new(&conn), &config)?;
            let theme = match value.as_deref() {
                None => themes.theme(),
                Some("toggle") => themes.toggle()?,
                Some(other) => themes.set_theme(other.parse::<Theme>()?)?,
            };
            println!("{theme}");
        }
    }

    Ok(())
}

fn effective_log_level(requested: Option<&str>) -> &str {
    requested.unwrap_or(default_log_level())
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|err| format!("expected YYYY-MM-DD, got `{value}`: {err}"))
}

fn print_history(data: &TrackerData) {
    let history = aggregate_history(
        &data.injections,
        &data.weights,
        &data.side_effects,
        &data.measurements,
    );
    if history.is_empty() {
        println!("history is empty");
        return;
    }

    for entry in history {
        let details = match entry {
            HistoryEntry::Injection(injection) => format!(
                "{} mg at {}{}",
                injection.dose,
                site_label(&data.injection_sites, injection.site),
                injection
                    .comment
                    .as_deref()
                    .map(|comment| format!(". {comment}"))
                    .unwrap_or_default()
            ),
            HistoryEntry::Weight(weight) => format!("{} kg", weight.weight),
            HistoryEntry::SideEffect(effect) => effect.description.clone(),
            HistoryEntry::Measurement(measurement) => measurement
                .present_values()
                .iter()
                .map(|(field, value)| format!("{field} {value} cm"))
                .collect::<Vec<_>>()
                .join(", "),
        };
        println!(
            "{}  {:<12} {}  {details}",
            entry.date(),
            entry.kind(),
            entry.id()
        );
    }
}

fn print_dashboard(data: &TrackerData, today: NaiveDate) {
    let summary = summarize(data, today);
    match (&summary.last_injection, summary.days_since_last_injection) {
        (Some(last), Some(0)) => println!("last injection: {} mg, today", last.dose),
        (Some(last), Some(days)) => println!("last injection: {} mg, {days} days ago", last.dose),
        _ => println!("last injection: no data"),
    }
    match summary.current_weight {
        Some(weight) => println!("current weight: {weight} kg"),
        None => println!("current weight: no data"),
    }
    if let Some(site) = summary.recommended_site {
        println!("next site: {}", site_label(&data.injection_sites, site));
    }
    if let Some(due) = summary.next_injection_due {
        println!("next injection due: {due}");
    }
}
