use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use chrono::{Local, NaiveDateTime};
use clap::{Args, Parser, Subcommand};
use nxlabels_core::{Bindings, LabelsConfig, Translator, Value};

const ISO_DATETIME: &str = "%Y-%m-%dT%H:%M:%S";

/// Localized label lookup for the Drive desktop client.
#[derive(Parser, Debug)]
#[command(author, version, about = "NxLabels command-line interface", long_about = None)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Label table (.json, .js or .toml). Defaults to the bundled table.
    #[arg(long, global = true)]
    table: Option<PathBuf>,

    /// Locale to render, e.g. `fr` or `fr_FR.UTF-8`.
    #[arg(long, short, global = true)]
    locale: Option<String>,

    /// TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one label.
    Translate {
        key: String,
        /// Placeholder binding, repeatable: `--var version=3.1.0`.
        #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_var)]
        vars: Vec<(String, String)>,
        /// Fail when a placeholder is left unbound.
        #[arg(long)]
        strict: bool,
    },
    /// List locales with their display names; `*` marks the default.
    Locales,
    /// Report keys missing from or inconsistent across translations.
    Check {
        /// Exit non-zero when any locale is incomplete.
        #[arg(long)]
        deny_missing: bool,
    },
    /// Render a date with a locale's pattern.
    Date {
        /// Instant as `YYYY-MM-DDTHH:MM:SS`; now when omitted.
        #[arg(long, value_parser = parse_instant)]
        at: Option<NaiveDateTime>,
        #[arg(long, default_value = "DATETIME_FORMAT")]
        pattern: String,
    },
    /// Render an elapsed interval ("5 minutes ago").
    Ago {
        #[arg(allow_negative_numbers = true)]
        seconds: i64,
    },
}

fn parse_var(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got {raw:?}"))?;
    let name = name.trim();
    if !nxlabels_core::interpolate::is_identifier(name) {
        return Err(format!("{name:?} is not a valid placeholder name"));
    }
    Ok((name.to_string(), value.to_string()))
}

fn parse_instant(raw: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(raw, ISO_DATETIME)
        .map_err(|e| format!("expected YYYY-MM-DDTHH:MM:SS: {e}"))
}

/// Instants and integers keep their type so they render per locale.
fn binding_value(raw: &str) -> Value {
    if let Ok(instant) = parse_instant(raw) {
        Value::Instant(instant)
    } else if let Ok(count) = raw.parse::<i64>() {
        Value::Count(count)
    } else {
        Value::Text(raw.to_string())
    }
}

fn load_config(common: &CommonArgs) -> anyhow::Result<LabelsConfig> {
    let mut config = match &common.config {
        Some(path) => LabelsConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => LabelsConfig::default(),
    };
    config.apply_env()?;
    if let Some(table) = &common.table {
        config.table = Some(table.clone());
    }
    if let Some(locale) = &common.locale {
        config.locale = Some(locale.clone());
    }
    Ok(config)
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = load_config(&cli.common)?;

    #[cfg(feature = "logging")]
    nxlabels_core::logging::init(&config.logging).context("initializing logging")?;

    let store = config.load_store().context("loading label table")?;
    let locale = config.effective_locale(&store);
    nxlabels_core::nxl_log_debug!(locale = %locale, "rendering locale selected");
    let translator = Translator::new(Arc::new(store)).with_strict(config.strict_placeholders);

    match cli.command {
        Command::Translate { key, vars, strict } => {
            let translator = if strict { translator.with_strict(true) } else { translator };
            let bindings: Bindings = vars
                .iter()
                .map(|(name, raw)| (name.clone(), binding_value(raw)))
                .collect();
            let out = translator.translate(&locale, &key, &bindings)?;
            println!("{out}");
            if !out.is_complete() {
                eprintln!("warning: unbound placeholders: {}", out.missing.join(", "));
            }
        }
        Command::Locales => {
            let store = translator.store();
            for (tag, name) in store.languages() {
                let marker = if tag == store.default_locale() { '*' } else { ' ' };
                println!("{marker} {tag}\t{name}");
            }
        }
        Command::Check { deny_missing } => {
            let report = translator.store().coverage_report();
            for entry in &report.locales {
                println!(
                    "{}: {}/{} ({:.1}%)",
                    entry.locale, entry.present, report.total_keys, entry.coverage_percent
                );
                for key in &entry.missing {
                    println!("  missing    {key}");
                }
                for key in &entry.extra {
                    println!("  extra      {key}");
                }
                for key in &entry.placeholder_mismatches {
                    println!("  mismatched {key}");
                }
            }
            if deny_missing && !report.is_complete() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Date { at, pattern } => {
            let at = at.unwrap_or_else(|| Local::now().naive_local());
            println!("{}", translator.format_date(&locale, &at, &pattern)?);
        }
        Command::Ago { seconds } => {
            println!("{}", translator.format_relative(&locale, seconds)?.text);
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> anyhow::Result<ExitCode> {
    run(Cli::parse())
}
