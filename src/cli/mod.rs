//! Command-line front end: reads JSON snapshots and prints a report, and
//! manages the stored report preferences.

mod args;

pub use args::{Cli, Command, ConfigAction, ConfigArgs, ReportArgs};

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use clap::Parser;
use serde_json::Value;

use fintrack_config::{Config, ConfigError, ConfigManager, CONFIG_KEYS};
use fintrack_core::ReportService;
use fintrack_domain::{CategoryOrder, NegativeAmountPolicy};

use crate::errors::{CliError, FinError};
use crate::render::TextRenderer;

/// Parses process arguments and runs the selected command against stdout.
pub fn run_cli() -> Result<(), CliError> {
    let cli = Cli::parse();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(cli, &mut out)
}

pub fn run(cli: Cli, out: &mut dyn Write) -> Result<(), CliError> {
    match cli.command {
        Command::Version => {
            writeln!(out, "fintrack {}", env!("CARGO_PKG_VERSION")).map_err(FinError::from)?;
            Ok(())
        }
        Command::Report(args) => {
            let config = config_manager(cli.home.as_deref())?.load()?;
            report(&config, &args, out)
        }
        Command::Config(args) => {
            let manager = config_manager(cli.home.as_deref())?;
            configure(&manager, args.action.unwrap_or(ConfigAction::Show), out)
        }
    }
}

fn configure(
    manager: &ConfigManager,
    action: ConfigAction,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let message = match action {
        ConfigAction::Show => {
            let config = manager.load()?;
            serde_json::to_string_pretty(&config).map_err(FinError::from)?
        }
        ConfigAction::Set { key, value } => {
            let mut config = manager.load()?;
            config.set(&key, &value).map_err(|err| match err {
                ConfigError::UnknownKey(_) => FinError::InvalidInput(format!(
                    "{err} (expected one of: {})",
                    CONFIG_KEYS.join(", ")
                )),
                other => FinError::InvalidInput(other.to_string()),
            })?;
            manager.save(&config)?;
            tracing::info!(key = %key, "config updated");
            format!("Set {key} = {}", value.trim())
        }
        ConfigAction::Backup => {
            let name = manager.backup(&manager.load()?)?;
            format!("Backup created: {name}")
        }
        ConfigAction::Backups => {
            let names = manager.list_backups()?;
            if names.is_empty() {
                "No backups found.".to_string()
            } else {
                names.join("\n")
            }
        }
        ConfigAction::Restore { name } => {
            let config = manager.restore(&name)?;
            manager.save(&config)?;
            tracing::info!(backup = %name, "config restored");
            format!("Restored {name}")
        }
    };
    writeln!(out, "{message}").map_err(FinError::from)?;
    Ok(())
}

fn report(config: &Config, args: &ReportArgs, out: &mut dyn Write) -> Result<(), CliError> {
    let mut options = config.report_options();
    if args.alphabetical {
        options.category_order = CategoryOrder::Alphabetical;
    }
    if args.zero_negatives {
        options.negative_amounts = NegativeAmountPolicy::Zero;
    }

    let income = read_json(&args.income)?;
    let expenses = read_json(&args.expenses)?;
    let report = ReportService::build_from_snapshots(&income, &expenses, &options)?;
    tracing::info!(
        dates = report.aggregate.by_date.len(),
        balance = report.insights.total_balance,
        "report built"
    );

    let rendered = if args.json {
        let mut json = serde_json::to_string_pretty(&report).map_err(FinError::from)?;
        json.push('\n');
        json
    } else {
        let mut renderer = TextRenderer::stdout(config.clone());
        if args.plain {
            renderer = renderer.plain();
        }
        renderer.format(&report)
    };
    out.write_all(rendered.as_bytes()).map_err(FinError::from)?;
    Ok(())
}

fn config_manager(home: Option<&Path>) -> Result<ConfigManager, CliError> {
    Ok(match home {
        Some(dir) => ConfigManager::with_base_dir(dir)?,
        None => ConfigManager::from_env()?,
    })
}

fn read_json(path: &Path) -> Result<Value, CliError> {
    let data = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_json::from_str(&data).map_err(FinError::from)?)
}
