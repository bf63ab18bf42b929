use std::io::{self, BufRead, Write};

use clap::{Args, Subcommand};

use crate::config::{StoredConfig, config_file_path};
use crate::error::{AppError, AppResult};
use crate::infra::linear::DEFAULT_API_URL;

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Walk through the stored settings interactively.
    Init,
    /// Print the stored settings with the API key masked.
    Show,
}

pub fn run(command: ConfigCommand) -> AppResult<()> {
    match command {
        ConfigCommand::Init => run_init(),
        ConfigCommand::Show => run_show(),
    }
}

fn run_init() -> AppResult<()> {
    let mut cfg = StoredConfig::load()?;
    let stdin = io::stdin();
    let mut input = stdin.lock();

    println!("Configuring sweep.");
    println!("Press Enter to keep the current value, '-' to clear it.");
    println!("The API key is stored in the local config file; protect your filesystem accordingly.");
    println!();

    apply_prompt(
        &mut input,
        &format!("Issue tracker API URL (default {DEFAULT_API_URL})"),
        &mut cfg.api_url,
        false,
    )?;
    apply_prompt(&mut input, "API key", &mut cfg.api_key, true)?;
    apply_prompt(&mut input, "Default team key (e.g., 1M)", &mut cfg.team_key, false)?;
    apply_prompt(
        &mut input,
        "Default target state (e.g., Canceled)",
        &mut cfg.state_name,
        false,
    )?;

    let mut pace = cfg.pace_ms.map(|ms| ms.to_string());
    apply_prompt(&mut input, "Delay between tickets in ms", &mut pace, false)?;
    cfg.pace_ms = pace
        .map(|value| {
            value.parse::<u64>().map_err(|err| {
                AppError::Configuration(format!("delay must be a whole number of ms: {err}"))
            })
        })
        .transpose()?;

    cfg.save()?;

    let path = config_file_path()?;
    println!("\nConfiguration saved to {}", path.display());
    Ok(())
}

fn run_show() -> AppResult<()> {
    let cfg = StoredConfig::load()?;
    let path = config_file_path()?;

    println!("Configuration file: {}", path.display());
    for (label, value) in cfg.describe() {
        println!("{label}: {value}");
    }

    Ok(())
}

fn apply_prompt(
    input: &mut impl BufRead,
    field: &str,
    target: &mut Option<String>,
    secret: bool,
) -> AppResult<()> {
    match prompt(input, field, target.as_deref(), secret)? {
        PromptAction::Keep => {}
        PromptAction::Clear => *target = None,
        PromptAction::Set(value) => *target = Some(value),
    }
    Ok(())
}

fn prompt(
    input: &mut impl BufRead,
    field: &str,
    current: Option<&str>,
    secret: bool,
) -> AppResult<PromptAction> {
    let mut stdout = io::stdout();

    let hint = match (current, secret) {
        (Some(_), true) => "[****] (Enter to keep, '-' to clear)".to_string(),
        (Some(value), false) => format!("[{value}] (Enter to keep, '-' to clear)"),
        (None, _) => "(Enter to skip)".to_string(),
    };
    write!(stdout, "{field} {hint}: ")?;
    stdout.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(PromptAction::parse(&line))
}

#[derive(Debug, PartialEq, Eq)]
enum PromptAction {
    Keep,
    Clear,
    Set(String),
}

impl PromptAction {
    fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            PromptAction::Keep
        } else if trimmed == "-" {
            PromptAction::Clear
        } else {
            PromptAction::Set(trimmed.to_string())
        }
    }
}
