mod cli;
mod config;
mod mailer;
mod source;
mod summary;

use crate::cli::{Cli, Commands, ConfigCommands};
use crate::config::Config;
use crate::mailer::{MailConfig, Mailer};
use crate::summary::ProductionReport;
use anyhow::{Context, Result};
use chrono::{Duration, Local, NaiveDate};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Report { date } => handle_report(date),
        Commands::Preview { date } => handle_preview(date),
        Commands::Config { command } => handle_config_command(command),
        Commands::Doctor => handle_doctor(),
    }
}

fn handle_report(date: Option<String>) -> Result<()> {
    let config = Config::load_or_default()?;
    let mail_config = MailConfig::from_env(&config)?;
    let report = build_report(&config, parse_target_date(date)?)?;

    let mailer = Mailer::new(&mail_config)?;
    mailer.send(&report)?;

    println!("Report email sent: {}", report.subject);
    println!("- Recipients: {}", mail_config.recipients.join(", "));

    Ok(())
}

fn handle_preview(date: Option<String>) -> Result<()> {
    let config = Config::load_or_default()?;
    let report = build_report(&config, parse_target_date(date)?)?;

    println!("Subject: {}", report.subject);
    println!();
    println!("{}", report.plain_body);

    Ok(())
}

fn handle_config_command(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Set { key, value } => {
            let mut config = Config::load_or_default()?;
            config.set_value(&key, &value)?;
            config.save()?;

            println!("Config saved: {key} = {value}");
            Ok(())
        }
        ConfigCommands::Get { key } => {
            let config = Config::load_or_default()?;
            let value = config
                .get_value(&key)
                .with_context(|| format!("Unsupported config key: {key}"))?;

            println!("{value}");
            Ok(())
        }
    }
}

fn handle_doctor() -> Result<()> {
    let config_path = Config::config_path();
    let mut issues = Vec::new();

    if config_path.exists() {
        println!("[OK] config.json found: {}", config_path.display());
    } else {
        println!("[WARN] config.json not found: {}", config_path.display());
        issues.push("config missing");
    }

    let config = Config::load_or_default()?;

    if config.input_path.exists() {
        match source::load_records(&config.input_path) {
            Ok(table) => {
                println!("[OK] input file readable: {}", config.input_path.display());
                if table.has_column(source::SCRAP_COLUMN) {
                    println!("[OK] scrap column present; scrap totals will be tracked");
                } else {
                    println!("[OK] scrap column absent; scrap totals fixed at 0");
                }
            }
            Err(error) => {
                println!("[WARN] input file unreadable: {error}");
                issues.push("input unreadable");
            }
        }
    } else {
        println!("[WARN] input file missing: {}", config.input_path.display());
        issues.push("input missing");
    }

    match MailConfig::from_env(&config) {
        Ok(mail_config) => println!(
            "[OK] mail settings complete ({} recipient(s) via {}:{})",
            mail_config.recipients.len(),
            mail_config.smtp_host,
            mail_config.smtp_port
        ),
        Err(error) => {
            println!("[WARN] mail settings incomplete: {error}");
            issues.push("mail settings incomplete");
        }
    }

    if issues.is_empty() {
        println!("doctor result: no issues");
    } else {
        println!("doctor result: {} warning(s)", issues.len());
    }

    Ok(())
}

fn build_report(config: &Config, date: NaiveDate) -> Result<ProductionReport> {
    let table = source::load_records(&config.input_path)?;
    let report = summary::compose_report(&table, date)?;

    Ok(report)
}

fn parse_target_date(input: Option<String>) -> Result<NaiveDate> {
    input
        .as_deref()
        .map(|date| {
            NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .with_context(|| format!("Invalid date format: {date}. Example: 2026-08-06"))
        })
        .transpose()?
        .map_or_else(|| Ok(yesterday()), Ok)
}

// The report always covers the previous local day unless --date overrides it.
fn yesterday() -> NaiveDate {
    Local::now().date_naive() - Duration::days(1)
}
