use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "prodreport",
    about = "Daily Production Summary & Email Report System"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compose yesterday's production summary and email it
    Report {
        #[arg(long)]
        date: Option<String>,
    },
    /// Compose the report and print it without sending
    Preview {
        #[arg(long)]
        date: Option<String>,
    },
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    Doctor,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    Set { key: String, value: String },
    Get { key: String },
}
