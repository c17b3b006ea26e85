use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "registration-bot")]
#[command(author, version, about = "Telegram bot that collects tournament registrations", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the bot with long polling (default)
    Run,

    /// Create the database file and apply migrations, then exit
    InitDb,

    /// Print submission totals and team counts, then exit
    Stats,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
