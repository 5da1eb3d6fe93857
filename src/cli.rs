use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "fintrack")]
#[command(author, version, about = "Telegram bot for tracking shared expenses", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the bot (long polling)
    Run,

    /// Create the database tables and exit
    InitDb,

    /// Print the resolved configuration with secrets masked
    CheckConfig,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
