use clap::{Parser, Subcommand};

/// Command-line interface definition for covidvisor
/// Voice assistant answering questions about COVID case counts stored in SQLite
#[derive(Parser)]
#[command(
    name = "covidvisor",
    version = env!("CARGO_PKG_VERSION"),
    about = "Ask spoken questions about COVID case counts, answered from a local SQLite dataset",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Inspect the database
    Db {
        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Seed the database from the wide-format CSV dataset (only if empty)
    Seed {
        /// Dataset path (default: `dataset` from the configuration)
        #[arg(long, value_name = "FILE")]
        file: Option<String>,
    },

    /// Answer a structured intent (JSON) directly from the database
    Query {
        /// e.g. '{"intent":"sum_cases_duration","entities":{"location":"Kerala"}}'
        intent: String,

        /// Reference date for "today" (YYYY-MM-DD, default: current date)
        #[arg(long, value_name = "DATE")]
        today: Option<String>,
    },

    /// Answer one typed question through the interpreters
    Ask {
        question: String,
    },

    /// Interactive voice loop: record, transcribe, answer, speak
    Listen,
}
