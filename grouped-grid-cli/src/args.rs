//! Command-line arguments

use std::path::PathBuf;

use clap::Args;
use clap::Parser;
use clap::Subcommand;

#[derive(Debug, Parser)]
#[command(name = "grouped-grid")]
#[command(about = "Render Dataverse datasets as grouped grids", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write the log to this file instead of the platform cache directory
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Group and print a dataset
    Render {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        grid: GridArgs,

        /// Attributes to fetch when reading from the Web API
        #[arg(long, value_delimiter = ',')]
        columns: Vec<String>,

        /// Maximum records to fetch from the Web API
        #[arg(long, default_value_t = 50)]
        top: usize,
    },

    /// Print the declared options of a choice column
    Options {
        #[command(flatten)]
        source: SourceArgs,

        column: String,
    },

    /// Search the target entity of a lookup column
    Lookup {
        #[command(flatten)]
        source: SourceArgs,

        column: String,

        text: String,
    },

    /// Open a record form in the browser
    Open {
        #[command(flatten)]
        source: SourceArgs,

        /// Entity of the record (defaults to the source entity)
        #[arg(long)]
        target: Option<String>,

        id: String,
    },
}

/// Where the dataset and its metadata come from.
#[derive(Debug, Args)]
pub struct SourceArgs {
    /// Dataset snapshot in JSON
    #[arg(long, conflicts_with = "url")]
    pub snapshot: Option<PathBuf>,

    /// Environment URL, e.g. https://org.crm.dynamics.com
    #[arg(long)]
    pub url: Option<String>,

    /// Entity logical name (taken from the snapshot when omitted)
    #[arg(long)]
    pub entity: Option<String>,
}

/// Overrides for the grid configuration.
#[derive(Debug, Default, Args)]
pub struct GridArgs {
    /// Primary grouping column
    #[arg(long)]
    pub group_by: Option<String>,

    /// Secondary grouping column
    #[arg(long, requires = "group_by")]
    pub then_by: Option<String>,

    /// Start with every group collapsed
    #[arg(long)]
    pub collapsed: bool,

    /// Toggle a group by key (repeatable)
    #[arg(long = "toggle")]
    pub toggles: Vec<String>,

    /// Container width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}
