use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// docproxy - lazy-loading document proxy generator
#[derive(Parser, Debug)]
#[command(name = "docproxy")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format for CI
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate stand-ins for every mapped document type
    Generate {
        /// Mapping file describing the documents
        #[arg(short, long)]
        mapping: Option<PathBuf>,

        /// Directory to write stand-ins to (defaults to the configured proxy dir)
        #[arg(short, long)]
        dest: Option<PathBuf>,

        /// Namespace for stand-in names (defaults to the configured namespace)
        #[arg(short, long)]
        namespace: Option<String>,

        /// Configuration file (defaults to docproxy.toml, then the user config)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the document type a stand-in name stands for
    Resolve {
        /// Type name, possibly a stand-in name
        name: String,
    },
}
