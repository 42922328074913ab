//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Hierarchical XML configuration manager: inheritance merge, chain resolution, and container building
#[derive(Parser, Debug)]
#[command(name = "rsconf")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase debug output (-D, -DD, -DDD)
    #[arg(short = 'D', long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Definitions directory (default: from settings)
    #[arg(short = 'd', long = "definitions", global = true, value_hint = ValueHint::DirPath)]
    pub definitions: Option<PathBuf>,

    /// Generate shell completions
    #[arg(long = "generate", value_enum)]
    pub generator: Option<clap_complete::Shell>,

    /// Print author and version info
    #[arg(long)]
    pub info: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Merge XML documents pairwise, left to right
    Merge {
        /// Documents to merge, most general first
        #[arg(value_hint = ValueHint::FilePath, num_args = 2..)]
        files: Vec<PathBuf>,

        /// Write the result to a file instead of stdout
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Print the fully merged document for a named definition
    Resolve {
        /// Definition name
        name: String,
    },

    /// Print the inheritance chain for a named definition
    Chain {
        /// Definition name
        name: String,
    },

    /// Show the extends hierarchy of all definitions
    Tree,

    /// List definitions with their reserved attributes
    List,
}
