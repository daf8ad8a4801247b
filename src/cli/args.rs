//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

/// Hierarchical label selection: derive tags from a classification forest
#[derive(Parser, Debug)]
#[command(name = "labeltree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Project directory holding .labeltree.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Forest plus the selection to build on it.
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Forest file (.json or .toml); falls back to the configured forest
    #[arg(value_hint = ValueHint::FilePath)]
    pub forest: Option<PathBuf>,

    /// Domain deciding the encoding policy (location, education or a custom name)
    #[arg(short, long)]
    pub domain: Option<String>,

    /// Stored tags to seed the selection from
    #[arg(short, long, value_delimiter = ',')]
    pub tags: Vec<String>,

    /// JSON file with stored tags to seed the selection from
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub tags_file: Option<PathBuf>,

    /// Node to toggle: a label, else a '/'-separated path of names (repeatable)
    #[arg(long = "toggle", value_name = "REF")]
    pub toggles: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the tags derived from a selection
    Tags {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Write the tags as a JSON array to this file
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        write: Option<PathBuf>,

        /// Print tags as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Show the forest with selection checkboxes
    Tree {
        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// List leaf labels with their paths
    Leaves {
        /// Forest file (.json or .toml)
        #[arg(value_hint = ValueHint::FilePath)]
        forest: Option<PathBuf>,
    },

    /// Validate a forest and show statistics
    Check {
        /// Forest file (.json or .toml)
        #[arg(value_hint = ValueHint::FilePath)]
        forest: Option<PathBuf>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Print config template
    Template,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}
