//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `analyze`: Scan the project and write the custom-element manifest
//! - `inspect`: Show the attributes extracted from one companion types file
//! - `init`: Initialize tagmeta configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Analyze(cmd)) => cmd.common.verbose,
            Some(Command::Inspect(cmd)) => cmd.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by `analyze` and `inspect`.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Project root to scan and to search the config file from
    #[arg(long)]
    pub source_root: Option<PathBuf>,

    /// Only read config types syntactically (overrides config file)
    #[arg(long)]
    pub no_semantic: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct AnalyzeCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Manifest output path (overrides config file)
    #[arg(long, conflicts_with = "stdout")]
    pub out_file: Option<PathBuf>,

    /// Print the manifest to stdout instead of writing a file
    #[arg(long)]
    pub stdout: bool,

    /// Exit with status 1 when a module could not be parsed
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Args)]
pub struct InspectCommand {
    /// Companion types file (`*.types.d.ts` or `*.types.ts`)
    pub types_file: PathBuf,

    /// Config type name (default: derived from the file name)
    #[arg(long = "type", value_name = "NAME")]
    pub type_name: Option<String>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract element attributes from companion types and write the manifest
    Analyze(AnalyzeCommand),
    /// Print the attributes extracted from a single companion types file
    Inspect(InspectCommand),
    /// Initialize a new .tagmetarc.json configuration file
    Init,
}
