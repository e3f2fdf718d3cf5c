//! Command-line interface layer.

use anyhow::Result;

mod args;
mod commands;
mod exit_status;
mod logging;
mod report;

pub use args::{AnalyzeCommand, Arguments, Command, CommonArgs, InspectCommand};
pub use exit_status::ExitStatus;

pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    logging::init_logging(args.verbose());

    let Some(args) = args.with_command_or_help() else {
        return Ok(ExitStatus::Success);
    };

    match args.command {
        Some(Command::Analyze(cmd)) => commands::analyze::analyze(cmd),
        Some(Command::Inspect(cmd)) => commands::inspect::inspect(cmd),
        Some(Command::Init) => commands::init::init(),
        None => Ok(ExitStatus::Success),
    }
}
