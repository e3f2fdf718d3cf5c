use anyhow::Result;

use super::super::args::InspectCommand;
use super::super::exit_status::ExitStatus;
use super::super::report;
use super::CommandContext;

pub fn inspect(cmd: InspectCommand) -> Result<ExitStatus> {
    let ctx = CommandContext::new(&cmd.common)?;
    let inspection = ctx
        .plugin
        .inspect(&cmd.types_file, cmd.type_name.as_deref())?;

    report::print_inspection(&inspection);

    if inspection.attributes.is_empty() {
        Ok(ExitStatus::Failure)
    } else {
        Ok(ExitStatus::Success)
    }
}
