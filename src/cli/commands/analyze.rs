use std::fs;

use anyhow::{Context, Result};

use super::super::args::AnalyzeCommand;
use super::super::exit_status::ExitStatus;
use super::super::report;
use super::CommandContext;
use crate::core::project::analyze_project;

pub fn analyze(cmd: AnalyzeCommand) -> Result<ExitStatus> {
    let ctx = CommandContext::new(&cmd.common)?;
    let project = analyze_project(&ctx.root, &ctx.config, &ctx.plugin);

    let json = serde_json::to_string_pretty(&project.manifest)
        .context("Failed to serialize manifest")?;

    let out_file = if cmd.stdout {
        println!("{json}");
        None
    } else {
        let path = cmd.out_file.unwrap_or_else(|| ctx.default_out_file());
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        fs::write(&path, format!("{json}\n"))
            .with_context(|| format!("Failed to write manifest: {}", path.display()))?;
        Some(path)
    };

    report::print_analyze(&project, out_file.as_deref(), cmd.common.verbose, cmd.stdout);

    if cmd.strict && !project.parse_failures.is_empty() {
        Ok(ExitStatus::Failure)
    } else {
        Ok(ExitStatus::Success)
    }
}
