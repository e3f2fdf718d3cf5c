//! Report formatting and printing utilities.
//!
//! Separate from core logic so tagmeta can be used as a library. Every
//! printer has a `*_to` variant taking a writer, for tests.

use std::io::{self, Write};
use std::path::Path;

use colored::Colorize;

use crate::config::CONFIG_FILE_NAME;
use crate::core::plugin::{Inspection, PluginOutcome, SkipReason};
use crate::core::project::ProjectReport;

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{count} {word}")
    } else {
        format!("{count} {word}s")
    }
}

/// Print the summary of an `analyze` run.
///
/// With `to_stderr` the summary stays off stdout (used with `--stdout`).
pub fn print_analyze(report: &ProjectReport, out_file: Option<&Path>, verbose: bool, to_stderr: bool) {
    if to_stderr {
        print_analyze_to(report, out_file, verbose, &mut io::stderr().lock());
    } else {
        print_analyze_to(report, out_file, verbose, &mut io::stdout().lock());
    }
    print_parse_warning(report.parse_failures.len(), verbose);
}

pub fn print_analyze_to<W: Write>(
    report: &ProjectReport,
    out_file: Option<&Path>,
    verbose: bool,
    writer: &mut W,
) {
    if verbose {
        for registration in &report.outcomes {
            print_outcome(&registration.module, &registration.outcome, writer);
        }
        for failure in &report.parse_failures {
            let _ = writeln!(
                writer,
                "{} {}: {}",
                "warning:".bold().yellow(),
                failure.path,
                failure.message
            );
        }
    }

    let manifest = &report.manifest;
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Analyzed {} - {}, {}",
            plural(report.files_scanned, "source file"),
            plural(manifest.declaration_count(), "declaration"),
            plural(manifest.attribute_count(), "attribute"),
        )
        .green()
    );

    if let Some(path) = out_file {
        let _ = writeln!(writer, "  Wrote {}", path.display().to_string().cyan());
    }
}

fn print_outcome<W: Write>(module: &str, outcome: &PluginOutcome, writer: &mut W) {
    let detail = match outcome {
        PluginOutcome::Merged {
            provenance, added, ..
        } => format!("{provenance}, {} added", plural(*added, "attribute")),
        PluginOutcome::Skipped {
            reason: SkipReason::NoCompanion,
            ..
        } => "no companion types file".dimmed().to_string(),
        PluginOutcome::Skipped {
            reason: SkipReason::UnreadableCompanion(path),
            ..
        } => format!("cannot read {}", path.display()).yellow().to_string(),
    };
    let _ = writeln!(
        writer,
        "  <{}> {} {}",
        outcome.tag_name().bold(),
        module.dimmed(),
        detail
    );
}

/// Print a warning about modules that could not be parsed.
pub fn print_parse_warning(count: usize, verbose: bool) {
    print_parse_warning_to(count, verbose, &mut io::stderr().lock());
}

pub fn print_parse_warning_to<W: Write>(count: usize, verbose: bool, writer: &mut W) {
    if count > 0 && !verbose {
        let _ = writeln!(
            writer,
            "{} {} file(s) could not be parsed (use {} for details)",
            "warning:".bold().yellow(),
            count,
            "-v".cyan()
        );
    }
}

/// Print the result of `inspect`.
pub fn print_inspection(inspection: &Inspection) {
    print_inspection_to(inspection, &mut io::stdout().lock());
}

pub fn print_inspection_to<W: Write>(inspection: &Inspection, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} {}",
        inspection.types_file.display().to_string().bold(),
        format!("({})", inspection.provenance).dimmed()
    );

    if inspection.attributes.is_empty() {
        let tried = if inspection.candidates.is_empty() {
            String::new()
        } else {
            format!(" (tried {})", inspection.candidates.join(", "))
        };
        let _ = writeln!(
            writer,
            "{} No attributes found{}",
            FAILURE_MARK.red(),
            tried
        );
        return;
    }

    for attr in &inspection.attributes {
        let optional = if attr.optional { "?" } else { "" };
        let _ = writeln!(
            writer,
            "  {}{}: {}  [{}]",
            attr.name.bold(),
            optional,
            attr.ty.text,
            attr.serialized_as.as_str().cyan()
        );
        let _ = writeln!(writer, "      {}", attr.description.dimmed());
    }
}

pub fn print_init() {
    println!(
        "{} {}",
        SUCCESS_MARK.green(),
        format!("Created {}", CONFIG_FILE_NAME).green()
    );
}
