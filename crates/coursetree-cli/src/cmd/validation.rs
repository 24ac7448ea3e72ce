//! `ctree validation <messages.json>`: summarize a component's validation
//! messages the way the authoring page shows them.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use coursetree_core::validation::{MessageType, ValidationMessage, ValidationMessages};
use serde::Serialize;

use super::read_json;
use crate::output::{OutputMode, pretty_rule, render_mode};

/// Arguments for `ctree validation`.
#[derive(Args, Debug)]
pub struct ValidationArgs {
    /// JSON file with the component's validation messages (`-` for stdin).
    pub input: PathBuf,

    /// Render as an inline child instead of the page root.
    #[arg(long)]
    pub inline: bool,
}

#[derive(Debug, Serialize)]
struct ValidationReport<'a> {
    summary: ValidationMessage,
    detailed_messages: &'a [ValidationMessage],
    additional_classes: &'a str,
    error_count: usize,
    warning_count: usize,
}

fn build_report(messages: &ValidationMessages, is_root: bool) -> ValidationReport<'_> {
    let count = |kind| {
        messages
            .messages()
            .iter()
            .filter(|m| m.message_type == kind)
            .count()
    };
    ValidationReport {
        summary: messages.summary(),
        detailed_messages: messages.detailed_messages(is_root),
        additional_classes: messages.additional_classes(is_root),
        error_count: count(MessageType::Error),
        warning_count: count(MessageType::Warning),
    }
}

/// Execute `ctree validation`.
pub fn run_validation(args: &ValidationArgs, output: OutputMode) -> anyhow::Result<()> {
    let messages: ValidationMessages = read_json(&args.input)?;
    let report = build_report(&messages, !args.inline);
    render_mode(output, &report, render_text, render_pretty)
}

fn render_text(report: &ValidationReport<'_>, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "{}\t{}", report.summary.message_type, report.summary.text)?;
    for message in report.detailed_messages {
        writeln!(w, "{}\t{}", message.message_type, message.text)?;
    }
    Ok(())
}

fn render_pretty(report: &ValidationReport<'_>, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "{}", report.summary.labelled())?;
    pretty_rule(w)?;
    for message in report.detailed_messages {
        writeln!(w, "  {}", message.labelled())?;
    }
    writeln!(
        w,
        "{} error(s), {} warning(s)",
        report.error_count, report.warning_count
    )
}
