//! `ctree substitute <context.json>`: personalize text with course keywords.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use coursetree_core::keywords::{KeywordMap, SubstitutionContext};
use serde::Serialize;
use tracing::debug;

use super::{read_input, read_json};
use crate::output::{OutputMode, render_mode};

/// Arguments for `ctree substitute`.
#[derive(Args, Debug)]
#[command(group = clap::ArgGroup::new("source").required(true).args(["text", "file"]))]
pub struct SubstituteArgs {
    /// JSON file with the user and course data (`-` for stdin).
    pub context: PathBuf,

    /// Text to personalize.
    #[arg(long)]
    pub text: Option<String>,

    /// File holding the text to personalize.
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct SubstituteOutput {
    text: String,
    keywords: Vec<String>,
}

/// Execute `ctree substitute`.
pub fn run_substitute(args: &SubstituteArgs, output: OutputMode) -> anyhow::Result<()> {
    let ctx: SubstitutionContext = read_json(&args.context)?;
    let template = match (&args.text, &args.file) {
        (Some(text), _) => text.clone(),
        (None, Some(file)) => read_input(file)?,
        (None, None) => anyhow::bail!("one of --text or --file is required"),
    };

    let keywords = KeywordMap::standard();
    let used: Vec<String> = keywords
        .tags()
        .filter(|tag| template.contains(tag))
        .map(str::to_string)
        .collect();
    debug!(?used, "keywords present in template");

    let result = SubstituteOutput {
        text: keywords.substitute(&template, &ctx),
        keywords: used,
    };

    render_mode(output, &result, render_plain, render_plain)
}

fn render_plain(result: &SubstituteOutput, w: &mut dyn Write) -> std::io::Result<()> {
    if result.text.ends_with('\n') {
        write!(w, "{}", result.text)
    } else {
        writeln!(w, "{}", result.text)
    }
}
