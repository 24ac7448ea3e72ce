//! `ctree roots <nodes.json>`: draft subtree roots of an exported node list.
//!
//! Reads a JSON array of content nodes and prints the topmost draft of each
//! subtree. With `--group` every root is followed by the nodes it owns.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use coursetree_core::graph::drafts::DraftForest;
use coursetree_core::model::ContentNode;
use serde::Serialize;
use tracing::info;

use super::read_json;
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `ctree roots`.
#[derive(Args, Debug)]
pub struct RootsArgs {
    /// JSON file holding the node list (`-` for stdin).
    pub input: PathBuf,

    /// Promote drafts whose parent is a sequential (overrides config).
    #[arg(long, conflicts_with = "structural_only")]
    pub use_parent_category: bool,

    /// Only treat drafts whose parent is missing as roots (overrides config).
    #[arg(long)]
    pub structural_only: bool,

    /// List the nodes owned by each root.
    #[arg(long)]
    pub group: bool,
}

impl RootsArgs {
    /// Effective promotion setting: flags first, then config.
    pub fn promotion(&self, configured: bool) -> bool {
        if self.use_parent_category {
            true
        } else if self.structural_only {
            false
        } else {
            configured
        }
    }
}

#[derive(Debug, Serialize)]
struct RootEntry {
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    members: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct RootsReport {
    node_count: usize,
    use_parent_category: bool,
    roots: Vec<RootEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    unowned: Vec<String>,
}

fn build_report(nodes: &[ContentNode], use_parent_category: bool, group: bool) -> RootsReport {
    let forest = DraftForest::build(nodes, use_parent_category);

    let roots = forest
        .roots()
        .iter()
        .map(|root| RootEntry {
            id: root.id.clone(),
            parent_id: root.parent_id.clone(),
            parent_category: root.parent_category.as_ref().map(ToString::to_string),
            members: group.then(|| {
                forest
                    .subtree(&root.id)
                    .into_iter()
                    .skip(1)
                    .map(|n| n.id.clone())
                    .collect()
            }),
        })
        .collect();

    let unowned = if group {
        forest.orphans().into_iter().map(|n| n.id.clone()).collect()
    } else {
        Vec::new()
    };

    RootsReport {
        node_count: nodes.len(),
        use_parent_category,
        roots,
        unowned,
    }
}

/// Execute `ctree roots`.
pub fn run_roots(args: &RootsArgs, configured_promotion: bool, output: OutputMode) -> anyhow::Result<()> {
    let nodes: Vec<ContentNode> = read_json(&args.input)?;
    let use_parent_category = args.promotion(configured_promotion);
    let report = build_report(&nodes, use_parent_category, args.group);

    info!(
        nodes = report.node_count,
        roots = report.roots.len(),
        use_parent_category,
        "resolved draft roots"
    );

    render_mode(output, &report, render_text, render_pretty)
}

fn render_text(report: &RootsReport, w: &mut dyn Write) -> std::io::Result<()> {
    for root in &report.roots {
        match &root.members {
            Some(members) if !members.is_empty() => {
                writeln!(w, "{}\t{}", root.id, members.join(","))?;
            }
            _ => writeln!(w, "{}", root.id)?,
        }
    }
    Ok(())
}

fn render_pretty(report: &RootsReport, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "Draft subtree roots")?;
    pretty_kv(w, "nodes", report.node_count.to_string())?;
    pretty_kv(w, "roots", report.roots.len().to_string())?;
    pretty_kv(
        w,
        "promotion",
        if report.use_parent_category {
            "sequential parents"
        } else {
            "off"
        },
    )?;
    writeln!(w)?;

    for root in &report.roots {
        let parent = root.parent_id.as_deref().unwrap_or("-");
        match &root.parent_category {
            Some(category) => writeln!(w, "{}  (parent {parent}, {category})", root.id)?,
            None => writeln!(w, "{}  (parent {parent})", root.id)?,
        }
        if let Some(members) = &root.members {
            for member in members {
                writeln!(w, "  └── {member}")?;
            }
        }
    }

    if !report.unowned.is_empty() {
        writeln!(w)?;
        pretty_kv(w, "unowned", report.unowned.join(", "))?;
    }
    Ok(())
}
