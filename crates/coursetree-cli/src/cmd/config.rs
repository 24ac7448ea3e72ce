//! `ctree config`: show the effective configuration.

use std::io::Write;

use coursetree_core::config::{EffectiveConfig, ProjectConfig, UserConfig, project_config_path};
use serde::Serialize;

use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

#[derive(Debug, Serialize)]
struct ConfigReport<'a> {
    project: &'a ProjectConfig,
    user: &'a UserConfig,
    resolved_output: OutputMode,
}

/// Execute `ctree config`. `output` is the mode this invocation renders
/// with, after flags, `FORMAT`, config and TTY detection.
pub fn run_config(config: &EffectiveConfig, output: OutputMode) -> anyhow::Result<()> {
    let report = ConfigReport {
        project: &config.project,
        user: &config.user,
        resolved_output: output,
    };
    render_mode(output, &report, render_text, render_pretty)
}

const fn mode_name(mode: OutputMode) -> &'static str {
    match mode {
        OutputMode::Pretty => "pretty",
        OutputMode::Text => "text",
        OutputMode::Json => "json",
    }
}

fn render_text(report: &ConfigReport<'_>, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(
        w,
        "roots.use_parent_category={}",
        report.project.roots.use_parent_category
    )?;
    writeln!(w, "output={}", mode_name(report.resolved_output))
}

fn render_pretty(report: &ConfigReport<'_>, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "Effective configuration")?;
    let project_file = std::env::current_dir()
        .map(|root| project_config_path(&root).display().to_string())
        .unwrap_or_default();
    pretty_kv(w, "project", project_file)?;
    pretty_kv(
        w,
        "promotion",
        report.project.roots.use_parent_category.to_string(),
    )?;
    pretty_kv(w, "output", mode_name(report.resolved_output))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_reports_the_mode_in_use() {
        let project = ProjectConfig::default();
        let user = UserConfig {
            output: Some("json".to_string()),
        };
        let report = ConfigReport {
            project: &project,
            user: &user,
            resolved_output: OutputMode::Text,
        };

        let mut buf = Vec::new();
        render_text(&report, &mut buf).expect("render");
        assert_eq!(
            String::from_utf8(buf).expect("utf8"),
            "roots.use_parent_category=true\noutput=text\n"
        );

        let json = serde_json::to_value(&report).expect("serialize");
        assert_eq!(json["resolved_output"], "text");
        assert_eq!(json["user"]["output"], "json");
    }
}
