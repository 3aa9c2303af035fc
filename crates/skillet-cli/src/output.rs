//! Human-readable rendering of command results.

use std::io::{self, Write};

use console::style;

use skillet_core::commands::InstallOutcome;
use skillet_core::error::Suggestion;
use skillet_core::integration::Integration;
use skillet_core::skills::installer::InstallStatus;
use skillet_core::types::InstallScope;
use skillet_core::update::{Freshness, OutdatedReport, UpdateSummary};

pub fn print_install<W: Write>(w: &mut W, outcome: &InstallOutcome) -> io::Result<()> {
    let report = &outcome.report;
    if outcome.plan.defaulted {
        writeln!(
            w,
            "No integration detected; installing for {}",
            style(outcome.plan.integrations.iter().map(|i| i.id()).collect::<Vec<_>>().join(", ")).cyan()
        )?;
    }
    for skipped in &outcome.plan.skipped {
        writeln!(
            w,
            "  {} {} (no {} scope support)",
            style("-").dim(),
            skipped,
            outcome.plan.scope
        )?;
    }

    for (target, success) in report.succeeded() {
        let note = if success.changed { "" } else { " (unchanged)" };
        writeln!(
            w,
            "  {} {} -> {}{}",
            style("✓").green(),
            target.integration,
            target.install_path.display(),
            note
        )?;
        if !success.metadata_written {
            writeln!(
                w,
                "    {} provenance not recorded; `skillet update` will skip it",
                style("Warning:").yellow()
            )?;
        }
    }
    for (target, reason) in report.failed() {
        writeln!(w, "  {} {}: {}", style("✗").red(), target.integration, reason)?;
    }

    match report.status() {
        InstallStatus::Complete => writeln!(
            w,
            "Installed {}",
            style(&report.skill_name).green().bold()
        ),
        InstallStatus::Partial => writeln!(
            w,
            "Installed {} for some targets only",
            style(&report.skill_name).yellow().bold()
        ),
        InstallStatus::Failed => writeln!(w, "Failed to install {}", report.skill_name),
    }
}

pub fn print_suggestions<W: Write>(w: &mut W, message: &str, suggestions: &[Suggestion]) -> io::Result<()> {
    writeln!(w, "{}", message)?;
    if suggestions.is_empty() {
        return Ok(());
    }
    writeln!(w, "{}", style("Suggestions:").bold())?;
    for suggestion in suggestions {
        writeln!(w, "  skillet add {}", suggestion)?;
    }
    Ok(())
}

pub fn print_update_summary<W: Write>(w: &mut W, summary: &UpdateSummary) -> io::Result<()> {
    writeln!(
        w,
        "Updated {}, skipped {}",
        style(summary.updated).green(),
        style(summary.skipped).yellow()
    )?;
    for issue in &summary.issues {
        writeln!(w, "  {} {}: {}", style("-").dim(), issue.name, issue.reason)?;
    }
    Ok(())
}

pub fn print_outdated<W: Write>(w: &mut W, reports: &[OutdatedReport]) -> io::Result<()> {
    if reports.is_empty() {
        return writeln!(w, "No installed skills found");
    }
    let width = reports.iter().map(|r| r.name.len()).max().unwrap_or(0);
    for report in reports {
        let state = match &report.freshness {
            Freshness::UpToDate => style("up to date".to_string()).green(),
            Freshness::Outdated { latest } => {
                style(format!("outdated (latest {})", short_sha(latest))).yellow()
            }
            Freshness::Unknown(reason) => style(format!("unknown: {}", reason)).dim(),
        };
        writeln!(w, "{:width$}  {}", report.name, state, width = width)?;
    }
    Ok(())
}

pub fn outdated_json(reports: &[OutdatedReport]) -> serde_json::Value {
    let entries: Vec<_> = reports
        .iter()
        .map(|r| {
            let (state, detail) = match &r.freshness {
                Freshness::UpToDate => ("up-to-date", None),
                Freshness::Outdated { latest } => ("outdated", Some(latest.clone())),
                Freshness::Unknown(reason) => ("unknown", Some(reason.clone())),
            };
            serde_json::json!({
                "name": r.name,
                "path": r.install_path.display().to_string(),
                "state": state,
                "detail": detail,
            })
        })
        .collect();
    serde_json::Value::Array(entries)
}

pub fn print_targets<W: Write>(w: &mut W) -> io::Result<()> {
    writeln!(w, "{:<12} {:<16} {}", "ID", "STRATEGY", "SCOPES")?;
    writeln!(w, "{}", "-".repeat(44))?;
    for integration in Integration::ALL {
        let scopes = [InstallScope::Project, InstallScope::Global]
            .into_iter()
            .filter(|scope| integration.supports(*scope))
            .map(InstallScope::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(
            w,
            "{:<12} {:<16} {}",
            integration.id(),
            format!("{:?}", integration.strategy()),
            scopes
        )?;
    }
    Ok(())
}

fn short_sha(sha: &str) -> &str {
    sha.get(..7).unwrap_or(sha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillet_core::update::UpdateIssue;
    use std::path::PathBuf;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        console::strip_ansi_codes(&String::from_utf8(buf).unwrap()).into_owned()
    }

    #[test]
    fn targets_table_lists_every_integration() {
        let out = render(|w| print_targets(w));
        for integration in Integration::ALL {
            assert!(out.contains(integration.id()));
        }
        assert!(out.contains("cursor       PerFileCopy      project\n"));
    }

    #[test]
    fn suggestions_are_rendered_as_commands() {
        let suggestions = vec![Suggestion {
            repo: "acme/skills".into(),
            path: Some("pdf/SKILL.md".into()),
            description: None,
        }];
        let out = render(|w| print_suggestions(w, "No skill named 'pdf' found", &suggestions));
        assert!(out.contains("skillet add acme/skills (pdf/SKILL.md)"));
    }

    #[test]
    fn update_summary_lists_issues() {
        let summary = UpdateSummary {
            updated: 2,
            skipped: 1,
            issues: vec![UpdateIssue {
                name: "lint".into(),
                reason: "missing repo URL".into(),
            }],
        };
        let out = render(|w| print_update_summary(w, &summary));
        assert!(out.starts_with("Updated 2, skipped 1"));
        assert!(out.contains("lint: missing repo URL"));
    }

    #[test]
    fn outdated_shows_short_sha() {
        let reports = vec![OutdatedReport {
            name: "pdf".into(),
            install_path: PathBuf::from("/p/.claude/skills/pdf"),
            freshness: Freshness::Outdated {
                latest: "0123456789abcdef".into(),
            },
        }];
        let out = render(|w| print_outdated(w, &reports));
        assert!(out.contains("outdated (latest 0123456)"));

        let json = outdated_json(&reports);
        assert_eq!(json[0]["state"], "outdated");
    }
}
