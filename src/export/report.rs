//! Text report of one zone's check.

use std::fmt::Write;

use crate::lame::{CheckReport, DomainVerdict};

/// Renders the verdict, any delegation drift, and the per-nameserver table.
pub fn render_report(report: &CheckReport) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_report(&mut out, report);
    out
}

fn write_report(out: &mut String, report: &CheckReport) -> std::fmt::Result {
    writeln!(out)?;
    match report.verdict {
        DomainVerdict::Failed => {
            writeln!(
                out,
                "Failed to perform DNS queries for {}: no nameservers could be checked",
                report.zone
            )?;
            writeln!(out)?;
            return Ok(());
        }
        DomainVerdict::Lame => {
            writeln!(out, "LAME DELEGATIONS DETECTED")?;
            writeln!(out)?;
        }
        DomainVerdict::Indeterminate => {
            writeln!(out, "Could not determine status of all servers")?;
            writeln!(out, "You may wish to test again")?;
            writeln!(out)?;
        }
        DomainVerdict::Clean => {
            writeln!(out, "Fantastic: No lame servers detected!")?;
            writeln!(out)?;
        }
    }

    let parent_only = report.parent_only();
    let authoritative_only = report.authoritative_only();
    if !parent_only.is_empty() {
        writeln!(out, "Delegated by parent but not listed by the zone: {}", join(&parent_only))?;
    }
    if !authoritative_only.is_empty() {
        writeln!(out, "Listed by the zone but not delegated by parent: {}", join(&authoritative_only))?;
    }
    if !parent_only.is_empty() || !authoritative_only.is_empty() {
        writeln!(out)?;
    }

    writeln!(out, "Nameserver:  Status")?;
    for verdict in &report.results {
        writeln!(out, "{}: {}", verdict.nameserver(), verdict.status())?;
    }
    writeln!(out)
}

fn join<T: std::fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
