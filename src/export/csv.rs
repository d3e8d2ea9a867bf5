//! CSV export of check results.
//!
//! One row per nameserver verdict, grouped by zone in input order. Zones
//! whose check failed outright have no rows; they are logged instead.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use csv::WriterBuilder;
use log::warn;
use serde::Serialize;

use crate::config::CSV_HEADER;
use crate::lame::{BulkReport, NameserverVerdict, ProbeStatus, ZoneOutcome};

#[derive(Debug, Serialize)]
struct VerdictRow<'a> {
    zone: &'a str,
    nameserver: &'a str,
    status: ProbeStatus,
}

impl<'a> From<&'a NameserverVerdict> for VerdictRow<'a> {
    fn from(verdict: &'a NameserverVerdict) -> Self {
        Self {
            zone: verdict.zone().as_str(),
            nameserver: verdict.nameserver().as_str(),
            status: verdict.status(),
        }
    }
}

/// Writes `report` as CSV (header `zone,nameserver,status`) into `writer`.
///
/// # Returns
///
/// The number of data rows written.
pub fn write_csv<W: Write>(report: &BulkReport, writer: W) -> Result<usize> {
    let mut csv = WriterBuilder::new().has_headers(false).from_writer(writer);
    csv.write_record(CSV_HEADER)
        .context("Failed to write CSV header")?;

    let mut rows = 0;
    for entry in &report.entries {
        match entry {
            ZoneOutcome::Checked(check) => {
                for verdict in &check.results {
                    csv.serialize(VerdictRow::from(verdict))
                        .context("Failed to write CSV row")?;
                    rows += 1;
                }
            }
            ZoneOutcome::Errored { zone, error } => {
                warn!("No CSV rows for {zone}: {error}");
            }
        }
    }

    csv.flush().context("Failed to flush CSV output")?;
    Ok(rows)
}

/// Exports `report` to `output`, or to stdout when `output` is `None`.
///
/// # Returns
///
/// Returns the number of rows exported, or an error if export fails.
pub fn export_csv(report: &BulkReport, output: Option<&Path>) -> Result<usize> {
    let writer: Box<dyn Write> = match output {
        Some(path) => Box::new(
            File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    write_csv(report, writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::{Nameserver, Zone};
    use crate::lame::{CheckSession, DomainVerdict};

    fn checked(zone: &str, rows: &[(&str, ProbeStatus)]) -> ZoneOutcome {
        let zone = Zone::new(zone).unwrap();
        let results: Vec<NameserverVerdict> = rows
            .iter()
            .map(|(ns, status)| {
                NameserverVerdict::new(zone.clone(), Nameserver::new(ns).unwrap(), *status)
            })
            .collect();
        let mut report = CheckSession::new(zone).into_report();
        report.verdict = DomainVerdict::from_verdicts(&results);
        report.results = results;
        ZoneOutcome::Checked(report)
    }

    #[test]
    fn test_write_csv_groups_rows_by_zone() {
        let report = BulkReport {
            entries: vec![
                checked(
                    "good.example",
                    &[("ns1.good.example", ProbeStatus::Authoritative)],
                ),
                checked(
                    "lame.example",
                    &[
                        ("ns1.lame.example", ProbeStatus::Authoritative),
                        ("ns2.lame.example", ProbeStatus::LameDelegation),
                    ],
                ),
            ],
        };

        let mut buf = Vec::new();
        let rows = write_csv(&report, &mut buf).unwrap();
        assert_eq!(rows, 3);
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "zone,nameserver,status\n\
             good.example.,ns1.good.example.,AUTHORITATIVE\n\
             lame.example.,ns1.lame.example.,AUTHORITATIVE\n\
             lame.example.,ns2.lame.example.,LAME DELEGATION\n"
        );
    }

    #[test]
    fn test_write_csv_skips_errored_zones() {
        let report = BulkReport {
            entries: vec![ZoneOutcome::Errored {
                zone: Zone::new("broken.example").unwrap(),
                error: "connection reset".to_string(),
            }],
        };
        let mut buf = Vec::new();
        assert_eq!(write_csv(&report, &mut buf).unwrap(), 0);
        assert_eq!(String::from_utf8(buf).unwrap(), "zone,nameserver,status\n");
    }

    #[test]
    fn test_export_csv_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let report = BulkReport {
            entries: vec![checked(
                "timeout.example",
                &[("ns1.timeout.example", ProbeStatus::NoResponse)],
            )],
        };
        assert_eq!(export_csv(&report, Some(path.as_path())).unwrap(), 1);
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("timeout.example.,ns1.timeout.example.,UNKNOWN/NO RESPONSE"));
    }
}
