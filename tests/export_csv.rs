//! Tests for CSV export of bulk results.

use std::net::Ipv4Addr;

use hickory_proto::rr::RecordType;
use lame_delegation::export::{export_csv, write_csv};
use lame_delegation::{CheckOptions, LameChecker, Zone};
use tempfile::TempDir;

#[path = "helpers.rs"]
mod helpers;

use helpers::{example_tld, ns_answer};

async fn bulk_good_and_lame() -> lame_delegation::BulkReport {
    let client = example_tld()
        .delegate("good.example.", &["ns1.good.example."])
        .delegate("lame.example.", &["ns1.lame.example.", "ns2.lame.example."])
        .host("ns1.good.example.", Ipv4Addr::new(192, 0, 2, 41))
        .host("ns1.lame.example.", Ipv4Addr::new(192, 0, 2, 42))
        .host("ns2.lame.example.", Ipv4Addr::new(192, 0, 2, 43))
        .on(
            "192.0.2.41:53",
            "good.example.",
            RecordType::NS,
            ns_answer("good.example.", &["ns1.good.example."], true),
        )
        .on(
            "192.0.2.42:53",
            "lame.example.",
            RecordType::NS,
            ns_answer("lame.example.", &["ns1.lame.example.", "ns2.lame.example."], true),
        )
        .on(
            "192.0.2.43:53",
            "lame.example.",
            RecordType::NS,
            ns_answer("lame.example.", &["ns1.lame.example.", "ns2.lame.example."], false),
        )
        .into_client();

    let zones = vec![
        Zone::new("good.example").unwrap(),
        Zone::new("lame.example").unwrap(),
    ];
    LameChecker::new(client, CheckOptions::default())
        .check_bulk(&zones)
        .await
}

#[tokio::test]
async fn test_csv_rows_grouped_by_zone() {
    let report = bulk_good_and_lame().await;

    let mut buf = Vec::new();
    let rows = write_csv(&report, &mut buf).unwrap();
    let csv = String::from_utf8(buf).unwrap();

    assert_eq!(rows, 3);
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines,
        vec![
            "zone,nameserver,status",
            "good.example.,ns1.good.example.,AUTHORITATIVE",
            "lame.example.,ns1.lame.example.,AUTHORITATIVE",
            "lame.example.,ns2.lame.example.,LAME DELEGATION",
        ]
    );
}

#[tokio::test]
async fn test_export_csv_to_file() {
    let report = bulk_good_and_lame().await;
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("results.csv");

    let rows = export_csv(&report, Some(path.as_path())).unwrap();
    assert_eq!(rows, 3);

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(headers.iter().collect::<Vec<_>>(), vec!["zone", "nameserver", "status"]);
    let lame_rows = reader
        .records()
        .map(|r| r.unwrap())
        .filter(|r| &r[2] == "LAME DELEGATION")
        .count();
    assert_eq!(lame_rows, 1);
}

#[test]
fn test_export_csv_bad_path_is_error() {
    let report = lame_delegation::BulkReport::default();
    let result = export_csv(&report, Some(std::path::Path::new("/nonexistent/dir/out.csv")));
    assert!(result.is_err());
}
