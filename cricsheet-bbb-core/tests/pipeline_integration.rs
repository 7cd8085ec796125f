mod common;

use chrono::NaiveDate;
use cricsheet_bbb_core::assemble::AssembleError;
use cricsheet_bbb_core::config::{DateWindow, PipelineConfig, SeriesConfig};
use cricsheet_bbb_core::contract::{FetchError, FetchedArchive, MockArchiveFetcher};
use cricsheet_bbb_core::filter::RejectReason;
use cricsheet_bbb_core::flatten::COLUMNS;
use cricsheet_bbb_core::pipeline::{build_dataset, run, PipelineError};
use tempfile::tempdir;

fn fetcher_returning(bytes: Vec<u8>) -> MockArchiveFetcher {
    let mut fetcher = MockArchiveFetcher::new();
    fetcher.expect_fetch().times(1).return_once(move || {
        Ok(FetchedArchive {
            origin: "memory://tests_json.zip".to_string(),
            bytes,
        })
    });
    fetcher
}

/// Two series matches, one outside the window, one ODI, one wrong pairing,
/// one broken file.
fn mixed_archive() -> Vec<u8> {
    common::zip_archive(&[
        ("1448345.json", common::json_bytes(&common::target_match())),
        (
            "1234567.json",
            common::json_bytes(&common::match_json(&["India", "England"], &["2021-08-04"], Some("Test"))),
        ),
        (
            "1448346.json",
            common::json_bytes(&common::match_json(&["India", "England"], &["2025-07-02"], None)),
        ),
        (
            "1400001.json",
            common::json_bytes(&common::match_json(&["India", "England"], &["2025-07-12"], Some("ODI"))),
        ),
        (
            "1400002.json",
            common::json_bytes(&common::match_json(&["Australia", "England"], &["2025-07-12"], Some("Test"))),
        ),
        ("1400003.json", b"{\"info\": 7}".to_vec()),
    ])
}

#[tokio::test]
async fn builds_dataset_from_matching_documents_only() {
    let fetcher = fetcher_returning(mixed_archive());
    let dataset = build_dataset(&SeriesConfig::default(), &fetcher)
        .await
        .expect("pipeline succeeds");

    let report = &dataset.report;
    assert_eq!(report.entries_scanned, 6);
    assert_eq!(report.accepted_entries, vec!["1448345.json", "1448346.json"]);
    assert_eq!(report.rejected_for(RejectReason::DateWindow), 1);
    assert_eq!(report.rejected_for(RejectReason::Category), 1);
    assert_eq!(report.rejected_for(RejectReason::Teams), 1);
    assert_eq!(report.malformed.len(), 1);
    assert_eq!(report.malformed[0].entry, "1400003.json");
    assert_eq!(report.archive_sha256.len(), 64);
    assert_eq!(report.archive_origin, "memory://tests_json.zip");

    assert_eq!(dataset.records.len(), 8);
    assert_eq!(report.deliveries, 8);
    assert_eq!(dataset.records[0].date_list, "2025-06-20,2025-06-21");
    assert_eq!(dataset.records[4].date_list, "2025-07-02");
}

#[tokio::test]
async fn no_matching_match_is_a_distinct_fatal_error() {
    let bytes = common::zip_archive(&[(
        "1234567.json",
        common::json_bytes(&common::match_json(&["India", "England"], &["2021-08-04"], Some("Test"))),
    )]);
    let fetcher = fetcher_returning(bytes);
    let dir = tempdir().unwrap();
    let config = PipelineConfig {
        series: SeriesConfig::default(),
        output_path: dir.path().join("out.csv"),
    };

    let err = run(&config, &fetcher).await.unwrap_err();
    match &err {
        PipelineError::NoMatchingMatches { teams, scanned, .. } => {
            assert_eq!(teams, "India and England");
            assert_eq!(*scanned, 1);
        }
        other => panic!("expected NoMatchingMatches, got {other:?}"),
    }
    assert!(err.to_string().contains("widen the date window"));
    assert!(!config.output_path.exists(), "no file must be written");
}

#[tokio::test]
async fn run_writes_csv_with_header_and_one_row_per_delivery() {
    let fetcher = fetcher_returning(mixed_archive());
    let dir = tempdir().unwrap();
    let config = PipelineConfig {
        series: SeriesConfig::default(),
        output_path: dir.path().join("nested/ind_eng.csv"),
    };

    let report = run(&config, &fetcher).await.expect("pipeline succeeds");
    assert_eq!(report.output_path.as_deref(), Some(config.output_path.as_path()));

    let mut reader = csv::Reader::from_path(&config.output_path).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers, COLUMNS);
    let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), 8);
    assert_eq!(&rows[2][21], "caught");
    assert_eq!(&rows[0][21], "");
}

#[tokio::test]
async fn stops_early_once_expected_matches_are_found() {
    let fetcher = fetcher_returning(mixed_archive());
    let series = SeriesConfig::default().with_expected_matches(Some(1));

    let dataset = build_dataset(&series, &fetcher).await.expect("pipeline succeeds");
    assert!(dataset.report.stopped_early);
    assert_eq!(dataset.report.entries_scanned, 1);
    assert_eq!(dataset.report.matches_accepted(), 1);
    assert_eq!(dataset.records.len(), 4);
}

#[tokio::test]
async fn unparseable_dates_of_candidate_matches_become_warnings() {
    let bytes = common::zip_archive(&[(
        "1448345.json",
        common::json_bytes(&common::match_json(&["India", "England"], &["TBC", "2025-06-20"], Some("Test"))),
    )]);
    let fetcher = fetcher_returning(bytes);

    let dataset = build_dataset(&SeriesConfig::default(), &fetcher).await.unwrap();
    assert_eq!(dataset.report.date_warnings.len(), 1);
    assert_eq!(dataset.report.date_warnings[0].value, "TBC");
    assert_eq!(dataset.report.matches_accepted(), 1);
}

#[tokio::test]
async fn custom_series_is_honoured() {
    let window = DateWindow::new(
        NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
        NaiveDate::from_ymd_opt(2025, 7, 31).unwrap(),
    )
    .unwrap();
    let series =
        SeriesConfig::new(vec!["England".into(), "Australia".into()], window, "test").unwrap();
    let fetcher = fetcher_returning(mixed_archive());

    let dataset = build_dataset(&series, &fetcher).await.unwrap();
    assert_eq!(dataset.report.accepted_entries, vec!["1400002.json"]);
}

#[tokio::test]
async fn fetch_failures_propagate() {
    let mut fetcher = MockArchiveFetcher::new();
    fetcher.expect_fetch().return_once(|| {
        Err(FetchError::Status {
            url: "https://cricsheet.org/downloads/tests_json.zip".to_string(),
            status: 503,
        })
    });

    let err = build_dataset(&SeriesConfig::default(), &fetcher)
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::Fetch(FetchError::Status { status: 503, .. })));
}

#[tokio::test]
async fn corrupt_archive_is_fatal() {
    let fetcher = fetcher_returning(b"<html>maintenance</html>".to_vec());
    let err = build_dataset(&SeriesConfig::default(), &fetcher)
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::Archive(_)));
}

#[tokio::test]
async fn write_failures_surface_as_assemble_errors() {
    let fetcher = fetcher_returning(mixed_archive());
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "file in the way").unwrap();
    let config = PipelineConfig {
        series: SeriesConfig::default(),
        output_path: blocker.join("ind_eng.csv"),
    };

    let err = run(&config, &fetcher).await.unwrap_err();
    assert!(
        matches!(err, PipelineError::Assemble(AssembleError::Io { .. })),
        "got {err:?}"
    );
    assert!(!config.output_path.exists());
}
