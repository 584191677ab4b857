use std::fs;
use std::path::Path;

use crate::utils::{
    empty_report, feed_index, foreign_document, report_with, test_batch_config, write_file,
    zip_bytes,
};
use firds_reader::error::FetchError;
use firds_reader::transport::LocalFetcher;
use firds_reader::{
    InMemoryStorage, InstrumentRecord, LocalDirectoryStorage, Pipeline, PipelineConfig,
    PipelineError, SinkError,
};

fn config(home: &Path) -> PipelineConfig {
    PipelineConfig {
        batch: test_batch_config(2),
        ..PipelineConfig::with_home(home)
    }
}

fn read_csv(path: &Path) -> Vec<InstrumentRecord> {
    csv::Reader::from_path(path)
        .unwrap()
        .deserialize()
        .collect::<Result<Vec<InstrumentRecord>, _>>()
        .unwrap()
}

/// Feed index → two archives → extraction → CSV in archive/
#[test]
fn test_full_run_from_feed_index() {
    let home = tempfile::tempdir().unwrap();
    let remote = tempfile::tempdir().unwrap();

    let first = write_file(
        remote.path(),
        "DLTINS_20210117_01of02.zip",
        zip_bytes(&[("DLTINS_20210117_01of02.xml", report_with("A", 2).as_str())]),
    );
    let second = write_file(
        remote.path(),
        "DLTINS_20210117_02of02.zip",
        zip_bytes(&[
            ("DLTINS_20210117_02of02.xml", report_with("B", 1).as_str()),
            ("DLTINS_20210117_03of02.xml", foreign_document().as_str()),
        ]),
    );
    let links = vec![
        format!("file://{}", first.display()),
        format!("file://{}", second.display()),
    ];
    let config = config(home.path());
    write_file(
        config.index_file.parent().unwrap(),
        "main.xml",
        feed_index(&links),
    );
    // Left over from a previous run; must not be processed.
    write_file(&config.downloads_dir(), "stale.xml", report_with("STALE", 4));

    let out_dir = config.out_dir();
    let pipeline = Pipeline::with_parts(config, LocalFetcher, LocalDirectoryStorage::new(out_dir));
    let report = pipeline.run().unwrap();

    assert_eq!(report.files, 3);
    assert_eq!(report.artifact.rows, 3);
    assert_eq!(report.diagnostics.len(), 1);
    assert!(
        report.diagnostics[0]
            .file
            .ends_with("DLTINS_20210117_03of02.xml")
    );

    let archived = report.archived.expect("artifact archived");
    assert!(archived.starts_with(home.path().join("archive")));
    assert!(!Path::new(&report.artifact.location).exists());

    let ids: Vec<String> = read_csv(&archived).into_iter().map(|r| r.id).collect();
    assert_eq!(ids, vec!["A1", "A2", "B1"]);
}

#[test]
fn test_header_row_present() {
    let home = tempfile::tempdir().unwrap();
    let mut config = config(home.path());
    config.download = false;
    config.archive_published = false;
    write_file(&config.downloads_dir(), "one.xml", report_with("H", 1));

    let out_dir = config.out_dir();
    let report = Pipeline::with_parts(config, LocalFetcher, LocalDirectoryStorage::new(out_dir))
        .run()
        .unwrap();

    assert!(report.archived.is_none());
    let content = fs::read_to_string(&report.artifact.location).unwrap();
    assert_eq!(
        content.lines().next(),
        Some("id,full_name,classification_type,commodity_derivative_flag,notional_currency,issuer")
    );
}

#[test]
fn test_run_without_download_into_memory() {
    let home = tempfile::tempdir().unwrap();
    let mut config = config(home.path());
    config.download = false;
    config.artifact_prefix = "firds_".to_string();
    write_file(&config.downloads_dir(), "b.xml", report_with("B", 1));
    write_file(&config.downloads_dir(), "a.xml", report_with("A", 1));

    let storage = InMemoryStorage::new();
    let report = Pipeline::with_parts(config, LocalFetcher, &storage)
        .run()
        .unwrap();

    assert!(report.artifact.name.starts_with("firds_"));
    assert!(report.archived.is_none());
    let bytes = storage.get(&report.artifact.name).unwrap();
    let rows: Vec<InstrumentRecord> = csv::Reader::from_reader(bytes.as_slice())
        .deserialize()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(rows.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(), vec!["A1", "B1"]);
}

#[test]
fn test_only_empty_files_publishes_nothing() {
    let home = tempfile::tempdir().unwrap();
    let mut config = config(home.path());
    config.download = false;
    write_file(&config.downloads_dir(), "empty.xml", empty_report());

    let storage = InMemoryStorage::new();
    let err = Pipeline::with_parts(config, LocalFetcher, &storage)
        .run()
        .unwrap_err();

    assert!(matches!(err, PipelineError::Sink(SinkError::EmptyDataset)));
    assert!(storage.is_empty());
}

#[test]
fn test_no_xml_files_is_empty_input() {
    let home = tempfile::tempdir().unwrap();
    let mut config = config(home.path());
    config.download = false;

    let storage = InMemoryStorage::new();
    let err = Pipeline::with_parts(config, LocalFetcher, &storage)
        .run()
        .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Batch(firds_reader::BatchError::EmptyInput)
    ));
    assert!(storage.is_empty());
}

#[test]
fn test_failed_download_stops_the_run() {
    let home = tempfile::tempdir().unwrap();
    let config = config(home.path());
    write_file(
        config.index_file.parent().unwrap(),
        "main.xml",
        feed_index(&["file:///definitely/missing.zip".to_string()]),
    );

    let storage = InMemoryStorage::new();
    let err = Pipeline::with_parts(config, LocalFetcher, &storage)
        .run()
        .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Fetch(FetchError::Incomplete { ref failed }) if failed.len() == 1
    ));
    assert!(storage.is_empty());
}

#[test]
fn test_cancelled_pipeline_publishes_nothing() {
    let home = tempfile::tempdir().unwrap();
    let mut config = config(home.path());
    config.download = false;
    write_file(&config.downloads_dir(), "a.xml", report_with("A", 1));

    let storage = InMemoryStorage::new();
    let pipeline = Pipeline::with_parts(config, LocalFetcher, &storage);
    pipeline.cancellation_token().cancel();

    let err = pipeline.run().unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Batch(firds_reader::BatchError::Cancelled { completed: 0, total: 1 })
    ));
    assert!(storage.is_empty());
}
