//! Tests for the upload observer
//!
//! Covers the selection policies (zero, one, several files), reporting, and
//! object URL ownership: a URL is only minted for a decodable file and is
//! revoked as soon as it is superseded or released.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

mod fixtures;

use std::cell::RefCell;
use std::rc::Rc;

use fixtures::{OdsBuilder, XlsxBuilder};
use xlpick::{
    is_blob_url, CopyOutcome, DecodeError, MemoryUrls, MultipleFiles, Reporter, SelectedFile,
    UploadObserver, UploadOptions, UploadReport, UrlRegistry, WorkbookFormat, XlpickError,
};

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

// ============================================================================
// Helpers
// ============================================================================

/// Reporter that keeps everything it is told.
#[derive(Default)]
struct Recorder {
    reports: RefCell<Vec<UploadReport>>,
    failures: RefCell<Vec<String>>,
}

impl Reporter for Recorder {
    fn sheets(&self, report: &UploadReport) {
        self.reports.borrow_mut().push(report.clone());
    }

    fn copied(&self, _outcome: &CopyOutcome) {}

    fn failure(&self, error: &XlpickError) {
        self.failures.borrow_mut().push(error.to_string());
    }
}

struct Harness {
    urls: Rc<MemoryUrls>,
    recorder: Rc<Recorder>,
    observer: UploadObserver<Rc<Recorder>>,
}

fn harness(options: UploadOptions) -> Harness {
    let urls = Rc::new(MemoryUrls::new("http://localhost:8000"));
    let recorder = Rc::new(Recorder::default());
    let registry: Rc<dyn UrlRegistry> = Rc::clone(&urls) as Rc<dyn UrlRegistry>;
    let observer = UploadObserver::new(registry, Rc::clone(&recorder), options);
    Harness {
        urls,
        recorder,
        observer,
    }
}

fn two_sheet_file() -> SelectedFile {
    let bytes = XlsxBuilder::new()
        .add_sheet("Sheet1")
        .add_sheet("Sheet2")
        .build();
    SelectedFile::new("plan.xlsx", XLSX_MIME, bytes)
}

fn garbage_file() -> SelectedFile {
    SelectedFile::new("notes.xlsx", XLSX_MIME, b"not a workbook at all".to_vec())
}

// ============================================================================
// Single selection
// ============================================================================

#[test]
fn test_two_sheet_file_reports_names_and_blob_url() {
    let mut h = harness(UploadOptions::default());
    let report = h.observer.on_change(vec![two_sheet_file()]).unwrap();

    assert_eq!(report.file_name, "plan.xlsx");
    assert_eq!(report.format, WorkbookFormat::Xlsx);
    assert_eq!(report.sheet_names, vec!["Sheet1", "Sheet2"]);
    assert!(is_blob_url(&report.url), "not a blob URL: {}", report.url);
    assert!(report.url.starts_with("blob:http://localhost:8000/"));

    assert_eq!(h.observer.current_url(), Some(report.url.as_str()));
    assert!(h.urls.is_live(&report.url));
    assert_eq!(*h.recorder.reports.borrow(), vec![report]);
    assert!(h.recorder.failures.borrow().is_empty());
}

#[test]
fn test_ods_file() {
    let mut h = harness(UploadOptions::default());
    let bytes = OdsBuilder::new().add_table("Tabelle1").build();
    let report = h
        .observer
        .handle(vec![SelectedFile::new(
            "data.ods",
            "application/vnd.oasis.opendocument.spreadsheet",
            bytes,
        )])
        .unwrap();
    assert_eq!(report.format, WorkbookFormat::Ods);
    assert_eq!(report.sheet_names, vec!["Tabelle1"]);
}

#[test]
fn test_mime_type_does_not_matter() {
    let mut h = harness(UploadOptions::default());
    let mut file = two_sheet_file();
    file.mime_type = String::new();
    file.name = "download".to_string();
    let report = h.observer.handle(vec![file]).unwrap();
    assert_eq!(report.sheet_names, vec!["Sheet1", "Sheet2"]);
}

#[test]
fn test_hidden_sheets_filtered_when_configured() {
    let bytes = XlsxBuilder::new()
        .add_sheet("Visible")
        .add_sheet_with_state("Secret", "hidden")
        .build();

    let mut all = harness(UploadOptions::default());
    let report = all
        .observer
        .handle(vec![SelectedFile::new("a.xlsx", XLSX_MIME, bytes.clone())])
        .unwrap();
    assert_eq!(report.sheet_names, vec!["Visible", "Secret"]);

    let mut visible = harness(UploadOptions {
        include_hidden: false,
        ..UploadOptions::default()
    });
    let report = visible
        .observer
        .handle(vec![SelectedFile::new("a.xlsx", XLSX_MIME, bytes)])
        .unwrap();
    assert_eq!(report.sheet_names, vec!["Visible"]);
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_malformed_file_is_a_decode_error_without_url() {
    let mut h = harness(UploadOptions::default());
    let err = h.observer.handle(vec![garbage_file()]).unwrap_err();

    assert!(matches!(err, XlpickError::Decode(DecodeError::NotASpreadsheet)));
    assert!(h.observer.current_url().is_none());
    assert!(h.urls.live().is_empty());
}

#[test]
fn test_on_change_reports_failures_instead_of_returning_them() {
    let mut h = harness(UploadOptions::default());
    assert!(h.observer.on_change(vec![garbage_file()]).is_none());
    assert!(h.observer.on_change(Vec::new()).is_none());

    let failures = h.recorder.failures.borrow();
    assert_eq!(failures.len(), 2);
    assert!(failures[0].starts_with("Could not decode workbook"));
    assert_eq!(failures[1], "No file selected");
    assert!(h.recorder.reports.borrow().is_empty());
}

#[test]
fn test_zero_files_is_an_empty_selection() {
    let mut h = harness(UploadOptions::default());
    let err = h.observer.handle(Vec::new()).unwrap_err();
    assert!(matches!(err, XlpickError::EmptySelection));
    assert!(h.urls.live().is_empty());
}

// ============================================================================
// Several files
// ============================================================================

#[test]
fn test_multiple_files_first_policy_decodes_first() {
    let mut h = harness(UploadOptions::default());
    let report = h
        .observer
        .handle(vec![two_sheet_file(), garbage_file()])
        .unwrap();
    assert_eq!(report.file_name, "plan.xlsx");
    assert_eq!(h.urls.live().len(), 1);
}

#[test]
fn test_multiple_files_first_policy_fails_on_bad_first_file() {
    let mut h = harness(UploadOptions::default());
    let err = h
        .observer
        .handle(vec![garbage_file(), two_sheet_file()])
        .unwrap_err();
    assert!(matches!(err, XlpickError::Decode(_)));
}

#[test]
fn test_multiple_files_reject_policy() {
    let mut h = harness(UploadOptions {
        multiple: MultipleFiles::Reject,
        ..UploadOptions::default()
    });
    let err = h
        .observer
        .handle(vec![two_sheet_file(), two_sheet_file()])
        .unwrap_err();
    assert!(matches!(err, XlpickError::TooManyFiles(2)));
    assert!(h.urls.live().is_empty());

    // A single file is still fine
    assert!(h.observer.handle(vec![two_sheet_file()]).is_ok());
}

// ============================================================================
// Object URL lifetime
// ============================================================================

#[test]
fn test_new_selection_revokes_previous_url() {
    let mut h = harness(UploadOptions::default());
    let first = h.observer.handle(vec![two_sheet_file()]).unwrap().url;
    let second = h.observer.handle(vec![two_sheet_file()]).unwrap().url;

    assert_ne!(first, second);
    assert!(!h.urls.is_live(&first));
    assert!(h.urls.is_live(&second));
    assert_eq!(h.urls.live(), vec![second]);
}

#[test]
fn test_failed_selection_still_supersedes_previous_url() {
    let mut h = harness(UploadOptions::default());
    let first = h.observer.handle(vec![two_sheet_file()]).unwrap().url;
    assert!(h.observer.handle(vec![garbage_file()]).is_err());

    assert!(!h.urls.is_live(&first));
    assert!(h.observer.current_url().is_none());
}

#[test]
fn test_reject_supersedes_and_reports() {
    let mut h = harness(UploadOptions::default());
    let first = h.observer.handle(vec![two_sheet_file()]).unwrap().url;
    h.observer.reject(&XlpickError::EmptySelection);

    assert!(!h.urls.is_live(&first));
    assert_eq!(*h.recorder.failures.borrow(), vec!["No file selected"]);
}

#[test]
fn test_release_revokes() {
    let mut h = harness(UploadOptions::default());
    let url = h.observer.handle(vec![two_sheet_file()]).unwrap().url;
    h.observer.release();
    assert!(!h.urls.is_live(&url));
    assert!(h.observer.current_url().is_none());

    // Releasing twice is harmless
    h.observer.release();
}

#[test]
fn test_dropping_observer_revokes() {
    let h = harness(UploadOptions::default());
    let Harness {
        urls, mut observer, ..
    } = h;
    let url = observer.handle(vec![two_sheet_file()]).unwrap().url;
    drop(observer);
    assert!(!urls.is_live(&url));
    assert!(urls.live().is_empty());
}

#[test]
fn test_repeated_selections_never_accumulate_urls() {
    let mut h = harness(UploadOptions::default());
    for _ in 0..25 {
        h.observer.on_change(vec![two_sheet_file()]);
        assert_eq!(h.urls.live().len(), 1);
    }
}
