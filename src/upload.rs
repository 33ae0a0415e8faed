//! Upload observer: reacts to a file selection.
//!
//! Decodes the chosen file, reports its sheet names and keeps one object URL
//! for the raw bytes. A new selection supersedes (and revokes) the previous
//! URL whatever its outcome.

use serde::Deserialize;
use std::cell::Cell;
use std::rc::Rc;

use crate::decode::decode_file;
use crate::error::{Result, XlpickError};
use crate::object_url::{ObjectUrl, UrlRegistry};
use crate::report::Reporter;
use crate::types::{SelectedFile, UploadReport};

/// What to do when the input hands over more than one file
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum MultipleFiles {
    /// Decode the first file, ignore the rest
    #[default]
    First,
    /// Fail with [`XlpickError::TooManyFiles`]
    Reject,
}

/// Observer configuration, deserialized from a JS object in the browser.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct UploadOptions {
    pub multiple: MultipleFiles,
    /// Report hidden and very hidden sheets too.
    pub include_hidden: bool,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            multiple: MultipleFiles::First,
            include_hidden: true,
        }
    }
}

pub struct UploadObserver<R: Reporter> {
    registry: Rc<dyn UrlRegistry>,
    reporter: R,
    options: UploadOptions,
    current: Option<ObjectUrl>,
}

impl<R: Reporter> UploadObserver<R> {
    pub fn new(registry: Rc<dyn UrlRegistry>, reporter: R, options: UploadOptions) -> Self {
        Self {
            registry,
            reporter,
            options,
            current: None,
        }
    }

    /// URL of the file from the last successful selection, if still held.
    #[must_use]
    pub fn current_url(&self) -> Option<&str> {
        self.current.as_ref().map(ObjectUrl::as_str)
    }

    /// Revoke the held URL, e.g. when the preview it backs is removed.
    pub fn release(&mut self) {
        if let Some(url) = self.current.take() {
            url.release();
        }
    }

    /// Handle one change event.
    ///
    /// # Errors
    /// [`XlpickError::EmptySelection`] for zero files,
    /// [`XlpickError::TooManyFiles`] under [`MultipleFiles::Reject`],
    /// [`XlpickError::Decode`] for anything that is not a workbook (no URL
    /// is created in that case), [`XlpickError::ObjectUrl`] if the platform
    /// refuses the URL.
    pub fn handle(&mut self, files: Vec<SelectedFile>) -> Result<UploadReport> {
        self.release();

        let count = files.len();
        let Some(file) = files.into_iter().next() else {
            return Err(XlpickError::EmptySelection);
        };
        if count > 1 {
            match self.options.multiple {
                MultipleFiles::First => {
                    log::warn!("{count} files selected, only {} is decoded", file.name);
                }
                MultipleFiles::Reject => return Err(XlpickError::TooManyFiles(count)),
            }
        }

        let workbook = decode_file(&file)?;
        let sheet_names = if self.options.include_hidden {
            workbook.sheet_names()
        } else {
            workbook.visible_sheet_names()
        };

        let url = ObjectUrl::create(&self.registry, &file)?;
        let report = UploadReport {
            file_name: file.name,
            format: workbook.format,
            sheet_names,
            url: url.as_str().to_string(),
        };
        self.current = Some(url);
        Ok(report)
    }

    /// Report a failure that happened before the files could be handed over
    /// (reading the selection, say). The event still supersedes the held URL.
    pub fn reject(&mut self, error: &XlpickError) {
        self.release();
        self.reporter.failure(error);
    }

    /// Handle a change event and route the outcome to the reporter.
    ///
    /// Never fails: this is what an event callback calls.
    pub fn on_change(&mut self, files: Vec<SelectedFile>) -> Option<UploadReport> {
        match self.handle(files) {
            Ok(report) => {
                self.reporter.sheets(&report);
                Some(report)
            }
            Err(e) => {
                self.reporter.failure(&e);
                None
            }
        }
    }
}

/// Orders change events whose file reads complete out of order.
///
/// Each event takes a ticket before its read starts; when the read finishes,
/// the result is used only if no newer event (or [`Generations::invalidate`])
/// happened in between.
#[derive(Debug, Default)]
pub struct Generations {
    current: Cell<u64>,
}

impl Generations {
    /// Start a new event and return its ticket.
    pub fn begin(&self) -> u64 {
        let ticket = self.current.get().wrapping_add(1);
        self.current.set(ticket);
        ticket
    }

    /// Make every outstanding ticket stale.
    pub fn invalidate(&self) {
        self.begin();
    }

    #[must_use]
    pub fn is_current(&self, ticket: u64) -> bool {
        self.current.get() == ticket
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;

    #[test]
    fn default_options() {
        let options = UploadOptions::default();
        assert_eq!(options.multiple, MultipleFiles::First);
        assert!(options.include_hidden);
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: UploadOptions =
            serde_json::from_str(r#"{"multiple":"reject"}"#).unwrap();
        assert_eq!(options.multiple, MultipleFiles::Reject);
        assert!(options.include_hidden);

        let options: UploadOptions = serde_json::from_str(r#"{"includeHidden":false}"#).unwrap();
        assert_eq!(options.multiple, MultipleFiles::First);
        assert!(!options.include_hidden);
    }

    #[test]
    fn newer_event_makes_older_read_stale() {
        let generations = Generations::default();
        let first = generations.begin();
        assert!(generations.is_current(first));

        let second = generations.begin();
        assert!(!generations.is_current(first));
        assert!(generations.is_current(second));
    }

    #[test]
    fn invalidate_makes_every_read_stale() {
        let generations = Generations::default();
        let ticket = generations.begin();
        generations.invalidate();
        assert!(!generations.is_current(ticket));
    }

    #[derive(Default)]
    struct Failures(std::cell::RefCell<Vec<String>>);

    impl Reporter for Failures {
        fn sheets(&self, _report: &UploadReport) {}
        fn copied(&self, _outcome: &crate::types::CopyOutcome) {}
        fn failure(&self, error: &XlpickError) {
            self.0.borrow_mut().push(error.to_string());
        }
    }

    #[test]
    fn stale_read_never_reaches_the_observer() {
        use crate::object_url::MemoryUrls;

        let failures = Rc::new(Failures::default());
        let mut observer = UploadObserver::new(
            Rc::new(MemoryUrls::default()),
            Rc::clone(&failures),
            UploadOptions::default(),
        );
        let generations = Generations::default();

        // Two change events; the first one's read completes last
        let slow = generations.begin();
        let fast = generations.begin();
        for (ticket, files) in [
            (fast, vec![SelectedFile::new("fast.xlsx", "", b"garbage".to_vec())]),
            (slow, Vec::new()),
        ] {
            if generations.is_current(ticket) {
                observer.on_change(files);
            }
        }

        assert_eq!(
            *failures.0.borrow(),
            vec!["Could not decode workbook: not a spreadsheet file"]
        );
    }

    #[test]
    fn unknown_policy_is_rejected() {
        assert!(serde_json::from_str::<UploadOptions>(r#"{"multiple":"all"}"#).is_err());
    }
}
