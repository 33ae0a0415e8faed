//! Diagnostic channel for event handlers.
//!
//! Handlers have no caller to return to, so results and failures go to a
//! [`Reporter`] instead.

use crate::error::XlpickError;
use crate::types::{CopyOutcome, UploadReport};

/// Sink for handler results and failures.
pub trait Reporter {
    /// A file was decoded and its object URL minted.
    fn sheets(&self, report: &UploadReport);

    /// Text reached the clipboard.
    fn copied(&self, outcome: &CopyOutcome);

    /// A handler failed; the user has to re-trigger the action.
    fn failure(&self, error: &XlpickError);
}

/// Reporter backed by the `log` facade.
///
/// In the browser the facade is wired to the console by [`crate::browser::init`].
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn sheets(&self, report: &UploadReport) {
        log::info!(
            "{}: sheets {:?} at {}",
            report.file_name,
            report.sheet_names,
            report.url
        );
    }

    fn copied(&self, outcome: &CopyOutcome) {
        log::info!(
            "copied {} char(s) via {:?}",
            outcome.text.chars().count(),
            outcome.method
        );
    }

    fn failure(&self, error: &XlpickError) {
        match error {
            XlpickError::EmptySelection | XlpickError::TooManyFiles(_) => log::warn!("{error}"),
            _ => log::error!("{error}"),
        }
    }
}

/// Parse a log level name (`trace` .. `error`, case-insensitive), falling
/// back to `info`.
#[must_use]
pub fn log_level(name: Option<&str>) -> log::Level {
    name.and_then(|n| n.trim().parse().ok())
        .unwrap_or(log::Level::Info)
}

impl<R: Reporter + ?Sized> Reporter for &R {
    fn sheets(&self, report: &UploadReport) {
        (**self).sheets(report);
    }

    fn copied(&self, outcome: &CopyOutcome) {
        (**self).copied(outcome);
    }

    fn failure(&self, error: &XlpickError) {
        (**self).failure(error);
    }
}

impl<R: Reporter + ?Sized> Reporter for std::rc::Rc<R> {
    fn sheets(&self, report: &UploadReport) {
        (**self).sheets(report);
    }

    fn copied(&self, outcome: &CopyOutcome) {
        (**self).copied(outcome);
    }

    fn failure(&self, error: &XlpickError) {
        (**self).failure(error);
    }
}
