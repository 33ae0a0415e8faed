//! Clipboard copier: puts an element's text on the system clipboard.
//!
//! Prefers the asynchronous clipboard API and falls back to selecting the
//! node and running the legacy `copy` command only when that API is absent.

use async_trait::async_trait;

use crate::error::{Result, XlpickError};
use crate::report::Reporter;
use crate::types::{CopyMethod, CopyOutcome};

/// The displayed document, as far as copying is concerned.
pub trait Page {
    type Node;

    /// Resolve an element id.
    fn find(&self, id: &str) -> Option<Self::Node>;

    /// Rendered text of the node; empty when it has none.
    fn text_content(&self, node: &Self::Node) -> String;

    /// Select the node's full text range and issue the legacy copy command.
    ///
    /// # Errors
    /// [`XlpickError::ClipboardUnavailable`] when the command is refused or
    /// selection is not possible.
    fn select_and_copy(&self, node: &Self::Node) -> Result<()>;
}

/// The asynchronous clipboard capability (`navigator.clipboard`).
#[async_trait(?Send)]
pub trait AsyncClipboard {
    /// Whether the capability exists at all in this context.
    fn is_available(&self) -> bool;

    /// # Errors
    /// [`XlpickError::ClipboardUnavailable`] when the write is rejected.
    async fn write_text(&self, text: &str) -> Result<()>;
}

pub struct ClipboardCopier<P, C> {
    page: P,
    clipboard: C,
}

impl<P: Page, C: AsyncClipboard> ClipboardCopier<P, C> {
    pub fn new(page: P, clipboard: C) -> Self {
        Self { page, clipboard }
    }

    /// Copy the text of the element with id `id`.
    ///
    /// # Errors
    /// [`XlpickError::Lookup`] if no such element exists (the clipboard is
    /// left untouched); [`XlpickError::ClipboardUnavailable`] if the platform
    /// refuses the copy.
    pub async fn copy(&self, id: &str) -> Result<CopyOutcome> {
        let node = self
            .page
            .find(id)
            .ok_or_else(|| XlpickError::Lookup(id.to_string()))?;
        let text = self.page.text_content(&node);

        let method = if self.clipboard.is_available() {
            self.clipboard.write_text(&text).await?;
            CopyMethod::AsyncClipboard
        } else {
            log::debug!("async clipboard unavailable, using selection copy for #{id}");
            self.page.select_and_copy(&node)?;
            CopyMethod::LegacySelection
        };

        Ok(CopyOutcome { text, method })
    }

    /// Copy and route the outcome to `reporter`; returns whether the copy
    /// happened.
    pub async fn copy_and_report<R: Reporter>(&self, id: &str, reporter: &R) -> bool {
        match self.copy(id).await {
            Ok(outcome) => {
                reporter.copied(&outcome);
                true
            }
            Err(e) => {
                reporter.failure(&e);
                false
            }
        }
    }
}
