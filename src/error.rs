//! Structured error types for xlpick.
//!
//! Every failure an event handler can hit maps onto one of these variants, so
//! callbacks can report them instead of throwing into the browser.

/// Failures while turning raw bytes into a [`crate::types::Workbook`].
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// Zero-length input.
    #[error("file is empty")]
    Empty,

    /// The bytes do not start with any known spreadsheet container signature.
    #[error("not a spreadsheet file")]
    NotASpreadsheet,

    /// A recognised container that this crate does not read.
    #[error("unsupported workbook format: {0}")]
    Unsupported(&'static str),

    /// ZIP archive error.
    #[error("ZIP archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// XML parsing error from quick-xml.
    #[error("XML parsing: {0}")]
    Xml(#[from] quick_xml::Error),

    /// I/O error while reading an archive entry.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A package part the workbook cannot be read without.
    #[error("missing package part: {0}")]
    MissingPart(String),
}

/// All errors surfaced by the upload observer and the clipboard copier.
#[derive(Debug, thiserror::Error)]
pub enum XlpickError {
    /// The selected file could not be decoded as a workbook.
    #[error("Could not decode workbook: {0}")]
    Decode(#[from] DecodeError),

    /// The browser could not hand over the selected file's content.
    #[error("Could not read file {0}")]
    Read(String),

    /// No element with the given id exists in the page.
    #[error("No element with id \"{0}\"")]
    Lookup(String),

    /// The platform refused the copy, or offers no way to copy.
    #[error("Clipboard unavailable: {0}")]
    ClipboardUnavailable(String),

    /// The change event fired with no file selected.
    #[error("No file selected")]
    EmptySelection,

    /// More files were selected than the observer accepts.
    #[error("Expected a single file, got {0}")]
    TooManyFiles(usize),

    /// The platform refused to mint an object URL.
    #[error("Object URL: {0}")]
    ObjectUrl(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, XlpickError>;

/// Result alias for the decoding layer.
pub type DecodeResult<T> = std::result::Result<T, DecodeError>;

impl From<zip::result::ZipError> for XlpickError {
    fn from(e: zip::result::ZipError) -> Self {
        Self::Decode(DecodeError::Zip(e))
    }
}

impl From<quick_xml::Error> for XlpickError {
    fn from(e: quick_xml::Error) -> Self {
        Self::Decode(DecodeError::Xml(e))
    }
}

#[cfg(target_arch = "wasm32")]
impl From<XlpickError> for wasm_bindgen::JsValue {
    fn from(e: XlpickError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
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
    fn decode_errors_wrap_into_xlpick_errors() {
        let err: XlpickError = DecodeError::MissingPart("xl/workbook.xml".into()).into();
        assert!(matches!(err, XlpickError::Decode(DecodeError::MissingPart(_))));
        assert_eq!(
            err.to_string(),
            "Could not decode workbook: missing package part: xl/workbook.xml"
        );
    }

    #[test]
    fn zip_errors_are_decode_errors() {
        let err: XlpickError = zip::result::ZipError::FileNotFound.into();
        assert!(matches!(err, XlpickError::Decode(DecodeError::Zip(_))));
    }

    #[test]
    fn read_failures_are_not_decode_failures() {
        let err = XlpickError::Read("book.xlsx: NotReadableError".to_string());
        assert!(!matches!(err, XlpickError::Decode(_)));
        assert_eq!(err.to_string(), "Could not read file book.xlsx: NotReadableError");
    }

    #[test]
    fn lookup_message_names_the_id() {
        let err = XlpickError::Lookup("shareLink".to_string());
        assert_eq!(err.to_string(), "No element with id \"shareLink\"");
    }
}
