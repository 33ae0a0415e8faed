use serde::Serialize;

use super::WorkbookFormat;

/// What the upload observer emits for one successfully handled selection
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UploadReport {
    pub file_name: String,
    pub format: WorkbookFormat,
    pub sheet_names: Vec<String>,
    /// `blob:` URL addressing the raw file bytes; valid until the observer
    /// releases it.
    pub url: String,
}
