//! xlpick - spreadsheet upload and clipboard glue for the web
//!
//! Two independent handlers, compiled to WebAssembly:
//! - an upload watcher that decodes the workbook picked in a file input,
//!   logs its sheet names and holds an object URL for the raw bytes
//! - a copier that puts an element's text on the system clipboard
//!
//! The decoding, URL ownership and copy logic is plain Rust behind small
//! platform traits, so it runs (and is tested) off the browser as well.
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { init as setup, UploadWatcher, copyElementText } from 'xlpick';
//! await init();
//! setup('info');
//! const watcher = new UploadWatcher(document.querySelector('#upload'), { multiple: 'first' });
//! button.onclick = () => copyElementText('shareLink');
//! ```

pub mod clipboard;
pub mod decode;
pub mod error;
pub mod namespaces;
pub mod object_url;
pub mod report;
pub mod types;
pub mod upload;
pub mod workbook_meta;
pub mod xml_helpers;

#[cfg(target_arch = "wasm32")]
pub mod browser;

use wasm_bindgen::prelude::*;

pub use clipboard::{AsyncClipboard, ClipboardCopier, Page};
pub use decode::{decode, decode_file};
pub use error::{DecodeError, XlpickError};
pub use object_url::{is_blob_url, MemoryUrls, ObjectUrl, UrlRegistry};
pub use report::{LogReporter, Reporter};
pub use types::*;
pub use upload::{Generations, MultipleFiles, UploadObserver, UploadOptions};

/// Decode a workbook and return its sheet names, hidden sheets included, as
/// a JS array of strings
///
/// # Errors
/// Returns the decode error message if the bytes are not a workbook.
#[wasm_bindgen(js_name = listSheetNames)]
pub fn list_sheet_names(data: &[u8]) -> Result<JsValue, JsValue> {
    let workbook = decode(data).map_err(|e| JsValue::from_str(&e.to_string()))?;

    serde_wasm_bindgen::to_value(&workbook.sheet_names())
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

/// Decode a workbook and return a JSON string describing its structure
/// (format, sheets with visibility, date system)
///
/// # Errors
/// Returns an error if the file is not a workbook or cannot be decoded.
#[wasm_bindgen(js_name = describeWorkbook)]
pub fn describe_workbook(data: &[u8]) -> Result<String, JsValue> {
    let workbook = decode(data).map_err(|e| JsValue::from_str(&e.to_string()))?;

    serde_json::to_string(&workbook)
        .map_err(|e| JsValue::from_str(&format!("JSON serialization error: {e}")))
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
