//! web-sys implementations of the platform seams.

use async_trait::async_trait;
use js_sys::{Array, Reflect, Uint8Array};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Blob, BlobPropertyBag, Document, Element, File, HtmlDocument, HtmlElement, HtmlInputElement,
    Navigator, Url, Window,
};

use crate::clipboard::{AsyncClipboard, Page};
use crate::error::{Result, XlpickError};
use crate::object_url::UrlRegistry;
use crate::types::SelectedFile;

/// Best-effort message out of a rejected promise or thrown value.
pub(crate) fn js_message(value: &JsValue) -> String {
    if let Some(s) = value.as_string() {
        return s;
    }
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    format!("{value:?}")
}

fn unavailable(value: &JsValue) -> XlpickError {
    XlpickError::ClipboardUnavailable(js_message(value))
}

/// `URL.createObjectURL` / `URL.revokeObjectURL`
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserUrls;

impl UrlRegistry for BrowserUrls {
    fn create(&self, file: &SelectedFile) -> Result<String> {
        let blob = match &file.blob {
            Some(blob) => blob.clone(),
            None => blob_from_bytes(&file.bytes, &file.mime_type)?,
        };
        Url::create_object_url_with_blob(&blob).map_err(|e| XlpickError::ObjectUrl(js_message(&e)))
    }

    fn revoke(&self, url: &str) {
        if let Err(e) = Url::revoke_object_url(url) {
            log::warn!("could not revoke {url}: {}", js_message(&e));
        }
    }
}

/// Copy `bytes` into a new blob, for files that did not come from an input.
fn blob_from_bytes(bytes: &[u8], mime_type: &str) -> Result<Blob> {
    let parts = Array::new();
    parts.push(&Uint8Array::from(bytes));

    let options = BlobPropertyBag::new();
    options.set_type(mime_type);

    Blob::new_with_u8_array_sequence_and_options(&parts, &options)
        .map_err(|e| XlpickError::ObjectUrl(js_message(&e)))
}

/// Read the input's current selection.
///
/// Only the first file is loaded into memory since it is the only one the
/// observer ever decodes; the others are passed along by name so the
/// multiple-file policy can still see them.
pub async fn read_selection(input: &HtmlInputElement) -> Result<Vec<SelectedFile>> {
    let Some(list) = input.files() else {
        return Ok(Vec::new());
    };

    let mut files = Vec::new();
    for index in 0..list.length() {
        let Some(file) = list.get(index) else {
            continue;
        };
        if files.is_empty() {
            files.push(read_file(&file).await?);
        } else {
            files.push(SelectedFile::new(file.name(), file.type_(), Vec::new()));
        }
    }
    Ok(files)
}

/// Load a file's bytes in binary (array buffer) mode.
async fn read_file(file: &File) -> Result<SelectedFile> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| XlpickError::Read(format!("{}: {}", file.name(), js_message(&e))))?;
    let bytes = Uint8Array::new(&buffer).to_vec();
    Ok(SelectedFile::new(file.name(), file.type_(), bytes).with_blob(file.clone().into()))
}

/// The live document
pub struct BrowserPage {
    window: Window,
    document: Document,
}

impl BrowserPage {
    #[must_use]
    pub fn new(window: &Window) -> Option<Self> {
        let document = window.document()?;
        Some(Self {
            window: window.clone(),
            document,
        })
    }

    fn clear_selection(&self) {
        if let Ok(Some(selection)) = self.window.get_selection() {
            let _ = selection.remove_all_ranges();
        }
    }
}

impl Page for BrowserPage {
    type Node = Element;

    fn find(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn text_content(&self, node: &Element) -> String {
        // Form fields hold their text in `value`, not in child nodes
        if let Some(input) = node.dyn_ref::<HtmlInputElement>() {
            return input.value();
        }
        if let Some(element) = node.dyn_ref::<HtmlElement>() {
            return element.inner_text();
        }
        node.text_content().unwrap_or_default()
    }

    fn select_and_copy(&self, node: &Element) -> Result<()> {
        let document: HtmlDocument = self.document.clone().dyn_into().map_err(|_| {
            XlpickError::ClipboardUnavailable("document has no copy command".to_string())
        })?;

        if let Some(input) = node.dyn_ref::<HtmlInputElement>() {
            input.select();
        } else {
            let range = document.create_range().map_err(|e| unavailable(&e))?;
            range.select_node_contents(node).map_err(|e| unavailable(&e))?;
            let selection = self
                .window
                .get_selection()
                .map_err(|e| unavailable(&e))?
                .ok_or_else(|| {
                    XlpickError::ClipboardUnavailable("selection API unavailable".to_string())
                })?;
            selection.remove_all_ranges().map_err(|e| unavailable(&e))?;
            selection.add_range(&range).map_err(|e| unavailable(&e))?;
        }

        let copied = document.exec_command("copy");
        self.clear_selection();

        match copied {
            Ok(true) => Ok(()),
            Ok(false) => Err(XlpickError::ClipboardUnavailable(
                "copy command was refused".to_string(),
            )),
            Err(e) => Err(unavailable(&e)),
        }
    }
}

/// `navigator.clipboard`
pub struct BrowserClipboard {
    navigator: Navigator,
}

impl BrowserClipboard {
    #[must_use]
    pub fn new(window: &Window) -> Self {
        Self {
            navigator: window.navigator(),
        }
    }
}

#[async_trait(?Send)]
impl AsyncClipboard for BrowserClipboard {
    fn is_available(&self) -> bool {
        // Absent outside secure contexts and in older engines
        Reflect::get(&self.navigator, &JsValue::from_str("clipboard"))
            .map(|v| !v.is_undefined() && !v.is_null())
            .unwrap_or(false)
    }

    async fn write_text(&self, text: &str) -> Result<()> {
        let clipboard = self.navigator.clipboard();
        JsFuture::from(clipboard.write_text(text))
            .await
            .map(|_| ())
            .map_err(|e| unavailable(&e))
    }
}
