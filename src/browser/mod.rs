//! Browser bindings: the JS-facing upload watcher and copy function.
//!
//! The watcher is handed its `<input type="file">` by the caller; nothing
//! here looks elements up by a fixed id. Change events spawn a local task
//! that reads the file and decodes it, so the event callback returns at once
//! and results arrive asynchronously on the console.

mod platform;

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Event, HtmlInputElement};

use crate::clipboard::ClipboardCopier;
use crate::error::XlpickError;
use crate::report::{log_level, LogReporter, Reporter};
use crate::upload::{Generations, UploadObserver, UploadOptions};

pub use platform::{read_selection, BrowserClipboard, BrowserPage, BrowserUrls};

static INIT: Once = Once::new();

/// Install the panic hook and the console logger. Safe to call repeatedly;
/// only the first call's level is used.
#[wasm_bindgen]
pub fn init(log_level_name: Option<String>) {
    INIT.call_once(|| {
        console_error_panic_hook::set_once();
        wasm_logger::init(wasm_logger::Config::new(log_level(
            log_level_name.as_deref(),
        )));
    });
}

type SharedObserver = Rc<RefCell<UploadObserver<LogReporter>>>;

/// Watches one file input and logs the sheet names of each selected workbook.
#[wasm_bindgen]
pub struct UploadWatcher {
    input: HtmlInputElement,
    observer: SharedObserver,
    generations: Rc<Generations>,
    change_closure: Option<Closure<dyn FnMut(Event)>>,
}

#[wasm_bindgen]
impl UploadWatcher {
    /// Attach to `input`. `options` is an optional `{ multiple, includeHidden }`
    /// object.
    #[wasm_bindgen(constructor)]
    pub fn new(input: HtmlInputElement, options: JsValue) -> Result<UploadWatcher, JsValue> {
        init(None);

        let options: UploadOptions = if options.is_undefined() || options.is_null() {
            UploadOptions::default()
        } else {
            serde_wasm_bindgen::from_value(options)
                .map_err(|e| JsValue::from_str(&format!("Invalid options: {e}")))?
        };

        let observer: SharedObserver = Rc::new(RefCell::new(UploadObserver::new(
            Rc::new(BrowserUrls),
            LogReporter,
            options,
        )));

        // A read that finishes after a newer selection started is dropped
        let generations = Rc::new(Generations::default());

        let closure = {
            let observer = Rc::clone(&observer);
            let generations = Rc::clone(&generations);
            let input = input.clone();
            Closure::wrap(Box::new(move |_event: Event| {
                let ticket = generations.begin();

                let observer = Rc::clone(&observer);
                let generations = Rc::clone(&generations);
                let input = input.clone();
                spawn_local(async move {
                    let selection = read_selection(&input).await;
                    if !generations.is_current(ticket) {
                        log::debug!("selection superseded while reading, dropping it");
                        return;
                    }
                    let mut observer = observer.borrow_mut();
                    match selection {
                        Ok(files) => {
                            observer.on_change(files);
                        }
                        Err(e) => observer.reject(&e),
                    }
                });
            }) as Box<dyn FnMut(Event)>)
        };

        input.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())?;

        Ok(UploadWatcher {
            input,
            observer,
            generations,
            change_closure: Some(closure),
        })
    }

    /// The object URL of the last decoded file, while it is held.
    #[wasm_bindgen(js_name = currentUrl)]
    pub fn current_url(&self) -> Option<String> {
        self.observer.borrow().current_url().map(str::to_string)
    }

    /// Revoke the held object URL.
    pub fn release(&self) {
        self.observer.borrow_mut().release();
    }

    /// Stop listening and revoke the held object URL. Reads still in flight
    /// are discarded.
    pub fn detach(&mut self) {
        self.generations.invalidate();
        if let Some(closure) = self.change_closure.take() {
            let _ = self
                .input
                .remove_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
        }
        self.observer.borrow_mut().release();
    }
}

impl Drop for UploadWatcher {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Copy the text of the element with id `id` to the clipboard.
///
/// Resolves to `false` (and logs why) when the element is missing or the
/// platform refuses the copy.
#[wasm_bindgen(js_name = copyElementText)]
pub async fn copy_element_text(id: String) -> bool {
    init(None);

    let Some(window) = web_sys::window() else {
        LogReporter.failure(&XlpickError::ClipboardUnavailable("no window".to_string()));
        return false;
    };
    let Some(page) = BrowserPage::new(&window) else {
        LogReporter.failure(&XlpickError::ClipboardUnavailable("no document".to_string()));
        return false;
    };

    let copier = ClipboardCopier::new(page, BrowserClipboard::new(&window));
    copier.copy_and_report(&id, &LogReporter).await
}
