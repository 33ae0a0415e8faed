/// A file picked through an `<input type="file">`, already read into memory.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    /// MIME type as reported by the browser; may be empty.
    pub mime_type: String,
    pub bytes: Vec<u8>,
    /// The picked file itself. Object URLs are minted over it so the bytes
    /// are not copied into a second blob.
    #[cfg(target_arch = "wasm32")]
    pub blob: Option<web_sys::Blob>,
}

impl SelectedFile {
    #[must_use]
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
            #[cfg(target_arch = "wasm32")]
            blob: None,
        }
    }

    #[cfg(target_arch = "wasm32")]
    #[must_use]
    pub fn with_blob(mut self, blob: web_sys::Blob) -> Self {
        self.blob = Some(blob);
        self
    }
}
