//! Object URL ownership.
//!
//! A `blob:` URL pins the file bytes in memory until it is revoked. The
//! [`ObjectUrl`] handle revokes on drop, so superseding or discarding it can
//! never leak the blob.

use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

use crate::error::Result;
use crate::types::SelectedFile;

/// Scheme prefix of every object URL.
pub const BLOB_SCHEME: &str = "blob:";

/// The platform's object URL table.
pub trait UrlRegistry {
    /// Register the file's content and return its URL.
    ///
    /// # Errors
    /// Returns [`crate::error::XlpickError::ObjectUrl`] if the platform
    /// refuses.
    fn create(&self, file: &SelectedFile) -> Result<String>;

    /// Forget a URL previously returned by [`UrlRegistry::create`].
    fn revoke(&self, url: &str);
}

/// Owned `blob:` URL, revoked when dropped.
pub struct ObjectUrl {
    url: String,
    registry: Rc<dyn UrlRegistry>,
}

impl ObjectUrl {
    /// Register `file` with `registry` and take ownership of the URL.
    ///
    /// # Errors
    /// Propagates the registry's refusal.
    pub fn create(registry: &Rc<dyn UrlRegistry>, file: &SelectedFile) -> Result<Self> {
        let url = registry.create(file)?;
        log::debug!("created object URL {url} for {}", file.name);
        Ok(Self {
            url,
            registry: Rc::clone(registry),
        })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.url
    }

    /// Revoke now. Equivalent to dropping the handle.
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for ObjectUrl {
    fn drop(&mut self) {
        log::debug!("revoking object URL {}", self.url);
        self.registry.revoke(&self.url);
    }
}

impl fmt::Debug for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ObjectUrl").field(&self.url).finish()
    }
}

impl fmt::Display for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// Check that `url` has the `blob:<origin>/<id>` shape browsers mint.
///
/// The origin is `null` for opaque origins (`file://` pages, sandboxed
/// frames) and a scheme-qualified origin otherwise.
#[must_use]
pub fn is_blob_url(url: &str) -> bool {
    let Some(rest) = url.strip_prefix(BLOB_SCHEME) else {
        return false;
    };
    let Some((origin, id)) = rest.rsplit_once('/') else {
        return false;
    };
    let origin_ok = origin == "null" || origin.contains("://");
    let id_ok = !id.is_empty() && id.chars().all(|c| c.is_ascii_hexdigit() || c == '-');
    origin_ok && id_ok
}

/// In-process registry for hosts without a browser URL table.
///
/// Mints UUID-shaped ids under a fixed origin and keeps the set of live URLs,
/// which makes leaks observable.
#[derive(Debug)]
pub struct MemoryUrls {
    origin: String,
    next_id: Cell<u64>,
    live: RefCell<BTreeSet<String>>,
}

impl MemoryUrls {
    #[must_use]
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            next_id: Cell::new(1),
            live: RefCell::new(BTreeSet::new()),
        }
    }

    /// URLs created and not yet revoked.
    #[must_use]
    pub fn live(&self) -> Vec<String> {
        self.live.borrow().iter().cloned().collect()
    }

    #[must_use]
    pub fn is_live(&self, url: &str) -> bool {
        self.live.borrow().contains(url)
    }
}

impl Default for MemoryUrls {
    fn default() -> Self {
        Self::new("null")
    }
}

impl UrlRegistry for MemoryUrls {
    fn create(&self, _file: &SelectedFile) -> Result<String> {
        let id = self.next_id.get();
        self.next_id.set(id.wrapping_add(1));
        let url = format!(
            "{BLOB_SCHEME}{}/00000000-0000-4000-8000-{:012x}",
            self.origin,
            id & 0xFFFF_FFFF_FFFF
        );
        self.live.borrow_mut().insert(url.clone());
        Ok(url)
    }

    fn revoke(&self, url: &str) {
        self.live.borrow_mut().remove(url);
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

    fn file(name: &str) -> SelectedFile {
        SelectedFile::new(name, "text/plain", b"bytes".to_vec())
    }

    fn registry() -> (Rc<MemoryUrls>, Rc<dyn UrlRegistry>) {
        let urls = Rc::new(MemoryUrls::new("http://localhost:8080"));
        let dyn_urls: Rc<dyn UrlRegistry> = Rc::clone(&urls) as Rc<dyn UrlRegistry>;
        (urls, dyn_urls)
    }

    #[test]
    fn drop_revokes() {
        let (urls, registry) = registry();
        let handle = ObjectUrl::create(&registry, &file("a.txt")).unwrap();
        let url = handle.as_str().to_string();
        assert!(urls.is_live(&url));
        drop(handle);
        assert!(!urls.is_live(&url));
        assert!(urls.live().is_empty());
    }

    #[test]
    fn release_revokes() {
        let (urls, registry) = registry();
        let handle = ObjectUrl::create(&registry, &file("a.txt")).unwrap();
        handle.release();
        assert!(urls.live().is_empty());
    }

    #[test]
    fn memory_urls_are_unique_blob_urls() {
        let (urls, registry) = registry();
        let a = ObjectUrl::create(&registry, &file("a.txt")).unwrap();
        let b = ObjectUrl::create(&registry, &file("b.txt")).unwrap();
        assert_ne!(a.as_str(), b.as_str());
        assert!(is_blob_url(a.as_str()), "{a}");
        assert!(is_blob_url(b.as_str()), "{b}");
        assert_eq!(urls.live().len(), 2);
    }

    #[test]
    fn blob_url_shape() {
        assert!(is_blob_url(
            "blob:https://example.com/550e8400-e29b-41d4-a716-446655440000"
        ));
        assert!(is_blob_url(
            "blob:null/550e8400-e29b-41d4-a716-446655440000"
        ));
        assert!(!is_blob_url("https://example.com/x"));
        assert!(!is_blob_url("blob:"));
        assert!(!is_blob_url("blob:https://example.com/"));
        assert!(!is_blob_url("blob:nowhere/abc"));
        assert!(!is_blob_url("blob:https://example.com/not a uuid"));
    }
}
