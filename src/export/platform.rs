//! Platform seams used by the exporter.
//!
//! The exporter never talks to a browser, clipboard or filesystem directly.
//! It goes through [`BlobStore`], [`Clipboard`] and [`Downloads`], which the
//! host implements. In-memory versions are provided for tests and headless
//! use, and [`DirectoryDownloads`] saves artifacts to disk.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use log::debug;

use super::Artifact;

// ============================================================================
// Blobs
// ============================================================================

/// URL of a temporary blob.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlobUrl(pub String);

impl std::fmt::Display for BlobUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Storage for short-lived blobs addressed by URL.
pub trait BlobStore: Send + Sync {
    /// Stores `bytes` and returns a fresh URL for them.
    fn create(&self, bytes: Vec<u8>, mime: &str) -> BlobUrl;

    /// Returns the bytes behind `url`, or `None` once revoked.
    fn read(&self, url: &BlobUrl) -> Option<Vec<u8>>;

    /// Releases the blob.
    fn revoke(&self, url: &BlobUrl);
}

/// A blob that is revoked when the handle goes out of scope.
///
/// Each handle owns exactly one URL and revokes it exactly once, whichever
/// way the scope is left.
pub struct BlobHandle<'s> {
    store: &'s dyn BlobStore,
    url: BlobUrl,
}

impl<'s> BlobHandle<'s> {
    /// Stores `bytes` in `store` for the lifetime of the handle.
    pub fn create(store: &'s dyn BlobStore, bytes: Vec<u8>, mime: &str) -> Self {
        let url = store.create(bytes, mime);
        debug!("created blob {url}");
        Self { store, url }
    }

    pub fn url(&self) -> &BlobUrl {
        &self.url
    }

    /// Reads the blob back.
    pub fn read(&self) -> Option<Vec<u8>> {
        self.store.read(&self.url)
    }
}

impl Drop for BlobHandle<'_> {
    fn drop(&mut self) {
        debug!("revoking blob {}", self.url);
        self.store.revoke(&self.url);
    }
}

/// In-memory [`BlobStore`] that keeps count of what it handed out.
#[derive(Default)]
pub struct MemoryBlobStore {
    next_id: AtomicU64,
    blobs: Mutex<HashMap<BlobUrl, Vec<u8>>>,
    revocations: Mutex<HashMap<BlobUrl, u32>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of URLs created so far.
    pub fn created(&self) -> u64 {
        self.next_id.load(Ordering::SeqCst)
    }

    /// Number of blobs created but not yet revoked.
    pub fn live(&self) -> usize {
        self.blobs.lock().map(|b| b.len()).unwrap_or(0)
    }

    /// How many times each revoked URL was revoked.
    pub fn revocations(&self) -> HashMap<BlobUrl, u32> {
        self.revocations
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

impl BlobStore for MemoryBlobStore {
    fn create(&self, bytes: Vec<u8>, _mime: &str) -> BlobUrl {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let url = BlobUrl(format!("blob:memory/{id}"));
        if let Ok(mut blobs) = self.blobs.lock() {
            blobs.insert(url.clone(), bytes);
        }
        url
    }

    fn read(&self, url: &BlobUrl) -> Option<Vec<u8>> {
        self.blobs.lock().ok()?.get(url).cloned()
    }

    fn revoke(&self, url: &BlobUrl) {
        if let Ok(mut blobs) = self.blobs.lock() {
            blobs.remove(url);
        }
        if let Ok(mut revocations) = self.revocations.lock() {
            *revocations.entry(url.clone()).or_insert(0) += 1;
        }
    }
}

// ============================================================================
// Clipboard
// ============================================================================

/// The system clipboard.
pub trait Clipboard: Send + Sync {
    /// Writes `text`, or explains why the platform refused.
    fn write_text(&self, text: &str) -> Result<(), String>;
}

/// In-memory clipboard, optionally refusing every write.
#[derive(Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
    denied: bool,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard whose permission was denied.
    pub fn denied() -> Self {
        Self {
            contents: Mutex::new(None),
            denied: true,
        }
    }

    /// The last text written, if any.
    pub fn contents(&self) -> Option<String> {
        self.contents.lock().ok()?.clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<(), String> {
        if self.denied {
            return Err("permission denied".to_string());
        }
        let mut contents = self
            .contents
            .lock()
            .map_err(|_| "clipboard lock poisoned".to_string())?;
        *contents = Some(text.to_string());
        Ok(())
    }
}

// ============================================================================
// Downloads
// ============================================================================

/// Where finished artifacts are handed to the user.
pub trait Downloads: Send + Sync {
    fn deliver(&self, artifact: &Artifact) -> io::Result<()>;
}

/// Collects delivered artifacts in memory.
#[derive(Default)]
pub struct MemoryDownloads {
    delivered: Mutex<Vec<Artifact>>,
}

impl MemoryDownloads {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything delivered so far, oldest first.
    pub fn delivered(&self) -> Vec<Artifact> {
        self.delivered
            .lock()
            .map(|d| d.clone())
            .unwrap_or_default()
    }
}

impl Downloads for MemoryDownloads {
    fn deliver(&self, artifact: &Artifact) -> io::Result<()> {
        self.delivered
            .lock()
            .map_err(|_| io::Error::other("download list lock poisoned"))?
            .push(artifact.clone());
        Ok(())
    }
}

/// Saves each artifact under its file name in a directory.
pub struct DirectoryDownloads {
    dir: PathBuf,
}

impl DirectoryDownloads {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Downloads for DirectoryDownloads {
    fn deliver(&self, artifact: &Artifact) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(&artifact.file_name);
        fs::write(&path, &artifact.bytes)?;
        debug!("wrote {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blob_handle_revokes_once_on_drop() {
        let store = MemoryBlobStore::new();
        let url = {
            let handle = BlobHandle::create(&store, b"abc".to_vec(), "text/plain");
            assert_eq!(handle.read().as_deref(), Some(&b"abc"[..]));
            assert_eq!(store.live(), 1);
            handle.url().clone()
        };
        assert_eq!(store.live(), 0);
        assert!(store.read(&url).is_none());
        assert_eq!(store.revocations().get(&url), Some(&1));
    }

    #[test]
    fn overlapping_handles_get_distinct_urls() {
        let store = MemoryBlobStore::new();
        let first = BlobHandle::create(&store, vec![1], "x");
        let second = BlobHandle::create(&store, vec![2], "x");
        assert_ne!(first.url(), second.url());

        drop(first);
        // The second blob survives the first one's release.
        assert_eq!(second.read(), Some(vec![2]));
        drop(second);
        assert_eq!(store.created(), 2);
        assert!(store.revocations().values().all(|n| *n == 1));
    }

    #[test]
    fn denied_clipboard_refuses() {
        let clipboard = MemoryClipboard::denied();
        assert!(clipboard.write_text("x").is_err());
        assert!(clipboard.contents().is_none());

        let clipboard = MemoryClipboard::new();
        clipboard.write_text("<svg/>").unwrap();
        assert_eq!(clipboard.contents().as_deref(), Some("<svg/>"));
    }

    #[test]
    fn memory_downloads_collects() {
        let downloads = MemoryDownloads::new();
        let artifact = Artifact {
            file_name: "icon.svg".into(),
            mime: "image/svg+xml",
            bytes: b"<svg/>".to_vec(),
        };
        downloads.deliver(&artifact).unwrap();
        assert_eq!(downloads.delivered(), vec![artifact]);
    }
}
