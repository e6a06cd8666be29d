use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Writes fetched pages to disk, one file per page
///
/// Files are named by the page's reserved ordinal (`page1.html`,
/// `page2.html`, ...), so names are unique across the whole pool and ordered
/// by reservation.
#[derive(Debug, Clone)]
pub struct PageStore {
    root: PathBuf,
}

impl PageStore {
    /// Opens the store rooted at `root`, creating the directory if absent
    pub fn new(root: &Path) -> io::Result<Self> {
        fs::create_dir_all(root)?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// Persists one page body under its sequence number
    ///
    /// Returns the path written.
    pub fn save(&self, ordinal: u64, body: &str) -> io::Result<PathBuf> {
        let path = self.page_path(ordinal);
        fs::write(&path, body)?;
        Ok(path)
    }

    /// The path a given ordinal is (or would be) stored at
    pub fn page_path(&self, ordinal: u64) -> PathBuf {
        self.root.join(format!("page{ordinal}.html"))
    }
}
