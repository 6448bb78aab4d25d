//! Filesystem book store.
//!
//! Each book lives in the directory named by its key below the store root:
//!
//! ```text
//! <root>/users/ana/books/novel.html/
//!     book.toml        manifest (id, key, title, totals, upload time)
//!     pages/0001.html  one file per page
//! ```
//!
//! New pages and the new manifest are written to staging names first. The
//! pages are then swapped in and the manifest renamed over the old one; if
//! either step fails the previous pages come back, so a failed save leaves
//! the book as it was.
//!
//! Keys cannot contain `pages`, `book.toml` or dot-prefixed segments (see
//! [`DocumentKey`]), so a book directory never collides with another book's
//! files and every saved book is found again by the directory scan.

use std::fs;
use std::path::{Path, PathBuf};

use crate::{
    models::{BookId, DocumentKey},
    pipeline::ProcessedDocument,
    store::{BookRecord, BookStore, StoreError, StoredPage, now_ms, stored_pages},
};

const MANIFEST: &str = "book.toml";
const PAGES_DIR: &str = "pages";
const STAGING_DIR: &str = ".pages.staging";
const RETIRED_DIR: &str = ".pages.old";
const MANIFEST_TMP: &str = ".book.toml.tmp";

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid store directory: {0}")]
    InvalidStoreDir(String),
    #[error("Failed to parse manifest {path}: {source}")]
    ManifestParse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to write manifest: {0}")]
    ManifestWrite(#[from] toml::ser::Error),
}

/// Book store keeping pages as HTML files on disk.
#[derive(Debug, Clone)]
pub struct FsBookStore {
    root: PathBuf,
}

impl FsBookStore {
    /// Opens a store rooted at an existing directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, IoError> {
        let root = root.into();
        validate_store_dir(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn book_dir(&self, key: &DocumentKey) -> PathBuf {
        key.relative_path().to_path(&self.root)
    }

    fn find_book(&self, id: BookId) -> Result<(PathBuf, BookRecord), StoreError> {
        scan_books(&self.root)?
            .into_iter()
            .find(|(_, record)| record.id == id)
            .ok_or(StoreError::BookNotFound(id))
    }
}

impl BookStore for FsBookStore {
    fn save_book(
        &mut self,
        key: &DocumentKey,
        title: &str,
        document: &ProcessedDocument,
    ) -> Result<BookId, StoreError> {
        let dir = self.book_dir(key);
        let manifest_path = dir.join(MANIFEST);
        let id = if manifest_path.exists() {
            read_manifest(&manifest_path)?.id
        } else {
            BookId::new()
        };

        let record = BookRecord {
            id,
            key: key.clone(),
            title: title.to_string(),
            total_pages: document.total_pages(),
            total_sentences: document.total_sentences(),
            uploaded_at_ms: now_ms(),
        };

        fs::create_dir_all(&dir).map_err(IoError::Io)?;
        let staging = dir.join(STAGING_DIR);
        if staging.exists() {
            fs::remove_dir_all(&staging).map_err(IoError::Io)?;
        }
        write_pages(&staging, &stored_pages(document))?;
        let manifest_tmp = stage_manifest(&dir, &record)?;
        swap_in_pages(&dir, &staging, || {
            fs::rename(&manifest_tmp, &manifest_path).map_err(IoError::from)
        })?;

        log::info!(
            "stored book {} in {} ({} pages, {} sentences)",
            key,
            dir.display(),
            record.total_pages,
            record.total_sentences
        );
        Ok(id)
    }

    fn book(&self, id: BookId) -> Result<BookRecord, StoreError> {
        self.find_book(id).map(|(_, record)| record)
    }

    fn book_by_key(&self, key: &DocumentKey) -> Result<Option<BookRecord>, StoreError> {
        let manifest_path = self.book_dir(key).join(MANIFEST);
        if !manifest_path.exists() {
            return Ok(None);
        }
        Ok(Some(read_manifest(&manifest_path)?))
    }

    fn pages(&self, id: BookId) -> Result<Vec<StoredPage>, StoreError> {
        let (dir, _) = self.find_book(id)?;
        let pages_dir = dir.join(PAGES_DIR);
        if !pages_dir.is_dir() {
            return Err(StoreError::MissingPages(id));
        }

        let mut pages = vec![];
        for entry in fs::read_dir(&pages_dir).map_err(IoError::Io)? {
            let path = entry.map_err(IoError::Io)?.path();
            if let Some(number) = page_number(&path) {
                let html = fs::read_to_string(&path).map_err(IoError::Io)?;
                pages.push(StoredPage { number, html });
            }
        }
        if pages.is_empty() {
            return Err(StoreError::MissingPages(id));
        }
        pages.sort_by_key(|page| page.number);
        Ok(pages)
    }

    fn list_books(&self) -> Result<Vec<BookRecord>, StoreError> {
        let mut books: Vec<BookRecord> = scan_books(&self.root)?
            .into_iter()
            .map(|(_, record)| record)
            .collect();
        books.sort_by(|a, b| {
            b.uploaded_at_ms
                .cmp(&a.uploaded_at_ms)
                .then_with(|| a.key.cmp(&b.key))
        });
        Ok(books)
    }

    fn delete_book(&mut self, id: BookId) -> Result<(), StoreError> {
        let (dir, record) = self.find_book(id)?;
        let pages_dir = dir.join(PAGES_DIR);
        if pages_dir.exists() {
            fs::remove_dir_all(&pages_dir).map_err(IoError::Io)?;
        }
        fs::remove_file(dir.join(MANIFEST)).map_err(IoError::Io)?;
        // Keys nested below this one still live in the directory
        if fs::read_dir(&dir).map_err(IoError::Io)?.next().is_none() {
            fs::remove_dir(&dir).map_err(IoError::Io)?;
        }
        log::info!("deleted book {}", record.key);
        Ok(())
    }
}

pub fn validate_store_dir(path: &Path) -> Result<(), IoError> {
    if !path.exists() || !path.is_dir() {
        return Err(IoError::InvalidStoreDir(format!(
            "{} is not a directory",
            path.display()
        )));
    }

    Ok(())
}

fn write_pages(dir: &Path, pages: &[StoredPage]) -> Result<(), IoError> {
    fs::create_dir_all(dir)?;
    for page in pages {
        fs::write(dir.join(page_file_name(page.number)), &page.html)?;
    }
    Ok(())
}

/// Replaces `<dir>/pages` with `staging`, then runs `commit`.
///
/// The previous pages are put back if the swap or `commit` fails.
fn swap_in_pages(
    dir: &Path,
    staging: &Path,
    commit: impl FnOnce() -> Result<(), IoError>,
) -> Result<(), IoError> {
    let pages = dir.join(PAGES_DIR);
    let retired = dir.join(RETIRED_DIR);
    if retired.exists() {
        fs::remove_dir_all(&retired)?;
    }

    let had_pages = pages.exists();
    if had_pages {
        fs::rename(&pages, &retired)?;
    }
    if let Err(err) = fs::rename(staging, &pages) {
        if had_pages {
            fs::rename(&retired, &pages)?;
        }
        return Err(err.into());
    }
    if let Err(err) = commit() {
        fs::remove_dir_all(&pages)?;
        if had_pages {
            fs::rename(&retired, &pages)?;
        }
        return Err(err);
    }
    if had_pages {
        fs::remove_dir_all(&retired)?;
    }
    Ok(())
}

/// Writes the manifest under its staging name and returns that path.
fn stage_manifest(dir: &Path, record: &BookRecord) -> Result<PathBuf, IoError> {
    let content = toml::to_string_pretty(record)?;
    let tmp = dir.join(MANIFEST_TMP);
    fs::write(&tmp, content)?;
    Ok(tmp)
}

fn read_manifest(path: &Path) -> Result<BookRecord, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|source| IoError::ManifestParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Every book below `root` with the directory holding it.
fn scan_books(root: &Path) -> Result<Vec<(PathBuf, BookRecord)>, IoError> {
    validate_store_dir(root)?;
    let mut books = Vec::new();
    scan_directory_recursive(root, &mut books)?;
    Ok(books)
}

fn scan_directory_recursive(
    dir: &Path,
    books: &mut Vec<(PathBuf, BookRecord)>,
) -> Result<(), IoError> {
    let manifest = dir.join(MANIFEST);
    if manifest.is_file() {
        books.push((dir.to_path_buf(), read_manifest(&manifest)?));
    }

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let hidden = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with('.'));

        if path.is_dir() && !hidden && !path.ends_with(PAGES_DIR) {
            scan_directory_recursive(&path, books)?;
        }
    }

    Ok(())
}

fn page_file_name(number: u32) -> String {
    format!("{number:04}.html")
}

fn page_number(path: &Path) -> Option<u32> {
    if path.extension()? != "html" {
        return None;
    }
    path.file_stem()?.to_str()?.parse().ok()
}
