use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::{
    models::DocumentKey,
    pipeline::{PipelineOptions, ProcessedDocument, process_html},
};

/// Create a temporary store directory
pub fn create_test_store_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}

/// Write a file below `root`, creating parent directories
pub fn create_test_file(root: &Path, relative: &str, content: &str) -> PathBuf {
    let file_path = root.join(relative);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&file_path, content).unwrap();
    file_path
}

/// Run the pipeline with default options
pub fn processed(markup: &str) -> ProcessedDocument {
    process_html(markup, &PipelineOptions::default()).unwrap()
}

pub fn key(key: &str) -> DocumentKey {
    DocumentKey::new(key).unwrap()
}
