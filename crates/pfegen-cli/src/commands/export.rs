//! Document export: file and clipboard.

use crate::clipboard::copy_to_clipboard;
use crate::error::{CliError, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Write the document to `path`, creating parent directories.
pub fn save_document(document: &str, path: &Path) -> Result<()> {
    if document.is_empty() {
        return Err(CliError::NoDocument);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut contents = document.to_string();
    if !contents.ends_with('\n') {
        contents.push('\n');
    }
    fs::write(path, contents)?;
    tracing::info!(path = %path.display(), "Document saved");
    Ok(())
}

/// Put the document on the terminal clipboard.
pub fn copy_document(document: &str, out: &mut impl Write) -> Result<()> {
    if document.is_empty() {
        return Err(CliError::NoDocument);
    }
    copy_to_clipboard(document, out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_creates_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("report.tex");

        save_document("\\documentclass{report}", &path).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "\\documentclass{report}\n"
        );
    }

    #[test]
    fn test_save_without_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.tex");
        assert!(matches!(save_document("", &path), Err(CliError::NoDocument)));
        assert!(!path.exists());
    }

    #[test]
    fn test_copy_without_document() {
        let mut out = Vec::new();
        assert!(matches!(copy_document("", &mut out), Err(CliError::NoDocument)));
        assert!(out.is_empty());
    }
}
