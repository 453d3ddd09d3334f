// src/input/archive.rs
use std::fs::File;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use walkdir::WalkDir;

use crate::utils::error::SheetError;

/// Resolves the batch input to a directory of spreadsheets: a directory is
/// used as-is, a `.zip` archive is extracted into a scratch directory that
/// lives as long as the returned guard.
pub fn prepare_input(path: &Path) -> Result<(PathBuf, Option<TempDir>), SheetError> {
    if path.is_dir() {
        return Ok((path.to_path_buf(), None));
    }

    let is_zip = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"));
    if !is_zip {
        return Err(SheetError::UnsupportedInput(path.display().to_string()));
    }

    let file = File::open(path)?;
    let mut archive = zip::ZipArchive::new(file)?;
    let scratch = TempDir::new()?;
    archive.extract(scratch.path())?;
    tracing::info!(
        "Extracted {} archive entries to {}",
        archive.len(),
        scratch.path().display()
    );

    let dir = scratch.path().to_path_buf();
    Ok((dir, Some(scratch)))
}

/// Recursively enumerates `.xlsx` files under `dir` in sorted order,
/// regardless of folder structure inside the archive.
pub fn find_spreadsheets(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("Skipping unreadable directory entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_spreadsheet(path))
        .collect();
    files.sort();
    files
}

fn is_spreadsheet(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
        return false;
    };
    // macOS resource forks inside archives also carry the .xlsx suffix
    if name.starts_with("._") {
        return false;
    }
    name.to_ascii_lowercase().ends_with(".xlsx")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn filters_extension_case_insensitively() {
        assert!(is_spreadsheet(Path::new("a/b/문서.xlsx")));
        assert!(is_spreadsheet(Path::new("a/b/DOC.XLSX")));
        assert!(!is_spreadsheet(Path::new("a/b/doc.xls")));
        assert!(!is_spreadsheet(Path::new("a/__MACOSX/._doc.xlsx")));
    }

    #[test]
    fn enumeration_is_recursive_and_sorted() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("깊은/폴더")).unwrap();
        fs::write(dir.path().join("깊은/폴더/b.xlsx"), b"stub").unwrap();
        fs::write(dir.path().join("a.xlsx"), b"stub").unwrap();
        fs::write(dir.path().join("readme.txt"), b"stub").unwrap();

        let files = find_spreadsheets(dir.path());
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("a.xlsx"));
        assert!(files[1].ends_with("깊은/폴더/b.xlsx"));
    }

    #[test]
    fn directory_input_passes_through() {
        let dir = TempDir::new().unwrap();
        let (resolved, guard) = prepare_input(dir.path()).unwrap();
        assert_eq!(resolved, dir.path());
        assert!(guard.is_none());
    }

    #[test]
    fn non_zip_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("input.tar");
        fs::write(&file, b"stub").unwrap();
        assert!(matches!(
            prepare_input(&file),
            Err(SheetError::UnsupportedInput(_))
        ));
    }
}
