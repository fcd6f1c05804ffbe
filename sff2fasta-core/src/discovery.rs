//! Input discovery module for finding SFF files to process.
//!
//! This module expands the user-supplied input path into an ordered list of
//! conversion inputs. A directory is searched at the top level for `.sff`
//! files (case-insensitive); a single file is accepted as-is, without
//! extension filtering.

use crate::config::SFF_EXTENSION;
use crate::error::{CoreError, CoreResult};

use std::path::{Path, PathBuf};

/// Resolves the input path into the ordered list of files to convert.
///
/// * Directory: returns the `.sff` files (case-insensitive) found at the top
///   level, sorted so the ordering is deterministic across platforms. Does
///   not search subdirectories.
/// * Single file: returns a one-element list containing that path.
/// * Anything else: a configuration-time error; the run must terminate
///   before any conversion is attempted.
///
/// # Returns
///
/// * `Ok(Vec<PathBuf>)` - The ordered list of input paths
/// * `Err(CoreError::NoFilesFound)` - If a directory contains no `.sff` files
/// * `Err(CoreError::PathError)` - If the path is neither file nor directory
pub fn find_processable_files(input_path: &Path) -> CoreResult<Vec<PathBuf>> {
    if input_path.is_dir() {
        let read_dir = std::fs::read_dir(input_path)?;
        let mut files: Vec<PathBuf> = read_dir
            .filter_map(|entry| {
                let entry = entry.ok()?;
                let path = entry.path();

                if !path.is_file() {
                    return None;
                }

                path.extension()
                    .and_then(|ext| ext.to_str())
                    .filter(|ext_str| ext_str.eq_ignore_ascii_case(SFF_EXTENSION))
                    .map(|_| path.clone())
            })
            .collect();

        // Directory-iteration order varies by filesystem; sort for determinism
        files.sort();

        if files.is_empty() {
            Err(CoreError::NoFilesFound)
        } else {
            Ok(files)
        }
    } else if input_path.is_file() {
        Ok(vec![input_path.to_path_buf()])
    } else {
        Err(CoreError::PathError(format!(
            "Input path '{}' is neither a file nor a directory",
            input_path.display()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        File::create(&path).expect("failed to create test file");
        path
    }

    #[test]
    fn finds_all_sff_files_in_directory() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "b.sff");
        touch(dir.path(), "a.sff");
        touch(dir.path(), "c.SFF");
        touch(dir.path(), "notes.txt");

        let files = find_processable_files(dir.path()).unwrap();
        assert_eq!(files.len(), 3);
        for file in &files {
            assert!(file.exists());
        }
    }

    #[test]
    fn directory_listing_is_sorted() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "zebra.sff");
        touch(dir.path(), "alpha.sff");
        touch(dir.path(), "mid.sff");

        let files = find_processable_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["alpha.sff", "mid.sff", "zebra.sff"]);
    }

    #[test]
    fn single_file_is_returned_without_extension_filtering() {
        let dir = tempdir().unwrap();
        let file = touch(dir.path(), "reads.dat");

        let files = find_processable_files(&file).unwrap();
        assert_eq!(files, vec![file]);
    }

    #[test]
    fn empty_directory_reports_no_files() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            find_processable_files(dir.path()),
            Err(CoreError::NoFilesFound)
        ));
    }

    #[test]
    fn missing_path_is_a_path_error() {
        assert!(matches!(
            find_processable_files(Path::new("/no/such/path")),
            Err(CoreError::PathError(_))
        ));
    }

    #[test]
    fn subdirectories_are_not_searched() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "top.sff");
        let sub = dir.path().join("nested");
        std::fs::create_dir(&sub).unwrap();
        touch(&sub, "deep.sff");

        let files = find_processable_files(dir.path()).unwrap();
        assert_eq!(files.len(), 1);
    }
}
