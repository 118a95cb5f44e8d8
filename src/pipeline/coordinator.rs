//! Input collection for a classification run.

use crate::error::Result;
use crate::imaging::is_image_file;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Collect image files from paths (files and directories).
///
/// Directories are scanned recursively and their contents sorted so runs
/// are reproducible. Explicitly named files keep their command-line order.
pub fn collect_input_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            if is_image_file(path) {
                files.push(path.clone());
            } else {
                warn!("Skipping non-image file: {}", path.display());
            }
        } else if path.is_dir() {
            let mut found = Vec::new();
            collect_image_files_recursive(path, &mut found)?;
            found.sort();
            debug!("Found {} image(s) in {}", found.len(), path.display());
            files.extend(found);
        } else {
            warn!("Skipping non-existent path: {}", path.display());
        }
    }

    Ok(files)
}

/// Recursively collect image files from a directory.
fn collect_image_files_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();

        if path.is_dir() {
            collect_image_files_recursive(&path, files)?;
        } else if is_image_file(&path) {
            files.push(path);
        }
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, b"").unwrap();
    }

    #[test]
    fn test_collect_from_directory_recursively() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("b.jpg"));
        touch(&dir.path().join("a.PNG"));
        touch(&dir.path().join("notes.txt"));
        touch(&dir.path().join("field").join("c.jpeg"));

        let files = collect_input_files(&[dir.path().to_path_buf()]).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();

        assert_eq!(names, vec!["a.PNG", "b.jpg", "c.jpeg"]);
    }

    #[test]
    fn test_collect_skips_missing_and_non_images() {
        let dir = TempDir::new().unwrap();
        let image = dir.path().join("moth.jpg");
        let text = dir.path().join("moth.txt");
        touch(&image);
        touch(&text);

        let files = collect_input_files(&[
            dir.path().join("missing.jpg"),
            text,
            image.clone(),
        ])
        .unwrap();

        assert_eq!(files, vec![image]);
    }

    #[test]
    fn test_explicit_files_keep_order() {
        let dir = TempDir::new().unwrap();
        let second = dir.path().join("z.jpg");
        let first = dir.path().join("a.jpg");
        touch(&first);
        touch(&second);

        let files = collect_input_files(&[second.clone(), first.clone()]).unwrap();
        assert_eq!(files, vec![second, first]);
    }
}
