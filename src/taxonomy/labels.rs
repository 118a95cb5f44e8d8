//! Ordered class names addressed by model output index.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Class names of the bundled `MobileNetV2` insect model, one per line.
const BUNDLED_LABELS: &str = include_str!("../../assets/labels.txt");

/// Result of looking up a model output index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelLookup<'a> {
    /// Index maps to a class name.
    Found(&'a str),
    /// Index lies outside the table.
    OutOfRange {
        /// Requested index.
        index: usize,
        /// Number of labels in the table.
        len: usize,
    },
}

/// Ordered list of class names; position equals model output index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelTable {
    labels: Vec<String>,
}

impl LabelTable {
    /// Build a table from already-parsed labels.
    ///
    /// Entries are trimmed and blank entries dropped.
    pub fn new<I, S>(labels: I, source_name: &str) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let labels: Vec<String> = labels
            .into_iter()
            .map(|l| l.as_ref().trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();

        if labels.is_empty() {
            return Err(Error::EmptyLabelTable {
                source_name: source_name.to_string(),
            });
        }

        Ok(Self { labels })
    }

    /// The label table compiled into the binary.
    pub fn bundled() -> Result<Self> {
        Self::new(BUNDLED_LABELS.lines(), "bundled")
    }

    /// Read labels from a file.
    ///
    /// # File Format
    /// - One class name per line, in model output order
    /// - Blank lines are ignored
    /// - Leading and trailing whitespace is trimmed
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::LabelsFileNotFound {
                path: path.to_path_buf(),
            });
        }

        let file = File::open(path).map_err(|e| Error::LabelsRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut labels = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|e| Error::LabelsRead {
                path: path.to_path_buf(),
                source: e,
            })?;
            labels.push(line);
        }

        Self::new(labels, &path.display().to_string())
    }

    /// Load from `path` if given, otherwise fall back to the bundled table.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(Self::bundled, Self::from_file)
    }

    /// Look up the class name for a model output index.
    pub fn get(&self, index: usize) -> LabelLookup<'_> {
        self.labels.get(index).map_or(
            LabelLookup::OutOfRange {
                index,
                len: self.labels.len(),
            },
            |name| LabelLookup::Found(name.as_str()),
        )
    }

    /// Number of classes.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the table has no labels. Construction rejects empty input.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterate over class names in index order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_bundled_table_matches_deployed_model() {
        let table = LabelTable::bundled().unwrap();
        assert_eq!(table.len(), 105);
        assert!(!table.is_empty());
        assert_eq!(table.get(0), LabelLookup::Found("Acanthophilus helianthi rossi"));
        assert_eq!(table.get(4), LabelLookup::Found("Aedes aegypti"));
        assert_eq!(table.get(104), LabelLookup::Found("Periplaneta americana"));
    }

    #[test]
    fn test_every_valid_index_has_a_name() {
        let table = LabelTable::bundled().unwrap();
        for i in 0..table.len() {
            match table.get(i) {
                LabelLookup::Found(name) => assert!(!name.is_empty()),
                LabelLookup::OutOfRange { .. } => panic!("index {i} should be in range"),
            }
        }
    }

    #[test]
    fn test_out_of_range_index() {
        let table = LabelTable::new(["a", "b"], "test").unwrap();
        assert_eq!(
            table.get(2),
            LabelLookup::OutOfRange { index: 2, len: 2 }
        );
        assert_eq!(
            table.get(usize::MAX),
            LabelLookup::OutOfRange {
                index: usize::MAX,
                len: 2
            }
        );
    }

    #[test]
    fn test_from_file_skips_blank_lines_and_trims() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "  Apis mellifera ").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "Tuta absoluta").unwrap();

        let table = LabelTable::from_file(file.path()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(0), LabelLookup::Found("Apis mellifera"));
        assert_eq!(table.get(1), LabelLookup::Found("Tuta absoluta"));
    }

    #[test]
    fn test_empty_file_is_rejected() {
        let file = NamedTempFile::new().unwrap();
        let result = LabelTable::from_file(file.path());
        assert!(matches!(result, Err(Error::EmptyLabelTable { .. })));
    }

    #[test]
    fn test_missing_file() {
        let result = LabelTable::from_file(Path::new("/nonexistent/labels.txt"));
        assert!(matches!(result, Err(Error::LabelsFileNotFound { .. })));
    }

    #[test]
    fn test_load_without_path_uses_bundled() {
        let table = LabelTable::load(None).unwrap();
        assert_eq!(table.len(), LabelTable::bundled().unwrap().len());
    }
}
