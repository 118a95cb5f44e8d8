//! CSV results table.

use crate::constants::confidence::DECIMAL_PLACES;
use crate::error::{Error, Result};
use crate::pipeline::ImageReport;
use std::fs::File;
use std::path::{Path, PathBuf};

const HEADER: [&str; 5] = ["file", "status", "index", "species", "confidence"];

/// CSV writer with one row per classified image.
pub struct CsvResultWriter {
    writer: csv::Writer<File>,
    path: PathBuf,
}

impl CsvResultWriter {
    /// Create the file and write the header row.
    pub fn create(path: &Path) -> Result<Self> {
        let writer = csv::Writer::from_path(path).map_err(|e| Error::CsvWrite {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut this = Self {
            writer,
            path: path.to_path_buf(),
        };
        this.write_row(HEADER)?;
        Ok(this)
    }

    /// Append the row for one report.
    pub fn write_report(&mut self, report: &ImageReport) -> Result<()> {
        let file = report.file.display().to_string();
        let index = report.index.to_string();
        let confidence = format!(
            "{:.decimal$}",
            report.outcome.confidence(),
            decimal = DECIMAL_PLACES
        );

        self.write_row([
            file.as_str(),
            report.outcome.status(),
            index.as_str(),
            report.outcome.species().unwrap_or_default(),
            confidence.as_str(),
        ])
    }

    /// Flush buffered rows to disk.
    pub fn finish(mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn write_row<'a>(&mut self, row: impl IntoIterator<Item = &'a str>) -> Result<()> {
        self.writer.write_record(row).map_err(|e| Error::CsvWrite {
            path: self.path.clone(),
            source: e,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::pipeline::Outcome;
    use tempfile::TempDir;

    #[test]
    fn test_csv_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("results.csv");

        let mut writer = CsvResultWriter::create(&path).unwrap();
        writer
            .write_report(&ImageReport {
                file: PathBuf::from("a, b.jpg"),
                index: 4,
                outcome: Outcome::DetailsUnavailable {
                    species: "Aedes aegypti".to_string(),
                    confidence: 0.8542,
                },
                ranked: vec![],
                duration_ms: 1,
            })
            .unwrap();
        writer
            .write_report(&ImageReport {
                file: PathBuf::from("c.png"),
                index: 300,
                outcome: Outcome::Unclassifiable {
                    index: 300,
                    confidence: 0.5,
                },
                ranked: vec![],
                duration_ms: 1,
            })
            .unwrap();
        writer.finish().unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines[0], "file,status,index,species,confidence");
        assert_eq!(
            lines[1],
            "\"a, b.jpg\",details_unavailable,4,Aedes aegypti,0.8542"
        );
        assert_eq!(lines[2], "c.png,unclassifiable,300,,0.5000");
    }

    #[test]
    fn test_csv_create_in_missing_dir_fails() {
        let result = CsvResultWriter::create(Path::new("/nonexistent/dir/results.csv"));
        assert!(matches!(result, Err(Error::CsvWrite { .. })));
    }
}
