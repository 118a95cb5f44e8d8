//! Human-readable report rendering.

use crate::output::format_percent;
use crate::pipeline::{ImageReport, Outcome};
use crate::taxonomy::{RecordField, SpeciesRecord};
use std::fmt::Write;

/// Render the full report for one classified image.
pub fn render_report(report: &ImageReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "File: {}", report.file.display());

    match &report.outcome {
        Outcome::Identified {
            species,
            confidence,
            record,
        } => {
            let _ = writeln!(out, "Predicted Class: {species}");
            let _ = writeln!(out, "Confidence: {}", format_percent(*confidence));
            out.push('\n');
            out.push_str(&render_record(record));
        }
        Outcome::DetailsUnavailable {
            species,
            confidence,
        } => {
            let _ = writeln!(out, "Predicted Class: {species}");
            let _ = writeln!(out, "Confidence: {}", format_percent(*confidence));
            out.push('\n');
            let _ = writeln!(out, "{}", report.outcome.message().unwrap_or_default());
        }
        Outcome::Unclassifiable { .. } => {
            let _ = writeln!(out, "{}", report.outcome.message().unwrap_or_default());
        }
    }

    if report.ranked.len() > 1 {
        out.push('\n');
        let _ = writeln!(out, "Top {} predictions:", report.ranked.len());
        for (rank, ranked) in report.ranked.iter().enumerate() {
            let name = ranked
                .species
                .clone()
                .unwrap_or_else(|| format!("<class {}>", ranked.index));
            let _ = writeln!(
                out,
                "  {}. {name} ({})",
                rank + 1,
                format_percent(ranked.confidence)
            );
        }
    }

    out
}

/// Render the taxonomy table and narrative sections of a record.
pub fn render_record(record: &SpeciesRecord) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Taxonomy");
    let width = RecordField::TAXONOMY
        .iter()
        .map(|f| f.key().len())
        .max()
        .unwrap_or(0);
    for field in RecordField::TAXONOMY {
        let _ = writeln!(
            out,
            "  {:<width$}  {}",
            field.key(),
            record.display(field)
        );
    }

    for field in RecordField::NARRATIVE {
        out.push('\n');
        let _ = writeln!(out, "{}", field.key());
        let _ = writeln!(out, "  {}", record.display(field));
    }

    out
}
