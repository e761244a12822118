use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::error;
use serde::Serialize;

use crate::classifier::Classifier;
use crate::models::PredictedLabels;

#[derive(Debug, Serialize)]
pub struct FileReport<'a> {
    pub path: &'a Path,
    pub predicted_labels: PredictedLabels,
}

/// Classifies each image on disk and writes one JSON object per line to `out`.
///
/// Images that fail are logged and skipped. Returns how many failed.
pub fn classify_paths<W: Write>(
    classifier: &Classifier,
    paths: &[PathBuf],
    out: &mut W,
) -> io::Result<usize> {
    let mut failures = 0;

    for path in paths {
        match classifier.classify_file(path) {
            Ok(predicted_labels) => {
                let report = FileReport {
                    path,
                    predicted_labels,
                };
                serde_json::to_writer(&mut *out, &report)?;
                writeln!(out)?;
            }
            Err(e) => {
                error!("{}: {}", path.display(), e);
                failures += 1;
            }
        }
    }

    Ok(failures)
}
