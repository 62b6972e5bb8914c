//! Decoding whole TabState directories.
//!
//! Decoding is pure, so with the `parallel` feature files are decoded on the
//! rayon pool. Writing stays on the calling thread, in sorted source order,
//! so collision suffixes come out the same on every run. One unreadable file
//! never stops the rest of the batch.

use std::path::{Path, PathBuf};

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{info, warn};

use crate::common::{Error, Result};
use crate::notepad::{DecodeOptions, DecodedDocument, decode_file, list_tabstate_files};
use crate::output::OutputWriter;

/// What happened to one session file.
#[derive(Debug)]
pub enum FileOutcome {
    /// Text was recovered and written to `path`
    Saved {
        path: PathBuf,
        document: DecodedDocument,
    },
    /// The file decoded cleanly but contained no readable text
    NoText,
    /// Reading or writing failed
    Failed { error: Error },
}

/// Per-file entry of a [`BatchReport`].
#[derive(Debug)]
pub struct FileReport {
    /// Session file that was processed
    pub source: PathBuf,
    /// Result for this file
    pub outcome: FileOutcome,
}

/// Summary of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// One entry per main session file, in sorted order
    pub files: Vec<FileReport>,
    /// Numbered companion files that were not decoded
    pub companions_skipped: usize,
}

impl BatchReport {
    /// Number of files whose text was saved.
    pub fn saved(&self) -> usize {
        self.count(|outcome| matches!(outcome, FileOutcome::Saved { .. }))
    }

    /// Number of files without readable text.
    pub fn no_text(&self) -> usize {
        self.count(|outcome| matches!(outcome, FileOutcome::NoText))
    }

    /// Number of files that failed.
    pub fn failed(&self) -> usize {
        self.count(|outcome| matches!(outcome, FileOutcome::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&FileOutcome) -> bool) -> usize {
        self.files.iter().filter(|report| pred(&report.outcome)).count()
    }
}

/// Decode every path, in parallel when the `parallel` feature is enabled.
///
/// Results are returned in the order of `paths`.
pub fn decode_all(paths: &[PathBuf], options: &DecodeOptions) -> Vec<Result<DecodedDocument>> {
    #[cfg(feature = "parallel")]
    {
        paths.par_iter().map(|path| decode_file(path, options)).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        paths.iter().map(|path| decode_file(path, options)).collect()
    }
}

/// Decode `paths` and write every note with recovered text through `writer`.
pub fn process_files(paths: &[PathBuf], options: &DecodeOptions, writer: &OutputWriter) -> BatchReport {
    let decoded = decode_all(paths, options);

    let files = paths
        .iter()
        .zip(decoded)
        .map(|(source, result)| {
            let outcome = match result {
                Ok(document) if document.is_empty() => {
                    info!(source = %source.display(), "no readable content");
                    FileOutcome::NoText
                },
                Ok(document) => match writer.write(&document, source) {
                    Ok(path) => {
                        info!(source = %source.display(), saved = %path.display(), "decoded");
                        FileOutcome::Saved { path, document }
                    },
                    Err(error) => {
                        warn!(source = %source.display(), %error, "failed to write decoded note");
                        FileOutcome::Failed { error }
                    },
                },
                Err(error) => {
                    warn!(source = %source.display(), %error, "failed to decode");
                    FileOutcome::Failed { error }
                },
            };
            FileReport {
                source: source.clone(),
                outcome,
            }
        })
        .collect();

    BatchReport {
        files,
        companions_skipped: 0,
    }
}

/// Decode every main TabState file in `dir`.
///
/// Fails only when the directory cannot be listed or holds no main session
/// files ([`Error::NoTargets`]); per-file problems are recorded in the report.
pub fn process_directory<P: AsRef<Path>>(
    dir: P,
    options: &DecodeOptions,
    writer: &OutputWriter,
) -> Result<BatchReport> {
    let dir = dir.as_ref();
    let listing = list_tabstate_files(dir)?;
    if listing.is_empty() {
        return Err(Error::NoTargets(dir.to_path_buf()));
    }

    info!(
        dir = %dir.display(),
        files = listing.files.len(),
        companions = listing.companions_skipped,
        "processing TabState directory"
    );

    let mut report = process_files(&listing.files, options, writer);
    report.companions_skipped = listing.companions_skipped;
    Ok(report)
}
