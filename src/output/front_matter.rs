//! YAML front matter describing where a decoded note came from.
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::common::{Error, Result};
use crate::notepad::DecodedDocument;

/// Provenance recorded at the top of a decoded note.
#[derive(Debug, Clone, Serialize)]
pub struct FrontMatter {
    /// Session file the note was recovered from
    pub source: String,
    /// Size of the session file in bytes
    pub source_bytes: Option<u64>,
    /// Last modification time of the session file
    pub source_modified: Option<DateTime<Utc>>,
    /// Strategy that recovered the text
    pub strategy: String,
    /// Number of text fragments in the note
    pub runs: usize,
    /// When the note was decoded
    pub decoded_at: DateTime<Utc>,
}

impl FrontMatter {
    /// Collect provenance for `doc`, decoded from `source`.
    ///
    /// File metadata that cannot be read is left empty rather than failing
    /// the write.
    pub fn new(doc: &DecodedDocument, source: &Path) -> Self {
        let metadata = fs::metadata(source).ok();
        Self {
            source: source.display().to_string(),
            source_bytes: metadata.as_ref().map(fs::Metadata::len),
            source_modified: metadata
                .and_then(|m| m.modified().ok())
                .map(DateTime::<Utc>::from),
            strategy: doc.strategy().to_string(),
            runs: doc.runs().len() + usize::from(doc.whole_buffer().is_some()),
            decoded_at: Utc::now(),
        }
    }

    /// Render as a YAML front matter block, delimiters included.
    pub fn to_yaml_block(&self) -> Result<String> {
        let yaml_string = serde_saphyr::to_string(self)
            .map_err(|e| Error::Other(format!("Failed to serialize front matter to YAML: {}", e)))?;

        Ok(format!("---\n{}---\n\n", yaml_string))
    }
}
