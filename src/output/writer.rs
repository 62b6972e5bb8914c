//! Writing decoded notes to disk without clobbering earlier results.
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::common::Result;
use crate::notepad::DecodedDocument;

use super::front_matter::FrontMatter;
use super::naming::{DEFAULT_STEM_MAX_LEN, make_stem};

/// Default output directory, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "decoded_notepad_output";

/// Default extension of decoded notes.
pub const DEFAULT_EXTENSION: &str = "md";

/// Suffix appended to every derived stem.
const DECODED_SUFFIX: &str = "_decoded";

/// Writes decoded notes into an output directory.
///
/// Files are named `<stem>_decoded.<ext>`, where the stem comes from the
/// note's first line. If that name is taken, `_1`, `_2`, ... are appended;
/// existing files are never overwritten.
///
/// # Examples
///
/// ```rust,no_run
/// use tabstate::notepad::{DecodeOptions, decode_file};
/// use tabstate::output::OutputWriter;
///
/// # fn main() -> Result<(), tabstate::Error> {
/// let source = std::path::Path::new("3f2a9c1e.bin");
/// let doc = decode_file(source, &DecodeOptions::default())?;
/// let writer = OutputWriter::new("recovered").with_front_matter(true);
/// let saved = writer.write(&doc, source)?;
/// println!("Saved decoded content to: {}", saved.display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputWriter {
    dir: PathBuf,
    extension: String,
    front_matter: bool,
    stem_max_len: usize,
}

impl Default for OutputWriter {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT_DIR)
    }
}

impl OutputWriter {
    /// Create a writer targeting `dir`.
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self {
            dir: dir.into(),
            extension: DEFAULT_EXTENSION.to_string(),
            front_matter: false,
            stem_max_len: DEFAULT_STEM_MAX_LEN,
        }
    }

    /// Set the file extension (without the leading dot).
    #[inline]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    /// Set whether a YAML provenance block is written before the text.
    #[inline]
    pub fn with_front_matter(mut self, enabled: bool) -> Self {
        self.front_matter = enabled;
        self
    }

    /// Set the maximum length of the stem derived from the first line.
    #[inline]
    pub fn with_stem_max_len(mut self, max_len: usize) -> Self {
        self.stem_max_len = max_len.max(1);
        self
    }

    /// Output directory.
    #[inline]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the output directory if it does not exist yet.
    ///
    /// Returns `true` when the directory was created by this call.
    pub fn ensure_dir(&self) -> Result<bool> {
        if self.dir.is_dir() {
            return Ok(false);
        }
        fs::create_dir_all(&self.dir)?;
        info!(dir = %self.dir.display(), "created output directory");
        Ok(true)
    }

    /// Candidate path for `stem` with collision counter `n` (0 = no counter).
    fn candidate(&self, stem: &str, n: usize) -> PathBuf {
        let name = if n == 0 {
            format!("{stem}{DECODED_SUFFIX}.{}", self.extension)
        } else {
            format!("{stem}{DECODED_SUFFIX}_{n}.{}", self.extension)
        };
        self.dir.join(name)
    }

    /// Write `content` under a name derived from it, falling back to
    /// `default_stem`. Returns the path written.
    pub fn write_text(&self, content: &str, default_stem: &str) -> Result<PathBuf> {
        let stem = make_stem(content, default_stem, self.stem_max_len);
        self.write_named(content, &stem)
    }

    /// Write `content` as `<stem>_decoded[_n].<ext>`.
    fn write_named(&self, content: &str, stem: &str) -> Result<PathBuf> {
        self.ensure_dir()?;

        let mut n = 0;
        loop {
            let path = self.candidate(stem, n);
            // create_new fails on an existing file, so a name is never reused
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => {
                    fill_new_file(file, &path, content.as_bytes())?;
                    debug!(path = %path.display(), bytes = content.len(), "wrote decoded note");
                    return Ok(path);
                },
                Err(e) if e.kind() == ErrorKind::AlreadyExists => n += 1,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Write a decoded document recovered from `source`.
    ///
    /// The source file's stem is the fallback name when the note's first
    /// line yields no usable stem.
    pub fn write(&self, doc: &DecodedDocument, source: &Path) -> Result<PathBuf> {
        let default_stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "decoded".to_string());

        if !self.front_matter {
            return self.write_text(doc.text(), &default_stem);
        }

        let mut content = FrontMatter::new(doc, source).to_yaml_block()?;
        content.push_str(doc.text());
        // Name after the note, not the provenance block
        let stem = make_stem(doc.text(), &default_stem, self.stem_max_len);
        self.write_named(&content, &stem)
    }
}

/// Write `content` into a file this writer just created, removing the file
/// again if the write fails so the name is free on the next attempt.
fn fill_new_file<W: Write>(mut file: W, path: &Path, content: &[u8]) -> Result<()> {
    let written = file.write_all(content).and_then(|()| file.flush());
    match written {
        Ok(()) => Ok(()),
        Err(e) => {
            drop(file);
            if let Err(remove_err) = fs::remove_file(path) {
                warn!(path = %path.display(), error = %remove_err, "failed to remove partial note");
            }
            Err(e.into())
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notepad::{DecodeOptions, decode_bytes};

    fn doc(text: &str) -> DecodedDocument {
        let data: Vec<u8> = text.encode_utf16().flat_map(u16::to_le_bytes).collect();
        decode_bytes(&data, &DecodeOptions::default())
    }

    fn name(path: &Path) -> String {
        path.file_name().unwrap().to_string_lossy().into_owned()
    }

    #[test]
    fn test_creates_dir_and_names_from_content() {
        let root = tempfile::tempdir().unwrap();
        let writer = OutputWriter::new(root.path().join("out"));

        let path = writer.write(&doc("Grocery list"), Path::new("guid.bin")).unwrap();
        assert_eq!(name(&path), "Grocery_list_decoded.md");
        assert_eq!(fs::read_to_string(&path).unwrap(), "Grocery list");
        assert!(!writer.ensure_dir().unwrap());
    }

    #[test]
    fn test_collision_suffixes() {
        let root = tempfile::tempdir().unwrap();
        let writer = OutputWriter::new(root.path());

        let names: Vec<String> = (0..3)
            .map(|_| name(&writer.write_text("Same title", "x").unwrap()))
            .collect();
        assert_eq!(
            names,
            vec!["Same_title_decoded.md", "Same_title_decoded_1.md", "Same_title_decoded_2.md"]
        );
        assert_eq!(
            fs::read_to_string(root.path().join("Same_title_decoded.md")).unwrap(),
            "Same title"
        );
    }

    #[test]
    fn test_default_stem_from_source() {
        let root = tempfile::tempdir().unwrap();
        let writer = OutputWriter::new(root.path()).with_extension(".txt");
        let path = writer.write(&doc("!!!! ????"), Path::new("/tmp/3f2a.bin")).unwrap();
        assert_eq!(name(&path), "3f2a_decoded.txt");
    }

    #[test]
    fn test_front_matter_prepended() {
        let root = tempfile::tempdir().unwrap();
        let writer = OutputWriter::new(root.path()).with_front_matter(true);
        let path = writer.write(&doc("Body text"), Path::new("guid.bin")).unwrap();

        assert_eq!(name(&path), "Body_text_decoded.md");
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("---\n"));
        assert!(written.ends_with("---\n\nBody text"));
    }

    #[test]
    fn test_stem_max_len() {
        let root = tempfile::tempdir().unwrap();
        let writer = OutputWriter::new(root.path()).with_stem_max_len(4);
        let path = writer.write_text("abcdefgh", "x").unwrap();
        assert_eq!(name(&path), "abcd_decoded.md");
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(ErrorKind::BrokenPipe, "disk went away"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_failed_write_frees_name() {
        let root = tempfile::tempdir().unwrap();
        let writer = OutputWriter::new(root.path());
        let path = writer.candidate("Lost", 0);
        fs::write(&path, b"").unwrap();

        let err = fill_new_file(BrokenPipe, &path, b"partial").unwrap_err();
        assert!(matches!(err, crate::Error::Io(ref e) if e.kind() == ErrorKind::BrokenPipe));
        assert!(!path.exists());

        let saved = writer.write_text("Lost", "x").unwrap();
        assert_eq!(name(&saved), "Lost_decoded.md");
    }
}
