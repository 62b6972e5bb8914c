//! Locating TabState session files.
//!
//! Notepad keeps one `<guid>.bin` file per open tab, plus numbered companion
//! files (`<guid>.0.bin`, `<guid>.1.bin`) holding view state. Only the main
//! files carry note text worth decoding.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::common::{Error, Result};

/// Package folder of the Microsoft Store build of Notepad.
pub const NOTEPAD_PACKAGE: &str = "Microsoft.WindowsNotepad_8wekyb3d8bbwe";

/// Extension of TabState files.
pub const TABSTATE_EXTENSION: &str = "bin";

/// Whether `path` has the TabState `.bin` extension (case-insensitive).
///
/// # Examples
///
/// ```
/// use tabstate::notepad::detection::is_tabstate_candidate;
///
/// assert!(is_tabstate_candidate("0a1b2c.bin"));
/// assert!(is_tabstate_candidate("0a1b2c.BIN"));
/// assert!(!is_tabstate_candidate("notes.txt"));
/// ```
pub fn is_tabstate_candidate<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| ext.eq_ignore_ascii_case(TABSTATE_EXTENSION))
}

/// Whether `path` is a numbered companion file such as `<guid>.0.bin`.
///
/// # Examples
///
/// ```
/// use tabstate::notepad::detection::is_numbered_companion;
///
/// assert!(is_numbered_companion("0a1b2c.1.bin"));
/// assert!(!is_numbered_companion("0a1b2c.bin"));
/// assert!(!is_numbered_companion("v1.bin"));
/// ```
pub fn is_numbered_companion<P: AsRef<Path>>(path: P) -> bool {
    let path = path.as_ref();
    if !is_tabstate_candidate(path) {
        return false;
    }
    let Some(stem) = path.file_stem().and_then(OsStr::to_str) else {
        return false;
    };
    match stem.rsplit_once('.') {
        Some((base, last)) => !base.is_empty() && last.len() == 1 && last.as_bytes()[0].is_ascii_digit(),
        None => false,
    }
}

/// TabState files found in a directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabStateListing {
    /// Main session files, sorted by path
    pub files: Vec<PathBuf>,
    /// Number of numbered companion files that were skipped
    pub companions_skipped: usize,
}

impl TabStateListing {
    /// Whether no main session files were found.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// List the main TabState files directly inside `dir`.
///
/// Subdirectories are not descended into. Companion files are counted but
/// not returned.
pub fn list_tabstate_files<P: AsRef<Path>>(dir: P) -> Result<TabStateListing> {
    let dir = dir.as_ref();
    let mut listing = TabStateListing::default();

    for entry in fs::read_dir(dir).map_err(|e| Error::from_io(e, dir))? {
        let path = entry?.path();
        if !path.is_file() || !is_tabstate_candidate(&path) {
            continue;
        }
        if is_numbered_companion(&path) {
            listing.companions_skipped += 1;
        } else {
            listing.files.push(path);
        }
    }

    listing.files.sort();
    debug!(
        dir = %dir.display(),
        files = listing.files.len(),
        companions = listing.companions_skipped,
        "listed TabState directory"
    );
    Ok(listing)
}

/// Notepad's TabState directory for the current Windows user.
///
/// Resolved from `%LOCALAPPDATA%`; returns `None` when the variable is unset,
/// as it is on non-Windows hosts.
pub fn default_tabstate_dir() -> Option<PathBuf> {
    std::env::var_os("LOCALAPPDATA").map(|local| tabstate_dir_under(Path::new(&local)))
}

/// TabState directory below a `LocalAppData` folder.
///
/// Useful when the Windows volume is mounted elsewhere, e.g.
/// `/mnt/c/Users/<name>/AppData/Local`.
pub fn tabstate_dir_under<P: AsRef<Path>>(local_app_data: P) -> PathBuf {
    local_app_data
        .as_ref()
        .join("Packages")
        .join(NOTEPAD_PACKAGE)
        .join("LocalState")
        .join("TabState")
}
