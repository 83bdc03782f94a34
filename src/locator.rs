//! Take directory discovery.
//!
//! The Shadow software stores each take in a folder named by date with an
//! ascending number for that day:
//!
//! ```text
//! ~/Documents/Motion/take/2019-06-26/0001
//! ```
//!
//! Both levels sort lexically in recording order, so the newest take is the
//! greatest take number inside the greatest date folder.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Binary frame stream inside a take folder.
pub const STREAM_FILE: &str = "data.mStream";

/// JSON take definition inside a take folder.
pub const DEFINITION_FILE: &str = "take.mTake";

/// JSON device and skeleton configuration inside a take folder.
pub const CONFIGURATION_FILE: &str = "configuration.mNode";

/// Errors locating a take.
#[derive(Debug, thiserror::Error)]
pub enum LocateError {
    /// No take folder exists under the root.
    #[error("no take found under {}", root.display())]
    NotFound { root: PathBuf },

    /// The take tree could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Paths of the files that make up one take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TakeFiles {
    pub dir: PathBuf,
    pub stream: PathBuf,
    pub definition: PathBuf,
    pub configuration: PathBuf,
}

impl TakeFiles {
    /// Files of the take in `dir`, using the standard file names.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_names(dir, STREAM_FILE, DEFINITION_FILE)
    }

    /// Files of the take in `dir`, with custom stream and definition names.
    pub fn with_names(dir: impl Into<PathBuf>, stream: &str, definition: &str) -> Self {
        let dir = dir.into();
        Self {
            stream: dir.join(stream),
            definition: dir.join(definition),
            configuration: dir.join(CONFIGURATION_FILE),
            dir,
        }
    }
}

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("valid date pattern")
    })
}

fn number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9]{4}$").expect("valid take number pattern"))
}

/// Find the most recently recorded take under `root`.
///
/// Returns the take folder, e.g. `<root>/2019-06-26/0001`. Fails with
/// [`LocateError::NotFound`] if there is no date folder, or the newest date
/// folder holds no numbered take.
pub fn find_newest_take(root: &Path) -> Result<PathBuf, LocateError> {
    let not_found = || LocateError::NotFound {
        root: root.to_path_buf(),
    };

    let date = greatest_subdir(root, date_pattern())?.ok_or_else(not_found)?;
    let day = root.join(&date);
    let number = greatest_subdir(&day, number_pattern())?.ok_or_else(not_found)?;

    let take = day.join(number);
    tracing::debug!(take = %take.display(), "Found newest take");
    Ok(take)
}

/// Path of a named take such as `2019-06-26/0001` under `root`.
pub fn take_path(root: &Path, name: &str) -> PathBuf {
    root.join(name)
}

/// Name of the lexically greatest subdirectory matching `pattern`.
fn greatest_subdir(dir: &Path, pattern: &Regex) -> Result<Option<String>, LocateError> {
    let io_err = |source| LocateError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut best: Option<String> = None;
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        if !entry.file_type().map_err(io_err)?.is_dir() {
            continue;
        }
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if !pattern.is_match(&name) {
            continue;
        }
        if best.as_deref().map_or(true, |b| name.as_str() > b) {
            best = Some(name);
        }
    }

    Ok(best)
}
