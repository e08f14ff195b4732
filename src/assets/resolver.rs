//! Ordered asset lookup
//!
//! Assets are plain files named by number (`3.png`, `3.mp3`) that may live
//! in any of several folders under the asset root, so different packaging
//! layouts work without changes. The first folder holding the file wins.

use std::path::{Path, PathBuf};

/// Background image drawn behind everything else
pub const BACKGROUND_IMAGE: &str = "bluesparklesbackground.png";

/// Subfolders searched in order, most specific first
const SEARCH_BASES: [&str; 4] = ["countinggame/resources", "countinggame", "resources", ""];

/// Logical image name for a number
pub fn image_name(number: u8) -> String {
    format!("{number}.png")
}

/// Logical sound name for a number
pub fn sound_name(number: u8) -> String {
    format!("{number}.mp3")
}

/// Resolves logical asset names against a fixed list of base folders
///
/// Lookups hit the filesystem on every call; nothing is cached.
#[derive(Debug, Clone)]
pub struct AssetResolver {
    bases: Vec<PathBuf>,
}

impl AssetResolver {
    /// Creates a resolver searching the standard folders under `root`
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let bases = SEARCH_BASES
            .iter()
            .map(|base| {
                if base.is_empty() {
                    root.to_path_buf()
                } else {
                    root.join(base)
                }
            })
            .collect();
        Self { bases }
    }

    /// Search folders in priority order
    pub fn bases(&self) -> &[PathBuf] {
        &self.bases
    }

    /// Finds the first existing file called `name`
    ///
    /// Returns `None` when no base holds the file or when `name` is not a
    /// single plain file name.
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        if !is_plain_file_name(name) {
            return None;
        }

        self.bases
            .iter()
            .map(|base| base.join(name))
            .find(|candidate| candidate.is_file())
    }
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', ':'])
}
