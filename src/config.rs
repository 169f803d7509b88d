// SPDX-License-Identifier: MIT
//
// Resolved configuration for one invocation.
//
// Flags win over environment variables (clap handles both), and anything
// left unset falls back to a location under the user's data directory:
//
//   output   → --output-dir   / SYNESTHESIA_OUTPUT_DIR   / <data>/synesthesia
//   includes → --include-dir  / SYNESTHESIA_INCLUDE_DIR  / <output>/includes

use std::path::PathBuf;

/// Subdirectory of the output directory holding shared include documents.
pub const INCLUDES_DIR: &str = "includes";

/// Where compiled artifacts go and where shared includes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub output_dir: PathBuf,
    pub include_dir: PathBuf,
    /// Theme document whose global colours seed generated themes.
    pub base_theme: Option<PathBuf>,
}

impl Config {
    /// Build a configuration, filling in defaults for unset locations.
    #[must_use]
    pub fn resolve(
        output_dir: Option<PathBuf>,
        include_dir: Option<PathBuf>,
        base_theme: Option<PathBuf>,
    ) -> Self {
        let output_dir = output_dir.unwrap_or_else(default_output_dir);
        let include_dir = include_dir.unwrap_or_else(|| output_dir.join(INCLUDES_DIR));
        Self {
            output_dir,
            include_dir,
            base_theme,
        }
    }

    /// Configuration rooted at `dir`, with no base theme.
    #[cfg(test)]
    #[must_use]
    pub fn in_dir(dir: &std::path::Path) -> Self {
        Self::resolve(Some(dir.to_path_buf()), None, None)
    }
}

/// `<data dir>/synesthesia`, or `./synesthesia-out` when the platform has
/// no data directory.
#[must_use]
pub fn default_output_dir() -> PathBuf {
    dirs::data_dir().map_or_else(|| PathBuf::from("synesthesia-out"), |d| d.join("synesthesia"))
}
