// Path resolution
// Expands a catalogue's relative entries against its base path

use std::path::{Path, PathBuf};

/// Join each relative path onto the base path, preserving order and count.
///
/// Pure path arithmetic: never touches the filesystem and never checks that
/// the results exist.
pub fn resolve_paths(base: &Path, relative: &[PathBuf]) -> Vec<PathBuf> {
    relative.iter().map(|rel| base.join(rel)).collect()
}
