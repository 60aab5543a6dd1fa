//! Tree tidying. Normalizes every file and directory name under a root.
//!
//! Renames are collision-safe (numeric suffixes, never an overwrite) and run
//! bottom-up so no path is used after one of its ancestors moved. A dry run
//! replays the same walk against an in-memory snapshot of the tree.

mod rename;
mod suffix;

pub use rename::{
    EmptyNamePolicy, EntryKind, RenameOptions, RenameRecord, RenameReport, SkipReason,
    SkippedEntry, TreeRenamer, DEFAULT_FALLBACK_NAME, DEFAULT_MAX_SUFFIX,
};
pub use suffix::{resolve_target, split_extension, suffixed_name, ResolvedName};

use std::path::Path;

use crate::error::{Error, Result};
use crate::local_files::{FileSystem, LocalFs};
use crate::snapshot::SnapshotFs;

fn validate_root(fs: &dyn FileSystem, root: &Path) -> Result<()> {
    if !fs.exists(root) {
        return Err(Error::validation_invalid_argument(
            "path",
            format!("Path does not exist: {}", root.display()),
            None,
        ));
    }
    if !fs.is_dir(root) {
        return Err(Error::validation_invalid_argument(
            "path",
            format!("Path is not a directory: {}", root.display()),
            None,
        ));
    }
    Ok(())
}

/// Rename everything under `root` on disk with default options.
pub fn rename_tree(root: &Path) -> Result<RenameReport> {
    rename_tree_with(root, RenameOptions::default())
}

/// Rename everything under `root` on disk.
///
/// Stops at the first failed rename; renames already made stay in place.
pub fn rename_tree_with(root: &Path, options: RenameOptions) -> Result<RenameReport> {
    let mut fs = LocalFs::new();
    validate_root(&fs, root)?;
    TreeRenamer::new(&mut fs, options).run(root)
}

/// Compute the renames a real run would make, without touching disk.
pub fn plan_tree(root: &Path, options: RenameOptions) -> Result<RenameReport> {
    let local = LocalFs::new();
    validate_root(&local, root)?;
    let mut snapshot = SnapshotFs::capture(&local, root)?;
    TreeRenamer::new(&mut snapshot, options)
        .dry_run(true)
        .run(root)
}
