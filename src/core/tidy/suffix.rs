//! Collision suffixes for rename targets.

use std::path::Path;

use crate::error::{Error, Result};
use crate::local_files::FileSystem;

/// Split a base name into stem and extension (extension keeps its dot).
///
/// The last `.` starts the extension unless only dots precede it, so
/// `.bashrc` and `..x` have no extension while `.a.b` splits into `.a` / `.b`.
pub fn split_extension(name: &str) -> (&str, &str) {
    if let Some(dot) = name.rfind('.') {
        if name[..dot].chars().any(|c| c != '.') {
            return (&name[..dot], &name[dot..]);
        }
    }
    (name, "")
}

/// Candidate name with numeric suffix `n`.
///
/// Directories always take `candidate-n`; files keep their extension last
/// (`stem-n.ext`).
pub fn suffixed_name(candidate: &str, n: u32, is_dir: bool) -> String {
    if is_dir {
        return format!("{}-{}", candidate, n);
    }

    let (stem, ext) = split_extension(candidate);
    // Keep `a-.txt` from turning into `a--1.txt`, which would not be normalized.
    format!("{}-{}{}", stem.trim_end_matches('-'), n, ext)
}

/// A free name inside one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedName {
    pub name: String,
    /// Suffix used to get past a collision, if any.
    pub suffix: Option<u32>,
}

/// Find the first name under `parent` not already taken: the candidate
/// itself, then suffixes 1, 2, … up to `max_suffix`.
pub fn resolve_target(
    fs: &dyn FileSystem,
    parent: &Path,
    candidate: &str,
    is_dir: bool,
    max_suffix: u32,
) -> Result<ResolvedName> {
    if !fs.exists(&parent.join(candidate)) {
        return Ok(ResolvedName {
            name: candidate.to_string(),
            suffix: None,
        });
    }

    for n in 1..=max_suffix {
        let name = suffixed_name(candidate, n, is_dir);
        if !fs.exists(&parent.join(&name)) {
            return Ok(ResolvedName {
                name,
                suffix: Some(n),
            });
        }
    }

    Err(Error::tidy_suffix_exhausted(
        parent.display().to_string(),
        candidate,
        max_suffix,
    ))
}
