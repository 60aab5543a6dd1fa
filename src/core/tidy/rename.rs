//! Tree renamer. Normalizes every name under a root, bottom-up.
//!
//! Walk order per directory:
//! 1. Recurse into every subdirectory (so nothing below is renamed through a
//!    stale path later)
//! 2. Rename the subdirectories themselves
//! 3. Rename the files
//!
//! Each rename is preceded by an existence check against the live
//! filesystem, so siblings stay pairwise distinct after every single step.
//! The root itself is never renamed.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::suffix::resolve_target;
use crate::error::{Error, Result};
use crate::local_files::{Entry, FileSystem};
use crate::normalize::{NormalizeOptions, Normalizer};

// ============================================================================
// Types
// ============================================================================

/// What to do when a name normalizes to the empty string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyNamePolicy {
    /// Leave the entry alone and report it.
    #[default]
    Skip,
    /// Abort the run.
    Error,
    /// Rename to the configured fallback name.
    Fallback,
}

pub const DEFAULT_FALLBACK_NAME: &str = "untitled";
pub const DEFAULT_MAX_SUFFIX: u32 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameOptions {
    pub normalize: NormalizeOptions,
    pub empty_name: EmptyNamePolicy,
    pub fallback_name: String,
    pub max_suffix: u32,
}

impl Default for RenameOptions {
    fn default() -> Self {
        Self {
            normalize: NormalizeOptions::default(),
            empty_name: EmptyNamePolicy::default(),
            fallback_name: DEFAULT_FALLBACK_NAME.to_string(),
            max_suffix: DEFAULT_MAX_SUFFIX,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

impl EntryKind {
    fn of(entry: &Entry) -> Self {
        if entry.is_dir {
            EntryKind::Directory
        } else {
            EntryKind::File
        }
    }
}

/// One performed (or planned) rename. Paths are relative to the root and
/// reflect the tree at the moment of the rename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameRecord {
    pub from: String,
    pub to: String,
    pub kind: EntryKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    EmptyName,
    NonUtf8Name,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    pub path: String,
    pub kind: EntryKind,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenameReport {
    pub root: String,
    pub dry_run: bool,
    /// Entries visited, root excluded.
    pub scanned: usize,
    /// Entries whose name was already normalized.
    pub unchanged: usize,
    pub renames: Vec<RenameRecord>,
    pub skipped: Vec<SkippedEntry>,
}

impl RenameReport {
    fn new(root: &Path, dry_run: bool) -> Self {
        Self {
            root: root.display().to_string(),
            dry_run,
            scanned: 0,
            unchanged: 0,
            renames: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn collisions(&self) -> usize {
        self.renames.iter().filter(|r| r.suffix.is_some()).count()
    }
}

// ============================================================================
// Walk
// ============================================================================

pub struct TreeRenamer<'a> {
    fs: &'a mut dyn FileSystem,
    normalizer: Normalizer,
    options: RenameOptions,
    dry_run: bool,
}

impl<'a> TreeRenamer<'a> {
    pub fn new(fs: &'a mut dyn FileSystem, options: RenameOptions) -> Self {
        Self {
            fs,
            normalizer: Normalizer::new(options.normalize.clone()),
            options,
            dry_run: false,
        }
    }

    /// Mark the report as a plan; only affects reporting and log prefixes.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn run(&mut self, root: &Path) -> Result<RenameReport> {
        let mut report = RenameReport::new(root, self.dry_run);
        self.walk(root, root, &mut report)?;
        Ok(report)
    }

    fn walk(&mut self, root: &Path, dir: &Path, report: &mut RenameReport) -> Result<()> {
        let (dirs, files): (Vec<Entry>, Vec<Entry>) =
            self.fs.list(dir)?.into_iter().partition(|e| e.is_dir);

        for sub in &dirs {
            self.walk(root, &sub.path, report)?;
        }
        for sub in &dirs {
            self.process(root, dir, sub, report)?;
        }
        for file in &files {
            self.process(root, dir, file, report)?;
        }

        Ok(())
    }

    fn process(
        &mut self,
        root: &Path,
        dir: &Path,
        entry: &Entry,
        report: &mut RenameReport,
    ) -> Result<()> {
        report.scanned += 1;
        let kind = EntryKind::of(entry);

        let Some(name) = entry.path.file_name().and_then(|n| n.to_str()) else {
            report.skipped.push(SkippedEntry {
                path: relative(root, &entry.path),
                kind,
                reason: SkipReason::NonUtf8Name,
            });
            return Ok(());
        };

        let mut candidate = self.normalizer.normalize(name);
        if candidate == name {
            report.unchanged += 1;
            return Ok(());
        }

        if candidate.is_empty() {
            match self.options.empty_name {
                EmptyNamePolicy::Skip => {
                    report.skipped.push(SkippedEntry {
                        path: relative(root, &entry.path),
                        kind,
                        reason: SkipReason::EmptyName,
                    });
                    return Ok(());
                }
                EmptyNamePolicy::Error => {
                    return Err(Error::tidy_empty_name(relative(root, &entry.path)));
                }
                EmptyNamePolicy::Fallback => {
                    candidate = self.options.fallback_name.clone();
                }
            }
        }

        let target = resolve_target(
            &*self.fs,
            dir,
            &candidate,
            entry.is_dir,
            self.options.max_suffix,
        )?;
        let to: PathBuf = dir.join(&target.name);

        self.fs.rename(&entry.path, &to)?;

        let record = RenameRecord {
            from: relative(root, &entry.path),
            to: relative(root, &to),
            kind,
            suffix: target.suffix,
        };
        if self.dry_run {
            log_status!("plan", "{} -> {}", record.from, record.to);
        } else {
            log_status!("tidy", "{} -> {}", record.from, record.to);
        }
        report.renames.push(record);

        Ok(())
    }
}

fn relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .to_string()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::SnapshotFs;

    fn run(paths: &[&str], options: RenameOptions) -> (SnapshotFs, Result<RenameReport>) {
        let mut snap = SnapshotFs::from_paths("/r", paths);
        let result = TreeRenamer::new(&mut snap, options).run(Path::new("/r"));
        (snap, result)
    }

    #[test]
    fn nested_tree_renames_bottom_up() {
        let (snap, result) = run(&["A/B/File Name.txt"], RenameOptions::default());
        let report = result.unwrap();

        assert_eq!(snap.paths(), vec!["a/", "a/b/", "a/b/file-name.txt"]);
        let order: Vec<(&str, &str)> = report
            .renames
            .iter()
            .map(|r| (r.from.as_str(), r.to.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("A/B/File Name.txt", "A/B/file-name.txt"),
                ("A/B", "A/b"),
                ("A", "a"),
            ]
        );
    }

    #[test]
    fn case_collision_gets_suffix_before_extension() {
        let (snap, result) = run(
            &["My Files/Draft.txt", "My Files/draft.txt"],
            RenameOptions::default(),
        );
        let report = result.unwrap();

        assert_eq!(
            snap.paths(),
            vec!["my-files/", "my-files/draft-1.txt", "my-files/draft.txt"]
        );
        assert_eq!(report.collisions(), 1);
        assert_eq!(report.unchanged, 1);
    }

    #[test]
    fn clean_names_are_not_touched() {
        let (_, result) = run(&["clean-name.txt", "docs/"], RenameOptions::default());
        let report = result.unwrap();
        assert!(report.renames.is_empty());
        assert_eq!(report.scanned, 2);
        assert_eq!(report.unchanged, 2);
    }

    #[test]
    fn directories_rename_before_files_in_same_directory() {
        let (snap, result) = run(&["Notes/", "NOTES"], RenameOptions::default());
        let report = result.unwrap();
        assert_eq!(report.renames[0].kind, EntryKind::Directory);
        assert_eq!(report.renames[0].to, "notes");
        assert_eq!(report.renames[1].kind, EntryKind::File);
        assert_eq!(report.renames[1].to, "notes-1");
        assert_eq!(snap.paths(), vec!["notes/", "notes-1"]);
    }

    #[test]
    fn directory_suffix_ignores_dots() {
        let (snap, _) = run(&["v1.0/", "V1.0/"], RenameOptions::default());
        assert_eq!(snap.paths(), vec!["v1.0/", "v1.0-1/"]);
    }

    #[test]
    fn empty_name_is_skipped_by_default() {
        let (snap, result) = run(&["'''"], RenameOptions::default());
        let report = result.unwrap();
        assert_eq!(snap.paths(), vec!["'''"]);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].reason, SkipReason::EmptyName);
    }

    #[test]
    fn empty_name_error_policy_aborts() {
        let options = RenameOptions {
            empty_name: EmptyNamePolicy::Error,
            ..RenameOptions::default()
        };
        let (_, result) = run(&["( )"], options);
        assert_eq!(result.unwrap_err().code.as_str(), "tidy.empty_name");
    }

    #[test]
    fn empty_name_fallback_uses_collision_logic() {
        let options = RenameOptions {
            empty_name: EmptyNamePolicy::Fallback,
            ..RenameOptions::default()
        };
        let (snap, result) = run(&["'", "untitled"], options);
        let report = result.unwrap();
        assert_eq!(snap.paths(), vec!["untitled", "untitled-1"]);
        assert_eq!(report.renames[0].suffix, Some(1));
    }

    #[test]
    fn second_run_is_a_no_op() {
        let paths = [
            "Photos & Videos/Summer (2023)/IMG 1.JPG",
            "Photos & Videos/summer 2023/img 1.jpg",
            "  'Quoted Dir/File.TXT",
        ];
        let mut snap = SnapshotFs::from_paths("/r", &paths);
        TreeRenamer::new(&mut snap, RenameOptions::default())
            .run(Path::new("/r"))
            .unwrap();
        let after_first = snap.paths();

        let report = TreeRenamer::new(&mut snap, RenameOptions::default())
            .run(Path::new("/r"))
            .unwrap();
        assert!(report.renames.is_empty());
        assert_eq!(snap.paths(), after_first);
    }

    #[test]
    fn mark_left_behind_by_quote_is_composed_in_one_run() {
        let mut snap = SnapshotFs::from_paths("/r", &["Cafe'\u{0301}.txt"]);
        TreeRenamer::new(&mut snap, RenameOptions::default())
            .run(Path::new("/r"))
            .unwrap();
        assert_eq!(snap.paths(), vec!["caf\u{e9}.txt"]);

        let report = TreeRenamer::new(&mut snap, RenameOptions::default())
            .run(Path::new("/r"))
            .unwrap();
        assert!(report.renames.is_empty());
    }

    #[test]
    fn suffix_limit_is_enforced() {
        let options = RenameOptions {
            max_suffix: 1,
            ..RenameOptions::default()
        };
        let (_, result) = run(&["A", "a", "a-1"], options);
        assert_eq!(result.unwrap_err().code.as_str(), "tidy.suffix_exhausted");
    }
}
