use std::path::Path;

use tidytree::local_files::{Entry, FileSystem};
use tidytree::snapshot::SnapshotFs;
use tidytree::tidy::{RenameOptions, TreeRenamer};
use tidytree::{Error, Result};

/// Snapshot that refuses to rename one particular source name.
struct FailingFs {
    inner: SnapshotFs,
    fail_on: &'static str,
    calls: Vec<String>,
}

impl FileSystem for FailingFs {
    fn list(&self, dir: &Path) -> Result<Vec<Entry>> {
        self.inner.list(dir)
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner.exists(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.inner.is_dir(path)
    }

    fn rename(&mut self, from: &Path, to: &Path) -> Result<()> {
        let name = from.file_name().unwrap().to_string_lossy().to_string();
        self.calls.push(name.clone());
        if name == self.fail_on {
            return Err(Error::tidy_rename_failed(
                from.display().to_string(),
                to.display().to_string(),
                "Permission denied",
            ));
        }
        self.inner.rename(from, to)
    }
}

#[test]
fn first_failure_stops_the_walk_and_keeps_earlier_renames() {
    let mut fs = FailingFs {
        inner: SnapshotFs::from_paths(
            "/r",
            &["Outer/B File.txt", "Outer/C File.txt", "Z Top.txt"],
        ),
        fail_on: "C File.txt",
        calls: Vec::new(),
    };

    let err = TreeRenamer::new(&mut fs, RenameOptions::default())
        .run(Path::new("/r"))
        .unwrap_err();

    assert_eq!(err.code.as_str(), "tidy.rename_failed");
    assert_eq!(fs.calls, vec!["B File.txt", "C File.txt"]);
    assert_eq!(
        fs.inner.paths(),
        vec!["Outer/", "Outer/C File.txt", "Outer/b-file.txt", "Z Top.txt"]
    );
}

#[test]
fn clean_entries_never_reach_rename() {
    let mut fs = FailingFs {
        inner: SnapshotFs::from_paths("/r", &["clean-name.txt", "docs/readme.md"]),
        fail_on: "clean-name.txt",
        calls: Vec::new(),
    };

    let report = TreeRenamer::new(&mut fs, RenameOptions::default())
        .run(Path::new("/r"))
        .unwrap();

    assert!(fs.calls.is_empty());
    assert_eq!(report.unchanged, 3);
}
