//! In-memory copy of a directory tree.
//!
//! A snapshot records names and directory flags only, never contents. Running
//! the tree renamer against a snapshot yields the exact sequence of renames a
//! real run would perform, without touching disk.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};
use crate::local_files::{Entry, FileSystem};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Node {
    is_dir: bool,
    children: BTreeMap<String, Node>,
}

impl Node {
    fn dir() -> Self {
        Self {
            is_dir: true,
            children: BTreeMap::new(),
        }
    }

    fn file() -> Self {
        Self {
            is_dir: false,
            children: BTreeMap::new(),
        }
    }

    fn collect_paths(&self, prefix: &str, out: &mut Vec<String>) {
        for (name, child) in &self.children {
            let path = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{}/{}", prefix, name)
            };
            if child.is_dir {
                out.push(format!("{}/", path));
                child.collect_paths(&path, out);
            } else {
                out.push(path);
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct SnapshotFs {
    root: PathBuf,
    tree: Node,
}

impl SnapshotFs {
    /// Empty snapshot rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            tree: Node::dir(),
        }
    }

    /// Build a snapshot from root-relative paths. A trailing `/` marks a
    /// directory; intermediate components are always directories.
    pub fn from_paths(root: impl Into<PathBuf>, paths: &[&str]) -> Self {
        let mut snapshot = Self::new(root);
        for path in paths {
            let is_dir = path.ends_with('/');
            let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
            let mut node = &mut snapshot.tree;
            for (i, part) in parts.iter().enumerate() {
                let last = i + 1 == parts.len();
                node = node
                    .children
                    .entry(part.to_string())
                    .or_insert_with(|| {
                        if last && !is_dir {
                            Node::file()
                        } else {
                            Node::dir()
                        }
                    });
            }
        }
        snapshot
    }

    /// Copy the structure under `root` from another filesystem.
    pub fn capture(fs: &dyn FileSystem, root: &Path) -> Result<Self> {
        let mut snapshot = Self::new(root);
        capture_into(fs, root, &mut snapshot.tree)?;
        Ok(snapshot)
    }

    /// All root-relative paths, depth-first in name order. Directories end in `/`.
    pub fn paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.tree.collect_paths("", &mut out);
        out
    }

    fn components(&self, path: &Path) -> Option<Vec<String>> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let mut parts = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(part) => parts.push(part.to_str()?.to_string()),
                Component::CurDir => {}
                _ => return None,
            }
        }
        Some(parts)
    }

    fn node(&self, path: &Path) -> Option<&Node> {
        let parts = self.components(path)?;
        let mut node = &self.tree;
        for part in &parts {
            node = node.children.get(part)?;
        }
        Some(node)
    }

    fn node_mut(&mut self, parts: &[String]) -> Option<&mut Node> {
        let mut node = &mut self.tree;
        for part in parts {
            node = node.children.get_mut(part)?;
        }
        Some(node)
    }
}

fn capture_into(fs: &dyn FileSystem, dir: &Path, node: &mut Node) -> Result<()> {
    for entry in fs.list(dir)? {
        if entry.is_dir {
            let mut child = Node::dir();
            capture_into(fs, &entry.path, &mut child)?;
            node.children.insert(entry.name, child);
        } else {
            node.children.insert(entry.name, Node::file());
        }
    }
    Ok(())
}

impl FileSystem for SnapshotFs {
    fn list(&self, dir: &Path) -> Result<Vec<Entry>> {
        let node = self
            .node(dir)
            .filter(|n| n.is_dir)
            .ok_or_else(|| {
                Error::internal_io(
                    format!("Not a directory: {}", dir.display()),
                    Some(format!("list {}", dir.display())),
                )
            })?;

        Ok(node
            .children
            .iter()
            .map(|(name, child)| Entry {
                path: dir.join(name),
                name: name.clone(),
                is_dir: child.is_dir,
            })
            .collect())
    }

    fn exists(&self, path: &Path) -> bool {
        self.node(path).is_some()
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.node(path).is_some_and(|n| n.is_dir)
    }

    fn rename(&mut self, from: &Path, to: &Path) -> Result<()> {
        let fail = |problem: &str| {
            Error::tidy_rename_failed(
                from.display().to_string(),
                to.display().to_string(),
                problem,
            )
        };

        let from_parts = self.components(from).ok_or_else(|| fail("source outside snapshot"))?;
        let to_parts = self.components(to).ok_or_else(|| fail("target outside snapshot"))?;
        let (from_name, from_parent) = from_parts
            .split_last()
            .ok_or_else(|| fail("cannot rename the snapshot root"))?;
        let (to_name, to_parent) = to_parts
            .split_last()
            .ok_or_else(|| fail("cannot rename onto the snapshot root"))?;

        if self.exists(to) {
            return Err(fail("target already exists"));
        }
        if to_parts.starts_with(&from_parts) {
            return Err(fail("cannot move a directory into itself"));
        }
        if !self
            .node_mut(to_parent)
            .is_some_and(|parent| parent.is_dir)
        {
            return Err(fail("target parent does not exist"));
        }

        let node = self
            .node_mut(from_parent)
            .and_then(|parent| parent.children.remove(from_name))
            .ok_or_else(|| fail("source does not exist"))?;

        match self.node_mut(to_parent) {
            Some(parent) => {
                parent.children.insert(to_name.clone(), node);
                Ok(())
            }
            None => Err(fail("target parent does not exist")),
        }
    }
}
