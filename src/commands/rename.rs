use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use tidytree::tidy::{self, RenameRecord, SkippedEntry};

use crate::commands::{CmdResult, GlobalArgs};

#[derive(Args)]
pub struct RenameArgs {
    /// Root directory (default: current directory). The root itself is never renamed.
    path: Option<String>,

    /// Report the renames without touching disk
    #[arg(long)]
    dry_run: bool,
}

#[derive(Serialize)]
pub struct RenameOutput {
    command: String,
    root: String,
    dry_run: bool,
    scanned: usize,
    unchanged: usize,
    renamed: usize,
    collisions: usize,
    renames: Vec<RenameRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    skipped: Vec<SkippedEntry>,
}

pub fn run(args: RenameArgs, global: &GlobalArgs) -> CmdResult<RenameOutput> {
    let root = resolve_root(args.path.as_deref())?;
    let options = global.load_config()?.defaults.rename_options()?;

    let report = if args.dry_run {
        tidy::plan_tree(&root, options)?
    } else {
        tidy::rename_tree_with(&root, options)?
    };

    let collisions = report.collisions();
    Ok((
        RenameOutput {
            command: if args.dry_run {
                "rename.plan".to_string()
            } else {
                "rename.apply".to_string()
            },
            root: report.root,
            dry_run: report.dry_run,
            scanned: report.scanned,
            unchanged: report.unchanged,
            renamed: report.renames.len(),
            collisions,
            renames: report.renames,
            skipped: report.skipped,
        },
        0,
    ))
}

fn resolve_root(path: Option<&str>) -> tidytree::Result<PathBuf> {
    let raw = match path {
        Some(p) => PathBuf::from(shellexpand::tilde(p).as_ref()),
        None => std::env::current_dir().map_err(|e| {
            tidytree::Error::internal_io(
                e.to_string(),
                Some("resolve current directory".to_string()),
            )
        })?,
    };

    // Absolute root keeps reported paths stable; a missing path is reported by the renamer.
    Ok(std::fs::canonicalize(&raw).unwrap_or(raw))
}
