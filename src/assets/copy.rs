// src/assets/copy.rs

//! Glob-driven file copying shared by the statics processor and the
//! tmp-generation / settings-sync / zip-copy tasks.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::paths::{build_glob_set, ProjectPaths};
use crate::errors::Result;
use crate::report::ErrorCollector;

/// Copy one file, creating parent directories as needed.
pub fn copy_file(abs_src: &Path, abs_dest: &Path) -> std::io::Result<u64> {
    if let Some(parent) = abs_dest.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::copy(abs_src, abs_dest)
}

/// Copy every file under `base` (a root-relative directory) that matches
/// `patterns`, rewriting the `base` prefix to `dest_base`.
///
/// Per-file failures are recorded under `source_label` and copying
/// continues; only an unreadable `base` tree is an error. Returns the number
/// of files copied.
pub fn copy_matching(
    paths: &ProjectPaths,
    patterns: &[String],
    base: &str,
    dest_base: &str,
    collector: &ErrorCollector,
    source_label: &str,
) -> Result<usize> {
    let glob_set = build_glob_set(patterns).map_err(crate::errors::LeafError::Other)?;
    let base_root = paths.resolve(base);
    if !base_root.is_dir() {
        return Ok(0);
    }

    let mut matched = Vec::new();
    collect_files(paths.root(), &base_root, &mut matched)?;

    let mut copied = 0;
    for rel in matched {
        if !glob_set.is_match(&rel) {
            continue;
        }
        let Ok(stripped) = rel.strip_prefix(base) else {
            continue;
        };
        let abs_src = paths.resolve(&rel);
        let abs_dest = paths.resolve(dest_base).join(stripped);
        match copy_file(&abs_src, &abs_dest) {
            Ok(bytes) => {
                debug!(from = ?rel, to = ?abs_dest, bytes, "copied file");
                copied += 1;
            }
            Err(err) => {
                collector.record(source_label, format!("copying {:?}: {err}", rel));
            }
        }
    }

    Ok(copied)
}

fn collect_files(root: &Path, dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        if path.is_dir() {
            collect_files(root, &path, out)?;
        } else if let Ok(rel) = path.strip_prefix(root) {
            out.push(rel.to_path_buf());
        }
    }
    Ok(())
}
