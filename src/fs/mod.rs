// src/fs/mod.rs

//! Filesystem access for the handlers that edit config files and scan
//! wallpaper directories, plus path resolution for user-supplied paths.

use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::{Captures, Regex};

pub mod mock;

/// Abstract filesystem interface.
pub trait FileSystem: Send + Sync + Debug {
    fn read_to_string(&self, path: &Path) -> Result<String>;
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;
    fn is_file(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;

    /// Return a list of entries in a directory.
    /// Returns full paths.
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("reading file {:?}", path))
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| format!("creating dir {:?}", parent))?;
            }
        }
        fs::write(path, contents).with_context(|| format!("writing to file {:?}", path))
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path).with_context(|| format!("reading dir {:?}", path))? {
            let entry = entry?;
            entries.push(entry.path());
        }
        Ok(entries)
    }
}

/// Every regular file below `root`, depth first, sorted per directory.
pub fn walk_files(fs: &dyn FileSystem, root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let mut entries = fs.read_dir(&dir)?;
        entries.sort();
        // Reverse so the stack pops subdirectories in sorted order.
        for entry in entries.into_iter().rev() {
            if fs.is_dir(&entry) {
                pending.push(entry);
            } else if fs.is_file(&entry) {
                files.push(entry);
            }
        }
    }

    files.sort();
    Ok(files)
}

static ENV_VAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}|\$([A-Za-z_][A-Za-z0-9_]*)")
        .expect("env var pattern is valid")
});

/// Expand a leading `~` to the home directory and `$VAR` / `${VAR}` to their
/// values (unset variables expand to nothing).
pub fn resolve_path(path: &str) -> PathBuf {
    resolve_path_with(path, dirs::home_dir(), |name| std::env::var(name).ok())
}

/// [`resolve_path`] with the home directory and variable lookup injected.
pub fn resolve_path_with<F>(path: &str, home: Option<PathBuf>, lookup: F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    if path.is_empty() {
        return PathBuf::new();
    }

    let expanded = ENV_VAR.replace_all(path, |caps: &Captures| {
        let name = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
        lookup(name).unwrap_or_default()
    });

    match (expanded.strip_prefix('~'), home) {
        (Some(rest), Some(home)) if rest.is_empty() || rest.starts_with('/') => {
            home.join(rest.trim_start_matches('/'))
        }
        _ => PathBuf::from(&*expanded),
    }
}
