//! Coverage analysis: which source directories are not backed up by any job.
//!
//! A directory is accounted for when it is excluded by a source root, equal
//! to a job's source, excluded by a job, or when it has at least one child
//! directory and every child is accounted for in turn. Leaf directories can
//! only be accounted for directly.
//!
//! Analysis starts at every declared source root and stops at the first
//! uncovered directory on each branch: an uncovered root is reported as a
//! whole, its subdirectories are not enumerated.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::io;
use std::path::Path;

use walkdir::WalkDir;

use crate::config::{Config, PathRoot};
use crate::error::Error;
use crate::job::Job;
use crate::path::{join, normalize};

/// Lists the immediate child directories of a directory.
pub trait DirLister {
    /// Returns the full paths of the child directories of `path`.
    fn child_directories(&self, path: &str) -> io::Result<Vec<String>>;
}

/// Reads the real filesystem. Symlinks are not followed.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFs;

impl DirLister for OsFs {
    fn child_directories(&self, path: &str) -> io::Result<Vec<String>> {
        let mut children = vec![];
        for entry in WalkDir::new(Path::new(path))
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry?;
            if entry.file_type().is_dir() {
                children.push(join(path, &entry.file_name().to_string_lossy()));
            }
        }
        Ok(children)
    }
}

/// An in-memory directory tree of absolute paths.
#[derive(Debug, Default, Clone)]
pub struct MemoryFs {
    dirs: BTreeMap<String, BTreeSet<String>>,
    unreadable: BTreeSet<String>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates `path` and all of its ancestors.
    pub fn create_dir_all(&mut self, path: &str) {
        let mut current = String::new();
        self.dirs.entry(current.clone()).or_default();
        for component in normalize(path).split('/').filter(|c| !c.is_empty()) {
            self.dirs
                .entry(current.clone())
                .or_default()
                .insert(component.to_string());
            current = format!("{current}/{component}");
            self.dirs.entry(current.clone()).or_default();
        }
    }

    /// Makes listing `path` fail with `PermissionDenied`.
    pub fn deny(&mut self, path: &str) {
        self.unreadable.insert(normalize(path));
    }
}

impl DirLister for MemoryFs {
    fn child_directories(&self, path: &str) -> io::Result<Vec<String>> {
        let key = normalize(path);
        if self.unreadable.contains(&key) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{path}: permission denied"),
            ));
        }
        match self.dirs.get(&key) {
            Some(children) => Ok(children.iter().map(|name| format!("{key}/{name}")).collect()),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{path}: no such directory"),
            )),
        }
    }
}

/// True if `path` falls under one of `job`'s exclusions.
pub fn is_excluded(path: &str, job: &Job) -> bool {
    let path = normalize(path);
    job.exclusions
        .iter()
        .any(|exclusion| path.starts_with(&join(&job.source, exclusion)))
}

/// True if `path` falls under an exclusion declared on any source root.
pub fn is_excluded_globally(path: &str, sources: &[PathRoot]) -> bool {
    let normalized = normalize(path);
    for source in sources {
        for exclusion in &source.exclusions {
            if normalized.starts_with(&join(&source.path, exclusion)) {
                log::debug!(
                    "EXCLUDED: Path '{path}' is globally excluded by '{exclusion}' in source '{}'",
                    source.path
                );
                return true;
            }
        }
    }
    false
}

/// True if `path` is `job`'s source or one of its exclusions.
pub fn is_covered_by_job(path: &str, job: &Job) -> bool {
    if normalize(&job.source) == normalize(path) {
        log::debug!("COVERED: Path '{path}' is covered by job '{}'", job.name);
        return true;
    }
    if is_excluded(path, job) {
        log::debug!("EXCLUDED: Path '{path}' is excluded by job '{}'", job.name);
        return true;
    }
    false
}

pub fn is_covered(path: &str, jobs: &[Job]) -> bool {
    jobs.iter().any(|job| is_covered_by_job(path, job))
}

/// True if `path` has child directories and every one of them is excluded,
/// covered, or effectively covered itself.
///
/// A directory that cannot be listed is treated as not covered.
pub fn is_effectively_covered<L: DirLister + ?Sized>(fs: &L, path: &str, config: &Config) -> bool {
    let children = match fs.child_directories(path) {
        Ok(children) => children,
        Err(source) => {
            let err = Error::FilesystemRead {
                path: path.to_string(),
                source,
            };
            log::warn!("{err}");
            return false;
        }
    };

    if children.is_empty() {
        log::debug!("NOT COVERED: Path '{path}' has no children");
        return false;
    }

    // Every child is visited so each uncovered one gets logged.
    let mut all_covered = true;
    for child in &children {
        if !is_excluded_globally(child, &config.sources)
            && !is_covered(child, &config.jobs)
            && !is_effectively_covered(fs, child, config)
        {
            log::debug!("UNCOVERED CHILD: Path '{path}' has uncovered child '{child}'");
            all_covered = false;
        }
    }

    if all_covered {
        log::debug!("COVERED: Path '{path}' is effectively covered");
    }
    all_covered
}

/// Returns the sorted list of source-root directories no job accounts for.
pub fn list_uncovered_paths<L: DirLister + ?Sized>(fs: &L, config: &Config) -> Vec<String> {
    let mut result = vec![];
    let mut seen = HashSet::new();

    for source in &config.sources {
        check_path(fs, &source.path, config, &mut result, &mut seen);
    }

    result.sort();
    result
}

fn check_path<L: DirLister + ?Sized>(
    fs: &L,
    path: &str,
    config: &Config,
    result: &mut Vec<String>,
    seen: &mut HashSet<String>,
) {
    if !seen.insert(path.to_string()) {
        log::debug!("SKIP: Path '{path}' already seen");
        return;
    }

    if is_excluded_globally(path, &config.sources) {
        log::debug!("SKIP: Path '{path}' is globally excluded");
        return;
    }

    if is_covered(path, &config.jobs) {
        log::debug!("SKIP: Path '{path}' is covered by a job");
        return;
    }

    if is_effectively_covered(fs, path, config) {
        log::debug!("SKIP: Path '{path}' is effectively covered");
        return;
    }

    log::info!("ADD: Path '{path}' is uncovered");
    result.push(path.to_string());
}
