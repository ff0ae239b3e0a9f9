use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

/// Capability for mapping an engine-reported source path to a file inside a
/// versioned source snapshot.
///
/// The concrete backing (an unpacked archive directory, a fixed map, ...) is
/// the snapshot provider's business; the resolver only asks this one
/// question.
pub trait SourceSnapshot: Send + Sync {
    /// Maps `path` to a file in the snapshot, or `None` if the snapshot does
    /// not contain it.
    fn resolve_source_file(&self, path: &str) -> Option<PathBuf>;
}

/// A snapshot backed by an unpacked source tree on disk.
///
/// Engine paths are absolute paths from the machine the snapshot was taken
/// on; they are re-rooted under `root` and only returned if the file
/// actually exists there.
pub struct DirectorySnapshot {
    root: PathBuf,
}

impl DirectorySnapshot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl SourceSnapshot for DirectorySnapshot {
    fn resolve_source_file(&self, path: &str) -> Option<PathBuf> {
        let mut candidate = self.root.clone();
        // Re-root the path, refusing traversal outside the snapshot.
        for component in Path::new(path).components() {
            match component {
                Component::Normal(part) => candidate.push(part),
                Component::RootDir | Component::Prefix(_) | Component::CurDir => {}
                Component::ParentDir => return None,
            }
        }
        if candidate.is_file() {
            Some(candidate)
        } else {
            log::debug!("source file {path} not present in snapshot");
            None
        }
    }
}

/// A snapshot with a fixed path mapping. Mostly useful in tests.
#[derive(Default)]
pub struct StaticSnapshot {
    files: HashMap<String, PathBuf>,
}

impl StaticSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<String>, target: impl Into<PathBuf>) -> Self {
        self.files.insert(path.into(), target.into());
        self
    }
}

impl SourceSnapshot for StaticSnapshot {
    fn resolve_source_file(&self, path: &str) -> Option<PathBuf> {
        self.files.get(path).cloned()
    }
}
