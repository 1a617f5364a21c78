//! Data provider abstraction for filesystem-independent loading.
//!
//! The loader reads every file through a [`DataProvider`]. The default
//! [`FileSystemProvider`] delegates to `std::fs`; [`InMemoryProvider`]
//! serves a fixed set of buffers for tests and embedding.

use std::collections::BTreeMap;
use std::io;
use std::path::{Component, Path, PathBuf};

pub trait DataProvider {
    /// Read the whole file at `path`.
    fn load_buffer(&self, path: &Path) -> io::Result<Vec<u8>>;

    fn file_exists(&self, path: &Path) -> bool;

    /// Files directly inside `dir` whose extension matches `extension`
    /// (ASCII case-insensitive), sorted by path.
    fn find_files(&self, dir: &Path, extension: &str) -> io::Result<Vec<PathBuf>>;
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension))
}

pub struct FileSystemProvider;

impl DataProvider for FileSystemProvider {
    fn load_buffer(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn find_files(&self, dir: &Path, extension: &str) -> io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && has_extension(&path, extension) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

/// In-memory provider keyed by normalized path.
#[derive(Debug, Default, Clone)]
pub struct InMemoryProvider {
    files: BTreeMap<PathBuf, Vec<u8>>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a file.
    pub fn with_file(mut self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) -> Self {
        self.insert(path, contents);
        self
    }

    pub fn insert(&mut self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) {
        self.files
            .insert(Self::normalize_path(path.as_ref()), contents.into());
    }

    /// Resolve `.` and `..` without touching the filesystem.
    fn normalize_path(path: &Path) -> PathBuf {
        let mut components = Vec::new();
        for component in path.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    components.pop();
                }
                other => components.push(other),
            }
        }
        components.iter().collect()
    }
}

impl DataProvider for InMemoryProvider {
    fn load_buffer(&self, path: &Path) -> io::Result<Vec<u8>> {
        let normalized = Self::normalize_path(path);
        self.files.get(&normalized).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found in memory: {}", normalized.display()),
            )
        })
    }

    fn file_exists(&self, path: &Path) -> bool {
        self.files.contains_key(&Self::normalize_path(path))
    }

    fn find_files(&self, dir: &Path, extension: &str) -> io::Result<Vec<PathBuf>> {
        let dir = Self::normalize_path(dir);
        // BTreeMap keys are already sorted
        let files: Vec<PathBuf> = self
            .files
            .keys()
            .filter(|p| p.parent() == Some(dir.as_path()) && has_extension(p, extension))
            .cloned()
            .collect();
        if files.is_empty() && !self.files.keys().any(|p| p.starts_with(&dir)) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("directory not found in memory: {}", dir.display()),
            ));
        }
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_path_resolves_dot_and_dotdot() {
        let p = Path::new("/a/b/../c/./d");
        assert_eq!(InMemoryProvider::normalize_path(p), PathBuf::from("/a/c/d"));
    }

    #[test]
    fn in_memory_load_and_exists() {
        let provider = InMemoryProvider::new().with_file("/c/01/zones.def", "ZONES");
        assert_eq!(
            provider.load_buffer(Path::new("/c/01/./zones.def")).unwrap(),
            b"ZONES".to_vec()
        );
        assert!(provider.file_exists(Path::new("/c/02/../01/zones.def")));
        assert!(!provider.file_exists(Path::new("/c/01/Missions.def")));
        let err = provider.load_buffer(Path::new("/missing.def")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn in_memory_find_files_is_sorted_and_shallow() {
        let provider = InMemoryProvider::new()
            .with_file("/c/Scenes/b.def", "")
            .with_file("/c/Scenes/a.DEF", "")
            .with_file("/c/Scenes/notes.txt", "")
            .with_file("/c/Scenes/deep/c.def", "");
        let found = provider.find_files(Path::new("/c/Scenes"), "def").unwrap();
        assert_eq!(
            found,
            vec![PathBuf::from("/c/Scenes/a.DEF"), PathBuf::from("/c/Scenes/b.def")]
        );
        assert!(provider.find_files(Path::new("/nowhere"), "def").is_err());
    }

    #[test]
    fn filesystem_find_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("m2.def"), "x").unwrap();
        std::fs::write(dir.path().join("m1.def"), "x").unwrap();
        std::fs::write(dir.path().join("readme.md"), "x").unwrap();
        let found = FileSystemProvider.find_files(dir.path(), "def").unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["m1.def", "m2.def"]);
        assert!(FileSystemProvider.file_exists(&dir.path().join("m1.def")));
        assert!(!FileSystemProvider.file_exists(dir.path()));
    }
}
