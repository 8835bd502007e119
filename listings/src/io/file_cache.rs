//! File system abstraction for testability.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// File system operations used by the validator and synchronizer.
pub trait FileCache: Send + Sync + std::fmt::Debug {
    /// Reads the contents of a file as UTF-8.
    fn read(&self, path: &Path) -> io::Result<String>;

    /// Replaces the contents of a file.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Deletes a file.
    fn remove(&self, path: &Path) -> io::Result<()>;

    /// Checks if a file or directory exists.
    fn exists(&self, path: &Path) -> bool;

    /// Checks if a directory exists.
    fn is_dir(&self, path: &Path) -> bool;

    /// Finds the first file named `file_name` anywhere beneath `root`.
    ///
    /// `file_name` may hold directories (`dir/ex.py`); it then matches a
    /// path suffix below `root`.
    ///
    /// Traversal order decides which match wins when several exist.
    fn find_first(&self, root: &Path, file_name: &str) -> io::Result<Option<PathBuf>>;

    /// Lists files matching a glob pattern.
    fn glob(&self, pattern: &str) -> io::Result<Vec<PathBuf>>;
}

/// Real file system implementation.
#[derive(Debug, Clone, Default)]
pub struct RealFileCache {
    /// Base directory for relative paths.
    pub base_dir: PathBuf,
}

impl RealFileCache {
    /// Creates a new RealFileCache with the given base directory.
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Resolves a path relative to the base directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

impl FileCache for RealFileCache {
    fn read(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(self.resolve(path))
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        let path = self.resolve(path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        atomic_write(&path, content)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(self.resolve(path))
    }

    fn exists(&self, path: &Path) -> bool {
        self.resolve(path).exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.resolve(path).is_dir()
    }

    fn find_first(&self, root: &Path, file_name: &str) -> io::Result<Option<PathBuf>> {
        let root = self.resolve(root);
        let pattern = format!(
            "{}/**/{}",
            glob::Pattern::escape(&root.to_string_lossy()),
            glob::Pattern::escape(file_name)
        );

        let found = glob::glob(&pattern)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?
            .filter_map(|r| r.ok())
            .find(|p| p.is_file());

        Ok(found)
    }

    fn glob(&self, pattern: &str) -> io::Result<Vec<PathBuf>> {
        let full_pattern = format!(
            "{}/{}",
            glob::Pattern::escape(&self.base_dir.to_string_lossy()),
            pattern
        );

        let paths = glob::glob(&full_pattern)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?
            .filter_map(|r| r.ok())
            .map(|p| {
                p.strip_prefix(&self.base_dir)
                    .map(|p| p.to_path_buf())
                    .unwrap_or(p)
            })
            .collect();

        Ok(paths)
    }
}

/// Virtual file system for testing.
#[derive(Debug, Default)]
pub struct VirtualFS {
    /// Files stored in memory, ordered by path.
    files: Mutex<BTreeMap<PathBuf, String>>,
}

impl VirtualFS {
    /// Creates a new empty virtual file system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file to the virtual file system.
    pub fn add_file(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.lock().insert(path.into(), content.into());
    }

    /// Lists all files in the virtual file system.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.lock().keys().cloned().collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<PathBuf, String>> {
        self.files.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl FileCache for VirtualFS {
    fn read(&self, path: &Path) -> io::Result<String> {
        self.lock()
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "File not found"))
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        self.add_file(path, content);
        Ok(())
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        self.lock()
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "File not found"))
    }

    fn exists(&self, path: &Path) -> bool {
        let is_file = self.lock().contains_key(path);
        is_file || self.is_dir(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.lock()
            .keys()
            .any(|p| p != path && p.starts_with(path))
    }

    fn find_first(&self, root: &Path, file_name: &str) -> io::Result<Option<PathBuf>> {
        let found = self
            .lock()
            .keys()
            .find(|p| {
                p.strip_prefix(root)
                    .is_ok_and(|rest| !rest.as_os_str().is_empty() && rest.ends_with(file_name))
            })
            .cloned();
        Ok(found)
    }

    fn glob(&self, pattern: &str) -> io::Result<Vec<PathBuf>> {
        let glob_pattern = glob::Pattern::new(pattern)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        let matches = self
            .lock()
            .keys()
            .filter(|p| glob_pattern.matches_path(p))
            .cloned()
            .collect();

        Ok(matches)
    }
}

/// Counter for unique temp file names.
static TEMP_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Writes content to a file atomically using a temp file.
fn atomic_write(path: &Path, content: &str) -> io::Result<()> {
    let parent = path.parent().unwrap_or(Path::new("."));
    let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let temp_path = parent.join(format!(
        ".listings-tmp-{}-{}",
        std::process::id(),
        counter,
    ));

    {
        let mut file = File::create(&temp_path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
    }

    fs::rename(&temp_path, path)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_virtual_fs_basic() {
        let vfs = VirtualFS::new();
        vfs.add_file("book/src/a.py", "# a.py\n");

        assert!(vfs.exists(Path::new("book/src/a.py")));
        assert!(vfs.exists(Path::new("book/src")));
        assert!(vfs.is_dir(Path::new("book")));
        assert!(!vfs.is_dir(Path::new("book/src/a.py")));
        assert!(!vfs.exists(Path::new("book/other")));

        let content = vfs.read(Path::new("book/src/a.py")).unwrap();
        assert_eq!(content, "# a.py\n");
    }

    #[test]
    fn test_virtual_fs_find_first() {
        let vfs = VirtualFS::new();
        vfs.add_file("root/b/main.go", "// main.go\n");
        vfs.add_file("root/a/main.go", "// main.go\n");
        vfs.add_file("elsewhere/main.go", "// main.go\n");

        let found = vfs.find_first(Path::new("root"), "main.go").unwrap();
        assert_eq!(found, Some(PathBuf::from("root/a/main.go")));
        assert_eq!(vfs.find_first(Path::new("root"), "lib.go").unwrap(), None);
    }

    #[test]
    fn test_find_first_matches_nested_name_on_both_caches() {
        let dir = tempdir().unwrap();
        let cache = RealFileCache::new(dir.path().to_path_buf());
        let vfs = VirtualFS::new();
        for file in ["root/a/dir/ex.py", "root/other/ex.py", "dir/ex.py"] {
            fs::create_dir_all(dir.path().join(file).parent().unwrap()).unwrap();
            fs::write(dir.path().join(file), "# ex.py\n").unwrap();
            vfs.add_file(file, "# ex.py\n");
        }

        let found = vfs.find_first(Path::new("root"), "dir/ex.py").unwrap();
        assert_eq!(found, Some(PathBuf::from("root/a/dir/ex.py")));
        let found = cache.find_first(Path::new("root"), "dir/ex.py").unwrap();
        assert_eq!(found, Some(dir.path().join("root/a/dir/ex.py")));

        // the root's own components are not part of the match
        assert_eq!(vfs.find_first(Path::new("dir"), "dir/ex.py").unwrap(), None);
        assert_eq!(cache.find_first(Path::new("dir"), "dir/ex.py").unwrap(), None);
        assert_eq!(vfs.find_first(Path::new("root"), "x/ex.py").unwrap(), None);
        assert_eq!(cache.find_first(Path::new("root"), "x/ex.py").unwrap(), None);
    }

    #[test]
    fn test_virtual_fs_write_and_glob() {
        let vfs = VirtualFS::new();
        vfs.write(Path::new("01.md"), "# One").unwrap();
        vfs.add_file("02.md", "# Two");
        vfs.add_file("src/a.py", "");

        assert_eq!(vfs.glob("*.md").unwrap().len(), 2);
        assert_eq!(vfs.list_files().len(), 3);

        vfs.remove(Path::new("02.md")).unwrap();
        assert!(!vfs.exists(Path::new("02.md")));
        assert!(vfs.remove(Path::new("02.md")).is_err());
    }

    #[test]
    fn test_real_file_cache_read_write() {
        let dir = tempdir().unwrap();
        let cache = RealFileCache::new(dir.path().to_path_buf());

        cache.write(Path::new("out/chapter.tmp.md"), "content").unwrap();
        assert!(cache.exists(Path::new("out/chapter.tmp.md")));
        assert!(cache.is_dir(Path::new("out")));
        assert_eq!(cache.read(Path::new("out/chapter.tmp.md")).unwrap(), "content");

        cache.write(Path::new("out/chapter.tmp.md"), "replaced").unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("out/chapter.tmp.md")).unwrap(),
            "replaced"
        );

        cache.remove(Path::new("out/chapter.tmp.md")).unwrap();
        assert!(!cache.exists(Path::new("out/chapter.tmp.md")));
    }

    #[test]
    fn test_real_file_cache_find_first() {
        let dir = tempdir().unwrap();
        let cache = RealFileCache::new(dir.path().to_path_buf());

        fs::create_dir_all(dir.path().join("examples/ch02")).unwrap();
        fs::write(dir.path().join("examples/ch02/hello.rs"), "// hello.rs\n").unwrap();
        fs::create_dir_all(dir.path().join("examples/a/hello.rs")).unwrap();

        let found = cache.find_first(Path::new("examples"), "hello.rs").unwrap();
        assert_eq!(found, Some(dir.path().join("examples/ch02/hello.rs")));
        assert_eq!(cache.find_first(Path::new("examples"), "nope.rs").unwrap(), None);
    }

    #[test]
    fn test_real_file_cache_glob() {
        let dir = tempdir().unwrap();
        let cache = RealFileCache::new(dir.path().to_path_buf());

        fs::write(dir.path().join("a.md"), "a").unwrap();
        fs::write(dir.path().join("b.md"), "b").unwrap();
        fs::write(dir.path().join("c.txt"), "c").unwrap();

        let md_files = cache.glob("*.md").unwrap();
        assert_eq!(md_files, vec![PathBuf::from("a.md"), PathBuf::from("b.md")]);
    }
}
