//! Listing of source folders, source videos and dated cut folders

use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;

use crate::domain::errors::DomainError;
use crate::domain::rules::is_video_file;
use crate::utils::path::PathResolver;

/// Read-only view over one root (videos or cuts)
#[derive(Debug, Clone)]
pub struct Catalog {
    resolver: PathResolver,
}

impl Catalog {
    pub fn new(root: impl Into<std::path::PathBuf>) -> Self {
        Self {
            resolver: PathResolver::new(root),
        }
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    /// Names of the immediate child directories of the root, sorted
    pub fn list_folders(&self) -> Result<Vec<String>, DomainError> {
        let root = self.resolver.canonical_root()?;
        if !root.is_dir() {
            return Err(DomainError::NotFound(format!(
                "root directory {}",
                root.display()
            )));
        }
        immediate_children(&root, |entry| entry.file_type().is_dir())
    }

    /// Video files directly inside `folder`, sorted; subdirectories never appear
    pub fn list_videos(&self, folder: &str) -> Result<Vec<String>, DomainError> {
        let dir = self.resolver.resolve_folder(folder)?;
        let mut names = immediate_children(&dir, |entry| entry.file_type().is_file())?;
        names.retain(|name| is_video_file(name));
        Ok(names)
    }
}

fn immediate_children<F>(dir: &Path, keep: F) -> Result<Vec<String>, DomainError>
where
    F: Fn(&walkdir::DirEntry) -> bool,
{
    let mut names = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
        // dangling links are skipped rather than failing the listing
        if let Err(e) = &entry {
            if e.io_error().map(|io| io.kind()) == Some(std::io::ErrorKind::NotFound) {
                debug!(path = ?e.path(), "skipping dangling link");
                continue;
            }
        }
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            match e.into_io_error() {
                Some(io) => DomainError::io(path, io),
                None => DomainError::IoFailure {
                    path,
                    message: "filesystem loop detected".to_string(),
                },
            }
        })?;
        if keep(&entry) {
            names.push(entry.file_name().to_string_lossy().to_string());
        }
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ErrorKind;
    use std::fs;
    use tempfile::TempDir;

    fn library() -> TempDir {
        let dir = TempDir::new().unwrap();
        let demo = dir.path().join("demo");
        fs::create_dir_all(demo.join("nested.mp4")).unwrap();
        fs::create_dir(dir.path().join("archive")).unwrap();
        fs::write(dir.path().join("stray.mp4"), b"x").unwrap();
        for name in ["b.mp4", "a.MKV", "c.avi", "notes.txt", "clip.mp4.part"] {
            fs::write(demo.join(name), b"x").unwrap();
        }
        dir
    }

    #[test]
    fn test_list_folders_only_directories() {
        let dir = library();
        let catalog = Catalog::new(dir.path());
        assert_eq!(catalog.list_folders().unwrap(), vec!["archive", "demo"]);
    }

    #[test]
    fn test_list_videos_filters_extensions_and_dirs() {
        let dir = library();
        let catalog = Catalog::new(dir.path());
        assert_eq!(
            catalog.list_videos("demo").unwrap(),
            vec!["a.MKV", "b.mp4", "c.avi"]
        );
        assert!(catalog.list_videos("archive").unwrap().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_entries_follow_their_target() {
        let dir = library();
        let elsewhere = TempDir::new().unwrap();
        std::os::unix::fs::symlink(dir.path().join("demo"), dir.path().join("linked")).unwrap();
        std::os::unix::fs::symlink(elsewhere.path().join("gone"), dir.path().join("dangling"))
            .unwrap();
        std::os::unix::fs::symlink(
            dir.path().join("demo").join("b.mp4"),
            dir.path().join("demo").join("z.mp4"),
        )
        .unwrap();

        let catalog = Catalog::new(dir.path());
        assert_eq!(
            catalog.list_folders().unwrap(),
            vec!["archive", "demo", "linked"]
        );
        assert_eq!(
            catalog.list_videos("linked").unwrap(),
            vec!["a.MKV", "b.mp4", "c.avi", "z.mp4"]
        );
    }

    #[test]
    fn test_list_errors() {
        let dir = library();
        let catalog = Catalog::new(dir.path());
        assert_eq!(
            catalog.list_videos("missing").unwrap_err().kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            catalog.list_videos("../..").unwrap_err().kind(),
            ErrorKind::InvalidPath
        );
        assert_eq!(
            Catalog::new(dir.path().join("absent"))
                .list_folders()
                .unwrap_err()
                .kind(),
            ErrorKind::NotFound
        );
    }
}
