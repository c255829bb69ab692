//! Path resolution confined to a configured root

use std::fs::File;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Component, Path, PathBuf};

use crate::domain::errors::DomainError;

/// Resolves `(folder, file)` names under one root directory.
///
/// Names are checked lexically first, so `..` or absolute components are
/// rejected before the filesystem is touched. Existing targets are then
/// canonicalized and must still sit under the canonical root, which catches
/// symlinks pointing outside.
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Canonical path of an existing, readable file `root/folder/file_name`.
    ///
    /// `folder` may span several directories, `file_name` must be a single entry.
    pub fn resolve_file(&self, folder: &str, file_name: &str) -> Result<PathBuf, DomainError> {
        Self::single_entry(file_name)?;
        let relative = Self::relative(&[folder, file_name])?;
        let path = self.contained(&relative)?;

        if !path.is_file() {
            return Err(DomainError::NotFound(format!("{}/{}", folder, file_name)));
        }
        File::open(&path).map_err(|e| {
            DomainError::NotFound(format!("{}/{} is not readable: {}", folder, file_name, e))
        })?;
        Ok(path)
    }

    /// Canonical path of an existing directory `root/folder`
    pub fn resolve_folder(&self, folder: &str) -> Result<PathBuf, DomainError> {
        let relative = Self::relative(&[folder])?;
        let path = self.contained(&relative)?;

        if !path.is_dir() {
            return Err(DomainError::NotFound(format!("folder {}", folder)));
        }
        Ok(path)
    }

    /// Canonical root, `NotFound` if it does not exist
    pub fn canonical_root(&self) -> Result<PathBuf, DomainError> {
        self.root.canonicalize().map_err(|e| match e.kind() {
            IoErrorKind::NotFound => {
                DomainError::NotFound(format!("root directory {}", self.root.display()))
            }
            _ => DomainError::io(&self.root, e),
        })
    }

    fn single_entry(file_name: &str) -> Result<(), DomainError> {
        let mut components = Path::new(file_name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(()),
            _ => Err(DomainError::InvalidPath(format!(
                "'{}' is not a plain file name",
                file_name
            ))),
        }
    }

    /// Join names into a relative path made only of normal components
    fn relative(names: &[&str]) -> Result<PathBuf, DomainError> {
        let mut relative = PathBuf::new();
        for name in names {
            if name.is_empty() {
                return Err(DomainError::InvalidPath("empty name".to_string()));
            }
            for component in Path::new(name).components() {
                match component {
                    Component::Normal(part) => relative.push(part),
                    Component::CurDir => {}
                    Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                        return Err(DomainError::InvalidPath(format!(
                            "'{}' escapes the configured root",
                            name
                        )));
                    }
                }
            }
        }
        if relative.as_os_str().is_empty() {
            return Err(DomainError::InvalidPath(format!(
                "'{}' does not name an entry",
                names.join("/")
            )));
        }
        Ok(relative)
    }

    fn contained(&self, relative: &Path) -> Result<PathBuf, DomainError> {
        let root = self.canonical_root()?;
        let candidate = root.join(relative);

        let canonical = candidate.canonicalize().map_err(|e| match e.kind() {
            IoErrorKind::NotFound => DomainError::NotFound(relative.display().to_string()),
            _ => DomainError::NotFound(format!("{}: {}", relative.display(), e)),
        })?;

        if !canonical.starts_with(&root) {
            return Err(DomainError::InvalidPath(format!(
                "'{}' resolves outside the configured root",
                relative.display()
            )));
        }
        Ok(canonical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ErrorKind;
    use std::fs;
    use tempfile::TempDir;

    fn library() -> (TempDir, PathResolver) {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("demo")).unwrap();
        fs::write(dir.path().join("demo").join("clip.mp4"), b"video").unwrap();
        let resolver = PathResolver::new(dir.path());
        (dir, resolver)
    }

    #[test]
    fn test_resolves_existing_file() {
        let (dir, resolver) = library();
        let path = resolver.resolve_file("demo", "clip.mp4").unwrap();
        assert!(path.is_absolute());
        assert_eq!(
            path,
            dir.path().canonicalize().unwrap().join("demo").join("clip.mp4")
        );
    }

    #[test]
    fn test_missing_entries_are_not_found() {
        let (_dir, resolver) = library();
        assert_eq!(
            resolver.resolve_file("demo", "other.mp4").unwrap_err().kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            resolver.resolve_file("nope", "clip.mp4").unwrap_err().kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            resolver.resolve_folder("nope").unwrap_err().kind(),
            ErrorKind::NotFound
        );
        // a folder is not a file
        assert_eq!(
            resolver.resolve_file(".", "demo").unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn test_traversal_is_rejected() {
        let (_dir, resolver) = library();
        for (folder, file) in [
            ("../../etc", "passwd"),
            ("demo", "../../../etc/passwd"),
            ("/etc", "passwd"),
            ("demo/..", ".."),
            ("", "clip.mp4"),
            (".", "."),
        ] {
            let err = resolver.resolve_file(folder, file).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidPath, "{}/{}", folder, file);
        }
    }

    #[test]
    fn test_file_name_must_be_single_entry() {
        let (dir, resolver) = library();
        fs::create_dir(dir.path().join("demo").join("sub")).unwrap();
        fs::write(dir.path().join("demo").join("sub").join("clip.mp4"), b"x").unwrap();

        for file in ["sub/clip.mp4", "./clip.mp4", ".", ".."] {
            let err = resolver.resolve_file("demo", file).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidPath, "{}", file);
        }
        assert!(resolver.resolve_file("demo/sub", "clip.mp4").is_ok());
    }

    #[test]
    fn test_nested_names_stay_inside() {
        let (dir, resolver) = library();
        fs::create_dir(dir.path().join("demo").join("day1")).unwrap();
        fs::write(dir.path().join("demo").join("day1").join("a.mkv"), b"x").unwrap();
        assert!(resolver.resolve_file("demo/day1", "a.mkv").is_ok());
        assert!(resolver.resolve_file("./demo", "clip.mp4").is_ok());
    }

    #[test]
    fn test_missing_root_is_not_found() {
        let resolver = PathResolver::new("/no/such/video/root");
        assert_eq!(
            resolver.resolve_folder("demo").unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_escape_is_rejected() {
        let (dir, resolver) = library();
        let outside = TempDir::new().unwrap();
        fs::write(outside.path().join("secret.mp4"), b"x").unwrap();
        std::os::unix::fs::symlink(outside.path(), dir.path().join("linked")).unwrap();

        let err = resolver.resolve_file("linked", "secret.mp4").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPath);
    }
}
