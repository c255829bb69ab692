//! Streamable handles on finished videos

use std::io::SeekFrom;
use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt, Take};
use tokio_util::io::ReaderStream;

use crate::domain::errors::DomainError;

/// An opened video ready to be streamed, whole or by byte range
#[derive(Debug)]
pub struct VideoResource {
    path: PathBuf,
    file: File,
    len: u64,
    content_type: String,
}

impl VideoResource {
    /// Open `path` now; existence is checked at call time, never cached
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let file = File::open(path).await.map_err(|e| {
            DomainError::NotFound(format!("{} is not readable: {}", path.display(), e))
        })?;
        let metadata = file
            .metadata()
            .await
            .map_err(|e| DomainError::NotFound(format!("{}: {}", path.display(), e)))?;
        if !metadata.is_file() {
            return Err(DomainError::NotFound(format!(
                "{} is not a file",
                path.display()
            )));
        }

        let content_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        Ok(Self {
            path: path.to_path_buf(),
            file,
            len: metadata.len(),
            content_type,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// MIME type guessed from the extension, `application/octet-stream` if unknown
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// File name for a `Content-Disposition: inline` header
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// Stream of the whole file
    pub fn into_stream(self) -> ReaderStream<File> {
        ReaderStream::new(self.file)
    }

    /// Reader over bytes `start..=end`; `end` is clamped to the last byte
    pub async fn into_range(mut self, start: u64, end: u64) -> Result<Take<File>, DomainError> {
        if self.len == 0 || start >= self.len || start > end {
            return Err(DomainError::InvalidRequest(format!(
                "Range {}-{} not satisfiable for {} bytes",
                start, end, self.len
            )));
        }
        let end = end.min(self.len - 1);

        self.file
            .seek(SeekFrom::Start(start))
            .await
            .map_err(|e| DomainError::io(&self.path, e))?;
        Ok(self.file.take(end - start + 1))
    }

    /// Stream of bytes `start..=end`
    pub async fn into_range_stream(
        self,
        start: u64,
        end: u64,
    ) -> Result<ReaderStream<Take<File>>, DomainError> {
        Ok(ReaderStream::new(self.into_range(start, end).await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ErrorKind;
    use tempfile::TempDir;
    use tokio_stream::StreamExt;

    #[tokio::test]
    async fn test_open_reports_metadata() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clip.mp4");
        std::fs::write(&path, b"0123456789").unwrap();

        let resource = VideoResource::open(&path).await.unwrap();
        assert_eq!(resource.len(), 10);
        assert_eq!(resource.content_type(), "video/mp4");
        assert_eq!(resource.file_name(), "clip.mp4");

        let mut stream = resource.into_stream();
        let mut bytes = Vec::new();
        while let Some(chunk) = stream.next().await {
            bytes.extend_from_slice(&chunk.unwrap());
        }
        assert_eq!(bytes, b"0123456789");
    }

    #[tokio::test]
    async fn test_range_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clip.mkv");
        std::fs::write(&path, b"0123456789").unwrap();

        let mut reader = VideoResource::open(&path)
            .await
            .unwrap()
            .into_range(2, 5)
            .await
            .unwrap();
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await.unwrap();
        assert_eq!(bytes, b"2345");

        let mut tail = VideoResource::open(&path)
            .await
            .unwrap()
            .into_range(7, 1_000)
            .await
            .unwrap();
        let mut bytes = Vec::new();
        tail.read_to_end(&mut bytes).await.unwrap();
        assert_eq!(bytes, b"789");

        let mut stream = VideoResource::open(&path)
            .await
            .unwrap()
            .into_range_stream(0, 1)
            .await
            .unwrap();
        let mut bytes = Vec::new();
        while let Some(chunk) = stream.next().await {
            bytes.extend_from_slice(&chunk.unwrap());
        }
        assert_eq!(bytes, b"01");

        let err = VideoResource::open(&path)
            .await
            .unwrap()
            .into_range(10, 12)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    }

    #[tokio::test]
    async fn test_missing_or_deleted_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gone.avi");
        std::fs::write(&path, b"x").unwrap();
        std::fs::remove_file(&path).unwrap();

        let err = VideoResource::open(&path).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = VideoResource::open(dir.path()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_unknown_extension_is_octet_stream() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clip.unknownext");
        std::fs::write(&path, b"x").unwrap();

        let resource = VideoResource::open(&path).await.unwrap();
        assert_eq!(resource.content_type(), "application/octet-stream");
    }
}
