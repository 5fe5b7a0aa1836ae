//! File-like inputs accepted by the uploader.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use folio_types::mime_from_path;

/// One file offered for upload.
///
/// `name`, `mime_type` and `size` are what the source *declares*; they are
/// checked before any content is read. `read_all` is the only suspension
/// point of an upload.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Original file name.
    fn name(&self) -> &str;

    /// Declared MIME type (`""` if unknown).
    fn mime_type(&self) -> &str;

    /// Declared byte length.
    fn size(&self) -> u64;

    /// Read the full content.
    async fn read_all(&self) -> io::Result<Vec<u8>>;
}

/// A file already held in memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemoryFile {
    name: String,
    mime_type: String,
    bytes: Vec<u8>,
}

impl MemoryFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Declare the MIME type from the name's extension.
    pub fn from_name(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let mime_type = mime_from_path(Path::new(&name));
        Self::new(name, mime_type, bytes)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

#[async_trait]
impl ImageSource for MemoryFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    async fn read_all(&self) -> io::Result<Vec<u8>> {
        Ok(self.bytes.clone())
    }
}

/// A file on disk. Metadata is captured at `open`; content is read on demand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathFile {
    path: PathBuf,
    name: String,
    mime_type: String,
    size: u64,
}

impl PathFile {
    /// Stat `path` and declare its MIME type from the extension.
    pub async fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let meta = tokio::fs::metadata(&path).await?;
        if !meta.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("not a regular file: {}", path.display()),
            ));
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mime_type = mime_from_path(&path).to_string();
        Ok(Self {
            path,
            name,
            mime_type,
            size: meta.len(),
        })
    }

    /// Override the declared MIME type.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ImageSource for PathFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    fn size(&self) -> u64 {
        self.size
    }

    async fn read_all(&self) -> io::Result<Vec<u8>> {
        tokio::fs::read(&self.path).await
    }
}
