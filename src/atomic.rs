use std::{
    fs::{File, OpenOptions},
    io::{Read, Write},
    path::{Path, PathBuf},
};

use fs2::FileExt;
use tempfile::NamedTempFile;

use crate::{Document, error::DocumentError};

struct FileLock {
    _file: File,
}

impl FileLock {
    fn lock(path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        // Blocks until exclusive lock is acquired
        file.lock_exclusive()?;

        Ok(Self { _file: file })
    }
}

/// Replaces `path` with `contents` through a synced temporary sibling file.
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let _lock = FileLock::lock(path)?;

    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;

    tmp.write_all(contents)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;

    tmp.persist(path)?;

    Ok(())
}

/// The durable home of a [`Document`].
#[derive(Debug, Clone)]
pub struct DocumentFile {
    path: PathBuf,
}

impl DocumentFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Reads the file text under a shared lock.
    pub fn read(&self) -> std::io::Result<String> {
        let file = OpenOptions::new().read(true).open(&self.path)?;

        file.lock_shared()?;

        let mut buf = String::new();
        (&file).read_to_string(&mut buf)?;

        Ok(buf)
    }

    pub fn load(&self) -> Result<Document, DocumentError> {
        let contents = self.read().map_err(|source| self.io_error(source))?;
        Document::parse(&contents)
    }

    pub fn save(&self, document: &Document) -> Result<(), DocumentError> {
        write_atomic(&self.path, document.render().as_bytes())
            .map_err(|source| self.io_error(source))
    }

    fn io_error(&self, source: std::io::Error) -> DocumentError {
        DocumentError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
