//! Download sinks: where an exported document ends up
//!
//! A sink receives a finished [`Blob`] plus its suggested filename and makes
//! it available to the user. Destinations that can take the bytes in one
//! step implement [`DownloadSink::save_blob`]; [`DownloadSink::deliver`]
//! prefers that path and falls back to the staged [`DownloadSink::save`].
//! [`DirectorySink`] stages the bytes in a hidden temp file next to the
//! destination and renames it into place; the staged file is owned by a
//! guard and removed on every early return.

use std::fmt;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use crate::error::{FiscalError, Result};

/// Binary payload with a MIME type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    mime_type: String,
    bytes: Vec<u8>,
}

impl Blob {
    /// Create a blob from raw bytes
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Create a blob holding UTF-8 text
    pub fn from_text(mime_type: impl Into<String>, text: String) -> Self {
        Self::new(mime_type, text.into_bytes())
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Where a saved blob went
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveLocation {
    File(PathBuf),
    Stdout,
    Memory,
}

impl fmt::Display for SaveLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveLocation::File(path) => write!(f, "{}", path.display()),
            SaveLocation::Stdout => f.write_str("<stdout>"),
            SaveLocation::Memory => f.write_str("<memory>"),
        }
    }
}

/// Destination for exported documents
pub trait DownloadSink: Send + Sync {
    /// Direct save, for destinations that accept the blob in one step.
    ///
    /// `None` means the sink has no direct path and [`save`](Self::save)
    /// must be used.
    fn save_blob(&self, _blob: &Blob, _filename: &str) -> Option<Result<SaveLocation>> {
        None
    }

    /// Staged save of `blob` under `filename`
    fn save(&self, blob: &Blob, filename: &str) -> Result<SaveLocation>;

    /// Save through the direct path when there is one, else the staged one
    fn deliver(&self, blob: &Blob, filename: &str) -> Result<SaveLocation> {
        match self.save_blob(blob, filename) {
            Some(result) => result,
            None => self.save(blob, filename),
        }
    }
}

/// Saves into a directory through a staged temp file
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Create a sink writing into `dir` (created on first save)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for DirectorySink {
    fn save(&self, blob: &Blob, filename: &str) -> Result<SaveLocation> {
        if filename.is_empty() || filename.contains(['/', '\\']) {
            return Err(FiscalError::ExportFailed(format!(
                "invalid filename: {:?}",
                filename
            )));
        }

        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
            debug!("Created export directory: {:?}", self.dir);
        }

        let final_path = self.dir.join(filename);
        let staged = StagedFile::create(&self.dir, filename)?;
        staged.write(blob.as_bytes())?;
        staged.commit(&final_path)?;

        debug!("Saved {} bytes ({}) to {:?}", blob.len(), blob.mime_type(), final_path);
        Ok(SaveLocation::File(final_path))
    }
}

/// Temp file that is removed on drop unless committed
struct StagedFile {
    path: PathBuf,
    committed: bool,
}

impl StagedFile {
    fn create(dir: &Path, filename: &str) -> Result<Self> {
        let path = dir.join(format!(".{}.tmp", filename));
        fs::File::create(&path).map_err(|e| {
            FiscalError::Io(io::Error::new(
                e.kind(),
                format!("Failed to create temp file: {}", e),
            ))
        })?;
        Ok(Self {
            path,
            committed: false,
        })
    }

    fn write(&self, bytes: &[u8]) -> Result<()> {
        let file = fs::OpenOptions::new().write(true).truncate(true).open(&self.path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(bytes)?;
        writer.flush()?;
        Ok(())
    }

    fn commit(mut self, dest: &Path) -> Result<()> {
        fs::rename(&self.path, dest).map_err(|e| {
            FiscalError::Io(io::Error::new(
                e.kind(),
                format!("Failed to rename temp file: {}", e),
            ))
        })?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.path);
        }
    }
}

/// Writes the blob bytes to standard output
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl StdoutSink {
    fn write(&self, blob: &Blob) -> Result<SaveLocation> {
        let mut out = io::stdout().lock();
        out.write_all(blob.as_bytes())?;
        out.flush()?;
        Ok(SaveLocation::Stdout)
    }
}

impl DownloadSink for StdoutSink {
    fn save_blob(&self, blob: &Blob, _filename: &str) -> Option<Result<SaveLocation>> {
        Some(self.write(blob))
    }

    fn save(&self, blob: &Blob, _filename: &str) -> Result<SaveLocation> {
        self.write(blob)
    }
}

/// Keeps saved blobs in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    saved: Mutex<Vec<(String, Blob)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything saved so far, oldest first
    pub fn saved(&self) -> Vec<(String, Blob)> {
        self.saved.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl DownloadSink for MemorySink {
    fn save(&self, blob: &Blob, filename: &str) -> Result<SaveLocation> {
        let mut saved = self
            .saved
            .lock()
            .map_err(|_| FiscalError::ExportFailed("memory sink poisoned".to_string()))?;
        saved.push((filename.to_string(), blob.clone()));
        Ok(SaveLocation::Memory)
    }
}
