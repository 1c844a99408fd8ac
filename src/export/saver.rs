//! Destinations for exported CSV bytes

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use super::error::ExportError;

/// Where the bytes ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Saved {
    pub location: String,
    pub bytes: usize,
}

/// File-save capability handed to the export pipeline
pub trait FileSaver {
    fn save(&self, file_name: &str, bytes: &[u8]) -> Result<Saved, ExportError>;
}

/// Writes `<dir>/<file_name>`, creating the directory if needed
#[derive(Debug, Clone)]
pub struct DirectorySaver {
    dir: PathBuf,
}

impl DirectorySaver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl FileSaver for DirectorySaver {
    fn save(&self, file_name: &str, bytes: &[u8]) -> Result<Saved, ExportError> {
        let path = self.dir.join(file_name);
        let delivery_error = |source| ExportError::Delivery {
            target: path.display().to_string(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(delivery_error)?;
        fs::write(&path, bytes).map_err(delivery_error)?;

        tracing::info!("Saved {} bytes to {}", bytes.len(), path.display());
        Ok(Saved {
            location: path.display().to_string(),
            bytes: bytes.len(),
        })
    }
}

/// Writes to one fixed path, ignoring the suggested file name
#[derive(Debug, Clone)]
pub struct PathSaver {
    path: PathBuf,
}

impl PathSaver {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FileSaver for PathSaver {
    fn save(&self, _file_name: &str, bytes: &[u8]) -> Result<Saved, ExportError> {
        fs::write(&self.path, bytes).map_err(|source| ExportError::Delivery {
            target: self.path.display().to_string(),
            source,
        })?;

        tracing::info!("Saved {} bytes to {}", bytes.len(), self.path.display());
        Ok(Saved {
            location: self.path.display().to_string(),
            bytes: bytes.len(),
        })
    }
}

/// Streams the CSV to standard output
#[derive(Debug, Clone, Default)]
pub struct StdoutSaver;

impl FileSaver for StdoutSaver {
    fn save(&self, _file_name: &str, bytes: &[u8]) -> Result<Saved, ExportError> {
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(bytes)
            .and_then(|_| stdout.flush())
            .map_err(|source| ExportError::Delivery {
                target: "stdout".to_string(),
                source,
            })?;

        Ok(Saved {
            location: "stdout".to_string(),
            bytes: bytes.len(),
        })
    }
}
