use std::fs::{File, OpenOptions, create_dir_all};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::errors::GenerationError;

pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), GenerationError> {
    let data = serde_json::to_vec_pretty(value)?;
    write_bytes_atomic(path, &data)
}

pub fn write_bytes_atomic(path: &Path, data: &[u8]) -> Result<(), GenerationError> {
    let pending = PendingFile::new(path)?;
    let mut file = pending.create()?;
    file.write_all(data)?;
    file.sync_all()?;
    drop(file);

    pending.commit()
}

/// Output being written to a `.tmp` sibling of its final path.
///
/// The temp file is removed on drop unless [`PendingFile::commit`] moved it
/// into place.
#[derive(Debug)]
pub struct PendingFile {
    path: PathBuf,
    tmp_path: PathBuf,
    committed: bool,
}

impl PendingFile {
    pub fn new(path: &Path) -> Result<Self, GenerationError> {
        let tmp_path = temp_path(path)?;
        ensure_parent(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            tmp_path,
            committed: false,
        })
    }

    pub fn tmp_path(&self) -> &Path {
        &self.tmp_path
    }

    /// Creates (or truncates) the temp file for writing.
    pub fn create(&self) -> io::Result<File> {
        OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .open(&self.tmp_path)
    }

    /// Moves the fully written temp file over the final path.
    pub fn commit(mut self) -> Result<(), GenerationError> {
        std::fs::rename(&self.tmp_path, &self.path)?;
        self.committed = true;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                sync_dir(parent)?;
            }
        }
        Ok(())
    }
}

impl Drop for PendingFile {
    fn drop(&mut self) {
        if !self.committed {
            let _ = std::fs::remove_file(&self.tmp_path);
        }
    }
}

fn temp_path(path: &Path) -> Result<PathBuf, GenerationError> {
    let file_name = path.file_name().ok_or_else(|| {
        GenerationError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid path for atomic write: {}", path.display()),
        ))
    })?;
    let tmp_name = format!("{}.tmp", file_name.to_string_lossy());
    Ok(path.with_file_name(tmp_name))
}

fn ensure_parent(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn sync_dir(path: &Path) -> io::Result<()> {
    let dir = OpenOptions::new().read(true).open(path)?;
    dir.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_path: &Path) -> io::Result<()> {
    Ok(())
}
