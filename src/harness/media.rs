use std::path::{Path, PathBuf};

use rand::seq::SliceRandom;

use crate::error::ValidationError;

/// Local media files the workflows upload. Both pools are scanned once at
/// startup; each iteration picks uniformly at random.
#[derive(Debug, Clone)]
pub struct MediaPool {
    audio: Vec<PathBuf>,
    images: Vec<PathBuf>,
}

impl MediaPool {
    /// Scans both resource directories for regular files.
    ///
    /// # Errors
    ///
    /// Returns a validation error when a directory cannot be read or holds
    /// no regular files.
    pub fn scan(audio_dir: &Path, images_dir: &Path) -> Result<Self, ValidationError> {
        Ok(Self {
            audio: list_files(audio_dir)?,
            images: list_files(images_dir)?,
        })
    }

    #[must_use]
    pub fn pick_audio(&self) -> Option<&Path> {
        pick(&self.audio)
    }

    #[must_use]
    pub fn pick_image(&self) -> Option<&Path> {
        pick(&self.images)
    }
}

fn pick(pool: &[PathBuf]) -> Option<&Path> {
    pool.choose(&mut rand::thread_rng()).map(PathBuf::as_path)
}

fn list_files(dir: &Path) -> Result<Vec<PathBuf>, ValidationError> {
    let read_err = |source| ValidationError::ReadMediaDir {
        path: dir.to_path_buf(),
        source,
    };
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_err)? {
        let path = entry.map_err(read_err)?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    if files.is_empty() {
        return Err(ValidationError::EmptyMediaPool {
            path: dir.to_path_buf(),
        });
    }
    Ok(files)
}
