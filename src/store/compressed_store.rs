//! Gzip-compressed artifact storage.
//!
//! Every artifact is addressed by its *logical* path (for example
//! `data/KJFK/json/2004-1-1.json`). The bytes live next to it under the same
//! name with a `.gz` suffix. Older runs left plain files at the logical path;
//! reading such a file migrates it to the compressed form.

use crate::store::error::StoreError;
use async_compression::tokio::bufread::GzipDecoder;
use async_compression::tokio::write::GzipEncoder;
use log::{debug, info};
use std::ffi::OsString;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::{fs, task};

const GZIP_SUFFIX: &str = ".gz";

/// Reads and writes byte payloads as gzip files.
///
/// The store holds no state of its own, so it is `Copy` and can be handed to
/// every location worker.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompressedStore;

impl CompressedStore {
    pub fn new() -> Self {
        Self
    }

    /// Returns the on-disk location of the compressed form of `path`.
    pub fn compressed_path(path: &Path) -> PathBuf {
        let mut name: OsString = path.as_os_str().to_owned();
        name.push(GZIP_SUFFIX);
        PathBuf::from(name)
    }

    /// Compresses `bytes` and stores them at `<path>.gz`.
    ///
    /// The payload is written to a temporary file in the target directory and
    /// renamed into place, so a concurrent reader never sees a partial artifact.
    pub async fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
        let target = Self::compressed_path(path);
        let compressed = Self::compress(&target, bytes).await?;
        let compressed_len = compressed.len();

        let target_dir = target
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let target_clone = target.clone();
        task::spawn_blocking(move || {
            let mut temp_file = NamedTempFile::new_in(&target_dir)
                .map_err(|e| StoreError::Write(target_clone.clone(), e))?;
            temp_file
                .write_all(&compressed)
                .map_err(|e| StoreError::Write(target_clone.clone(), e))?;
            temp_file
                .flush()
                .map_err(|e| StoreError::Write(target_clone.clone(), e))?;
            temp_file
                .persist(&target_clone)
                .map_err(|e| StoreError::Write(target_clone.clone(), e.error))?;
            Ok::<(), StoreError>(())
        })
        .await??;

        debug!(
            "Wrote {} bytes ({} compressed) to {}",
            bytes.len(),
            compressed_len,
            target.display()
        );
        Ok(())
    }

    /// Reads and decompresses the artifact for `path`.
    ///
    /// When only a legacy uncompressed file exists at `path`, it is rewritten in
    /// compressed form and removed, and its bytes are returned. Fails with
    /// [`StoreError::NotFound`] when neither form exists.
    pub async fn read(&self, path: &Path) -> Result<Vec<u8>, StoreError> {
        let compressed_path = Self::compressed_path(path);
        match fs::read(&compressed_path).await {
            Ok(compressed) => {
                let bytes = Self::decompress(&compressed_path, &compressed).await?;
                // A crash between migrating and removing can leave both forms behind.
                Self::remove_legacy(path).await?;
                Ok(bytes)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => self.migrate_legacy(path).await,
            Err(e) => Err(StoreError::Read(compressed_path, e)),
        }
    }

    /// `true` when the artifact exists in either compressed or legacy form.
    ///
    /// Presence alone counts, the content is not inspected.
    pub async fn contains(&self, path: &Path) -> Result<bool, StoreError> {
        let compressed_path = Self::compressed_path(path);
        if fs::try_exists(&compressed_path)
            .await
            .map_err(|e| StoreError::Read(compressed_path.clone(), e))?
        {
            return Ok(true);
        }
        fs::try_exists(path)
            .await
            .map_err(|e| StoreError::Read(path.to_path_buf(), e))
    }

    async fn migrate_legacy(&self, path: &Path) -> Result<Vec<u8>, StoreError> {
        let legacy = match fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound(path.to_path_buf()))
            }
            Err(e) => return Err(StoreError::Read(path.to_path_buf(), e)),
        };

        info!("Migrating legacy artifact {} to gzip", path.display());
        self.write(path, &legacy).await?;
        fs::remove_file(path)
            .await
            .map_err(|e| StoreError::LegacyRemoval(path.to_path_buf(), e))?;
        Ok(legacy)
    }

    async fn remove_legacy(path: &Path) -> Result<(), StoreError> {
        match fs::remove_file(path).await {
            Ok(()) => {
                debug!("Removed stale legacy artifact {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::LegacyRemoval(path.to_path_buf(), e)),
        }
    }

    async fn compress(target: &Path, bytes: &[u8]) -> Result<Vec<u8>, StoreError> {
        let mut encoder = GzipEncoder::new(Vec::with_capacity(bytes.len() / 4 + 64));
        encoder
            .write_all(bytes)
            .await
            .map_err(|e| StoreError::Compress(target.to_path_buf(), e))?;
        encoder
            .shutdown()
            .await
            .map_err(|e| StoreError::Compress(target.to_path_buf(), e))?;
        Ok(encoder.into_inner())
    }

    async fn decompress(source: &Path, compressed: &[u8]) -> Result<Vec<u8>, StoreError> {
        let mut decoder = GzipDecoder::new(compressed);
        let mut decompressed = Vec::new();
        decoder
            .read_to_end(&mut decompressed)
            .await
            .map_err(|e| StoreError::Decompress(source.to_path_buf(), e))?;
        Ok(decompressed)
    }
}
