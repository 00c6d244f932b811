use log::info;
use std::io;
use std::path::{Path, PathBuf};

const DATA_DIR_NAME: &str = "wxhist";

/// Default root of the ingestion cache, e.g. `~/.local/share/wxhist/data` on Linux.
pub fn default_data_root() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join(DATA_DIR_NAME).join("data"))
}

/// Creates `path` (and its parents) unless it already is a directory.
pub async fn ensure_dir_exists(path: &Path) -> io::Result<()> {
    match tokio::fs::metadata(path).await {
        Ok(metadata) => {
            if !metadata.is_dir() {
                return Err(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("Path exists but is not a directory: {}", path.display()),
                ));
            }
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("Creating directory: {}", path.display());
            tokio::fs::create_dir_all(path).await
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_ensure_dir_exists_creates_nested() -> io::Result<()> {
        let dir = tempdir()?;
        let nested = dir.path().join("a/b/c");

        ensure_dir_exists(&nested).await?;
        ensure_dir_exists(&nested).await?;

        assert!(nested.is_dir());
        Ok(())
    }

    #[tokio::test]
    async fn test_ensure_dir_exists_rejects_files() -> io::Result<()> {
        let dir = tempdir()?;
        let file = dir.path().join("file");
        std::fs::write(&file, b"x")?;

        let err = ensure_dir_exists(&file).await.unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        Ok(())
    }
}
