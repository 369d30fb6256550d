// src/sys/store.rs

use async_trait::async_trait;
use std::io;
use std::path::Path;
use tokio::fs;

use crate::models::FileStat;
use crate::sys::traits::ArtifactStore;

/// Local disk, via tokio's filesystem API.
pub struct LocalArtifactStore;

#[async_trait]
impl ArtifactStore for LocalArtifactStore {
    async fn dir_exists(&self, path: &Path) -> io::Result<bool> {
        match fs::metadata(path).await {
            Ok(meta) => Ok(meta.is_dir()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path).await
    }

    async fn copy(&self, src: &Path, dst: &Path) -> io::Result<u64> {
        // fs::copy truncates an existing destination and carries permissions
        // over, so the staged binary stays executable.
        fs::copy(src, dst).await
    }

    async fn stat(&self, path: &Path) -> io::Result<Option<FileStat>> {
        match fs::metadata(path).await {
            Ok(meta) if meta.is_file() => Ok(Some(FileStat {
                len: meta.len(),
                modified: meta.modified().ok(),
            })),
            // A directory where the binary should be is as good as missing.
            Ok(_) => Ok(None),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn dir_exists_distinguishes_files_and_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("agent");
        std::fs::write(&file, b"bin").unwrap();

        let store = LocalArtifactStore;
        assert!(store.dir_exists(dir.path()).await.unwrap());
        assert!(!store.dir_exists(&file).await.unwrap());
        assert!(!store.dir_exists(&dir.path().join("nope")).await.unwrap());
    }

    #[tokio::test]
    async fn create_dir_all_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("app").join("backend");

        let store = LocalArtifactStore;
        store.create_dir_all(&nested).await.unwrap();
        store.create_dir_all(&nested).await.unwrap();
        assert!(nested.is_dir());
    }

    #[tokio::test]
    async fn copy_overwrites_and_stat_sees_new_size() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.bin");
        let dst = dir.path().join("dst.bin");
        std::fs::write(&dst, vec![0u8; 64]).unwrap();
        std::fs::write(&src, vec![7u8; 10]).unwrap();

        let store = LocalArtifactStore;
        let copied = store.copy(&src, &dst).await.unwrap();
        assert_eq!(copied, 10);

        let stat = store.stat(&dst).await.unwrap().expect("destination present");
        assert_eq!(stat.len, 10);
        assert!(stat.modified.is_some());
    }

    #[tokio::test]
    async fn stat_of_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalArtifactStore;
        assert!(store.stat(&dir.path().join("ghost")).await.unwrap().is_none());
        assert!(store.stat(dir.path()).await.unwrap().is_none());
    }
}
