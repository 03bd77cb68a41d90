// Local filesystem adapter - discovery, destination mirroring and file moves

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{ConvertError, ConvertResult};
use crate::ports::*;
use crate::utils::path::{has_extension, PathMapper};

/// Local filesystem adapter
pub struct LocalFsAdapter;

impl LocalFsAdapter {
    pub fn new() -> Self {
        Self
    }

    fn walk(dir: &Path, extension: &str) -> ConvertResult<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(dir).follow_links(true) {
            let entry = entry.map_err(|e| ConvertError::io(dir, e.into()))?;
            if entry.file_type().is_file() && has_extension(entry.path(), extension) {
                files.push(entry.into_path());
            }
        }
        files.sort();
        Ok(files)
    }
}

impl Default for LocalFsAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FsPort for LocalFsAdapter {
    async fn discover(&self, dir: &Path, extension: &str) -> ConvertResult<Vec<PathBuf>> {
        let files = Self::walk(dir, extension)?;
        debug!("{} file(s) matching '{}' under {}", files.len(), extension, dir.display());
        Ok(files)
    }

    async fn mirror_directories(&self, mapper: &PathMapper, extension: &str) -> ConvertResult<()> {
        tokio::fs::create_dir_all(mapper.dest_root())
            .await
            .map_err(|e| ConvertError::io(mapper.dest_root(), e))?;

        let dirs: BTreeSet<PathBuf> = Self::walk(mapper.source_dir(), extension)?
            .iter()
            .filter_map(|file| file.parent())
            .map(|parent| mapper.output_path(parent))
            .collect();

        for dir in dirs {
            tokio::fs::create_dir_all(&dir)
                .await
                .map_err(|e| ConvertError::io(&dir, e))?;
        }
        Ok(())
    }

    async fn copy_file(&self, from: &Path, to: &Path) -> ConvertResult<()> {
        tokio::fs::copy(from, to)
            .await
            .map_err(|e| ConvertError::io(from, e))?;
        Ok(())
    }

    async fn move_file(&self, from: &Path, to: &Path) -> ConvertResult<()> {
        tokio::fs::rename(from, to)
            .await
            .map_err(|e| ConvertError::io(from, e))
    }

    async fn remove_file(&self, file_path: &Path) -> ConvertResult<()> {
        match tokio::fs::remove_file(file_path).await {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
                Err(ConvertError::io(file_path, e))
            }
            _ => Ok(()),
        }
    }

    async fn file_size(&self, file_path: &Path) -> ConvertResult<u64> {
        let metadata = tokio::fs::metadata(file_path)
            .await
            .map_err(|e| ConvertError::io(file_path, e))?;
        Ok(metadata.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn source_tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        let videos = dir.path().join("videos");
        fs::create_dir_all(videos.join("season1")).unwrap();
        fs::create_dir_all(videos.join("notes/drafts")).unwrap();
        fs::write(videos.join("b.mp4"), b"b").unwrap();
        fs::write(videos.join("a.mp4"), b"a").unwrap();
        fs::write(videos.join("season1/e1.mp4"), b"e1").unwrap();
        fs::write(videos.join("notes/drafts/readme.txt"), b"x").unwrap();
        dir
    }

    #[tokio::test]
    async fn test_discover_is_sorted_and_filtered() {
        let tree = source_tree();
        let videos = tree.path().join("videos");
        let files = LocalFsAdapter::new().discover(&videos, "mp4").await.unwrap();
        assert_eq!(
            files,
            vec![
                videos.join("a.mp4"),
                videos.join("b.mp4"),
                videos.join("season1/e1.mp4"),
            ]
        );
    }

    #[tokio::test]
    async fn test_mirror_prunes_directories_without_matches() {
        let tree = source_tree();
        let dest = tree.path().join("converted-2024.01.01-000000");
        let mapper = PathMapper::new(tree.path().join("videos"), &dest);

        LocalFsAdapter::new().mirror_directories(&mapper, "mp4").await.unwrap();

        assert!(dest.join("videos").is_dir());
        assert!(dest.join("videos/season1").is_dir());
        assert!(!dest.join("videos/notes").exists());
    }

    #[tokio::test]
    async fn test_copy_move_and_size() {
        let tree = source_tree();
        let fs_port = LocalFsAdapter::new();
        let src = tree.path().join("videos/a.mp4");
        let copy = tree.path().join("copy.mp4");
        let moved = tree.path().join("moved.mp4");

        fs_port.copy_file(&src, &copy).await.unwrap();
        fs_port.move_file(&copy, &moved).await.unwrap();

        assert!(!copy.exists());
        assert_eq!(fs_port.file_size(&moved).await.unwrap(), 1);

        let err = fs_port.file_size(&copy).await.unwrap_err();
        assert!(matches!(err, ConvertError::IoFailure { .. }));
    }

    #[tokio::test]
    async fn test_remove_file_tolerates_missing() {
        let tree = source_tree();
        let fs_port = LocalFsAdapter::new();
        let partial = tree.path().join("videos/a.trim.mp4");
        std::fs::write(&partial, b"half").unwrap();

        fs_port.remove_file(&partial).await.unwrap();
        assert!(!partial.exists());
        fs_port.remove_file(&partial).await.unwrap();
    }
}
