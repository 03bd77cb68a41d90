//! Path utilities for mirroring the source tree into the destination tree

use std::path::{Component, Path, PathBuf};

/// Maps source files to their mirrored destination and remote locations
#[derive(Debug, Clone)]
pub struct PathMapper {
    source_dir: PathBuf,
    dest_root: PathBuf,
}

impl PathMapper {
    pub fn new(source_dir: impl Into<PathBuf>, dest_root: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            dest_root: dest_root.into(),
        }
    }

    /// Source directory being mirrored
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Destination root of the run (`converted-<timestamp>`)
    pub fn dest_root(&self) -> &Path {
        &self.dest_root
    }

    /// Directory mirroring the source directory: `<dest_root>/<basename(source_dir)>`
    pub fn mirror_root(&self) -> PathBuf {
        match self.source_dir.file_name() {
            Some(name) => self.dest_root.join(name),
            None => self.dest_root.clone(),
        }
    }

    /// Destination path of a source file or directory
    pub fn output_path(&self, source: &Path) -> PathBuf {
        match source.strip_prefix(&self.source_dir) {
            Ok(relative) => self.mirror_root().join(relative),
            Err(_) => self.mirror_root().join(source.file_name().unwrap_or_default()),
        }
    }

    /// Remote path of a produced file, relative segments joined with `/` under `upload_dir`
    pub fn remote_path(&self, produced: &Path, upload_dir: &str) -> String {
        let relative = produced.strip_prefix(&self.dest_root).unwrap_or(produced);
        let mut segments: Vec<String> = upload_dir
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        segments.extend(relative.components().filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().to_string()),
            _ => None,
        }));
        segments.join("/")
    }
}

/// True when the file carries the given extension (leading dot optional)
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy() == extension.trim_start_matches('.'))
        .unwrap_or(false)
}

/// Sibling path used while an output file is rewritten
pub fn sibling_temp_path(path: &Path, tag: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{}.{}.{}", stem, tag, ext.to_string_lossy()),
        None => format!("{}.{}", stem, tag),
    };
    path.with_file_name(name)
}
