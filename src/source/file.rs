// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Offline job source backed by a directory.
//!
//! Layout: `<root>/<job id>.json` holds the descriptor; its result entries
//! are paths relative to `<root>` (a `file://` prefix is accepted).

use std::path::{Path, PathBuf};

use serde_json::Value;

use super::{JobDescriptor, JobSource};
use crate::error::SourceError;

#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a location to a path under the root
    pub fn resolve(&self, location: &str) -> PathBuf {
        let path = Path::new(location.strip_prefix("file://").unwrap_or(location));
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    async fn read_json(&self, path: PathBuf) -> Result<Value, SourceError> {
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|source| SourceError::Io { path: path.clone(), source })?;
        serde_json::from_slice(&bytes).map_err(|source| SourceError::Json {
            origin: path.display().to_string(),
            source,
        })
    }
}

impl JobSource for FileSource {
    async fn get_job(&self, id: &str) -> Result<JobDescriptor, SourceError> {
        let path = self.root.join(format!("{}.json", id));
        let origin = path.display().to_string();
        let value = self.read_json(path).await?;
        serde_json::from_value(value).map_err(|source| SourceError::Json { origin, source })
    }

    async fn fetch_json(&self, url: &str) -> Result<Value, SourceError> {
        self.read_json(self.resolve(url)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_resolve() {
        let source = FileSource::new("/data/jobs");
        assert_eq!(source.resolve("song/chords.json"), PathBuf::from("/data/jobs/song/chords.json"));
        assert_eq!(source.resolve("file:///abs/x.json"), PathBuf::from("/abs/x.json"));
        assert_eq!(source.resolve("file://rel.json"), PathBuf::from("/data/jobs/rel.json"));
    }

    #[tokio::test]
    async fn test_read_job_and_stream() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("song.json"),
            r#"{"name": "Song", "result": {"chords": "song-chords.json"}}"#,
        )
        .unwrap();
        fs::write(dir.path().join("song-chords.json"), "[]").unwrap();

        let source = FileSource::new(dir.path());
        let job = source.get_job("song").await.unwrap();
        assert_eq!(job.name.as_deref(), Some("Song"));

        let chords = source.fetch_json(job.outputs().chords.as_deref().unwrap()).await.unwrap();
        assert_eq!(chords, Value::Array(Vec::new()));
    }

    #[tokio::test]
    async fn test_missing_job() {
        let dir = tempdir().unwrap();
        let source = FileSource::new(dir.path());
        let err = source.get_job("nope").await.unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
    }

    #[tokio::test]
    async fn test_invalid_json() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
        let source = FileSource::new(dir.path());
        let err = source.fetch_json("broken.json").await.unwrap_err();
        assert!(matches!(err, SourceError::Json { .. }));
    }
}
