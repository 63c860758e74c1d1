// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Job snapshot loading.
//!
//! A snapshot is fetched once per job view: the descriptor first, then the
//! section, lyric and chord streams concurrently. A stream that fails or is
//! not a JSON array degrades to an empty list; only a failed descriptor or
//! a cancellation aborts the load.

pub mod cancel;

pub use cancel::{cancellation, CancelGuard, CancelToken};

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::LoadError;
use crate::model::{ChordEvent, LyricLine, Section};
use crate::source::JobSource;

/// The three analysis streams of a job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Sections,
    Lyrics,
    Chords,
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StreamKind::Sections => "sections",
            StreamKind::Lyrics => "lyrics",
            StreamKind::Chords => "chords",
        })
    }
}

/// Immutable data for one job view
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JobSnapshot {
    pub job_id: String,
    /// Job name, or the id when the job has none
    pub title: String,
    pub sections: Vec<Section>,
    pub chords: Vec<ChordEvent>,
    pub lines: Vec<LyricLine>,
}

impl JobSnapshot {
    /// Snapshot with no data, used when the job itself could not be fetched
    pub fn empty(job_id: impl Into<String>) -> Self {
        let job_id = job_id.into();
        Self {
            title: job_id.clone(),
            job_id,
            ..Default::default()
        }
    }
}

/// Load a job snapshot, aborting if `cancel` fires first
pub async fn load_snapshot<S: JobSource>(
    source: &S,
    job_id: &str,
    cancel: &CancelToken,
) -> Result<JobSnapshot, LoadError> {
    let cancelled = || LoadError::Cancelled {
        job_id: job_id.to_string(),
    };

    if cancel.is_cancelled() {
        return Err(cancelled());
    }

    let mut token = cancel.clone();
    tokio::select! {
        biased;
        _ = token.cancelled() => {
            info!(job_id, "load cancelled");
            Err(cancelled())
        }
        snapshot = fetch_snapshot(source, job_id) => snapshot,
    }
}

async fn fetch_snapshot<S: JobSource>(source: &S, job_id: &str) -> Result<JobSnapshot, LoadError> {
    let descriptor = source
        .get_job(job_id)
        .await
        .map_err(|source| LoadError::Job {
            job_id: job_id.to_string(),
            source,
        })?;
    let outputs = descriptor.outputs();

    let (sections, lines, chords) = tokio::join!(
        fetch_stream::<Section, _>(source, StreamKind::Sections, outputs.sections.as_deref()),
        fetch_stream::<LyricLine, _>(source, StreamKind::Lyrics, outputs.lyrics.as_deref()),
        fetch_stream::<ChordEvent, _>(source, StreamKind::Chords, outputs.chords.as_deref()),
    );

    info!(
        job_id,
        sections = sections.len(),
        lines = lines.len(),
        chords = chords.len(),
        "loaded job"
    );

    Ok(JobSnapshot {
        job_id: job_id.to_string(),
        title: descriptor.name.unwrap_or_else(|| job_id.to_string()),
        sections,
        chords,
        lines,
    })
}

async fn fetch_stream<T, S>(source: &S, kind: StreamKind, url: Option<&str>) -> Vec<T>
where
    T: DeserializeOwned,
    S: JobSource,
{
    let Some(url) = url else {
        debug!(stream = %kind, "stream not present in job result");
        return Vec::new();
    };

    match source.fetch_json(url).await {
        Ok(value) => parse_stream(kind, value),
        Err(err) => {
            warn!(stream = %kind, error = %err, "stream fetch failed; using empty list");
            Vec::new()
        }
    }
}

/// Coerce a stream document into a list, dropping elements that don't parse
pub fn parse_stream<T: DeserializeOwned>(kind: StreamKind, value: Value) -> Vec<T> {
    let Value::Array(items) = value else {
        warn!(stream = %kind, "stream is not a JSON array; using empty list");
        return Vec::new();
    };

    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                warn!(stream = %kind, index, error = %err, "skipping malformed element");
                None
            }
        })
        .collect()
}
