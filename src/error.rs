// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Error types for fetching and loading job data.
//!
//! - `SourceError`: one request to a job source failed
//! - `LoadError`: a snapshot could not be produced at all
//!
//! Per-stream failures never surface as errors; the loader replaces the
//! stream with an empty list and logs the `SourceError`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    /// Transport-level failure (DNS, TLS, connection, body read)
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-success status
    #[error("{url} responded with status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Local file could not be read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Body was not valid JSON, or not the expected shape
    #[error("invalid JSON from {origin}: {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Error, Debug)]
pub enum LoadError {
    /// The job descriptor itself could not be fetched
    #[error("failed to fetch job {job_id}: {source}")]
    Job {
        job_id: String,
        #[source]
        source: SourceError,
    },

    /// The load was cancelled before it finished
    #[error("loading job {job_id} was cancelled")]
    Cancelled { job_id: String },
}

impl LoadError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, LoadError::Cancelled { .. })
    }
}
