// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Job data sources.
//!
//! A source resolves a job id to a descriptor listing where its analysis
//! streams live, and fetches any of those locations as JSON.
//!
//! - `HttpSource`: the remote analysis API
//! - `FileSource`: a local directory of exported jobs

pub mod file;
pub mod http;

pub use file::FileSource;
pub use http::HttpSource;

use std::future::Future;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SourceError;

/// Job metadata as returned by the job API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobDescriptor {
    /// Human-readable job name
    #[serde(default)]
    pub name: Option<String>,
    /// Output locations; `null` or absent when the job produced nothing
    #[serde(default)]
    pub result: Option<JobResult>,
}

impl JobDescriptor {
    /// Output locations, empty when the job has no result
    pub fn outputs(&self) -> JobResult {
        self.result.clone().unwrap_or_default()
    }
}

/// Locations of the three analysis streams; each may be missing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobResult {
    #[serde(rename = "Sections", default)]
    pub sections: Option<String>,
    #[serde(rename = "Lyrics", default)]
    pub lyrics: Option<String>,
    #[serde(default)]
    pub chords: Option<String>,
}

/// Where job descriptors and stream JSON come from
pub trait JobSource {
    /// Fetch the descriptor for a job
    fn get_job(&self, id: &str) -> impl Future<Output = Result<JobDescriptor, SourceError>> + Send;

    /// Fetch any JSON document by location
    fn fetch_json(&self, url: &str) -> impl Future<Output = Result<Value, SourceError>> + Send;
}
