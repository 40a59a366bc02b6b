use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{CleaningError, Result};

mod fs_store;

pub use fs_store::FsArtifactStore;

/// Which version of a named artifact a reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionSelector {
    Latest,
    Exact(u64),
}

/// A parsed artifact reference: `name`, `name:latest`, or `name:vN`.
/// A bare name resolves to the latest version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRef {
    pub name: String,
    pub version: VersionSelector,
}

impl ArtifactRef {
    pub fn parse(reference: &str) -> Result<Self> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(CleaningError::BadArtifactRef(reference.to_string()));
        }
        match reference.rsplit_once(':') {
            None => Ok(Self {
                name: reference.to_string(),
                version: VersionSelector::Latest,
            }),
            Some((name, selector)) => {
                if name.is_empty() {
                    return Err(CleaningError::BadArtifactRef(reference.to_string()));
                }
                let version = if selector == "latest" {
                    VersionSelector::Latest
                } else {
                    let number = selector
                        .strip_prefix('v')
                        .and_then(|n| n.parse::<u64>().ok())
                        .ok_or_else(|| CleaningError::BadArtifactRef(reference.to_string()))?;
                    VersionSelector::Exact(number)
                };
                Ok(Self {
                    name: name.to_string(),
                    version,
                })
            }
        }
    }
}

impl fmt::Display for ArtifactRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.version {
            VersionSelector::Latest => write!(f, "{}:latest", self.name),
            VersionSelector::Exact(v) => write!(f, "{}:v{}", self.name, v),
        }
    }
}

/// Metadata persisted alongside each artifact version as `artifact.json`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ArtifactMeta {
    pub name: String,
    pub version: u64,
    pub artifact_type: String,
    pub description: String,
    pub file_name: String,
    pub size_bytes: u64,
    pub sha256: String,
    pub created_at: DateTime<Utc>,
}

/// An artifact version resolved to a readable local file.
#[derive(Debug, Clone)]
pub struct ResolvedArtifact {
    pub path: PathBuf,
    pub meta: ArtifactMeta,
}

/// Store seam for resolving input artifacts and publishing new versions.
/// Tests and future remote backends substitute their own implementations.
pub trait ArtifactStore {
    /// Resolve a reference to a concrete local file and its metadata.
    fn resolve(&self, reference: &ArtifactRef) -> Result<ResolvedArtifact>;

    /// Register `file` as the next version of the named artifact.
    fn publish(
        &self,
        name: &str,
        artifact_type: &str,
        description: &str,
        file: &Path,
    ) -> Result<ArtifactMeta>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_name_as_latest() {
        let reference = ArtifactRef::parse("sample.csv").unwrap();
        assert_eq!(reference.name, "sample.csv");
        assert_eq!(reference.version, VersionSelector::Latest);
    }

    #[test]
    fn parses_explicit_latest() {
        let reference = ArtifactRef::parse("sample.csv:latest").unwrap();
        assert_eq!(reference.name, "sample.csv");
        assert_eq!(reference.version, VersionSelector::Latest);
    }

    #[test]
    fn parses_exact_version() {
        let reference = ArtifactRef::parse("sample.csv:v3").unwrap();
        assert_eq!(reference.name, "sample.csv");
        assert_eq!(reference.version, VersionSelector::Exact(3));
    }

    #[test]
    fn rejects_malformed_references() {
        assert!(ArtifactRef::parse("").is_err());
        assert!(ArtifactRef::parse(":latest").is_err());
        assert!(ArtifactRef::parse("sample.csv:3").is_err());
        assert!(ArtifactRef::parse("sample.csv:vx").is_err());
    }

    #[test]
    fn display_round_trips() {
        let reference = ArtifactRef::parse("sample.csv:v2").unwrap();
        assert_eq!(reference.to_string(), "sample.csv:v2");
    }
}
