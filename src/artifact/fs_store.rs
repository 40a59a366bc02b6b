use chrono::Utc;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::{ArtifactMeta, ArtifactRef, ArtifactStore, ResolvedArtifact, VersionSelector};
use crate::error::{CleaningError, Result};

const META_FILE: &str = "artifact.json";

/// Filesystem-backed artifact store.
///
/// Layout: `<root>/artifacts/<name>/v<N>/<payload>` with an `artifact.json`
/// document next to each payload. Versions are monotonic per name and never
/// overwritten; the store owns artifact lifecycle, callers only read one
/// version and write a new one.
pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    pub fn open_at_root<P: AsRef<Path>>(data_root: P) -> Result<Self> {
        let root = data_root.as_ref().join("artifacts");
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn artifact_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    fn version_dir(&self, name: &str, version: u64) -> PathBuf {
        self.artifact_dir(name).join(format!("v{}", version))
    }

    /// Highest `v<N>` directory under the artifact, if any.
    fn latest_version(&self, name: &str) -> Result<Option<u64>> {
        let dir = self.artifact_dir(name);
        if !dir.exists() {
            return Ok(None);
        }
        let mut latest: Option<u64> = None;
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let file_name = entry.file_name();
            let version = file_name
                .to_str()
                .and_then(|s| s.strip_prefix('v'))
                .and_then(|s| s.parse::<u64>().ok());
            if let Some(v) = version {
                latest = Some(latest.map_or(v, |current| current.max(v)));
            }
        }
        Ok(latest)
    }

    fn read_meta(&self, name: &str, version: u64) -> Result<ArtifactMeta> {
        let meta_path = self.version_dir(name, version).join(META_FILE);
        let raw = fs::read_to_string(&meta_path)
            .map_err(|_| CleaningError::ArtifactNotFound(format!("{}:v{}", name, version)))?;
        let meta: ArtifactMeta = serde_json::from_str(&raw)?;
        Ok(meta)
    }
}

impl ArtifactStore for FsArtifactStore {
    fn resolve(&self, reference: &ArtifactRef) -> Result<ResolvedArtifact> {
        let version = match reference.version {
            VersionSelector::Exact(v) => v,
            VersionSelector::Latest => self
                .latest_version(&reference.name)?
                .ok_or_else(|| CleaningError::ArtifactNotFound(reference.to_string()))?,
        };
        let meta = self.read_meta(&reference.name, version)?;
        let path = self.version_dir(&reference.name, version).join(&meta.file_name);
        if !path.exists() {
            return Err(CleaningError::ArtifactNotFound(reference.to_string()));
        }
        debug!(artifact = %reference, version, "Resolved artifact");
        Ok(ResolvedArtifact { path, meta })
    }

    fn publish(
        &self,
        name: &str,
        artifact_type: &str,
        description: &str,
        file: &Path,
    ) -> Result<ArtifactMeta> {
        let bytes = fs::read(file)?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let sha256 = hex::encode(hasher.finalize());

        let version = self.latest_version(name)?.map_or(1, |v| v + 1);
        let dir = self.version_dir(name, version);
        fs::create_dir_all(&dir)?;

        let file_name = file
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(name)
            .to_string();
        fs::copy(file, dir.join(&file_name))?;

        let meta = ArtifactMeta {
            name: name.to_string(),
            version,
            artifact_type: artifact_type.to_string(),
            description: description.to_string(),
            file_name,
            size_bytes: bytes.len() as u64,
            sha256,
            created_at: Utc::now(),
        };
        fs::write(dir.join(META_FILE), serde_json::to_string_pretty(&meta)?)?;

        info!(artifact = %name, version, size_bytes = meta.size_bytes, "Published artifact version");
        Ok(meta)
    }
}
