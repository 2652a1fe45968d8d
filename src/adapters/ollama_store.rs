//! Read-only access to Ollama's on-disk model store.
//!
//! Layout under the models directory:
//! `manifests/<registry>/<namespace>/<name>/<tag>` holds a JSON manifest whose
//! layers point at content-addressed files in `blobs/sha256-<hex>`.

use crate::domain::model::ModelBlob;
use crate::domain::model_ref::ModelReference;
use crate::utils::error::{ConvertError, Result};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

pub const MODEL_LAYER_MEDIA_TYPE: &str = "application/vnd.ollama.image.model";

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    layers: Vec<ManifestLayer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ManifestLayer {
    media_type: String,
    digest: String,
    #[serde(default)]
    size: u64,
}

/// `$OLLAMA_MODELS`, falling back to `~/.ollama/models`.
pub fn default_models_dir() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os("OLLAMA_MODELS").filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(dir));
    }
    let home = std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE"))?;
    Some(PathBuf::from(home).join(".ollama").join("models"))
}

/// `sha256:<hex>` for a blob named `sha256-<hex>`.
pub fn digest_from_file_name(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    let hex = name.strip_prefix("sha256-")?;
    if hex.len() == 64 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        Some(format!("sha256:{}", hex.to_ascii_lowercase()))
    } else {
        None
    }
}

pub fn blob_file_name(digest: &str) -> String {
    digest.replacen(':', "-", 1)
}

pub async fn inspect_blob(path: &Path) -> Result<ModelBlob> {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() => Ok(ModelBlob {
            path: path.to_path_buf(),
            size_bytes: meta.len(),
            digest: digest_from_file_name(path),
        }),
        Ok(_) => Err(ConvertError::BlobNotFound {
            path: path.to_path_buf(),
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ConvertError::BlobNotFound {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(ConvertError::IoError(e)),
    }
}

/// Hashes the blob and compares it with the digest in its file name.
/// Returns `false` when the name carries no digest to check against.
pub async fn verify_digest(blob: &ModelBlob) -> Result<bool> {
    let Some(expected) = blob.digest.clone() else {
        tracing::warn!(
            "⚠️ {} is not named by digest, skipping verification",
            blob.path.display()
        );
        return Ok(false);
    };

    let path = blob.path.clone();
    let actual = tokio::task::spawn_blocking(move || sha256_file(&path))
        .await
        .map_err(|e| ConvertError::ProcessingError {
            message: format!("Digest task failed: {}", e),
        })??;

    if actual != expected {
        return Err(ConvertError::DigestMismatch {
            path: blob.path.clone(),
            expected,
            actual,
        });
    }

    tracing::debug!("Digest verified: {}", expected);
    Ok(true)
}

fn sha256_file(path: &Path) -> Result<String> {
    let mut file = std::fs::File::open(path)?;
    let mut hasher = Sha256::new();
    std::io::copy(&mut file, &mut hasher)?;
    Ok(format!("sha256:{:x}", hasher.finalize()))
}

#[derive(Debug, Clone)]
pub struct BlobLocator {
    models_dir: PathBuf,
}

impl BlobLocator {
    pub fn new(models_dir: impl Into<PathBuf>) -> Self {
        Self {
            models_dir: models_dir.into(),
        }
    }

    /// Uses the configured directory, else the Ollama default.
    pub fn from_config(models_dir: Option<&str>) -> Option<Self> {
        models_dir
            .map(PathBuf::from)
            .or_else(default_models_dir)
            .map(Self::new)
    }

    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }

    pub fn manifest_path(&self, reference: &ModelReference) -> PathBuf {
        self.models_dir.join(reference.manifest_relative_path())
    }

    pub fn blob_path(&self, digest: &str) -> PathBuf {
        self.models_dir.join("blobs").join(blob_file_name(digest))
    }

    /// `Ok(None)` when the model has no manifest in this store.
    pub async fn resolve(&self, reference: &ModelReference) -> Result<Option<ModelBlob>> {
        let manifest_path = self.manifest_path(reference);
        let content = match tokio::fs::read(&manifest_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No manifest at {}", manifest_path.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let manifest: Manifest =
            serde_json::from_slice(&content).map_err(|e| ConvertError::ManifestError {
                path: manifest_path.clone(),
                message: e.to_string(),
            })?;

        let layer = manifest
            .layers
            .iter()
            .find(|layer| layer.media_type == MODEL_LAYER_MEDIA_TYPE)
            .ok_or_else(|| ConvertError::ModelLayerMissing {
                model: reference.to_string(),
            })?;

        let blob = inspect_blob(&self.blob_path(&layer.digest)).await?;
        if layer.size > 0 && layer.size != blob.size_bytes {
            tracing::warn!(
                "⚠️ Manifest size {} differs from blob size {}",
                layer.size,
                blob.size_bytes
            );
        }

        Ok(Some(blob))
    }
}
