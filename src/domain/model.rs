use crate::domain::modelfile::Modelfile;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const METADATA_FILE: &str = "metadata.json";
pub const MODEL_FILE: &str = "model.mlmodel";
pub const WEIGHTS_FILE: &str = "weights.bin";
pub const PACKAGE_FILES: [&str; 3] = [METADATA_FILE, MODEL_FILE, WEIGHTS_FILE];

/// Filler written to the placeholder weights file.
pub const WEIGHTS_FILL_BYTE: u8 = b'0';

pub const BYTES_PER_MB: u64 = 1024 * 1024;
pub const BYTES_PER_GB: u64 = 1024 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum SourceKind {
    /// `ollama show --modelfile`
    #[default]
    Cli,
    /// Ollama HTTP `/api/show`
    Api,
}

/// Descriptive fields copied into `metadata.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::Args))]
#[serde(default)]
pub struct MetadataProfile {
    #[cfg_attr(feature = "cli", arg(long, default_value = "text_generation"))]
    pub model_type: String,

    #[cfg_attr(feature = "cli", arg(long, default_value = "gemma2"))]
    pub architecture: String,

    #[cfg_attr(feature = "cli", arg(long, default_value = "2B"))]
    pub parameters: String,

    #[cfg_attr(feature = "cli", arg(long, default_value = "int8"))]
    pub quantization: String,

    #[cfg_attr(feature = "cli", arg(long, default_value = "ios_neural_engine"))]
    pub target_platform: String,
}

impl Default for MetadataProfile {
    fn default() -> Self {
        Self {
            model_type: "text_generation".to_string(),
            architecture: "gemma2".to_string(),
            parameters: "2B".to_string(),
            quantization: "int8".to_string(),
            target_platform: "ios_neural_engine".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelBlob {
    pub path: PathBuf,
    pub size_bytes: u64,
    /// `sha256:<hex>` taken from the `sha256-<hex>` file name.
    pub digest: Option<String>,
}

impl ModelBlob {
    pub fn size_gb(&self) -> f64 {
        self.size_bytes as f64 / BYTES_PER_GB as f64
    }

    /// Size in GiB rounded to one decimal.
    pub fn rounded_size_gb(&self) -> f64 {
        (self.size_gb() * 10.0).round() / 10.0
    }
}

#[derive(Debug, Clone)]
pub struct ModelSnapshot {
    pub model: String,
    pub blob: ModelBlob,
    pub modelfile: Modelfile,
}

/// Contents of `metadata.json`; field order is the on-disk key order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageMetadata {
    pub model_type: String,
    pub architecture: String,
    pub parameters: String,
    pub quantization: String,
    pub target_platform: String,
    pub compressed_size_mb: u64,
    pub original_size_gb: f64,
}

impl PackageMetadata {
    pub fn new(profile: &MetadataProfile, compressed_size_mb: u64, original_size_gb: f64) -> Self {
        Self {
            model_type: profile.model_type.clone(),
            architecture: profile.architecture.clone(),
            parameters: profile.parameters.clone(),
            quantization: profile.quantization.clone(),
            target_platform: profile.target_platform.clone(),
            compressed_size_mb,
            original_size_gb,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PackagePlan {
    pub package_name: String,
    pub source_model: String,
    pub blob: ModelBlob,
    pub metadata: PackageMetadata,
    pub model_stub: String,
    pub weights_size_bytes: u64,
    pub fill_byte: u8,
}

impl PackagePlan {
    pub fn weights_size_mb(&self) -> u64 {
        self.weights_size_bytes / BYTES_PER_MB
    }
}

#[derive(Debug, Clone)]
pub struct PackageArtifact {
    pub root: PathBuf,
    pub files: Vec<PathBuf>,
    pub archive: Option<PathBuf>,
    pub bytes_written: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_serializes_in_package_key_order() {
        let metadata = PackageMetadata::new(&MetadataProfile::default(), 250, 1.6);
        let json = serde_json::to_string_pretty(&metadata).unwrap();

        let expected = r#"{
  "model_type": "text_generation",
  "architecture": "gemma2",
  "parameters": "2B",
  "quantization": "int8",
  "target_platform": "ios_neural_engine",
  "compressed_size_mb": 250,
  "original_size_gb": 1.6
}"#;
        assert_eq!(json, expected);
    }

    #[test]
    fn test_blob_rounded_size() {
        let blob = ModelBlob {
            path: PathBuf::from("sha256-abc"),
            size_bytes: 1_629_480_064,
            digest: None,
        };
        assert_eq!(blob.rounded_size_gb(), 1.5);

        let small = ModelBlob {
            size_bytes: 0,
            ..blob
        };
        assert_eq!(small.rounded_size_gb(), 0.0);
    }
}
