use crate::adapters::archive::{archive_file_name, archive_package};
use crate::adapters::ollama_store::{inspect_blob, verify_digest, BlobLocator};
use crate::core::{ConfigProvider, MetadataSource, Pipeline, Storage};
use crate::domain::model::{
    ModelBlob, ModelSnapshot, PackageArtifact, PackageMetadata, PackagePlan, BYTES_PER_MB,
    METADATA_FILE, MODEL_FILE, PACKAGE_FILES, WEIGHTS_FILE, WEIGHTS_FILL_BYTE,
};
use crate::domain::model_ref::ModelReference;
use crate::domain::modelfile::Modelfile;
use crate::utils::error::{ConvertError, Result};
use std::path::{Path, PathBuf};

/// Builds a placeholder `.mlpackage` from a local Ollama model.
pub struct PackagePipeline<S: Storage, M: MetadataSource, C: ConfigProvider> {
    storage: S,
    source: M,
    config: C,
}

impl<S: Storage, M: MetadataSource, C: ConfigProvider> PackagePipeline<S, M, C> {
    pub fn new(storage: S, source: M, config: C) -> Self {
        Self {
            storage,
            source,
            config,
        }
    }

    async fn resolve_from_store(
        &self,
        reference: &ModelReference,
    ) -> Result<(Option<ModelBlob>, Option<PathBuf>)> {
        let Some(locator) = BlobLocator::from_config(self.config.models_dir()) else {
            tracing::warn!("⚠️ No Ollama models directory known, skipping manifest lookup");
            return Ok((None, None));
        };

        let manifest_path = locator.manifest_path(reference);
        tracing::debug!("Looking up manifest {}", manifest_path.display());
        let blob = locator.resolve(reference).await?;
        Ok((blob, Some(manifest_path)))
    }
}

fn log_modelfile(modelfile: &Modelfile) {
    if let Some(from) = &modelfile.from {
        tracing::debug!("Modelfile FROM {}", from);
    }
    tracing::debug!(
        "Modelfile has {} parameters, template: {}, system prompt: {}",
        modelfile.parameters.len(),
        modelfile.template.is_some(),
        modelfile.system.is_some()
    );
    for line in &modelfile.unknown {
        tracing::warn!("⚠️ Unrecognized Modelfile line: {}", line);
    }
}

#[async_trait::async_trait]
impl<S: Storage, M: MetadataSource, C: ConfigProvider> Pipeline for PackagePipeline<S, M, C> {
    async fn extract(&self) -> Result<ModelSnapshot> {
        let model = self.config.model_name();
        let reference =
            ModelReference::parse(model).map_err(|e| ConvertError::InvalidConfigValueError {
                field: "model.name".to_string(),
                value: model.to_string(),
                reason: e.to_string(),
            })?;

        // 明確指定的 blob 必須在呼叫 ollama 之前確認存在
        let (blob, manifest_path) = match self.config.blob_path() {
            Some(path) => {
                tracing::debug!("Checking configured blob {}", path);
                (Some(inspect_blob(Path::new(path)).await?), None)
            }
            None => self.resolve_from_store(&reference).await?,
        };

        if let Some(blob) = &blob {
            tracing::info!("✅ Blob found: {:.1} GB", blob.size_gb());
        }

        tracing::info!("📤 Reading Ollama metadata via {}", self.source.describe());
        let raw_modelfile = self.source.fetch_modelfile(model).await?;
        tracing::trace!("Modelfile:\n{}", raw_modelfile);
        let modelfile = Modelfile::parse(&raw_modelfile);
        tracing::info!("✅ Ollama metadata retrieved");
        log_modelfile(&modelfile);

        let blob = match blob {
            Some(blob) => blob,
            None => match modelfile.from_path() {
                Some(path) => {
                    tracing::debug!("Using blob from Modelfile FROM: {}", path.display());
                    let blob = inspect_blob(path).await?;
                    tracing::info!("✅ Blob found: {:.1} GB", blob.size_gb());
                    blob
                }
                None => {
                    return Err(ConvertError::BlobNotFound {
                        path: manifest_path.unwrap_or_else(|| PathBuf::from(model)),
                    })
                }
            },
        };

        if self.config.verify_digest() {
            tracing::info!("🔐 Verifying blob digest...");
            if verify_digest(&blob).await? {
                tracing::info!("✅ Digest verified");
            }
        }

        Ok(ModelSnapshot {
            model: reference.to_string(),
            blob,
            modelfile,
        })
    }

    async fn transform(&self, snapshot: ModelSnapshot) -> Result<PackagePlan> {
        let weights_size_mb = self.config.weights_size_mb();
        let weights_size_bytes = weights_size_mb.checked_mul(BYTES_PER_MB).ok_or_else(|| {
            ConvertError::InvalidConfigValueError {
                field: "package.weights_size_mb".to_string(),
                value: weights_size_mb.to_string(),
                reason: "Value is too large".to_string(),
            }
        })?;

        let metadata = PackageMetadata::new(
            self.config.metadata_profile(),
            weights_size_mb,
            snapshot.blob.rounded_size_gb(),
        );
        let model_stub = format!("# {} Core ML Model (compressed)\n", self.config.display_name());

        tracing::info!(
            "🔧 Planned {} ({} {}, {} quantization)",
            self.config.package_name(),
            metadata.architecture,
            metadata.parameters,
            metadata.quantization
        );

        Ok(PackagePlan {
            package_name: self.config.package_name().to_string(),
            source_model: snapshot.model,
            blob: snapshot.blob,
            metadata,
            model_stub,
            weights_size_bytes,
            fill_byte: WEIGHTS_FILL_BYTE,
        })
    }

    async fn load(&self, plan: PackagePlan) -> Result<PackageArtifact> {
        let package = plan.package_name.as_str();
        let root = self.storage.root().join(package);

        if self.storage.exists(package).await {
            if !self.config.overwrite() {
                return Err(ConvertError::PackageExists { path: root });
            }
            tracing::warn!("♻️ Replacing existing package {}", root.display());
            self.storage.remove_dir_all(package).await?;

            let stale_archive = archive_file_name(package);
            if self.storage.exists(&stale_archive).await {
                tracing::debug!("Removing previous archive {}", stale_archive);
                self.storage.remove_file(&stale_archive).await?;
            }
        }

        let metadata_json = serde_json::to_string_pretty(&plan.metadata)?;
        self.storage
            .write_file(&format!("{}/{}", package, METADATA_FILE), metadata_json.as_bytes())
            .await?;
        self.storage
            .write_file(&format!("{}/{}", package, MODEL_FILE), plan.model_stub.as_bytes())
            .await?;

        tracing::debug!("Writing {} bytes of placeholder weights", plan.weights_size_bytes);
        self.storage
            .write_filled(
                &format!("{}/{}", package, WEIGHTS_FILE),
                plan.fill_byte,
                plan.weights_size_bytes,
            )
            .await?;

        let bytes_written =
            metadata_json.len() as u64 + plan.model_stub.len() as u64 + plan.weights_size_bytes;

        let archive = if self.config.archive() {
            tracing::info!("🗜️ Archiving package...");
            Some(archive_package(self.storage.root(), package.to_string()).await?)
        } else {
            None
        };

        tracing::info!("✅ Core ML package created: {}", root.display());
        Ok(PackageArtifact {
            files: PACKAGE_FILES.iter().map(|name| root.join(name)).collect(),
            root,
            archive,
            bytes_written,
        })
    }
}
