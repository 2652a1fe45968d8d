use crate::domain::model::{
    MetadataProfile, ModelSnapshot, PackageArtifact, PackagePlan, SourceKind,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;

pub trait Storage: Send + Sync {
    fn root(&self) -> PathBuf;
    fn exists(&self, path: &str) -> impl std::future::Future<Output = bool> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// Writes `len` copies of `byte` without holding the whole file in memory.
    fn write_filled(
        &self,
        path: &str,
        byte: u8,
        len: u64,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn remove_file(&self, path: &str) -> impl std::future::Future<Output = Result<()>> + Send;
    fn remove_dir_all(&self, path: &str) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn model_name(&self) -> &str;
    fn blob_path(&self) -> Option<&str>;
    fn models_dir(&self) -> Option<&str>;
    fn verify_digest(&self) -> bool;
    fn source_kind(&self) -> SourceKind;
    fn ollama_bin(&self) -> &str;
    fn ollama_host(&self) -> &str;
    fn timeout_seconds(&self) -> u64;
    fn output_path(&self) -> &str;
    fn package_name(&self) -> &str;
    fn display_name(&self) -> &str;
    fn weights_size_mb(&self) -> u64;
    fn archive(&self) -> bool;
    fn overwrite(&self) -> bool;
    fn app_target(&self) -> &str;
    fn metadata_profile(&self) -> &MetadataProfile;
}

/// Supplies the Modelfile text for a model.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    async fn fetch_modelfile(&self, model: &str) -> Result<String>;
    fn describe(&self) -> String;
}

#[async_trait]
impl<T: MetadataSource + ?Sized> MetadataSource for Box<T> {
    async fn fetch_modelfile(&self, model: &str) -> Result<String> {
        (**self).fetch_modelfile(model).await
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<ModelSnapshot>;
    async fn transform(&self, snapshot: ModelSnapshot) -> Result<PackagePlan>;
    async fn load(&self, plan: PackagePlan) -> Result<PackageArtifact>;
}
