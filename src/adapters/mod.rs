// Adapters layer: concrete implementations for the outside world (filesystem, ollama, zip).

pub mod archive;
pub mod ollama_api;
pub mod ollama_cli;
pub mod ollama_store;
pub mod storage;

use crate::domain::model::SourceKind;
use crate::domain::ports::{ConfigProvider, MetadataSource};
use crate::utils::error::Result;
use std::time::Duration;

pub fn build_metadata_source<C: ConfigProvider>(config: &C) -> Result<Box<dyn MetadataSource>> {
    let timeout = Duration::from_secs(config.timeout_seconds());
    let source: Box<dyn MetadataSource> = match config.source_kind() {
        SourceKind::Cli => Box::new(ollama_cli::OllamaCli::new(config.ollama_bin(), timeout)),
        SourceKind::Api => Box::new(ollama_api::OllamaApi::new(config.ollama_host(), timeout)?),
    };
    tracing::debug!("Metadata source: {}", source.describe());
    Ok(source)
}
