pub mod defaults;
pub mod toml_config;

use crate::domain::model::SourceKind;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_model_reference, validate_non_empty_string, validate_package_name, validate_path,
    validate_positive_number, validate_range, validate_url,
};

#[cfg(feature = "cli")]
use crate::domain::model::MetadataProfile;
#[cfg(feature = "cli")]
use crate::utils::logger::LogFormat;
#[cfg(feature = "cli")]
use crate::utils::validation::Validate;
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "ollama-coreml")]
#[command(about = "Package a local Ollama model blob as a Core ML .mlpackage bundle")]
pub struct CliConfig {
    /// Ollama model name, e.g. gemma2:2b
    #[arg(long, default_value = defaults::MODEL_NAME)]
    pub model: String,

    /// Use this blob instead of resolving it from the model manifest
    #[arg(long)]
    pub blob_path: Option<String>,

    /// Ollama models directory (defaults to $OLLAMA_MODELS or ~/.ollama/models)
    #[arg(long)]
    pub models_dir: Option<String>,

    #[arg(long, help = "Check the blob's SHA-256 against its file name")]
    pub verify_digest: bool,

    #[arg(long, value_enum, default_value_t = SourceKind::Cli)]
    pub source: SourceKind,

    #[arg(long, default_value = defaults::OLLAMA_BIN)]
    pub ollama_bin: String,

    #[arg(long, default_value = defaults::OLLAMA_HOST)]
    pub ollama_host: String,

    #[arg(long, default_value_t = defaults::TIMEOUT_SECONDS)]
    pub timeout_seconds: u64,

    #[arg(long, default_value = defaults::OUTPUT_PATH)]
    pub output_path: String,

    #[arg(long, default_value = defaults::PACKAGE_NAME)]
    pub package_name: String,

    #[arg(long, default_value = defaults::DISPLAY_NAME)]
    pub display_name: String,

    #[arg(long, default_value_t = defaults::WEIGHTS_SIZE_MB)]
    pub weights_size_mb: u64,

    #[arg(long, help = "Also write <package>.zip next to the package")]
    pub archive: bool,

    #[arg(long, help = "Replace an existing package")]
    pub force: bool,

    #[arg(long, default_value = defaults::APP_TARGET)]
    pub app_target: String,

    #[command(flatten)]
    pub metadata: MetadataProfile,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory after each phase")]
    pub monitor: bool,

    #[arg(long, help = "Resolve and plan without writing anything")]
    pub dry_run: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn model_name(&self) -> &str {
        &self.model
    }

    fn blob_path(&self) -> Option<&str> {
        self.blob_path.as_deref()
    }

    fn models_dir(&self) -> Option<&str> {
        self.models_dir.as_deref()
    }

    fn verify_digest(&self) -> bool {
        self.verify_digest
    }

    fn source_kind(&self) -> SourceKind {
        self.source
    }

    fn ollama_bin(&self) -> &str {
        &self.ollama_bin
    }

    fn ollama_host(&self) -> &str {
        &self.ollama_host
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn package_name(&self) -> &str {
        &self.package_name
    }

    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn weights_size_mb(&self) -> u64 {
        self.weights_size_mb
    }

    fn archive(&self) -> bool {
        self.archive
    }

    fn overwrite(&self) -> bool {
        self.force
    }

    fn app_target(&self) -> &str {
        &self.app_target
    }

    fn metadata_profile(&self) -> &MetadataProfile {
        &self.metadata
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_settings(self)
    }
}

/// Checks shared by every configuration front end.
pub fn validate_settings<C: ConfigProvider>(config: &C) -> Result<()> {
    validate_model_reference("model.name", config.model_name())?;

    if let Some(blob_path) = config.blob_path() {
        validate_path("model.blob_path", blob_path)?;
    }
    if let Some(models_dir) = config.models_dir() {
        validate_path("model.models_dir", models_dir)?;
    }

    match config.source_kind() {
        SourceKind::Cli => validate_non_empty_string("source.ollama_bin", config.ollama_bin())?,
        SourceKind::Api => validate_url("source.host", config.ollama_host())?,
    }
    validate_range(
        "source.timeout_seconds",
        config.timeout_seconds(),
        1,
        defaults::MAX_TIMEOUT_SECONDS,
    )?;

    validate_path("package.output_path", config.output_path())?;
    validate_package_name("package.name", config.package_name())?;
    validate_non_empty_string("package.display_name", config.display_name())?;
    validate_positive_number("package.weights_size_mb", config.weights_size_mb(), 1)?;
    validate_non_empty_string("package.app_target", config.app_target())?;

    let profile = config.metadata_profile();
    validate_non_empty_string("metadata.model_type", &profile.model_type)?;
    validate_non_empty_string("metadata.architecture", &profile.architecture)?;
    validate_non_empty_string("metadata.parameters", &profile.parameters)?;
    validate_non_empty_string("metadata.quantization", &profile.quantization)?;
    validate_non_empty_string("metadata.target_platform", &profile.target_platform)?;

    Ok(())
}
