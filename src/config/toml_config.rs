use crate::config::{defaults, validate_settings};
use crate::domain::model::{MetadataProfile, SourceKind};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{ConvertError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub model: ModelSection,
    #[serde(default)]
    pub source: SourceSection,
    #[serde(default)]
    pub package: PackageSection,
    #[serde(default)]
    pub metadata: MetadataProfile,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSection {
    pub name: String,
    pub blob_path: Option<String>,
    pub models_dir: Option<String>,
    pub verify_digest: bool,
}

impl Default for ModelSection {
    fn default() -> Self {
        Self {
            name: defaults::MODEL_NAME.to_string(),
            blob_path: None,
            models_dir: None,
            verify_digest: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSection {
    pub kind: SourceKind,
    pub ollama_bin: String,
    pub host: String,
    pub timeout_seconds: u64,
}

impl Default for SourceSection {
    fn default() -> Self {
        Self {
            kind: SourceKind::Cli,
            ollama_bin: defaults::OLLAMA_BIN.to_string(),
            host: defaults::OLLAMA_HOST.to_string(),
            timeout_seconds: defaults::TIMEOUT_SECONDS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageSection {
    pub output_path: String,
    pub name: String,
    pub display_name: String,
    pub weights_size_mb: u64,
    pub archive: bool,
    pub overwrite: bool,
    pub app_target: String,
}

impl Default for PackageSection {
    fn default() -> Self {
        Self {
            output_path: defaults::OUTPUT_PATH.to_string(),
            name: defaults::PACKAGE_NAME.to_string(),
            display_name: defaults::DISPLAY_NAME.to_string(),
            weights_size_mb: defaults::WEIGHTS_SIZE_MB,
            archive: false,
            overwrite: false,
            app_target: defaults::APP_TARGET.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ConvertError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ConvertError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${HOME})，未定義的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ConvertError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn model_name(&self) -> &str {
        &self.model.name
    }

    fn blob_path(&self) -> Option<&str> {
        self.model.blob_path.as_deref()
    }

    fn models_dir(&self) -> Option<&str> {
        self.model.models_dir.as_deref()
    }

    fn verify_digest(&self) -> bool {
        self.model.verify_digest
    }

    fn source_kind(&self) -> SourceKind {
        self.source.kind
    }

    fn ollama_bin(&self) -> &str {
        &self.source.ollama_bin
    }

    fn ollama_host(&self) -> &str {
        &self.source.host
    }

    fn timeout_seconds(&self) -> u64 {
        self.source.timeout_seconds
    }

    fn output_path(&self) -> &str {
        &self.package.output_path
    }

    fn package_name(&self) -> &str {
        &self.package.name
    }

    fn display_name(&self) -> &str {
        &self.package.display_name
    }

    fn weights_size_mb(&self) -> u64 {
        self.package.weights_size_mb
    }

    fn archive(&self) -> bool {
        self.package.archive
    }

    fn overwrite(&self) -> bool {
        self.package.overwrite
    }

    fn app_target(&self) -> &str {
        &self.package.app_target
    }

    fn metadata_profile(&self) -> &MetadataProfile {
        &self.metadata
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_settings(self)
    }
}
