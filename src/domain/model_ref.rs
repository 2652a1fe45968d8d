use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_REGISTRY: &str = "registry.ollama.ai";
pub const DEFAULT_NAMESPACE: &str = "library";
pub const DEFAULT_TAG: &str = "latest";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelReferenceError {
    #[error("model name is empty")]
    Empty,
    #[error("model reference has an empty segment")]
    EmptySegment,
    #[error("model tag is empty")]
    EmptyTag,
    #[error("model reference has too many path segments")]
    TooManySegments,
}

/// A model name as Ollama understands it: `[host/][namespace/]name[:tag]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelReference {
    pub registry: String,
    pub namespace: String,
    pub name: String,
    pub tag: String,
}

impl ModelReference {
    pub fn parse(input: &str) -> Result<Self, ModelReferenceError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ModelReferenceError::Empty);
        }

        // 標籤只出現在最後一段，避免把 host:port 誤判為標籤
        let (path, tag) = match input.rsplit_once(':') {
            Some((path, tag)) if !tag.contains('/') => {
                if tag.is_empty() {
                    return Err(ModelReferenceError::EmptyTag);
                }
                (path, tag)
            }
            _ => (input, DEFAULT_TAG),
        };

        let segments: Vec<&str> = path.split('/').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(ModelReferenceError::EmptySegment);
        }

        let (registry, namespace, name) = match segments.as_slice() {
            [name] => (DEFAULT_REGISTRY, DEFAULT_NAMESPACE, *name),
            [namespace, name] => (DEFAULT_REGISTRY, *namespace, *name),
            [registry, namespace, name] => (*registry, *namespace, *name),
            _ => return Err(ModelReferenceError::TooManySegments),
        };

        Ok(Self {
            registry: registry.to_string(),
            namespace: namespace.to_string(),
            name: name.to_string(),
            tag: tag.to_string(),
        })
    }

    /// Manifest location relative to the models directory.
    pub fn manifest_relative_path(&self) -> PathBuf {
        [
            "manifests",
            self.registry.as_str(),
            self.namespace.as_str(),
            self.name.as_str(),
            self.tag.as_str(),
        ]
        .iter()
        .collect()
    }
}

impl fmt::Display for ModelReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.registry != DEFAULT_REGISTRY {
            write!(f, "{}/{}/", self.registry, self.namespace)?;
        } else if self.namespace != DEFAULT_NAMESPACE {
            write!(f, "{}/", self.namespace)?;
        }
        write!(f, "{}:{}", self.name, self.tag)
    }
}
