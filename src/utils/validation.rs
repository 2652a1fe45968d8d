use crate::domain::model_ref::ModelReference;
use crate::utils::error::{ConvertError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(ConvertError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ConvertError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(ConvertError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ConvertError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(ConvertError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(ConvertError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ConvertError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// Package names are a single directory name ending in `.mlpackage`.
pub fn validate_package_name(field_name: &str, name: &str) -> Result<()> {
    validate_non_empty_string(field_name, name)?;

    let reason = if name.contains('/') || name.contains('\\') {
        Some("Package name must not contain path separators")
    } else if name == ".mlpackage" || !name.ends_with(".mlpackage") {
        Some("Package name must end with .mlpackage")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ConvertError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: name.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

pub fn validate_model_reference(field_name: &str, model: &str) -> Result<()> {
    ModelReference::parse(model)
        .map(|_| ())
        .map_err(|e| ConvertError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: model.to_string(),
            reason: e.to_string(),
        })
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(ConvertError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("source.host", "http://localhost:11434").is_ok());
        assert!(validate_url("source.host", "https://ollama.internal").is_ok());
        assert!(validate_url("source.host", "").is_err());
        assert!(validate_url("source.host", "localhost").is_err());
        assert!(validate_url("source.host", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_package_name() {
        assert!(validate_package_name("package.name", "Gemma2_PARALLAX_Mobile.mlpackage").is_ok());
        assert!(validate_package_name("package.name", "Gemma2.mlmodel").is_err());
        assert!(validate_package_name("package.name", "out/Gemma2.mlpackage").is_err());
        assert!(validate_package_name("package.name", ".mlpackage").is_err());
        assert!(validate_package_name("package.name", "   ").is_err());
    }

    #[test]
    fn test_validate_positive_number_and_range() {
        assert!(validate_positive_number("package.weights_size_mb", 250, 1).is_ok());
        assert!(validate_positive_number("package.weights_size_mb", 0, 1).is_err());
        assert!(validate_range("source.timeout_seconds", 30, 1, 3600).is_ok());
        assert!(validate_range("source.timeout_seconds", 0, 1, 3600).is_err());
    }

    #[test]
    fn test_validate_model_reference() {
        assert!(validate_model_reference("model.name", "gemma2:2b").is_ok());
        assert!(validate_model_reference("model.name", "gemma2:").is_err());
    }
}
