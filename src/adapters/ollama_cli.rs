use crate::domain::ports::MetadataSource;
use crate::utils::error::{ConvertError, Result};
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Reads the Modelfile by running `<program> show <model> --modelfile`.
pub struct OllamaCli {
    program: String,
    timeout: Duration,
}

impl OllamaCli {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }
}

#[async_trait]
impl MetadataSource for OllamaCli {
    async fn fetch_modelfile(&self, model: &str) -> Result<String> {
        tracing::debug!("Running: {} show {} --modelfile", self.program, model);

        let mut command = Command::new(&self.program);
        command
            .args(["show", model, "--modelfile"])
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, command.output()).await {
            Ok(result) => result.map_err(|source| ConvertError::ToolSpawnError {
                program: self.program.clone(),
                source,
            })?,
            Err(_) => {
                return Err(ConvertError::ToolTimeout {
                    program: self.program.clone(),
                    seconds: self.timeout.as_secs(),
                })
            }
        };

        if !output.status.success() {
            return Err(ConvertError::ToolFailed {
                program: self.program.clone(),
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let modelfile = String::from_utf8_lossy(&output.stdout).into_owned();
        if modelfile.trim().is_empty() {
            return Err(ConvertError::ProcessingError {
                message: format!("'{}' returned an empty Modelfile for {}", self.program, model),
            });
        }

        tracing::debug!("Modelfile received ({} bytes)", modelfile.len());
        Ok(modelfile)
    }

    fn describe(&self) -> String {
        format!("{} show --modelfile", self.program)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn fake_ollama(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("ollama");
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[tokio::test]
    async fn test_fetch_modelfile_passes_arguments() {
        let temp_dir = TempDir::new().unwrap();
        let program = fake_ollama(temp_dir.path(), r##"echo "FROM $2"; echo "# args: $1 $3""##);
        let cli = OllamaCli::new(program.to_str().unwrap(), Duration::from_secs(5));

        let modelfile = cli.fetch_modelfile("gemma2:2b").await.unwrap();

        assert_eq!(modelfile, "FROM gemma2:2b\n# args: show --modelfile\n");
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_tool_failure() {
        let temp_dir = TempDir::new().unwrap();
        let program = fake_ollama(temp_dir.path(), "echo 'Error: model not found' >&2; exit 1");
        let cli = OllamaCli::new(program.to_str().unwrap(), Duration::from_secs(5));

        match cli.fetch_modelfile("nope:latest").await {
            Err(ConvertError::ToolFailed { status, stderr, .. }) => {
                assert_eq!(status, Some(1));
                assert_eq!(stderr, "Error: model not found");
            }
            other => panic!("expected ToolFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let cli = OllamaCli::new("/definitely/not/ollama", Duration::from_secs(5));
        let result = cli.fetch_modelfile("gemma2:2b").await;
        assert!(matches!(result, Err(ConvertError::ToolSpawnError { .. })));
    }

    #[tokio::test]
    async fn test_slow_program_times_out() {
        let temp_dir = TempDir::new().unwrap();
        let program = fake_ollama(temp_dir.path(), "sleep 5");
        let cli = OllamaCli::new(program.to_str().unwrap(), Duration::from_millis(200));

        let result = cli.fetch_modelfile("gemma2:2b").await;
        assert!(matches!(result, Err(ConvertError::ToolTimeout { .. })));
    }

    #[tokio::test]
    async fn test_empty_output_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let program = fake_ollama(temp_dir.path(), "exit 0");
        let cli = OllamaCli::new(program.to_str().unwrap(), Duration::from_secs(5));

        let result = cli.fetch_modelfile("gemma2:2b").await;
        assert!(matches!(result, Err(ConvertError::ProcessingError { .. })));
    }
}
