#![cfg(unix)]

use anyhow::Result;
use clap::Parser;
use ollama_coreml::adapters::build_metadata_source;
use ollama_coreml::utils::validation::Validate;
use ollama_coreml::{CliConfig, ConversionEngine, ConvertError, LocalStorage, PackagePipeline};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio_test::{assert_err, assert_ok};

const BLOB_NAME: &str = "sha256-7462734796d67c40ecec2ca98eddf970e171dbb6b370e43fd633ee75b69abe1b";
const PACKAGE: &str = "Gemma2_PARALLAX_Mobile.mlpackage";

fn fake_ollama(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("ollama");
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn working_ollama(dir: &Path) -> PathBuf {
    fake_ollama(
        dir,
        r##"if [ "$1" = "show" ] && [ "$3" = "--modelfile" ]; then
  echo "# Modelfile generated by \"ollama show\""
  echo "FROM $2"
  echo "PARAMETER stop <end_of_turn>"
  exit 0
fi
echo "unexpected arguments: $*" >&2
exit 2"##,
    )
}

fn cli_config(args: &[&str]) -> CliConfig {
    let mut argv = vec!["ollama-coreml"];
    argv.extend_from_slice(args);
    CliConfig::parse_from(argv)
}

async fn run(config: CliConfig) -> std::result::Result<ollama_coreml::core::PackageArtifact, ConvertError> {
    let source = build_metadata_source(&config)?;
    let storage = LocalStorage::new(config.output_path.clone());
    let pipeline = PackagePipeline::new(storage, source, config);
    ConversionEngine::new(pipeline).run().await
}

fn sorted_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_end_to_end_conversion_writes_three_files() -> Result<()> {
    let work = TempDir::new()?;
    let output = TempDir::new()?;
    let blob = work.path().join(BLOB_NAME);
    std::fs::write(&blob, vec![1u8; 4096])?;
    let ollama = working_ollama(work.path());

    let config = cli_config(&[
        "--blob-path",
        blob.to_str().unwrap(),
        "--ollama-bin",
        ollama.to_str().unwrap(),
        "--output-path",
        output.path().to_str().unwrap(),
        "--weights-size-mb",
        "2",
    ]);
    assert_ok!(config.validate());

    let artifact = run(config).await?;

    let package_dir = output.path().join(PACKAGE);
    assert_eq!(artifact.root, package_dir);
    assert_eq!(
        sorted_entries(&package_dir),
        vec!["metadata.json", "model.mlmodel", "weights.bin"]
    );
    // 輸出目錄只包含套件本身
    assert_eq!(sorted_entries(output.path()), vec![PACKAGE]);

    let stub = std::fs::read_to_string(package_dir.join("model.mlmodel"))?;
    assert_eq!(stub, "# Gemma2:2B Core ML Model (compressed)\n");

    let weights = std::fs::read(package_dir.join("weights.bin"))?;
    assert_eq!(weights.len(), 2 * 1024 * 1024);
    assert!(weights.iter().all(|b| *b == b'0'));

    let metadata = std::fs::read_to_string(package_dir.join("metadata.json"))?;
    assert_eq!(
        metadata,
        r#"{
  "model_type": "text_generation",
  "architecture": "gemma2",
  "parameters": "2B",
  "quantization": "int8",
  "target_platform": "ios_neural_engine",
  "compressed_size_mb": 2,
  "original_size_gb": 0.0
}"#
    );

    Ok(())
}

#[tokio::test]
async fn test_missing_blob_creates_no_output() -> Result<()> {
    let work = TempDir::new()?;
    let output = TempDir::new()?;
    // ollama 若被呼叫會留下標記檔
    let marker = work.path().join("called");
    let ollama = fake_ollama(work.path(), &format!("touch {}\necho FROM x", marker.display()));

    let config = cli_config(&[
        "--blob-path",
        work.path().join("sha256-missing").to_str().unwrap(),
        "--ollama-bin",
        ollama.to_str().unwrap(),
        "--output-path",
        output.path().to_str().unwrap(),
    ]);

    let result = run(config).await;

    assert!(matches!(result, Err(ConvertError::BlobNotFound { .. })));
    assert!(!marker.exists());
    assert!(sorted_entries(output.path()).is_empty());
    Ok(())
}

#[tokio::test]
async fn test_tool_failure_creates_no_output() -> Result<()> {
    let work = TempDir::new()?;
    let output = TempDir::new()?;
    let blob = work.path().join(BLOB_NAME);
    std::fs::write(&blob, b"blob")?;
    let ollama = fake_ollama(work.path(), "echo 'Error: could not connect to ollama app' >&2\nexit 1");

    let config = cli_config(&[
        "--blob-path",
        blob.to_str().unwrap(),
        "--ollama-bin",
        ollama.to_str().unwrap(),
        "--output-path",
        output.path().to_str().unwrap(),
    ]);

    let result = run(config).await;

    let err = assert_err!(result);
    assert!(matches!(err, ConvertError::ToolFailed { status: Some(1), .. }));
    assert!(err.user_friendly_message().contains("could not connect"));
    assert!(sorted_entries(output.path()).is_empty());
    Ok(())
}

#[tokio::test]
async fn test_second_run_requires_force() -> Result<()> {
    let work = TempDir::new()?;
    let output = TempDir::new()?;
    let blob = work.path().join(BLOB_NAME);
    std::fs::write(&blob, b"blob")?;
    let ollama = working_ollama(work.path());

    let base_args = [
        "--blob-path",
        blob.to_str().unwrap(),
        "--ollama-bin",
        ollama.to_str().unwrap(),
        "--output-path",
        output.path().to_str().unwrap(),
        "--weights-size-mb",
        "1",
    ];

    assert_ok!(run(cli_config(&base_args)).await);

    let second = run(cli_config(&base_args)).await;
    assert!(matches!(second, Err(ConvertError::PackageExists { .. })));

    let mut forced = base_args.to_vec();
    forced.push("--force");
    let artifact = run(cli_config(&forced)).await?;
    assert_eq!(sorted_entries(&artifact.root).len(), 3);
    Ok(())
}

#[tokio::test]
async fn test_dry_run_plan_writes_nothing() -> Result<()> {
    let work = TempDir::new()?;
    let output = TempDir::new()?;
    let blob = work.path().join(BLOB_NAME);
    std::fs::write(&blob, b"blob")?;
    let ollama = working_ollama(work.path());

    let config = cli_config(&[
        "--blob-path",
        blob.to_str().unwrap(),
        "--ollama-bin",
        ollama.to_str().unwrap(),
        "--output-path",
        output.path().to_str().unwrap(),
        "--display-name",
        "Gemma2 Mobile",
    ]);
    let source = build_metadata_source(&config)?;
    let storage = LocalStorage::new(config.output_path.clone());
    let engine = ConversionEngine::new(PackagePipeline::new(storage, source, config));

    let plan = engine.plan().await?;

    assert_eq!(plan.package_name, PACKAGE);
    assert_eq!(plan.source_model, "gemma2:2b");
    assert_eq!(plan.model_stub, "# Gemma2 Mobile Core ML Model (compressed)\n");
    assert_eq!(plan.weights_size_mb(), 250);
    assert!(sorted_entries(output.path()).is_empty());
    Ok(())
}
