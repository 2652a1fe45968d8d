use clap::Parser;
use ollama_coreml::adapters::ollama_cli::OllamaCli;
use ollama_coreml::adapters::ollama_store::{verify_digest, BlobLocator};
use ollama_coreml::app::report::report_failure;
use ollama_coreml::core::MetadataSource;
use ollama_coreml::domain::model_ref::ModelReference;
use ollama_coreml::domain::modelfile::Modelfile;
use ollama_coreml::utils::logger;
use ollama_coreml::{ConvertError, Result};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "inspect-model")]
#[command(about = "Show where an Ollama model's blob lives and what its Modelfile says")]
struct Args {
    /// Ollama model name
    #[arg(default_value = "gemma2:2b")]
    model: String,

    #[arg(long)]
    models_dir: Option<String>,

    /// Hash the blob and compare with its digest
    #[arg(long)]
    verify: bool,

    /// Skip running `ollama show`
    #[arg(long)]
    no_modelfile: bool,

    #[arg(long, default_value = "ollama")]
    ollama_bin: String,

    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    if let Err(e) = inspect(&args).await {
        std::process::exit(report_failure(&e));
    }
}

async fn inspect(args: &Args) -> Result<()> {
    let reference = ModelReference::parse(&args.model).map_err(|e| {
        ConvertError::InvalidConfigValueError {
            field: "model".to_string(),
            value: args.model.clone(),
            reason: e.to_string(),
        }
    })?;

    let locator = BlobLocator::from_config(args.models_dir.as_deref()).ok_or_else(|| {
        ConvertError::MissingConfigError {
            field: "models_dir".to_string(),
        }
    })?;

    println!("🧠 Model: {}", reference);
    println!("📁 Models dir: {}", locator.models_dir().display());
    println!("📄 Manifest: {}", locator.manifest_path(&reference).display());

    let blob = locator
        .resolve(&reference)
        .await?
        .ok_or_else(|| ConvertError::BlobNotFound {
            path: locator.manifest_path(&reference),
        })?;

    println!("💾 Blob: {}", blob.path.display());
    println!("📊 Size: {:.1} GB ({} bytes)", blob.size_gb(), blob.size_bytes);
    if let Some(digest) = &blob.digest {
        println!("🔑 Digest: {}", digest);
    }

    if args.verify && verify_digest(&blob).await? {
        println!("✅ Digest verified");
    }

    if !args.no_modelfile {
        let cli = OllamaCli::new(args.ollama_bin.clone(), Duration::from_secs(30));
        let modelfile = Modelfile::parse(&cli.fetch_modelfile(&args.model).await?);

        println!("\n📝 Modelfile:");
        if let Some(from) = &modelfile.from {
            println!("  FROM {}", from);
        }
        for (key, value) in &modelfile.parameters {
            println!("  PARAMETER {} {}", key, value);
        }
        println!("  TEMPLATE: {}", if modelfile.template.is_some() { "yes" } else { "no" });
        println!("  SYSTEM: {}", if modelfile.system.is_some() { "yes" } else { "no" });
        println!("  LICENSE blocks: {}", modelfile.license.len());
    }

    Ok(())
}
