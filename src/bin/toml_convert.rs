use clap::Parser;
use ollama_coreml::adapters::build_metadata_source;
use ollama_coreml::app::report::{print_plan, print_success, report_failure};
use ollama_coreml::core::ConfigProvider;
use ollama_coreml::utils::logger::{self, LogFormat};
use ollama_coreml::utils::validation::Validate;
use ollama_coreml::{ConversionEngine, LocalStorage, PackagePipeline, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-convert")]
#[command(about = "Package an Ollama model as a Core ML bundle using a TOML configuration")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "convert.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Replace an existing package
    #[arg(long)]
    force: bool,

    /// Resolve and plan without writing anything
    #[arg(long)]
    dry_run: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    logger::init_logger(args.verbose, args.log_format);

    tracing::info!("🚀 Starting TOML-based conversion");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 應用命令列覆蓋設定
    if args.force {
        config.package.overwrite = true;
        tracing::info!("🔧 Overwrite enabled from command line");
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_config_summary(&config);

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }
    let package_name = config.package_name().to_string();
    let app_target = config.app_target().to_string();

    let source = match build_metadata_source(&config) {
        Ok(source) => source,
        Err(e) => std::process::exit(report_failure(&e)),
    };
    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = PackagePipeline::new(storage, source, config);
    let engine = ConversionEngine::new_with_monitoring(pipeline, monitor_enabled);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No files will be written");
        match engine.plan().await {
            Ok(plan) => print_plan(&plan),
            Err(e) => std::process::exit(report_failure(&e)),
        }
        return Ok(());
    }

    match engine.run().await {
        Ok(artifact) => print_success(&artifact, &package_name, &app_target),
        Err(e) => {
            let exit_code = report_failure(&e);
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig) {
    tracing::info!("📋 Configuration Summary:");
    tracing::info!("  🧠 Model: {}", config.model_name());
    match config.blob_path() {
        Some(path) => tracing::info!("  💾 Blob: {}", path),
        None => tracing::info!("  💾 Blob: resolved from manifest"),
    }
    tracing::info!("  📡 Metadata source: {:?}", config.source_kind());
    tracing::info!(
        "  📦 Package: {}/{}",
        config.output_path(),
        config.package_name()
    );
    tracing::info!("  📊 Weights placeholder: {} MB", config.weights_size_mb());
    if config.archive() {
        tracing::info!("  🗜️ Archive: enabled");
    }
}
