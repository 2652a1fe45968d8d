use clap::Parser;
use ollama_coreml::adapters::build_metadata_source;
use ollama_coreml::app::report::{print_plan, print_success, report_failure};
use ollama_coreml::utils::{logger, validation::Validate};
use ollama_coreml::{CliConfig, ConversionEngine, LocalStorage, PackagePipeline};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_logger(config.verbose, config.log_format);

    tracing::info!("Starting ollama-coreml");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }
    let dry_run = config.dry_run;
    let package_name = config.package_name.clone();
    let app_target = config.app_target.clone();

    let source = match build_metadata_source(&config) {
        Ok(source) => source,
        Err(e) => std::process::exit(report_failure(&e)),
    };
    let storage = LocalStorage::new(config.output_path.clone());
    let pipeline = PackagePipeline::new(storage, source, config);
    let engine = ConversionEngine::new_with_monitoring(pipeline, monitor_enabled);

    if dry_run {
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
