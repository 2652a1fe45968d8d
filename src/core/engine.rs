use crate::core::Pipeline;
use crate::domain::model::{PackageArtifact, PackagePlan};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct ConversionEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> ConversionEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    /// Extract and transform only; nothing is written.
    pub async fn plan(&self) -> Result<PackagePlan> {
        tracing::info!("🔍 Locating model...");
        let snapshot = self.pipeline.extract().await?;
        self.monitor.log_stats("Extract");

        let plan = self.pipeline.transform(snapshot).await?;
        self.monitor.log_stats("Transform");
        Ok(plan)
    }

    pub async fn run(&self) -> Result<PackageArtifact> {
        tracing::info!("🚀 Starting Ollama → Core ML packaging");

        let plan = self.plan().await?;

        tracing::info!("📦 Writing package {}...", plan.package_name);
        let artifact = self.pipeline.load(plan).await?;
        self.monitor.log_stats("Load");

        tracing::info!(
            "📊 Package size: ~{} MB",
            artifact.bytes_written / crate::domain::model::BYTES_PER_MB
        );
        self.monitor.log_final_stats();

        Ok(artifact)
    }
}
