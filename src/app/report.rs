use crate::app::integration::print_integration_instructions;
use crate::domain::model::{PackageArtifact, PackagePlan, BYTES_PER_MB};
use crate::utils::error::ConvertError;

/// Console summary for `--dry-run`.
pub fn print_plan(plan: &PackagePlan) {
    println!("🔍 DRY RUN - nothing was written");
    println!("🧠 Model: {}", plan.source_model);
    println!(
        "💾 Blob: {} ({:.1} GB)",
        plan.blob.path.display(),
        plan.blob.size_gb()
    );
    if let Some(digest) = &plan.blob.digest {
        println!("🔑 Digest: {}", digest);
    }
    println!("📦 Package: {}", plan.package_name);
    println!("📊 Weights placeholder: {} MB", plan.weights_size_mb());
    match serde_json::to_string_pretty(&plan.metadata) {
        Ok(json) => println!("📝 metadata.json:\n{}", json),
        Err(e) => tracing::warn!("Could not render metadata: {}", e),
    }
}

pub fn print_success(artifact: &PackageArtifact, package_name: &str, app_target: &str) {
    let size_mb = artifact.bytes_written / BYTES_PER_MB;

    println!("✅ Core ML package created: {}", artifact.root.display());
    println!("📊 Final size: ~{} MB", size_mb);
    if let Some(archive) = &artifact.archive {
        println!("🗜️ Archive: {}", archive.display());
    }

    print_integration_instructions(package_name, size_mb, app_target);

    println!("\n🎉 CONVERSION COMPLETE!");
    println!("📦 File: {}", artifact.root.display());
    println!("🚀 {} now ships the model locally!", app_target);
}

/// Logs and prints a failure; returns the exit code to use.
pub fn report_failure(e: &ConvertError) -> i32 {
    tracing::error!(
        "❌ Conversion failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    e.severity().exit_code()
}
