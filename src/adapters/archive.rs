use crate::domain::model::PACKAGE_FILES;
use crate::utils::error::{ConvertError, Result};
use std::fs::File;
use std::path::{Path, PathBuf};
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::CompressionMethod;

pub fn archive_file_name(package_name: &str) -> String {
    format!("{}.zip", package_name)
}

/// Zips `<root>/<package_name>` into `<root>/<package_name>.zip`.
pub async fn archive_package(root: PathBuf, package_name: String) -> Result<PathBuf> {
    tokio::task::spawn_blocking(move || write_archive(&root, &package_name))
        .await
        .map_err(|e| ConvertError::ProcessingError {
            message: format!("Archive task failed: {}", e),
        })?
}

fn write_archive(root: &Path, package_name: &str) -> Result<PathBuf> {
    let archive_path = root.join(archive_file_name(&package_name));
    let package_dir = root.join(package_name);

    tracing::debug!(
        "Creating ZIP archive {} with {} files",
        archive_path.display(),
        PACKAGE_FILES.len()
    );

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(File::create(&archive_path)?);

    zip.add_directory(format!("{}/", package_name), options)?;
    for name in PACKAGE_FILES {
        zip.start_file(format!("{}/{}", package_name, name), options)?;
        let mut source = File::open(package_dir.join(name))?;
        std::io::copy(&mut source, &mut zip)?;
    }
    zip.finish()?;

    Ok(archive_path)
}
