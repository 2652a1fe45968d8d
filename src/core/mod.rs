pub mod engine;
pub mod pipeline;

pub use crate::domain::model::{ModelSnapshot, PackageArtifact, PackagePlan};
pub use crate::domain::ports::{ConfigProvider, MetadataSource, Pipeline, Storage};
pub use crate::utils::error::Result;
