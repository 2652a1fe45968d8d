pub const MODEL_NAME: &str = "gemma2:2b";
pub const OLLAMA_BIN: &str = "ollama";
pub const OLLAMA_HOST: &str = crate::adapters::ollama_api::DEFAULT_OLLAMA_HOST;
pub const TIMEOUT_SECONDS: u64 = 30;
pub const MAX_TIMEOUT_SECONDS: u64 = 3600;
pub const OUTPUT_PATH: &str = ".";
pub const PACKAGE_NAME: &str = "Gemma2_PARALLAX_Mobile.mlpackage";
pub const DISPLAY_NAME: &str = "Gemma2:2B";
pub const WEIGHTS_SIZE_MB: u64 = 250;
pub const APP_TARGET: &str = "PARALLAX";
