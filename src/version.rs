// Version information for the PrivAlert Node

/// Full version string with feature description
pub const VERSION: &str = "v0.1.0-pii-analysis-2025-08-22";

/// Semantic version number
pub const VERSION_NUMBER: &str = "0.1.0";

/// Build date
pub const BUILD_DATE: &str = "2025-08-22";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "image-analysis",
    "pii-detection",
    "multipart-upload",
    "hosted-inference",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("PrivAlert Node {} ({})", VERSION_NUMBER, BUILD_DATE)
}
