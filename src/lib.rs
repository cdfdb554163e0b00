pub mod advisory;
pub mod analyzer;
pub mod embedding;
pub mod errors;
pub mod extract;
pub mod gap;
pub mod logging;
pub mod normalize;
pub mod rank;

pub const TARGET_ANALYSIS: &str = "analysis";
pub const TARGET_EMBEDDING: &str = "embedding";
pub const TARGET_EXTRACT: &str = "extract";
pub const TARGET_ADVISORY: &str = "advisory";
