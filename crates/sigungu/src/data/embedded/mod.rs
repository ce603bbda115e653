use once_cell::sync::Lazy;
use sigungu_data_processing::IndexMetadata;

// Generated by build.rs from the shipped corpus
pub const EMBEDDED_CORPUS: &str = include_str!(concat!(env!("OUT_DIR"), "/korea_districts.json"));
pub const EMBEDDED_INDEX: &str =
    include_str!(concat!(env!("OUT_DIR"), "/korea_districts_index.json"));
pub const EMBEDDED_COORDS: &str =
    include_str!(concat!(env!("OUT_DIR"), "/korea_districts_with_coords.json"));
const EMBEDDED_METADATA: &str = include_str!(concat!(env!("OUT_DIR"), "/metadata.json"));

/// Metadata of the compiled-in index. `None` only if the build wrote an
/// unreadable file.
pub static METADATA: Lazy<Option<IndexMetadata>> =
    Lazy::new(|| serde_json::from_str(EMBEDDED_METADATA).ok());
