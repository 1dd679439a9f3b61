//! Local filename derivation for registry-served files.
//!
//! The registry hands out server-relative paths; the local name is the last
//! path segment, sanitized for Linux filesystems.

mod path;
mod sanitize;

pub use path::filename_from_url_path;
pub use sanitize::sanitize_filename_for_linux;

/// Default filename when the URL path yields nothing usable.
const DEFAULT_FILENAME: &str = "download.bin";

/// Derives a safe local filename for a download URL.
///
/// - `local_file_name("https://epr.elastic.co/epr/apache/apache-1.3.0.zip")` → `"apache-1.3.0.zip"`
pub fn local_file_name(url: &str) -> String {
    let Some(raw) = filename_from_url_path(url) else {
        return DEFAULT_FILENAME.to_string();
    };
    let sanitized = sanitize_filename_for_linux(&raw);
    if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        DEFAULT_FILENAME.to_string()
    } else {
        sanitized
    }
}
