//! Filename extraction from URL path.

/// Extracts the last path segment from a URL for use as a filename.
/// The segment is percent-decoded; a segment that does not decode to UTF-8 is kept as sent.
///
/// Returns `None` if the URL cannot be parsed or the path is empty/root.
pub fn filename_from_url_path(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let raw = parsed.path_segments()?.filter(|s| !s.is_empty()).last()?;
    let segment = urlencoding::decode(raw)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| raw.to_string());
    if segment.is_empty() || segment == "." || segment == ".." {
        return None;
    }
    Some(segment)
}
