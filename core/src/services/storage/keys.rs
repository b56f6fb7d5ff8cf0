use std::path::Path;

use uuid::Uuid;

/// Unique object key keeping the extension of `original_name`
///
/// `photo.JPG` becomes `<uuid v4>.JPG`; names without a plain alphanumeric
/// extension get a bare uuid.
pub fn generate_object_key(original_name: &str) -> String {
    let extension = Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()));

    match extension {
        Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
        None => Uuid::new_v4().to_string(),
    }
}

/// Storage key of a public object URL: its final path segment
///
/// Returns `None` for anything that is not an absolute http(s) URL with a
/// non-empty last segment.
pub fn object_key_from_url(url: &str) -> Option<&str> {
    let rest = url
        .trim()
        .strip_prefix("https://")
        .or_else(|| url.trim().strip_prefix("http://"))?;
    let rest = rest.split(['?', '#']).next().unwrap_or(rest);
    let (_host, path) = rest.split_once('/')?;

    path.rsplit('/').next().filter(|segment| !segment.is_empty())
}
