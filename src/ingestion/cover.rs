const COVER_SIZE_MARKER: &str = "w544-h544";
const COVER_SIZE_PARAMS: &str = "=w544-h544-l90-rj";

/// Rewrites a provider thumbnail URL to the 544x544 variant.
///
/// URLs already asking for that size are kept as they are; otherwise the
/// size parameters (everything from the first `=`) are replaced.
pub fn normalize_cover_url(url: &str) -> String {
    if url.contains(COVER_SIZE_MARKER) {
        return url.to_string();
    }
    let base = url.split('=').next().unwrap_or(url);
    format!("{}{}", base, COVER_SIZE_PARAMS)
}
