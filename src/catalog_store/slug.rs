/// Normalizes a display name into the key used inside the catalog.
///
/// Only spaces are replaced and the result is lowercased, so two names that
/// differ only in case (or in space vs underscore) map to the same slug.
/// Callers rely on that collision: a second ingestion of such a name is
/// treated as the same song.
pub fn slugify(display_name: &str) -> String {
    display_name.replace(' ', "_").to_lowercase()
}
