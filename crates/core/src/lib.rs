#![forbid(unsafe_code)]

pub mod model;
pub mod validate;

pub mod ids {
    /// Derives a URL-safe identifier from a human-readable title.
    ///
    /// ASCII letters are lower-cased and ASCII digits kept; every run of other
    /// characters becomes a single `-`. Leading and trailing separators are
    /// dropped, so the result may be empty for titles with no alphanumerics.
    /// Uniqueness is the caller's concern.
    pub fn slugify(title: &str) -> String {
        let mut out = String::with_capacity(title.len());
        let mut pending_separator = false;
        for ch in title.chars() {
            if ch.is_ascii_alphanumeric() {
                if pending_separator && !out.is_empty() {
                    out.push('-');
                }
                pending_separator = false;
                out.push(ch.to_ascii_lowercase());
            } else {
                pending_separator = true;
            }
        }
        out
    }

}
