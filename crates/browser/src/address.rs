use std::path::{Path, PathBuf};

/// The reserved pseudo-scheme that routes an address to the search fetcher.
pub const SEARCH_SCHEME: &str = "search:";

/// A classified address, built exactly once at the `visit` boundary.
/// Everything downstream dispatches on the variant instead of re-sniffing
/// string prefixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Address {
    /// `search: free text query` — resolved by the search fetcher.
    Search(String),
    /// An absolute HTTP(S) URL.
    Url(String),
    /// A path on the local filesystem.
    Local(PathBuf),
}

impl Address {
    /// Classify a raw address string. Priority: search marker, then local
    /// filesystem path, then URL. No other schemes are recognized; a bare
    /// host falls through to the URL variant with an https scheme attached.
    pub fn parse(raw: &str) -> Address {
        let trimmed = raw.trim();

        if let Some(query) = trimmed.strip_prefix(SEARCH_SCHEME) {
            return Address::Search(query.trim().to_string());
        }

        if let Some(path) = trimmed.strip_prefix("file://") {
            return Address::Local(PathBuf::from(path));
        }

        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            return Address::Url(trimmed.to_string());
        }

        if trimmed.starts_with('/')
            || trimmed.starts_with("./")
            || trimmed.starts_with("../")
            || Path::new(trimmed).exists()
        {
            return Address::Local(PathBuf::from(trimmed));
        }

        Address::Url(format!("https://{}", trimmed))
    }

    pub fn is_search(&self) -> bool {
        matches!(self, Address::Search(_))
    }
}
