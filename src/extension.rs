//! File extension extraction for paths and URIs.
//!
//! The extension token always starts with a dot so it can be appended to a
//! stem directly (`format!("{id}{ext}")`). Anything after a `:` in the raw
//! suffix is dropped: photo hosts hand out names like `photo.jpg:large`
//! where the part after the colon is a size hint, not part of the type.
//!
//! ```text
//! photo.jpg                    → ".jpg"
//! http://x/a/photo.JPG?x=1     → ".JPG"   (URI mode: query is not path)
//! file.jpg:large               → ".jpg"
//! noext                        → ""
//! ```

use percent_encoding::percent_decode_str;
use std::borrow::Cow;
use url::Url;

/// Base for resolving relative references in URI mode. Only the resolved
/// path is ever read, so the host is irrelevant.
const PLACEHOLDER_BASE: &str = "http://localhost/";

/// Return the extension of `path_or_uri`, dot included, or an empty string.
///
/// With `is_uri` set, only the path component of the URI is considered:
/// scheme, host, query and fragment are discarded first. A URI that cannot
/// be parsed has no extension.
pub fn extract_extension(path_or_uri: &str, is_uri: bool) -> String {
    let path: Cow<'_, str> = if is_uri {
        match uri_path(path_or_uri) {
            Some(path) => Cow::Owned(path),
            None => return String::new(),
        }
    } else {
        Cow::Borrowed(path_or_uri)
    };

    let ext = raw_extension(&path).split(':').next().unwrap_or_default();
    if ext.is_empty() {
        String::new()
    } else {
        format!(".{ext}")
    }
}

/// Case-insensitive check against a list of bare extensions (`"jpg"`, no dot).
pub fn has_supported_extension(path: &str, supported: &[&str]) -> bool {
    let ext = extract_extension(path, false);
    let Some(bare) = ext.strip_prefix('.') else {
        return false;
    };
    supported.iter().any(|s| s.eq_ignore_ascii_case(bare))
}

/// Decoded path component of an absolute URI or a relative reference.
///
/// `Url` percent-encodes spaces and non-ASCII characters while parsing, so
/// the path is decoded again before the extension is read.
fn uri_path(uri: &str) -> Option<String> {
    let url = match Url::parse(uri) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(PLACEHOLDER_BASE)
            .and_then(|base| base.join(uri))
            .ok()?,
        Err(_) => return None,
    };
    Some(percent_decode_str(url.path()).decode_utf8_lossy().into_owned())
}

/// Text after the last dot of the final path segment.
fn raw_extension(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    let basename = trimmed.rsplit('/').next().unwrap_or(trimmed);
    basename
        .rfind('.')
        .map(|dot| &basename[dot + 1..])
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Plain paths
    // =========================================================================

    #[test]
    fn simple_filename() {
        assert_eq!(extract_extension("photo.jpg", false), ".jpg");
    }

    #[test]
    fn preserves_case() {
        assert_eq!(extract_extension("IMG_0001.JPG", false), ".JPG");
    }

    #[test]
    fn only_last_dot_counts() {
        assert_eq!(extract_extension("archive.tar.gz", false), ".gz");
    }

    #[test]
    fn dot_in_directory_is_ignored() {
        assert_eq!(extract_extension("uploads.v2/photo", false), "");
        assert_eq!(extract_extension("uploads.v2/photo.png", false), ".png");
    }

    #[test]
    fn colon_suffix_is_dropped() {
        assert_eq!(extract_extension("file.jpg:large", false), ".jpg");
        assert_eq!(extract_extension("file.jpg:orig:extra", false), ".jpg");
    }

    #[test]
    fn colon_only_suffix_is_empty() {
        assert_eq!(extract_extension("file.:large", false), "");
    }

    #[test]
    fn no_extension() {
        assert_eq!(extract_extension("noext", false), "");
        assert_eq!(extract_extension("", false), "");
    }

    #[test]
    fn trailing_dot_is_empty() {
        assert_eq!(extract_extension("photo.", false), "");
    }

    #[test]
    fn hidden_file_is_all_extension() {
        assert_eq!(extract_extension(".htaccess", false), ".htaccess");
    }

    #[test]
    fn trailing_slash_uses_last_segment() {
        assert_eq!(extract_extension("albums/holiday.d/", false), ".d");
    }

    #[test]
    fn query_is_literal_without_uri_mode() {
        assert_eq!(extract_extension("photo.jpg?x=1", false), ".jpg?x=1");
    }

    // =========================================================================
    // URIs
    // =========================================================================

    #[test]
    fn uri_drops_query() {
        assert_eq!(
            extract_extension("http://x/a/photo.JPG?x=1", true),
            ".JPG"
        );
    }

    #[test]
    fn uri_drops_fragment() {
        assert_eq!(
            extract_extension("https://cdn.example.com/p/img.webp#top", true),
            ".webp"
        );
    }

    #[test]
    fn uri_host_dot_is_not_an_extension() {
        assert_eq!(extract_extension("https://example.com", true), "");
        assert_eq!(extract_extension("https://example.com/", true), "");
    }

    #[test]
    fn uri_with_size_hint() {
        assert_eq!(
            extract_extension("https://pbs.example.com/media/abc.jpg:large", true),
            ".jpg"
        );
    }

    #[test]
    fn relative_uri_reference() {
        assert_eq!(extract_extension("/uploads/big/1.png?v=3", true), ".png");
        assert_eq!(extract_extension("//cdn.example.com/a.gif", true), ".gif");
    }

    #[test]
    fn uri_extension_is_not_percent_encoded() {
        assert_eq!(extract_extension("http://x/a/photo.jpé", true), ".jpé");
        assert_eq!(extract_extension("http://x/a/photo.JP G?x=1", true), ".JP G");
        assert_eq!(extract_extension("/uploads/été.jpg", true), ".jpg");
    }

    #[test]
    fn uri_escapes_in_input_are_decoded() {
        assert_eq!(extract_extension("http://x/a/photo.jp%C3%A9", true), ".jpé");
        assert_eq!(extract_extension("http://x/a/photo%2Ejpg", true), ".jpg");
    }

    #[test]
    fn unparsable_uri_is_empty() {
        assert_eq!(extract_extension("http://[::1/photo.jpg", true), "");
    }

    // =========================================================================
    // has_supported_extension
    // =========================================================================

    #[test]
    fn supported_extension_case_insensitive() {
        let supported = ["jpg", "png"];
        assert!(has_supported_extension("a/B.JPG", &supported));
        assert!(has_supported_extension("c.png", &supported));
        assert!(!has_supported_extension("d.tiff", &supported));
        assert!(!has_supported_extension("README", &supported));
    }
}
