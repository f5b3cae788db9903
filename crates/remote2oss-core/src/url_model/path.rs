//! Local basename and storage key extraction from a parsed URL.

use super::sanitize::sanitize_segment;
use crate::error::UrlError;
use percent_encoding::percent_decode_str;
use url::Url;

/// Percent-decoded path component of `url` (query and fragment excluded).
pub fn decoded_path(url: &Url) -> String {
    percent_decode_str(url.path())
        .decode_utf8_lossy()
        .into_owned()
}

/// Last element of a `/`-separated path after stripping trailing slashes.
///
/// Returns `""` for an empty or root path.
pub fn path_basename(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or("")
}

/// Sanitized basename of the URL path, used as the local cache filename.
///
/// Rejects an empty/root path and basenames that collapse to `.` or `..`.
pub fn local_basename(url: &Url) -> Result<String, UrlError> {
    let path = decoded_path(url);
    reject_traversal(url, &path)?;
    let name = sanitize_segment(path_basename(&path));
    if name.is_empty() || name == "." || name == ".." {
        return Err(UrlError::EmptyBasename(url.to_string()));
    }
    Ok(name)
}

/// Storage key: host (plus non-default port) joined with the sanitized full path.
///
/// Empty and `.` segments are dropped, so repeated and trailing slashes never
/// reach the key. A port equal to the scheme default is dropped even when
/// written out, so `http://h:80/a` and `http://h/a` share one key.
pub fn storage_key(url: &Url) -> Result<String, UrlError> {
    let host = url
        .host_str()
        .ok_or_else(|| UrlError::MissingHost(url.to_string()))?;
    let path = decoded_path(url);
    reject_traversal(url, &path)?;

    let mut key = match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };
    for segment in sanitize_segment(&path)
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
    {
        key.push('/');
        key.push_str(segment);
    }
    Ok(key)
}

fn reject_traversal(url: &Url, decoded: &str) -> Result<(), UrlError> {
    if decoded.split('/').any(|segment| segment == "..") {
        return Err(UrlError::Traversal(url.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn basename_of_paths() {
        assert_eq!(path_basename("/a/b/file.deb"), "file.deb");
        assert_eq!(path_basename("/a/b/"), "b");
        assert_eq!(path_basename("single"), "single");
        assert_eq!(path_basename("/"), "");
        assert_eq!(path_basename(""), "");
    }

    #[test]
    fn decodes_percent_escapes() {
        let url = parse("http://cdn.example.com/Assets/My%20File.PNG");
        assert_eq!(decoded_path(&url), "/Assets/My File.PNG");
    }

    #[test]
    fn local_basename_ignores_query() {
        let url = parse("https://example.com/dl/Report.PDF?token=abc#frag");
        assert_eq!(local_basename(&url).unwrap(), "report.pdf");
    }

    #[test]
    fn local_basename_rejects_root() {
        for s in ["https://example.com/", "https://example.com", "https://example.com//"] {
            assert!(matches!(
                local_basename(&parse(s)),
                Err(UrlError::EmptyBasename(_))
            ));
        }
    }

    #[test]
    fn encoded_traversal_rejected() {
        let url = parse("http://example.com/a/%2e%2e%2fsecret");
        assert!(matches!(local_basename(&url), Err(UrlError::Traversal(_))));
        assert!(matches!(storage_key(&url), Err(UrlError::Traversal(_))));
    }

    #[test]
    fn storage_key_keeps_structure() {
        let url = parse("http://cdn.example.com/Assets/My%20File.PNG");
        assert_eq!(storage_key(&url).unwrap(), "cdn.example.com/assets/my_file.png");
    }

    #[test]
    fn storage_key_collapses_slashes() {
        let url = parse("https://example.com//a///b/c.txt/");
        assert_eq!(storage_key(&url).unwrap(), "example.com/a/b/c.txt");
    }

    #[test]
    fn storage_key_includes_explicit_port() {
        let url = parse("http://127.0.0.1:8080/x.bin");
        assert_eq!(storage_key(&url).unwrap(), "127.0.0.1:8080/x.bin");
        let default_port = parse("https://example.com:443/x.bin");
        assert_eq!(storage_key(&default_port).unwrap(), "example.com/x.bin");
        let default_http = parse("http://example.com:80/a.png");
        assert_eq!(storage_key(&default_http).unwrap(), "example.com/a.png");
        assert_eq!(
            storage_key(&default_http).unwrap(),
            storage_key(&parse("http://example.com/a.png")).unwrap()
        );
    }
}
