use url::Url;

/// Tidies a user-supplied start address
///
/// Surrounding whitespace is removed. An absolute address is parsed and
/// serialized, which gives an address ending at its host (`https://a.example`,
/// `https://a.example?x=1`) the root path `/`. Anything that does not parse
/// with a host is kept as typed, gaining a trailing `/` when it has no slash
/// at all. An empty input stays empty.
///
/// # Examples
///
/// ```
/// use trawl::url::normalize_start_address;
///
/// assert_eq!(normalize_start_address("https://a.example"), "https://a.example/");
/// assert_eq!(normalize_start_address("https://a.example?x=1"), "https://a.example/?x=1");
/// assert_eq!(normalize_start_address("https://a.example/docs"), "https://a.example/docs");
/// assert_eq!(normalize_start_address(""), "");
/// ```
pub fn normalize_start_address(address: &str) -> String {
    let address = address.trim();
    if address.is_empty() {
        return String::new();
    }

    match Url::parse(address) {
        Ok(url) if url.has_host() => url.into(),
        _ if address.contains('/') => address.to_string(),
        _ => format!("{}/", address),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stays_empty() {
        assert_eq!(normalize_start_address(""), "");
        assert_eq!(normalize_start_address("  "), "");
    }

    #[test]
    fn test_bare_word_gets_slash() {
        assert_eq!(normalize_start_address("sample"), "sample/");
        assert_eq!(normalize_start_address("sample/"), "sample/");
    }

    #[test]
    fn test_host_only_gets_slash() {
        assert_eq!(
            normalize_start_address("https://www.python.org"),
            "https://www.python.org/"
        );
    }

    #[test]
    fn test_query_without_path() {
        assert_eq!(
            normalize_start_address("https://a.example?x=1"),
            "https://a.example/?x=1"
        );
        assert_eq!(
            normalize_start_address("http://127.0.0.1:8080"),
            "http://127.0.0.1:8080/"
        );
    }

    #[test]
    fn test_existing_path_untouched() {
        assert_eq!(
            normalize_start_address("https://a.example/page.html"),
            "https://a.example/page.html"
        );
        assert_eq!(
            normalize_start_address(" https://a.example/ "),
            "https://a.example/"
        );
    }
}
