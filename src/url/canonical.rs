use url::Url;

/// Resolves an anchor reference found on `source_address` to an absolute address
///
/// # Resolution Rules
///
/// 1. Empty references and anchor-only references (`#...`) are rejected
/// 2. `//host/path` is scheme-relative and becomes `http://host/path`
/// 3. `/path` is root-relative and is appended to the scheme and host of
///    `source_address`
/// 4. Anything else is taken as already absolute
/// 5. A trailing `#fragment` is stripped
/// 6. The result must be an absolute `http` or `https` address with a host,
///    otherwise the reference is rejected
///
/// The function is pure, and applying it to its own output returns the same
/// address.
///
/// # Arguments
///
/// * `reference` - The raw `href` value
/// * `source_address` - The address of the page the anchor was found on
///
/// # Returns
///
/// * `Some(String)` - The canonical address
/// * `None` - The reference cannot be followed
///
/// # Examples
///
/// ```
/// use trawl::url::canonicalize_link;
///
/// let link = canonicalize_link("/r#frag", "https://a.example/p/q");
/// assert_eq!(link.as_deref(), Some("https://a.example/r"));
///
/// let link = canonicalize_link("//cdn.example/x", "https://a.example/p/");
/// assert_eq!(link.as_deref(), Some("http://cdn.example/x"));
///
/// assert_eq!(canonicalize_link("#top", "https://a.example/"), None);
/// ```
pub fn canonicalize_link(reference: &str, source_address: &str) -> Option<String> {
    let reference = reference.trim();

    if reference.is_empty() || reference.starts_with('#') {
        return None;
    }

    let absolute = if reference.starts_with("//") {
        format!("http:{}", reference)
    } else if reference.starts_with('/') {
        format!("{}{}", site_root(source_address)?, reference)
    } else {
        reference.to_string()
    };

    let canonical = strip_fragment(&absolute);
    if is_fetchable(canonical) {
        Some(canonical.to_string())
    } else {
        None
    }
}

/// Returns the scheme and host part of an address, without any path
///
/// `https://a.example:8080/p/q` yields `https://a.example:8080`, and so does
/// `https://a.example:8080` with no path at all.
fn site_root(address: &str) -> Option<&str> {
    let host_start = address.find("://")? + 3;
    let host_end = address[host_start..]
        .find(&['/', '?', '#'][..])
        .map_or(address.len(), |offset| host_start + offset);

    if host_end == host_start {
        return None;
    }
    Some(&address[..host_end])
}

fn strip_fragment(address: &str) -> &str {
    address
        .split_once('#')
        .map_or(address, |(without_fragment, _)| without_fragment)
}

fn is_fetchable(address: &str) -> bool {
    match Url::parse(address) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host().is_some(),
        Err(_) => false,
    }
}
