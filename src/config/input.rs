//! Hand-entered text formats for filters and tag lists

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

fn attribute_line() -> &'static Regex {
    static LINE: OnceLock<Regex> = OnceLock::new();
    LINE.get_or_init(|| {
        Regex::new(r"^([A-Za-z0-9_-]+):([A-Za-z0-9_ -]+(?:,[A-Za-z0-9_ -]+)*)$")
            .expect("attribute line expression is valid")
    })
}

/// Splits a comma separated list, keeping empty items
///
/// An empty string yields an empty list.
///
/// ```
/// use trawl::config::split_comma_list;
///
/// assert!(split_comma_list("").is_empty());
/// assert_eq!(split_comma_list("div,h1,"), vec!["div", "h1", ""]);
/// ```
pub fn split_comma_list(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split(',').map(str::to_string).collect()
}

/// Parses `name:value,value` lines into an attribute filter map
///
/// Lines that do not have that shape are skipped. A later line for the same
/// attribute replaces the earlier one.
///
/// ```
/// use trawl::config::parse_attribute_filter;
///
/// let filter = parse_attribute_filter("href:foo,bar\nid:foo");
/// assert_eq!(filter["href"], vec!["foo", "bar"]);
/// assert_eq!(filter["id"], vec!["foo"]);
/// ```
pub fn parse_attribute_filter(text: &str) -> BTreeMap<String, Vec<String>> {
    let mut filter = BTreeMap::new();
    for line in text.lines() {
        if let Some(captures) = attribute_line().captures(line) {
            filter.insert(captures[1].to_string(), split_comma_list(&captures[2]));
        }
    }
    filter
}
