//! Regex-backed searches over the text of selected elements

use crate::action::{push_unique, ExtractionAction};
use crate::{ConfigError, Result};
use regex::{Regex, RegexBuilder};
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;

/// What a [`SearchAction`] looks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    /// Whole-word occurrences of the term
    Word,

    /// Sentences containing the term as a whole word
    Sentence,

    /// Substrings matching the term as a regular expression
    Pattern,
}

/// A search compiled once and applied to every page
///
/// The text searched is either the text of every element whose tag is in the
/// tag scope, or, with an empty scope, the text of the whole document (the
/// body only, for sentence searches).
#[derive(Debug, Clone)]
pub struct SearchAction {
    kind: SearchKind,
    regex: Regex,
    scope: Option<Selector>,
}

impl SearchAction {
    /// Compiles a search
    ///
    /// # Arguments
    ///
    /// * `kind` - Word, sentence or pattern search
    /// * `term` - The word to find, or a regular expression for [`SearchKind::Pattern`]
    /// * `case_sensitive` - Whether letter case must match
    /// * `tags` - Element names to search inside; empty means the whole document
    ///
    /// # Returns
    ///
    /// * `Ok(SearchAction)` - The compiled search
    /// * `Err(TrawlError)` - The term is empty, the pattern does not compile,
    ///   or a tag name is invalid
    ///
    /// # Example
    ///
    /// ```
    /// use trawl::{ExtractionAction, SearchAction, SearchKind};
    ///
    /// let action = SearchAction::new(SearchKind::Word, "rust", false, Vec::new()).unwrap();
    /// let found = action.extract("<html><body><p>Rust and rust.</p></body></html>");
    /// assert_eq!(found, vec!["Rust".to_string(), "rust".to_string()]);
    /// ```
    pub fn new(
        kind: SearchKind,
        term: &str,
        case_sensitive: bool,
        tags: Vec<String>,
    ) -> Result<Self> {
        if term.is_empty() {
            return Err(ConfigError::Validation("search term cannot be empty".to_string()).into());
        }

        let expression = match kind {
            SearchKind::Word => format!(r"\b{}\b", regex::escape(term)),
            SearchKind::Sentence => sentence_expression(term),
            SearchKind::Pattern => term.to_string(),
        };

        let regex = RegexBuilder::new(&expression)
            .case_insensitive(!case_sensitive)
            .build()?;

        let scope = build_scope(&tags)?;

        Ok(Self { kind, regex, scope })
    }

    /// The kind of search this action runs
    pub fn kind(&self) -> SearchKind {
        self.kind
    }

    fn search_root<'a>(&self, document: &'a Html) -> ElementRef<'a> {
        let root = document.root_element();
        if self.kind != SearchKind::Sentence {
            return root;
        }

        Selector::parse("body")
            .ok()
            .and_then(|body| document.select(&body).next())
            .unwrap_or(root)
    }

    fn scan(&self, text: &str, found: &mut Vec<String>) {
        for hit in self.regex.find_iter(text) {
            if !hit.as_str().is_empty() {
                push_unique(found, hit.as_str());
            }
        }
    }
}

impl ExtractionAction for SearchAction {
    fn extract(&self, content: &str) -> Vec<String> {
        let document = Html::parse_document(content);
        let root = self.search_root(&document);

        let mut found = Vec::new();
        match &self.scope {
            Some(scope) => {
                for element in root.select(scope) {
                    let text: String = element.text().collect();
                    self.scan(&text, &mut found);
                }
            }
            // Text nodes are searched one at a time so adjacent elements never run together
            None => {
                for text in root.text() {
                    self.scan(text, &mut found);
                }
            }
        }
        found
    }
}

/// A sentence opening either at the word itself or at a capital letter before
/// it, running through the word to the first `.`, `!`, `?` or `...`
fn sentence_expression(word: &str) -> String {
    let word = regex::escape(word);
    format!(
        r"(?:\b{word}\b|[A-Z][a-zA-Z0-9, ']*?\b{word}\b)[a-zA-Z0-9, ']*?(?:\.\.\.|[.!?])",
        word = word
    )
}

fn build_scope(tags: &[String]) -> Result<Option<Selector>> {
    let tags: Vec<&str> = tags
        .iter()
        .map(|tag| tag.trim())
        .filter(|tag| !tag.is_empty())
        .collect();

    if tags.is_empty() {
        return Ok(None);
    }

    if let Some(bad) = tags
        .iter()
        .find(|tag| !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'))
    {
        return Err(ConfigError::Validation(format!("invalid tag name '{}'", bad)).into());
    }

    let selector = Selector::parse(&tags.join(", ")).map_err(|e| {
        ConfigError::Validation(format!("invalid tag list '{}': {:?}", tags.join(","), e))
    })?;
    Ok(Some(selector))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TrawlError;

    fn page(body: &str) -> String {
        format!(
            "<html><head><title>Title Rust</title></head><body>{}</body></html>",
            body
        )
    }

    #[test]
    fn test_word_case_insensitive() {
        let action = SearchAction::new(SearchKind::Word, "rust", false, vec![]).unwrap();
        let found = action.extract(&page("<p>Rust is rusty. rust! RUST</p>"));
        assert_eq!(found, vec!["Rust", "rust", "RUST"]);
    }

    #[test]
    fn test_adjacent_elements_do_not_run_together() {
        let action = SearchAction::new(SearchKind::Word, "rust", false, vec![]).unwrap();
        let found = action.extract("<ul><li>Go</li><li>Rust</li></ul><p>see</p><p>rust</p>");
        assert_eq!(found, vec!["Rust", "rust"]);
    }

    #[test]
    fn test_sentence_after_heading() {
        let action = SearchAction::new(SearchKind::Sentence, "Python", true, vec![]).unwrap();
        let found =
            action.extract("<html><body><h1>Intro</h1><p>Python is great.</p></body></html>");
        assert_eq!(found, vec!["Python is great."]);
    }

    #[test]
    fn test_word_case_sensitive() {
        let action = SearchAction::new(SearchKind::Word, "rust", true, vec![]).unwrap();
        let found = action.extract(&page("<p>Rust is rusty. rust! rust</p>"));
        assert_eq!(found, vec!["rust"]);
    }

    #[test]
    fn test_word_is_matched_literally() {
        let action = SearchAction::new(SearchKind::Word, "c.b", true, vec![]).unwrap();
        let found = action.extract(&page("<p>cab c.b</p>"));
        assert_eq!(found, vec!["c.b"]);
    }

    #[test]
    fn test_sentence_search() {
        let action = SearchAction::new(SearchKind::Sentence, "Python", true, vec![]).unwrap();
        let found = action.extract(&page(
            "<p>Python is great. I like Python a lot! Nothing here.</p>",
        ));
        assert_eq!(found, vec!["Python is great.", "I like Python a lot!"]);
    }

    #[test]
    fn test_sentence_with_ellipsis() {
        let action = SearchAction::new(SearchKind::Sentence, "wait", false, vec![]).unwrap();
        let found = action.extract(&page("<p>We wait for it...</p>"));
        assert_eq!(found, vec!["We wait for it..."]);
    }

    #[test]
    fn test_sentence_ignores_head() {
        let action = SearchAction::new(SearchKind::Sentence, "Rust", true, vec![]).unwrap();
        let found = action.extract(&page("<p>No match in here.</p>"));
        assert!(found.is_empty());
    }

    #[test]
    fn test_pattern_search_dedupes() {
        let action = SearchAction::new(SearchKind::Pattern, r"\d{3}", true, vec![]).unwrap();
        assert_eq!(action.kind(), SearchKind::Pattern);
        let found = action.extract(&page("<p>call 555 or 555 or 123</p>"));
        assert_eq!(found, vec!["555", "123"]);
    }

    #[test]
    fn test_tag_scope_limits_search() {
        let action =
            SearchAction::new(SearchKind::Pattern, r"\w+a\b", true, vec!["h1".into()]).unwrap();
        let found = action.extract(&page("<h1>alpha</h1><p>beta</p>"));
        assert_eq!(found, vec!["alpha"]);
    }

    #[test]
    fn test_multiple_tags() {
        let action = SearchAction::new(
            SearchKind::Word,
            "x",
            true,
            vec!["li".into(), "span".into()],
        )
        .unwrap();
        let found = action.extract(&page("<ul><li>x</li></ul><span>x</span><p>x</p>"));
        assert_eq!(found, vec!["x"]);
    }

    #[test]
    fn test_empty_page_yields_nothing() {
        let action = SearchAction::new(SearchKind::Word, "x", true, vec![]).unwrap();
        assert!(action.extract("").is_empty());
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let result = SearchAction::new(SearchKind::Pattern, "(unclosed", true, vec![]);
        assert!(matches!(result, Err(TrawlError::Pattern(_))));
    }

    #[test]
    fn test_empty_term_rejected() {
        let result = SearchAction::new(SearchKind::Word, "", true, vec![]);
        assert!(matches!(result, Err(TrawlError::Config(_))));
    }

    #[test]
    fn test_invalid_tag_rejected() {
        let result = SearchAction::new(SearchKind::Word, "x", true, vec!["p > a".into()]);
        assert!(matches!(result, Err(TrawlError::Config(_))));
    }

    #[test]
    fn test_blank_tags_mean_whole_document() {
        let action = SearchAction::new(SearchKind::Word, "x", true, vec!["".into()]).unwrap();
        assert_eq!(action.extract(&page("<p>x</p>")), vec!["x"]);
    }
}
