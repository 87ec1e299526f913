//! Excerpt building with highlighted search terms.

use regex::{Regex, RegexBuilder};

use crate::error::{Result, SearchApiError};

/// Configuration for excerpt highlighting.
#[derive(Debug, Clone)]
pub struct ExcerptConfig {
    /// HTML tag to wrap highlighted terms.
    pub tag: String,
    /// CSS class to add to highlight tags.
    pub css_class: Option<String>,
    /// Number of characters kept on each side of the first match.
    pub context_chars: usize,
    /// Marker placed where text was cut.
    pub ellipsis: String,
}

impl Default for ExcerptConfig {
    fn default() -> Self {
        ExcerptConfig {
            tag: "span".to_string(),
            css_class: Some("search-results-item".to_string()),
            context_chars: 100,
            ellipsis: "…".to_string(),
        }
    }
}

impl ExcerptConfig {
    /// Set the HTML tag for highlighting.
    pub fn tag<S: Into<String>>(mut self, tag: S) -> Self {
        self.tag = tag.into();
        self
    }

    /// Set the CSS class for highlight tags.
    pub fn css_class(mut self, css_class: Option<String>) -> Self {
        self.css_class = css_class;
        self
    }

    /// Set how much context to keep around the first match.
    pub fn context_chars(mut self, context_chars: usize) -> Self {
        self.context_chars = context_chars;
        self
    }

    /// Build the opening HTML tag.
    pub fn opening_tag(&self) -> String {
        if let Some(ref css_class) = self.css_class {
            format!("<{} class=\"{}\">", self.tag, css_class)
        } else {
            format!("<{}>", self.tag)
        }
    }

    /// Build the closing HTML tag.
    pub fn closing_tag(&self) -> String {
        format!("</{}>", self.tag)
    }
}

/// Highlights search terms inside text fragments.
#[derive(Debug, Clone)]
pub struct ExcerptBuilder {
    config: ExcerptConfig,
    pattern: Option<Regex>,
}

impl ExcerptBuilder {
    /// Create a builder for a raw search term.
    ///
    /// Quoted runs are kept as phrases; everything else is split on whitespace.
    pub fn new(search_term: &str, config: ExcerptConfig) -> Result<Self> {
        let terms = split_terms(search_term);
        let pattern = if terms.is_empty() {
            None
        } else {
            let alternation = terms
                .iter()
                .map(|term| regex::escape(term))
                .collect::<Vec<_>>()
                .join("|");
            let regex = RegexBuilder::new(&alternation)
                .case_insensitive(true)
                .build()
                .map_err(|e| SearchApiError::other(format!("excerpt pattern: {e}")))?;
            Some(regex)
        };
        Ok(ExcerptBuilder { config, pattern })
    }

    /// Build an excerpt from the first text that contains a match.
    pub fn excerpt<'a, I>(&self, texts: I) -> Option<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let pattern = self.pattern.as_ref()?;
        texts
            .into_iter()
            .find_map(|text| pattern.find(text).map(|m| (text, m.start(), m.end())))
            .map(|(text, start, end)| self.render(pattern, text, start, end))
    }

    fn render(&self, pattern: &Regex, text: &str, start: usize, end: usize) -> String {
        let context = self.config.context_chars;
        let window_start = text[..start]
            .char_indices()
            .rev()
            .take(context)
            .last()
            .map_or(start, |(i, _)| i);
        let window_end = text[end..]
            .char_indices()
            .nth(context)
            .map_or(text.len(), |(i, _)| end + i);
        let window = &text[window_start..window_end];

        let open = self.config.opening_tag();
        let close = self.config.closing_tag();
        let highlighted = pattern.replace_all(window, |caps: &regex::Captures| {
            format!("{open}{}{close}", &caps[0])
        });

        let mut excerpt = String::new();
        if window_start > 0 {
            excerpt.push_str(&self.config.ellipsis);
        }
        excerpt.push_str(&highlighted);
        if window_end < text.len() {
            excerpt.push_str(&self.config.ellipsis);
        }
        excerpt
    }
}

fn split_terms(search_term: &str) -> Vec<String> {
    let mut terms = Vec::new();
    for (i, segment) in search_term.split('"').enumerate() {
        if i % 2 == 1 {
            let phrase = segment.trim();
            if !phrase.is_empty() {
                terms.push(phrase.to_string());
            }
        } else {
            terms.extend(segment.split_whitespace().map(str::to_string));
        }
    }
    // Longest first so phrases win over their own words.
    terms.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    terms.dedup();
    terms
}
