//! Query tokenization for the lexical channel.

/// Sanitized words of a search query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryTerms {
    terms: Vec<String>,
}

impl QueryTerms {
    /// Split on whitespace, lowercase, and keep only `[a-z0-9]` in each word.
    /// Words left empty are dropped.
    #[must_use]
    pub fn parse(query: &str) -> Self {
        let terms = query
            .split_whitespace()
            .map(sanitize)
            .filter(|term| !term.is_empty())
            .collect();
        Self { terms }
    }

    #[must_use]
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    #[must_use]
    pub fn into_terms(self) -> Vec<String> {
        self.terms
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// OR-joined full-text expression, with `:*` prefix matching on terms of
    /// at least `prefix_min_len` characters. `None` when there are no terms.
    ///
    /// `["grace", "of", "god"]` with a minimum of 4 gives `grace:* | of | god`.
    #[must_use]
    pub fn lexical_expression(&self, prefix_min_len: usize) -> Option<String> {
        if self.terms.is_empty() {
            return None;
        }
        let parts: Vec<String> = self
            .terms
            .iter()
            .map(|term| {
                if term.len() >= prefix_min_len {
                    format!("{term}:*")
                } else {
                    term.clone()
                }
            })
            .collect();
        Some(parts.join(" | "))
    }
}

fn sanitize(word: &str) -> String {
    word.chars()
        .map(|c| c.to_ascii_lowercase())
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}
