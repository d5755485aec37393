//! Wildcard translation - Lucene wildcards to LIKE patterns
//!
//! Lucene uses:
//! - `?` - matches exactly one character
//! - `*` - matches any sequence of characters (including empty)
//!
//! LIKE dialects spell these with their own characters (`_` and `%` in SQL).

use crate::config::LikeDialect;

/// A LIKE pattern built from an unquoted query term
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LikePattern {
    pattern: String,
}

impl LikePattern {
    /// Check if the term has any Lucene wildcards
    pub fn has_wildcards(term: &str) -> bool {
        term.contains('*') || term.contains('?')
    }

    /// Build the pattern for an unquoted term
    ///
    /// Terms with wildcards are translated position by position. Terms
    /// without wildcards become a substring match.
    pub fn from_term(term: &str, dialect: &LikeDialect) -> Self {
        let pattern = if Self::has_wildcards(term) {
            term.chars()
                .map(|ch| match ch {
                    '*' => dialect.multi_char,
                    '?' => dialect.single_char,
                    other => other,
                })
                .collect()
        } else {
            let mut wrapped = String::with_capacity(term.len() + 2);
            wrapped.push(dialect.multi_char);
            wrapped.push_str(term);
            wrapped.push(dialect.multi_char);
            wrapped
        };

        Self { pattern }
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    pub fn into_string(self) -> String {
        self.pattern
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_sql() {
        let dialect = LikeDialect::default();
        let cases = [("foo", "%foo%"), ("te?t", "te_t"), ("te*t", "te%t"), ("*man", "%man")];
        for (term, expected) in cases {
            assert_eq!(LikePattern::from_term(term, &dialect).as_str(), expected);
        }
    }

    #[test]
    fn test_like_pattern_custom_dialect() {
        let dialect = LikeDialect {
            single_char: '.',
            multi_char: '~',
        };
        assert_eq!(LikePattern::from_term("a?b*", &dialect).as_str(), "a.b~");
        assert_eq!(LikePattern::from_term("ab", &dialect).into_string(), "~ab~");
    }

    #[test]
    fn test_has_wildcards() {
        assert!(LikePattern::has_wildcards("prog*"));
        assert!(LikePattern::has_wildcards("r?st"));
        assert!(!LikePattern::has_wildcards("rust"));
    }
}
