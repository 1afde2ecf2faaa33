//! Path pattern matching.
//!
//! # Responsibilities
//! - Compile path patterns (`/quiz/*/play`) into anchored regexes
//! - Match request paths against a pattern (whole path, case-sensitive)
//!
//! # Design Decisions
//! - Literal segments are regex-escaped
//! - `*` matches exactly one non-empty segment, never a `/`
//! - Anchored at both ends: `/dashboard` does not match `/dashboard-public`
//! - Compiled once at startup

use regex::Regex;

/// Trait for matching request paths against conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the path matches this condition.
    fn matches(&self, path: &str) -> bool;
}

/// A single compiled path pattern.
#[derive(Debug, Clone)]
pub struct PathPattern {
    source: String,
    regex: Regex,
}

impl PathPattern {
    /// Compile a pattern. Fails only if the generated regex is rejected.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let body = pattern
            .split('/')
            .map(|segment| {
                if segment == "*" {
                    "[^/]+".to_string()
                } else {
                    regex::escape(segment)
                }
            })
            .collect::<Vec<_>>()
            .join("/");

        Ok(Self {
            source: pattern.to_string(),
            regex: Regex::new(&format!("^{body}$"))?,
        })
    }

    /// The pattern as written in configuration.
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl Matcher for PathPattern {
    fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

/// Matches if any of its patterns match. First match wins.
#[derive(Debug, Clone, Default)]
pub struct AnyMatcher {
    patterns: Vec<PathPattern>,
}

impl AnyMatcher {
    pub fn new(patterns: Vec<PathPattern>) -> Self {
        Self { patterns }
    }

    /// Compile a list of pattern strings, preserving order.
    pub fn compile<I, S>(patterns: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| PathPattern::new(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(patterns))
    }

    /// The first pattern matching `path`, if any.
    pub fn find(&self, path: &str) -> Option<&PathPattern> {
        self.patterns.iter().find(|p| p.matches(path))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl Matcher for AnyMatcher {
    fn matches(&self, path: &str) -> bool {
        self.find(path).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_pattern() {
        let matcher = PathPattern::new("/dashboard").unwrap();

        assert!(matcher.matches("/dashboard"));
        assert!(!matcher.matches("/dashboard-public"));
        assert!(!matcher.matches("/dashboard/"));
        assert!(!matcher.matches("/Dashboard")); // Case sensitive
    }

    #[test]
    fn test_wildcard_matches_one_segment() {
        let matcher = PathPattern::new("/quiz/*/play").unwrap();

        assert!(matcher.matches("/quiz/abc/play"));
        assert!(!matcher.matches("/quiz//play"));
        assert!(!matcher.matches("/quiz/a/b/play"));
        assert!(!matcher.matches("/quiz/abc/results"));
    }

    #[test]
    fn test_literal_segments_are_escaped() {
        let matcher = PathPattern::new("/a.b").unwrap();

        assert!(matcher.matches("/a.b"));
        assert!(!matcher.matches("/axb"));
    }

    #[test]
    fn test_any_matcher_first_match_wins() {
        let matcher = AnyMatcher::compile(["/admin", "/admin/*", "/*"]).unwrap();

        assert_eq!(matcher.find("/admin").map(PathPattern::as_str), Some("/admin"));
        assert_eq!(matcher.find("/admin/users").map(PathPattern::as_str), Some("/admin/*"));
        assert_eq!(matcher.find("/about").map(PathPattern::as_str), Some("/*"));
        assert!(matcher.find("/admin/users/1").is_none());
    }
}
