//! Glob matching for descriptor tokens
//!
//! Supports wildcards inside a single token:
//! - `*` - Matches any run of characters, including none (e.g. `*.HTML`)
//! - `?` - Matches exactly one character (e.g. `V?`)
//!
//! Matching is anchored to the whole token and case-insensitive. Every other
//! character is literal.

use regex::{Regex, RegexBuilder};

/// Compiled glob pattern for a single descriptor token.
#[derive(Debug, Clone)]
pub struct GlobPattern {
    regex: Regex,
}

impl GlobPattern {
    /// Compile a glob pattern.
    ///
    /// # Examples
    /// ```
    /// use platform_access::pattern::GlobPattern;
    ///
    /// let pattern = GlobPattern::new("*.html").unwrap();
    /// assert!(pattern.is_match("INDEX.HTML"));
    /// assert!(!pattern.is_match("INDEX.HTML.BAK"));
    /// ```
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(&Self::to_regex(pattern))
            .case_insensitive(true)
            .build()?;
        Ok(Self { regex })
    }

    /// Check if a token matches this pattern.
    pub fn is_match(&self, token: &str) -> bool {
        self.regex.is_match(token)
    }

    /// Translate glob syntax into an anchored regular expression.
    fn to_regex(pattern: &str) -> String {
        let mut regex_str = String::with_capacity(pattern.len() + 8);
        regex_str.push('^');

        let mut literal = String::new();
        for c in pattern.chars() {
            match c {
                '*' | '?' => {
                    regex_str.push_str(&regex::escape(&literal));
                    literal.clear();
                    regex_str.push_str(if c == '*' { ".*" } else { "." });
                }
                _ => literal.push(c),
            }
        }
        regex_str.push_str(&regex::escape(&literal));

        regex_str.push('$');
        regex_str
    }
}

/// Check whether `pattern` contains glob syntax.
pub fn is_glob(pattern: &str) -> bool {
    pattern.contains(&['*', '?'][..])
}

/// Match `token` against a glob `pattern`.
///
/// Patterns without glob syntax skip regex compilation and compare
/// case-insensitively. A pattern that fails to compile never matches.
pub fn glob_matches(pattern: &str, token: &str) -> bool {
    if !is_glob(pattern) {
        return pattern.to_uppercase() == token.to_uppercase();
    }

    GlobPattern::new(pattern)
        .map(|p| p.is_match(token))
        .unwrap_or(false)
}
