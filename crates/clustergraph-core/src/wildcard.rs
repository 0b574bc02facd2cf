//! Tag matching with `*` (any run of characters, possibly empty) and `?`
//! (exactly one character). Every other character matches itself. A match
//! always spans the whole candidate.

use regex::Regex;

use crate::{Result, TopologyError};

fn to_regex(pattern: &str) -> String {
    let mut re = String::with_capacity(pattern.len() + 8);
    re.push('^');
    for c in pattern.chars() {
        match c {
            '*' => re.push_str(".*"),
            '?' => re.push('.'),
            other => re.push_str(&regex::escape(other.encode_utf8(&mut [0u8; 4]))),
        }
    }
    re.push('$');
    re
}

pub fn matches(candidate: &str, pattern: &str) -> bool {
    // The translated pattern is fully escaped, so compilation cannot fail
    // short of the size limit.
    Regex::new(&to_regex(pattern))
        .map(|re| re.is_match(candidate))
        .unwrap_or(false)
}

/// An empty pattern list admits everything.
pub fn in_any<S: AsRef<str>>(candidate: &str, patterns: &[S]) -> bool {
    patterns.is_empty() || patterns.iter().any(|p| matches(candidate, p.as_ref()))
}

/// Precompiled form of a pattern list, for filtering many candidates.
#[derive(Debug, Clone, Default)]
pub struct TagFilter {
    patterns: Vec<Regex>,
}

impl TagFilter {
    /// Fails with a configuration error if any pattern cannot be compiled.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| {
                let p = p.as_ref();
                Regex::new(&to_regex(p)).map_err(|e| {
                    TopologyError::Config(format!("tag pattern {:?} is unusable: {}", p, e))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    pub fn admits(&self, candidate: &str) -> bool {
        self.patterns.is_empty() || self.patterns.iter().any(|re| re.is_match(candidate))
    }
}
