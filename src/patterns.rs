use crate::{Error, Result};
use regex::Regex;
use std::ops::Range;

/// Ordered regex alternatives searched as one.
///
/// The earliest match in the haystack wins; when two alternatives match at the
/// same offset the one listed first wins.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    regex: Option<Regex>,
    sources: Vec<String>,
}

impl PatternSet {
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let sources: Vec<String> = patterns
            .into_iter()
            .map(|p| p.as_ref().to_string())
            .filter(|p| !p.is_empty())
            .collect();

        for source in &sources {
            compile(source)?;
        }

        let regex = match sources.as_slice() {
            [] => None,
            [single] => Some(compile(single)?),
            many => {
                let combined = many
                    .iter()
                    .map(|p| format!("(?:{p})"))
                    .collect::<Vec<_>>()
                    .join("|");
                Some(compile(&combined)?)
            }
        };

        Ok(Self { regex, sources })
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.as_ref().is_some_and(|re| re.is_match(text))
    }

    /// Byte range of the earliest match.
    pub fn find(&self, text: &str) -> Option<Range<usize>> {
        self.regex.as_ref()?.find(text).map(|m| m.range())
    }
}

pub(crate) fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| Error::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}
