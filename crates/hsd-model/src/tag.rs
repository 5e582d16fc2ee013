use std::fmt;

use crate::domain::{SCRAPE_MARKER, TAG_NAMESPACE, TAG_SEPARATOR};

/// Scrape intent decoded from a `scrape_<port>_<app>` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrapeTag<'a> {
    /// Port the application exposes metrics on.
    pub port: u16,
    /// Application name; may itself contain `_`.
    pub app: &'a str,
}

/// Outcome of interpreting a single tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagMatch<'a> {
    /// The tag encodes a scrape target.
    Scrape(ScrapeTag<'a>),
    /// The tag is not a (well-formed) scrape tag.
    Skip(SkipReason),
}

/// Why a tag produced no target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Does not start with the scrape marker.
    NotScrape,
    /// No separator between port and application name.
    MissingSeparator,
    /// Port segment is not a decimal `u16`.
    InvalidPort,
    /// Nothing after the separator.
    EmptyApp,
}

impl SkipReason {
    /// Return label value for logs and metrics.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::NotScrape => "not_scrape",
            SkipReason::MissingSeparator => "missing_separator",
            SkipReason::InvalidPort => "invalid_port",
            SkipReason::EmptyApp => "empty_app",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'a> ScrapeTag<'a> {
    /// Interpret a raw tag.
    ///
    /// The optional `tag:` namespace is stripped first, then the `scrape_`
    /// marker. The remainder is split at the first `_`: the left side must be
    /// a decimal port, the right side a non-empty application name.
    ///
    /// # Examples
    /// ```
    /// use hsd_model::{ScrapeTag, SkipReason, TagMatch};
    ///
    /// let tag = ScrapeTag::parse("tag:scrape_9100_node_exporter");
    /// assert_eq!(tag, TagMatch::Scrape(ScrapeTag { port: 9100, app: "node_exporter" }));
    ///
    /// let tag = ScrapeTag::parse("tag:env_prod");
    /// assert_eq!(tag, TagMatch::Skip(SkipReason::NotScrape));
    /// ```
    pub fn parse(raw: &'a str) -> TagMatch<'a> {
        let tag = raw.strip_prefix(TAG_NAMESPACE).unwrap_or(raw);

        let Some(rest) = tag.strip_prefix(SCRAPE_MARKER) else {
            return TagMatch::Skip(SkipReason::NotScrape);
        };
        let Some((port, app)) = rest.split_once(TAG_SEPARATOR) else {
            return TagMatch::Skip(SkipReason::MissingSeparator);
        };
        let Ok(port) = port.parse::<u16>() else {
            return TagMatch::Skip(SkipReason::InvalidPort);
        };
        if app.is_empty() {
            return TagMatch::Skip(SkipReason::EmptyApp);
        }

        TagMatch::Scrape(ScrapeTag { port, app })
    }
}

impl<'a> TagMatch<'a> {
    /// Returns the decoded tag, discarding the skip reason.
    pub fn scrape(self) -> Option<ScrapeTag<'a>> {
        match self {
            TagMatch::Scrape(tag) => Some(tag),
            TagMatch::Skip(_) => None,
        }
    }
}
