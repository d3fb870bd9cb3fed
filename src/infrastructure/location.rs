//! The address bar, as far as the search core is concerned.
//!
//! [`Location`] holds the path, query and fragment of the current page URL.
//! [`Location::replace_query`] models a history *replace*: the entry is
//! rewritten in place and no back/forward stop is added.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    path: String,
    query: String,
    fragment: String,
    replacements: usize,
}

impl Location {
    /// Splits a URL or path into path, query and fragment.
    ///
    /// Scheme and host, if present, are dropped.
    ///
    /// ```rust
    /// use musician_search::infrastructure::Location;
    ///
    /// let location = Location::parse("https://example.com/musicos?q=samba#top");
    /// assert_eq!(location.path(), "/musicos");
    /// assert_eq!(location.query(), "q=samba");
    /// assert_eq!(location.href(), "/musicos?q=samba#top");
    /// ```
    #[must_use]
    pub fn parse(url: &str) -> Self {
        let without_origin = url
            .split_once("://")
            .map_or(url, |(_, rest)| rest.find(['/', '?', '#']).map_or("", |at| &rest[at..]));

        let (rest, fragment) = without_origin
            .split_once('#')
            .unwrap_or((without_origin, ""));
        let (path, query) = rest.split_once('?').unwrap_or((rest, ""));

        Self {
            path: if path.is_empty() { "/" } else { path }.to_string(),
            query: query.to_string(),
            fragment: fragment.to_string(),
            replacements: 0,
        }
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Query string without the leading `?`.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Number of history replacements performed so far.
    #[must_use]
    pub const fn replacements(&self) -> usize {
        self.replacements
    }

    /// Rewrites the query in place, keeping path and fragment.
    pub fn replace_query(&mut self, query: &str) {
        self.query = query.strip_prefix('?').unwrap_or(query).to_string();
        self.replacements += 1;
    }

    /// Path, query and fragment joined back together. Empty parts are omitted.
    #[must_use]
    pub fn href(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        if !self.query.is_empty() {
            write!(f, "?{}", self.query)?;
        }
        if !self.fragment.is_empty() {
            write!(f, "#{}", self.fragment)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_paths() {
        let location = Location::parse("/musicos");
        assert_eq!(location.path(), "/musicos");
        assert_eq!(location.query(), "");
        assert_eq!(location.href(), "/musicos");
    }

    #[test]
    fn origin_without_path_is_root() {
        let location = Location::parse("https://example.com?q=x");
        assert_eq!(location.path(), "/");
        assert_eq!(location.query(), "q=x");
    }

    #[test]
    fn replace_keeps_path_and_fragment() {
        let mut location = Location::parse("/musicos?q=choro#results");
        location.replace_query("search=choro");
        assert_eq!(location.href(), "/musicos?search=choro#results");
        assert_eq!(location.replacements(), 1);

        location.replace_query("");
        assert_eq!(location.href(), "/musicos#results");
        assert_eq!(location.replacements(), 2);
    }
}
