//! Read-only, multi-value view over a URL query string.

use url::form_urlencoded;

/// Decoded query parameters in their original order.
///
/// A key may appear any number of times. Lookups never fail; a missing key is
/// simply `None` or an empty iterator.
///
/// # Examples
///
/// ```
/// use musician_search::query::QueryParams;
///
/// let params = QueryParams::parse("?genres=rock&genres=jazz&city=S%C3%A3o+Paulo");
/// assert_eq!(params.get("city"), Some("São Paulo"));
/// assert_eq!(params.get_all("genres").collect::<Vec<_>>(), ["rock", "jazz"]);
/// assert_eq!(params.get("page"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Decodes a query string, with or without its leading `?`.
    #[must_use]
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs = form_urlencoded::parse(query.as_bytes())
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        Self { pairs }
    }

    /// Extracts and decodes the query portion of a URL or path.
    ///
    /// Anything before the first `?` and after the first `#` is ignored.
    ///
    /// ```
    /// use musician_search::query::QueryParams;
    ///
    /// let params = QueryParams::from_url("https://example.com/musicos?q=samba#top");
    /// assert_eq!(params.get("q"), Some("samba"));
    /// ```
    #[must_use]
    pub fn from_url(url: &str) -> Self {
        let without_fragment = url.split_once('#').map_or(url, |(head, _)| head);
        without_fragment
            .split_once('?')
            .map_or_else(Self::default, |(_, query)| Self::parse(query))
    }

    /// First value for `key`.
    #[must_use]
    pub fn get<'a>(&'a self, key: &str) -> Option<&'a str> {
        self.pairs
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    /// Every value for `key`, in order of appearance.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.pairs.iter().any(|(name, _)| name == key)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plus_and_percent_escapes_are_decoded() {
        let params = QueryParams::parse("search=dj+set&city=Jo%C3%A3o+Pessoa");
        assert_eq!(params.get("search"), Some("dj set"));
        assert_eq!(params.get("city"), Some("João Pessoa"));
    }

    #[test]
    fn empty_query_has_no_params() {
        assert!(QueryParams::parse("").is_empty());
        assert!(QueryParams::parse("?").is_empty());
        assert!(QueryParams::from_url("/musicos").is_empty());
    }

    #[test]
    fn fragment_is_not_part_of_the_query() {
        let params = QueryParams::from_url("/musicos?page=2#results");
        assert_eq!(params.get("page"), Some("2"));
        assert!(!params.contains("results"));
    }

    #[test]
    fn collects_from_pairs() {
        let params: QueryParams = [("a", "1"), ("a", "2")].into_iter().collect();
        assert_eq!(params.get_all("a").count(), 2);
        assert_eq!(params.iter().next(), Some(("a", "1")));
    }
}
