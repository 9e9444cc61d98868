//! Query string merging
//!
//! Combines the query string already present on a URL with extra parameters.
//! A key may only appear once across both sides; a clash is an error rather
//! than a silent override.

use crate::error::{Error, Result};
use std::collections::HashSet;
use url::form_urlencoded;

/// Merge `params` into the query string of `url`
///
/// Existing parameters come first, then `params` in iteration order. Values
/// are form-encoded (space becomes `+`). A `#fragment` is kept at the end.
///
/// # Errors
///
/// [`Error::DuplicateKeys`] naming every key that is already on the URL or
/// repeated within `params`, whatever the values.
///
/// # Examples
///
/// ```
/// use paced_api::query::merge_query_params;
///
/// let url = merge_query_params("https://x/api", [("foo", "bar baz")]).unwrap();
/// assert_eq!(url, "https://x/api?foo=bar+baz");
///
/// assert!(merge_query_params("https://x/api?foo=bar", [("foo", "baz")]).is_err());
/// ```
pub fn merge_query_params<I, K, V>(url: &str, params: I) -> Result<String>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: ToString,
{
    let (without_fragment, fragment) = match url.split_once('#') {
        Some((head, fragment)) => (head, Some(fragment)),
        None => (url, None),
    };
    let (base, query) = without_fragment
        .split_once('?')
        .unwrap_or((without_fragment, ""));

    let existing: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect();
    let mut seen: HashSet<String> = existing.iter().map(|(k, _)| k.clone()).collect();

    let mut duplicates: Vec<String> = Vec::new();
    let mut supplied: Vec<(String, String)> = Vec::new();
    for (key, value) in params {
        let key = key.as_ref().to_string();
        if seen.insert(key.clone()) {
            supplied.push((key, value.to_string()));
        } else if !duplicates.contains(&key) {
            duplicates.push(key);
        }
    }

    if !duplicates.is_empty() {
        return Err(Error::duplicate_keys(duplicates));
    }
    if supplied.is_empty() {
        return Ok(url.to_string());
    }

    let merged = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(existing.iter().chain(supplied.iter()))
        .finish();

    let mut out = format!("{base}?{merged}");
    if let Some(fragment) = fragment {
        out.push('#');
        out.push_str(fragment);
    }
    Ok(out)
}

/// Append a single encoded `key=value` pair, using `?` or `&` as needed
///
/// The pair goes into the query, ahead of any `#fragment`.
pub fn append_query_param(url: &str, key: &str, value: &str) -> String {
    let (head, fragment) = match url.split_once('#') {
        Some((head, fragment)) => (head, Some(fragment)),
        None => (url, None),
    };
    let separator = if head.contains('?') { '&' } else { '?' };
    let pair = form_urlencoded::Serializer::new(String::new())
        .append_pair(key, value)
        .finish();

    let mut out = format!("{head}{separator}{pair}");
    if let Some(fragment) = fragment {
        out.push('#');
        out.push_str(fragment);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;
    use test_case::test_case;

    #[test_case("https://x/api", &[("foo", "bar baz")], "https://x/api?foo=bar+baz" ; "space becomes plus")]
    #[test_case("https://x/api?a=1", &[("b", "2")], "https://x/api?a=1&b=2" ; "base before supplied")]
    #[test_case("https://x/api", &[("z", "1"), ("a", "2")], "https://x/api?z=1&a=2" ; "supplied order kept")]
    #[test_case("https://x/api", &[("q", "a&b=c")], "https://x/api?q=a%26b%3Dc" ; "reserved characters encoded")]
    #[test_case("https://x/api", &[("q", "tab\tnl\n")], "https://x/api?q=tab%09nl%0A" ; "control characters encoded")]
    #[test_case("https://x/api?a=1#top", &[("b", "2")], "https://x/api?a=1&b=2#top" ; "fragment kept last")]
    #[test_case("https://x/api?filter.startsGte=2015-12-12", &[("limit", "10")], "https://x/api?filter.startsGte=2015-12-12&limit=10" ; "dotted keys untouched")]
    fn test_merge(url: &str, params: &[(&str, &str)], expected: &str) {
        let merged = merge_query_params(url, params.iter().copied()).unwrap();
        assert_eq!(merged, expected);
    }

    #[test]
    fn test_merge_without_params_leaves_url_alone() {
        let none: [(&str, &str); 0] = [];
        assert_eq!(
            merge_query_params("https://x/api", none).unwrap(),
            "https://x/api"
        );
        assert_eq!(
            merge_query_params("https://x/api?keep=as%20is", none).unwrap(),
            "https://x/api?keep=as%20is"
        );
    }

    #[test]
    fn test_merge_from_map() {
        let mut params = BTreeMap::new();
        params.insert("b".to_string(), "2".to_string());
        params.insert("a".to_string(), "1".to_string());

        let merged = merge_query_params("https://x/api", &params).unwrap();
        assert_eq!(merged, "https://x/api?a=1&b=2");
    }

    #[test_case("https://x/api?foo=bar", &[("foo", "baz")] ; "different value")]
    #[test_case("https://x/api?foo=bar", &[("foo", "bar")] ; "same value")]
    #[test_case("https://x/api?foo=bar+baz&x=1", &[("y", "2"), ("foo", "bar baz")] ; "encoded value")]
    fn test_merge_duplicate_key(url: &str, params: &[(&str, &str)]) {
        let err = merge_query_params(url, params.iter().copied()).unwrap_err();
        match err {
            Error::DuplicateKeys { keys } => assert_eq!(keys, vec!["foo".to_string()]),
            other => panic!("Expected DuplicateKeys, got {other:?}"),
        }
    }

    #[test]
    fn test_merge_reports_every_duplicate_once() {
        let err = merge_query_params(
            "https://x/api?a=1&b=2",
            [("b", "3"), ("c", "4"), ("a", "5"), ("c", "6"), ("c", "7")],
        )
        .unwrap_err();

        match err {
            Error::DuplicateKeys { keys } => {
                assert_eq!(keys, vec!["b".to_string(), "a".to_string(), "c".to_string()]);
            }
            other => panic!("Expected DuplicateKeys, got {other:?}"),
        }
    }

    #[test]
    fn test_merge_decodes_existing_keys_before_comparing() {
        let err = merge_query_params("https://x/api?page%20size=10", [("page size", "20")]);
        assert!(matches!(err, Err(Error::DuplicateKeys { .. })));
    }

    #[test_case("https://x/api", "abc", "https://x/api?pageToken=abc" ; "first param")]
    #[test_case("https://x/api?a=1", "abc", "https://x/api?a=1&pageToken=abc" ; "after existing")]
    #[test_case("https://x/api", "a+b/c=", "https://x/api?pageToken=a%2Bb%2Fc%3D" ; "token encoded")]
    #[test_case("https://x/api?a=1#top", "abc", "https://x/api?a=1&pageToken=abc#top" ; "before fragment")]
    #[test_case("https://x/api#a?b", "abc", "https://x/api?pageToken=abc#a?b" ; "question mark in fragment")]
    fn test_append_query_param(url: &str, token: &str, expected: &str) {
        assert_eq!(append_query_param(url, "pageToken", token), expected);
    }
}
