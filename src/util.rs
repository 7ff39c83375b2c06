use crate::error::{Error, Result};

/// Splits a url at the first `?` into the server part and the raw query.
pub fn split_url(url: &str) -> Result<(&str, &str)> {
    let mut parts = url.splitn(2, '?');
    let server = parts.next().unwrap_or(url);
    match parts.next() {
        Some(query) => Ok((server, query)),
        None => Err(Error::Format(format!("no query string in `{}`", server))),
    }
}

/// Splits a raw query into `(key, value)` pairs, still escaped.
///
/// Empty segments are skipped; every other segment must contain `=` after a
/// non-empty key. Only the first `=` separates key and value.
pub fn query_to_pairs(query: &str) -> Result<Vec<(&str, &str)>> {
    query
        .split('&')
        .filter(|s| !s.is_empty())
        .map(|s| {
            let mut kv = s.splitn(2, '=');
            match (kv.next(), kv.next()) {
                (Some(k), Some(v)) if !k.is_empty() => Ok((k, v)),
                _ => Err(Error::Format(format!("bad query segment `{}`", s))),
            }
        })
        .collect()
}

#[test]
fn test_split_url() {
    let (server, query) =
        split_url("https://api.example.com/v1/ping?a=1&b=c?d").unwrap();
    assert_eq!(server, "https://api.example.com/v1/ping");
    assert_eq!(query, "a=1&b=c?d");

    let (server, query) = split_url("https://api.example.com/v1/ping?").unwrap();
    assert_eq!(server, "https://api.example.com/v1/ping");
    assert_eq!(query, "");

    assert!(matches!(
        split_url("https://api.example.com/v1/ping"),
        Err(Error::Format(_))
    ));
}

#[test]
fn test_query_to_pairs() {
    let pairs = query_to_pairs("quever=salting=parsing&&&&&vir=&x=%26amp").unwrap();
    assert_eq!(
        pairs,
        vec![("quever", "salting=parsing"), ("vir", ""), ("x", "%26amp")]
    );
    assert_eq!(query_to_pairs("").unwrap().len(), 0);
    assert!(matches!(query_to_pairs("a=1&novalue"), Err(Error::Format(_))));
    assert!(matches!(query_to_pairs("=orphan"), Err(Error::Format(_))));
}
