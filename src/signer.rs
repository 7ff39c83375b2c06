//! Request signing and url construction.
//!
//! Signing and serialization deliberately disagree on ordering: the
//! signature is computed over the parameters sorted by key, while urls list
//! the parameters in insertion order. The server depends on both.

use chrono::Utc;
use hmac::{Hmac, Mac};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet};
use sha1::Sha1;
use std::borrow::Cow;

use crate::config::QueryEncoding;
use crate::error::{Result, SignatureError};
use crate::parameters::Parameters;
use crate::util;

type HmacSha1 = Hmac<Sha1>;

pub const PARAM_KEY_SERVICE_ID: &str = "service_id";
pub const PARAM_KEY_SIGNATURE: &str = "signature";
pub const PARAM_KEY_TIMESTAMP: &str = "timestamp";

/// Keys that never take part in the signature.
pub const PARAMS_TO_IGNORE: [&str; 3] = ["action", "controller", PARAM_KEY_SIGNATURE];

/// Number of seconds a signed request can be used for.
pub const SIGNATURE_VALID_SECS: i64 = 300;

// https://tools.ietf.org/html/rfc3986#section-2.3
// ALPHA, DIGIT, '-', '.', '_', '~' are left alone, everything else is
// encoded with uppercase hex.
const TARGETS_FOR_PARAMS: &AsciiSet = &percent_encoding::NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Builds the string that is fed into the HMAC.
///
/// Keys are sorted with plain byte-wise string comparison (never
/// locale-aware), keys in [`PARAMS_TO_IGNORE`] are skipped, and each
/// remaining pair is appended as `key` immediately followed by `value`.
pub fn canonical_string(params: &Parameters) -> String {
    let mut pairs = params
        .iter()
        .filter(|(k, _)| !PARAMS_TO_IGNORE.contains(k))
        .collect::<Vec<(&str, &str)>>();
    pairs.sort();
    pairs.into_iter().fold(String::new(), |mut raw, (k, v)| {
        raw.push_str(k);
        raw.push_str(v);
        raw
    })
}

/// Signs `params` with `key` and returns the lowercase hex HMAC-SHA1 digest.
pub fn canonicalize_and_sign(params: &Parameters, key: &str) -> String {
    let mac = mac_for(params, key);
    hex::encode(mac.finalize().into_bytes())
}

/// Checks the `signature` and `timestamp` of a signed parameter set.
///
/// `now` is a unix timestamp in seconds. The comparison of the digest runs in
/// constant time.
pub fn verify(
    params: &Parameters,
    key: &str,
    now: i64,
) -> std::result::Result<(), SignatureError> {
    let signature = params
        .get(PARAM_KEY_SIGNATURE)
        .ok_or(SignatureError::MissingSignature)?;
    let expected = hex::decode(signature).map_err(|_| SignatureError::Mismatch)?;
    mac_for(params, key)
        .verify_slice(&expected)
        .map_err(|_| SignatureError::Mismatch)?;

    let timestamp = params
        .get(PARAM_KEY_TIMESTAMP)
        .and_then(|t| t.parse::<i64>().ok())
        .ok_or(SignatureError::MissingTimestamp)?;
    // timestamps come from the wire, so keep the arithmetic overflow-free
    if now.abs_diff(timestamp) > SIGNATURE_VALID_SECS as u64 {
        return Err(SignatureError::Expired {
            age: now.saturating_sub(timestamp),
        });
    }
    Ok(())
}

fn mac_for(params: &Parameters, key: &str) -> HmacSha1 {
    // NOTE: HMAC takes keys of any length, this cannot fail.
    let mut mac = HmacSha1::new_from_slice(key.as_bytes())
        .expect("HMAC-SHA1 accepts any size of keys.");
    mac.update(canonical_string(params).as_bytes());
    mac
}

/// Concatenates `base` and `params` into a url, percent-encoding values.
pub fn build_url(base: &str, params: &Parameters) -> String {
    build_url_with(base, params, QueryEncoding::Percent)
}

/// Concatenates `base` and `params` into a url with the given value escaping.
///
/// Pairs are written in insertion order, keys are written as is.
pub fn build_url_with(base: &str, params: &Parameters, encoding: QueryEncoding) -> String {
    let query = params
        .iter()
        .map(|(k, v)| {
            let v = match encoding {
                QueryEncoding::Percent => escape(v),
                QueryEncoding::HtmlEntity => escape_entities(v),
            };
            format!("{}={}", k, v)
        })
        .collect::<Vec<String>>()
        .join("&");
    format!("{}?{}", base, query)
}

/// Percent-encodes a query value.
pub fn escape(value: &str) -> Cow<'_, str> {
    Cow::from(utf8_percent_encode(value, TARGETS_FOR_PARAMS))
}

/// Legacy escaping: `&`, `<` and `>` as HTML entities, nothing else.
pub fn escape_entities(value: &str) -> Cow<'_, str> {
    if !value.contains(|c: char| matches!(c, '&' | '<' | '>')) {
        return Cow::Borrowed(value);
    }
    // `&` goes first so the entities below are not escaped twice
    Cow::Owned(
        value
            .replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;"),
    )
}

/// Reverses [`escape`] as well as [`escape_entities`].
///
/// Percent sequences are decoded first (invalid UTF-8 is replaced), then
/// `&lt;` and `&gt;`, and `&amp;` last so that `&amp;lt;` becomes `&lt;`
/// rather than `<`. `+` is kept as a literal plus.
pub fn unescape(value: &str) -> String {
    percent_decode_str(value)
        .decode_utf8_lossy()
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        // this has to be last
        .replace("&amp;", "&")
}

/// Parses a url into its server part and unescaped parameters.
///
/// The `timestamp` parameter is always set to the current time, replacing
/// any timestamp in the url, so re-signing a parsed url signs for now.
pub fn parse_url(url: &str) -> Result<(String, Parameters)> {
    parse_url_at(url, Utc::now().timestamp())
}

/// [`parse_url`] with an explicit timestamp.
pub fn parse_url_at(url: &str, timestamp: i64) -> Result<(String, Parameters)> {
    let (server, query) = util::split_url(url)?;
    let mut params = Parameters::new();
    for (k, v) in util::query_to_pairs(query)? {
        params.insert(k, unescape(v));
    }
    params.insert(PARAM_KEY_TIMESTAMP, timestamp);
    Ok((server.to_string(), params))
}

/// Re-signs a url with `key`, refreshing its timestamp.
pub fn sign_url(url: &str, key: &str) -> Result<String> {
    let (server, mut params) = parse_url(url)?;
    let signature = canonicalize_and_sign(&params, key);
    params.insert(PARAM_KEY_SIGNATURE, signature);
    Ok(build_url(&server, &params))
}
