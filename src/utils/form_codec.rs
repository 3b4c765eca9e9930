// Query string encoding for outgoing requests
use crate::error::EncodingError;
use percent_encoding::{percent_decode_str, utf8_percent_encode, NON_ALPHANUMERIC};
use std::collections::HashMap;

type Result<T> = std::result::Result<T, EncodingError>;

/// Encode request parameters as `key=value` pairs joined with `&`.
///
/// Every byte outside `[A-Za-z0-9]` is percent-escaped in both keys and
/// values. Pairs are emitted in the iteration order of `params`, so pass a
/// `BTreeMap` when a stable order matters.
pub fn encode<I, K, V>(params: I) -> Result<String>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    encode_bytes(
        params
            .into_iter()
            .map(|(k, v)| (k.as_ref().as_bytes().to_vec(), v.as_ref().as_bytes().to_vec())),
    )
}

/// Encode raw byte parameters.
///
/// Keys and values must be UTF-8 to be escaped. A key that is not fails
/// the whole call with [`EncodingError::InvalidKey`]; a value that is not
/// is encoded as the empty string.
pub fn encode_bytes<I, K, V>(params: I) -> Result<String>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<[u8]>,
    V: AsRef<[u8]>,
{
    let mut pairs = Vec::new();

    for (key, value) in params {
        let key = escape(key.as_ref()).ok_or(EncodingError::InvalidKey)?;
        let value = escape(value.as_ref()).unwrap_or_default();
        pairs.push(format!("{key}={value}"));
    }

    Ok(pairs.join("&"))
}

/// Decode a string produced by [`encode`] back into a mapping.
///
/// Empty tokens (`a=1&&b=2`, trailing `&`) are skipped. Only the first `=`
/// of a token separates key from value. Later duplicates win.
pub fn decode(input: &str) -> Result<HashMap<String, String>> {
    let mut params = HashMap::new();

    for token in input.split('&').filter(|t| !t.is_empty()) {
        let (key, value) = token
            .split_once('=')
            .ok_or(EncodingError::InvalidEncoding)?;

        let key = unescape(key).ok_or(EncodingError::InvalidKey)?;
        let value = unescape(value).ok_or(EncodingError::InvalidValue)?;

        params.insert(key, value);
    }

    Ok(params)
}

fn escape(raw: &[u8]) -> Option<String> {
    let text = std::str::from_utf8(raw).ok()?;
    Some(utf8_percent_encode(text, NON_ALPHANUMERIC).to_string())
}

fn unescape(escaped: &str) -> Option<String> {
    if !has_valid_escapes(escaped) {
        return None;
    }

    percent_decode_str(escaped)
        .decode_utf8()
        .ok()
        .map(|s| s.into_owned())
}

/// Every `%` must be followed by two hex digits.
fn has_valid_escapes(escaped: &str) -> bool {
    let bytes = escaped.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            match bytes.get(i + 1..i + 3) {
                Some([hi, lo]) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => i += 3,
                _ => return false,
            }
        } else {
            i += 1;
        }
    }

    true
}
