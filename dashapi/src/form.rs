//! `application/x-www-form-urlencoded` bodies whose values may be arbitrary bytes.
//!
//! The `payload` field carries raw gzip output, so values are percent-decoded to
//! bytes and never forced through UTF-8.

use percent_encoding::percent_decode;
use url::form_urlencoded::byte_serialize;

pub const CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

pub fn encode(fields: &[(&str, &[u8])]) -> String {
    let mut body = String::new();
    for (i, (name, value)) in fields.iter().enumerate() {
        if i > 0 {
            body.push('&');
        }
        body.extend(byte_serialize(name.as_bytes()));
        body.push('=');
        body.extend(byte_serialize(value));
    }
    body
}

/// Decodes every `name=value` pair in body order. Repeated names are kept.
pub fn decode(body: &[u8]) -> Vec<(String, Vec<u8>)> {
    body.split(|b| *b == b'&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (name, value) = match pair.iter().position(|b| *b == b'=') {
                Some(i) => (&pair[..i], &pair[i + 1..]),
                None => (pair, &[][..]),
            };
            (
                String::from_utf8_lossy(&unescape(name)).into_owned(),
                unescape(value),
            )
        })
        .collect()
}

fn unescape(input: &[u8]) -> Vec<u8> {
    let plus_decoded: Vec<u8> = input
        .iter()
        .map(|&b| if b == b'+' { b' ' } else { b })
        .collect();
    percent_decode(&plus_decoded).collect()
}
