//! Postback payload parsing
//!
//! A postback button carries an opaque `data` string shaped like an
//! ampersand-delimited query string (`action=toggle_item&val=度眾`). The
//! parser is deliberately forgiving: garbled input produces a smaller map,
//! never an error.

use std::collections::HashMap;

/// Flat key/value view of a postback `data` string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostbackData {
    map: HashMap<String, String>,
}

impl PostbackData {
    /// Parse an ampersand-delimited `key=value` string.
    ///
    /// Pairs with fewer than two `=`-separated segments are dropped
    /// silently; pairs with more keep only the second segment. Values are
    /// percent-decoded, keys are not. Duplicate keys: the last occurrence
    /// wins.
    pub fn parse(query: &str) -> Self {
        let mut map = HashMap::new();
        for pair in query.split('&') {
            let mut parts = pair.split('=');
            let Some(key) = parts.next() else { continue };
            let Some(value) = parts.next() else { continue };
            map.insert(key.to_string(), percent_decode(value));
        }
        Self { map }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(String::as_str)
    }

    /// Like [`get`](Self::get) but treats an empty value as absent, which
    /// is how every required wizard field is read.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|value| !value.is_empty())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Decode `%XX` escapes, passing malformed sequences through untouched.
///
/// `+` stays a literal plus: payload values use `encodeURIComponent`-style
/// escaping, which never maps spaces to `+`.
fn percent_decode(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                out.push(hi * 16 + lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}
