//! ISUPPORT token splitting and value unescaping.

/// A single ISUPPORT key-value entry.
///
/// Represents a token from an ISUPPORT line, which can be either:
/// - A bare key (e.g., `EXCEPTS`) indicating a feature is supported
/// - A key=value pair (e.g., `NETWORK=Libera.Chat`)
///
/// An empty value (`KEY=`) is treated the same as a bare key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IsupportEntry {
    /// The token key (e.g., `NETWORK`, `CHANTYPES`).
    pub key: String,
    /// The unescaped value, if one was given.
    pub value: Option<String>,
}

impl IsupportEntry {
    /// Split a `KEY` or `KEY=VALUE` token and unescape its value.
    pub fn parse(token: &str) -> Self {
        let (key, value) = match token.split_once('=') {
            Some((k, v)) => (k, Some(v)),
            None => (token, None),
        };

        IsupportEntry {
            key: key.to_owned(),
            value: value.filter(|v| !v.is_empty()).map(unescape_value),
        }
    }
}

/// Strip the leading target and trailing human-readable text from
/// `RPL_ISUPPORT` parameters, leaving only the tokens.
pub fn response_tokens(params: &[String]) -> &[String] {
    match params.len() {
        0..=2 => &[],
        n => &params[1..n - 1],
    }
}

/// Decode the ISUPPORT value escape syntax.
///
/// `\xHH` decodes to the byte with hex value `HH`; `\c` for any other `c`
/// decodes to `c` itself. Decoded bytes that are not valid UTF-8 are
/// replaced rather than rejected.
pub fn unescape_value(value: &str) -> String {
    if !value.contains('\\') {
        return value.to_owned();
    }

    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'\\' {
            out.push(bytes[i]);
            i += 1;
            continue;
        }

        match bytes.get(i + 1) {
            Some(b'x') => match bytes.get(i + 2..i + 4).and_then(decode_hex_pair) {
                Some(b) => {
                    out.push(b);
                    i += 4;
                }
                None => {
                    out.push(b'x');
                    i += 2;
                }
            },
            Some(&c) => {
                out.push(c);
                i += 2;
            }
            None => {
                // dangling backslash
                out.push(b'\\');
                i += 1;
            }
        }
    }

    String::from_utf8_lossy(&out).into_owned()
}

fn decode_hex_pair(pair: &[u8]) -> Option<u8> {
    let s = std::str::from_utf8(pair).ok()?;
    u8::from_str_radix(s, 16).ok()
}
