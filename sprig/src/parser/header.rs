use std::collections::BTreeMap;

/// Parse a tag header like `a href="link" class=btn` into the tag name and
/// its attribute map.
///
/// Tokenization splits on unquoted whitespace: a quote character (`'` or
/// `"`) opens a quoted span that runs until its matching quote. The first
/// token is the tag name; remaining tokens containing `=` split on the
/// first `=`, with one layer of matching quotes stripped from the value.
/// Tokens without `=` are dropped, not reported.
///
/// The same contract applies to top-level block headers and inline
/// nested-tag headers.
pub fn parse_header(raw: &str) -> (String, BTreeMap<String, String>) {
    let mut tokens = split_unquoted(raw.trim()).into_iter();
    let name = tokens.next().unwrap_or_default();

    let mut attributes = BTreeMap::new();
    for token in tokens {
        if let Some((key, value)) = token.split_once('=') {
            attributes.insert(key.to_string(), strip_matching_quotes(value).to_string());
        }
    }

    (name, attributes)
}

/// Split on whitespace outside quoted spans. Quote characters stay in the
/// tokens; `strip_matching_quotes` removes them later.
fn split_unquoted(raw: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut buffer = String::new();
    let mut quote: Option<char> = None;

    for c in raw.chars() {
        match c {
            '\'' | '"' => {
                match quote {
                    Some(q) if q == c => quote = None,
                    Some(_) => {}
                    None => quote = Some(c),
                }
                buffer.push(c);
            }
            c if c.is_whitespace() && quote.is_none() => {
                if !buffer.is_empty() {
                    parts.push(std::mem::take(&mut buffer));
                }
            }
            _ => buffer.push(c),
        }
    }
    if !buffer.is_empty() {
        parts.push(buffer);
    }

    parts
}

/// Strip one layer of surrounding quotes when both ends carry the same
/// quote character.
pub(crate) fn strip_matching_quotes(s: &str) -> &str {
    let bytes = s.as_bytes();
    if bytes.len() >= 2
        && (bytes[0] == b'"' || bytes[0] == b'\'')
        && bytes[bytes.len() - 1] == bytes[0]
    {
        &s[1..s.len() - 1]
    } else {
        s
    }
}
