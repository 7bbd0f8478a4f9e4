/// A raw top-level block produced by extraction. Transient: consumed
/// during AST construction.
#[derive(Debug)]
pub(crate) struct RawBlock {
    /// Header text preceding the opening delimiter, trimmed.
    pub header: String,
    /// The delimiter that opened the block (`{` or `[`). Recorded for
    /// debug logging; pairing against the closer is not validated.
    pub opener: char,
    /// Body text between the opener and the first unquoted closer.
    pub body: String,
}

/// Extract top-level blocks from source text.
///
/// A block starts on a non-comment line carrying a header label and an
/// unquoted `{` or `[` (header and opener share a line; the first unquoted
/// opener wins). The body runs to the first unquoted `}` or `]` of either
/// kind; closer type is not matched against the opener, and nested
/// delimiters are not balanced here. Nested structure stays as raw lines
/// inside the body and is resolved by the tag compiler's own depth
/// tracking.
///
/// A block whose body never closes is dropped. Scanning resumes at the
/// start of the line after each closer.
pub(crate) fn extract_blocks(source: &str) -> Vec<RawBlock> {
    let mut blocks = Vec::new();
    let mut pos = 0;

    while pos < source.len() {
        let line_end = source[pos..]
            .find('\n')
            .map(|i| pos + i)
            .unwrap_or(source.len());
        let line = &source[pos..line_end];

        // Comment lines never open a block.
        if line.trim_start().starts_with("//") {
            pos = line_end + 1;
            continue;
        }

        let Some((opener_idx, opener)) = find_block_start(line) else {
            pos = line_end + 1;
            continue;
        };

        let header = line[..opener_idx].trim().to_string();
        let body_start = pos + opener_idx + opener.len_utf8();

        let Some(body_end) = find_body_end(source, body_start) else {
            break;
        };

        blocks.push(RawBlock {
            header,
            opener,
            body: source[body_start..body_end].to_string(),
        });

        pos = source[body_end..]
            .find('\n')
            .map(|i| body_end + i + 1)
            .unwrap_or(source.len());
    }

    blocks
}

/// Find the first unquoted `{` or `[` on a line, provided the text before
/// it forms a header label.
fn find_block_start(line: &str) -> Option<(usize, char)> {
    let mut quote: Option<char> = None;

    for (idx, c) in line.char_indices() {
        match quote {
            Some(q) => {
                if c == q {
                    quote = None;
                }
            }
            None => match c {
                '\'' | '"' => quote = Some(c),
                '{' | '[' => {
                    return is_header_label(line[..idx].trim()).then_some((idx, c));
                }
                _ => {}
            },
        }
    }

    None
}

/// A header label is `$name` (word characters only after the `$`) or a
/// bare word optionally followed by whitespace and attribute text.
fn is_header_label(text: &str) -> bool {
    if let Some(rest) = text.strip_prefix('$') {
        !rest.is_empty() && rest.chars().all(is_word_char)
    } else {
        text.chars().next().is_some_and(is_word_char)
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Scan forward from `start` for the first unquoted `}` or `]`, whichever
/// comes first. Quote state resets at each newline so a stray quote only
/// affects its own line.
fn find_body_end(source: &str, start: usize) -> Option<usize> {
    let mut quote: Option<char> = None;

    for (idx, c) in source[start..].char_indices() {
        match quote {
            Some(q) => {
                if c == q || c == '\n' {
                    quote = None;
                }
            }
            None => match c {
                '\'' | '"' => quote = Some(c),
                '}' | ']' => return Some(start + idx),
                _ => {}
            },
        }
    }

    None
}
