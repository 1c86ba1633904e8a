//! Header classifier: decides whether a block's header line denotes an
//! element (tag, attributes, nested body) or a property (key plus inline
//! value).
//!
//! The separator is the first colon outside double quotes. An empty remainder
//! means the header declared a body and is an element; anything else makes it
//! a property and the remainder, trimmed, is the raw value text.

use crate::error::CompileError;
use crate::types::Pos;

/// A classified header line.
#[derive(Debug, Clone, PartialEq)]
pub enum Header {
    Element {
        tag: String,
        /// Attribute order preserved; reproduced verbatim by the emitter.
        attrs: Vec<(String, String)>,
    },
    Property {
        key: String,
        raw_value: String,
        /// Position of the first raw value character, for value errors.
        value_pos: Pos,
    },
}

/// Classify a header line. `pos` is the position of the first header
/// character within its source line.
pub fn classify_header(text: &str, pos: Pos) -> Result<Header, CompileError> {
    let chars: Vec<char> = text.chars().collect();

    let sep = match find_separator(&chars) {
        Ok(Some(i)) => i,
        Ok(None) => {
            return Err(CompileError::Syntax {
                message: "expected ':' in header".into(),
                pos,
            });
        }
        Err(quote_idx) => {
            return Err(CompileError::Syntax {
                message: "unterminated quoted attribute value".into(),
                pos: at(pos, quote_idx),
            });
        }
    };

    let after: String = chars[sep + 1..].iter().collect();
    if after.trim().is_empty() {
        parse_element(&chars[..sep], pos)
    } else {
        parse_property(&chars, sep, &after, pos)
    }
}

/// Index of the first colon outside double quotes, skipping escaped
/// characters. `Err` carries the index of an unclosed opening quote.
fn find_separator(chars: &[char]) -> Result<Option<usize>, usize> {
    let mut in_quotes = false;
    let mut quote_start = 0;
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 1,
            '"' => {
                if !in_quotes {
                    quote_start = i;
                }
                in_quotes = !in_quotes;
            }
            ':' if !in_quotes => return Ok(Some(i)),
            _ => {}
        }
        i += 1;
    }
    if in_quotes { Err(quote_start) } else { Ok(None) }
}

/// Parse `identifier (attr="value")*` from everything before the final colon.
fn parse_element(chars: &[char], pos: Pos) -> Result<Header, CompileError> {
    let len = chars.len();
    let mut p = 0;

    let tag = scan_ident(chars, &mut p);
    if tag.is_empty() {
        return Err(CompileError::Syntax {
            message: "expected element tag before ':'".into(),
            pos: at(pos, p),
        });
    }

    let mut attrs: Vec<(String, String)> = Vec::new();
    loop {
        while p < len && chars[p].is_whitespace() {
            p += 1;
        }
        if p >= len {
            break;
        }

        let key = scan_ident(chars, &mut p);
        if key.is_empty() {
            return Err(CompileError::Syntax {
                message: format!("malformed element header: unexpected '{}'", chars[p]),
                pos: at(pos, p),
            });
        }

        while p < len && chars[p].is_whitespace() {
            p += 1;
        }
        if p >= len || chars[p] != '=' {
            return Err(CompileError::Syntax {
                message: format!("expected '=' after attribute name '{key}'"),
                pos: at(pos, p),
            });
        }
        p += 1;
        while p < len && chars[p].is_whitespace() {
            p += 1;
        }

        if p >= len || chars[p] != '"' {
            return Err(CompileError::Syntax {
                message: format!("expected '\"' to open the value of attribute '{key}'"),
                pos: at(pos, p),
            });
        }
        let quote_start = p;
        p += 1;

        let mut value = String::new();
        loop {
            if p >= len {
                return Err(CompileError::Syntax {
                    message: "unterminated quoted attribute value".into(),
                    pos: at(pos, quote_start),
                });
            }
            match chars[p] {
                '"' => {
                    p += 1;
                    break;
                }
                '\\' if p + 1 < len => {
                    let next = chars[p + 1];
                    match next {
                        '"' | '\\' => {
                            value.push(next);
                            p += 2;
                        }
                        _ => {
                            value.push('\\');
                            p += 1;
                        }
                    }
                }
                ch => {
                    value.push(ch);
                    p += 1;
                }
            }
        }

        attrs.push((key, value));
    }

    Ok(Header::Element { tag, attrs })
}

/// Parse `identifier : rawValueText`.
fn parse_property(
    chars: &[char],
    sep: usize,
    after: &str,
    pos: Pos,
) -> Result<Header, CompileError> {
    let before: String = chars[..sep].iter().collect();
    let key = before.trim();
    if key.is_empty() || !is_identifier(key) {
        return Err(CompileError::Syntax {
            message: format!("malformed property header: '{}' is not an identifier", key),
            pos,
        });
    }

    let leading_ws = after.chars().take_while(|c| c.is_whitespace()).count();
    let value_pos = at(pos, sep + 1 + leading_ws);

    Ok(Header::Property {
        key: key.to_string(),
        raw_value: after.trim().to_string(),
        value_pos,
    })
}

/// Scan an identifier run: alphanumeric, hyphen, underscore.
fn scan_ident(chars: &[char], p: &mut usize) -> String {
    let start = *p;
    while *p < chars.len() && is_ident_char(chars[*p]) {
        *p += 1;
    }
    chars[start..*p].iter().collect()
}

fn is_ident_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '-' || ch == '_'
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_ident_char)
}

/// `pos` shifted right by `offset` characters.
fn at(pos: Pos, offset: usize) -> Pos {
    Pos::new(pos.line, pos.column + offset)
}
