//! Value classifier: ordered dispatch of a property's raw inline text into
//! one of the four value variants.
//!
//! Classification order, first match wins: entity reference, numeric literal,
//! string literal, expression. The ordering is part of the format: `007` is a
//! number, `some_picture\.dds` is a string, and anything containing an
//! unescaped `.` or operator character must parse as an expression or fail
//! the run.

use crate::error::CompileError;
use crate::expr;
use crate::types::{Pos, Value};

/// Characters that force a raw value down the expression path when they
/// appear unescaped.
const EXPR_CHARS: [char; 7] = ['.', '(', ')', '+', '-', '*', '/'];

/// Classify raw value text. `pos` is the position of its first character.
pub fn classify_value(raw: &str, pos: Pos) -> Result<Value, CompileError> {
    if raw.is_empty() {
        return Err(CompileError::Value {
            message: "empty property value".into(),
            pos,
        });
    }

    if let Some(name) = as_entity(raw) {
        return Ok(Value::Entity { name });
    }

    if is_number_literal(raw) {
        return Ok(Value::Number {
            text: raw.to_string(),
        });
    }

    if !contains_expr_token(raw) {
        let text = decode_string(raw, pos)?;
        return Ok(Value::StringLiteral { text });
    }

    let expr = expr::parse(raw, pos)?;
    Ok(Value::Expression { expr })
}

/// `&identifier;` exactly.
fn as_entity(raw: &str) -> Option<String> {
    let inner = raw.strip_prefix('&')?.strip_suffix(';')?;
    if !inner.is_empty() && inner.chars().all(|c| c.is_alphanumeric() || c == '_') {
        Some(inner.to_string())
    } else {
        None
    }
}

/// Signed or unsigned integer or decimal literal with no trailing content.
pub(crate) fn is_number_literal(s: &str) -> bool {
    let body = s.strip_prefix(['+', '-']).unwrap_or(s);
    if body.is_empty() {
        return false;
    }
    let mut parts = body.splitn(2, '.');
    let int = parts.next().unwrap_or("");
    let frac = parts.next();
    let all_digits = |t: &str| !t.is_empty() && t.chars().all(|c| c.is_ascii_digit());
    match frac {
        None => all_digits(int),
        Some(f) => (int.is_empty() || all_digits(int)) && all_digits(f),
    }
}

/// True when any expression-forcing character occurs outside a backslash
/// escape.
fn contains_expr_token(raw: &str) -> bool {
    let chars: Vec<char> = raw.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            ch if EXPR_CHARS.contains(&ch) => return true,
            _ => i += 1,
        }
    }
    false
}

/// Decode a bare string literal: `\.` becomes `.`; any other backslash use
/// is an escape error.
fn decode_string(raw: &str, pos: Pos) -> Result<String, CompileError> {
    let chars: Vec<char> = raw.chars().collect();
    let mut out = String::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '\\' {
            match chars.get(i + 1) {
                Some('.') => {
                    out.push('.');
                    i += 2;
                }
                Some(other) => {
                    return Err(CompileError::Escape {
                        message: format!("unrecognized escape '\\{other}'"),
                        pos: Pos::new(pos.line, pos.column + i),
                    });
                }
                None => {
                    return Err(CompileError::Escape {
                        message: "dangling backslash at end of value".into(),
                        pos: Pos::new(pos.line, pos.column + i),
                    });
                }
            }
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Operand, Operator, TraitSource};
    use pretty_assertions::assert_eq;

    fn classify(raw: &str) -> Result<Value, CompileError> {
        classify_value(raw, Pos::new(1, 1))
    }

    #[test]
    fn entity_reference() {
        assert_eq!(
            classify("&true;").unwrap(),
            Value::Entity {
                name: "true".into()
            }
        );
    }

    #[test]
    fn malformed_entity_is_a_string() {
        assert_eq!(
            classify("&true").unwrap(),
            Value::StringLiteral {
                text: "&true".into()
            }
        );
    }

    #[test]
    fn integer_literal() {
        assert_eq!(classify("500").unwrap(), Value::Number { text: "500".into() });
    }

    #[test]
    fn negative_literal() {
        assert_eq!(classify("-32").unwrap(), Value::Number { text: "-32".into() });
    }

    #[test]
    fn decimal_literal_kept_verbatim() {
        assert_eq!(
            classify("0.50").unwrap(),
            Value::Number {
                text: "0.50".into()
            }
        );
    }

    #[test]
    fn numeric_looking_text_with_leading_zeroes_is_a_number() {
        // Classification order: the number rule wins before the string rule
        // ever sees the text.
        assert_eq!(classify("007").unwrap(), Value::Number { text: "007".into() });
    }

    #[test]
    fn plain_string() {
        assert_eq!(
            classify("Main Menu").unwrap(),
            Value::StringLiteral {
                text: "Main Menu".into()
            }
        );
    }

    #[test]
    fn escaped_dot_decodes() {
        assert_eq!(
            classify("some_picture\\.dds").unwrap(),
            Value::StringLiteral {
                text: "some_picture.dds".into()
            }
        );
    }

    #[test]
    fn unrecognized_escape_rejected() {
        let err = classify("a\\xb").unwrap_err();
        match err {
            CompileError::Escape { pos, .. } => assert_eq!(pos.column, 2),
            other => panic!("expected Escape error, got {other:?}"),
        }
    }

    #[test]
    fn dangling_backslash_rejected() {
        let err = classify("trailing\\").unwrap_err();
        assert!(matches!(err, CompileError::Escape { .. }), "got {err:?}");
    }

    #[test]
    fn trait_access_dispatches_to_expression() {
        match classify("me().width").unwrap() {
            Value::Expression { expr } => {
                assert_eq!(
                    expr.first,
                    Operand::Trait {
                        src: TraitSource::Own,
                        name: "width".into()
                    }
                );
                assert!(expr.rest.is_empty());
            }
            other => panic!("expected expression, got {other:?}"),
        }
    }

    #[test]
    fn arithmetic_dispatches_to_expression() {
        match classify("parent().width - 10").unwrap() {
            Value::Expression { expr } => {
                assert_eq!(expr.rest.len(), 1);
                assert_eq!(expr.rest[0].0, Operator::Sub);
            }
            other => panic!("expected expression, got {other:?}"),
        }
    }

    #[test]
    fn call_like_string_fails_as_expression() {
        // An unescaped `(` forces the expression path; the expression error
        // is the final word, per the classification order.
        let err = classify("foo(bar)").unwrap_err();
        assert!(matches!(err, CompileError::Expression { .. }), "got {err:?}");
    }

    #[test]
    fn unescaped_dot_in_bare_text_fails_as_expression() {
        let err = classify("some_picture.dds").unwrap_err();
        assert!(matches!(err, CompileError::Expression { .. }), "got {err:?}");
    }

    #[test]
    fn number_literal_shapes() {
        for good in ["0", "42", "-7", "+3", "3.25", "-0.5", ".5"] {
            assert!(is_number_literal(good), "{good} should be a number");
        }
        for bad in ["", "-", "+", ".", "1.", "1.2.3", "4a", "0x10"] {
            assert!(!is_number_literal(bad), "{bad} should not be a number");
        }
    }
}
