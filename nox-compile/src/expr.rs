//! Expression compiler: parses expression-shaped value text into the ordered
//! operand/operator chain the target's accumulator model requires.
//!
//! There is no precedence pass. `me().width / 16 * 9` means "take my width,
//! divide by 16, multiply by 9"; the chain preserves exact source order
//! because the target runtime evaluates its operation tags exactly that way.

use crate::error::CompileError;
use crate::types::{Expr, Operand, Operator, Pos, TraitSource};
use crate::value::is_number_literal;

/// Parse raw expression text. `pos` is the position of its first character.
pub fn parse(raw: &str, pos: Pos) -> Result<Expr, CompileError> {
    let chars: Vec<char> = raw.chars().collect();
    let len = chars.len();

    // Raw operand texts (with their char offsets) split by top-level
    // operator characters.
    let mut raw_operands: Vec<(String, usize)> = Vec::new();
    let mut operators: Vec<Operator> = Vec::new();

    let mut buf = String::new();
    let mut buf_start = 0;
    let mut depth = 0usize;
    let mut last_open = 0;

    for (i, &ch) in chars.iter().enumerate() {
        match ch {
            '(' => {
                if buf.is_empty() {
                    buf_start = i;
                }
                depth += 1;
                last_open = i;
                buf.push(ch);
            }
            ')' => {
                if depth == 0 {
                    return Err(err_at("unmatched ')'", pos, i));
                }
                depth -= 1;
                buf.push(ch);
            }
            _ if depth > 0 => buf.push(ch),
            '+' | '-' | '*' | '/' => {
                // A minus at expression start or right after another operator
                // is the sign of the following number, not a subtraction.
                if ch == '-' && buf.trim().is_empty() {
                    buf.clear();
                    buf_start = i;
                    buf.push('-');
                    continue;
                }
                if buf.trim().is_empty() {
                    return Err(err_at(&format!("expected operand before '{ch}'"), pos, i));
                }
                raw_operands.push((std::mem::take(&mut buf), buf_start));
                operators.push(match ch {
                    '+' => Operator::Add,
                    '-' => Operator::Sub,
                    '*' => Operator::Mult,
                    _ => Operator::Div,
                });
            }
            _ => {
                if buf.is_empty() {
                    buf_start = i;
                }
                buf.push(ch);
            }
        }
    }

    if depth > 0 {
        return Err(err_at("unterminated '('", pos, last_open));
    }

    if buf.trim().is_empty() {
        let message = match operators.last() {
            Some(op) => format!("expected operand after '{}'", op.symbol()),
            None => "empty expression".to_string(),
        };
        return Err(err_at(&message, pos, len));
    }
    raw_operands.push((buf, buf_start));

    let mut resolved = raw_operands
        .into_iter()
        .map(|(text, offset)| parse_operand(&text, offset, pos));
    // One more operand than operators, by construction.
    let first = resolved.next().unwrap()?;
    let mut rest = Vec::with_capacity(operators.len());
    for (op, operand) in operators.into_iter().zip(resolved) {
        rest.push((op, operand?));
    }

    Ok(Expr { first, rest })
}

/// Resolve one operand text as a numeric literal or a trait access.
fn parse_operand(text: &str, offset: usize, pos: Pos) -> Result<Operand, CompileError> {
    let leading_ws = text.chars().take_while(|c| c.is_whitespace()).count();
    let trimmed = text.trim();
    let offset = offset + leading_ws;

    if is_number_literal(trimmed) {
        return Ok(Operand::Literal {
            text: trimmed.to_string(),
        });
    }

    // traitAccess := ("me" | "parent" | identifier) "(" ")" "." identifier
    let chars: Vec<char> = trimmed.chars().collect();
    let len = chars.len();
    let mut p = 0;
    while p < len && (chars[p].is_alphanumeric() || chars[p] == '_' || chars[p] == '-') {
        p += 1;
    }
    if p == 0 {
        return Err(err_at(
            &format!("cannot parse operand '{trimmed}'"),
            pos,
            offset,
        ));
    }
    let name: String = chars[..p].iter().collect();

    if p + 1 >= len || chars[p] != '(' || chars[p + 1] != ')' {
        return Err(err_at(
            &format!("expected '()' after '{name}' in trait access"),
            pos,
            offset + p,
        ));
    }
    p += 2;

    if p >= len || chars[p] != '.' {
        return Err(err_at(
            &format!("expected '.' after '{name}()' in trait access"),
            pos,
            offset + p,
        ));
    }
    p += 1;

    let trait_start = p;
    while p < len && (chars[p].is_alphanumeric() || chars[p] == '_' || chars[p] == '-') {
        p += 1;
    }
    if p == trait_start {
        return Err(err_at("expected trait name after '.'", pos, offset + p));
    }
    if p != len {
        let rest: String = chars[p..].iter().collect();
        return Err(err_at(
            &format!("unexpected trailing text '{rest}' after trait access"),
            pos,
            offset + p,
        ));
    }
    let trait_name: String = chars[trait_start..p].iter().collect();

    let src = match name.as_str() {
        "me" => TraitSource::Own,
        "parent" => TraitSource::Container,
        _ => TraitSource::Named { name },
    };

    Ok(Operand::Trait {
        src,
        name: trait_name,
    })
}

fn err_at(message: &str, pos: Pos, offset: usize) -> CompileError {
    CompileError::Expression {
        message: message.to_string(),
        pos: Pos::new(pos.line, pos.column + offset),
    }
}
