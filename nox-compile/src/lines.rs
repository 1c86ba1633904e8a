//! Block parser: raw source text to a tree of indentation-delimited blocks.
//!
//! Each block is a header line plus the blocks nested under it. `//` line
//! comments are stripped before the header text is recorded (quote- and
//! escape-aware, so a `//` inside a quoted attribute value survives), blank
//! and comment-only lines are ignored, and a single consistent indentation
//! unit is enforced for the whole run.

use crate::error::CompileError;
use crate::types::Pos;

/// One source line plus the blocks nested under it.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Header text with comments stripped and surrounding whitespace trimmed.
    pub header: String,
    /// 1-based line number of the header.
    pub line: usize,
    /// Count of leading whitespace characters before the header.
    pub indent: usize,
    pub children: Vec<Block>,
}

/// An in-progress block on the nesting stack.
struct OpenBlock {
    block: Block,
    /// Whether the header ends with `:` and may therefore contain children.
    declares_body: bool,
    /// Indentation recorded from this block's first child; all siblings must
    /// match it exactly.
    child_indent: Option<usize>,
}

/// Parse source text into top-level blocks.
///
/// Expects LF line endings; the pipeline entry point normalises CRLF first.
pub fn parse_blocks(source: &str) -> Result<Vec<Block>, CompileError> {
    let mut roots: Vec<Block> = Vec::new();
    let mut stack: Vec<OpenBlock> = Vec::new();
    // Indentation unit (whitespace chars per depth) and the character used,
    // both fixed by the first indented line.
    let mut unit: Option<usize> = None;
    let mut indent_char: Option<char> = None;

    for (idx, raw_line) in source.split('\n').enumerate() {
        let line_no = idx + 1;
        let stripped = strip_comment(raw_line);
        if stripped.trim().is_empty() {
            continue;
        }

        let indent = measure_indent(stripped, line_no, &mut indent_char)?;
        let header = stripped.trim().to_string();

        // Close every block this line is not nested inside of.
        loop {
            match stack.last() {
                Some(top) if indent <= top.block.indent => {
                    let done = stack.pop().unwrap();
                    attach(&mut stack, &mut roots, done);
                }
                _ => break,
            }
        }

        match stack.last_mut() {
            None => {
                if indent != 0 {
                    return Err(CompileError::Lex {
                        message: "indentation does not match any enclosing block".into(),
                        pos: Pos::new(line_no, 1),
                    });
                }
            }
            Some(parent) => {
                // This line sits strictly deeper than `parent`.
                if !parent.declares_body {
                    return Err(CompileError::Syntax {
                        message: format!(
                            "unexpected indent: line {} does not declare a body with ':'",
                            parent.block.line
                        ),
                        pos: Pos::new(line_no, indent + 1),
                    });
                }
                match parent.child_indent {
                    None => {
                        let step = indent - parent.block.indent;
                        match unit {
                            None => unit = Some(step),
                            Some(u) if u != step => {
                                return Err(CompileError::Lex {
                                    message: format!(
                                        "inconsistent indentation: expected steps of {u} whitespace characters, found {step}"
                                    ),
                                    pos: Pos::new(line_no, indent + 1),
                                });
                            }
                            Some(_) => {}
                        }
                        parent.child_indent = Some(indent);
                    }
                    Some(ci) if ci != indent => {
                        return Err(CompileError::Lex {
                            message: "indentation does not match any enclosing block".into(),
                            pos: Pos::new(line_no, indent + 1),
                        });
                    }
                    Some(_) => {}
                }
            }
        }

        let declares_body = header.ends_with(':');
        stack.push(OpenBlock {
            block: Block {
                header,
                line: line_no,
                indent,
                children: Vec::new(),
            },
            declares_body,
            child_indent: None,
        });
    }

    while let Some(done) = stack.pop() {
        attach(&mut stack, &mut roots, done);
    }

    Ok(roots)
}

/// Move a finished block into its parent's children, or the root list.
fn attach(stack: &mut Vec<OpenBlock>, roots: &mut Vec<Block>, done: OpenBlock) {
    match stack.last_mut() {
        Some(parent) => parent.block.children.push(done.block),
        None => roots.push(done.block),
    }
}

/// Cut a `//` comment off the end of a line.
///
/// A `//` inside a double-quoted run does not start a comment, and a
/// backslash escapes the character after it, so `\/\/` stays literal text.
fn strip_comment(line: &str) -> &str {
    let mut in_quotes = false;
    let mut iter = line.char_indices().peekable();
    while let Some((i, ch)) = iter.next() {
        match ch {
            '\\' => {
                iter.next();
            }
            '"' => in_quotes = !in_quotes,
            '/' if !in_quotes => {
                if let Some(&(_, '/')) = iter.peek() {
                    return &line[..i];
                }
            }
            _ => {}
        }
    }
    line
}

/// Count leading whitespace, rejecting tab/space mixing both within the
/// prefix and across lines of the run.
fn measure_indent(
    line: &str,
    line_no: usize,
    indent_char: &mut Option<char>,
) -> Result<usize, CompileError> {
    let mut count = 0;
    let mut first: Option<char> = None;
    for ch in line.chars() {
        if ch != ' ' && ch != '\t' {
            break;
        }
        let f = *first.get_or_insert(ch);
        if ch != f {
            return Err(CompileError::Lex {
                message: "mixed tabs and spaces in indentation".into(),
                pos: Pos::new(line_no, count + 1),
            });
        }
        count += 1;
    }
    if let Some(f) = first {
        match indent_char {
            None => *indent_char = Some(f),
            Some(c) if *c != f => {
                return Err(CompileError::Lex {
                    message: "indentation switches between tabs and spaces".into(),
                    pos: Pos::new(line_no, 1),
                });
            }
            Some(_) => {}
        }
    }
    Ok(count)
}
