//! Canonical formatting of generated Go source.
//!
//! Lines are re-indented with one tab per open brace, blanks inside a line
//! collapse to one space, and struct fields are aligned into columns with
//! the same rules as Go's `text/tabwriter`.

use crate::core::{Error, Result};

pub mod lexer;

use lexer::{tokenize, Token, TokenKind};

const KEYWORDS: &[&str] = &[
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
];

const TOP_LEVEL: &[&str] = &["package", "import", "var", "const", "type", "func"];

/// Padding between aligned cells.
const PADDING: usize = 1;

pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
        && !KEYWORDS.contains(&s)
}

#[derive(Debug)]
enum Line {
    Blank,
    /// Continuation of a token spanning several lines, kept as written.
    Verbatim(String),
    Code { indent: usize, cells: Vec<String> },
}

struct Open {
    delim: char,
    line: usize,
    is_struct: bool,
}

fn closer_of(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        _ => '}',
    }
}

/// Validate and canonicalize Go source text.
pub fn format_source(src: &str) -> Result<String> {
    let fail = |line: usize, message: String| {
        Error::synthesis(format!("line {}: {}", line + 1, message), src)
    };

    let tokens = tokenize(src)
        .map_err(|e| Error::synthesis(format!("line {}: {}", e.line, e.message), src))?;

    check_package_clause(&tokens).map_err(|(line, msg)| fail(line, msg))?;

    let source_lines: Vec<&str> = src.lines().collect();
    let line_count = source_lines
        .len()
        .max(tokens.last().map_or(0, |t| t.end_line + 1));

    let mut by_line: Vec<Vec<&Token>> = vec![vec![]; line_count];
    let mut continued = vec![false; line_count];
    for token in tokens.iter() {
        by_line[token.line].push(token);
        for flag in continued.iter_mut().take(token.end_line + 1).skip(token.line + 1) {
            *flag = true;
        }
    }

    let mut stack: Vec<Open> = vec![];
    let mut prev: Option<&Token> = None;
    let mut lines = Vec::with_capacity(line_count);

    for (n, line_tokens) in by_line.iter().enumerate() {
        let starts_with_closer = line_tokens
            .first()
            .map_or(false, |t| t.kind == TokenKind::Punct && ")]}".contains(t.text));
        let depth = stack.len();
        let in_struct = stack.last().map_or(false, |o| o.is_struct) && !starts_with_closer;

        if depth == 0 {
            if let Some(first) = line_tokens.first() {
                let allowed = first.is_comment()
                    || (first.kind == TokenKind::Ident && TOP_LEVEL.contains(&first.text));
                if !allowed && !continued[n] {
                    return Err(fail(n, format!("unexpected `{}` at top level", first.text)));
                }
            }
        }

        for token in line_tokens.iter() {
            if token.kind == TokenKind::Punct {
                let c = token.text.chars().next().unwrap_or(' ');
                match c {
                    '(' | '[' | '{' => stack.push(Open {
                        delim: c,
                        line: n,
                        is_struct: c == '{' && prev.map_or(false, |p| p.is_ident("struct")),
                    }),
                    ')' | ']' | '}' => match stack.pop() {
                        Some(open) if closer_of(open.delim) == c => {}
                        Some(open) => {
                            return Err(fail(
                                n,
                                format!(
                                    "`{}` does not close `{}` opened on line {}",
                                    c,
                                    open.delim,
                                    open.line + 1
                                ),
                            ))
                        }
                        None => return Err(fail(n, format!("unexpected `{}`", c))),
                    },
                    _ => {}
                }
            }
            prev = Some(*token);
        }

        let line = if continued[n] {
            Line::Verbatim(source_lines.get(n).copied().unwrap_or("").trim_end().to_string())
        } else if line_tokens.is_empty() {
            Line::Blank
        } else {
            let indent = if starts_with_closer {
                depth.saturating_sub(1)
            } else {
                depth
            };
            let cells = if in_struct {
                field_cells(line_tokens).map_err(|msg| fail(n, msg))?
            } else {
                vec![join_tokens(line_tokens)]
            };
            Line::Code { indent, cells }
        };
        lines.push(line);
    }

    if let Some(open) = stack.last() {
        return Err(fail(open.line, format!("`{}` is never closed", open.delim)));
    }

    Ok(render(&collapse_blank_lines(lines)))
}

fn check_package_clause(tokens: &[Token]) -> std::result::Result<(), (usize, String)> {
    let mut code = tokens.iter().filter(|t| !t.is_comment());
    let Some(first) = code.next() else {
        return Err((0, "missing package clause".to_string()));
    };
    if !first.is_ident("package") {
        return Err((first.line, format!("expected `package`, found `{}`", first.text)));
    }

    match code.next() {
        Some(name) if name.line == first.line && is_identifier(name.text) => match code.next() {
            Some(extra) if extra.line == first.line => Err((
                first.line,
                format!("unexpected `{}` after package name", extra.text),
            )),
            _ => Ok(()),
        },
        Some(name) if name.line == first.line => {
            Err((first.line, format!("invalid package name `{}`", name.text)))
        }
        _ => Err((first.line, "missing package name".to_string())),
    }
}

/// Tokens of one line separated by a single space wherever the source had
/// any blank between them.
fn join_tokens(tokens: &[&Token]) -> String {
    let mut out = String::new();
    let mut last_end: Option<usize> = None;
    for token in tokens {
        if let Some(end) = last_end {
            if token.start > end {
                out.push(' ');
            }
        }
        out.push_str(token.text);
        last_end = Some(token.end());
    }
    out
}

/// Splits a struct field declaration into name, type, tag and comment
/// cells.
fn field_cells(tokens: &[&Token]) -> std::result::Result<Vec<String>, String> {
    let (code, comment) = match tokens.split_last() {
        Some((last, rest)) if last.is_comment() => (rest, Some(last.text)),
        _ => (tokens, None),
    };

    if code.is_empty() {
        return Ok(comment.map(|c| vec![c.to_string()]).unwrap_or_default());
    }

    let malformed = || format!("malformed struct field `{}`", join_tokens(tokens));

    let mut names = vec![];
    let mut i = 0;
    loop {
        match code.get(i) {
            Some(t) if t.kind == TokenKind::Ident && is_identifier(t.text) => names.push(t.text),
            _ => return Err(malformed()),
        }
        i += 1;
        if code.get(i).map_or(false, |t| t.is_punct(",")) {
            i += 1;
        } else {
            break;
        }
    }

    let type_start = i;
    while let Some(t) = code.get(i) {
        let is_type_token = t.kind == TokenKind::Ident
            || ["*", "[", "]", "."].iter().any(|p| t.is_punct(p));
        if !is_type_token {
            break;
        }
        i += 1;
    }
    let type_tokens = &code[type_start..i];

    let tag = match code.get(i) {
        Some(t) if matches!(t.kind, TokenKind::String | TokenKind::RawString) => {
            i += 1;
            Some(t.text)
        }
        _ => None,
    };

    if i != code.len() {
        return Err(malformed());
    }

    let mut cells = vec![names.join(", ")];
    if type_tokens.is_empty() {
        // embedded field
        if names.len() != 1 {
            return Err(malformed());
        }
    } else {
        if type_tokens.last().map_or(true, |t| t.kind != TokenKind::Ident) {
            return Err(malformed());
        }
        cells.push(type_tokens.iter().map(|t| t.text).collect());
    }
    cells.extend(tag.map(str::to_string));
    cells.extend(comment.map(str::to_string));

    Ok(cells)
}

fn collapse_blank_lines(lines: Vec<Line>) -> Vec<Line> {
    let mut out: Vec<Line> = Vec::with_capacity(lines.len());
    for line in lines {
        let blank = matches!(line, Line::Blank);
        if blank && out.last().map_or(true, |l| matches!(l, Line::Blank)) {
            continue;
        }
        out.push(line);
    }
    while matches!(out.last(), Some(Line::Blank)) {
        out.pop();
    }
    out
}

/// Column widths per line, following tabwriter: every cell but the last
/// one of a line is terminated, and a column is aligned over each run of
/// adjacent lines (with equal indentation) that terminate a cell in it.
fn column_widths(lines: &[Line]) -> Vec<Vec<usize>> {
    let cells_of = |line: &Line| match line {
        Line::Code { indent, cells } => Some((*indent, cells.len())),
        _ => None,
    };

    let mut widths: Vec<Vec<usize>> = lines
        .iter()
        .map(|line| match line {
            Line::Code { cells, .. } => vec![0; cells.len().saturating_sub(1)],
            _ => vec![],
        })
        .collect();

    let max_columns = widths.iter().map(Vec::len).max().unwrap_or(0);
    for column in 0..max_columns {
        let mut i = 0;
        while i < lines.len() {
            let Some((indent, count)) = cells_of(&lines[i]) else {
                i += 1;
                continue;
            };
            if count <= column + 1 {
                i += 1;
                continue;
            }

            let mut j = i;
            let mut width = 0;
            while let Some(Line::Code { indent: ind, cells }) = lines.get(j) {
                if *ind != indent || cells.len() <= column + 1 {
                    break;
                }
                width = width.max(cells[column].chars().count());
                j += 1;
            }
            for row in widths.iter_mut().take(j).skip(i) {
                row[column] = width;
            }
            i = j;
        }
    }

    widths
}

fn render(lines: &[Line]) -> String {
    let widths = column_widths(lines);
    let mut out = String::new();

    for (line, widths) in lines.iter().zip(widths.iter()) {
        match line {
            Line::Blank => {}
            Line::Verbatim(text) => out.push_str(text),
            Line::Code { indent, cells } => {
                let mut text = "\t".repeat(*indent);
                for (k, cell) in cells.iter().enumerate() {
                    text.push_str(cell);
                    if let Some(width) = widths.get(k) {
                        let pad = width + PADDING - cell.chars().count();
                        text.extend(std::iter::repeat(' ').take(pad));
                    }
                }
                out.push_str(text.trim_end());
            }
        }
        out.push('\n');
    }

    out
}
