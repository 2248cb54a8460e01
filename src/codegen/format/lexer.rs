use std::{iter::Peekable, str::CharIndices};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Ident,
    Number,
    /// `"..."`
    String,
    /// `` `...` ``
    RawString,
    /// `'x'`
    Rune,
    LineComment,
    BlockComment,
    Punct,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    /// Byte offset into the lexed source.
    pub start: usize,
    /// First and last line covered, 0-based.
    pub line: usize,
    pub end_line: usize,
}

impl Token<'_> {
    pub fn is_comment(&self) -> bool {
        matches!(self.kind, TokenKind::LineComment | TokenKind::BlockComment)
    }

    pub fn is_punct(&self, c: &str) -> bool {
        self.kind == TokenKind::Punct && self.text == c
    }

    pub fn is_ident(&self, name: &str) -> bool {
        self.kind == TokenKind::Ident && self.text == name
    }

    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LexError {
    pub line: usize,
    pub message: String,
}

const PUNCT: &str = "+-*/%&|^<>=!()[]{},;.:~";

pub struct Lexer<'a> {
    src: &'a str,
    chars: Peekable<CharIndices<'a>>,
    line: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            chars: src.char_indices().peekable(),
            line: 0,
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<Token<'a>>, LexError> {
        let mut tokens = vec![];
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn error(&self, message: impl Into<String>) -> LexError {
        LexError {
            line: self.line + 1,
            message: message.into(),
        }
    }

    fn bump(&mut self) -> Option<(usize, char)> {
        let next = self.chars.next();
        if let Some((_, '\n')) = next {
            self.line += 1;
        }
        next
    }

    fn offset(&mut self) -> usize {
        self.chars.peek().map_or(self.src.len(), |(i, _)| *i)
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        while matches!(self.chars.peek(), Some((_, c)) if pred(*c)) {
            self.bump();
        }
    }

    fn next_token(&mut self) -> Result<Option<Token<'a>>, LexError> {
        self.eat_while(char::is_whitespace);

        let Some((start, c)) = self.bump() else {
            return Ok(None);
        };
        let line = self.line;

        let kind = match c {
            c if c.is_alphabetic() || c == '_' => {
                self.eat_while(|c| c.is_alphanumeric() || c == '_');
                TokenKind::Ident
            }
            c if c.is_ascii_digit() => {
                self.eat_while(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_');
                TokenKind::Number
            }
            '"' => {
                self.quoted('"', "string literal not terminated")?;
                TokenKind::String
            }
            '\'' => {
                self.quoted('\'', "rune literal not terminated")?;
                TokenKind::Rune
            }
            '`' => {
                loop {
                    match self.bump() {
                        Some((_, '`')) => break,
                        Some(_) => {}
                        None => return Err(self.error("raw string literal not terminated")),
                    }
                }
                TokenKind::RawString
            }
            '/' if matches!(self.chars.peek(), Some((_, '/'))) => {
                self.eat_while(|c| c != '\n');
                TokenKind::LineComment
            }
            '/' if matches!(self.chars.peek(), Some((_, '*'))) => {
                self.bump();
                let mut prev = ' ';
                loop {
                    match self.bump() {
                        Some((_, '/')) if prev == '*' => break,
                        Some((_, c)) => prev = c,
                        None => return Err(self.error("comment not terminated")),
                    }
                }
                TokenKind::BlockComment
            }
            c if PUNCT.contains(c) => TokenKind::Punct,
            c => return Err(self.error(format!("invalid character {:?}", c))),
        };

        let end = self.offset();
        Ok(Some(Token {
            kind,
            text: &self.src[start..end],
            start,
            line,
            end_line: self.line,
        }))
    }

    /// Consumes an interpreted literal up to its closing quote. Literals may
    /// not span lines.
    fn quoted(&mut self, quote: char, unterminated: &str) -> Result<(), LexError> {
        loop {
            match self.chars.peek().copied() {
                Some((_, '\n')) | None => return Err(self.error(unterminated)),
                Some((_, '\\')) => {
                    self.bump();
                    if matches!(self.chars.peek(), Some((_, '\n')) | None) {
                        return Err(self.error(unterminated));
                    }
                    self.bump();
                }
                Some((_, c)) => {
                    self.bump();
                    if c == quote {
                        return Ok(());
                    }
                }
            }
        }
    }
}

pub fn tokenize(src: &str) -> Result<Vec<Token<'_>>, LexError> {
    Lexer::new(src).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<(TokenKind, &str)> {
        tokenize(src)
            .unwrap()
            .into_iter()
            .map(|t| (t.kind, t.text))
            .collect()
    }

    #[test]
    fn lexes_field_line() {
        let src = "Id int64 `json:\"id\"` // 主键\n";
        assert_eq!(
            kinds(src),
            vec![
                (TokenKind::Ident, "Id"),
                (TokenKind::Ident, "int64"),
                (TokenKind::RawString, "`json:\"id\"`"),
                (TokenKind::LineComment, "// 主键"),
            ]
        );
    }

    #[test]
    fn tracks_lines_and_offsets() {
        let tokens = tokenize("package models\n\nvar x = new(T)").unwrap();
        assert_eq!(tokens[0].line, 0);
        assert_eq!(tokens[2].text, "var");
        assert_eq!(tokens[2].line, 2);
        assert_eq!(tokens[2].start, 16);
        assert_eq!(tokens.last().unwrap().text, ")");
    }

    #[test]
    fn multi_line_tokens() {
        let tokens = tokenize("/* a\nb */ `x\ny`").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::BlockComment);
        assert_eq!((tokens[0].line, tokens[0].end_line), (0, 1));
        assert_eq!((tokens[1].line, tokens[1].end_line), (1, 2));
    }

    #[test]
    fn escapes_in_strings() {
        assert_eq!(kinds(r#""a\"b""#), vec![(TokenKind::String, r#""a\"b""#)]);
        assert_eq!(kinds(r"'\''"), vec![(TokenKind::Rune, r"'\''")]);
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(tokenize("\"abc\n\"").is_err());
        assert!(tokenize("`abc").is_err());
        assert!(tokenize("/* abc").is_err());
        let err = tokenize("a\n#b").unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.message.contains("invalid character"));
    }
}
