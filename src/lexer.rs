//! Hand-written lexer for the proto3 subset the IR builder needs.
//!
//! No pure-Rust crate for textual `.proto` parsing surfaced in this codebase's
//! own dependency tree (its Protobuf work always goes through a compiled
//! `FileDescriptorSet`, produced upstream of `protoc`), so the grammar below is
//! written by hand in the same spirit as this crate's other small hand-rolled
//! parsers (see `path.rs`'s comment-path walker). It covers exactly the
//! constructs named in the schema parser's contract: `syntax`, `package`,
//! `import`, `message`, `enum`, `service`/`rpc`, scalar/map fields, and the
//! `optional`/`repeated` modifiers.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Ident(String),
    StringLiteral(String),
    IntLiteral(String),
    Symbol(char),
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident(s) => write!(f, "identifier `{s}`"),
            Token::StringLiteral(s) => write!(f, "string literal \"{s}\""),
            Token::IntLiteral(s) => write!(f, "integer literal {s}"),
            Token::Symbol(c) => write!(f, "`{c}`"),
            Token::Eof => write!(f, "end of input"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpannedToken {
    pub token: Token,
    pub line: usize,
}

pub struct Lexer<'a> {
    bytes: &'a [u8],
    pos: usize,
    line: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            bytes: input.as_bytes(),
            pos: 0,
            line: 1,
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<SpannedToken>, String> {
        let mut tokens = Vec::new();
        loop {
            self.skip_trivia();
            let line = self.line;
            let Some(c) = self.peek() else {
                tokens.push(SpannedToken {
                    token: Token::Eof,
                    line,
                });
                break;
            };

            let token = match c {
                '"' | '\'' => self.read_string(c)?,
                c if c.is_ascii_digit() || (c == '-' && self.peek_at(1).is_some_and(|n| n.is_ascii_digit())) => {
                    self.read_number()
                }
                c if is_ident_start(c) => self.read_ident(),
                '{' | '}' | '(' | ')' | '<' | '>' | ';' | '=' | ',' | '.' => {
                    self.advance();
                    Token::Symbol(c)
                }
                other => return Err(format!("unexpected character '{other}' on line {line}")),
            };

            tokens.push(SpannedToken { token, line });
        }
        Ok(tokens)
    }

    fn peek(&self) -> Option<char> {
        self.bytes.get(self.pos).map(|&b| b as char)
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.bytes.get(self.pos + offset).map(|&b| b as char)
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some('/') if self.peek_at(1) == Some('/') => {
                    while !matches!(self.peek(), None | Some('\n')) {
                        self.advance();
                    }
                }
                Some('/') if self.peek_at(1) == Some('*') => {
                    self.advance();
                    self.advance();
                    loop {
                        match self.peek() {
                            None => break,
                            Some('*') if self.peek_at(1) == Some('/') => {
                                self.advance();
                                self.advance();
                                break;
                            }
                            _ => {
                                self.advance();
                            }
                        }
                    }
                }
                _ => break,
            }
        }
    }

    fn read_string(&mut self, quote: char) -> Result<Token, String> {
        let line = self.line;
        self.advance();
        let mut out = String::new();
        loop {
            match self.advance() {
                None => return Err(format!("unterminated string literal starting on line {line}")),
                Some(c) if c == quote => break,
                Some(c) => out.push(c),
            }
        }
        Ok(Token::StringLiteral(out))
    }

    fn read_number(&mut self) -> Token {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.advance();
        }
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        Token::IntLiteral(String::from_utf8_lossy(&self.bytes[start..self.pos]).into_owned())
    }

    fn read_ident(&mut self) -> Token {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_continue) {
            self.advance();
        }
        Token::Ident(String::from_utf8_lossy(&self.bytes[start..self.pos]).into_owned())
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_a_minimal_message() {
        let tokens = Lexer::new("message Foo {\n  string name = 1;\n}").tokenize().unwrap();
        let idents: Vec<_> = tokens
            .iter()
            .filter_map(|t| match &t.token {
                Token::Ident(s) => Some(s.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(idents, vec!["message", "Foo", "string", "name"]);
    }

    #[test]
    fn skips_line_and_block_comments() {
        let tokens = Lexer::new("// hello\npackage /* inline */ foo;").tokenize().unwrap();
        let idents: Vec<_> = tokens
            .iter()
            .filter_map(|t| match &t.token {
                Token::Ident(s) => Some(s.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(idents, vec!["package", "foo"]);
    }

    #[test]
    fn reads_dotted_type_names_as_separate_tokens() {
        let tokens = Lexer::new("google.protobuf.Timestamp").tokenize().unwrap();
        assert_eq!(
            tokens[0],
            SpannedToken {
                token: Token::Ident("google".into()),
                line: 1
            }
        );
    }
}
