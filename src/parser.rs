//! Recursive-descent parser turning a token stream into [`crate::ast::Proto`].
//!
//! Covers the grammar subset this generator targets: `syntax`, `package`,
//! `import`, `message`, `enum`, `service`. Anything else at the top level,
//! inside a message body, or inside a service body is captured as an
//! `Unsupported`/warning entry rather than rejected outright, since those
//! constructs should be skipped with a warning, not treated as parse errors.

use crate::ast::{
    Declaration, Enum, EnumMember, Field, MapField, Message, MessageEntry, Proto, Rpc, Service,
};
use crate::lexer::{Lexer, SpannedToken, Token};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("proto parse error on line {line}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

pub fn parse(input: &str) -> Result<Proto, ParseError> {
    let tokens = Lexer::new(input).tokenize().map_err(|message| ParseError { line: 0, message })?;
    Parser::new(tokens).parse_proto()
}

struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<SpannedToken>) -> Self {
        Parser { tokens, pos: 0 }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos].token
    }

    fn line(&self) -> usize {
        self.tokens[self.pos].line
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].token.clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn err(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            line: self.line(),
            message: message.into(),
        }
    }

    fn expect_symbol(&mut self, c: char) -> Result<(), ParseError> {
        match self.advance() {
            Token::Symbol(s) if s == c => Ok(()),
            other => Err(self.err(format!("expected `{c}`, found {other}"))),
        }
    }

    fn expect_ident(&mut self) -> Result<String, ParseError> {
        match self.advance() {
            Token::Ident(s) => Ok(s),
            other => Err(self.err(format!("expected identifier, found {other}"))),
        }
    }

    /// Consumes a (possibly dotted, possibly `optional`/`repeated`-prefixed is
    /// handled by the caller) type name such as `string` or
    /// `google.protobuf.Timestamp`.
    fn parse_type_name(&mut self) -> Result<String, ParseError> {
        let mut name = self.expect_ident()?;
        while matches!(self.peek(), Token::Symbol('.')) {
            self.advance();
            name.push('.');
            name.push_str(&self.expect_ident()?);
        }
        Ok(name)
    }

    fn skip_balanced_braces(&mut self) {
        let mut depth = 1;
        while depth > 0 {
            match self.advance() {
                Token::Symbol('{') => depth += 1,
                Token::Symbol('}') => depth -= 1,
                Token::Eof => break,
                _ => {}
            }
        }
    }

    fn skip_to_semicolon(&mut self) {
        loop {
            match self.advance() {
                Token::Symbol(';') | Token::Eof => break,
                _ => {}
            }
        }
    }

    fn parse_proto(&mut self) -> Result<Proto, ParseError> {
        let mut declarations = Vec::new();
        loop {
            match self.peek().clone() {
                Token::Eof => break,
                Token::Ident(kw) => match kw.as_str() {
                    "syntax" => {
                        self.advance();
                        self.expect_symbol('=')?;
                        let value = match self.advance() {
                            Token::StringLiteral(s) => s,
                            other => return Err(self.err(format!("expected string literal, found {other}"))),
                        };
                        self.expect_symbol(';')?;
                        declarations.push(Declaration::Syntax(value));
                    }
                    "package" => {
                        self.advance();
                        let name = self.parse_type_name()?;
                        self.expect_symbol(';')?;
                        declarations.push(Declaration::Package(name));
                    }
                    "import" => {
                        self.advance();
                        // tolerate an optional `public`/`weak` qualifier
                        if matches!(self.peek(), Token::Ident(k) if k == "public" || k == "weak") {
                            self.advance();
                        }
                        let path = match self.advance() {
                            Token::StringLiteral(s) => s,
                            other => return Err(self.err(format!("expected string literal, found {other}"))),
                        };
                        self.expect_symbol(';')?;
                        declarations.push(Declaration::Import(path));
                    }
                    "message" => declarations.push(Declaration::Message(self.parse_message()?)),
                    "enum" => declarations.push(Declaration::Enum(self.parse_enum()?)),
                    "service" => declarations.push(Declaration::Service(self.parse_service()?)),
                    "option" => {
                        self.advance();
                        self.skip_to_semicolon();
                    }
                    other => return Err(self.err(format!("unexpected top-level declaration `{other}`"))),
                },
                other => return Err(self.err(format!("unexpected token {other}"))),
            }
        }
        Ok(Proto { declarations })
    }

    fn parse_message(&mut self) -> Result<Message, ParseError> {
        self.advance(); // `message`
        let name = self.expect_ident()?;
        self.expect_symbol('{')?;

        let mut fields = Vec::new();
        loop {
            if matches!(self.peek(), Token::Symbol('}')) {
                self.advance();
                break;
            }
            match self.peek().clone() {
                Token::Ident(kw) if kw == "map" => fields.push(MessageEntry::MapField(self.parse_map_field()?)),
                Token::Ident(kw) if kw == "message" || kw == "enum" || kw == "oneof" || kw == "reserved" || kw == "extensions" || kw == "option" => {
                    self.advance();
                    if matches!(self.peek(), Token::Ident(_)) {
                        self.advance();
                    }
                    match self.peek() {
                        Token::Symbol('{') => {
                            self.advance();
                            self.skip_balanced_braces();
                        }
                        _ => self.skip_to_semicolon(),
                    }
                    fields.push(MessageEntry::Unsupported(kw));
                }
                Token::Ident(_) => fields.push(MessageEntry::Field(self.parse_field()?)),
                other => return Err(self.err(format!("unexpected token in message body: {other}"))),
            }
        }

        Ok(Message { name, fields })
    }

    fn parse_field(&mut self) -> Result<Field, ParseError> {
        let mut optional = false;
        let mut repeated = false;
        loop {
            match self.peek() {
                Token::Ident(kw) if kw == "optional" => {
                    optional = true;
                    self.advance();
                }
                Token::Ident(kw) if kw == "repeated" => {
                    repeated = true;
                    self.advance();
                }
                _ => break,
            }
        }

        let type_literal = self.parse_type_name()?;
        let name = self.expect_ident()?;
        self.expect_symbol('=')?;
        match self.advance() {
            Token::IntLiteral(_) => {}
            other => return Err(self.err(format!("expected field number, found {other}"))),
        }
        // Tolerate `[...]` field options before the terminating `;`.
        if matches!(self.peek(), Token::Symbol('[')) {
            self.skip_to_semicolon();
        } else {
            self.expect_symbol(';')?;
        }

        Ok(Field {
            name,
            type_literal,
            optional,
            repeated,
        })
    }

    fn parse_map_field(&mut self) -> Result<MapField, ParseError> {
        self.advance(); // `map`
        self.expect_symbol('<')?;
        let key_type = self.parse_type_name()?;
        self.expect_symbol(',')?;
        let value_type = self.parse_type_name()?;
        self.expect_symbol('>')?;
        let name = self.expect_ident()?;
        self.expect_symbol('=')?;
        match self.advance() {
            Token::IntLiteral(_) => {}
            other => return Err(self.err(format!("expected field number, found {other}"))),
        }
        self.expect_symbol(';')?;

        Ok(MapField {
            name,
            key_type,
            value_type,
        })
    }

    fn parse_enum(&mut self) -> Result<Enum, ParseError> {
        self.advance(); // `enum`
        let name = self.expect_ident()?;
        self.expect_symbol('{')?;

        let mut members = Vec::new();
        loop {
            if matches!(self.peek(), Token::Symbol('}')) {
                self.advance();
                break;
            }
            if matches!(self.peek(), Token::Ident(kw) if kw == "option") {
                self.advance();
                self.skip_to_semicolon();
                continue;
            }
            let name = self.expect_ident()?;
            self.expect_symbol('=')?;
            let index = match self.advance() {
                Token::IntLiteral(s) => s,
                other => return Err(self.err(format!("expected enum index, found {other}"))),
            };
            if matches!(self.peek(), Token::Symbol('[')) {
                self.skip_to_semicolon();
            } else {
                self.expect_symbol(';')?;
            }
            members.push(EnumMember { name, index });
        }

        Ok(Enum { name, members })
    }

    fn parse_service(&mut self) -> Result<Service, ParseError> {
        self.advance(); // `service`
        let name = self.expect_ident()?;
        self.expect_symbol('{')?;

        let mut rpcs = Vec::new();
        let mut unsupported = Vec::new();
        loop {
            if matches!(self.peek(), Token::Symbol('}')) {
                self.advance();
                break;
            }
            match self.peek().clone() {
                Token::Ident(kw) if kw == "rpc" => rpcs.push(self.parse_rpc()?),
                Token::Ident(kw) if kw == "option" => {
                    self.advance();
                    self.skip_to_semicolon();
                }
                Token::Ident(kw) => {
                    unsupported.push(kw);
                    self.advance();
                    match self.peek() {
                        Token::Symbol('{') => {
                            self.advance();
                            self.skip_balanced_braces();
                        }
                        _ => self.skip_to_semicolon(),
                    }
                }
                other => return Err(self.err(format!("unexpected token in service body: {other}"))),
            }
        }

        Ok(Service { name, rpcs, unsupported })
    }

    fn parse_rpc(&mut self) -> Result<Rpc, ParseError> {
        self.advance(); // `rpc`
        let name = self.expect_ident()?;
        self.expect_symbol('(')?;
        if matches!(self.peek(), Token::Ident(kw) if kw == "stream") {
            self.advance();
        }
        let request_type = self.parse_type_name()?;
        self.expect_symbol(')')?;

        match self.advance() {
            Token::Ident(kw) if kw == "returns" => {}
            other => return Err(self.err(format!("expected `returns`, found {other}"))),
        }
        self.expect_symbol('(')?;
        if matches!(self.peek(), Token::Ident(kw) if kw == "stream") {
            self.advance();
        }
        let response_type = self.parse_type_name()?;
        self.expect_symbol(')')?;

        match self.peek() {
            Token::Symbol('{') => {
                self.advance();
                self.skip_balanced_braces();
            }
            Token::Symbol(';') => {
                self.advance();
            }
            other => return Err(self.err(format!("expected `{{` or `;` after rpc signature, found {other}"))),
        }

        Ok(Rpc {
            name,
            request_type,
            response_type,
        })
    }
}
