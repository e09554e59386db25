use crate::{
    ast::Program,
    error::{Diagnostics, SyntaxError},
    interpreter::{
        lexer::{Token, TokenKind},
        scanner::Span,
    },
};

/// Result type used by every sub-parser.
pub type ParseResult<T> = Result<T, SyntaxError>;

/// A recursive-descent parser over a token vector.
///
/// The parser owns the tokens and a cursor, and shares the diagnostics
/// collector with the lexer that produced the tokens. Sub-parsers are
/// spread over the sibling modules as further `impl` blocks; they all
/// work through the primitives defined here.
///
/// Errors do not abort the parse: a failed statement is recorded and the
/// cursor synchronizes to the next statement boundary, so one pass
/// reports every syntax error in the input. The resulting [`Program`] is
/// partial when errors were recorded; callers decide success by checking
/// the collector.
pub struct Parser<'diag> {
    tokens:      Vec<Token>,
    current:     usize,
    diagnostics: &'diag mut Diagnostics,
}

impl<'diag> Parser<'diag> {
    /// Creates a parser over `tokens`.
    ///
    /// Trivia tokens (line breaks, comments) are dropped up front; they
    /// are part of the token stream interface but never of the grammar.
    #[must_use]
    pub fn new(tokens: Vec<Token>, diagnostics: &'diag mut Diagnostics) -> Self {
        let mut tokens: Vec<Token> = tokens.into_iter().filter(|t| !t.kind.is_trivia()).collect();
        if tokens.is_empty() {
            // The lexer always terminates its stream; a caller-built
            // vector may not.
            tokens.push(Token::new(TokenKind::Eof, String::new(), Span::default()));
        }
        Self { tokens,
               current: 0,
               diagnostics }
    }

    /// Parses the whole token stream into a program.
    ///
    /// Statement-level faults are recorded and skipped past; parsing
    /// always reaches the end of input.
    #[must_use]
    pub fn parse_program(mut self) -> Program {
        let first_span = self.tokens.first().map_or_else(Span::default, |t| t.span);
        let mut body = Vec::new();

        while !self.at_end() {
            match self.parse_statement() {
                Ok(statement) => body.push(statement),
                Err(error) => self.recover(&error),
            }
        }

        let last_span = self.tokens.last().map_or_else(Span::default, |t| t.span);
        Program { body,
                  span: first_span.merge(last_span) }
    }

    /// Records `error` and advances to a likely statement boundary.
    pub(crate) fn recover(&mut self, error: &SyntaxError) {
        self.diagnostics.error("parser", error.to_string(), error.span());
        self.synchronize();
    }

    /// Looks ahead `k` tokens; clamped to the trailing EOF token.
    #[must_use]
    pub(crate) fn peek(&self, k: usize) -> &Token {
        let index = (self.current + k).min(self.tokens.len().saturating_sub(1));
        &self.tokens[index]
    }

    /// The token at the cursor.
    #[must_use]
    pub(crate) fn current(&self) -> &Token {
        self.peek(0)
    }

    /// The most recently consumed token.
    #[must_use]
    pub(crate) fn previous(&self) -> &Token {
        let index = self.current.saturating_sub(1);
        &self.tokens[index.min(self.tokens.len().saturating_sub(1))]
    }

    /// Consumes and returns the token at the cursor. At the end of input
    /// the EOF token is returned without moving.
    pub(crate) fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if !self.at_end() {
            self.current += 1;
        }
        token
    }

    /// `true` when the cursor token has the same kind as `kind`,
    /// disregarding any payload.
    #[must_use]
    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current().kind) == std::mem::discriminant(kind)
    }

    /// Consumes the cursor token when it matches `kind`.
    pub(crate) fn match_kind(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            return true;
        }
        false
    }

    /// Consumes the cursor token when it matches `kind`, or produces an
    /// `UnexpectedToken` error naming what was required.
    ///
    /// The error value is returned rather than recorded here; the
    /// statement-level recovery in [`Self::parse_program`] and block
    /// parsing records each fault exactly once and continues at the next
    /// boundary.
    pub(crate) fn expect(&mut self, kind: &TokenKind) -> ParseResult<Token> {
        if self.check(kind) {
            return Ok(self.advance());
        }
        Err(SyntaxError::UnexpectedToken { expected: kind.describe().to_string(),
                                           found:    self.current().kind.describe().to_string(),
                                           span:     self.current().span, })
    }

    /// Like [`Self::expect`] for block terminators, producing the more
    /// specific `MissingTerminator` error.
    pub(crate) fn expect_terminator(&mut self,
                                    kind: &TokenKind,
                                    opened_by: &'static str)
                                    -> ParseResult<Token> {
        if self.check(kind) {
            return Ok(self.advance());
        }
        Err(SyntaxError::MissingTerminator { terminator: kind.describe().trim_matches('\'').to_string(),
                                             opened_by:  opened_by.to_string(),
                                             span:       self.current().span, })
    }

    /// `true` once the cursor sits on the EOF token.
    #[must_use]
    pub(crate) fn at_end(&self) -> bool {
        self.current().kind == TokenKind::Eof
    }

    /// Skips tokens until a plausible statement boundary: just past a
    /// `;`, or in front of a token that can begin or terminate a
    /// statement.
    fn synchronize(&mut self) {
        self.advance();
        while !self.at_end() {
            if self.previous().kind == TokenKind::Semicolon {
                return;
            }
            match self.current().kind {
                TokenKind::Local
                | TokenKind::If
                | TokenKind::While
                | TokenKind::Repeat
                | TokenKind::For
                | TokenKind::Function
                | TokenKind::Return
                | TokenKind::Break
                | TokenKind::Do
                | TokenKind::Goto
                | TokenKind::DoubleColon
                | TokenKind::End
                | TokenKind::Else
                | TokenKind::Elseif
                | TokenKind::Until => return,
                _ => {
                    self.advance();
                },
            }
        }
    }
}
