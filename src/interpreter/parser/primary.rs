use crate::{
    ast::{Expr, Ident, LiteralValue, Selector, Statement, TableField},
    error::SyntaxError,
    interpreter::{
        lexer::TokenKind,
        parser::{ParseResult, Parser},
        scanner::Span,
    },
    util::num::{ParsedNumber, parse_number},
};

impl Parser<'_> {
    /// Parses a primary expression followed by its suffix chain:
    /// `.name`, `[expr]`, `(args)`, table- and string-argument call
    /// sugar, and method calls `:name(args)`.
    ///
    /// Both expression contexts and assignment targets come through
    /// here; the caller decides which results it accepts.
    pub(crate) fn parse_suffixed_expression(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_primary()?;

        loop {
            match self.current().kind {
                TokenKind::Dot => {
                    self.advance();
                    let name = self.parse_name()?;
                    let span = expr.span().merge(name.span);
                    expr = Expr::Member { base:     Box::new(expr),
                                          selector: Selector::Name(name),
                                          span };
                },
                TokenKind::LeftBracket => {
                    self.advance();
                    let key = self.parse_expression()?;
                    let close = self.expect(&TokenKind::RightBracket)?;
                    let span = expr.span().merge(close.span);
                    expr = Expr::Member { base:     Box::new(expr),
                                          selector: Selector::Computed(Box::new(key)),
                                          span };
                },
                TokenKind::Colon => {
                    self.advance();
                    let name = self.parse_name()?;
                    let member_span = expr.span().merge(name.span);
                    let callee = Expr::Member { base:     Box::new(expr),
                                                selector: Selector::Name(name),
                                                span:     member_span, };
                    let (arguments, end_span) = self.parse_call_arguments()?;
                    expr = Expr::Call { callee:    Box::new(callee),
                                        arguments,
                                        is_method: true,
                                        span:      member_span.merge(end_span), };
                },
                TokenKind::LeftParen | TokenKind::LeftBrace | TokenKind::Str { .. } => {
                    let (arguments, end_span) = self.parse_call_arguments()?;
                    let span = expr.span().merge(end_span);
                    expr = Expr::Call { callee: Box::new(expr),
                                        arguments,
                                        is_method: false,
                                        span };
                },
                _ => break,
            }
        }

        Ok(expr)
    }

    /// Parses one call-argument form: `(expr, …)`, a single table
    /// constructor, or a single string literal. Returns the arguments
    /// and the span of the closing token.
    fn parse_call_arguments(&mut self) -> ParseResult<(Vec<Expr>, Span)> {
        match self.current().kind {
            TokenKind::LeftParen => {
                self.advance();
                let arguments = if self.check(&TokenKind::RightParen) {
                    Vec::new()
                } else {
                    self.parse_expression_list()?
                };
                let close = self.expect(&TokenKind::RightParen)?;
                Ok((arguments, close.span))
            },
            TokenKind::LeftBrace => {
                let table = self.parse_table_constructor()?;
                let span = table.span();
                Ok((vec![table], span))
            },
            TokenKind::Str { .. } => {
                let literal = self.parse_primary()?;
                let span = literal.span();
                Ok((vec![literal], span))
            },
            _ => Err(SyntaxError::UnexpectedToken { expected: "call arguments".to_string(),
                                                    found:    self.current().kind.describe().to_string(),
                                                    span:     self.current().span, }),
        }
    }

    /// Parses one primary expression: a literal, a name, a parenthesized
    /// expression, a function expression, or a table constructor.
    pub(crate) fn parse_primary(&mut self) -> ParseResult<Expr> {
        match self.current().kind.clone() {
            TokenKind::Number => {
                let token = self.advance();
                let Some(parsed) = parse_number(&token.lexeme) else {
                    return Err(SyntaxError::UnexpectedToken { expected: "a number".to_string(),
                                                              found:    format!("'{}'", token.lexeme),
                                                              span:     token.span, });
                };
                let value = match parsed {
                    ParsedNumber::Int(n) => LiteralValue::Integer(n),
                    ParsedNumber::Float(f) => LiteralValue::Float(f),
                };
                Ok(Expr::Literal { value,
                                   raw: token.lexeme,
                                   span: token.span })
            },
            TokenKind::Str { value } => {
                let token = self.advance();
                Ok(Expr::Literal { value: LiteralValue::Str(value),
                                   raw:   token.lexeme,
                                   span:  token.span, })
            },
            TokenKind::Boolean(value) => {
                let token = self.advance();
                Ok(Expr::Literal { value: LiteralValue::Bool(value),
                                   raw:   token.lexeme,
                                   span:  token.span, })
            },
            TokenKind::Nil => {
                let token = self.advance();
                Ok(Expr::Literal { value: LiteralValue::Nil,
                                   raw:   token.lexeme,
                                   span:  token.span, })
            },
            TokenKind::Identifier => {
                let token = self.advance();
                Ok(Expr::Identifier { name: token.lexeme,
                                      span: token.span, })
            },
            TokenKind::LeftParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(&TokenKind::RightParen)?;
                Ok(expr)
            },
            TokenKind::Function => {
                let keyword = self.advance();
                let (params, body, end_span) = self.parse_function_rest()?;
                Ok(Expr::Function { params,
                                    body,
                                    span: keyword.span.merge(end_span) })
            },
            TokenKind::LeftBrace => self.parse_table_constructor(),
            _ => Err(SyntaxError::UnexpectedToken { expected: "an expression".to_string(),
                                                    found:    self.current().kind.describe().to_string(),
                                                    span:     self.current().span, }),
        }
    }

    /// Parses the shared tail of every function form: parameter list,
    /// body, `end`. Returns the parameters, the body, and the span of
    /// the closing `end`.
    pub(crate) fn parse_function_rest(&mut self)
                                      -> ParseResult<(Vec<Ident>, Vec<Statement>, Span)> {
        self.expect(&TokenKind::LeftParen)?;
        let mut params = Vec::new();
        if !self.check(&TokenKind::RightParen) {
            params.push(self.parse_name()?);
            while self.match_kind(&TokenKind::Comma) {
                params.push(self.parse_name()?);
            }
        }
        self.expect(&TokenKind::RightParen)?;

        let body = self.parse_block(&[TokenKind::End])?;
        let end = self.expect_terminator(&TokenKind::End, "function body")?;
        Ok((params, body, end.span))
    }

    /// Parses a table constructor `{ field, … }`, where fields are array
    /// entries, `name = value` entries or `[key] = value` entries,
    /// separated by `,` or `;` with an optional trailing separator.
    pub(crate) fn parse_table_constructor(&mut self) -> ParseResult<Expr> {
        let open = self.expect(&TokenKind::LeftBrace)?;
        let mut fields = Vec::new();

        while !self.check(&TokenKind::RightBrace) && !self.at_end() {
            let field = match self.current().kind {
                TokenKind::LeftBracket => {
                    self.advance();
                    let key = self.parse_expression()?;
                    self.expect(&TokenKind::RightBracket)?;
                    self.expect(&TokenKind::Equal)?;
                    let value = self.parse_expression()?;
                    TableField::Computed { key, value }
                },
                TokenKind::Identifier if self.peek(1).kind == TokenKind::Equal => {
                    let key = self.parse_name()?;
                    self.advance();
                    let value = self.parse_expression()?;
                    TableField::Named { key, value }
                },
                _ => TableField::Array { value: self.parse_expression()? },
            };
            fields.push(field);

            if !self.match_kind(&TokenKind::Comma) && !self.match_kind(&TokenKind::Semicolon) {
                break;
            }
        }

        let close = self.expect_terminator(&TokenKind::RightBrace, "table constructor")?;
        Ok(Expr::Table { fields,
                         span: open.span.merge(close.span) })
    }

    /// Parses a plain identifier into an [`Ident`].
    pub(crate) fn parse_name(&mut self) -> ParseResult<Ident> {
        let token = self.expect(&TokenKind::Identifier)?;
        Ok(Ident { name: token.lexeme,
                   span: token.span, })
    }
}
