use crate::{
    ast::{Expr, Ident, IfClause, Selector, Statement},
    error::SyntaxError,
    interpreter::{
        lexer::TokenKind,
        parser::{ParseResult, Parser},
    },
};

impl Parser<'_> {
    /// Parses a single statement, dispatching on the leading token.
    ///
    /// An optional trailing `;` is consumed after the statement.
    pub(crate) fn parse_statement(&mut self) -> ParseResult<Statement> {
        let statement = match self.current().kind {
            TokenKind::Local => self.parse_local()?,
            TokenKind::If => self.parse_if()?,
            TokenKind::While => self.parse_while()?,
            TokenKind::Repeat => self.parse_repeat()?,
            TokenKind::For => self.parse_for()?,
            TokenKind::Function => self.parse_function_declaration()?,
            TokenKind::Return => self.parse_return()?,
            TokenKind::Break => {
                let token = self.advance();
                Statement::Break { span: token.span }
            },
            TokenKind::Do => self.parse_do()?,
            TokenKind::Goto => self.parse_goto()?,
            TokenKind::DoubleColon => self.parse_label()?,
            _ => self.parse_expression_statement()?,
        };
        self.match_kind(&TokenKind::Semicolon);
        Ok(statement)
    }

    /// Parses statements until one of `terminators` (or the end of
    /// input) is in front of the cursor; the terminator itself is left
    /// for the caller.
    ///
    /// A fault inside the block is recorded and recovery continues
    /// within the block, so several faults per block get reported.
    pub(crate) fn parse_block(&mut self, terminators: &[TokenKind]) -> ParseResult<Vec<Statement>> {
        let mut body = Vec::new();
        loop {
            if self.at_end() || terminators.iter().any(|t| self.check(t)) {
                break;
            }
            match self.parse_statement() {
                Ok(statement) => body.push(statement),
                Err(error) => self.recover(&error),
            }
        }
        Ok(body)
    }

    /// `local name, … [= expr, …]` or `local function name(…) … end`.
    fn parse_local(&mut self) -> ParseResult<Statement> {
        let keyword = self.advance();

        if self.check(&TokenKind::Function) {
            self.advance();
            let name = self.parse_name()?;
            let name_expr = Expr::Identifier { name: name.name,
                                               span: name.span, };
            let (params, body, end_span) = self.parse_function_rest()?;
            return Ok(Statement::FunctionDeclaration { name:      name_expr,
                                                       params,
                                                       body,
                                                       is_local:  true,
                                                       is_method: false,
                                                       span:      keyword.span.merge(end_span), });
        }

        let mut variables = vec![self.parse_name()?];
        while self.match_kind(&TokenKind::Comma) {
            variables.push(self.parse_name()?);
        }

        let mut init = Vec::new();
        if self.match_kind(&TokenKind::Equal) {
            init = self.parse_expression_list()?;
        }

        let end_span = init.last()
                           .map_or_else(|| variables[variables.len() - 1].span, Expr::span);
        Ok(Statement::Local { variables,
                              init,
                              span: keyword.span.merge(end_span) })
    }

    /// `if … then … (elseif … then …)* (else …)? end`.
    fn parse_if(&mut self) -> ParseResult<Statement> {
        let keyword = self.advance();
        let mut clauses = Vec::new();

        let condition = self.parse_expression()?;
        self.expect(&TokenKind::Then)?;
        let body = self.parse_block(&[TokenKind::Elseif, TokenKind::Else, TokenKind::End])?;
        let clause_end = body.last().map_or_else(|| condition.span(), Statement::span);
        clauses.push(IfClause { condition: Some(condition),
                                body,
                                span: keyword.span.merge(clause_end) });

        loop {
            if self.check(&TokenKind::Elseif) {
                let start = self.advance();
                let condition = self.parse_expression()?;
                self.expect(&TokenKind::Then)?;
                let body = self.parse_block(&[TokenKind::Elseif, TokenKind::Else, TokenKind::End])?;
                let clause_end = body.last().map_or_else(|| condition.span(), Statement::span);
                clauses.push(IfClause { condition: Some(condition),
                                        body,
                                        span: start.span.merge(clause_end) });
            } else if self.check(&TokenKind::Else) {
                let start = self.advance();
                let body = self.parse_block(&[TokenKind::End])?;
                let clause_end = body.last().map_or(start.span, Statement::span);
                clauses.push(IfClause { condition: None,
                                        body,
                                        span: start.span.merge(clause_end) });
                break;
            } else {
                break;
            }
        }

        let end = self.expect_terminator(&TokenKind::End, "'if' statement")?;
        Ok(Statement::If { clauses,
                           span: keyword.span.merge(end.span) })
    }

    /// `while cond do body end`.
    fn parse_while(&mut self) -> ParseResult<Statement> {
        let keyword = self.advance();
        let condition = self.parse_expression()?;
        self.expect(&TokenKind::Do)?;
        let body = self.parse_block(&[TokenKind::End])?;
        let end = self.expect_terminator(&TokenKind::End, "'while' statement")?;
        Ok(Statement::While { condition,
                              body,
                              span: keyword.span.merge(end.span) })
    }

    /// `repeat body until cond`.
    fn parse_repeat(&mut self) -> ParseResult<Statement> {
        let keyword = self.advance();
        let body = self.parse_block(&[TokenKind::Until])?;
        self.expect_terminator(&TokenKind::Until, "'repeat' statement")?;
        let condition = self.parse_expression()?;
        let span = keyword.span.merge(condition.span());
        Ok(Statement::Repeat { body,
                               condition,
                               span })
    }

    /// Numeric `for name = start, stop [, step] do … end` or generic
    /// `for name, … in exprs do … end`, told apart by the token after
    /// the first name.
    fn parse_for(&mut self) -> ParseResult<Statement> {
        let keyword = self.advance();
        let first = self.parse_name()?;

        if self.match_kind(&TokenKind::Equal) {
            let start = self.parse_expression()?;
            self.expect(&TokenKind::Comma)?;
            let end_expr = self.parse_expression()?;
            let step = if self.match_kind(&TokenKind::Comma) {
                Some(self.parse_expression()?)
            } else {
                None
            };
            self.expect(&TokenKind::Do)?;
            let body = self.parse_block(&[TokenKind::End])?;
            let end = self.expect_terminator(&TokenKind::End, "'for' statement")?;
            return Ok(Statement::ForNumeric { variable: first,
                                              start,
                                              end: end_expr,
                                              step,
                                              body,
                                              span: keyword.span.merge(end.span) });
        }

        let mut variables = vec![first];
        while self.match_kind(&TokenKind::Comma) {
            variables.push(self.parse_name()?);
        }
        self.expect(&TokenKind::In)?;
        let iterators = self.parse_expression_list()?;
        self.expect(&TokenKind::Do)?;
        let body = self.parse_block(&[TokenKind::End])?;
        let end = self.expect_terminator(&TokenKind::End, "'for' statement")?;
        Ok(Statement::ForGeneric { variables,
                                   iterators,
                                   body,
                                   span: keyword.span.merge(end.span) })
    }

    /// `function a.b.c(…) … end` or `function a.b:c(…) … end`; the
    /// colon form declares an implicit leading `self` parameter.
    fn parse_function_declaration(&mut self) -> ParseResult<Statement> {
        let keyword = self.advance();

        let first = self.parse_name()?;
        let mut name = Expr::Identifier { name: first.name,
                                          span: first.span, };
        let mut is_method = false;
        while self.match_kind(&TokenKind::Dot) {
            let field = self.parse_name()?;
            let span = name.span().merge(field.span);
            name = Expr::Member { base:     Box::new(name),
                                  selector: Selector::Name(field),
                                  span };
        }
        let mut method_self = None;
        if self.match_kind(&TokenKind::Colon) {
            let field = self.parse_name()?;
            let span = name.span().merge(field.span);
            method_self = Some(Ident { name: "self".to_string(),
                                       span: field.span, });
            name = Expr::Member { base:     Box::new(name),
                                  selector: Selector::Name(field),
                                  span };
            is_method = true;
        }

        let (mut params, body, end_span) = self.parse_function_rest()?;
        if let Some(self_param) = method_self {
            params.insert(0, self_param);
        }

        Ok(Statement::FunctionDeclaration { name,
                                            params,
                                            body,
                                            is_local: false,
                                            is_method,
                                            span: keyword.span.merge(end_span) })
    }

    /// `return [expr, …]` — legal anywhere a statement is.
    fn parse_return(&mut self) -> ParseResult<Statement> {
        let keyword = self.advance();

        let done = self.at_end()
                   || matches!(self.current().kind,
                               TokenKind::End
                               | TokenKind::Else
                               | TokenKind::Elseif
                               | TokenKind::Until
                               | TokenKind::Semicolon);
        let arguments = if done { Vec::new() } else { self.parse_expression_list()? };

        let end_span = arguments.last().map_or(keyword.span, Expr::span);
        Ok(Statement::Return { arguments,
                               span: keyword.span.merge(end_span) })
    }

    /// `do body end`.
    fn parse_do(&mut self) -> ParseResult<Statement> {
        let keyword = self.advance();
        let body = self.parse_block(&[TokenKind::End])?;
        let end = self.expect_terminator(&TokenKind::End, "'do' block")?;
        Ok(Statement::Do { body,
                           span: keyword.span.merge(end.span) })
    }

    /// `goto name`.
    fn parse_goto(&mut self) -> ParseResult<Statement> {
        let keyword = self.advance();
        let name = self.parse_name()?;
        Ok(Statement::Goto { label: name.name,
                             span:  keyword.span.merge(name.span), })
    }

    /// `::name::`.
    fn parse_label(&mut self) -> ParseResult<Statement> {
        let open = self.advance();
        let name = self.parse_name()?;
        let close = self.expect(&TokenKind::DoubleColon)?;
        Ok(Statement::Label { name: name.name,
                              span: open.span.merge(close.span), })
    }

    /// A statement that begins with an expression: either an assignment
    /// (the next token is `,` or `=`) or a call used for its effect.
    /// Anything else is malformed — a bare expression is not a
    /// statement.
    fn parse_expression_statement(&mut self) -> ParseResult<Statement> {
        let first = self.parse_suffixed_expression()?;

        if self.check(&TokenKind::Comma) || self.check(&TokenKind::Equal) {
            let mut targets = vec![first];
            while self.match_kind(&TokenKind::Comma) {
                targets.push(self.parse_suffixed_expression()?);
            }
            self.expect(&TokenKind::Equal)?;
            let values = self.parse_expression_list()?;

            for target in &targets {
                if !target.is_assignable() {
                    return Err(SyntaxError::InvalidAssignmentTarget { span: target.span() });
                }
            }

            let span = targets[0].span().merge(values[values.len() - 1].span());
            return Ok(Statement::Assignment { targets,
                                              values,
                                              span });
        }

        if matches!(first, Expr::Call { .. }) {
            let span = first.span();
            return Ok(Statement::Expression { expr: first,
                                              span });
        }
        Err(SyntaxError::MalformedStatement { span: first.span() })
    }
}
