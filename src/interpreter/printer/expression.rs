use crate::{
    ast::{Expr, LiteralValue, Selector, TableField, UnaryOperator},
    error::PrintError,
    interpreter::{
        parser::expression::{operator_precedence, unary_precedence},
        printer::{PrintResult, Printer, QuoteStyle, is_valid_identifier},
    },
    util::num::float_to_text,
};

/// Where an operand sits relative to its parent operator, for the
/// parenthesization rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

impl Printer<'_> {
    /// Prints an expression in a neutral context (no parent operator).
    pub(crate) fn print_expr(&mut self, expr: &Expr) -> PrintResult<()> {
        self.print_operand(expr, 0, Side::Left, false)
    }

    /// Prints an expression as the operand of an operator with
    /// precedence `parent`.
    ///
    /// The operand is parenthesized when its own precedence is lower
    /// than the parent's, or equal while it sits on the parent's
    /// non-associative side.
    fn print_operand(&mut self,
                     expr: &Expr,
                     parent: u8,
                     side: Side,
                     parent_right_assoc: bool)
                     -> PrintResult<()> {
        let own = match expr {
            Expr::Binary { op, .. } => Some(operator_precedence(*op).0),
            Expr::Unary { .. } => Some(unary_precedence()),
            _ => None,
        };

        let needs_parens = match own {
            Some(own) => {
                let non_assoc_side = if parent_right_assoc { Side::Left } else { Side::Right };
                own < parent || (own == parent && side == non_assoc_side)
            },
            None => false,
        };

        if needs_parens {
            self.push("(");
        }
        self.print_bare_expr(expr)?;
        if needs_parens {
            self.push(")");
        }
        Ok(())
    }

    /// Prints an expression with no outer parenthesization concerns.
    fn print_bare_expr(&mut self, expr: &Expr) -> PrintResult<()> {
        match expr {
            Expr::Literal { value, raw, .. } => {
                self.print_literal(value, raw);
                Ok(())
            },
            Expr::Identifier { name, span } => {
                if !is_valid_identifier(name) {
                    return Err(PrintError::InvalidIdentifier { name: name.clone(),
                                                               span: *span, });
                }
                self.push(name);
                Ok(())
            },
            Expr::Unary { op, argument, .. } => self.print_unary(*op, argument),
            Expr::Binary { op, left, right, .. } => {
                let (precedence, right_assoc) = operator_precedence(*op);
                self.print_operand(left, precedence, Side::Left, right_assoc)?;
                self.push(&format!(" {op} "));
                self.print_operand(right, precedence, Side::Right, right_assoc)
            },
            Expr::Function { params, body, .. } => {
                self.push("function(");
                self.print_params(params, false)?;
                self.push(")");
                self.break_line();
                self.indented(|p| p.print_block(body))?;
                self.push_indent();
                self.push("end");
                Ok(())
            },
            Expr::Call { callee, arguments, is_method, .. } => {
                self.print_call(callee, arguments, *is_method)
            },
            Expr::Member { base, selector, .. } => {
                self.print_prefix(base)?;
                self.print_selector(selector)
            },
            Expr::Table { fields, .. } => self.print_table(fields),
        }
    }

    /// Prints a call; method calls restore the `base:name(args)` sugar.
    fn print_call(&mut self, callee: &Expr, arguments: &[Expr], is_method: bool) -> PrintResult<()> {
        if is_method {
            if let Expr::Member { base, selector: Selector::Name(name), .. } = callee {
                self.print_prefix(base)?;
                self.push(":");
                self.push(&name.name);
            } else {
                // A method call with a computed callee cannot use the
                // sugar; fall back to the plain form.
                self.print_prefix(callee)?;
            }
        } else {
            self.print_prefix(callee)?;
        }
        self.push("(");
        for (index, argument) in arguments.iter().enumerate() {
            if index > 0 {
                self.push(", ");
            }
            self.print_expr(argument)?;
        }
        self.push(")");
        Ok(())
    }

    /// Prints the base of a call or member access. Bases that are not
    /// themselves prefix-expressions (literals, operators, functions,
    /// tables) are parenthesized so the suffix binds to the whole
    /// expression when re-parsed.
    pub(crate) fn print_prefix(&mut self, base: &Expr) -> PrintResult<()> {
        let is_prefix = matches!(base,
                                 Expr::Identifier { .. } | Expr::Member { .. } | Expr::Call { .. });
        if is_prefix {
            self.print_bare_expr(base)
        } else {
            self.push("(");
            self.print_bare_expr(base)?;
            self.push(")");
            Ok(())
        }
    }

    /// Prints `.name` or `[expr]`. A name that is not a valid
    /// identifier falls back to the bracketed-string form.
    fn print_selector(&mut self, selector: &Selector) -> PrintResult<()> {
        match selector {
            Selector::Name(name) => {
                if is_valid_identifier(&name.name) {
                    self.push(".");
                    self.push(&name.name);
                } else {
                    self.push("[");
                    let encoded = self.encode_string(&name.name);
                    self.push(&encoded);
                    self.push("]");
                }
                Ok(())
            },
            Selector::Computed(key) => {
                self.push("[");
                self.print_expr(key)?;
                self.push("]");
                Ok(())
            },
        }
    }

    /// Prints a unary application: the operator, a space, then the
    /// argument — except `#` directly in front of a bare identifier.
    fn print_unary(&mut self, op: UnaryOperator, argument: &Expr) -> PrintResult<()> {
        match op {
            UnaryOperator::Not => self.push("not "),
            UnaryOperator::Negate => self.push("- "),
            UnaryOperator::Length => {
                if matches!(argument, Expr::Identifier { .. }) {
                    self.push("#");
                } else {
                    self.push("# ");
                }
            },
        }
        // The operand binds at the `^` level: anything looser gets
        // parentheses so `not (a == b)` survives a round trip, while a
        // `^` chain stays bare (`- a ^ b` reads as `-(a ^ b)` already).
        self.print_operand(argument, unary_precedence() + 1, Side::Right, true)
    }

    /// Prints a table constructor: empty as `{}`, otherwise one field
    /// per indented line.
    fn print_table(&mut self, fields: &[TableField]) -> PrintResult<()> {
        if fields.is_empty() {
            self.push("{}");
            return Ok(());
        }

        self.push("{");
        self.break_line();
        self.indented(|p| {
                for (index, field) in fields.iter().enumerate() {
                    p.push_indent();
                    match field {
                        TableField::Array { value } => p.print_expr(value)?,
                        TableField::Named { key, value } => {
                            if is_valid_identifier(&key.name) {
                                p.push(&key.name);
                            } else {
                                p.push("[");
                                let encoded = p.encode_string(&key.name);
                                p.push(&encoded);
                                p.push("]");
                            }
                            p.push(" = ");
                            p.print_expr(value)?;
                        },
                        TableField::Computed { key, value } => {
                            p.push("[");
                            p.print_expr(key)?;
                            p.push("] = ");
                            p.print_expr(value)?;
                        },
                    }
                    if index + 1 < fields.len() {
                        p.push(",");
                    }
                    p.break_line();
                }
                Ok(())
            })?;
        self.push_indent();
        self.push("}");
        Ok(())
    }

    /// Prints a literal. Numbers keep their source spelling when one is
    /// available; synthesized nodes fall back to the canonical form.
    fn print_literal(&mut self, value: &LiteralValue, raw: &str) {
        match value {
            LiteralValue::Nil => self.push("nil"),
            LiteralValue::Bool(true) => self.push("true"),
            LiteralValue::Bool(false) => self.push("false"),
            LiteralValue::Integer(n) => {
                if raw.is_empty() {
                    self.push(&n.to_string());
                } else {
                    self.push(raw);
                }
            },
            LiteralValue::Float(f) => {
                if raw.is_empty() {
                    self.push(&float_to_text(*f));
                } else {
                    self.push(raw);
                }
            },
            LiteralValue::Str(s) => {
                let encoded = self.encode_string(s);
                self.push(&encoded);
            },
        }
    }

    /// Encodes string content per the configured quote style. Content
    /// with line breaks and no other control characters uses the
    /// long-bracket form with the minimal level whose closer does not
    /// appear in the content.
    pub(crate) fn encode_string(&self, content: &str) -> String {
        let has_newline = content.contains('\n') || content.contains('\r');
        let has_other_control = content.chars().any(|c| c.is_control() && c != '\n');

        if has_newline && !has_other_control && !content.contains('\r') {
            let level = minimal_bracket_level(content);
            let equals = "=".repeat(level);
            // The leading line break is dropped when re-parsed.
            return format!("[{equals}[\n{content}]{equals}]");
        }

        let quote = match self.options().quote_style {
            QuoteStyle::Single => '\'',
            QuoteStyle::Double => '"',
            QuoteStyle::Auto => {
                if content.contains('\'') && !content.contains('"') {
                    '"'
                } else {
                    '\''
                }
            },
        };

        let mut out = String::with_capacity(content.len() + 2);
        out.push(quote);
        for c in content.chars() {
            match c {
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                c if c == quote => {
                    out.push('\\');
                    out.push(c);
                },
                c if c.is_control() => {
                    // Always three digits, so a digit following the
                    // escape cannot be absorbed into it.
                    out.push_str(&format!("\\{:03}", c as u32));
                },
                c => out.push(c),
            }
        }
        out.push(quote);
        out
    }
}

/// The smallest `k` such that `]` + `=`×k + `]` does not occur in
/// `content`. The check runs over the content with the closing bracket
/// appended, so a trailing `]` in the content cannot fuse with the
/// closer.
fn minimal_bracket_level(content: &str) -> usize {
    let mut level = 0;
    loop {
        let closer = format!("]{}]", "=".repeat(level));
        let mut probe = content.to_string();
        probe.push(']');
        if !probe.contains(&closer) {
            return level;
        }
        level += 1;
    }
}
