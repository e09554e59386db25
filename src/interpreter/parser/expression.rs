use crate::{
    ast::{BinaryOperator, Expr, UnaryOperator},
    interpreter::{
        lexer::TokenKind,
        parser::{ParseResult, Parser},
    },
};

/// Associativity of a binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Assoc {
    Left,
    Right,
}

/// Precedence of the prefix operators `not`, unary `-` and `#`. Only
/// `^` sits above them, so `-a^b` reads as `-(a^b)`.
const UNARY_PRECEDENCE: u8 = 7;

/// Maps a token to its binary operator, precedence level and
/// associativity.
///
/// Levels, low to high: `or` < `and` < comparison < `..` < `+ -` <
/// `* / // %` < prefix < `^`.
const fn infix_operator(kind: &TokenKind) -> Option<(BinaryOperator, u8, Assoc)> {
    let entry = match kind {
        TokenKind::Or => (BinaryOperator::Or, 1, Assoc::Left),
        TokenKind::And => (BinaryOperator::And, 2, Assoc::Left),
        TokenKind::Less => (BinaryOperator::Less, 3, Assoc::Left),
        TokenKind::Greater => (BinaryOperator::Greater, 3, Assoc::Left),
        TokenKind::LessEqual => (BinaryOperator::LessEqual, 3, Assoc::Left),
        TokenKind::GreaterEqual => (BinaryOperator::GreaterEqual, 3, Assoc::Left),
        TokenKind::EqualEqual => (BinaryOperator::Equal, 3, Assoc::Left),
        TokenKind::TildeEqual => (BinaryOperator::NotEqual, 3, Assoc::Left),
        TokenKind::DotDot => (BinaryOperator::Concat, 4, Assoc::Right),
        TokenKind::Plus => (BinaryOperator::Add, 5, Assoc::Left),
        TokenKind::Minus => (BinaryOperator::Sub, 5, Assoc::Left),
        TokenKind::Star => (BinaryOperator::Mul, 6, Assoc::Left),
        TokenKind::Slash => (BinaryOperator::Div, 6, Assoc::Left),
        TokenKind::SlashSlash => (BinaryOperator::FloorDiv, 6, Assoc::Left),
        TokenKind::Percent => (BinaryOperator::Mod, 6, Assoc::Left),
        TokenKind::Caret => (BinaryOperator::Pow, 8, Assoc::Right),
        _ => return None,
    };
    Some(entry)
}

/// The precedence level and left/right binding strengths of `op`, used
/// by the printer to decide parenthesization. The boolean is `true` for
/// right-associative operators.
#[must_use]
pub const fn operator_precedence(op: BinaryOperator) -> (u8, bool) {
    match op {
        BinaryOperator::Or => (1, false),
        BinaryOperator::And => (2, false),
        BinaryOperator::Less
        | BinaryOperator::Greater
        | BinaryOperator::LessEqual
        | BinaryOperator::GreaterEqual
        | BinaryOperator::Equal
        | BinaryOperator::NotEqual => (3, false),
        BinaryOperator::Concat => (4, true),
        BinaryOperator::Add | BinaryOperator::Sub => (5, false),
        BinaryOperator::Mul
        | BinaryOperator::Div
        | BinaryOperator::FloorDiv
        | BinaryOperator::Mod => (6, false),
        BinaryOperator::Pow => (8, true),
    }
}

/// Precedence level of the prefix operators, for the printer.
#[must_use]
pub const fn unary_precedence() -> u8 {
    UNARY_PRECEDENCE
}

impl Parser<'_> {
    /// Parses a full expression, starting at the lowest precedence
    /// level.
    pub(crate) fn parse_expression(&mut self) -> ParseResult<Expr> {
        self.parse_binary(1)
    }

    /// Precedence climbing: parses operand chains whose operators bind
    /// at least as tightly as `min_precedence`.
    ///
    /// A left-associative operator parses its right operand one level
    /// tighter than itself; a right-associative one parses it at its own
    /// level, so `a .. b .. c` reads as `a .. (b .. c)`.
    fn parse_binary(&mut self, min_precedence: u8) -> ParseResult<Expr> {
        let mut left = self.parse_unary()?;

        loop {
            let Some((op, precedence, assoc)) = infix_operator(&self.current().kind) else {
                break;
            };
            if precedence < min_precedence {
                break;
            }
            self.advance();

            let next_min = if assoc == Assoc::Left { precedence + 1 } else { precedence };
            let right = self.parse_binary(next_min)?;

            let span = left.span().merge(right.span());
            left = Expr::Binary { op,
                                  left: Box::new(left),
                                  right: Box::new(right),
                                  span };
        }

        Ok(left)
    }

    /// Parses a prefix operator application, or falls through to a
    /// suffixed primary expression.
    ///
    /// The operand is parsed at the `^` level, which is the only
    /// operator binding tighter than a prefix operator.
    fn parse_unary(&mut self) -> ParseResult<Expr> {
        let op = match self.current().kind {
            TokenKind::Not => UnaryOperator::Not,
            TokenKind::Minus => UnaryOperator::Negate,
            TokenKind::Hash => UnaryOperator::Length,
            _ => return self.parse_suffixed_expression(),
        };
        let op_span = self.advance().span;
        let argument = self.parse_binary(UNARY_PRECEDENCE + 1)?;

        let span = op_span.merge(argument.span());
        Ok(Expr::Unary { op,
                         argument: Box::new(argument),
                         span })
    }

    /// Parses a comma-separated expression list with at least one
    /// element.
    pub(crate) fn parse_expression_list(&mut self) -> ParseResult<Vec<Expr>> {
        let mut list = vec![self.parse_expression()?];
        while self.match_kind(&TokenKind::Comma) {
            list.push(self.parse_expression()?);
        }
        Ok(list)
    }
}
