use crate::{
    error::{Diagnostics, LexError},
    interpreter::scanner::{Scanner, Span},
};

/// The syntactic category of a token.
///
/// String tokens carry their decoded content; every token's raw text is
/// available as its lexeme. Numeric tokens keep only the raw lexeme —
/// classification into integer or float happens in the parser.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Numeric literal; the lexeme holds the raw spelling.
    Number,
    /// String literal; the payload is the decoded content.
    Str {
        /// The content with escapes resolved.
        value: String,
    },
    /// `true` or `false`.
    Boolean(bool),
    /// `nil`.
    Nil,
    /// A name that is not a reserved word.
    Identifier,

    /// `if`
    If,
    /// `then`
    Then,
    /// `else`
    Else,
    /// `elseif`
    Elseif,
    /// `end`
    End,
    /// `while`
    While,
    /// `do`
    Do,
    /// `for`
    For,
    /// `in`
    In,
    /// `repeat`
    Repeat,
    /// `until`
    Until,
    /// `function`
    Function,
    /// `local`
    Local,
    /// `return`
    Return,
    /// `break`
    Break,
    /// `goto`
    Goto,
    /// `and`
    And,
    /// `or`
    Or,
    /// `not`
    Not,

    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `//`
    SlashSlash,
    /// `%`
    Percent,
    /// `^`
    Caret,
    /// `#`
    Hash,
    /// `=`
    Equal,
    /// `==`
    EqualEqual,
    /// `~=`
    TildeEqual,
    /// `<`
    Less,
    /// `<=`
    LessEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,
    /// `.`
    Dot,
    /// `..`
    DotDot,
    /// `...`
    Ellipsis,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `:`
    Colon,
    /// `::`
    DoubleColon,

    /// A line break (only emitted when newline skipping is off).
    Newline,
    /// A comment (only emitted when comment skipping is off).
    Comment,
    /// End of input; exactly one, always last, zero-width.
    Eof,
}

impl TokenKind {
    /// A short human-readable name, used in parser messages.
    #[must_use]
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::Number => "a number",
            Self::Str { .. } => "a string",
            Self::Boolean(_) => "a boolean",
            Self::Nil => "'nil'",
            Self::Identifier => "a name",
            Self::If => "'if'",
            Self::Then => "'then'",
            Self::Else => "'else'",
            Self::Elseif => "'elseif'",
            Self::End => "'end'",
            Self::While => "'while'",
            Self::Do => "'do'",
            Self::For => "'for'",
            Self::In => "'in'",
            Self::Repeat => "'repeat'",
            Self::Until => "'until'",
            Self::Function => "'function'",
            Self::Local => "'local'",
            Self::Return => "'return'",
            Self::Break => "'break'",
            Self::Goto => "'goto'",
            Self::And => "'and'",
            Self::Or => "'or'",
            Self::Not => "'not'",
            Self::Plus => "'+'",
            Self::Minus => "'-'",
            Self::Star => "'*'",
            Self::Slash => "'/'",
            Self::SlashSlash => "'//'",
            Self::Percent => "'%'",
            Self::Caret => "'^'",
            Self::Hash => "'#'",
            Self::Equal => "'='",
            Self::EqualEqual => "'=='",
            Self::TildeEqual => "'~='",
            Self::Less => "'<'",
            Self::LessEqual => "'<='",
            Self::Greater => "'>'",
            Self::GreaterEqual => "'>='",
            Self::Dot => "'.'",
            Self::DotDot => "'..'",
            Self::Ellipsis => "'...'",
            Self::LeftParen => "'('",
            Self::RightParen => "')'",
            Self::LeftBrace => "'{'",
            Self::RightBrace => "'}'",
            Self::LeftBracket => "'['",
            Self::RightBracket => "']'",
            Self::Comma => "','",
            Self::Semicolon => "';'",
            Self::Colon => "':'",
            Self::DoubleColon => "'::'",
            Self::Newline => "a line break",
            Self::Comment => "a comment",
            Self::Eof => "end of input",
        }
    }

    /// `true` for tokens the parser skips over (line breaks, comments).
    #[must_use]
    pub const fn is_trivia(&self) -> bool {
        matches!(self, Self::Newline | Self::Comment)
    }
}

/// A lexical token: its kind, the exact source substring it covers, and
/// its source range.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The syntactic category.
    pub kind:   TokenKind,
    /// The exact covered substring.
    pub lexeme: String,
    /// Where the token sits in the source.
    pub span:   Span,
}

impl Token {
    /// Creates a token from its three components.
    #[must_use]
    pub const fn new(kind: TokenKind, lexeme: String, span: Span) -> Self {
        Self { kind, lexeme, span }
    }
}

/// Options controlling which trivia tokens appear in the output stream.
#[derive(Debug, Clone, Copy)]
pub struct LexOptions {
    /// Drop COMMENT tokens (default true).
    pub skip_comments: bool,
    /// Drop NEWLINE tokens (default true).
    pub skip_newlines: bool,
}

impl Default for LexOptions {
    fn default() -> Self {
        Self { skip_comments: true,
               skip_newlines: true, }
    }
}

/// Maps an identifier lexeme to its keyword kind, if it is one.
fn keyword(lexeme: &str) -> Option<TokenKind> {
    let kind = match lexeme {
        "if" => TokenKind::If,
        "then" => TokenKind::Then,
        "else" => TokenKind::Else,
        "elseif" => TokenKind::Elseif,
        "end" => TokenKind::End,
        "while" => TokenKind::While,
        "do" => TokenKind::Do,
        "for" => TokenKind::For,
        "in" => TokenKind::In,
        "repeat" => TokenKind::Repeat,
        "until" => TokenKind::Until,
        "function" => TokenKind::Function,
        "local" => TokenKind::Local,
        "return" => TokenKind::Return,
        "break" => TokenKind::Break,
        "goto" => TokenKind::Goto,
        "and" => TokenKind::And,
        "or" => TokenKind::Or,
        "not" => TokenKind::Not,
        "true" => TokenKind::Boolean(true),
        "false" => TokenKind::Boolean(false),
        "nil" => TokenKind::Nil,
        _ => return None,
    };
    Some(kind)
}

/// Tokenizes `source` in a single pass.
///
/// The token sequence is in source order with non-overlapping,
/// monotonically non-decreasing byte ranges, terminated by exactly one
/// zero-width EOF token. Lexical faults are recorded in `diagnostics`
/// (severity error, source tag `lexer`) and scanning continues, so one
/// pass reports every fault in the input.
///
/// # Parameters
/// - `source`: The text to tokenize.
/// - `options`: Trivia emission control.
/// - `diagnostics`: Collector for lexical faults.
///
/// # Returns
/// The token vector, EOF included.
pub fn tokenize(source: &str, options: LexOptions, diagnostics: &mut Diagnostics) -> Vec<Token> {
    let mut lexer = Lexer { scanner: Scanner::new(source),
                            options,
                            diagnostics,
                            tokens: Vec::new() };
    lexer.run();
    lexer.tokens
}

struct Lexer<'src, 'diag> {
    scanner:     Scanner<'src>,
    options:     LexOptions,
    diagnostics: &'diag mut Diagnostics,
    tokens:      Vec<Token>,
}

impl Lexer<'_, '_> {
    fn run(&mut self) {
        while !self.scanner.is_at_end() {
            self.next_token();
        }
        let eof_span = Span::zero_width(self.scanner.position(), self.scanner.offset());
        self.tokens
            .push(Token::new(TokenKind::Eof, String::new(), eof_span));
    }

    fn push(&mut self, kind: TokenKind, span: Span) {
        let lexeme = self.scanner.slice(span).to_string();
        self.tokens.push(Token::new(kind, lexeme, span));
    }

    fn report(&mut self, error: &LexError) {
        self.diagnostics.error("lexer", error.to_string(), error.span());
    }

    /// Consumes one lexical element, pushing at most one token.
    fn next_token(&mut self) {
        let Some(c) = self.scanner.peek(0) else { return };
        let mark = self.scanner.mark();

        match c {
            ' ' | '\t' => {
                self.scanner.bump();
            },
            '\n' | '\r' => {
                self.scanner.bump();
                if c == '\r' && self.scanner.peek(0) == Some('\n') {
                    self.scanner.bump();
                }
                if !self.options.skip_newlines {
                    let span = self.scanner.span(mark);
                    self.push(TokenKind::Newline, span);
                }
            },
            '-' if self.scanner.starts_with("--") => self.read_comment(),
            '"' | '\'' => match self.scanner.read_string(c) {
                Ok(value) => {
                    let span = self.scanner.span(mark);
                    self.push(TokenKind::Str { value }, span);
                },
                Err(error) => self.report(&error),
            },
            '[' => {
                if let Some(level) = self.scanner.long_bracket_level() {
                    match self.scanner.read_long_string(level) {
                        Ok(value) => {
                            let span = self.scanner.span(mark);
                            self.push(TokenKind::Str { value }, span);
                        },
                        Err(error) => self.report(&error),
                    }
                } else {
                    self.scanner.bump();
                    let span = self.scanner.span(mark);
                    self.push(TokenKind::LeftBracket, span);
                }
            },
            _ if c.is_ascii_digit() => match self.scanner.read_number() {
                Ok(_) => {
                    let span = self.scanner.span(mark);
                    self.push(TokenKind::Number, span);
                },
                Err(error) => self.report(&error),
            },
            _ if Scanner::is_identifier_start(c) => {
                let text = self.scanner.read_identifier().to_string();
                let span = self.scanner.span(mark);
                let kind = keyword(&text).unwrap_or(TokenKind::Identifier);
                self.push(kind, span);
            },
            _ => self.read_operator(c),
        }
    }

    /// Consumes `--` followed by either a long-bracket body or the rest
    /// of the line.
    fn read_comment(&mut self) {
        let mark = self.scanner.mark();
        self.scanner.advance(2);

        if let Some(level) = self.scanner.long_bracket_level() {
            if let Err(error) = self.scanner.read_long_string(level) {
                self.report(&error);
                return;
            }
        } else {
            while let Some(c) = self.scanner.peek(0) {
                if c == '\n' || c == '\r' {
                    break;
                }
                self.scanner.bump();
            }
        }
        if !self.options.skip_comments {
            let span = self.scanner.span(mark);
            self.push(TokenKind::Comment, span);
        }
    }

    /// Matches single- and multi-character operators, longest first.
    fn read_operator(&mut self, c: char) {
        let mark = self.scanner.mark();

        // Multi-character operators share prefixes with shorter ones, so
        // the longest spelling is tried first.
        let matched = [("...", TokenKind::Ellipsis),
                       ("..", TokenKind::DotDot),
                       ("==", TokenKind::EqualEqual),
                       ("~=", TokenKind::TildeEqual),
                       ("<=", TokenKind::LessEqual),
                       (">=", TokenKind::GreaterEqual),
                       ("//", TokenKind::SlashSlash),
                       ("::", TokenKind::DoubleColon)].iter()
                                                      .find(|(text, _)| self.scanner.starts_with(text))
                                                      .cloned();
        if let Some((text, kind)) = matched {
            self.scanner.advance(text.len());
            let span = self.scanner.span(mark);
            self.push(kind, span);
            return;
        }

        let kind = match c {
            '+' => Some(TokenKind::Plus),
            '-' => Some(TokenKind::Minus),
            '*' => Some(TokenKind::Star),
            '/' => Some(TokenKind::Slash),
            '%' => Some(TokenKind::Percent),
            '^' => Some(TokenKind::Caret),
            '#' => Some(TokenKind::Hash),
            '=' => Some(TokenKind::Equal),
            '<' => Some(TokenKind::Less),
            '>' => Some(TokenKind::Greater),
            '.' => Some(TokenKind::Dot),
            '(' => Some(TokenKind::LeftParen),
            ')' => Some(TokenKind::RightParen),
            '{' => Some(TokenKind::LeftBrace),
            '}' => Some(TokenKind::RightBrace),
            ']' => Some(TokenKind::RightBracket),
            ',' => Some(TokenKind::Comma),
            ';' => Some(TokenKind::Semicolon),
            ':' => Some(TokenKind::Colon),
            _ => None,
        };

        match kind {
            Some(kind) => {
                self.scanner.bump();
                let span = self.scanner.span(mark);
                self.push(kind, span);
            },
            None => {
                // Unclassifiable character: report and advance one to
                // guarantee progress.
                self.scanner.bump();
                let span = self.scanner.span(mark);
                self.report(&LexError::UnexpectedChar { ch: c, span });
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds_of(source: &str) -> Vec<TokenKind> {
        let mut diagnostics = Diagnostics::new();
        let tokens = tokenize(source, LexOptions::default(), &mut diagnostics);
        assert!(!diagnostics.has_errors(), "{diagnostics}");
        tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn classifies_keywords_and_identifiers() {
        assert_eq!(kinds_of("if x then end"),
                   vec![TokenKind::If,
                        TokenKind::Identifier,
                        TokenKind::Then,
                        TokenKind::End,
                        TokenKind::Eof]);
    }

    #[test]
    fn longest_operator_wins() {
        assert_eq!(kinds_of("a ..= ... // :: ~="),
                   vec![TokenKind::Identifier,
                        TokenKind::DotDot,
                        TokenKind::Equal,
                        TokenKind::Ellipsis,
                        TokenKind::SlashSlash,
                        TokenKind::DoubleColon,
                        TokenKind::TildeEqual,
                        TokenKind::Eof]);
    }

    #[test]
    fn byte_ranges_select_lexemes() {
        let source = "local answer = 42";
        let mut diagnostics = Diagnostics::new();
        let tokens = tokenize(source, LexOptions::default(), &mut diagnostics);
        for token in &tokens {
            assert_eq!(&source[token.span.start_offset..token.span.end_offset],
                       token.lexeme);
        }
    }

    #[test]
    fn exactly_one_zero_width_eof() {
        let mut diagnostics = Diagnostics::new();
        let tokens = tokenize("x = 1", LexOptions::default(), &mut diagnostics);
        let eofs: Vec<_> = tokens.iter().filter(|t| t.kind == TokenKind::Eof).collect();
        assert_eq!(eofs.len(), 1);
        let eof = eofs[0];
        assert_eq!(eof.span.start_offset, eof.span.end_offset);
        assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
    }

    #[test]
    fn comments_are_skipped_by_default() {
        assert_eq!(kinds_of("x -- trailing\n--[[ block\ncomment ]] y"),
                   vec![TokenKind::Identifier, TokenKind::Identifier, TokenKind::Eof]);
    }

    #[test]
    fn newline_tokens_can_be_kept() {
        let mut diagnostics = Diagnostics::new();
        let options = LexOptions { skip_newlines: false,
                                   ..LexOptions::default() };
        let tokens = tokenize("a\r\nb", options, &mut diagnostics);
        let kinds: Vec<_> = tokens.into_iter().map(|t| t.kind).collect();
        assert_eq!(kinds,
                   vec![TokenKind::Identifier,
                        TokenKind::Newline,
                        TokenKind::Identifier,
                        TokenKind::Eof]);
    }

    #[test]
    fn strings_carry_decoded_values() {
        let mut diagnostics = Diagnostics::new();
        let tokens = tokenize(r#"'it\'s' [[raw\n]]"#, LexOptions::default(), &mut diagnostics);
        assert_eq!(tokens[0].kind,
                   TokenKind::Str { value: "it's".to_string() });
        assert_eq!(tokens[1].kind,
                   TokenKind::Str { value: r"raw\n".to_string() });
    }

    #[test]
    fn stray_characters_are_reported_and_skipped() {
        let mut diagnostics = Diagnostics::new();
        let tokens = tokenize("a ? b", LexOptions::default(), &mut diagnostics);
        assert_eq!(diagnostics.error_count(), 1);
        let kinds: Vec<_> = tokens.into_iter().map(|t| t.kind).collect();
        assert_eq!(kinds,
                   vec![TokenKind::Identifier, TokenKind::Identifier, TokenKind::Eof]);
    }
}
