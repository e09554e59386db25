use crate::error::LexError;

/// A line/column location in source text.
///
/// Both components are 1-based. Columns count Unicode scalar values, not
/// bytes, so a caret rendered at `column` lands under the right character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    /// 1-based line number.
    pub line:   u32,
    /// 1-based column number.
    pub column: u32,
}

impl Position {
    /// Creates a position from its two components.
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A half-open source range `[start_offset, end_offset)` with the
/// line/column positions of both ends.
///
/// Every token and every AST node carries one of these; the byte range
/// selects exactly the covered text out of the original source string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Position of the first covered character.
    pub start:        Position,
    /// Position one past the last covered character.
    pub end:          Position,
    /// Byte offset of the first covered byte.
    pub start_offset: usize,
    /// Byte offset one past the last covered byte.
    pub end_offset:   usize,
}

impl Span {
    /// Creates a span from its four components.
    #[must_use]
    pub const fn new(start: Position, end: Position, start_offset: usize, end_offset: usize) -> Self {
        Self { start,
               end,
               start_offset,
               end_offset }
    }

    /// Creates a zero-width span at a single position, used for the EOF
    /// token and for synthesized nodes.
    #[must_use]
    pub const fn zero_width(at: Position, offset: usize) -> Self {
        Self { start:        at,
               end:          at,
               start_offset: offset,
               end_offset:   offset, }
    }

    /// Produces the smallest span enclosing `self` and `other`.
    ///
    /// Parent AST nodes are spanned by merging the spans of their first
    /// and last children.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        let (start, start_offset) = if self.start_offset <= other.start_offset {
            (self.start, self.start_offset)
        } else {
            (other.start, other.start_offset)
        };
        let (end, end_offset) = if self.end_offset >= other.end_offset {
            (self.end, self.end_offset)
        } else {
            (other.end, other.end_offset)
        };
        Self { start,
               end,
               start_offset,
               end_offset }
    }

    /// Returns `true` when `other` lies entirely inside `self`.
    #[must_use]
    pub const fn encloses(&self, other: &Self) -> bool {
        self.start_offset <= other.start_offset && other.end_offset <= self.end_offset
    }
}

/// A snapshot of the scanner cursor, used to build a [`Span`] once the
/// covered text has been consumed.
#[derive(Debug, Clone, Copy)]
pub struct Mark {
    offset: usize,
    line:   u32,
    column: u32,
}

/// A cursor over source text.
///
/// The scanner tracks a byte offset, the current line and column, and the
/// byte offset at which every seen line starts (for O(1) line lookups when
/// diagnostics are rendered). It provides character-level predicates and
/// the atomic readers for identifiers, numbers, quoted strings and
/// long-bracket strings; the lexer drives it to produce tokens.
///
/// Line breaks recognized: LF, CR and CRLF. A CRLF pair counts as a single
/// line break spanning two bytes.
pub struct Scanner<'src> {
    src:         &'src str,
    offset:      usize,
    line:        u32,
    column:      u32,
    last_was_cr: bool,
    line_starts: Vec<usize>,
}

impl<'src> Scanner<'src> {
    /// Creates a scanner positioned at the start of `src`.
    #[must_use]
    pub fn new(src: &'src str) -> Self {
        Self { src,
               offset: 0,
               line: 1,
               column: 1,
               last_was_cr: false,
               line_starts: vec![0] }
    }

    /// Returns `true` once every character has been consumed.
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.offset >= self.src.len()
    }

    /// Looks ahead `k` characters without consuming; `peek(0)` is the
    /// next unconsumed character. Past the end of input, `None`.
    #[must_use]
    pub fn peek(&self, k: usize) -> Option<char> {
        self.src[self.offset..].chars().nth(k)
    }

    /// Returns `true` when the unconsumed input starts with `text`.
    #[must_use]
    pub fn starts_with(&self, text: &str) -> bool {
        self.src[self.offset..].starts_with(text)
    }

    /// Consumes one character and returns it, updating line and column
    /// bookkeeping. CR and LF each end a line; the LF of a CRLF pair does
    /// not end a second one.
    pub fn bump(&mut self) -> Option<char> {
        let c = self.peek(0)?;
        self.offset += c.len_utf8();
        match c {
            '\r' => {
                self.line += 1;
                self.column = 1;
                self.last_was_cr = true;
                self.line_starts.push(self.offset);
            },
            '\n' => {
                if self.last_was_cr {
                    // Second half of a CRLF: the break was already counted,
                    // but the line actually starts after the LF byte.
                    if let Some(last) = self.line_starts.last_mut() {
                        *last = self.offset;
                    }
                } else {
                    self.line += 1;
                    self.line_starts.push(self.offset);
                }
                self.column = 1;
                self.last_was_cr = false;
            },
            _ => {
                self.column += 1;
                self.last_was_cr = false;
            },
        }
        Some(c)
    }

    /// Consumes `n` characters.
    pub fn advance(&mut self, n: usize) {
        for _ in 0..n {
            if self.bump().is_none() {
                break;
            }
        }
    }

    /// The current cursor position.
    #[must_use]
    pub const fn position(&self) -> Position {
        Position { line:   self.line,
                   column: self.column, }
    }

    /// The current byte offset.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// The byte offset at which the 1-based `line` starts, for lines
    /// the cursor has already passed. O(1) per query.
    #[must_use]
    pub fn line_start(&self, line: u32) -> Option<usize> {
        self.line_starts.get(line.checked_sub(1)? as usize).copied()
    }

    /// Snapshots the cursor so a span can be built later.
    #[must_use]
    pub const fn mark(&self) -> Mark {
        Mark { offset: self.offset,
               line:   self.line,
               column: self.column, }
    }

    /// Builds the span from a [`Mark`] to the current cursor.
    #[must_use]
    pub const fn span(&self, mark: Mark) -> Span {
        Span { start:        Position::new(mark.line, mark.column),
               end:          Position::new(self.line, self.column),
               start_offset: mark.offset,
               end_offset:   self.offset, }
    }

    /// The source text covered by a span.
    #[must_use]
    pub fn slice(&self, span: Span) -> &'src str {
        &self.src[span.start_offset..span.end_offset]
    }

    /// Returns `true` when `c` can start an identifier.
    #[must_use]
    pub const fn is_identifier_start(c: char) -> bool {
        c.is_ascii_alphabetic() || c == '_'
    }

    /// Returns `true` when `c` can continue an identifier.
    #[must_use]
    pub const fn is_identifier_continue(c: char) -> bool {
        c.is_ascii_alphanumeric() || c == '_'
    }

    /// Consumes an identifier (one ident-start character followed by any
    /// number of ident-continue characters) and returns its text.
    ///
    /// The caller must have checked that the next character is an
    /// ident-start.
    pub fn read_identifier(&mut self) -> &'src str {
        let mark = self.mark();
        while let Some(c) = self.peek(0) {
            if Self::is_identifier_continue(c) {
                self.bump();
            } else {
                break;
            }
        }
        self.slice(self.span(mark))
    }

    /// Consumes a numeric literal and returns its raw text.
    ///
    /// Accepts a decimal literal with an optional fractional part and an
    /// optional signed exponent, or a hexadecimal literal prefixed by
    /// `0x`/`0X`. The raw lexeme is kept; classification into integer or
    /// float happens later.
    ///
    /// # Errors
    /// `LexError::InvalidNumber` when an exponent marker has no digits or
    /// a hex prefix has no hex digits.
    pub fn read_number(&mut self) -> Result<&'src str, LexError> {
        let mark = self.mark();

        if self.starts_with("0x") || self.starts_with("0X") {
            self.advance(2);
            let mut digits = 0;
            while let Some(c) = self.peek(0) {
                if c.is_ascii_hexdigit() {
                    self.bump();
                    digits += 1;
                } else {
                    break;
                }
            }
            let span = self.span(mark);
            if digits == 0 {
                return Err(LexError::InvalidNumber { lexeme: self.slice(span).to_string(),
                                                     span });
            }
            return Ok(self.slice(span));
        }

        while self.peek(0).is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
        if self.peek(0) == Some('.') && self.peek(1).is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
            while self.peek(0).is_some_and(|c| c.is_ascii_digit()) {
                self.bump();
            }
        }
        if matches!(self.peek(0), Some('e' | 'E')) {
            let after_sign = match self.peek(1) {
                Some('+' | '-') => self.peek(2),
                other => other,
            };
            if after_sign.is_some_and(|c| c.is_ascii_digit()) {
                self.bump();
                if matches!(self.peek(0), Some('+' | '-')) {
                    self.bump();
                }
                while self.peek(0).is_some_and(|c| c.is_ascii_digit()) {
                    self.bump();
                }
            } else {
                self.bump();
                let span = self.span(mark);
                return Err(LexError::InvalidNumber { lexeme: self.slice(span).to_string(),
                                                     span });
            }
        }

        Ok(self.slice(self.span(mark)))
    }

    /// Consumes a quoted string (the opening quote has not been consumed
    /// yet) and returns the decoded content.
    ///
    /// Escape sequences interpreted: `\n \r \t \b \f \a \v \\ \" \'` and
    /// decimal `\ddd` with one to three digits and a value of at most 255.
    ///
    /// # Errors
    /// - `LexError::UnterminatedString` when the input (or the line, for a
    ///   raw line break inside the literal) ends before the closing quote.
    /// - `LexError::InvalidEscape` on an unknown escape character or a
    ///   numeric escape above 255.
    pub fn read_string(&mut self, quote: char) -> Result<String, LexError> {
        let mark = self.mark();
        self.bump();

        let mut decoded = String::new();
        loop {
            let Some(c) = self.peek(0) else {
                return Err(LexError::UnterminatedString { span: self.span(mark) });
            };
            match c {
                _ if c == quote => {
                    self.bump();
                    return Ok(decoded);
                },
                '\n' | '\r' => {
                    return Err(LexError::UnterminatedString { span: self.span(mark) });
                },
                '\\' => {
                    let escape_mark = self.mark();
                    self.bump();
                    decoded.push(self.read_escape(mark, escape_mark)?);
                },
                _ => {
                    self.bump();
                    decoded.push(c);
                },
            }
        }
    }

    /// Decodes one escape sequence. `escape_mark` sits at the backslash,
    /// which has already been consumed.
    fn read_escape(&mut self, string_mark: Mark, escape_mark: Mark) -> Result<char, LexError> {
        let Some(c) = self.bump() else {
            return Err(LexError::UnterminatedString { span: self.span(string_mark) });
        };
        let decoded = match c {
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'b' => '\u{0008}',
            'f' => '\u{000C}',
            'a' => '\u{0007}',
            'v' => '\u{000B}',
            '\\' => '\\',
            '"' => '"',
            '\'' => '\'',
            '0'..='9' => {
                let mut value = u32::from(c) - u32::from('0');
                let mut digits = 1;
                while digits < 3 && self.peek(0).is_some_and(|d| d.is_ascii_digit()) {
                    let d = self.bump().unwrap_or('0');
                    value = value * 10 + (u32::from(d) - u32::from('0'));
                    digits += 1;
                }
                if value > 255 {
                    let span = self.span(escape_mark);
                    return Err(LexError::InvalidEscape { escape: self.slice(span).to_string(),
                                                         span });
                }
                char::from(u8::try_from(value).unwrap_or(0))
            },
            _ => {
                let span = self.span(escape_mark);
                return Err(LexError::InvalidEscape { escape: self.slice(span).to_string(),
                                                     span });
            },
        };
        Ok(decoded)
    }

    /// Returns the level of a long-bracket opener at the cursor, if one
    /// starts here: `[` followed by `k` equals signs and another `[`.
    #[must_use]
    pub fn long_bracket_level(&self) -> Option<usize> {
        if self.peek(0) != Some('[') {
            return None;
        }
        let mut k = 0;
        while self.peek(1 + k) == Some('=') {
            k += 1;
        }
        if self.peek(1 + k) == Some('[') {
            Some(k)
        } else {
            None
        }
    }

    /// Consumes a long-bracket string `[=*[ ... ]=*]` and returns its
    /// content. No escape processing happens inside. A newline immediately
    /// after the opening bracket is dropped, per the reference rule.
    ///
    /// The caller must have verified the opener with
    /// [`Self::long_bracket_level`].
    ///
    /// # Errors
    /// `LexError::UnterminatedLongString` when the matching closer is
    /// missing.
    pub fn read_long_string(&mut self, level: usize) -> Result<String, LexError> {
        let mark = self.mark();
        self.advance(level + 2);

        if self.peek(0) == Some('\r') {
            self.bump();
            if self.peek(0) == Some('\n') {
                self.bump();
            }
        } else if self.peek(0) == Some('\n') {
            self.bump();
        }

        let mut closer = String::with_capacity(level + 2);
        closer.push(']');
        for _ in 0..level {
            closer.push('=');
        }
        closer.push(']');

        let content_mark = self.mark();
        loop {
            if self.is_at_end() {
                return Err(LexError::UnterminatedLongString { span: self.span(mark) });
            }
            if self.starts_with(&closer) {
                let content = self.slice(self.span(content_mark)).to_string();
                self.advance(closer.chars().count());
                return Ok(content);
            }
            self.bump();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_lines_and_columns_across_break_styles() {
        let mut scanner = Scanner::new("a\nb\r\nc\rd");
        assert_eq!(scanner.position(), Position::new(1, 1));
        scanner.advance(2); // a, LF
        assert_eq!(scanner.position(), Position::new(2, 1));
        scanner.advance(3); // b, CR, LF
        assert_eq!(scanner.position(), Position::new(3, 1));
        scanner.advance(2); // c, CR
        assert_eq!(scanner.position(), Position::new(4, 1));
        assert_eq!(scanner.bump(), Some('d'));
        assert!(scanner.is_at_end());

        assert_eq!(scanner.line_start(1), Some(0));
        assert_eq!(scanner.line_start(2), Some(2));
        assert_eq!(scanner.line_start(3), Some(5)); // past the CRLF pair
        assert_eq!(scanner.line_start(4), Some(7));
        assert_eq!(scanner.line_start(5), None);
    }

    #[test]
    fn spans_select_their_lexeme() {
        let src = "hello world";
        let mut scanner = Scanner::new(src);
        let mark = scanner.mark();
        scanner.advance(5);
        let span = scanner.span(mark);
        assert_eq!(&src[span.start_offset..span.end_offset], "hello");
        assert_eq!(span.start, Position::new(1, 1));
        assert_eq!(span.end, Position::new(1, 6));
    }

    #[test]
    fn reads_identifiers_and_numbers() {
        let mut scanner = Scanner::new("foo_1 0x1F 1.5e-3");
        assert_eq!(scanner.read_identifier(), "foo_1");
        scanner.bump();
        assert_eq!(scanner.read_number().unwrap(), "0x1F");
        scanner.bump();
        assert_eq!(scanner.read_number().unwrap(), "1.5e-3");
    }

    #[test]
    fn decodes_escapes() {
        let mut scanner = Scanner::new(r#""a\n\t\65\\""#);
        assert_eq!(scanner.read_string('"').unwrap(), "a\n\tA\\");
    }

    #[test]
    fn rejects_oversized_decimal_escape() {
        let mut scanner = Scanner::new(r#""\999""#);
        assert!(matches!(scanner.read_string('"'),
                         Err(LexError::InvalidEscape { .. })));
    }

    #[test]
    fn reads_long_strings_without_escape_processing() {
        let mut scanner = Scanner::new("[==[line\\n]]]==]");
        let level = scanner.long_bracket_level().unwrap();
        assert_eq!(level, 2);
        assert_eq!(scanner.read_long_string(level).unwrap(), "line\\n]]");
    }

    #[test]
    fn unterminated_string_is_reported() {
        let mut scanner = Scanner::new("\"abc");
        assert!(matches!(scanner.read_string('"'),
                         Err(LexError::UnterminatedString { .. })));
    }
}
