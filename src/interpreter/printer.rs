use crate::{ast::Program, error::PrintError};

/// Expression emission.
///
/// Renders every expression kind back to surface syntax, choosing
/// parentheses from the operator precedence table and quoting strings
/// per the configured style.
pub mod expression;
/// Statement emission.
///
/// Renders every statement kind: headers, indented bodies and
/// terminator keywords.
pub mod statement;

/// Result type used by the printer.
pub type PrintResult<T> = Result<T, PrintError>;

/// Which quotes string literals are rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuoteStyle {
    /// Always single quotes.
    Single,
    /// Always double quotes.
    Double,
    /// Single preferred; double when the content contains a single
    /// quote and no double quote.
    #[default]
    Auto,
}

/// Whether statements get trailing semicolons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Semicolons {
    /// No semicolons (the default).
    #[default]
    Omit,
    /// A semicolon after every statement.
    Insert,
}

/// Options controlling surface rendering.
#[derive(Debug, Clone)]
pub struct PrintOptions {
    /// One indentation unit (default two spaces).
    pub indent: String,
    /// Advisory line-length target; structural emission ignores it.
    pub max_line_length: usize,
    /// String quoting preference.
    pub quote_style: QuoteStyle,
    /// Statement-terminator policy.
    pub semicolons: Semicolons,
    /// End the output with a line break.
    pub insert_final_newline: bool,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self { indent: "  ".to_string(),
               max_line_length: 80,
               quote_style: QuoteStyle::default(),
               semicolons: Semicolons::default(),
               insert_final_newline: false, }
    }
}

/// Renders a program back to surface text.
///
/// The output is structurally faithful: re-parsing it yields an AST
/// equal to the input up to span information. Stylistic choices
/// (indentation, quotes, semicolons) follow `options`.
///
/// # Errors
/// `PrintError::InvalidIdentifier` when a name node holds text that is
/// not printable as an identifier in its position.
pub fn print(program: &Program, options: &PrintOptions) -> PrintResult<String> {
    let mut printer = Printer::new(options);
    for statement in &program.body {
        printer.print_statement(statement)?;
    }
    let mut out = printer.finish();
    if !options.insert_final_newline {
        while out.ends_with('\n') {
            out.pop();
        }
    }
    Ok(out)
}

/// The emitter: a write buffer plus the current indent level.
pub struct Printer<'opts> {
    options: &'opts PrintOptions,
    out:     String,
    level:   usize,
}

impl<'opts> Printer<'opts> {
    /// Creates an emitter at indent level zero.
    #[must_use]
    pub fn new(options: &'opts PrintOptions) -> Self {
        Self { options,
               out: String::new(),
               level: 0 }
    }

    /// Consumes the emitter and returns the rendered text.
    #[must_use]
    pub fn finish(self) -> String {
        self.out
    }

    pub(crate) fn options(&self) -> &PrintOptions {
        self.options
    }

    pub(crate) fn push(&mut self, text: &str) {
        self.out.push_str(text);
    }

    pub(crate) fn push_indent(&mut self) {
        for _ in 0..self.level {
            self.out.push_str(&self.options.indent);
        }
    }

    /// Ends a statement line: optional semicolon, then a line break.
    pub(crate) fn end_line(&mut self) {
        if self.options.semicolons == Semicolons::Insert {
            self.out.push(';');
        }
        self.out.push('\n');
    }

    /// Ends a non-statement line (block headers keep no semicolon).
    pub(crate) fn break_line(&mut self) {
        self.out.push('\n');
    }

    pub(crate) fn indented<T>(&mut self,
                              body: impl FnOnce(&mut Self) -> PrintResult<T>)
                              -> PrintResult<T> {
        self.level += 1;
        let result = body(self);
        self.level -= 1;
        result
    }
}

/// `true` when `name` can be printed as a bare identifier: identifier
/// characters only, not starting with a digit, and not a reserved word.
#[must_use]
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else { return false };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return false;
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return false;
    }
    !matches!(name,
              "if" | "then"
              | "else"
              | "elseif"
              | "end"
              | "while"
              | "do"
              | "for"
              | "in"
              | "repeat"
              | "until"
              | "function"
              | "local"
              | "return"
              | "break"
              | "goto"
              | "and"
              | "or"
              | "not"
              | "true"
              | "false"
              | "nil")
}
