//! The lexical error raised by the path-expression tokenizer.
//!
//! The tokenizer itself lives outside this crate. Accessors that trigger a
//! nested evaluation may fail with a [`LexicalError`]; the access layer then
//! surfaces it unmodified as [`ReflectError::Lexical`](crate::ReflectError).

use alloc::string::{String, ToString};
use core::fmt::{self, Write};

// -----------------------------------------------------------------------------
// LexicalErrorReason

/// Why the tokenizer gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexicalErrorReason {
    /// An unexpected character or end of input.
    LexicalError,
    /// A second instance of a static tokenizer was requested.
    StaticLexerError,
    /// The tokenizer was switched into a state it does not have.
    InvalidLexicalState,
    /// The tokenizer matched an empty token in a loop.
    LoopDetected,
}

impl LexicalErrorReason {
    /// The numeric code the generated tokenizer uses for this reason.
    #[inline]
    pub const fn code(self) -> u8 {
        match self {
            Self::LexicalError => 0,
            Self::StaticLexerError => 1,
            Self::InvalidLexicalState => 2,
            Self::LoopDetected => 3,
        }
    }
}

// -----------------------------------------------------------------------------
// LexicalError

/// A structured tokenizer failure.
///
/// # Examples
///
/// ```
/// use np_reflect::lexical::{LexicalError, LexicalErrorReason};
///
/// let error = LexicalError::new(false, 0, 1, 5, "a/b", '$', LexicalErrorReason::LexicalError);
///
/// assert_eq!(error.position(), 4);
/// assert_eq!(
///     error.to_string(),
///     "Lexical error at line 1, column 5.  Encountered: \"$\" (36), after : \"a/b\"",
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexicalError {
    eof_seen: bool,
    lex_state: u32,
    line: u32,
    column: u32,
    after: String,
    character: char,
    reason: LexicalErrorReason,
}

impl LexicalError {
    pub fn new(
        eof_seen: bool,
        lex_state: u32,
        line: u32,
        column: u32,
        after: impl Into<String>,
        character: char,
        reason: LexicalErrorReason,
    ) -> Self {
        Self {
            eof_seen,
            lex_state,
            line,
            column,
            after: after.into(),
            character,
            reason,
        }
    }

    #[inline]
    pub fn eof_seen(&self) -> bool {
        self.eof_seen
    }

    #[inline]
    pub fn lex_state(&self) -> u32 {
        self.lex_state
    }

    #[inline]
    pub fn line(&self) -> u32 {
        self.line
    }

    #[inline]
    pub fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based offset of the offending character within its line.
    #[inline]
    pub fn position(&self) -> u32 {
        self.column.saturating_sub(1)
    }

    /// The text consumed before the failure.
    #[inline]
    pub fn after(&self) -> &str {
        &self.after
    }

    #[inline]
    pub fn character(&self) -> char {
        self.character
    }

    #[inline]
    pub fn reason(&self) -> LexicalErrorReason {
        self.reason
    }
}

impl fmt::Display for LexicalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lexical error at line {}, column {}.  Encountered: ",
            self.line, self.column
        )?;
        if self.eof_seen {
            f.write_str("<EOF> ")?;
        } else {
            f.write_char('"')?;
            write_escaped(f, self.character)?;
            write!(f, "\" ({}), ", u32::from(self.character))?;
        }
        write!(f, "after : \"{}\"", Escaped(&self.after))
    }
}

impl core::error::Error for LexicalError {}

// -----------------------------------------------------------------------------
// Escaping

/// Escapes `text` the way tokenizer diagnostics print it.
///
/// NUL characters are dropped, the usual control characters use their
/// backslash forms, and everything outside printable ASCII becomes one
/// `\uXXXX` sequence per UTF-16 unit.
///
/// # Examples
///
/// ```
/// use np_reflect::lexical::escape_lexical;
///
/// assert_eq!(escape_lexical("a\tb\0\"é"), "a\\tb\\\"\\u00e9");
/// ```
#[inline]
pub fn escape_lexical(text: &str) -> String {
    Escaped(text).to_string()
}

struct Escaped<'a>(&'a str);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.chars().try_for_each(|c| write_escaped(f, c))
    }
}

fn write_escaped(out: &mut impl Write, c: char) -> fmt::Result {
    match c {
        '\0' => Ok(()),
        '\u{8}' => out.write_str("\\b"),
        '\t' => out.write_str("\\t"),
        '\n' => out.write_str("\\n"),
        '\u{c}' => out.write_str("\\f"),
        '\r' => out.write_str("\\r"),
        '"' => out.write_str("\\\""),
        '\'' => out.write_str("\\'"),
        '\\' => out.write_str("\\\\"),
        ' '..='~' => out.write_char(c),
        _ => {
            let mut units = [0_u16; 2];
            for unit in c.encode_utf16(&mut units) {
                write!(out, "\\u{unit:04x}")?;
            }
            Ok(())
        }
    }
}
