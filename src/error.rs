//! Error types returned by pattern construction and matching.
//!
//! A failed match is never an error: it is reported as [`crate::Match::Empty`].
//! Everything here is detected synchronously and fails the call immediately.

use std::fmt;

use thiserror::Error;

use crate::options::Encoding;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A start index, a length, or an options value is outside of the accepted range.
    #[error("{reason} (parameter '{argument}')")]
    ArgumentOutOfRange {
        argument: &'static str,
        reason: &'static str,
    },

    /// Text that cannot be represented in the active single-byte encoding.
    #[error(
        "specified argument was out of the range of valid {encoding} values: \
         code unit {position} of '{argument}'"
    )]
    Encoding {
        argument: &'static str,
        encoding: Encoding,
        position: usize,
    },

    /// The engine rejected the pattern.
    #[error("{}: '{fragment}' in pattern '{pattern}'.", code.message())]
    Compile {
        code: ErrorCode,
        fragment: String,
        pattern: String,
    },
}

impl Error {
    pub(crate) fn out_of_range(argument: &'static str, reason: &'static str) -> Self {
        Error::ArgumentOutOfRange { argument, reason }
    }

    /// The name of the argument that caused the error, if any.
    pub fn argument(&self) -> Option<&'static str> {
        match self {
            Error::ArgumentOutOfRange { argument, .. } | Error::Encoding { argument, .. } => {
                Some(argument)
            }
            Error::Compile { .. } => None,
        }
    }
}

/// Structured compile error codes, one per kind of syntax problem the engine
/// can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Internal,
    BadEscape,
    BadCharClass,
    BadCharRange,
    MissingBracket,
    MissingParen,
    TrailingBackslash,
    RepeatArgument,
    RepeatSize,
    RepeatOp,
    BadPerlOp,
    BadUtf8,
    BadNamedCapture,
    PatternTooLarge,
}

impl ErrorCode {
    /// Human readable reason, as shown in [`Error::Compile`] messages.
    pub fn message(self) -> &'static str {
        match self {
            ErrorCode::Internal => "An unknown internal error has occurred",
            ErrorCode::BadEscape => "Invalid escape sequence",
            ErrorCode::BadCharClass => "Invalid character class",
            ErrorCode::BadCharRange => "Invalid character class range",
            ErrorCode::MissingBracket => "Missing bracket",
            ErrorCode::MissingParen => "Missing parenthesis",
            ErrorCode::TrailingBackslash => "Missing escape sequence (trailing backslash)",
            ErrorCode::RepeatArgument => "Invalid repetition operator (nothing to repeat)",
            ErrorCode::RepeatSize => "Invalid repetition argument",
            ErrorCode::RepeatOp => {
                "Invalid repetition operator (repetition operators cannot be combined)"
            }
            ErrorCode::BadPerlOp => "Invalid Perl operator",
            ErrorCode::BadUtf8 => "Invalid UTF-8 sequence",
            ErrorCode::BadNamedCapture => "Invalid named capture group",
            ErrorCode::PatternTooLarge => "Pattern too large",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_error_message() {
        let err = Error::Compile {
            code: ErrorCode::MissingParen,
            fragment: "(a".to_string(),
            pattern: "(a".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Missing parenthesis: '(a' in pattern '(a'."
        );
        assert_eq!(err.argument(), None);
    }

    #[test]
    fn encoding_error_names_argument() {
        let err = Error::Encoding {
            argument: "input",
            encoding: Encoding::Latin1,
            position: 3,
        };
        assert_eq!(err.argument(), Some("input"));
        assert!(err.to_string().contains("Latin-1"));
    }
}
