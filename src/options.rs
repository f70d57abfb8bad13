//! Regex options and their translation into engine configuration.
//!
//! Most options map onto a structural [`EngineConfig`] switch. Three of them
//! (multi-line anchors, dot-matches-newline and swapped greediness) have no
//! structural equivalent and are injected into the pattern text instead, as a
//! leading inline flag group such as `(?ms)`.

use std::borrow::Cow;
use std::fmt;

use crate::error::{Error, Result};

/// Default memory budget for a compiled pattern, in bytes.
pub const DEFAULT_MAX_MEMORY: usize = 8 << 20;

bitflags::bitflags! {
    /// Options controlling how a pattern is compiled and how input is encoded.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RegexOptions: u32 {
        /// Case-insensitive matching. Same as the `i` flag.
        const IGNORE_CASE = 1;
        /// `^` and `$` match at line boundaries. Same as the `m` flag.
        const MULTILINE = 1 << 1;
        /// Report the leftmost-longest match instead of the leftmost-first one.
        const LONGEST_MATCH = 1 << 2;
        /// Never match `\n`, even when the pattern spells it out.
        const IGNORE_NEWLINE = 1 << 3;
        /// `.` also matches `\n`. Same as the `s` flag.
        const SINGLELINE = 1 << 4;
        /// Swap the greediness of repetition operators. Same as the `U` flag.
        const UNGREEDY = 1 << 5;
        /// Treat the pattern as a literal string.
        const LITERAL = 1 << 6;
        /// Only capture the match as a whole.
        const SINGLE_CAPTURE = 1 << 8;
        /// Latin-1 (ISO-8859-1) input. Wins over [`RegexOptions::ASCII`].
        const LATIN1 = 1 << 9;
        /// 7-bit ASCII input.
        const ASCII = 1 << 10;
        /// Restrict the syntax to POSIX egrep.
        const POSIX = 1 << 11;
        /// Allow `\d`, `\s`, `\w` and their negations in POSIX mode.
        const PERL_CLASSES = 1 << 12;
        /// Allow `\b` and `\B` in POSIX mode.
        const WORD_BOUNDARY = 1 << 13;
        /// In POSIX mode, `^` and `$` only match at the ends of the input.
        const ONE_LINE = 1 << 14;
    }
}

impl RegexOptions {
    pub const NONE: RegexOptions = RegexOptions::empty();

    /// Validate a raw options value.
    pub fn from_raw(bits: u32) -> Result<Self> {
        RegexOptions::from_bits(bits).ok_or(Error::out_of_range(
            "options",
            "specified argument was outside the range of valid RegexOptions values",
        ))
    }

    /// The input encoding selected by these options.
    pub fn encoding(self) -> Encoding {
        if self.contains(RegexOptions::LATIN1) {
            Encoding::Latin1
        } else if self.contains(RegexOptions::ASCII) {
            Encoding::Ascii
        } else {
            Encoding::Utf8
        }
    }

    /// The structural part of the translation.
    pub fn engine_config(self, max_memory: usize) -> EngineConfig {
        EngineConfig {
            encoding: self.encoding(),
            case_sensitive: !self.contains(RegexOptions::IGNORE_CASE),
            never_nl: self.contains(RegexOptions::IGNORE_NEWLINE),
            longest_match: self.contains(RegexOptions::LONGEST_MATCH),
            literal: self.contains(RegexOptions::LITERAL),
            posix_syntax: self.contains(RegexOptions::POSIX),
            perl_classes: self.contains(RegexOptions::PERL_CLASSES),
            word_boundary: self.contains(RegexOptions::WORD_BOUNDARY),
            one_line: self.contains(RegexOptions::ONE_LINE),
            single_capture: self.contains(RegexOptions::SINGLE_CAPTURE),
            max_memory,
        }
    }

    /// Inline flags for the options the engine only accepts in pattern text,
    /// e.g. `"(?ms)"`. `None` when none of them is set.
    pub fn inline_flags(self) -> Option<String> {
        let mut flags = String::new();
        if self.contains(RegexOptions::MULTILINE) {
            flags.push('m');
        }
        if self.contains(RegexOptions::SINGLELINE) {
            flags.push('s');
        }
        if self.contains(RegexOptions::UNGREEDY) {
            flags.push('U');
        }
        if flags.is_empty() {
            None
        } else {
            Some(format!("(?{flags})"))
        }
    }

    /// Prefix `pattern` with the inline flags. Flags already present in the
    /// pattern are left alone, repeating a flag is harmless.
    ///
    /// Literal patterns are returned untouched: the prefix would otherwise be
    /// matched as text.
    pub fn apply_inline_flags(self, pattern: &str) -> (Cow<'_, str>, usize) {
        if self.contains(RegexOptions::LITERAL) {
            return (Cow::Borrowed(pattern), 0);
        }
        match self.inline_flags() {
            Some(flags) => {
                let prefix_len = flags.len();
                (Cow::Owned(flags + pattern), prefix_len)
            }
            None => (Cow::Borrowed(pattern), 0),
        }
    }
}

/// A pattern after option translation: the caller's text, the text actually
/// handed to the engine, and the structural configuration.
#[derive(Debug, Clone)]
pub struct Translation<'p> {
    pub original: &'p str,
    pub text: Cow<'p, str>,
    /// Length of the injected inline flag group at the start of `text`.
    pub prefix_len: usize,
    pub config: EngineConfig,
}

impl RegexOptions {
    pub fn translate(self, pattern: &str, max_memory: usize) -> Translation<'_> {
        let (text, prefix_len) = self.apply_inline_flags(pattern);
        Translation {
            original: pattern,
            text,
            prefix_len,
            config: self.engine_config(max_memory),
        }
    }
}

/// Byte representation handed to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// Multi-byte text mode.
    Utf8,
    Latin1,
    Ascii,
}

impl Encoding {
    pub fn is_single_byte(self) -> bool {
        !matches!(self, Encoding::Utf8)
    }

    /// Largest code unit representable in a single-byte encoding.
    pub(crate) fn max_unit(self) -> u16 {
        match self {
            Encoding::Utf8 => u16::MAX,
            Encoding::Latin1 => 0xFF,
            Encoding::Ascii => 0x7F,
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Utf8 => f.write_str("UTF-8"),
            Encoding::Latin1 => f.write_str("Latin-1"),
            Encoding::Ascii => f.write_str("ASCII"),
        }
    }
}

/// Structural engine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub encoding: Encoding,
    pub case_sensitive: bool,
    pub never_nl: bool,
    pub longest_match: bool,
    pub literal: bool,
    pub posix_syntax: bool,
    pub perl_classes: bool,
    pub word_boundary: bool,
    pub one_line: bool,
    pub single_capture: bool,
    pub max_memory: usize,
}

impl EngineConfig {
    pub fn utf8(&self) -> bool {
        !self.encoding.is_single_byte()
    }

    /// Whether `^` and `$` should match at line boundaries without an inline
    /// `m` flag. Only POSIX mode without [`RegexOptions::ONE_LINE`] does this.
    pub fn multi_line_anchors(&self) -> bool {
        self.posix_syntax && !self.one_line
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        RegexOptions::NONE.engine_config(DEFAULT_MAX_MEMORY)
    }
}
