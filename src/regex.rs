//! Types and API for Regex matching
//!
//! This module defines the [`Regex`] struct, a compiled pattern wrapped around
//! an [`Engine`], and the [`RegexBuilder`] used to configure it.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::engine::{Engine, MetaEngine};
use crate::error::{Error, Result};
use crate::matches::Matches;
use crate::options::{DEFAULT_MAX_MEMORY, Encoding, RegexOptions};
use crate::regexp_match::Match;
use crate::util::{Input, InputBuffer, Span, UnitAnchor};

/// A compiled regular expression.
///
/// Cloning is cheap and clones share the compiled engine. Indices taken and
/// reported by the matching methods are UTF-16 code units for text input
/// and bytes for byte input.
#[derive(Clone)]
pub struct Regex {
    inner: Arc<RegexInner>,
}

struct RegexInner {
    pattern: String,
    options: RegexOptions,
    max_memory: usize,
    engine: Arc<dyn Engine>,
    group_count: usize,
}

impl Regex {
    /// Compile `pattern` with default options.
    pub fn new(pattern: &str) -> Result<Self> {
        RegexBuilder::new(pattern).build()
    }

    pub fn with_options(pattern: &str, options: RegexOptions) -> Result<Self> {
        RegexBuilder::new(pattern).options(options).build()
    }

    /// Wrap an already compiled engine.
    pub fn from_engine(pattern: &str, options: RegexOptions, engine: Arc<dyn Engine>) -> Self {
        Self::from_parts(pattern, options, DEFAULT_MAX_MEMORY, engine)
    }

    fn from_parts(
        pattern: &str,
        options: RegexOptions,
        max_memory: usize,
        engine: Arc<dyn Engine>,
    ) -> Self {
        // Only the whole match is reported in single-capture mode, whatever
        // the engine says.
        let group_count = if options.contains(RegexOptions::SINGLE_CAPTURE) {
            1
        } else {
            engine.capture_group_count() + 1
        };
        Self {
            inner: Arc::new(RegexInner {
                pattern: pattern.to_string(),
                options,
                max_memory,
                engine,
                group_count,
            }),
        }
    }

    pub fn pattern(&self) -> &str {
        &self.inner.pattern
    }

    pub fn options(&self) -> RegexOptions {
        self.inner.options
    }

    /// The memory budget the pattern was compiled with, in bytes.
    pub fn max_memory(&self) -> usize {
        self.inner.max_memory
    }

    /// Number of groups, the whole match included.
    pub fn group_count(&self) -> usize {
        self.inner.group_count
    }

    /// Named groups and their numbers, in group order.
    pub fn group_names(&self) -> Vec<(&str, usize)> {
        if self.inner.group_count == 1 {
            return Vec::new();
        }
        self.inner.engine.named_groups()
    }

    /// The number of the group called `name`.
    pub fn group_number_from_name(&self, name: &str) -> Option<usize> {
        if self.inner.group_count == 1 {
            return None;
        }
        self.inner.engine.group_index(name)
    }

    /// Whether two handles share the same compiled pattern.
    pub fn ptr_eq(&self, other: &Regex) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn encoding(&self) -> Encoding {
        self.inner.options.encoding()
    }

    /// Returns true whenever the input matches the regex, without building
    /// a match.
    pub fn is_match<'h>(&self, input: impl Into<Input<'h>>) -> Result<bool> {
        self.is_match_at(input, 0)
    }

    pub fn is_match_at<'h>(&self, input: impl Into<Input<'h>>, start: usize) -> Result<bool> {
        let (buffer, span, _) = self.prepare(input.into(), start, None)?;
        Ok(self.inner.engine.is_match(buffer.bytes(), span))
    }

    /// The first match in the input, or [`Match::Empty`].
    pub fn find<'h>(&self, input: impl Into<Input<'h>>) -> Result<Match<'h>> {
        self.find_at(input, 0)
    }

    /// The first match at or after `start`.
    pub fn find_at<'h>(&self, input: impl Into<Input<'h>>, start: usize) -> Result<Match<'h>> {
        let (buffer, span, anchor) = self.prepare(input.into(), start, None)?;
        Ok(self.search(&buffer, span, anchor))
    }

    /// The first match within `length` units from `start`. The window only
    /// bounds this search, [`Match::next_match`] looks up to the end of the
    /// input.
    pub fn find_in<'h>(
        &self,
        input: impl Into<Input<'h>>,
        start: usize,
        length: usize,
    ) -> Result<Match<'h>> {
        let (buffer, span, anchor) = self.prepare(input.into(), start, Some(length))?;
        Ok(self.search(&buffer, span, anchor))
    }

    /// All successive matches in the input, found lazily.
    pub fn find_all<'h>(&self, input: impl Into<Input<'h>>) -> Result<Matches<'h>> {
        self.find_all_at(input, 0)
    }

    pub fn find_all_at<'h>(&self, input: impl Into<Input<'h>>, start: usize) -> Result<Matches<'h>> {
        let (buffer, span, anchor) = self.prepare(input.into(), start, None)?;
        Ok(Matches::new(self.clone(), buffer, span, anchor))
    }

    /// Validate the window, convert the input and locate the window in bytes.
    fn prepare<'h>(
        &self,
        input: Input<'h>,
        start: usize,
        length: Option<usize>,
    ) -> Result<(Arc<InputBuffer<'h>>, Span, UnitAnchor)> {
        let len = input.len();
        if start > len {
            return Err(Error::out_of_range(
                "start_index",
                "start index cannot be greater than the input length",
            ));
        }
        if let Some(length) = length {
            if length > len {
                return Err(Error::out_of_range(
                    "length",
                    "length cannot be greater than the input length",
                ));
            }
            if start + length > len {
                return Err(Error::out_of_range(
                    "start_index, length",
                    "start index and length do not denote a range of the input",
                ));
            }
        }

        let buffer = Arc::new(InputBuffer::new(input, self.encoding())?);
        let from = buffer
            .byte_offset(UnitAnchor::ORIGIN, start)
            .ok_or(Error::out_of_range(
                "start_index",
                "start index falls inside a surrogate pair",
            ))?;
        let anchor = UnitAnchor::new(from, start);
        let to = match length {
            None => buffer.byte_len(),
            Some(length) => buffer.byte_offset(anchor, start + length).ok_or(
                Error::out_of_range("length", "range ends inside a surrogate pair"),
            )?,
        };
        Ok((buffer, Span::new(from, to), anchor))
    }

    /// Run one unanchored search over `span` and wrap the result. `anchor`
    /// is a position at or before `span.from` whose unit index is known.
    pub(crate) fn search<'h>(
        &self,
        buffer: &Arc<InputBuffer<'h>>,
        span: Span,
        anchor: UnitAnchor,
    ) -> Match<'h> {
        let mut slots = vec![None; self.inner.group_count];
        if !self
            .inner
            .engine
            .execute(buffer.bytes(), span, false, &mut slots)
        {
            return Match::Empty;
        }
        Match::from_slots(self, buffer, &slots, anchor)
    }
}

impl fmt::Display for Regex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner.pattern)
    }
}

impl fmt::Debug for Regex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Regex")
            .field("pattern", &self.inner.pattern)
            .field("options", &self.inner.options)
            .field("group_count", &self.inner.group_count)
            .finish()
    }
}

/// Configures and compiles a [`Regex`].
#[derive(Debug, Clone)]
pub struct RegexBuilder<'p> {
    pattern: &'p str,
    options: RegexOptions,
    max_memory: usize,
}

impl<'p> RegexBuilder<'p> {
    pub fn new(pattern: &'p str) -> Self {
        Self {
            pattern,
            options: RegexOptions::NONE,
            max_memory: DEFAULT_MAX_MEMORY,
        }
    }

    /// Replace every option at once.
    pub fn options(mut self, options: RegexOptions) -> Self {
        self.options = options;
        self
    }

    /// Memory budget for the compiled pattern, in bytes.
    pub fn max_memory(mut self, bytes: usize) -> Self {
        self.max_memory = bytes;
        self
    }

    fn flag(mut self, flag: RegexOptions, value: bool) -> Self {
        self.options.set(flag, value);
        self
    }

    pub fn case_insensitive(self, value: bool) -> Self {
        self.flag(RegexOptions::IGNORE_CASE, value)
    }

    pub fn multi_line(self, value: bool) -> Self {
        self.flag(RegexOptions::MULTILINE, value)
    }

    pub fn longest_match(self, value: bool) -> Self {
        self.flag(RegexOptions::LONGEST_MATCH, value)
    }

    pub fn ignore_newline(self, value: bool) -> Self {
        self.flag(RegexOptions::IGNORE_NEWLINE, value)
    }

    pub fn dot_matches_new_line(self, value: bool) -> Self {
        self.flag(RegexOptions::SINGLELINE, value)
    }

    pub fn ungreedy(self, value: bool) -> Self {
        self.flag(RegexOptions::UNGREEDY, value)
    }

    pub fn literal(self, value: bool) -> Self {
        self.flag(RegexOptions::LITERAL, value)
    }

    pub fn single_capture(self, value: bool) -> Self {
        self.flag(RegexOptions::SINGLE_CAPTURE, value)
    }

    pub fn latin1(self, value: bool) -> Self {
        self.flag(RegexOptions::LATIN1, value)
    }

    pub fn ascii(self, value: bool) -> Self {
        self.flag(RegexOptions::ASCII, value)
    }

    pub fn posix(self, value: bool) -> Self {
        self.flag(RegexOptions::POSIX, value)
    }

    pub fn perl_classes(self, value: bool) -> Self {
        self.flag(RegexOptions::PERL_CLASSES, value)
    }

    pub fn word_boundary(self, value: bool) -> Self {
        self.flag(RegexOptions::WORD_BOUNDARY, value)
    }

    pub fn one_line(self, value: bool) -> Self {
        self.flag(RegexOptions::ONE_LINE, value)
    }

    pub fn build(self) -> Result<Regex> {
        let translation = self.options.translate(self.pattern, self.max_memory);
        let engine = match MetaEngine::compile(&translation) {
            Ok(engine) => engine,
            Err(err) => {
                debug!(pattern = self.pattern, options = ?self.options, %err, "pattern rejected");
                return Err(err);
            }
        };
        let regex = Regex::from_parts(self.pattern, self.options, self.max_memory, Arc::new(engine));
        debug!(
            pattern = self.pattern,
            options = ?self.options,
            groups = regex.group_count(),
            "compiled pattern"
        );
        Ok(regex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf16(s: &str) -> Vec<u16> {
        s.encode_utf16().collect()
    }

    #[test]
    fn accessors() {
        let re = RegexBuilder::new(r"(?P<a>x)(y)")
            .case_insensitive(true)
            .max_memory(1 << 20)
            .build()
            .unwrap();
        assert_eq!(re.pattern(), r"(?P<a>x)(y)");
        assert_eq!(re.to_string(), r"(?P<a>x)(y)");
        assert_eq!(re.options(), RegexOptions::IGNORE_CASE);
        assert_eq!(re.max_memory(), 1 << 20);
        assert_eq!(re.group_count(), 3);
        assert_eq!(re.group_names(), vec![("a", 1)]);
        assert_eq!(re.group_number_from_name("a"), Some(1));
        assert_eq!(re.group_number_from_name("b"), None);
        assert_eq!(Regex::new("x").unwrap().max_memory(), DEFAULT_MAX_MEMORY);
    }

    #[test]
    fn single_capture_reports_one_group() {
        let re = Regex::with_options(r"(?P<a>x)(y)", RegexOptions::SINGLE_CAPTURE).unwrap();
        assert_eq!(re.group_count(), 1);
        assert_eq!(re.group_number_from_name("a"), None);
        let m = re.find("xy").unwrap();
        assert_eq!(m.group_count(), 1);
        assert!(!m.group(1).success());
    }

    #[test]
    fn builder_flags_toggle_options() {
        let re = RegexBuilder::new("a")
            .multi_line(true)
            .ungreedy(true)
            .ungreedy(false)
            .build()
            .unwrap();
        assert_eq!(re.options(), RegexOptions::MULTILINE);
    }

    #[test]
    fn is_match_variants() {
        let re = Regex::new("b").unwrap();
        assert!(re.is_match("abc").unwrap());
        assert!(!re.is_match_at("abc", 2).unwrap());
        assert!(re.is_match(b"abc").unwrap());
    }

    #[test]
    fn find_at_and_find_in() {
        let re = Regex::new(r"\d+").unwrap();
        let m = re.find_at("12 345", 1).unwrap();
        assert_eq!((m.index(), m.len()), (1, 1));
        let m = re.find_in("12 345", 3, 2).unwrap();
        assert_eq!((m.index(), m.value().as_str()), (3, "34"));
        assert!(!re.find_in("12 345", 2, 1).unwrap().success());
    }

    #[test]
    fn start_is_validated() {
        let re = Regex::new("a").unwrap();
        let err = re.find_at("abc", 4).unwrap_err();
        assert_eq!(err.argument(), Some("start_index"));
        assert!(re.find_at("abc", 3).is_ok());
        assert_eq!(re.find_in("abc", 0, 4).unwrap_err().argument(), Some("length"));
        assert_eq!(
            re.find_in("abc", 2, 2).unwrap_err().argument(),
            Some("start_index, length")
        );
    }

    #[test]
    fn start_inside_surrogate_pair_is_rejected() {
        let re = Regex::new("a").unwrap();
        let text = utf16("𠜎a");
        assert_eq!(re.find_at(&text, 1).unwrap_err().argument(), Some("start_index"));
        let m = re.find_at(&text, 2).unwrap();
        assert_eq!(m.index(), 2);
    }

    #[test]
    fn unencodable_input_is_rejected() {
        let re = Regex::with_options("a", RegexOptions::ASCII).unwrap();
        assert_eq!(re.is_match("é").unwrap_err().argument(), Some("input"));
    }

    #[test]
    fn compile_errors_are_reported() {
        let err = Regex::new("(a").unwrap_err();
        assert!(err.to_string().ends_with("in pattern '(a'."), "{err}");
    }

    #[test]
    fn clones_share_the_engine() {
        let re = Regex::new("a").unwrap();
        assert!(re.ptr_eq(&re.clone()));
        assert!(!re.ptr_eq(&Regex::new("a").unwrap()));
    }
}
