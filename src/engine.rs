//! The matching engine seen through a narrow contract.
//!
//! Everything above this module talks to an [`Engine`]: compile once, then
//! execute against a byte haystack and read back byte spans for each capture
//! group. [`MetaEngine`] is the implementation backed by
//! [`regex_automata::meta::Regex`], built from a [`regex_syntax`] HIR so that
//! options the meta regex does not expose (POSIX restrictions, never matching
//! a newline, single-byte patterns) can be applied on the way.

use std::fmt;

use regex_automata::nfa::thompson::WhichCaptures;
use regex_automata::util::primitives::NonMaxUsize;
use regex_automata::{Anchored, Input as EngineInput, MatchKind, PatternID, meta};
use regex_syntax::ast::{self, Ast, Visitor};
use regex_syntax::hir::{self, Hir, HirKind};

use crate::encoding;
use crate::error::{Error, ErrorCode, Result};
use crate::options::{Encoding, Translation};
use crate::util::Span;

/// The engine contract.
///
/// An engine is compiled once and then only read, so implementations must be
/// shareable between threads. Any per-search scratch space is the engine's
/// own business.
pub trait Engine: fmt::Debug + Send + Sync {
    /// Number of explicit capturing groups, group 0 excluded.
    fn capture_group_count(&self) -> usize;

    /// Named groups and their indices.
    fn named_groups(&self) -> Vec<(&str, usize)>;

    /// Search `haystack[span]`, looking at the surroundings for assertions.
    ///
    /// On success every slot is filled with the span of the corresponding
    /// group, or `None` if the group did not participate. Slots past the
    /// number of groups are left alone. An empty slot slice only reports
    /// whether a match exists.
    fn execute(
        &self,
        haystack: &[u8],
        span: Span,
        anchored: bool,
        slots: &mut [Option<Span>],
    ) -> bool;

    fn is_match(&self, haystack: &[u8], span: Span) -> bool {
        self.execute(haystack, span, false, &mut [])
    }

    fn group_index(&self, name: &str) -> Option<usize> {
        self.named_groups()
            .into_iter()
            .find(|(group, _)| *group == name)
            .map(|(_, index)| index)
    }
}

/// An [`Engine`] backed by a [`meta::Regex`].
///
/// Leftmost-longest searches use two regexes: the leftmost-first one finds
/// where the leftmost match starts, then a second regex reporting every match
/// state runs anchored at that position and keeps the longest.
#[derive(Debug)]
pub struct MetaEngine {
    regex: meta::Regex,
    longest: Option<meta::Regex>,
    /// Only group 0 is reported.
    single_capture: bool,
}

impl MetaEngine {
    /// Compile a translated pattern.
    ///
    /// Errors quote the caller's original pattern, never the injected flags.
    pub fn compile(translation: &Translation<'_>) -> Result<Self> {
        let config = &translation.config;
        let original = translation.original;

        let mut text = if config.literal {
            regex_syntax::escape(original)
        } else {
            translation.text.clone().into_owned()
        };
        if config.encoding.is_single_byte() {
            encoding::validate(original, "pattern", config.encoding)?;
            text = escape_high_bytes(&text);
        }

        let compile_error = |code: ErrorCode, span: &ast::Span| Error::Compile {
            code,
            fragment: fragment(&text, original, span),
            pattern: original.to_string(),
        };

        let ast = ast::parse::Parser::new()
            .parse(&text)
            .map_err(|err| compile_error(ast_error_code(err.kind()), err.span()))?;

        if config.posix_syntax {
            let check = PosixCheck {
                prefix_len: translation.prefix_len,
                perl_classes: config.perl_classes,
                word_boundary: config.word_boundary,
            };
            ast::visit(&ast, check).map_err(|(code, span)| compile_error(code, &span))?;
        }

        let mut hir = hir::translate::TranslatorBuilder::new()
            .utf8(config.utf8())
            .unicode(config.utf8())
            .case_insensitive(!config.case_sensitive)
            .multi_line(config.multi_line_anchors())
            .build()
            .translate(&text, &ast)
            .map_err(|err| compile_error(hir_error_code(err.kind()), err.span()))?;

        if !config.case_sensitive && config.encoding == Encoding::Latin1 {
            hir = map_leaves(hir, &fold_latin1);
        }
        if config.never_nl {
            hir = map_leaves(hir, &strip_newlines);
        }

        let which_captures = if config.single_capture {
            WhichCaptures::Implicit
        } else {
            WhichCaptures::All
        };
        let metac = meta::Config::new()
            .match_kind(MatchKind::LeftmostFirst)
            .utf8_empty(config.utf8())
            .nfa_size_limit(Some(config.max_memory))
            .which_captures(which_captures);

        let build = |metac: meta::Config| {
            meta::Builder::new()
                .configure(metac)
                .build_from_hir(&hir)
                .map_err(|err| {
                    let code = if err.size_limit().is_some() {
                        ErrorCode::PatternTooLarge
                    } else {
                        ErrorCode::Internal
                    };
                    Error::Compile {
                        code,
                        fragment: original.to_string(),
                        pattern: original.to_string(),
                    }
                })
        };

        let regex = build(metac.clone())?;
        let longest = if config.longest_match {
            Some(build(metac.match_kind(MatchKind::All))?)
        } else {
            None
        };

        Ok(Self {
            regex,
            longest,
            single_capture: config.single_capture,
        })
    }

    fn search(regex: &meta::Regex, input: &EngineInput<'_>, slots: &mut [Option<Span>]) -> bool {
        if slots.is_empty() {
            return regex.is_match(input.clone());
        }

        let mut raw: Vec<Option<NonMaxUsize>> = vec![None; slots.len() * 2];
        if regex.search_slots(input, &mut raw).is_none() {
            return false;
        }
        for (slot, pair) in slots.iter_mut().zip(raw.chunks_exact(2)) {
            *slot = match (pair[0], pair[1]) {
                (Some(from), Some(to)) => Some(Span::new(from.get(), to.get())),
                _ => None,
            };
        }
        true
    }
}

impl Engine for MetaEngine {
    fn capture_group_count(&self) -> usize {
        if self.single_capture {
            return 0;
        }
        self.regex.captures_len().saturating_sub(1)
    }

    fn named_groups(&self) -> Vec<(&str, usize)> {
        if self.single_capture {
            return Vec::new();
        }
        self.regex
            .group_info()
            .pattern_names(PatternID::ZERO)
            .enumerate()
            .filter_map(|(index, name)| name.map(|name| (name, index)))
            .collect()
    }

    fn execute(
        &self,
        haystack: &[u8],
        span: Span,
        anchored: bool,
        slots: &mut [Option<Span>],
    ) -> bool {
        if !span.valid() || span.to > haystack.len() {
            return false;
        }
        let anchored = if anchored { Anchored::Yes } else { Anchored::No };
        let input = EngineInput::new(haystack)
            .span(span.from..span.to)
            .anchored(anchored);

        let Some(longest) = &self.longest else {
            return Self::search(&self.regex, &input, slots);
        };
        if slots.is_empty() {
            return self.regex.is_match(input);
        }
        let Some(first) = self.regex.find(input.clone()) else {
            return false;
        };
        let input = input.span(first.start()..span.to).anchored(Anchored::Yes);
        Self::search(longest, &input, slots)
    }

    fn group_index(&self, name: &str) -> Option<usize> {
        if self.single_capture {
            return None;
        }
        self.regex.group_info().to_index(PatternID::ZERO, name)
    }
}

/// Rewrite characters above ASCII as `\xHH` byte escapes, for patterns
/// compiled against a single-byte encoding. A backslash directly in front of
/// such a character is dropped: the escape already makes it literal.
fn escape_high_bytes(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut escaped = false;
    for c in pattern.chars() {
        if c.is_ascii() {
            escaped = c == '\\' && !escaped;
            out.push(c);
            continue;
        }
        if escaped {
            out.pop();
        }
        escaped = false;
        out.push_str(&format!("\\x{:02X}", u32::from(c)));
    }
    out
}

/// The piece of the pattern an error points at.
fn fragment(text: &str, original: &str, span: &ast::Span) -> String {
    let (start, end) = (span.start.offset, span.end.offset);
    match text.get(start..end) {
        Some(piece) if !piece.is_empty() => piece.to_string(),
        _ => match text.get(start..) {
            Some(rest) if !rest.is_empty() => rest.to_string(),
            _ => original.to_string(),
        },
    }
}

fn ast_error_code(kind: &ast::ErrorKind) -> ErrorCode {
    use ast::ErrorKind as K;
    match kind {
        K::ClassUnclosed { .. } => ErrorCode::MissingBracket,
        K::ClassRangeInvalid { .. } | K::ClassRangeLiteral { .. } => ErrorCode::BadCharRange,
        K::ClassEscapeInvalid { .. } => ErrorCode::BadCharClass,
        K::UnicodeClassInvalid { .. } => ErrorCode::BadCharRange,
        K::EscapeUnexpectedEof { .. } => ErrorCode::TrailingBackslash,
        K::EscapeHexEmpty { .. }
        | K::EscapeHexInvalid { .. }
        | K::EscapeHexInvalidDigit { .. }
        | K::EscapeUnrecognized { .. }
        | K::UnsupportedBackreference { .. } => ErrorCode::BadEscape,
        K::GroupUnclosed { .. } | K::GroupUnopened { .. } => ErrorCode::MissingParen,
        K::GroupNameDuplicate { .. }
        | K::GroupNameEmpty { .. }
        | K::GroupNameInvalid { .. }
        | K::GroupNameUnexpectedEof { .. } => ErrorCode::BadNamedCapture,
        K::RepetitionMissing { .. } => ErrorCode::RepeatArgument,
        K::RepetitionCountInvalid { .. }
        | K::RepetitionCountUnclosed { .. }
        | K::RepetitionCountDecimalEmpty { .. }
        | K::DecimalEmpty { .. }
        | K::DecimalInvalid { .. } => ErrorCode::RepeatSize,
        K::FlagDanglingNegation { .. }
        | K::FlagDuplicate { .. }
        | K::FlagRepeatedNegation { .. }
        | K::FlagUnexpectedEof { .. }
        | K::FlagUnrecognized { .. }
        | K::UnsupportedLookAround { .. } => ErrorCode::BadPerlOp,
        K::NestLimitExceeded { .. } | K::CaptureLimitExceeded { .. } => {
            ErrorCode::PatternTooLarge
        }
        _ => ErrorCode::Internal,
    }
}

fn hir_error_code(kind: &hir::ErrorKind) -> ErrorCode {
    use hir::ErrorKind as K;
    match kind {
        K::InvalidUtf8 { .. } => ErrorCode::BadUtf8,
        K::UnicodeNotAllowed { .. }
        | K::UnicodePropertyNotFound { .. }
        | K::UnicodePropertyValueNotFound { .. }
        | K::UnicodePerlClassNotFound { .. } => ErrorCode::BadCharRange,
        _ => ErrorCode::Internal,
    }
}

/// Rejects syntax outside of POSIX egrep. The inline flag group injected in
/// front of the caller's pattern is exempt.
struct PosixCheck {
    prefix_len: usize,
    perl_classes: bool,
    word_boundary: bool,
}

impl PosixCheck {
    fn injected(&self, span: &ast::Span) -> bool {
        span.end.offset <= self.prefix_len
    }
}

impl Visitor for PosixCheck {
    type Output = ();
    type Err = (ErrorCode, ast::Span);

    fn finish(self) -> std::result::Result<(), Self::Err> {
        Ok(())
    }

    fn visit_pre(&mut self, ast: &Ast) -> std::result::Result<(), Self::Err> {
        match ast {
            Ast::Flags(flags) if !self.injected(&flags.span) => {
                Err((ErrorCode::RepeatArgument, flags.span))
            }
            Ast::ClassPerl(class) if !self.perl_classes => Err((ErrorCode::BadEscape, class.span)),
            Ast::ClassUnicode(class) => Err((ErrorCode::BadEscape, class.span)),
            Ast::Repetition(rep) if !rep.greedy => Err((ErrorCode::RepeatOp, rep.span)),
            Ast::Group(group) => match &group.kind {
                ast::GroupKind::CaptureIndex(_) => Ok(()),
                ast::GroupKind::CaptureName { .. } => {
                    Err((ErrorCode::BadNamedCapture, group.span))
                }
                _ => Err((ErrorCode::RepeatArgument, group.span)),
            },
            Ast::Assertion(assertion) => match assertion.kind {
                ast::AssertionKind::StartLine | ast::AssertionKind::EndLine => Ok(()),
                ast::AssertionKind::StartText | ast::AssertionKind::EndText => {
                    Err((ErrorCode::BadEscape, assertion.span))
                }
                _ if self.word_boundary => Ok(()),
                _ => Err((ErrorCode::BadEscape, assertion.span)),
            },
            _ => Ok(()),
        }
    }

    fn visit_class_set_item_pre(
        &mut self,
        item: &ast::ClassSetItem,
    ) -> std::result::Result<(), Self::Err> {
        match item {
            ast::ClassSetItem::Perl(class) if !self.perl_classes => {
                Err((ErrorCode::BadEscape, class.span))
            }
            ast::ClassSetItem::Unicode(class) => Err((ErrorCode::BadEscape, class.span)),
            _ => Ok(()),
        }
    }
}

/// Rebuild `hir` with `f` applied to every leaf (empty, literal, class and
/// look-around nodes).
fn map_leaves(hir: Hir, f: &impl Fn(Hir) -> Hir) -> Hir {
    match hir.into_kind() {
        HirKind::Empty => f(Hir::empty()),
        HirKind::Literal(hir::Literal(bytes)) => f(Hir::literal(bytes)),
        HirKind::Class(class) => f(Hir::class(class)),
        HirKind::Look(look) => f(Hir::look(look)),
        HirKind::Repetition(hir::Repetition {
            min,
            max,
            greedy,
            sub,
        }) => Hir::repetition(hir::Repetition {
            min,
            max,
            greedy,
            sub: Box::new(map_leaves(*sub, f)),
        }),
        HirKind::Capture(hir::Capture { index, name, sub }) => Hir::capture(hir::Capture {
            index,
            name,
            sub: Box::new(map_leaves(*sub, f)),
        }),
        HirKind::Concat(subs) => Hir::concat(subs.into_iter().map(|sub| map_leaves(sub, f)).collect()),
        HirKind::Alternation(subs) => {
            Hir::alternation(subs.into_iter().map(|sub| map_leaves(sub, f)).collect())
        }
    }
}

/// Remove `\n` from everything a leaf can match.
fn strip_newlines(leaf: Hir) -> Hir {
    match leaf.kind() {
        HirKind::Literal(hir::Literal(bytes)) if bytes.contains(&b'\n') => Hir::fail(),
        HirKind::Class(hir::Class::Unicode(class)) => {
            let mut class = class.clone();
            class.difference(&hir::ClassUnicode::new([hir::ClassUnicodeRange::new('\n', '\n')]));
            Hir::class(hir::Class::Unicode(class))
        }
        HirKind::Class(hir::Class::Bytes(class)) => {
            let mut class = class.clone();
            class.difference(&hir::ClassBytes::new([hir::ClassBytesRange::new(b'\n', b'\n')]));
            Hir::class(hir::Class::Bytes(class))
        }
        _ => leaf,
    }
}

/// The other case of a non-ASCII Latin-1 letter, when it is itself Latin-1.
/// The translator already folds ASCII.
fn latin1_case_partner(byte: u8) -> Option<u8> {
    if byte.is_ascii() {
        return None;
    }
    let c = char::from(byte);
    [only(c.to_lowercase()), only(c.to_uppercase())]
        .into_iter()
        .flatten()
        .filter(|&other| other != c)
        .find_map(|other| u8::try_from(u32::from(other)).ok())
        .filter(|other| !other.is_ascii())
}

fn only(mut mapped: impl Iterator<Item = char>) -> Option<char> {
    match (mapped.next(), mapped.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Case-fold the non-ASCII letters of a Latin-1 leaf.
fn fold_latin1(leaf: Hir) -> Hir {
    match leaf.kind() {
        HirKind::Literal(hir::Literal(bytes))
            if bytes.iter().any(|&b| latin1_case_partner(b).is_some()) =>
        {
            let pieces = bytes
                .iter()
                .map(|&b| match latin1_case_partner(b) {
                    Some(other) => Hir::class(hir::Class::Bytes(hir::ClassBytes::new([
                        hir::ClassBytesRange::new(b, b),
                        hir::ClassBytesRange::new(other, other),
                    ]))),
                    None => Hir::literal([b]),
                })
                .collect();
            Hir::concat(pieces)
        }
        HirKind::Class(hir::Class::Bytes(class)) => {
            let partners: Vec<_> = class
                .iter()
                .flat_map(|range| range.start().max(0x80)..=range.end())
                .filter_map(latin1_case_partner)
                .map(|other| hir::ClassBytesRange::new(other, other))
                .collect();
            let mut class = class.clone();
            class.union(&hir::ClassBytes::new(partners));
            Hir::class(hir::Class::Bytes(class))
        }
        _ => leaf,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::RegexOptions;

    fn compile(pattern: &str, options: RegexOptions) -> Result<MetaEngine> {
        MetaEngine::compile(&options.translate(pattern, crate::DEFAULT_MAX_MEMORY))
    }

    fn find(engine: &MetaEngine, haystack: &[u8]) -> Option<Span> {
        let mut slots = [None];
        engine
            .execute(haystack, Span::new(0, haystack.len()), false, &mut slots)
            .then(|| slots[0])
            .flatten()
    }

    fn code_of(result: Result<MetaEngine>) -> ErrorCode {
        match result {
            Err(Error::Compile { code, .. }) => code,
            other => panic!("expected a compile error, got {other:?}"),
        }
    }

    #[test]
    fn execute_fills_capture_slots() {
        let engine = compile(r"(\w+)-(\d+)?", RegexOptions::NONE).unwrap();
        assert_eq!(engine.capture_group_count(), 2);
        let mut slots = [None; 3];
        assert!(engine.execute(b"test-", Span::new(0, 5), false, &mut slots));
        assert_eq!(slots, [Some(Span::new(0, 5)), Some(Span::new(0, 4)), None]);
    }

    #[test]
    fn execute_respects_span_and_anchoring() {
        let engine = compile("a+", RegexOptions::NONE).unwrap();
        let mut slots = [None];
        assert!(engine.execute(b"baaab", Span::new(2, 5), false, &mut slots));
        assert_eq!(slots[0], Some(Span::new(2, 4)));
        assert!(!engine.execute(b"baaab", Span::new(0, 5), true, &mut slots));
        assert!(!engine.is_match(b"baaab", Span::new(4, 5)));
    }

    #[test]
    fn named_groups_are_reported() {
        let engine = compile(r"(?P<year>\d{4})-(?P<month>\d{2})", RegexOptions::NONE).unwrap();
        assert_eq!(engine.group_index("month"), Some(2));
        assert_eq!(engine.group_index("day"), None);
        assert_eq!(engine.named_groups(), vec![("year", 1), ("month", 2)]);
    }

    #[test]
    fn single_capture_drops_groups() {
        let engine = compile(r"(a)(b)", RegexOptions::SINGLE_CAPTURE).unwrap();
        assert_eq!(engine.capture_group_count(), 0);
        assert_eq!(find(&engine, b"xab"), Some(Span::new(1, 3)));

        let engine = compile(r"(?P<first>a)(?P<second>b)", RegexOptions::SINGLE_CAPTURE).unwrap();
        assert_eq!(engine.capture_group_count(), 0);
        assert!(engine.named_groups().is_empty());
        assert_eq!(engine.group_index("first"), None);
        let mut slots = [None; 1];
        assert!(engine.execute(b"xab", Span::new(0, 3), false, &mut slots));
        assert_eq!(slots, [Some(Span::new(1, 3))]);
    }

    #[test]
    fn literal_mode_escapes_metacharacters() {
        let engine = compile("a.b(", RegexOptions::LITERAL).unwrap();
        assert_eq!(find(&engine, b"axb a.b("), Some(Span::new(4, 8)));
    }

    #[test]
    fn ignore_newline_never_matches_newline() {
        let engine = compile(r"a.b", RegexOptions::IGNORE_NEWLINE | RegexOptions::SINGLELINE)
            .unwrap();
        assert_eq!(find(&engine, b"a\nb"), None);
        assert_eq!(find(&engine, b"a-b"), Some(Span::new(0, 3)));

        let engine = compile(r"a\nb|c", RegexOptions::IGNORE_NEWLINE).unwrap();
        assert_eq!(find(&engine, b"a\nb c"), Some(Span::new(4, 5)));

        let engine = compile(r"[^x]+", RegexOptions::IGNORE_NEWLINE).unwrap();
        assert_eq!(find(&engine, b"ab\ncd"), Some(Span::new(0, 2)));
    }

    #[test]
    fn latin1_patterns_match_single_bytes() {
        let engine = compile("caf[é]", RegexOptions::LATIN1).unwrap();
        assert_eq!(find(&engine, b"un caf\xE9"), Some(Span::new(3, 7)));
        let engine = compile(r"\é", RegexOptions::LATIN1).unwrap();
        assert_eq!(find(&engine, b"\xE9"), Some(Span::new(0, 1)));
        assert_eq!(escape_high_bytes(r"\\é"), r"\\\xE9");

        let engine = compile("[à-ÿ]+", RegexOptions::LATIN1).unwrap();
        assert_eq!(find(&engine, b"a\xE0\xE9\xFFz"), Some(Span::new(1, 4)));
        assert_eq!(find(&engine, b"\xC9"), None);
        let engine = compile(r"[^é]", RegexOptions::LATIN1).unwrap();
        assert_eq!(find(&engine, b"\xE9\xE8"), Some(Span::new(1, 2)));
    }

    #[test]
    fn latin1_ignore_case_folds_accented_letters() {
        let options = RegexOptions::LATIN1 | RegexOptions::IGNORE_CASE;
        let engine = compile("é", options).unwrap();
        assert_eq!(find(&engine, b"\xC9"), Some(Span::new(0, 1)));
        let engine = compile("CAFÉ", options).unwrap();
        assert_eq!(find(&engine, b"un caf\xE9"), Some(Span::new(3, 7)));
        let engine = compile("[à-þ]+", options).unwrap();
        assert_eq!(find(&engine, b"-\xC0\xC9\xE8-"), Some(Span::new(1, 4)));

        // No single-character partner inside Latin-1.
        let engine = compile("ß|ÿ|µ", options).unwrap();
        assert_eq!(find(&engine, b"S s"), None);
        assert_eq!(find(&engine, b"\xFF"), Some(Span::new(0, 1)));

        let engine = compile("é", RegexOptions::LATIN1).unwrap();
        assert_eq!(find(&engine, b"\xC9"), None);
    }

    #[test]
    fn latin1_case_partners() {
        assert_eq!(latin1_case_partner(0xC9), Some(0xE9));
        assert_eq!(latin1_case_partner(0xE9), Some(0xC9));
        assert_eq!(latin1_case_partner(b'a'), None);
        assert_eq!(latin1_case_partner(0xD7), None);
        assert_eq!(latin1_case_partner(0xDF), None);
        assert_eq!(latin1_case_partner(0xFF), None);
        assert_eq!(latin1_case_partner(0xB5), None);
    }

    #[test]
    fn single_byte_patterns_are_validated() {
        let err = compile("水", RegexOptions::LATIN1).unwrap_err();
        assert_eq!(err.argument(), Some("pattern"));
        assert!(compile("é", RegexOptions::ASCII).is_err());
    }

    #[test]
    fn compile_errors_are_classified() {
        assert_eq!(code_of(compile("(a", RegexOptions::NONE)), ErrorCode::MissingParen);
        assert_eq!(code_of(compile("a)", RegexOptions::NONE)), ErrorCode::MissingParen);
        assert_eq!(code_of(compile("[a", RegexOptions::NONE)), ErrorCode::MissingBracket);
        assert_eq!(code_of(compile("a\\", RegexOptions::NONE)), ErrorCode::TrailingBackslash);
        assert_eq!(code_of(compile("*a", RegexOptions::NONE)), ErrorCode::RepeatArgument);
        assert_eq!(code_of(compile("[z-a]", RegexOptions::NONE)), ErrorCode::BadCharRange);
        assert_eq!(code_of(compile(r"(?P<>a)", RegexOptions::NONE)), ErrorCode::BadNamedCapture);
    }

    #[test]
    fn compile_errors_quote_the_original_pattern() {
        match compile("(a", RegexOptions::MULTILINE) {
            Err(Error::Compile { pattern, .. }) => assert_eq!(pattern, "(a"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn memory_limit_rejects_large_patterns() {
        let options = RegexOptions::NONE;
        let translation = options.translate(r"\w{1000}", 1024);
        assert_eq!(
            code_of(MetaEngine::compile(&translation)),
            ErrorCode::PatternTooLarge
        );
    }

    #[test]
    fn posix_mode_restrictions() {
        let posix = RegexOptions::POSIX;
        assert_eq!(code_of(compile(r"\d+", posix)), ErrorCode::BadEscape);
        assert_eq!(code_of(compile(r"[\w]", posix)), ErrorCode::BadEscape);
        assert_eq!(code_of(compile(r"\bword", posix)), ErrorCode::BadEscape);
        assert_eq!(code_of(compile(r"a*?", posix)), ErrorCode::RepeatOp);
        assert_eq!(code_of(compile(r"(?i)a", posix)), ErrorCode::RepeatArgument);
        assert!(compile(r"\d+", posix | RegexOptions::PERL_CLASSES).is_ok());
        assert!(compile(r"\bword", posix | RegexOptions::WORD_BOUNDARY).is_ok());
        assert!(compile(r"^(a|b)+$", posix).is_ok());
    }

    #[test]
    fn posix_mode_accepts_injected_flags() {
        assert!(compile("^a$", RegexOptions::POSIX | RegexOptions::MULTILINE).is_ok());
    }

    #[test]
    fn posix_anchors_follow_one_line() {
        let engine = compile("^b", RegexOptions::POSIX).unwrap();
        assert_eq!(find(&engine, b"a\nb"), Some(Span::new(2, 3)));
        let engine = compile("^b", RegexOptions::POSIX | RegexOptions::ONE_LINE).unwrap();
        assert_eq!(find(&engine, b"a\nb"), None);
    }

    #[test]
    fn longest_match_prefers_longer_alternative() {
        let engine = compile("a|ab", RegexOptions::NONE).unwrap();
        assert_eq!(find(&engine, b"xab"), Some(Span::new(1, 2)));
        let engine = compile("a|ab", RegexOptions::LONGEST_MATCH).unwrap();
        assert_eq!(find(&engine, b"xab"), Some(Span::new(1, 3)));
    }

    #[test]
    fn longest_match_stays_leftmost() {
        let engine = compile("a+", RegexOptions::LONGEST_MATCH).unwrap();
        assert_eq!(find(&engine, b"baab aaaa"), Some(Span::new(1, 3)));
        let mut slots = [None; 2];
        let engine = compile("(a|ab)(c|bcd)", RegexOptions::LONGEST_MATCH).unwrap();
        assert!(engine.execute(b"abcd", Span::new(0, 4), false, &mut slots));
        assert_eq!(slots[0], Some(Span::new(0, 4)));
    }
}
