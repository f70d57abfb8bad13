//! The result model: captures, groups and matches.
//!
//! Every object produced by one top-level matching call shares a single
//! [`InputBuffer`] through an [`Arc`]. Spans are translated into reported
//! units once, when the match is built, and the group collection is built
//! eagerly at the same time.

use std::ops::Index;
use std::slice;
use std::sync::Arc;

use crate::encoding;
use crate::regex::Regex;
use crate::util::{InputBuffer, Span, UnitAnchor};

static EMPTY_GROUP: Group<'static> = Group::Empty;

/// A single matched span of the input.
#[derive(Debug, Clone)]
pub struct Capture<'h> {
    buffer: Arc<InputBuffer<'h>>,
    index: usize,
    len: usize,
    bytes: Span,
}

impl<'h> Capture<'h> {
    fn new(buffer: Arc<InputBuffer<'h>>, anchor: UnitAnchor, bytes: Span) -> Self {
        let index = buffer.unit_index(anchor, bytes.from);
        let end = buffer.unit_index(UnitAnchor::new(bytes.from, index), bytes.to);
        Self {
            buffer,
            index,
            len: end - index,
            bytes,
        }
    }

    /// Start of the capture, in UTF-16 units for text input and in bytes
    /// otherwise.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// One past the last unit of the capture.
    pub fn end(&self) -> usize {
        self.index + self.len
    }

    /// The captured bytes, as seen by the engine.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer.bytes()[self.bytes.from..self.bytes.to]
    }

    /// The byte span of the capture.
    pub fn byte_span(&self) -> Span {
        self.bytes
    }

    /// Decode the captured bytes. Invalid UTF-8 is replaced, never rejected.
    pub fn value(&self) -> String {
        encoding::decode(self.as_bytes(), self.buffer.is_utf8())
    }

    fn end_anchor(&self) -> UnitAnchor {
        UnitAnchor::new(self.bytes.to, self.end())
    }
}

/// The result of one capturing group: its capture when it participated in
/// the match, [`Group::Empty`] otherwise.
#[derive(Debug, Clone, Default)]
pub enum Group<'h> {
    Captured(Capture<'h>),
    #[default]
    Empty,
}

impl<'h> Group<'h> {
    pub fn success(&self) -> bool {
        matches!(self, Group::Captured(_))
    }

    pub fn capture(&self) -> Option<&Capture<'h>> {
        match self {
            Group::Captured(capture) => Some(capture),
            Group::Empty => None,
        }
    }

    /// Every capture recorded for the group. The engine only keeps the last
    /// one, so this holds zero or one element.
    pub fn captures(&self) -> &[Capture<'h>] {
        match self {
            Group::Captured(capture) => slice::from_ref(capture),
            Group::Empty => &[],
        }
    }

    pub fn capture_count(&self) -> usize {
        self.captures().len()
    }

    pub fn index(&self) -> usize {
        self.capture().map_or(0, Capture::index)
    }

    pub fn len(&self) -> usize {
        self.capture().map_or(0, Capture::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.capture().map_or(&[], Capture::as_bytes)
    }

    pub fn value(&self) -> String {
        self.capture().map(Capture::value).unwrap_or_default()
    }
}

/// The payload of a successful match.
#[derive(Debug)]
pub struct Matched<'h> {
    regex: Regex,
    buffer: Arc<InputBuffer<'h>>,
    whole: Capture<'h>,
    /// Group 0 is the match itself.
    groups: Box<[Group<'h>]>,
}

/// The outcome of a search: a successful match, or [`Match::Empty`] when
/// nothing (more) was found.
///
/// Cloning is cheap, the payload is shared.
#[derive(Debug, Clone, Default)]
pub enum Match<'h> {
    Success(Arc<Matched<'h>>),
    #[default]
    Empty,
}

impl<'h> Match<'h> {
    /// Build a match from the engine's slots. `anchor` must not lie after
    /// the start of group 0.
    pub(crate) fn from_slots(
        regex: &Regex,
        buffer: &Arc<InputBuffer<'h>>,
        slots: &[Option<Span>],
        anchor: UnitAnchor,
    ) -> Self {
        let Some(Some(whole)) = slots.first() else {
            return Match::Empty;
        };
        let whole = Capture::new(Arc::clone(buffer), anchor, *whole);
        let start = UnitAnchor::new(whole.bytes.from, whole.index);

        let mut groups = Vec::with_capacity(slots.len());
        groups.push(Group::Captured(whole.clone()));
        groups.extend(slots[1..].iter().map(|slot| match slot {
            Some(span) if span.from >= start.byte => {
                Group::Captured(Capture::new(Arc::clone(buffer), start, *span))
            }
            Some(span) => {
                Group::Captured(Capture::new(Arc::clone(buffer), UnitAnchor::ORIGIN, *span))
            }
            None => Group::Empty,
        }));

        Match::Success(Arc::new(Matched {
            regex: regex.clone(),
            buffer: Arc::clone(buffer),
            whole,
            groups: groups.into_boxed_slice(),
        }))
    }

    pub fn success(&self) -> bool {
        matches!(self, Match::Success(_))
    }

    fn whole(&self) -> Option<&Capture<'h>> {
        match self {
            Match::Success(matched) => Some(&matched.whole),
            Match::Empty => None,
        }
    }

    /// Start of the match, in UTF-16 units for text input and bytes otherwise.
    pub fn index(&self) -> usize {
        self.whole().map_or(0, Capture::index)
    }

    pub fn len(&self) -> usize {
        self.whole().map_or(0, Capture::len)
    }

    /// Whether the match has length zero. [`Match::Empty`] is empty too, use
    /// [`Match::success`] to tell a failed search apart.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn end(&self) -> usize {
        self.whole().map_or(0, Capture::end)
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.whole().map_or(&[], Capture::as_bytes)
    }

    pub fn value(&self) -> String {
        self.whole().map(Capture::value).unwrap_or_default()
    }

    /// The regex that produced this match. `None` for [`Match::Empty`].
    pub fn regex(&self) -> Option<&Regex> {
        match self {
            Match::Success(matched) => Some(&matched.regex),
            Match::Empty => None,
        }
    }

    /// Number of groups, group 0 included. 0 for [`Match::Empty`].
    pub fn group_count(&self) -> usize {
        self.groups().len()
    }

    pub fn groups(&self) -> Groups<'_, 'h> {
        match self {
            Match::Success(matched) => Groups {
                groups: &matched.groups,
                regex: Some(&matched.regex),
            },
            Match::Empty => Groups {
                groups: &[],
                regex: None,
            },
        }
    }

    /// The group with the given number. Numbers past the last group yield
    /// [`Group::Empty`].
    pub fn group(&self, index: usize) -> &Group<'h> {
        self.groups().get(index).unwrap_or(&EMPTY_GROUP)
    }

    /// The group with the given name, [`Group::Empty`] for unknown names.
    pub fn name(&self, name: &str) -> &Group<'h> {
        self.groups().name(name).unwrap_or(&EMPTY_GROUP)
    }

    /// Search again, starting where this match ended.
    ///
    /// After an empty match the search starts one byte further, so the same
    /// empty match is never found twice. A search may start exactly at the
    /// end of the input. [`Match::Empty`] stays empty.
    pub fn next_match(&self) -> Match<'h> {
        let Match::Success(matched) = self else {
            return Match::Empty;
        };
        let whole = &matched.whole;
        let anchor = whole.end_anchor();
        let start = if whole.is_empty() {
            anchor.byte + 1
        } else {
            anchor.byte
        };
        let end = matched.buffer.byte_len();
        if start > end {
            return Match::Empty;
        }
        matched
            .regex
            .search(&matched.buffer, Span::new(start, end), anchor)
    }
}

/// The groups of a match, indexable by number or by name.
#[derive(Debug, Clone, Copy)]
pub struct Groups<'a, 'h> {
    groups: &'a [Group<'h>],
    regex: Option<&'a Regex>,
}

impl<'a, 'h> Groups<'a, 'h> {
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&'a Group<'h>> {
        self.groups.get(index)
    }

    pub fn name(&self, name: &str) -> Option<&'a Group<'h>> {
        let index = self.regex?.group_number_from_name(name)?;
        self.groups.get(index)
    }

    pub fn iter(&self) -> slice::Iter<'a, Group<'h>> {
        self.groups.iter()
    }
}

impl<'h> Index<usize> for Groups<'_, 'h> {
    type Output = Group<'h>;

    fn index(&self, index: usize) -> &Self::Output {
        self.groups.get(index).unwrap_or(&EMPTY_GROUP)
    }
}

impl<'h> Index<&str> for Groups<'_, 'h> {
    type Output = Group<'h>;

    fn index(&self, name: &str) -> &Self::Output {
        self.name(name).unwrap_or(&EMPTY_GROUP)
    }
}

impl<'a, 'h> IntoIterator for Groups<'a, 'h> {
    type Item = &'a Group<'h>;
    type IntoIter = slice::Iter<'a, Group<'h>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}
