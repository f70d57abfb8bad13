//! Lazily enumerated, memoized sequences of matches.

use std::sync::Arc;

use tracing::trace;

use crate::regex::Regex;
use crate::regexp_match::Match;
use crate::util::{InputBuffer, Span, UnitAnchor};

/// All the successive matches of a regex over one input.
///
/// Matches are produced on demand, one engine search per match, and kept:
/// reading an index that was already produced never searches again. There
/// is a single generation pass, the sequence cannot be restarted.
#[derive(Debug)]
pub struct Matches<'h> {
    regex: Regex,
    buffer: Arc<InputBuffer<'h>>,
    /// The first search, until it has run.
    first: Option<(Span, UnitAnchor)>,
    produced: Vec<Match<'h>>,
    exhausted: bool,
}

impl<'h> Matches<'h> {
    pub(crate) fn new(
        regex: Regex,
        buffer: Arc<InputBuffer<'h>>,
        span: Span,
        anchor: UnitAnchor,
    ) -> Self {
        Self {
            regex,
            buffer,
            first: Some((span, anchor)),
            produced: Vec::new(),
            exhausted: false,
        }
    }

    /// Run one more search. Returns false once the sequence is exhausted.
    fn advance(&mut self) -> bool {
        if self.exhausted {
            return false;
        }
        let next = match (self.first.take(), self.produced.last()) {
            (Some((span, anchor)), _) => self.regex.search(&self.buffer, span, anchor),
            (None, Some(last)) => last.next_match(),
            (None, None) => Match::Empty,
        };
        if next.success() {
            self.produced.push(next);
            true
        } else {
            trace!(
                pattern = self.regex.pattern(),
                matches = self.produced.len(),
                "match sequence exhausted"
            );
            self.exhausted = true;
            false
        }
    }

    /// The match at `index`, searching as far as needed to produce it.
    pub fn get(&mut self, index: usize) -> Option<&Match<'h>> {
        while self.produced.len() <= index {
            if !self.advance() {
                return None;
            }
        }
        self.produced.get(index)
    }

    /// Total number of matches.
    ///
    /// This is expensive: every remaining match is searched for and kept.
    pub fn len(&mut self) -> usize {
        while self.advance() {}
        self.produced.len()
    }

    /// Whether there is no match at all. Searches for the first match if
    /// needed, but never further.
    pub fn is_empty(&mut self) -> bool {
        self.get(0).is_none()
    }

    /// The matches found so far, without searching.
    pub fn produced(&self) -> &[Match<'h>] {
        &self.produced
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Iterate over the matches from the first one. Already produced matches
    /// are replayed, the rest are searched for as the iterator advances.
    pub fn iter(&mut self) -> Iter<'_, 'h> {
        Iter {
            matches: self,
            next: 0,
        }
    }

    /// Produce every remaining match and return them all.
    pub fn into_vec(mut self) -> Vec<Match<'h>> {
        while self.advance() {}
        self.produced
    }
}

/// Iterator over a [`Matches`] sequence.
#[derive(Debug)]
pub struct Iter<'m, 'h> {
    matches: &'m mut Matches<'h>,
    next: usize,
}

impl<'h> Iterator for Iter<'_, 'h> {
    type Item = Match<'h>;

    fn next(&mut self) -> Option<Self::Item> {
        let found = self.matches.get(self.next)?.clone();
        self.next += 1;
        Some(found)
    }
}

impl<'m, 'h> IntoIterator for &'m mut Matches<'h> {
    type Item = Match<'h>;
    type IntoIter = Iter<'m, 'h>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
