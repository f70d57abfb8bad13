/*!
Input types shared by every matching entry point, and the translation between
engine byte offsets and UTF-16 unit indices.
*/

use std::borrow::Cow;
use std::ops::Range;

use crate::encoding;
use crate::error::Result;
use crate::options::Encoding;

/// The subject of a matching call.
///
/// Text is given as UTF-16 code units and every index reported for it is a
/// unit index. Byte buffers are handed to the engine untouched and indexed by
/// byte.
#[derive(Debug, Clone)]
pub enum Input<'h> {
    Text(Cow<'h, [u16]>),
    Bytes(&'h [u8]),
}

impl Input<'_> {
    /// Length in the input's own units.
    pub fn len(&self) -> usize {
        match self {
            Input::Text(units) => units.len(),
            Input::Bytes(bytes) => bytes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<'h> From<&'h [u16]> for Input<'h> {
    fn from(units: &'h [u16]) -> Self {
        Input::Text(Cow::Borrowed(units))
    }
}

impl<'h> From<&'h Vec<u16>> for Input<'h> {
    fn from(units: &'h Vec<u16>) -> Self {
        Input::Text(Cow::Borrowed(units.as_slice()))
    }
}

impl From<Vec<u16>> for Input<'_> {
    fn from(units: Vec<u16>) -> Self {
        Input::Text(Cow::Owned(units))
    }
}

impl From<&str> for Input<'_> {
    fn from(text: &str) -> Self {
        Input::Text(Cow::Owned(text.encode_utf16().collect()))
    }
}

impl From<&String> for Input<'_> {
    fn from(text: &String) -> Self {
        Input::from(text.as_str())
    }
}

impl<'h> From<&'h [u8]> for Input<'h> {
    fn from(bytes: &'h [u8]) -> Self {
        Input::Bytes(bytes)
    }
}

impl<'h, const N: usize> From<&'h [u8; N]> for Input<'h> {
    fn from(bytes: &'h [u8; N]) -> Self {
        Input::Bytes(bytes.as_slice())
    }
}

/// The bytes presented to the engine for one top-level matching call, shared
/// by every capture derived from that call.
///
/// Text input is converted into an owned buffer. Byte input is borrowed and
/// must not change while matches derived from it are alive, which the borrow
/// checker enforces.
#[derive(Debug, Clone)]
pub struct InputBuffer<'h> {
    bytes: Cow<'h, [u8]>,
    text: Option<Cow<'h, [u16]>>,
    utf8: bool,
}

impl<'h> InputBuffer<'h> {
    pub fn new(input: Input<'h>, encoding: Encoding) -> Result<Self> {
        let utf8 = !encoding.is_single_byte();
        match input {
            Input::Text(units) => {
                let encoded = encoding::convert(&units, "input", encoding)?;
                Ok(InputBuffer {
                    bytes: Cow::Owned(encoded.bytes),
                    text: Some(units),
                    utf8,
                })
            }
            Input::Bytes(bytes) => Ok(InputBuffer {
                bytes: Cow::Borrowed(bytes),
                text: None,
                utf8,
            }),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    /// The original text, when the input was text.
    pub fn text(&self) -> Option<&[u16]> {
        self.text.as_deref()
    }

    /// Whether the bytes are UTF-8 (as opposed to a single-byte encoding).
    pub fn is_utf8(&self) -> bool {
        self.utf8
    }

    /// Whether reported indices differ from byte offsets. Only UTF-8 encoded
    /// text needs translation.
    pub fn translates_units(&self) -> bool {
        self.utf8 && self.text.is_some()
    }

    /// Length in reported units.
    pub fn unit_len(&self) -> usize {
        match &self.text {
            Some(units) => units.len(),
            None => self.bytes.len(),
        }
    }

    /// Map a byte offset at or after `anchor` to a reported index.
    pub fn unit_index(&self, anchor: UnitAnchor, byte_offset: usize) -> usize {
        if self.translates_units() {
            byte_offset_to_unit_index(&self.bytes, anchor, byte_offset)
        } else {
            byte_offset
        }
    }

    /// Map a reported index at or after `anchor` to a byte offset. `None` when
    /// the index lies past the end or between the halves of a surrogate pair.
    pub fn byte_offset(&self, anchor: UnitAnchor, unit_index: usize) -> Option<usize> {
        if self.translates_units() {
            unit_index_to_byte_offset(&self.bytes, anchor, unit_index)
        } else {
            (unit_index <= self.bytes.len()).then_some(unit_index)
        }
    }
}

/// A byte offset whose unit index is already known. Translation only scans
/// the bytes between the anchor and the requested position, so repeated
/// searches over the same buffer stay linear overall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UnitAnchor {
    pub byte: usize,
    pub unit: usize,
}

impl UnitAnchor {
    pub const ORIGIN: UnitAnchor = UnitAnchor { byte: 0, unit: 0 };

    pub fn new(byte: usize, unit: usize) -> Self {
        Self { byte, unit }
    }
}

/// Whether `byte` starts a UTF-8 sequence (`0xxxxxxx` or `11xxxxxx`).
#[inline]
fn is_lead(byte: u8) -> bool {
    byte & 0xC0 != 0x80
}

/// UTF-16 units produced by the sequence starting with `lead`.
#[inline]
fn lead_units(lead: u8) -> usize {
    if lead >= 0xF0 { 2 } else { 1 }
}

/// Number of UTF-16 units encoded by `bytes`.
pub fn count_units(bytes: &[u8]) -> usize {
    bytes
        .iter()
        .filter(|&&b| is_lead(b))
        .map(|&b| lead_units(b))
        .sum()
}

/// Translate a byte offset into a unit index, scanning forward from `anchor`.
pub fn byte_offset_to_unit_index(bytes: &[u8], anchor: UnitAnchor, byte_offset: usize) -> usize {
    debug_assert!(anchor.byte <= byte_offset);
    anchor.unit + count_units(&bytes[anchor.byte..byte_offset])
}

/// Translate a unit index into a byte offset, scanning forward from `anchor`.
pub fn unit_index_to_byte_offset(
    bytes: &[u8],
    anchor: UnitAnchor,
    unit_index: usize,
) -> Option<usize> {
    if unit_index < anchor.unit {
        return None;
    }
    let mut pos = anchor.byte;
    let mut unit = anchor.unit;
    while unit < unit_index {
        let lead = *bytes.get(pos)?;
        unit += lead_units(lead);
        pos += 1;
        while pos < bytes.len() && !is_lead(bytes[pos]) {
            pos += 1;
        }
    }
    (unit == unit_index).then_some(pos)
}

/// A span of byte offsets. Similar to [`std::ops::Range`], but implements
/// Copy.
#[derive(Copy, Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub from: usize,
    pub to: usize,
}

impl Span {
    pub fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }

    pub fn empty(&self) -> bool {
        self.from == self.to
    }

    pub fn valid(&self) -> bool {
        self.from <= self.to
    }

    pub fn len(&self) -> usize {
        self.to.saturating_sub(self.from)
    }
}

impl From<Range<usize>> for Span {
    fn from(value: Range<usize>) -> Self {
        Self {
            from: value.start,
            to: value.end,
        }
    }
}

impl From<Span> for Range<usize> {
    fn from(val: Span) -> Self {
        val.from..val.to
    }
}
