//! Conversion between UTF-16 text and the bytes handed to the engine.

use tracing::debug;

use crate::error::{Error, Result};
use crate::options::Encoding;

/// Output of a text conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    pub bytes: Vec<u8>,
    /// Number of code points. Differs from the UTF-16 length when the text
    /// contains surrogate pairs.
    pub code_points: usize,
}

impl Encoded {
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Convert UTF-16 `units` into the byte form required by `encoding`.
///
/// `argument` names the caller's argument and ends up in the error when a
/// single-byte encoding cannot represent the text.
pub fn convert(units: &[u16], argument: &'static str, encoding: Encoding) -> Result<Encoded> {
    if units.is_empty() {
        return Ok(Encoded {
            bytes: Vec::new(),
            code_points: 0,
        });
    }
    match encoding {
        Encoding::Utf8 => Ok(to_utf8(units)),
        Encoding::Latin1 | Encoding::Ascii => to_single_byte(units, argument, encoding),
    }
}

/// Check that every code unit of `text` is representable in `encoding`.
pub fn validate(text: &str, argument: &'static str, encoding: Encoding) -> Result<()> {
    if !encoding.is_single_byte() {
        return Ok(());
    }
    let units: Vec<u16> = text.encode_utf16().collect();
    to_single_byte(&units, argument, encoding).map(|_| ())
}

/// Decode engine bytes back into text. UTF-8 decoding substitutes U+FFFD for
/// invalid sequences. Single-byte decoding is total.
pub fn decode(bytes: &[u8], utf8: bool) -> String {
    if utf8 {
        String::from_utf8_lossy(bytes).into_owned()
    } else {
        bytes.iter().map(|&b| char::from(b)).collect()
    }
}

fn is_high_surrogate(unit: u16) -> bool {
    (0xD800..0xDC00).contains(&unit)
}

fn is_low_surrogate(unit: u16) -> bool {
    (0xDC00..0xE000).contains(&unit)
}

/// Combine surrogate pairs and encode every code point as 1-4 bytes.
///
/// A surrogate without its partner is written with the generalized 3-byte
/// form, which keeps one lead byte per UTF-16 unit.
fn to_utf8(units: &[u16]) -> Encoded {
    let mut bytes = Vec::with_capacity(units.len() * 3 / 2 + 1);
    let mut code_points = 0;
    let mut i = 0;
    while i < units.len() {
        let unit = units[i];
        let code_point = match units.get(i + 1) {
            Some(&low) if is_high_surrogate(unit) && is_low_surrogate(low) => {
                i += 1;
                (u32::from(unit) - 0xD800) * 0x400 + (u32::from(low) - 0xDC00) + 0x10000
            }
            _ => u32::from(unit),
        };
        push_code_point(&mut bytes, code_point);
        code_points += 1;
        i += 1;
    }
    Encoded { bytes, code_points }
}

fn push_code_point(bytes: &mut Vec<u8>, cp: u32) {
    if cp < 0x80 {
        bytes.push(cp as u8);
    } else if cp < 0x800 {
        bytes.push(0xC0 | (cp >> 6) as u8);
        bytes.push(0x80 | (cp & 0x3F) as u8);
    } else if cp < 0x10000 {
        bytes.push(0xE0 | (cp >> 12) as u8);
        bytes.push(0x80 | ((cp >> 6) & 0x3F) as u8);
        bytes.push(0x80 | (cp & 0x3F) as u8);
    } else {
        bytes.push(0xF0 | (cp >> 18) as u8);
        bytes.push(0x80 | ((cp >> 12) & 0x3F) as u8);
        bytes.push(0x80 | ((cp >> 6) & 0x3F) as u8);
        bytes.push(0x80 | (cp & 0x3F) as u8);
    }
}

/// Encode, decode again and compare: any unit that does not survive the
/// round trip makes the whole conversion fail.
fn to_single_byte(units: &[u16], argument: &'static str, encoding: Encoding) -> Result<Encoded> {
    let max = encoding.max_unit();
    let bytes: Vec<u8> = units
        .iter()
        .map(|&unit| if unit <= max { unit as u8 } else { b'?' })
        .collect();

    let mismatch = bytes
        .iter()
        .zip(units)
        .position(|(&byte, &unit)| u16::from(byte) != unit);
    if let Some(position) = mismatch {
        debug!(argument, %encoding, position, "text is not representable");
        return Err(Error::Encoding {
            argument,
            encoding,
            position,
        });
    }

    Ok(Encoded {
        code_points: bytes.len(),
        bytes,
    })
}
