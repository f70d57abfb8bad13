//! String-oriented regular expressions over a byte matching engine.
//!
//! Patterns are compiled by a linear-time, byte-oriented engine. This crate
//! adapts it to callers that address text in UTF-16 code units: text input is
//! converted to the engine's byte encoding (UTF-8, Latin-1 or ASCII), byte
//! spans are translated back into unit indices, and successive matches are
//! produced lazily.
//!
//! ```
//! use uniregex::Regex;
//!
//! let re = Regex::new("a+").unwrap();
//! let m = re.find("baaab").unwrap();
//! assert_eq!((m.index(), m.len()), (1, 3));
//! assert!(!m.next_match().success());
//! ```

pub mod cache;
pub mod encoding;
pub mod engine;
pub mod error;
pub mod matches;
pub mod options;
pub mod regex;
pub mod regexp_match;
pub mod util;

pub use cache::{
    DEFAULT_CACHE_SIZE, PatternCache, cache_size, find, find_all, is_match, set_cache_size,
};
pub use engine::{Engine, MetaEngine};
pub use error::{Error, ErrorCode, Result};
pub use matches::Matches;
pub use options::{DEFAULT_MAX_MEMORY, Encoding, RegexOptions};
pub use regex::{Regex, RegexBuilder};
pub use regexp_match::{Capture, Group, Groups, Match};
pub use util::{Input, Span};
