//! A bounded cache of compiled patterns, and the convenience functions that
//! go through the process-wide instance of it.

use std::num::NonZeroUsize;
use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};

use lru::LruCache;
use tracing::trace;

use crate::error::Result;
use crate::matches::Matches;
use crate::options::RegexOptions;
use crate::regex::Regex;
use crate::regexp_match::Match;
use crate::util::Input;

/// Capacity of the process-wide cache.
pub const DEFAULT_CACHE_SIZE: usize = 15;

type Key = (String, RegexOptions);

/// Compiled patterns keyed by pattern text and options, evicted in least
/// recently used order. A capacity of 0 disables caching.
#[derive(Debug)]
pub struct PatternCache {
    entries: Option<LruCache<Key, Regex>>,
}

impl PatternCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: NonZeroUsize::new(capacity).map(LruCache::new),
        }
    }

    pub fn capacity(&self) -> usize {
        self.entries.as_ref().map_or(0, |entries| entries.cap().get())
    }

    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, LruCache::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the pair is cached. Does not count as a use.
    pub fn contains(&self, pattern: &str, options: RegexOptions) -> bool {
        self.entries
            .as_ref()
            .is_some_and(|entries| entries.contains(&(pattern.to_string(), options)))
    }

    /// The cached regex for `pattern` and `options`, compiling and caching it
    /// on a miss. A pattern that fails to compile leaves the cache untouched.
    pub fn find_or_create(&mut self, pattern: &str, options: RegexOptions) -> Result<Regex> {
        let key = (pattern.to_string(), options);
        let Some(entries) = self.entries.as_mut() else {
            return Regex::with_options(pattern, options);
        };
        if let Some(regex) = entries.get(&key) {
            trace!(pattern, ?options, "pattern cache hit");
            return Ok(regex.clone());
        }

        trace!(pattern, ?options, "pattern cache miss");
        let regex = Regex::with_options(pattern, options)?;
        if let Some(((evicted, evicted_options), _)) = entries.push(key, regex.clone()) {
            trace!(pattern = %evicted, options = ?evicted_options, "pattern cache eviction");
        }
        Ok(regex)
    }

    /// Change the capacity, evicting the least recently used entries when
    /// shrinking.
    pub fn resize(&mut self, capacity: usize) {
        trace!(from = self.capacity(), to = capacity, "pattern cache resize");
        match (NonZeroUsize::new(capacity), self.entries.as_mut()) {
            (None, _) => self.entries = None,
            (Some(capacity), Some(entries)) => entries.resize(capacity),
            (Some(capacity), None) => self.entries = Some(LruCache::new(capacity)),
        }
    }

    pub fn clear(&mut self) {
        if let Some(entries) = self.entries.as_mut() {
            entries.clear();
        }
    }
}

impl Default for PatternCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_SIZE)
    }
}

static CACHE: LazyLock<Mutex<PatternCache>> = LazyLock::new(|| Mutex::new(PatternCache::default()));

fn global() -> MutexGuard<'static, PatternCache> {
    // The cache stays consistent even if a holder panicked.
    CACHE.lock().unwrap_or_else(PoisonError::into_inner)
}

fn cached(pattern: &str, options: RegexOptions) -> Result<Regex> {
    global().find_or_create(pattern, options)
}

/// Capacity of the process-wide pattern cache.
pub fn cache_size() -> usize {
    global().capacity()
}

/// Resize the process-wide pattern cache. 0 disables it.
pub fn set_cache_size(size: usize) {
    global().resize(size);
}

/// [`Regex::is_match`] through the process-wide pattern cache.
pub fn is_match<'h>(
    input: impl Into<Input<'h>>,
    pattern: &str,
    options: RegexOptions,
) -> Result<bool> {
    cached(pattern, options)?.is_match(input)
}

/// [`Regex::find`] through the process-wide pattern cache.
pub fn find<'h>(
    input: impl Into<Input<'h>>,
    pattern: &str,
    options: RegexOptions,
) -> Result<Match<'h>> {
    cached(pattern, options)?.find(input)
}

/// [`Regex::find_all`] through the process-wide pattern cache.
pub fn find_all<'h>(
    input: impl Into<Input<'h>>,
    pattern: &str,
    options: RegexOptions,
) -> Result<Matches<'h>> {
    cached(pattern, options)?.find_all(input)
}
