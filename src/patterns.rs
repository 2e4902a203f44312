//! Process-wide cache of compiled regular expressions.
//!
//! Patterns are the static protocol grammars used by the decoders, never user
//! input, so the cache only ever grows to the number of distinct grammars in
//! this crate. Lookups go through a sharded concurrent map and each pattern is
//! compiled at most once.

use dashmap::DashMap;
use once_cell::sync::Lazy;
use regex::Regex;

static COMPILED: Lazy<DashMap<&'static str, Regex>> = Lazy::new(DashMap::new);

/// Get the compiled form of `pattern`, compiling it on first use
pub(crate) fn get(pattern: &'static str) -> Regex {
    if let Some(re) = COMPILED.get(pattern) {
        return re.clone();
    }

    COMPILED
        .entry(pattern)
        .or_insert_with(|| {
            tracing::trace!(pattern, "compiling pattern");
            Regex::new(pattern).expect("static APRS pattern must compile")
        })
        .clone()
}
