//! Variable resolver: the pure substitution pass that runs before dispatch.
//!
//! Replaces every known `{entity.field}` placeholder with its value from the
//! [`ContextSnapshot`]. The placeholder vocabulary is fixed, so the automaton
//! is built once for the process; only the replacement values vary per call.
//!
//! Properties the rest of the compiler relies on:
//!
//! - A placeholder whose entity is absent from the snapshot is left in the
//!   text untouched (it later passes through dispatch as literal text).
//! - Idempotent: replacement values are emitted without rescanning, so
//!   `resolve(resolve(s, ctx), ctx) == resolve(s, ctx)`.
//! - Leftmost-longest matching, so `{user.name}` is never clipped to the
//!   shorter `{user}`.

use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};
use once_cell::sync::Lazy;

use crate::context::{ContextSnapshot, PLACEHOLDERS};

static PLACEHOLDER_AC: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasickBuilder::new()
        .match_kind(MatchKind::LeftmostLongest)
        .build(PLACEHOLDERS)
});

/// Substitute every known placeholder in `script` from `snap`.
pub fn resolve(script: &str, snap: &ContextSnapshot) -> String {
    let mut out = String::with_capacity(script.len());
    PLACEHOLDER_AC.replace_all_with(script, &mut out, |m, matched, dst| {
        match snap.lookup(PLACEHOLDERS[m.pattern()]) {
            Some(value) => dst.push_str(&value),
            None => dst.push_str(matched),
        }
        true
    });
    out
}
