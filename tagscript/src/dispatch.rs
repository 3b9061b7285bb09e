//! Tokenizer/dispatcher: finds tag invocations and routes them to handlers.
//!
//! The scanner walks the script left to right keeping a brace-depth counter,
//! so a `{...}` occurring inside an argument value (a nested tag call, say)
//! never terminates the enclosing span, and `&&` splits arguments only at
//! depth zero. `\{` and `\}` escape literal braces.
//!
//! Unknown tag names are not errors; their spans pass through verbatim (this
//! is also what keeps unresolved placeholders and the `{embed}` marker
//! intact for later pipeline stages). A known tag's handler runs against the
//! [`CompileContext`] and its return value replaces the span, after which
//! scanning resumes at the start of the replacement; that rescan is what
//! executes the chosen branch of a conditional, and only that branch.
//!
//! Compatibility behavior: a span whose `{` is never closed is auto-closed
//! at end of input before invocation rather than rejected.

use crate::compile::CompileContext;
use crate::error::CompileError;
use crate::registry::{Invocation, TagRegistry};

/// Scan `script`, dispatching every recognized tag into `ctx`.
///
/// Returns the residual text: consumed tags replaced by their handler
/// output, everything else verbatim.
pub fn dispatch(
    script: &str,
    registry: &TagRegistry,
    ctx: &mut CompileContext,
) -> Result<String, CompileError> {
    let mut out = String::with_capacity(script.len());
    let mut rest = script.to_owned();

    loop {
        let Some(start) = copy_until_open(&rest, &mut out) else { break };

        let (end, closed) = matching_brace(&rest, start);
        let inner_end = if closed { end - 1 } else { end };
        let inner = &rest[start + 1..inner_end];

        let (name_raw, args_raw) = match inner.find(':') {
            Some(pos) => (&inner[..pos], Some(&inner[pos + 1..])),
            None => (inner, None),
        };

        let replacement = match registry.lookup(name_raw.trim()) {
            None => None,
            Some(desc) => {
                let raw_args = match args_raw {
                    Some(s) if !s.trim().is_empty() => split_top_level(s, "&&"),
                    _ => Vec::new(),
                };
                let inv = Invocation::new(desc, raw_args);
                inv.check_arity()?;
                log::trace!("dispatching tag `{}`", inv.tag());
                Some((desc.handler)(ctx, &inv)?)
            }
        };

        match replacement {
            // Unknown tag: the span (auto-closed or not) stays literal.
            None => {
                out.push_str(&rest[start..end]);
                rest = rest[end..].to_owned();
            }
            // Handler output is rescanned together with the tail.
            Some(text) => {
                let mut next = text;
                next.push_str(&rest[end..]);
                rest = next;
            }
        }
    }

    Ok(out)
}

/// Copy literal text into `out` (unescaping `\{` / `\}`) up to the next
/// unescaped `{`, returning its byte offset, or `None` when the input is
/// exhausted.
fn copy_until_open(s: &str, out: &mut String) -> Option<usize> {
    let mut iter = s.char_indices().peekable();
    while let Some((i, c)) = iter.next() {
        match c {
            '\\' => {
                if let Some(&(_, next)) = iter.peek() {
                    if next == '{' || next == '}' {
                        out.push(next);
                        iter.next();
                        continue;
                    }
                }
                out.push('\\');
            }
            '{' => return Some(i),
            _ => out.push(c),
        }
    }
    None
}

/// Find the `}` matching the `{` at `start`, honoring nesting and escapes.
///
/// Returns `(end, closed)` where `end` is one past the span. `closed` is
/// false when input ran out first; the caller then treats the span as if a
/// closing brace had been appended.
fn matching_brace(s: &str, start: usize) -> (usize, bool) {
    let mut depth = 0usize;
    let mut iter = s[start..].char_indices().peekable();
    while let Some((i, c)) = iter.next() {
        match c {
            '\\' => {
                if let Some(&(_, next)) = iter.peek() {
                    if next == '{' || next == '}' {
                        iter.next();
                    }
                }
            }
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return (start + i + 1, true);
                }
            }
            _ => {}
        }
    }
    (s.len(), false)
}

/// Split `s` on `sep`, ignoring separators nested inside `{...}`.
///
/// Used for the `&&` argument delimiter and the `$v` field separator; also
/// handles the `{embed}` boundary marker (the separator test runs before the
/// depth counter sees the marker's own brace).
pub fn split_top_level<'a>(s: &'a str, sep: &str) -> Vec<&'a str> {
    let bytes = s.as_bytes();
    let sep_bytes = sep.as_bytes();
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    let mut i = 0usize;
    while i < bytes.len() {
        if depth == 0 && bytes[i..].starts_with(sep_bytes) {
            parts.push(&s[start..i]);
            i += sep_bytes.len();
            start = i;
            continue;
        }
        match bytes[i] {
            b'\\' if i + 1 < bytes.len() && (bytes[i + 1] == b'{' || bytes[i + 1] == b'}') => {
                i += 2;
            }
            b'{' => {
                depth += 1;
                i += 1;
            }
            b'}' => {
                depth = depth.saturating_sub(1);
                i += 1;
            }
            _ => i += 1,
        }
    }
    parts.push(&s[start..]);
    parts
}
