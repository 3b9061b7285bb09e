//! The two-phase compiler and the save-time validator.
//!
//! Phase 1 resolves placeholders over the whole script and dispatches the
//! message-level registry (content, buttons, conditionals). The residual is
//! then split on the `{embed}` boundary marker: the piece before the first
//! marker is the message body, and each later piece is one embed segment.
//!
//! Phase 2 handles each segment independently: re-resolve (a no-op when the
//! snapshot already covered everything, by resolver idempotence), split on
//! the top-level `$v` field separator, dispatch each directive against the
//! embed-level registry, and bind exactly one [`EmbedStruct`] to the
//! segment. Segment text outside directives is dropped; an embed's only job
//! is to set attributes.
//!
//! All in-progress state lives in a [`CompileContext`] created at the top of
//! [`compile`] and consumed at its end. Nothing is stored on the engine (the
//! registries are read-only), so concurrent compiles cannot observe each
//! other, and abandoning a call simply drops its context.

use chrono::{DateTime, Utc};

use crate::builtins::{EMBED_TAGS, MESSAGE_TAGS};
use crate::context::ContextSnapshot;
use crate::dispatch::{dispatch, split_top_level};
use crate::error::CompileError;
use crate::message::{ButtonDescriptor, CompiledMessage, EmbedStruct};
use crate::resolve::resolve;

/// Literal token separating the message-level region from embed segments.
pub const EMBED_MARKER: &str = "{embed}";

/// Literal token separating directives within one embed segment.
pub const FIELD_SEPARATOR: &str = "$v";

/// Mutable accumulator for one compile call.
///
/// Created fresh per call and discarded afterwards; never shared, never
/// reused.
#[derive(Debug)]
pub struct CompileContext {
    /// Content set by an explicit `{content: ...}` tag.
    pub content: Option<String>,
    /// Finished embeds, one per consumed segment.
    pub embeds: Vec<EmbedStruct>,
    /// Buttons in registration order.
    pub buttons: Vec<ButtonDescriptor>,
    /// Snapshot clock, for the `{timestamp}` directive.
    pub now: DateTime<Utc>,
    /// The embed being filled by the current segment's directives.
    embed: Option<EmbedStruct>,
}

impl CompileContext {
    pub fn new(now: DateTime<Utc>) -> Self {
        CompileContext {
            content: None,
            embeds: Vec::new(),
            buttons: Vec::new(),
            now,
            embed: None,
        }
    }

    /// The embed bound to the current segment, started on first use.
    pub fn embed(&mut self) -> &mut EmbedStruct {
        self.embed.get_or_insert_with(EmbedStruct::default)
    }

    /// The in-progress embed, if any directive has started one.
    pub fn current_embed(&self) -> Option<&EmbedStruct> {
        self.embed.as_ref()
    }

    /// Close out the current segment's embed. Segments with no directives
    /// still yield one (empty) embed each.
    fn finish_embed(&mut self) {
        let embed = self.embed.take().unwrap_or_default();
        self.embeds.push(embed);
    }
}

/// Compile one script against one context snapshot into a deliverable
/// message.
pub fn compile(
    script: &str,
    snapshot: &ContextSnapshot,
) -> Result<CompiledMessage, CompileError> {
    compile_with(script, snapshot, false)
}

/// Check a script without producing a message.
///
/// Runs the full pipeline (every handler executes, so argument and type
/// errors surface exactly as they would on a live send) but suppresses the
/// final assembly. The first error comes back as a user-facing diagnostic
/// naming the tag and expected usage; the script itself is never modified,
/// so the caller can redisplay it for correction.
pub fn validate(script: &str, snapshot: &ContextSnapshot) -> Result<(), String> {
    compile_with(script, snapshot, true)
        .map(|_| ())
        .map_err(|e| e.to_string())
}

fn compile_with(
    script: &str,
    snapshot: &ContextSnapshot,
    validate_only: bool,
) -> Result<CompiledMessage, CompileError> {
    let mut ctx = CompileContext::new(snapshot.now_utc());

    // Phase 1: message level.
    let resolved = resolve(script, snapshot);
    let residual = dispatch(&resolved, &MESSAGE_TAGS, &mut ctx)?;

    let mut segments = split_top_level(&residual, EMBED_MARKER).into_iter();
    let body = segments.next().unwrap_or_default();

    // Phase 2: one embed per segment.
    for segment in segments {
        let segment = resolve(segment, snapshot);
        for directive in split_top_level(&segment, FIELD_SEPARATOR) {
            // Directive residual text is intentionally dropped.
            dispatch(directive, &EMBED_TAGS, &mut ctx)?;
        }
        ctx.finish_embed();
    }

    log::debug!(
        "compiled script: content={}, {} embed(s), {} button(s)",
        ctx.content.is_some(),
        ctx.embeds.len(),
        ctx.buttons.len(),
    );

    if validate_only {
        return Ok(CompiledMessage::default());
    }

    // With no explicit content tag the phase-1 body is the content verbatim;
    // a script with no recognized directives at all round-trips unchanged.
    let content = match ctx.content.take() {
        Some(text) => Some(text),
        None if !body.is_empty() => Some(body.to_owned()),
        None => None,
    };

    Ok(CompiledMessage {
        content,
        embeds: ctx.embeds,
        buttons: ctx.buttons,
    })
}
