//! Script-to-message compiler for user-authored bot templates.
//!
//! End users configure features (welcome messages, moderation logs,
//! autoresponders, timed announcements) as short script strings; this crate
//! compiles one such script, against one read-only context snapshot, into a
//! structured chat message: optional text content, rich embeds, and link
//! buttons.
//!
//! Grammar in brief:
//!
//! | Syntax                          | Meaning                                 |
//! |---------------------------------|-----------------------------------------|
//! | `{name: arg1 && arg2 && ...}`   | Tag invocation                          |
//! | `{entity.field}`                | Placeholder substituted from the snapshot |
//! | `{embed}`                       | Starts a new embed segment              |
//! | `$v`                            | Separates directives inside a segment   |
//! | `\{` `\}`                       | Literal braces                          |
//!
//! Unknown tags and ordinary text pass through verbatim; a script with no
//! recognized directives compiles to a message whose content is the
//! fully-substituted script itself.
//!
//! # Quick start
//!
//! ```rust
//! use tagscript::{compile, ContextSnapshot};
//! use tagscript::context::Member;
//!
//! let snapshot = ContextSnapshot {
//!     user: Some(Member {
//!         name: "alice".into(),
//!         id: 7,
//!         avatar_url: None,
//!         created_at: None,
//!         joined_at: None,
//!     }),
//!     ..Default::default()
//! };
//!
//! let msg = compile(
//!     "welcome {user.mention}!{embed}$v{title: Enjoy your stay}$v{color: blurple}",
//!     &snapshot,
//! )
//! .unwrap();
//!
//! assert_eq!(msg.content.as_deref(), Some("welcome <@7>!"));
//! assert_eq!(msg.embeds[0].title.as_deref(), Some("Enjoy your stay"));
//! ```
//!
//! The compiler is a pure function of script and snapshot: no state lives on
//! the engine between calls, so any number of compiles may run concurrently.
//! Validation at script-authoring time uses [`validate`], which runs every
//! handler but suppresses message assembly.

pub mod builtins;
pub mod color;
pub mod compile;
pub mod cond;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod message;
pub mod registry;
pub mod resolve;

// Re-exports for convenience.
pub use compile::{compile, validate, CompileContext, EMBED_MARKER, FIELD_SEPARATOR};
pub use context::ContextSnapshot;
pub use error::CompileError;
pub use message::{ButtonDescriptor, CompiledMessage, EmbedStruct};
pub use resolve::resolve;
