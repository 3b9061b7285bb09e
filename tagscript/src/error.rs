//! Compile-error taxonomy.
//!
//! Every variant aborts the compile of the script that raised it; no partial
//! message is ever assembled. The `Display` text doubles as the user-facing
//! diagnostic shown by [`validate`](crate::compile::validate), so each message
//! names the offending tag or value and, where useful, the expected usage.

use thiserror::Error;

/// An error raised while compiling a script.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// A color directive's value is neither a recognized name nor a hex code.
    #[error("unknown color `{0}`")]
    UnknownColor(String),

    /// A directive received a value that does not parse as an http(s) URL.
    #[error("{tag}: `{url}` is not a valid http(s) url")]
    InvalidUrl { tag: &'static str, url: String },

    /// A tag was invoked with fewer arguments than its declared minimum, or a
    /// required argument was explicitly unset.
    #[error("{tag}: missing required argument `{param}` (usage: {usage})")]
    MissingArgument {
        tag: &'static str,
        param: &'static str,
        usage: &'static str,
    },

    /// A button ended up with neither a usable label nor an emoji.
    #[error("a button needs a label or an emoji")]
    InvalidButton,

    /// A directive's value exceeds a platform-imposed length limit.
    #[error("{field} exceeds the {max} character limit")]
    TooLong { field: &'static str, max: usize },

    /// An ordering comparison's operand is not an integer after separator
    /// stripping.
    #[error("`{operand}` is not a number in condition `{condition}`")]
    MalformedCondition { condition: String, operand: String },
}
