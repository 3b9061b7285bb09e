//! Output data model: the structured message a script compiles into.
//!
//! Everything here is plain data. The delivery collaborator (whatever sends
//! or edits the platform message) consumes a [`CompiledMessage`]; this crate
//! never talks to the platform itself. The platform's embed-count maximum is
//! enforced by that collaborator, not here; per-value length limits *are*
//! checked at compile time using the constants below.

use chrono::{DateTime, Utc};

/// Maximum length of top-level message content.
pub const MAX_CONTENT: usize = 2000;
/// Maximum length of an embed title.
pub const MAX_TITLE: usize = 256;
/// Maximum length of an embed description.
pub const MAX_DESCRIPTION: usize = 4096;
/// Maximum length of an embed field name.
pub const MAX_FIELD_NAME: usize = 256;
/// Maximum length of an embed field value.
pub const MAX_FIELD_VALUE: usize = 1024;
/// Maximum length of embed footer text.
pub const MAX_FOOTER: usize = 2048;
/// Maximum length of an embed author name.
pub const MAX_AUTHOR: usize = 256;

/// Label used when a button declares an emoji but no label of its own.
pub const DEFAULT_BUTTON_LABEL: &str = "Button";

/// One rich embed, assembled from the directives of one embed segment.
///
/// Every attribute is optional; an embed with no attributes set is valid
/// (each `{embed}` marker yields exactly one, however sparse).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbedStruct {
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub color: Option<u32>,
    pub author: Option<EmbedAuthor>,
    pub footer: Option<EmbedFooter>,
    pub timestamp: Option<DateTime<Utc>>,
    pub fields: Vec<EmbedField>,
    pub image: Option<String>,
    pub thumbnail: Option<String>,
}

impl EmbedStruct {
    /// `true` if no directive has set any attribute.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.url.is_none()
            && self.color.is_none()
            && self.author.is_none()
            && self.footer.is_none()
            && self.timestamp.is_none()
            && self.fields.is_empty()
            && self.image.is_none()
            && self.thumbnail.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedAuthor {
    pub name: String,
    pub icon_url: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedFooter {
    pub text: String,
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// A link-style button rendered on the delivered message.
///
/// Invariant (checked at compile time): a button carries a non-default label
/// or an emoji, never neither.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonDescriptor {
    pub url: String,
    pub label: String,
    pub emoji: Option<String>,
}

/// The final compiler output handed to the delivery collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledMessage {
    pub content: Option<String>,
    pub embeds: Vec<EmbedStruct>,
    pub buttons: Vec<ButtonDescriptor>,
}

impl CompiledMessage {
    /// `true` if the script produced nothing deliverable.
    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.embeds.is_empty() && self.buttons.is_empty()
    }
}
