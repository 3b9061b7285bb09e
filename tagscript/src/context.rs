//! The read-only context snapshot a script is compiled against.
//!
//! The caller assembles a [`ContextSnapshot`] from platform entities and from
//! the results of any lookups it has already performed (a social-profile API
//! call, a moderation case, ...). The engine never fetches anything itself:
//! a lookup that failed upstream is simply an absent field here, and the
//! resolver leaves the corresponding placeholders untouched.
//!
//! Placeholder vocabulary:
//!
//! | Placeholder          | Value                                            |
//! |----------------------|--------------------------------------------------|
//! | `{user}`             | Target user's display name                       |
//! | `{user.mention}`     | Platform mention (`<@id>`)                       |
//! | `{user.name}`        | Display name                                     |
//! | `{user.id}`          | Numeric id                                       |
//! | `{user.avatar}`      | Avatar URL                                       |
//! | `{user.created_at}`  | Account creation date                            |
//! | `{user.joined_at}`   | Guild join date                                  |
//! | `{moderator...}`     | Same shape as `{user...}` for the acting mod     |
//! | `{guild.name}` `{guild.id}` `{guild.count}` `{guild.icon}` | Guild info |
//! | `{channel.name}` `{channel.id}` `{channel.mention}` `{channel.topic}` | Channel info |
//! | `{reason}`           | Punishment reason                                |
//! | `{duration}`         | Punishment duration                              |
//! | `{profile.name}` `{profile.url}` | External profile record              |
//! | `{track}` `{artist}` `{album}` `{plays}` | Now-playing data             |
//! | `{crown}`            | Crown marker derived from the profile record     |
//! | `{time}` `{time.utc}`| Snapshot clock in the primary zone / in UTC      |

use chrono::{DateTime, FixedOffset, Utc};

/// A user or member, reduced to the read-only attributes scripts can see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub name: String,
    pub id: u64,
    pub avatar_url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub joined_at: Option<DateTime<Utc>>,
}

impl Member {
    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guild {
    pub name: String,
    pub id: u64,
    pub member_count: u64,
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub name: String,
    pub id: u64,
    pub topic: Option<String>,
}

impl Channel {
    pub fn mention(&self) -> String {
        format!("<#{}>", self.id)
    }
}

/// A pre-fetched external profile record (listening/social data).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    pub username: String,
    pub url: Option<String>,
    pub track: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub plays: Option<u64>,
    /// Whether the user holds the crown for the current artist.
    pub crown: bool,
}

/// Everything a script may substitute, frozen at compile time.
///
/// Supplied fresh per [`compile`](crate::compile::compile) call and never
/// cached by the engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContextSnapshot {
    pub user: Option<Member>,
    pub moderator: Option<Member>,
    pub guild: Option<Guild>,
    pub channel: Option<Channel>,
    pub reason: Option<String>,
    pub duration: Option<String>,
    pub profile: Option<Profile>,
    /// Current time in the caller's reference zone; UTC is derived from it.
    pub now: Option<DateTime<FixedOffset>>,
}

/// Every placeholder the resolver recognizes. Order is irrelevant to
/// matching (the automaton is leftmost-longest) but indices must line up
/// with [`ContextSnapshot::lookup`].
pub(crate) const PLACEHOLDERS: &[&str] = &[
    "{user.mention}",
    "{user.name}",
    "{user.id}",
    "{user.avatar}",
    "{user.created_at}",
    "{user.joined_at}",
    "{user}",
    "{moderator.mention}",
    "{moderator.name}",
    "{moderator.id}",
    "{moderator}",
    "{guild.name}",
    "{guild.id}",
    "{guild.count}",
    "{guild.icon}",
    "{channel.mention}",
    "{channel.name}",
    "{channel.id}",
    "{channel.topic}",
    "{reason}",
    "{duration}",
    "{profile.name}",
    "{profile.url}",
    "{track}",
    "{artist}",
    "{album}",
    "{plays}",
    "{crown}",
    "{time.utc}",
    "{time}",
];

const DATE_FMT: &str = "%B %-d, %Y";
const TIME_FMT: &str = "%Y-%m-%d %H:%M";

impl ContextSnapshot {
    /// Value for one placeholder, or `None` when the referenced entity is
    /// absent (the resolver then leaves the placeholder in place).
    pub(crate) fn lookup(&self, placeholder: &str) -> Option<String> {
        let user = self.user.as_ref();
        let moderator = self.moderator.as_ref();
        let guild = self.guild.as_ref();
        let channel = self.channel.as_ref();
        let profile = self.profile.as_ref();
        match placeholder {
            "{user}" | "{user.name}" => user.map(|u| u.name.clone()),
            "{user.mention}" => user.map(Member::mention),
            "{user.id}" => user.map(|u| u.id.to_string()),
            "{user.avatar}" => user.and_then(|u| u.avatar_url.clone()),
            "{user.created_at}" => user
                .and_then(|u| u.created_at)
                .map(|t| t.format(DATE_FMT).to_string()),
            "{user.joined_at}" => user
                .and_then(|u| u.joined_at)
                .map(|t| t.format(DATE_FMT).to_string()),
            "{moderator}" | "{moderator.name}" => moderator.map(|m| m.name.clone()),
            "{moderator.mention}" => moderator.map(Member::mention),
            "{moderator.id}" => moderator.map(|m| m.id.to_string()),
            "{guild.name}" => guild.map(|g| g.name.clone()),
            "{guild.id}" => guild.map(|g| g.id.to_string()),
            "{guild.count}" => guild.map(|g| g.member_count.to_string()),
            "{guild.icon}" => guild.and_then(|g| g.icon_url.clone()),
            "{channel.mention}" => channel.map(Channel::mention),
            "{channel.name}" => channel.map(|c| c.name.clone()),
            "{channel.id}" => channel.map(|c| c.id.to_string()),
            "{channel.topic}" => channel.and_then(|c| c.topic.clone()),
            "{reason}" => self.reason.clone(),
            "{duration}" => self.duration.clone(),
            "{profile.name}" => profile.map(|p| p.username.clone()),
            "{profile.url}" => profile.and_then(|p| p.url.clone()),
            "{track}" => profile.and_then(|p| p.track.clone()),
            "{artist}" => profile.and_then(|p| p.artist.clone()),
            "{album}" => profile.and_then(|p| p.album.clone()),
            "{plays}" => profile.and_then(|p| p.plays).map(|n| n.to_string()),
            // Derived from the profile lookup: present only once the profile
            // itself is, empty unless the crown is held.
            "{crown}" => profile.map(|p| if p.crown { "\u{1F451}".to_owned() } else { String::new() }),
            "{time}" => self.now.map(|t| t.format(TIME_FMT).to_string()),
            "{time.utc}" => self
                .now
                .map(|t| t.with_timezone(&Utc).format(TIME_FMT).to_string()),
            _ => None,
        }
    }

    /// Snapshot clock as UTC, falling back to the wall clock when the caller
    /// supplied none.
    pub(crate) fn now_utc(&self) -> DateTime<Utc> {
        self.now.map(|t| t.with_timezone(&Utc)).unwrap_or_else(Utc::now)
    }
}
