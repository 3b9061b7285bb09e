//! Built-in tags and the two static registries.
//!
//! Message-level tags (compiler phase 1):
//!
//! | Tag                                  | Effect                              |
//! |--------------------------------------|-------------------------------------|
//! | `{content: text}`                    | Sets top-level message content      |
//! | `{button: url && label && emoji}`    | Appends a link button               |
//! | `{if: cond && then && else}`         | Replaced by the chosen branch       |
//!
//! Embed-level tags (phase 2, one directive per `$v`-separated piece):
//!
//! | Tag                                       | Attribute set                  |
//! |-------------------------------------------|--------------------------------|
//! | `{title: text}`                           | title                          |
//! | `{description: text}` / `{desc: ...}`     | description                    |
//! | `{url: url}`                              | title link                     |
//! | `{color: name-or-hex}` / `{colour: ...}`  | accent color                   |
//! | `{author: name && icon && url}`           | author block                   |
//! | `{footer: text && icon}`                  | footer block                   |
//! | `{field: name && value && inline}`        | appends a field                |
//! | `{image: url}` / `{img: ...}`             | large image                    |
//! | `{thumbnail: url}` / `{thumb: ...}`       | thumbnail                      |
//! | `{timestamp}` / `{timestamp: rfc3339}`    | timestamp (defaults to the snapshot clock; no `time` alias, that name belongs to the resolver) |
//! | `{if: cond && then && else}`              | branch, as above               |
//!
//! Both registries are built exactly once; a duplicate name or alias panics
//! there and then (see [`TagRegistry::register`]).

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use url::Url;

use crate::color::parse_color;
use crate::compile::CompileContext;
use crate::cond;
use crate::error::CompileError;
use crate::message::{
    ButtonDescriptor, EmbedAuthor, EmbedField, EmbedFooter, DEFAULT_BUTTON_LABEL, MAX_AUTHOR,
    MAX_CONTENT, MAX_DESCRIPTION, MAX_FIELD_NAME, MAX_FIELD_VALUE, MAX_FOOTER, MAX_TITLE,
};
use crate::registry::{Invocation, TagDescriptor, TagRegistry};

/// Tags recognized at message level.
pub static MESSAGE_TAGS: Lazy<TagRegistry> = Lazy::new(message_tags);

/// Tags recognized inside embed segments.
pub static EMBED_TAGS: Lazy<TagRegistry> = Lazy::new(embed_tags);

fn message_tags() -> TagRegistry {
    let mut reg = TagRegistry::new();
    reg.register(TagDescriptor {
        name: "content",
        aliases: &["text"],
        params: &["text"],
        min_args: 1,
        usage: "{content: message text}",
        handler: tag_content,
    });
    reg.register(TagDescriptor {
        name: "button",
        aliases: &["btn"],
        params: &["url", "label", "emoji"],
        min_args: 1,
        usage: "{button: url && label && emoji}",
        handler: tag_button,
    });
    reg.register(if_descriptor());
    reg
}

fn embed_tags() -> TagRegistry {
    let mut reg = TagRegistry::new();
    reg.register(TagDescriptor {
        name: "title",
        aliases: &[],
        params: &["text"],
        min_args: 1,
        usage: "{title: text}",
        handler: tag_title,
    });
    reg.register(TagDescriptor {
        name: "description",
        aliases: &["desc"],
        params: &["text"],
        min_args: 1,
        usage: "{description: text}",
        handler: tag_description,
    });
    reg.register(TagDescriptor {
        name: "url",
        aliases: &[],
        params: &["url"],
        min_args: 1,
        usage: "{url: https://...}",
        handler: tag_url,
    });
    reg.register(TagDescriptor {
        name: "color",
        aliases: &["colour"],
        params: &["color"],
        min_args: 1,
        usage: "{color: name or hex}",
        handler: tag_color,
    });
    reg.register(TagDescriptor {
        name: "author",
        aliases: &[],
        params: &["name", "icon", "url"],
        min_args: 1,
        usage: "{author: name && icon url && url}",
        handler: tag_author,
    });
    reg.register(TagDescriptor {
        name: "footer",
        aliases: &[],
        params: &["text", "icon"],
        min_args: 1,
        usage: "{footer: text && icon url}",
        handler: tag_footer,
    });
    reg.register(TagDescriptor {
        name: "field",
        aliases: &[],
        params: &["name", "value", "inline"],
        min_args: 2,
        usage: "{field: name && value && inline}",
        handler: tag_field,
    });
    reg.register(TagDescriptor {
        name: "image",
        aliases: &["img"],
        params: &["url"],
        min_args: 1,
        usage: "{image: https://...}",
        handler: tag_image,
    });
    reg.register(TagDescriptor {
        name: "thumbnail",
        aliases: &["thumb"],
        params: &["url"],
        min_args: 1,
        usage: "{thumbnail: https://...}",
        handler: tag_thumbnail,
    });
    reg.register(TagDescriptor {
        name: "timestamp",
        aliases: &[],
        params: &["when"],
        min_args: 0,
        usage: "{timestamp} or {timestamp: rfc3339}",
        handler: tag_timestamp,
    });
    reg.register(if_descriptor());
    reg
}

fn if_descriptor() -> TagDescriptor {
    TagDescriptor {
        name: "if",
        aliases: &[],
        params: &["condition", "then", "else"],
        min_args: 2,
        usage: "{if: condition && then && else}",
        handler: tag_if,
    }
}

// ── Message-level handlers ───────────────────────────────────────────────────

fn tag_content(ctx: &mut CompileContext, inv: &Invocation) -> Result<String, CompileError> {
    let text = inv.require(0)?;
    check_len("content", text, MAX_CONTENT)?;
    ctx.content = Some(text.to_owned());
    Ok(String::new())
}

fn tag_button(ctx: &mut CompileContext, inv: &Invocation) -> Result<String, CompileError> {
    let url = inv.require(0)?;
    check_url("button", url)?;
    let label = inv.get(1);
    let emoji = inv.get(2);
    if label.is_none() && emoji.is_none() {
        return Err(CompileError::InvalidButton);
    }
    ctx.buttons.push(ButtonDescriptor {
        url: url.to_owned(),
        label: label.unwrap_or(DEFAULT_BUTTON_LABEL).to_owned(),
        emoji: emoji.map(str::to_owned),
    });
    Ok(String::new())
}

fn tag_if(_: &mut CompileContext, inv: &Invocation) -> Result<String, CompileError> {
    let condition = inv.get(0).unwrap_or("");
    let then_branch = inv.get(1).unwrap_or("");
    let else_branch = inv.get(2).unwrap_or("");
    cond::evaluate(condition, then_branch, else_branch)
}

// ── Embed-level handlers ─────────────────────────────────────────────────────

fn tag_title(ctx: &mut CompileContext, inv: &Invocation) -> Result<String, CompileError> {
    let text = inv.require(0)?;
    check_len("title", text, MAX_TITLE)?;
    ctx.embed().title = Some(text.to_owned());
    Ok(String::new())
}

fn tag_description(ctx: &mut CompileContext, inv: &Invocation) -> Result<String, CompileError> {
    let text = inv.require(0)?;
    check_len("description", text, MAX_DESCRIPTION)?;
    ctx.embed().description = Some(text.to_owned());
    Ok(String::new())
}

fn tag_url(ctx: &mut CompileContext, inv: &Invocation) -> Result<String, CompileError> {
    let url = inv.require(0)?;
    check_url("url", url)?;
    ctx.embed().url = Some(url.to_owned());
    Ok(String::new())
}

fn tag_color(ctx: &mut CompileContext, inv: &Invocation) -> Result<String, CompileError> {
    ctx.embed().color = Some(parse_color(inv.require(0)?)?);
    Ok(String::new())
}

fn tag_author(ctx: &mut CompileContext, inv: &Invocation) -> Result<String, CompileError> {
    let name = inv.require(0)?;
    check_len("author name", name, MAX_AUTHOR)?;
    let icon_url = inv.get(1);
    let url = inv.get(2);
    if let Some(icon) = icon_url {
        check_url("author", icon)?;
    }
    if let Some(u) = url {
        check_url("author", u)?;
    }
    ctx.embed().author = Some(EmbedAuthor {
        name: name.to_owned(),
        icon_url: icon_url.map(str::to_owned),
        url: url.map(str::to_owned),
    });
    Ok(String::new())
}

fn tag_footer(ctx: &mut CompileContext, inv: &Invocation) -> Result<String, CompileError> {
    let text = inv.require(0)?;
    check_len("footer", text, MAX_FOOTER)?;
    let icon_url = inv.get(1);
    if let Some(icon) = icon_url {
        check_url("footer", icon)?;
    }
    ctx.embed().footer = Some(EmbedFooter {
        text: text.to_owned(),
        icon_url: icon_url.map(str::to_owned),
    });
    Ok(String::new())
}

fn tag_field(ctx: &mut CompileContext, inv: &Invocation) -> Result<String, CompileError> {
    let name = inv.require(0)?;
    let value = inv.require(1)?;
    check_len("field name", name, MAX_FIELD_NAME)?;
    check_len("field value", value, MAX_FIELD_VALUE)?;
    let inline = inv.get(2).map(cond::truthy).unwrap_or(false);
    ctx.embed().fields.push(EmbedField {
        name: name.to_owned(),
        value: value.to_owned(),
        inline,
    });
    Ok(String::new())
}

fn tag_image(ctx: &mut CompileContext, inv: &Invocation) -> Result<String, CompileError> {
    let url = inv.require(0)?;
    check_url("image", url)?;
    ctx.embed().image = Some(url.to_owned());
    Ok(String::new())
}

fn tag_thumbnail(ctx: &mut CompileContext, inv: &Invocation) -> Result<String, CompileError> {
    let url = inv.require(0)?;
    check_url("thumbnail", url)?;
    ctx.embed().thumbnail = Some(url.to_owned());
    Ok(String::new())
}

fn tag_timestamp(ctx: &mut CompileContext, inv: &Invocation) -> Result<String, CompileError> {
    // An unparseable value falls back to the snapshot clock rather than
    // aborting; the directive's intent is always "show a time".
    let when = match inv.get(0) {
        Some(v) if !v.eq_ignore_ascii_case("now") => DateTime::parse_from_rfc3339(v)
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or(ctx.now),
        _ => ctx.now,
    };
    ctx.embed().timestamp = Some(when);
    Ok(String::new())
}

// ── Shared checks ────────────────────────────────────────────────────────────

fn check_len(field: &'static str, value: &str, max: usize) -> Result<(), CompileError> {
    if value.chars().count() > max {
        return Err(CompileError::TooLong { field, max });
    }
    Ok(())
}

fn check_url(tag: &'static str, value: &str) -> Result<(), CompileError> {
    let parsed = Url::parse(value).map_err(|_| CompileError::InvalidUrl {
        tag,
        url: value.to_owned(),
    })?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(CompileError::InvalidUrl { tag, url: value.to_owned() });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::dispatch;
    use chrono::TimeZone;

    fn ctx() -> CompileContext {
        CompileContext::new(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap())
    }

    fn run_message(script: &str) -> Result<CompileContext, CompileError> {
        let mut c = ctx();
        dispatch(script, &MESSAGE_TAGS, &mut c)?;
        Ok(c)
    }

    fn run_embed(script: &str) -> Result<CompileContext, CompileError> {
        let mut c = ctx();
        dispatch(script, &EMBED_TAGS, &mut c)?;
        Ok(c)
    }

    #[test]
    fn content_sets_context() {
        let c = run_message("{content: hello there}").unwrap();
        assert_eq!(c.content.as_deref(), Some("hello there"));
    }

    #[test]
    fn button_with_label() {
        let c = run_message("{button: https://example.com && Docs}").unwrap();
        assert_eq!(
            c.buttons,
            vec![ButtonDescriptor {
                url: "https://example.com".into(),
                label: "Docs".into(),
                emoji: None,
            }]
        );
    }

    #[test]
    fn button_with_emoji_gets_default_label() {
        let c = run_message("{button: https://example.com && none && \u{1F517}}").unwrap();
        assert_eq!(c.buttons[0].label, DEFAULT_BUTTON_LABEL);
        assert_eq!(c.buttons[0].emoji.as_deref(), Some("\u{1F517}"));
    }

    #[test]
    fn button_without_label_or_emoji_is_invalid() {
        let err = run_message("{button: https://example.com && none && none}").unwrap_err();
        assert_eq!(err, CompileError::InvalidButton);
    }

    #[test]
    fn button_rejects_bad_url() {
        let err = run_message("{button: not a url && Docs}").unwrap_err();
        assert!(matches!(err, CompileError::InvalidUrl { tag: "button", .. }));
        let err = run_message("{button: ftp://example.com && Docs}").unwrap_err();
        assert!(matches!(err, CompileError::InvalidUrl { tag: "button", .. }));
    }

    #[test]
    fn embed_attributes_accumulate() {
        let c = run_embed("{title: Hi}{color: red}{field: a && b && yes}").unwrap();
        let embed = c.current_embed().expect("embed started");
        assert_eq!(embed.title.as_deref(), Some("Hi"));
        assert_eq!(embed.color, Some(0xED4245));
        assert_eq!(embed.fields.len(), 1);
        assert!(embed.fields[0].inline);
    }

    #[test]
    fn field_inline_defaults_off() {
        let c = run_embed("{field: a && b}").unwrap();
        assert!(!c.current_embed().expect("embed started").fields[0].inline);
    }

    #[test]
    fn description_too_long() {
        let long = "x".repeat(MAX_DESCRIPTION + 1);
        let err = run_embed(&format!("{{description: {long}}}")).unwrap_err();
        assert_eq!(err, CompileError::TooLong { field: "description", max: MAX_DESCRIPTION });
    }

    #[test]
    fn unknown_color_is_an_error() {
        let err = run_embed("{color: vermilionish}").unwrap_err();
        assert_eq!(err, CompileError::UnknownColor("vermilionish".into()));
    }

    #[test]
    fn timestamp_defaults_to_snapshot_clock() {
        let c = run_embed("{timestamp}").unwrap();
        assert_eq!(
            c.current_embed().expect("embed started").timestamp,
            Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).single()
        );
    }

    #[test]
    fn timestamp_parses_rfc3339() {
        let c = run_embed("{timestamp: 2020-01-02T03:04:05Z}").unwrap();
        assert_eq!(
            c.current_embed().expect("embed started").timestamp,
            Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).single()
        );
    }

    #[test]
    fn if_tag_picks_branch_in_both_registries() {
        let mut c = ctx();
        let out = dispatch("{if: 2 > 1 && big && small}", &MESSAGE_TAGS, &mut c).unwrap();
        assert_eq!(out, "big");
        let out = dispatch("{if: a == b && big && small}", &EMBED_TAGS, &mut c).unwrap();
        assert_eq!(out, "small");
    }

    #[test]
    fn missing_argument_names_parameter_and_usage() {
        let err = run_message("{button:}").unwrap_err();
        assert_eq!(
            err,
            CompileError::MissingArgument {
                tag: "button",
                param: "url",
                usage: "{button: url && label && emoji}",
            }
        );
    }
}
