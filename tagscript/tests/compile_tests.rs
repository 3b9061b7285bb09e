//! End-to-end tests: whole scripts through `compile`/`validate`.
//!
//! The conditional table mirrors the operator matrix the comparison engine
//! promises; the rest are the behavioral guarantees callers rely on
//! (round-tripping, passthrough, laziness, isolation between concurrent
//! compiles).

use tagscript::context::{Guild, Member, Profile};
use tagscript::{compile, validate, CompileError, CompiledMessage, ContextSnapshot};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn snapshot() -> ContextSnapshot {
    ContextSnapshot {
        user: Some(Member {
            name: "alice".into(),
            id: 7,
            avatar_url: Some("https://cdn.example.com/a.png".into()),
            created_at: None,
            joined_at: None,
        }),
        guild: Some(Guild {
            name: "testers".into(),
            id: 1,
            member_count: 1500,
            icon_url: None,
        }),
        profile: Some(Profile {
            username: "alice_fm".into(),
            plays: Some(1234),
            crown: true,
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn ok(script: &str) -> CompiledMessage {
    compile(script, &snapshot()).unwrap_or_else(|e| panic!("{script:?} failed: {e}"))
}

fn err(script: &str) -> CompileError {
    match compile(script, &snapshot()) {
        Ok(msg) => panic!("{script:?} unexpectedly compiled: {msg:?}"),
        Err(e) => e,
    }
}

// ── Round-tripping and passthrough ────────────────────────────────────────────

#[test]
fn literal_script_round_trips() {
    let msg = ok("plain text, no tags at all");
    assert_eq!(msg.content.as_deref(), Some("plain text, no tags at all"));
    assert!(msg.embeds.is_empty());
    assert!(msg.buttons.is_empty());
}

#[test]
fn unknown_tag_passes_through_unchanged() {
    let msg = ok("{notarealtag: x}");
    assert_eq!(msg.content.as_deref(), Some("{notarealtag: x}"));
}

#[test]
fn placeholders_substitute_in_content() {
    let msg = ok("hi {user.name}, we are {guild.count} strong {crown}");
    assert_eq!(msg.content.as_deref(), Some("hi alice, we are 1500 strong \u{1F451}"));
}

#[test]
fn absent_placeholder_survives_to_output() {
    let msg = ok("banned for {reason}");
    assert_eq!(msg.content.as_deref(), Some("banned for {reason}"));
}

// ── Embeds ────────────────────────────────────────────────────────────────────

#[test]
fn segment_count_matches_marker_count() {
    for k in 1..=4 {
        let script = "{embed}$v{title: t}".repeat(k);
        let msg = ok(&script);
        assert_eq!(msg.embeds.len(), k, "script: {script:?}");
    }
}

#[test]
fn full_embed_assembles() {
    let msg = ok(
        "{embed}\
         $v{color: #336699}\
         $v{title: Welcome}\
         $v{url: https://example.com}\
         $v{description: {user.name} joined}\
         $v{author: {guild.name} && https://cdn.example.com/i.png}\
         $v{field: Plays && {plays} && true}\
         $v{thumbnail: https://cdn.example.com/a.png}\
         $v{footer: case #42}",
    );
    let e = &msg.embeds[0];
    assert_eq!(e.color, Some(0x336699));
    assert_eq!(e.title.as_deref(), Some("Welcome"));
    assert_eq!(e.url.as_deref(), Some("https://example.com"));
    assert_eq!(e.description.as_deref(), Some("alice joined"));
    assert_eq!(e.author.as_ref().map(|a| a.name.as_str()), Some("testers"));
    assert_eq!(e.fields[0].value, "1234");
    assert!(e.fields[0].inline);
    assert_eq!(e.thumbnail.as_deref(), Some("https://cdn.example.com/a.png"));
    assert_eq!(e.footer.as_ref().map(|f| f.text.as_str()), Some("case #42"));
}

#[test]
fn embed_errors_abort_the_whole_compile() {
    assert_eq!(err("{embed}$v{color: mauvelous}"), CompileError::UnknownColor("mauvelous".into()));
    assert!(matches!(
        err("{embed}$v{image: not-a-url}"),
        CompileError::InvalidUrl { tag: "image", .. }
    ));
}

// ── Buttons ───────────────────────────────────────────────────────────────────

#[test]
fn button_invariant() {
    assert_eq!(
        err("{button: https://example.com && none && none}"),
        CompileError::InvalidButton
    );
    let with_label = ok("{button: https://example.com && Site}");
    assert_eq!(with_label.buttons[0].label, "Site");
    let with_emoji = ok("{button: https://example.com && none && \u{2B50}}");
    assert_eq!(with_emoji.buttons[0].emoji.as_deref(), Some("\u{2B50}"));
}

#[test]
fn buttons_keep_registration_order() {
    let msg = ok("{button: https://a.example.com && A}{button: https://b.example.com && B}");
    let labels: Vec<_> = msg.buttons.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(labels, ["A", "B"]);
}

// ── Conditionals ──────────────────────────────────────────────────────────────

#[test]
fn conditional_operator_table() {
    // (condition, expected branch)
    let cases = [
        ("alice == alice", true),
        ("alice == bob", false),
        ("alice != bob", true),
        ("alice != alice", false),
        ("2 >= 2", true),
        ("1 >= 2", false),
        ("2 <= 2", true),
        ("3 <= 2", false),
        ("3 > 2", true),
        ("2 > 3", false),
        ("2 < 3", true),
        ("3 < 2", false),
        ("1,000 >= 500", true),
        ("truthy-word", true),
        ("none", false),
    ];
    for (condition, expect_then) in cases {
        let msg = ok(&format!("{{if: {condition} && THEN && ELSE}}"));
        let expected = if expect_then { "THEN" } else { "ELSE" };
        assert_eq!(msg.content.as_deref(), Some(expected), "condition: {condition:?}");
    }
}

#[test]
fn conditional_on_resolved_placeholder() {
    // {plays} resolves to 1234 before the comparison runs.
    let msg = ok("{if: {plays} >= 1,000 && fan && casual}");
    assert_eq!(msg.content.as_deref(), Some("fan"));
}

#[test]
fn malformed_ordering_operand_is_an_error() {
    assert_eq!(
        err("{if: alice > 3 && a && b}"),
        CompileError::MalformedCondition {
            condition: "alice > 3".into(),
            operand: "alice".into(),
        }
    );
}

#[test]
fn untaken_branch_never_executes() {
    // The button tag sits only in the else branch; taking then must leave
    // the message buttonless.
    let msg = ok("{if: 1 < 2 && safe && {button: https://example.com && Boom}}");
    assert_eq!(msg.content.as_deref(), Some("safe"));
    assert!(msg.buttons.is_empty());

    // And the taken branch's tag does execute.
    let msg = ok("{if: 1 > 2 && safe && {button: https://example.com && Boom}}");
    assert_eq!(msg.buttons.len(), 1);
    assert_eq!(msg.content, None);
}

// ── Validator ─────────────────────────────────────────────────────────────────

#[test]
fn validate_reports_first_error_as_diagnostic() {
    let diag = validate("{if: x > 1 && a && b}", &snapshot()).unwrap_err();
    assert!(diag.contains("`x`"), "diagnostic: {diag}");

    let diag = validate("{button:}", &snapshot()).unwrap_err();
    assert!(diag.contains("button") && diag.contains("url"), "diagnostic: {diag}");
}

#[test]
fn validate_accepts_whatever_compiles() {
    let script = "{content: hi}{embed}$v{title: t}$v{color: red}";
    assert!(validate(script, &snapshot()).is_ok());
    assert!(compile(script, &snapshot()).is_ok());
}

// ── Concurrency isolation ─────────────────────────────────────────────────────

#[test]
fn concurrent_compiles_do_not_cross_talk() {
    let handles: Vec<_> = (0..8)
        .map(|i| {
            std::thread::spawn(move || {
                let snap = snapshot();
                let script = format!(
                    "{{content: msg {i}}}{{button: https://example.com/{i} && B{i}}}{{embed}}$v{{title: t{i}}}"
                );
                let msg = compile(&script, &snap).expect("compile failed");
                (i, msg)
            })
        })
        .collect();

    for handle in handles {
        let (i, msg) = handle.join().expect("thread panicked");
        assert_eq!(msg.content.as_deref(), Some(format!("msg {i}").as_str()));
        assert_eq!(msg.buttons.len(), 1);
        assert_eq!(msg.buttons[0].label, format!("B{i}"));
        assert_eq!(msg.embeds.len(), 1);
        assert_eq!(msg.embeds[0].title.as_deref(), Some(format!("t{i}").as_str()));
    }
}
