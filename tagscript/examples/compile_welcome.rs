//! Compile a typical welcome-message template and print the result.
//!
//! Run with: `cargo run --example compile_welcome`

use tagscript::context::{Guild, Member};
use tagscript::{compile, ContextSnapshot};

const SCRIPT: &str = "\
{content: hey {user.mention}, welcome to {guild.name}!}\
{button: https://example.com/rules && Read the rules}\
{embed}\
$v{color: blurple}\
$v{title: Member #{guild.count}}\
$v{field: Account created && {user.created_at} && yes}\
$v{footer: {guild.name}}\
$v{timestamp}";

fn main() {
    let snapshot = ContextSnapshot {
        user: Some(Member {
            name: "alice".into(),
            id: 80351110224678912,
            avatar_url: None,
            created_at: "2020-01-05T00:00:00Z".parse().ok(),
            joined_at: None,
        }),
        guild: Some(Guild {
            name: "The Test Server".into(),
            id: 41771983423143937,
            member_count: 512,
            icon_url: None,
        }),
        ..Default::default()
    };

    match compile(SCRIPT, &snapshot) {
        Ok(msg) => println!("{msg:#?}"),
        Err(e) => eprintln!("script error: {e}"),
    }
}
