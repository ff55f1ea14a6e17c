// src/internal/debug/redact.rs

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{NoExpand, Regex};

/// Literal that replaces a bot token found in a request path.
pub const BOT_TOKEN_REPLACEMENT: &str = "/botBOT_TOKEN_REMOVED/";

static BOT_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/bot[0-9]+:[A-Za-z0-9_\-]+/").expect("bot token pattern is valid")
});

/// Replace every `/bot<id>:<secret>/` path segment with
/// [`BOT_TOKEN_REPLACEMENT`].
pub fn redact_bot_token(text: &str) -> Cow<'_, str> {
    BOT_TOKEN.replace_all(text, NoExpand(BOT_TOKEN_REPLACEMENT))
}
