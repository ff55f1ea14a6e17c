// src/internal/debug/mod.rs

pub mod buffer;
pub mod redact;

pub use buffer::{render_template, DebugBuffer, DebugStream, DEFAULT_TEMPLATE};
pub use redact::{redact_bot_token, BOT_TOKEN_REPLACEMENT};
