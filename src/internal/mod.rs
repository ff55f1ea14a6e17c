pub mod config;
pub mod debug;
pub mod error;
pub mod global;
pub mod logger;
pub mod router;
