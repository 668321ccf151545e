//! # hwbot-channels
//!
//! Notification channels for the homework bot.

pub mod telegram;
pub(crate) mod utils;
