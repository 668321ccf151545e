//! # hwbot-core
//!
//! Core types, traits, configuration, and error handling for the homework bot.

pub mod config;
pub mod dedup;
pub mod error;
pub mod homework;
pub mod render;
pub mod traits;
pub mod validate;
