//! # hwbot-practicum
//!
//! Client for the homework review status endpoint.

pub mod practicum;

pub use practicum::PracticumClient;
