//! Utilities shared across the crate

pub mod resource;
pub mod time;
