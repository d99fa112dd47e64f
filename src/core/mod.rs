//! Core permission logic
//!
//! Key parsing, domain records and the resolution engine.

pub mod keys;
pub mod models;
pub mod resolver;
