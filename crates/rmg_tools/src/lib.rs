//! # RMG Development Tools
//!
//! Command-line tools for development:
//! - Sample map generation with JSON or bincode output
//! - Settings file validation

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod error;
pub mod output;
pub mod recipes;
pub mod validate;
