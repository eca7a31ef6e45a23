//! Foundation types and traits for RETRO_OS.
//!
//! This crate contains the platform-agnostic types shared by all RETRO_OS
//! crates: colors, input events, backend trait definitions, configuration,
//! error types, and the built-in bitmap font.

pub mod backend;
pub mod bitmap_font;
pub mod color;
pub mod config;
pub mod error;
pub mod input;
