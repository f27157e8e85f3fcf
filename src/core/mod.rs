//! Core data structures.

pub mod platform;

pub use platform::PlatformKind;
