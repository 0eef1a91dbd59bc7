//! Optional rendering plugins, gated behind their own Cargo features.

#[cfg(feature = "syntect")]
pub mod syntect;
