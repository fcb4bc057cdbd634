//! Library crate for lan-sweep-rs exposing reusable modules.
pub mod neighbor;
pub mod probe;
pub mod range;
pub mod sweep;
pub mod types;
pub mod vendors;
