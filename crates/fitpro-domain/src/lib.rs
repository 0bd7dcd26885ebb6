//! Domain types shared across FitPro crates.
//!
//! Pure types only: no framework, storage or network dependencies.

pub mod id;
pub mod slug;
