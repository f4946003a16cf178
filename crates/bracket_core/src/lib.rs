//! Core bracket logic for single-elimination tournaments
//!
//! This crate is free of any I/O. It provides:
//! - Entrant parsing and slot placement for Top 16 / Top 32 brackets
//! - Match addressing (`r{round}_m{number}` and the championship)
//! - Winner recording with automatic advancement and cascade invalidation
//! - A `RenderAdapter` trait that front ends implement to display the bracket

pub mod engine;
pub mod entrant;
pub mod error;
pub mod match_id;
pub mod names;
pub mod render;
pub mod seed_table;
pub mod state;

pub use engine::*;
pub use entrant::*;
pub use error::*;
pub use match_id::*;
pub use names::*;
pub use render::*;
pub use seed_table::*;
pub use state::*;
