//! Bracket manager for single-elimination Top 16 / Top 32 events
//!
//! This crate wraps the pure `bracket_core` engine with:
//! - Local persistence of the current bracket
//! - Shareable links that carry a whole bracket
//! - Text and HTML rendering, with export to disk
//! - A `Session` that ties it together and reports status messages
//!
//! # Usage
//!
//! ```bash
//! # Build a bracket from a list of names, one per line
//! cargo run -p bracket -- new drivers.txt --name "Spring Cup"
//!
//! # Pick winners and look at the result
//! cargo run -p bracket -- pick r1_m1 "Alice"
//! cargo run -p bracket -- show
//! ```

mod config;
mod export;
mod session;
mod share;
mod status;
mod store;
mod view;

pub use config::*;
pub use export::*;
pub use session::*;
pub use share::*;
pub use status::*;
pub use store::*;
pub use view::*;
