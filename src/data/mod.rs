//! Loading persistence diagram collections from files
//!
//! Text and JSON formats are supported; see [`diagrams`] for the layout.

pub mod diagrams;

pub use self::diagrams::*;
