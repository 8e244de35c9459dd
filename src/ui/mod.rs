//! Deserialization of graphs exported by the editor.
mod types;

pub use types::*;
