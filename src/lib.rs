//! rPalette - extract the dominant colors of every image in a URL list.
//!
//! The binary in `main.rs` is a thin CLI over this library: read a list of
//! image references, fetch and decode each one, scan its pixels in parallel
//! into a color histogram, and write the three most frequent colors per
//! image as one CSV record.

pub mod color;
pub mod config;
pub mod errors;
pub mod histogram;
pub mod input;
pub mod logging;
pub mod output;
pub mod pipeline;
pub mod scanner;
pub mod selector;
pub mod source;
