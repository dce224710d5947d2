//! Batch strategies
//!
//! - Parallel: rayon-backed batch parsing and batch querying

pub mod parallel;

pub use parallel::{find_many, find_map, parse_many};
