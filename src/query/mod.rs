//! Structural query engine
//!
//! `QueryOptions` describes a conjunction of criteria; `find` and
//! `find_all` evaluate it against a parsed `Document`.

pub mod eval;
pub mod options;

pub use eval::{find, find_all, matches};
pub use options::{QueryOptions, TextCondition, TextPredicate};
