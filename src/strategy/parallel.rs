//! Parallel batches
//!
//! Uses Rayon to parse independent buffers, or to run several queries
//! against one document. Each parse session stays single-threaded.

use crate::dom::{Document, NodeId};
use crate::query::{find_all, QueryOptions};
use rayon::prelude::*;

/// Parse several independent buffers in parallel, preserving input order
pub fn parse_many<I>(inputs: &[I]) -> Vec<Document>
where
    I: AsRef<[u8]> + Sync,
{
    inputs
        .par_iter()
        .map(|input| Document::parse(input.as_ref()))
        .collect()
}

/// Evaluate several queries against one document in parallel
pub fn find_many(doc: &Document, queries: &[QueryOptions]) -> Vec<Vec<NodeId>> {
    queries
        .par_iter()
        .map(|options| find_all(doc, options))
        .collect()
}

/// Run one query and map every match in parallel
pub fn find_map<F, T>(doc: &Document, options: &QueryOptions, mapper: F) -> Vec<T>
where
    F: Fn(NodeId) -> T + Sync + Send,
    T: Send,
{
    find_all(doc, options).par_iter().map(|&id| mapper(id)).collect()
}
