// src/checker/mod.rs
// =============================================================================
// This module contains all indexing-check logic.
//
// Submodules:
// - normalize: URL forms compared against citations
// - citation:  HTML parsing (page text and <cite> elements)
// - classify:  what one results page means (phrase rules, citations)
// - search:    one query, one outcome, one delay
// - index:     the two-step check and the batch loop
//
// This file (mod.rs) is the module root - it re-exports the public API that
// the rest of the application uses.
// =============================================================================

mod citation;
mod classify;
mod index;
mod normalize;
mod search;

pub use classify::{default_rules, PhraseRule};
pub use index::{CheckResult, IndexChecker, IndexStatus};
pub use search::HttpTransport;
