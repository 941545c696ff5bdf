//! # Brain Module
//!
//! Rule-based FAQ assistant. No model, no network: every message goes
//! through the same deterministic pipeline.
//!
//! ## Components
//! - `normalizer`: diacritic folding and punctuation stripping
//! - `keywords`: tokenization helpers
//! - `intent`: regex intent patterns (fast exact-intent path)
//! - `thesaurus`: curated synonym table
//! - `classifier`: edge case / greeting / farewell / question
//! - `similarity`: layered similarity between two texts
//! - `matcher`: best FAQ for a message
//! - `response`: structured reply construction
//! - `assistant`: orchestrator over a [`FaqStore`](crate::store::FaqStore)

pub mod assistant;
pub mod classifier;
pub mod intent;
pub mod keywords;
pub mod matcher;
pub mod normalizer;
pub mod response;
pub mod similarity;
pub mod thesaurus;

pub use assistant::FaqAssistant;
pub use response::ChatReply;
