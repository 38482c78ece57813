//! Conversational emotion recognition datasets.
//!
//! The unit of indexing is one conversation. A conversation bundles its
//! tokenized utterances, emotion labels, speaker codes, a commonsense
//! relation graph over utterance positions with per-edge attribute vectors,
//! and one spectrogram image path per utterance.

mod batcher;
mod corpus;
mod dataset;
mod relation;
mod sample;
mod spectrogram;
mod tokenizer;

pub use batcher::*;
pub use corpus::*;
pub use dataset::*;
pub use relation::*;
pub use sample::*;
pub use spectrogram::*;
pub use tokenizer::*;
