#![warn(missing_docs)]

//! # erc-dataset
//!
//! A library for loading multimodal emotion-recognition-in-conversation
//! corpora. Each indexable item is one conversation, assembled from four
//! independently stored artifacts: tokenized utterances, a commonsense
//! relation graph over utterance positions, per-edge commonsense attribute
//! vectors, and derived relation labels, plus a lookup bridging utterance
//! text to precomputed audio-spectrogram images.

#[macro_use]
extern crate derive_new;

/// Dataset transforms.
pub mod transform;

pub mod conversation;

mod dataset;

pub use dataset::*;
