use std::collections::HashMap;

use serde::Deserialize;

use crate::conversation::{derive_relation, Corpus, SpectrogramResolver, TokenizedUtterance};
use crate::transform::Mapper;

/// Speaker identifier as stored on disk: either a letter code (IEMOCAP) or an
/// already numeric index (all other corpora).
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum SpeakerCode {
    /// Letter code, e.g. `"M"` or `"F"`.
    Letter(String),
    /// Numeric speaker index.
    Index(i64),
}

/// One conversation as loaded and tokenized at construction time, before
/// sample assembly.
#[derive(Debug, Clone)]
pub struct ConversationRaw {
    /// Utterance strings, one per turn.
    pub utterances: Vec<String>,
    /// Tokenized utterances, aligned with `utterances`.
    pub tokens: Vec<TokenizedUtterance>,
    /// Emotion class codes, aligned with `utterances`.
    pub labels: Vec<i64>,
    /// Speaker codes, aligned with `utterances`.
    pub speakers: Vec<SpeakerCode>,
    /// Directed edges as (source position, target position) pairs.
    pub edge_index: Vec<[usize; 2]>,
    /// Commonsense relation type label per edge, aligned with `edge_index`.
    pub edge_type: Vec<String>,
    /// Commonsense attribute vectors, indexed by source utterance position
    /// then relation type label.
    pub edge_attrs: Vec<HashMap<String, Vec<f32>>>,
}

/// One assembled conversation sample.
///
/// All utterance-aligned fields share length = conversation length; all
/// edge-aligned fields share length = edge count.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationSample {
    /// Token ids, batch-major, padded with 0 to the longest utterance.
    pub token_ids: Vec<Vec<i64>>,
    /// Attention masks, padded with 0.0 identically to `token_ids`.
    pub attention_mask: Vec<Vec<f32>>,
    /// Emotion class code per utterance.
    pub labels: Vec<i64>,
    /// Utterance presence mask, all ones at conversation length.
    pub utterance_mask: Vec<f32>,
    /// Numeric speaker code per utterance.
    pub speakers: Vec<f32>,
    /// Edge endpoint pairs, unchanged from the stored graph.
    pub edge_index: Vec<[usize; 2]>,
    /// Commonsense attribute vector per edge.
    pub edge_attr: Vec<Vec<f32>>,
    /// Whether each edge carries the `oWant` relation type.
    pub edge_owant: Vec<bool>,
    /// 3-way relation code per edge.
    pub edge_relation: Vec<i64>,
    /// Spectrogram image path per utterance; empty when unresolved.
    pub spectrogram_paths: Vec<String>,
}

/// Mapper assembling a loaded conversation into an aligned sample record.
#[derive(new)]
pub struct SampleAssembler {
    corpus: Corpus,
    resolver: SpectrogramResolver,
}

impl SampleAssembler {
    /// Maps stored speaker codes to numeric values.
    ///
    /// For the letter-coded corpus the distinguished `"M"` code maps to 0 and
    /// any other code to 1. Numeric codes pass through unchanged.
    fn speaker_value(&self, speaker: &SpeakerCode) -> f32 {
        match speaker {
            SpeakerCode::Letter(code) => {
                if self.corpus.has_letter_speakers() && code == "M" {
                    0.0
                } else {
                    1.0
                }
            }
            SpeakerCode::Index(index) => *index as f32,
        }
    }
}

/// Pads each sequence with the given value to the length of the longest one.
fn pad_to_longest<T: Copy>(sequences: &[Vec<T>], pad_value: T) -> Vec<Vec<T>> {
    let max_len = sequences.iter().map(Vec::len).max().unwrap_or(0);

    sequences
        .iter()
        .map(|seq| {
            let mut padded = seq.clone();
            padded.resize(max_len, pad_value);
            padded
        })
        .collect()
}

impl Mapper<ConversationRaw, ConversationSample> for SampleAssembler {
    /// Assembles one conversation into a padded, aligned sample.
    ///
    /// # Panics
    ///
    /// Panics if an edge references a (source position, type label) pair
    /// absent from the commonsense attribute lookup. That is a violated
    /// precondition of the stored data, not a recoverable condition.
    fn map(&self, item: &ConversationRaw) -> ConversationSample {
        let token_ids: Vec<Vec<i64>> = item
            .tokens
            .iter()
            .map(|tokens| tokens.token_ids.clone())
            .collect();
        let attention_mask: Vec<Vec<f32>> = item
            .tokens
            .iter()
            .map(|tokens| tokens.attention_mask.clone())
            .collect();

        let utterance_mask = vec![1.0; item.labels.len()];
        let speakers = item
            .speakers
            .iter()
            .map(|speaker| self.speaker_value(speaker))
            .collect();

        let mut edge_attr = Vec::with_capacity(item.edge_index.len());
        let mut edge_owant = Vec::with_capacity(item.edge_index.len());
        let mut edge_relation = Vec::with_capacity(item.edge_index.len());

        for (&[source, target], type_label) in item.edge_index.iter().zip(&item.edge_type) {
            let attr = item
                .edge_attrs
                .get(source)
                .and_then(|types| types.get(type_label))
                .unwrap_or_else(|| {
                    panic!(
                        "missing commonsense attribute for utterance {source} relation `{type_label}`"
                    )
                });
            edge_attr.push(attr.clone());

            let (code, is_owant) = derive_relation(source, target, type_label);
            edge_owant.push(is_owant);
            edge_relation.push(code);
        }

        let spectrogram_paths = item
            .utterances
            .iter()
            .zip(&item.labels)
            .map(|(text, &label)| self.resolver.resolve(text, label))
            .collect();

        ConversationSample {
            token_ids: pad_to_longest(&token_ids, 0),
            attention_mask: pad_to_longest(&attention_mask, 0.0),
            labels: item.labels.clone(),
            utterance_mask,
            speakers,
            edge_index: item.edge_index.clone(),
            edge_attr,
            edge_owant,
            edge_relation,
            spectrogram_paths,
        }
    }
}
