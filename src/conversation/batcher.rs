use crate::conversation::ConversationSample;

/// A trait for batching items of type `I` into a collection of type `O`.
pub trait Batcher<I, O>: Send + Sync {
    /// Batches the given items.
    fn batch(&self, items: Vec<I>) -> O;
}

/// A batch of conversation samples, transposed into per-field lists.
///
/// Conversations have ragged shapes, so no cross-conversation padding happens
/// here; each field keeps one entry per conversation.
#[derive(Debug, Clone, PartialEq, Default, new)]
pub struct ConversationBatch {
    /// Padded token id matrices, one per conversation.
    pub token_ids: Vec<Vec<Vec<i64>>>,
    /// Padded attention masks, one per conversation.
    pub attention_mask: Vec<Vec<Vec<f32>>>,
    /// Label sequences, one per conversation.
    pub labels: Vec<Vec<i64>>,
    /// Utterance presence masks, one per conversation.
    pub utterance_mask: Vec<Vec<f32>>,
    /// Speaker code sequences, one per conversation.
    pub speakers: Vec<Vec<f32>>,
    /// Edge endpoint pairs, one list per conversation.
    pub edge_index: Vec<Vec<[usize; 2]>>,
    /// Commonsense attribute vectors, one list per conversation.
    pub edge_attr: Vec<Vec<Vec<f32>>>,
    /// Per-edge `oWant` flags, one list per conversation.
    pub edge_owant: Vec<Vec<bool>>,
    /// Per-edge relation codes, one list per conversation.
    pub edge_relation: Vec<Vec<i64>>,
    /// Spectrogram paths, one list per conversation.
    pub spectrogram_paths: Vec<Vec<String>>,
}

/// Pass-through collator grouping conversation samples into per-field lists.
#[derive(Clone, Default, new)]
pub struct ConversationBatcher;

impl Batcher<ConversationSample, ConversationBatch> for ConversationBatcher {
    fn batch(&self, items: Vec<ConversationSample>) -> ConversationBatch {
        let mut batch = ConversationBatch::default();

        for item in items {
            batch.token_ids.push(item.token_ids);
            batch.attention_mask.push(item.attention_mask);
            batch.labels.push(item.labels);
            batch.utterance_mask.push(item.utterance_mask);
            batch.speakers.push(item.speakers);
            batch.edge_index.push(item.edge_index);
            batch.edge_attr.push(item.edge_attr);
            batch.edge_owant.push(item.edge_owant);
            batch.edge_relation.push(item.edge_relation);
            batch.spectrogram_paths.push(item.spectrogram_paths);
        }

        batch
    }
}
