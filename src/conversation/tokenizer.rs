use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Maximum number of tokens kept per utterance.
pub const MAX_UTTERANCE_TOKENS: usize = 52;

/// One tokenized utterance: token ids plus the aligned attention mask.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenizedUtterance {
    /// Token ids for the utterance.
    pub token_ids: Vec<i64>,
    /// Attention mask, one value per token id.
    pub attention_mask: Vec<f32>,
}

/// External tokenizer collaborator turning an utterance string into token
/// ids and an aligned attention mask.
pub trait Tokenizer: Send + Sync {
    /// Encodes the given text.
    fn encode(&self, text: &str) -> TokenizedUtterance;
}

/// Adapter wrapping an external [Tokenizer] and enforcing the per-utterance
/// truncation contract on both sequences.
#[derive(Clone, new)]
pub struct UtteranceEncoder {
    tokenizer: Arc<dyn Tokenizer>,
    #[new(value = "MAX_UTTERANCE_TOKENS")]
    max_tokens: usize,
}

impl UtteranceEncoder {
    /// Encodes one utterance, truncating token ids and attention mask to the
    /// configured maximum length.
    pub fn encode(&self, text: &str) -> TokenizedUtterance {
        let mut encoded = self.tokenizer.encode(text);

        encoded.token_ids.truncate(self.max_tokens);
        encoded.attention_mask.truncate(self.max_tokens);

        encoded
    }
}

/// Deterministic whitespace tokenizer.
///
/// Splits on whitespace and assigns ids in first-seen order starting at 1
/// (0 is reserved for padding). The attention mask is all ones. Mostly useful
/// for tests and examples where a real subword tokenizer is overkill.
#[derive(Default)]
pub struct WhitespaceTokenizer {
    vocab: RwLock<HashMap<String, i64>>,
}

impl WhitespaceTokenizer {
    /// Creates an empty whitespace tokenizer.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tokenizer for WhitespaceTokenizer {
    fn encode(&self, text: &str) -> TokenizedUtterance {
        let mut vocab = self.vocab.write().unwrap();

        let token_ids: Vec<i64> = text
            .split_whitespace()
            .map(|word| {
                let next_id = vocab.len() as i64 + 1;
                *vocab.entry(word.to_string()).or_insert(next_id)
            })
            .collect();
        let attention_mask = vec![1.0; token_ids.len()];

        TokenizedUtterance {
            token_ids,
            attention_mask,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_tokenizer_is_deterministic() {
        let tokenizer = WhitespaceTokenizer::new();

        let first = tokenizer.encode("hello world");
        let second = tokenizer.encode("world hello");

        assert_eq!(first.token_ids, vec![1, 2]);
        assert_eq!(second.token_ids, vec![2, 1]);
        assert_eq!(first.attention_mask, vec![1.0, 1.0]);
    }

    #[test]
    fn encoder_truncates_both_sequences() {
        struct Repeat;

        impl Tokenizer for Repeat {
            fn encode(&self, _text: &str) -> TokenizedUtterance {
                TokenizedUtterance {
                    token_ids: vec![7; 100],
                    attention_mask: vec![1.0; 100],
                }
            }
        }

        let encoder = UtteranceEncoder::new(Arc::new(Repeat));
        let encoded = encoder.encode("anything");

        assert_eq!(encoded.token_ids.len(), MAX_UTTERANCE_TOKENS);
        assert_eq!(encoded.attention_mask.len(), MAX_UTTERANCE_TOKENS);
    }
}
