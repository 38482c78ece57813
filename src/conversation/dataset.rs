use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use crate::conversation::{
    ConversationRaw, ConversationSample, Corpus, SampleAssembler, SpeakerCode,
    SpectrogramResolver, Split, Tokenizer, UtteranceEncoder,
};
use crate::transform::MapperDataset;
use crate::{Dataset, InMemDataset};

/// Error type for [SpectrogramGraphDataset](SpectrogramGraphDataset).
#[derive(Error, Debug)]
pub enum ErcLoaderError {
    /// The requested split does not exist for the corpus.
    #[error("unsupported split `{split}` for corpus `{corpus}`")]
    UnsupportedSplit {
        /// Requested corpus.
        corpus: Corpus,
        /// Requested split.
        split: Split,
    },

    /// I/O operation error.
    #[error("I/O error: `{0}`")]
    Io(String),

    /// Document deserialization error.
    #[error("parse error: `{0}`")]
    Parse(String),

    /// The graph document does not contain the requested split.
    #[error("missing split `{0}` in graph document")]
    MissingSplit(String),

    /// Stored arrays disagree on lengths or reference invalid positions.
    #[error("structural inconsistency: {0}")]
    Misaligned(String),
}

/// Path bases for the on-disk artifacts of a corpus.
///
/// Keeps all path bases injectable so fixtures and alternative layouts can
/// be pointed at without touching code.
#[derive(Debug, Clone)]
pub struct DatasetPaths {
    data_dir: PathBuf,
    spectrogram_dir: PathBuf,
    transcript_file: PathBuf,
}

impl DatasetPaths {
    /// Creates the default layout under the given root directory.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref();
        Self {
            data_dir: root.join("bert_data"),
            spectrogram_dir: root.join("iemocap_spectrograms"),
            transcript_file: root.join("iemocapTrans.csv"),
        }
    }

    /// Overrides the directory holding the serialized graph and attribute documents.
    pub fn with_data_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.data_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Overrides the directory holding the per-emotion spectrogram folders.
    pub fn with_spectrogram_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.spectrogram_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Overrides the transcript csv file path.
    pub fn with_transcript_file<P: AsRef<Path>>(mut self, file: P) -> Self {
        self.transcript_file = file.as_ref().to_path_buf();
        self
    }

    fn graph_file(&self, corpus: Corpus, hip: usize) -> PathBuf {
        self.data_dir
            .join(corpus.to_string())
            .join(format!("{corpus}_graph_hip{hip}.json"))
    }

    fn edge_attr_file(&self, corpus: Corpus, split: Split) -> PathBuf {
        self.data_dir
            .join(corpus.to_string())
            .join(format!("{corpus}_edge_attr_{split}.json"))
    }
}

/// The four aligned per-conversation arrays of one split, as serialized.
#[derive(Deserialize, Debug)]
struct GraphSplit {
    utterances: Vec<Vec<String>>,
    labels: Vec<Vec<i64>>,
    speakers: Vec<Vec<SpeakerCode>>,
    graph: GraphArrays,
}

#[derive(Deserialize, Debug)]
struct GraphArrays {
    edge_index: Vec<Vec<[usize; 2]>>,
    edge_type: Vec<Vec<String>>,
}

/// Per-conversation commonsense attribute lookups, indexed by source
/// utterance position then relation type label.
type EdgeAttrDocument = Vec<Vec<HashMap<String, Vec<f32>>>>;

type ConversationMapper =
    MapperDataset<InMemDataset<ConversationRaw>, SampleAssembler, ConversationRaw>;

/// Random-access dataset over the conversations of one corpus split.
///
/// Construction performs all file I/O and tokenization eagerly: the graph
/// document, the commonsense attribute document, and the transcript table are
/// loaded once and every utterance is tokenized through the injected
/// [Tokenizer]. After construction the dataset is immutable; `get` is a pure
/// read safe to call from multiple threads.
pub struct SpectrogramGraphDataset {
    dataset: ConversationMapper,
}

impl SpectrogramGraphDataset {
    /// Loads the given corpus split.
    ///
    /// `hip` selects the graph variant (the hop distance the graph was built
    /// with). Fails when the split does not exist for the corpus, when a
    /// document cannot be read or parsed, or when the stored arrays are
    /// misaligned.
    pub fn new(
        corpus: Corpus,
        hip: usize,
        split: Split,
        tokenizer: Arc<dyn Tokenizer>,
        paths: &DatasetPaths,
    ) -> Result<Self, ErcLoaderError> {
        if !corpus.supports(split) {
            return Err(ErcLoaderError::UnsupportedSplit { corpus, split });
        }

        let graph_file = paths.graph_file(corpus, hip);
        let mut document: HashMap<String, GraphSplit> = read_json(&graph_file)?;
        let data = document
            .remove(&split.to_string())
            .ok_or_else(|| ErcLoaderError::MissingSplit(split.to_string()))?;

        let edge_attrs: EdgeAttrDocument = read_json(&paths.edge_attr_file(corpus, split))?;

        validate_alignment(&data, &edge_attrs)?;

        log::info!(
            "loaded {} {} split with {} conversations",
            corpus,
            split,
            data.labels.len()
        );

        let encoder = UtteranceEncoder::new(tokenizer);
        let conversations = build_conversations(data, edge_attrs, &encoder);

        let resolver =
            SpectrogramResolver::from_csv(&paths.transcript_file, &paths.spectrogram_dir)
                .map_err(|err| ErcLoaderError::Io(err.to_string()))?;

        let assembler = SampleAssembler::new(corpus, resolver);
        let dataset = MapperDataset::new(InMemDataset::new(conversations), assembler);

        Ok(Self { dataset })
    }
}

impl Dataset<ConversationSample> for SpectrogramGraphDataset {
    fn get(&self, index: usize) -> Option<ConversationSample> {
        self.dataset.get(index)
    }

    fn len(&self) -> usize {
        self.dataset.len()
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ErcLoaderError> {
    let file = File::open(path)
        .map_err(|err| ErcLoaderError::Io(format!("{}: {err}", path.display())))?;

    serde_json::from_reader(BufReader::new(file))
        .map_err(|err| ErcLoaderError::Parse(format!("{}: {err}", path.display())))
}

/// Checks the dataset-level and per-conversation alignment invariants.
fn validate_alignment(
    data: &GraphSplit,
    edge_attrs: &EdgeAttrDocument,
) -> Result<(), ErcLoaderError> {
    let conversations = data.utterances.len();

    let outer = [
        ("labels", data.labels.len()),
        ("speakers", data.speakers.len()),
        ("edge_index", data.graph.edge_index.len()),
        ("edge_type", data.graph.edge_type.len()),
        ("edge_attrs", edge_attrs.len()),
    ];
    for (name, len) in outer {
        if len != conversations {
            return Err(ErcLoaderError::Misaligned(format!(
                "{name} has {len} conversations, utterances has {conversations}"
            )));
        }
    }

    for index in 0..conversations {
        let turns = data.utterances[index].len();
        if data.labels[index].len() != turns || data.speakers[index].len() != turns {
            return Err(ErcLoaderError::Misaligned(format!(
                "conversation {index}: utterances, labels and speakers lengths differ"
            )));
        }

        let edges = data.graph.edge_index[index].len();
        if data.graph.edge_type[index].len() != edges {
            return Err(ErcLoaderError::Misaligned(format!(
                "conversation {index}: {edges} edges but {} edge types",
                data.graph.edge_type[index].len()
            )));
        }

        for &[source, target] in &data.graph.edge_index[index] {
            if source >= turns || target >= turns {
                return Err(ErcLoaderError::Misaligned(format!(
                    "conversation {index}: edge ({source}, {target}) out of {turns} utterances"
                )));
            }
        }
    }

    Ok(())
}

/// Tokenizes every utterance and zips the aligned arrays into one record per
/// conversation.
fn build_conversations(
    data: GraphSplit,
    edge_attrs: EdgeAttrDocument,
    encoder: &UtteranceEncoder,
) -> Vec<ConversationRaw> {
    let GraphSplit {
        utterances,
        labels,
        speakers,
        graph,
    } = data;

    utterances
        .into_iter()
        .zip(labels)
        .zip(speakers)
        .zip(graph.edge_index)
        .zip(graph.edge_type)
        .zip(edge_attrs)
        .map(
            |(((((utterances, labels), speakers), edge_index), edge_type), edge_attrs)| {
                let tokens = utterances
                    .iter()
                    .map(|utterance| encoder.encode(utterance))
                    .collect();

                ConversationRaw {
                    utterances,
                    tokens,
                    labels,
                    speakers,
                    edge_index,
                    edge_type,
                    edge_attrs,
                }
            },
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::WhitespaceTokenizer;

    use serde_json::json;
    use std::io::Write;
    use tempfile::TempDir;

    /// Writes a 2-conversation IEMOCAP-shaped fixture and returns its paths.
    fn write_fixture(root: &TempDir, graph: serde_json::Value, attrs: serde_json::Value) -> DatasetPaths {
        let corpus_dir = root.path().join("bert_data").join("IEMOCAP");
        std::fs::create_dir_all(&corpus_dir).unwrap();

        std::fs::write(
            corpus_dir.join("IEMOCAP_graph_hip1.json"),
            graph.to_string(),
        )
        .unwrap();
        std::fs::write(
            corpus_dir.join("IEMOCAP_edge_attr_train.json"),
            attrs.to_string(),
        )
        .unwrap();

        let transcript = root.path().join("iemocapTrans.csv");
        let mut file = std::fs::File::create(&transcript).unwrap();
        writeln!(file, "to_translate,emotion,title").unwrap();
        writeln!(file, "How are you?,neu,Ses01F_impro01_F000").unwrap();
        writeln!(file, "Fine.,hap,Ses01F_impro01_M000").unwrap();

        DatasetPaths::new(root.path())
    }

    fn fixture_graph() -> serde_json::Value {
        json!({
            "train": {
                "utterances": [
                    ["How are you?", "Fine."],
                    ["Leave me alone."],
                ],
                "labels": [[2, 0], [5]],
                "speakers": [["M", "F"], ["M"]],
                "graph": {
                    "edge_index": [[[0, 1]], [[0, 0]]],
                    "edge_type": [["xWant"], ["oWant"]],
                },
            },
        })
    }

    fn fixture_attrs() -> serde_json::Value {
        json!([
            [{"xWant": [0.1, 0.2]}, {}],
            [{"oWant": [0.3, 0.4]}],
        ])
    }

    fn load(paths: &DatasetPaths) -> Result<SpectrogramGraphDataset, ErcLoaderError> {
        SpectrogramGraphDataset::new(
            Corpus::Iemocap,
            1,
            Split::Train,
            Arc::new(WhitespaceTokenizer::new()),
            paths,
        )
    }

    #[test]
    fn loads_and_assembles_conversations() {
        let root = TempDir::new().unwrap();
        let paths = write_fixture(&root, fixture_graph(), fixture_attrs());

        let dataset = load(&paths).unwrap();

        assert_eq!(dataset.len(), 2);

        let first = dataset.get(0).unwrap();
        assert_eq!(first.edge_relation, vec![0]);
        assert_eq!(first.edge_owant, vec![false]);
        assert_eq!(first.utterance_mask, vec![1.0, 1.0]);
        assert_eq!(first.speakers, vec![0.0, 1.0]);
        assert_eq!(first.edge_attr, vec![vec![0.1, 0.2]]);
        assert!(first.spectrogram_paths[0].contains("Ses01F_impro01_F000.wav.jpeg"));
        assert!(first.spectrogram_paths[1].contains("Ses01F_impro01_M000.wav.jpeg"));

        // Self-loop in the second conversation: backward code, oWant flag set.
        let second = dataset.get(1).unwrap();
        assert_eq!(second.edge_relation, vec![2]);
        assert_eq!(second.edge_owant, vec![true]);
        assert_eq!(second.spectrogram_paths, vec!["".to_string()]);
    }

    #[test]
    fn token_rows_are_padded_uniformly() {
        let root = TempDir::new().unwrap();
        let paths = write_fixture(&root, fixture_graph(), fixture_attrs());

        let first = load(&paths).unwrap().get(0).unwrap();

        // "How are you?" has 3 whitespace tokens, "Fine." has 1.
        assert_eq!(first.token_ids[0].len(), 3);
        assert_eq!(first.token_ids[1], vec![first.token_ids[1][0], 0, 0]);
        assert_eq!(first.attention_mask[1], vec![1.0, 0.0, 0.0]);
    }

    #[test]
    fn get_out_of_range_is_none() {
        let root = TempDir::new().unwrap();
        let paths = write_fixture(&root, fixture_graph(), fixture_attrs());

        let dataset = load(&paths).unwrap();

        assert_eq!(dataset.get(2), None);
    }

    #[test]
    fn unsupported_split_fails() {
        let root = TempDir::new().unwrap();
        let paths = write_fixture(&root, fixture_graph(), fixture_attrs());

        let result = SpectrogramGraphDataset::new(
            Corpus::Iemocap,
            1,
            Split::Dev,
            Arc::new(WhitespaceTokenizer::new()),
            &paths,
        );

        assert!(matches!(
            result,
            Err(ErcLoaderError::UnsupportedSplit { .. })
        ));
    }

    #[test]
    fn missing_split_in_document_fails() {
        let root = TempDir::new().unwrap();
        let mut graph = fixture_graph();
        let train = graph.as_object_mut().unwrap().remove("train").unwrap();
        graph.as_object_mut().unwrap().insert("test".to_string(), train);
        let paths = write_fixture(&root, graph, fixture_attrs());

        assert!(matches!(
            load(&paths),
            Err(ErcLoaderError::MissingSplit(_))
        ));
    }

    #[test]
    fn misaligned_labels_fail_loudly() {
        let root = TempDir::new().unwrap();
        let mut graph = fixture_graph();
        graph["train"]["labels"] = json!([[2], [5]]);
        let paths = write_fixture(&root, graph, fixture_attrs());

        assert!(matches!(load(&paths), Err(ErcLoaderError::Misaligned(_))));
    }

    #[test]
    fn misaligned_outer_arrays_fail_loudly() {
        let root = TempDir::new().unwrap();
        let mut graph = fixture_graph();
        graph["train"]["speakers"] = json!([["M", "F"]]);
        let paths = write_fixture(&root, graph, fixture_attrs());

        assert!(matches!(load(&paths), Err(ErcLoaderError::Misaligned(_))));
    }

    #[test]
    fn edge_out_of_range_fails_loudly() {
        let root = TempDir::new().unwrap();
        let mut graph = fixture_graph();
        graph["train"]["graph"]["edge_index"] = json!([[[0, 5]], [[0, 0]]]);
        let paths = write_fixture(&root, graph, fixture_attrs());

        assert!(matches!(load(&paths), Err(ErcLoaderError::Misaligned(_))));
    }

    #[test]
    fn missing_graph_file_is_io_error() {
        let root = TempDir::new().unwrap();
        let paths = DatasetPaths::new(root.path());

        assert!(matches!(load(&paths), Err(ErcLoaderError::Io(_))));
    }
}
