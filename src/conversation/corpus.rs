use strum::{Display, EnumString};

/// Supported conversational emotion recognition corpora.
///
/// The corpus name doubles as the directory and file-name prefix of the
/// serialized graph and edge-attribute documents.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, EnumString)]
pub enum Corpus {
    /// IEMOCAP dyadic sessions. Only train and test splits exist.
    #[strum(serialize = "IEMOCAP")]
    Iemocap,
    /// MELD multi-party TV dialogues.
    #[strum(serialize = "MELD")]
    Meld,
    /// EmoryNLP Friends transcripts.
    #[strum(serialize = "EmoryNLP")]
    EmoryNlp,
    /// DailyDialog written dialogues.
    #[strum(serialize = "DailyDialog")]
    DailyDialog,
}

/// Dataset split.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Split {
    /// Training split.
    Train,
    /// Development split.
    Dev,
    /// Test split.
    Test,
}

impl Corpus {
    /// The splits available for this corpus.
    pub fn splits(&self) -> &'static [Split] {
        match self {
            Corpus::Iemocap => &[Split::Train, Split::Test],
            _ => &[Split::Train, Split::Dev, Split::Test],
        }
    }

    /// Checks whether the given split exists for this corpus.
    pub fn supports(&self, split: Split) -> bool {
        self.splits().contains(&split)
    }

    /// Speakers in this corpus are stored as letter codes rather than
    /// numeric indices and must be remapped at assembly time.
    pub fn has_letter_speakers(&self) -> bool {
        matches!(self, Corpus::Iemocap)
    }
}
