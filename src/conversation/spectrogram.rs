use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, FromRepr};

/// Emotion classes of the IEMOCAP corpus, in label-code order.
#[allow(missing_docs)]
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, FromRepr, EnumCount)]
pub enum Emotion {
    Happy = 0,
    Sad = 1,
    Neutral = 2,
    Angry = 3,
    Excited = 4,
    Frustrated = 5,
}

impl Emotion {
    /// Returns the number of emotion classes.
    pub fn num_classes() -> usize {
        <Self as strum::EnumCount>::COUNT
    }

    /// Short name used in the transcript table emotion column.
    pub fn short_name(&self) -> &'static str {
        match self {
            Emotion::Happy => "hap",
            Emotion::Sad => "sad",
            Emotion::Neutral => "neu",
            Emotion::Angry => "ang",
            Emotion::Excited => "exc",
            Emotion::Frustrated => "fru",
        }
    }

    /// Name of the spectrogram folder holding images for this emotion.
    pub fn folder_name(&self) -> &'static str {
        match self {
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Neutral => "neutral",
            Emotion::Angry => "angry",
            Emotion::Excited => "excited",
            Emotion::Frustrated => "frustrated",
        }
    }
}

/// One row of the transcript table bridging utterance text to the recording
/// title its spectrogram image was rendered from.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct TranscriptRow {
    /// Utterance text.
    #[serde(rename = "to_translate")]
    pub text: String,
    /// Short emotion name (`hap`, `sad`, ...).
    pub emotion: String,
    /// Recording title, the stem of the spectrogram image file.
    pub title: String,
}

/// Resolves an utterance and its emotion label to a spectrogram image path.
///
/// The transcript table is loaded once and scanned in memory in file order.
/// Matching is first-match-wins on exact post-trim equality of both the
/// utterance text and the short emotion name. The table may contain duplicate
/// (text, emotion) rows, so the scan must not be replaced by a keyed index:
/// that would change which title wins.
pub struct SpectrogramResolver {
    rows: Vec<TranscriptRow>,
    spectrogram_dir: PathBuf,
}

impl SpectrogramResolver {
    /// Creates a resolver from already loaded transcript rows.
    pub fn new<P: AsRef<Path>>(rows: Vec<TranscriptRow>, spectrogram_dir: P) -> Self {
        Self {
            rows,
            spectrogram_dir: spectrogram_dir.as_ref().to_path_buf(),
        }
    }

    /// Loads the transcript csv file and creates a resolver.
    ///
    /// Expected columns: `to_translate`, `emotion`, `title`. Row order is
    /// preserved and defines match priority.
    pub fn from_csv<P: AsRef<Path>, Q: AsRef<Path>>(
        transcript_path: P,
        spectrogram_dir: Q,
    ) -> Result<Self, std::io::Error> {
        let mut rdr = csv::ReaderBuilder::new().from_path(transcript_path)?;

        let mut rows = Vec::new();
        for result in rdr.deserialize() {
            let row: TranscriptRow = result?;
            rows.push(row);
        }

        log::debug!("loaded transcript table with {} rows", rows.len());

        Ok(Self::new(rows, spectrogram_dir))
    }

    /// Resolves the spectrogram image path for an utterance and its emotion
    /// label code.
    ///
    /// Returns an empty string when no transcript row matches or when the
    /// label code falls outside the known emotion classes. An empty path is a
    /// sentinel meaning "no image available", not an error.
    pub fn resolve(&self, utterance_text: &str, label_code: i64) -> String {
        let emotion = match usize::try_from(label_code)
            .ok()
            .and_then(Emotion::from_repr)
        {
            Some(emotion) => emotion,
            None => return String::new(),
        };

        let text = utterance_text.trim();
        let short_name = emotion.short_name();

        for row in &self.rows {
            if row.text.trim() == text && row.emotion.trim() == short_name {
                let path = self
                    .spectrogram_dir
                    .join(emotion.folder_name())
                    .join(format!("{}.wav.jpeg", row.title));
                return path.to_string_lossy().into_owned();
            }
        }

        String::new()
    }
}
