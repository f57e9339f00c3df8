
/// Recognition settings sent with an offline request.
///
/// The base fields are always present. Each optional block is only attached when the
/// option that triggers it was supplied, so `None` means "let the service decide".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecognitionConfig {
    pub language_code: String,
    pub model: Option<String>,
    pub max_alternatives: u32,
    pub profanity_filter: bool,
    pub enable_automatic_punctuation: bool,
    pub verbatim_transcripts: bool,
    pub enable_word_time_offsets: bool,
    pub word_boosting: Option<WordBoosting>,
    pub diarization: Option<SpeakerDiarization>,
    pub endpointing: Option<EndpointingThresholds>,
    pub custom_configuration: Option<CustomConfiguration>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WordBoosting {
    pub words: Vec<String>,
    pub score: f32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeakerDiarization {
    pub enabled: bool,
    /// `None` keeps the service's own speaker limit.
    pub max_speakers: Option<u32>,
}

/// Endpointing thresholds. Unset members fall back to the service defaults, which is
/// not the same thing as an explicit zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EndpointingThresholds {
    pub start_history: Option<i32>,
    pub start_threshold: Option<f32>,
    pub stop_history: Option<i32>,
    pub stop_history_eou: Option<i32>,
    pub stop_threshold: Option<f32>,
    pub stop_threshold_eou: Option<f32>,
}

impl EndpointingThresholds {
    pub fn is_empty(&self) -> bool {
        self.start_history.is_none()
            && self.start_threshold.is_none()
            && self.stop_history.is_none()
            && self.stop_history_eou.is_none()
            && self.stop_threshold.is_none()
            && self.stop_threshold_eou.is_none()
    }
}

/// Free-form `key:value,key:value` settings forwarded to the service untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomConfiguration(pub String);

impl CustomConfiguration {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone)]
pub struct OfflineRecognitionRequest {
    pub config: RecognitionConfig,
    pub audio: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecognitionResponse {
    pub results: Vec<RecognitionResult>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecognitionResult {
    pub alternatives: Vec<RecognitionAlternative>,
    pub channel_tag: i32,
    pub audio_processed: f32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecognitionAlternative {
    pub transcript: String,
    pub confidence: f32,
    pub words: Vec<WordInfo>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct WordInfo {
    pub word: String,
    pub start_time: i32,
    pub end_time: i32,
    pub confidence: f32,
    pub speaker_tag: i32,
}

#[derive(Debug, Clone)]
pub struct TokenClassificationRequest {
    pub model_name: String,
    pub language_code: String,
    pub queries: Vec<String>,
    pub top_n: u32,
}

/// Token-level predictions for one query, in tokenizer order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TokenPrediction {
    pub tokens: Vec<TokenScores>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TokenScores {
    pub token: String,
    /// Character range of the token inside its query, as reported by the tokenizer.
    pub span: Option<CharSpan>,
    /// Candidate labels in the order the service listed them.
    pub labels: Vec<LabelScore>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharSpan {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelScore {
    pub label: String,
    pub confidence: f32,
}

impl LabelScore {
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}

/// A labelled entity. `end` is exclusive, both offsets count characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySpan {
    pub label: String,
    pub start: usize,
    pub end: usize,
}

impl EntitySpan {
    /// Text of the entity in `query`, `None` when the span does not fit the query.
    pub fn text<'a>(&self, query: &'a str) -> Option<&'a str> {
        let width = self.end.checked_sub(self.start)?;
        let mut boundaries = query
            .char_indices()
            .map(|(index, _)| index)
            .chain(std::iter::once(query.len()));
        let start = boundaries.nth(self.start)?;
        let end = match width {
            0 => start,
            _ => boundaries.nth(width - 1)?,
        };
        query.get(start..end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpointing_is_empty_only_when_every_member_is_unset() {
        assert!(EndpointingThresholds::default().is_empty());
        let thresholds = EndpointingThresholds {
            stop_threshold_eou: Some(0.0),
            ..Default::default()
        };
        assert!(!thresholds.is_empty());
    }

    #[test]
    fn entity_text_uses_character_offsets() {
        let query = "Ça va à Zürich?";
        let span = EntitySpan {
            label: "LOC".to_string(),
            start: 8,
            end: 14,
        };
        assert_eq!(span.text(query), Some("Zürich"));
    }

    #[test]
    fn entity_text_rejects_out_of_range_spans() {
        let span = EntitySpan {
            label: "LOC".to_string(),
            start: 2,
            end: 9,
        };
        assert_eq!(span.text("abc"), None);
    }

    #[test]
    fn inverted_span_has_no_text() {
        let span = EntitySpan {
            label: "LOC".to_string(),
            start: 3,
            end: 1,
        };
        assert_eq!(span.text("abcdef"), None);
    }
}
