use std::borrow::Cow;

use validator::{Validate, ValidationError};

/// Recognition options as supplied on the command line.
#[derive(Debug, Clone, Default, Validate)]
pub struct RecognitionOptions {
    #[validate(custom(function = "validate_language_code"))]
    pub language_code: String,
    pub model_name: Option<String>,
    pub max_alternatives: u32,
    pub profanity_filter: bool,
    pub automatic_punctuation: bool,
    pub no_verbatim_transcripts: bool,
    pub word_time_offsets: bool,
    pub speaker_diarization: bool,
    pub diarization_max_speakers: Option<u32>,
    pub boosted_lm_words: Vec<String>,
    pub boosted_lm_score: f32,
    pub endpointing: EndpointingOptions,
    pub custom_configuration: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EndpointingOptions {
    pub start_history: Option<i32>,
    pub start_threshold: Option<f32>,
    pub stop_history: Option<i32>,
    pub stop_history_eou: Option<i32>,
    pub stop_threshold: Option<f32>,
    pub stop_threshold_eou: Option<f32>,
}

#[derive(Debug, Clone)]
pub struct TranscribeFileRequest {
    pub audio: Vec<u8>,
    pub options: RecognitionOptions,
}

fn validate_language_code(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("language_code_missing")
            .with_message(Cow::Borrowed("a language code is required")));
    }
    Ok(())
}
