use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedTranscript {
    pub results: Vec<NormalizedResult>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedResult {
    pub alternatives: Vec<NormalizedAlternative>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedAlternative {
    pub transcript: String,
    pub confidence: f32,
    pub words: Vec<NormalizedWord>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedWord {
    pub word: String,
    pub start_time: i32,
    pub end_time: i32,
    pub confidence: f32,
    pub speaker_tag: i32,
}
