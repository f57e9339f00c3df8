use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use speech_domain::{RecognitionAlternative, RecognitionResponse, RecognitionResult, WordInfo};

use crate::{
    ApplicationError, NormalizedAlternative, NormalizedResult, NormalizedTranscript,
    NormalizedWord,
};

const JSON_INDENT: &[u8] = b"    ";

/// Flattens a recognition response, keeping result and alternative order as received.
pub fn normalize(response: &RecognitionResponse) -> NormalizedTranscript {
    NormalizedTranscript {
        results: response.results.iter().map(normalize_result).collect(),
    }
}

fn normalize_result(result: &RecognitionResult) -> NormalizedResult {
    NormalizedResult {
        alternatives: result.alternatives.iter().map(normalize_alternative).collect(),
    }
}

fn normalize_alternative(alternative: &RecognitionAlternative) -> NormalizedAlternative {
    NormalizedAlternative {
        transcript: alternative.transcript.clone(),
        confidence: alternative.confidence,
        words: alternative.words.iter().map(normalize_word).collect(),
    }
}

fn normalize_word(word: &WordInfo) -> NormalizedWord {
    NormalizedWord {
        word: word.word.clone(),
        start_time: word.start_time,
        end_time: word.end_time,
        confidence: word.confidence,
        speaker_tag: word.speaker_tag,
    }
}

/// Renders a value as UTF-8 JSON indented by four spaces. Non-ASCII text is kept as is.
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<String, ApplicationError> {
    let mut buffer = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(JSON_INDENT));
    value.serialize(&mut serializer)?;
    String::from_utf8(buffer)
        .map_err(|err| ApplicationError::Validation(format!("non UTF-8 JSON output: {err}")))
}

pub fn write_transcript_json(
    transcript: &NormalizedTranscript,
    path: &Path,
) -> Result<(), ApplicationError> {
    let rendered = to_pretty_json(transcript)?;
    fs::write(path, rendered).map_err(|source| ApplicationError::Output {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "transcript written");
    Ok(())
}
