use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use speech_domain::{
    DomainError, EndpointingThresholds, OfflineRecognitionRequest, RecognitionAlternative,
    RecognitionConfig, RecognitionResponse, RecognitionResult, SpeakerDiarization,
    SpeechRecognitionPort, WordBoosting, WordInfo,
};
use tonic::transport::Channel;

use crate::pb::asr as pb;
use crate::{await_rpc, GrpcConnectionSettings, RequestMetadata, RivaSpeechRecognitionClient};

const SERVICE: &str = "asr";

pub struct RivaAsrAdapter {
    client: RivaSpeechRecognitionClient<Channel>,
    metadata: RequestMetadata,
    request_timeout: Option<Duration>,
}

impl RivaAsrAdapter {
    pub fn new(channel: Channel, settings: &GrpcConnectionSettings) -> Result<Self, DomainError> {
        Ok(Self {
            client: RivaSpeechRecognitionClient::new(channel)
                .max_decoding_message_size(settings.max_decoding_message_bytes)
                .max_encoding_message_size(settings.max_encoding_message_bytes),
            metadata: RequestMetadata::parse(&settings.metadata)?,
            request_timeout: settings.request_timeout,
        })
    }
}

#[async_trait]
impl SpeechRecognitionPort for RivaAsrAdapter {
    async fn recognize(
        &self,
        request: OfflineRecognitionRequest,
    ) -> Result<RecognitionResponse, DomainError> {
        let mut client = self.client.clone();
        let message = pb::RecognizeRequest {
            config: Some(map_config(request.config)),
            audio: request.audio,
        };
        let rpc = client.recognize(self.metadata.request(message));
        let response = await_rpc(SERVICE, self.request_timeout, rpc).await?;
        Ok(map_response(response))
    }
}

fn map_config(config: RecognitionConfig) -> pb::RecognitionConfig {
    pb::RecognitionConfig {
        language_code: config.language_code,
        model: config.model.unwrap_or_default(),
        max_alternatives: i32::try_from(config.max_alternatives).unwrap_or(i32::MAX),
        profanity_filter: config.profanity_filter,
        enable_automatic_punctuation: config.enable_automatic_punctuation,
        verbatim_transcripts: config.verbatim_transcripts,
        enable_word_time_offsets: config.enable_word_time_offsets,
        speech_contexts: config
            .word_boosting
            .map(map_word_boosting)
            .into_iter()
            .collect(),
        diarization_config: config.diarization.map(map_diarization),
        endpointing_config: config.endpointing.map(map_endpointing),
        custom_configuration: config
            .custom_configuration
            .map(|custom| expand_custom_configuration(custom.as_str()))
            .unwrap_or_default(),
        ..Default::default()
    }
}

fn map_word_boosting(boosting: WordBoosting) -> pb::SpeechContext {
    pb::SpeechContext {
        phrases: boosting.words,
        boost: boosting.score,
    }
}

fn map_diarization(diarization: SpeakerDiarization) -> pb::SpeakerDiarizationConfig {
    pb::SpeakerDiarizationConfig {
        enable_speaker_diarization: diarization.enabled,
        // zero asks the server for its default speaker limit
        max_speaker_count: diarization
            .max_speakers
            .map(|count| i32::try_from(count).unwrap_or(i32::MAX))
            .unwrap_or(0),
    }
}

fn map_endpointing(thresholds: EndpointingThresholds) -> pb::EndpointingConfig {
    pb::EndpointingConfig {
        start_history: thresholds.start_history,
        start_threshold: thresholds.start_threshold,
        stop_history: thresholds.stop_history,
        stop_threshold: thresholds.stop_threshold,
        stop_history_eou: thresholds.stop_history_eou,
        stop_threshold_eou: thresholds.stop_threshold_eou,
    }
}

/// Splits `key:value,key:value` into wire map entries. Values are not interpreted.
fn expand_custom_configuration(raw: &str) -> HashMap<String, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once(':') {
            Some((key, value)) => (key.trim().to_string(), value.trim().to_string()),
            None => (pair.to_string(), String::new()),
        })
        .collect()
}

fn map_response(response: pb::RecognizeResponse) -> RecognitionResponse {
    RecognitionResponse {
        results: response.results.into_iter().map(map_result).collect(),
    }
}

fn map_result(result: pb::SpeechRecognitionResult) -> RecognitionResult {
    RecognitionResult {
        alternatives: result
            .alternatives
            .into_iter()
            .map(|alternative| RecognitionAlternative {
                transcript: alternative.transcript,
                confidence: alternative.confidence,
                words: alternative
                    .words
                    .into_iter()
                    .map(|word| WordInfo {
                        word: word.word,
                        start_time: word.start_time,
                        end_time: word.end_time,
                        confidence: word.confidence,
                        speaker_tag: word.speaker_tag,
                    })
                    .collect(),
            })
            .collect(),
        channel_tag: result.channel_tag,
        audio_processed: result.audio_processed,
    }
}
