use std::sync::Arc;

use async_trait::async_trait;

use speech_domain::{OfflineRecognitionRequest, SpeechRecognitionPort};

use crate::{
    normalize, ApplicationError, NormalizedTranscript, RecognitionConfigBuilder,
    TranscribeFileRequest,
};

#[async_trait]
pub trait OfflineTranscriptionUseCase: Send + Sync {
    async fn transcribe(
        &self,
        request: TranscribeFileRequest,
    ) -> Result<NormalizedTranscript, ApplicationError>;
}

pub struct OfflineTranscriptionUseCaseImpl {
    recognition: Arc<dyn SpeechRecognitionPort>,
    config_builder: RecognitionConfigBuilder,
}

impl OfflineTranscriptionUseCaseImpl {
    pub fn new(recognition: Arc<dyn SpeechRecognitionPort>) -> Self {
        Self {
            recognition,
            config_builder: RecognitionConfigBuilder::default(),
        }
    }
}

#[async_trait]
impl OfflineTranscriptionUseCase for OfflineTranscriptionUseCaseImpl {
    async fn transcribe(
        &self,
        request: TranscribeFileRequest,
    ) -> Result<NormalizedTranscript, ApplicationError> {
        let TranscribeFileRequest { audio, options } = request;
        if audio.is_empty() {
            return Err(ApplicationError::Validation(
                "audio input must not be empty".to_string(),
            ));
        }

        let config = self.config_builder.build(&options)?;
        tracing::debug!(
            audio_bytes = audio.len(),
            language_code = %config.language_code,
            max_alternatives = config.max_alternatives,
            word_boosting = config.word_boosting.is_some(),
            diarization = config.diarization.is_some(),
            endpointing = config.endpointing.is_some(),
            custom_configuration = config.custom_configuration.is_some(),
            "starting offline recognition"
        );

        let response = self
            .recognition
            .recognize(OfflineRecognitionRequest { config, audio })
            .await?;
        let transcript = normalize(&response);

        tracing::debug!(
            result_count = transcript.results.len(),
            "offline recognition completed"
        );

        Ok(transcript)
    }
}
