use speech_domain::{
    CustomConfiguration, EndpointingThresholds, RecognitionConfig, SpeakerDiarization,
    WordBoosting,
};
use validator::Validate;

use crate::{ConfigError, RecognitionOptions};

/// An optional block of the recognition config.
///
/// A stage only touches its own block, which keeps attachment idempotent and lets the
/// builder apply stages in any order.
pub trait ConfigStage: Send + Sync {
    fn name(&self) -> &'static str;
    fn applies(&self, options: &RecognitionOptions) -> bool;
    fn attach(&self, options: &RecognitionOptions, config: &mut RecognitionConfig);
}

pub struct RecognitionConfigBuilder {
    stages: Vec<Box<dyn ConfigStage>>,
}

impl Default for RecognitionConfigBuilder {
    fn default() -> Self {
        Self::new(vec![
            Box::new(WordBoostingStage),
            Box::new(SpeakerDiarizationStage),
            Box::new(EndpointingStage),
            Box::new(CustomConfigurationStage),
        ])
    }
}

impl RecognitionConfigBuilder {
    pub fn new(stages: Vec<Box<dyn ConfigStage>>) -> Self {
        Self { stages }
    }

    pub fn build(&self, options: &RecognitionOptions) -> Result<RecognitionConfig, ConfigError> {
        options.validate()?;

        let mut config = base_config(options);
        for stage in &self.stages {
            if stage.applies(options) {
                tracing::debug!(stage = stage.name(), "attaching recognition config block");
                stage.attach(options, &mut config);
            }
        }
        Ok(config)
    }
}

fn base_config(options: &RecognitionOptions) -> RecognitionConfig {
    RecognitionConfig {
        language_code: options.language_code.clone(),
        model: options
            .model_name
            .as_ref()
            .filter(|name| !name.is_empty())
            .cloned(),
        max_alternatives: options.max_alternatives,
        profanity_filter: options.profanity_filter,
        enable_automatic_punctuation: options.automatic_punctuation,
        verbatim_transcripts: !options.no_verbatim_transcripts,
        // speaker tags are assigned per word, so diarization needs word timings
        enable_word_time_offsets: options.word_time_offsets || options.speaker_diarization,
        word_boosting: None,
        diarization: None,
        endpointing: None,
        custom_configuration: None,
    }
}

pub struct WordBoostingStage;

impl ConfigStage for WordBoostingStage {
    fn name(&self) -> &'static str {
        "word_boosting"
    }

    fn applies(&self, options: &RecognitionOptions) -> bool {
        boosted_words(options).next().is_some()
    }

    fn attach(&self, options: &RecognitionOptions, config: &mut RecognitionConfig) {
        config.word_boosting = Some(WordBoosting {
            words: boosted_words(options).map(str::to_string).collect(),
            score: options.boosted_lm_score,
        });
    }
}

/// Boosted words with blank entries left out.
fn boosted_words(options: &RecognitionOptions) -> impl Iterator<Item = &str> {
    options
        .boosted_lm_words
        .iter()
        .map(String::as_str)
        .filter(|word| !word.trim().is_empty())
}

pub struct SpeakerDiarizationStage;

impl ConfigStage for SpeakerDiarizationStage {
    fn name(&self) -> &'static str {
        "speaker_diarization"
    }

    fn applies(&self, options: &RecognitionOptions) -> bool {
        options.speaker_diarization
    }

    fn attach(&self, options: &RecognitionOptions, config: &mut RecognitionConfig) {
        config.diarization = Some(SpeakerDiarization {
            enabled: true,
            max_speakers: options.diarization_max_speakers.filter(|count| *count > 0),
        });
    }
}

pub struct EndpointingStage;

impl EndpointingStage {
    fn thresholds(options: &RecognitionOptions) -> EndpointingThresholds {
        let endpointing = &options.endpointing;
        EndpointingThresholds {
            start_history: endpointing.start_history,
            start_threshold: endpointing.start_threshold,
            stop_history: endpointing.stop_history,
            stop_history_eou: endpointing.stop_history_eou,
            stop_threshold: endpointing.stop_threshold,
            stop_threshold_eou: endpointing.stop_threshold_eou,
        }
    }
}

impl ConfigStage for EndpointingStage {
    fn name(&self) -> &'static str {
        "endpointing"
    }

    fn applies(&self, options: &RecognitionOptions) -> bool {
        !Self::thresholds(options).is_empty()
    }

    fn attach(&self, options: &RecognitionOptions, config: &mut RecognitionConfig) {
        config.endpointing = Some(Self::thresholds(options));
    }
}

pub struct CustomConfigurationStage;

impl ConfigStage for CustomConfigurationStage {
    fn name(&self) -> &'static str {
        "custom_configuration"
    }

    fn applies(&self, options: &RecognitionOptions) -> bool {
        options
            .custom_configuration
            .as_deref()
            .is_some_and(|value| !value.is_empty())
    }

    fn attach(&self, options: &RecognitionOptions, config: &mut RecognitionConfig) {
        config.custom_configuration = options
            .custom_configuration
            .clone()
            .map(CustomConfiguration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EndpointingOptions;

    fn options() -> RecognitionOptions {
        RecognitionOptions {
            language_code: "en-US".to_string(),
            max_alternatives: 1,
            boosted_lm_score: 4.0,
            ..Default::default()
        }
    }

    #[test]
    fn base_fields_copy_from_options() {
        let config = RecognitionConfigBuilder::default()
            .build(&RecognitionOptions {
                max_alternatives: 3,
                profanity_filter: true,
                automatic_punctuation: true,
                model_name: Some("conformer-en-US".to_string()),
                ..options()
            })
            .expect("config builds");

        assert_eq!(config.language_code, "en-US");
        assert_eq!(config.model.as_deref(), Some("conformer-en-US"));
        assert_eq!(config.max_alternatives, 3);
        assert!(config.profanity_filter);
        assert!(config.enable_automatic_punctuation);
        assert!(config.verbatim_transcripts);
        assert!(!config.enable_word_time_offsets);
        assert_eq!(config.word_boosting, None);
        assert_eq!(config.diarization, None);
        assert_eq!(config.endpointing, None);
        assert_eq!(config.custom_configuration, None);
    }

    #[test]
    fn diarization_turns_on_word_time_offsets() {
        let config = RecognitionConfigBuilder::default()
            .build(&RecognitionOptions {
                speaker_diarization: true,
                word_time_offsets: false,
                ..options()
            })
            .expect("config builds");

        assert!(config.enable_word_time_offsets);
        assert_eq!(
            config.diarization,
            Some(SpeakerDiarization {
                enabled: true,
                max_speakers: None,
            })
        );
    }

    #[test]
    fn explicit_word_time_offsets_do_not_enable_diarization() {
        let config = RecognitionConfigBuilder::default()
            .build(&RecognitionOptions {
                word_time_offsets: true,
                diarization_max_speakers: Some(4),
                ..options()
            })
            .expect("config builds");

        assert!(config.enable_word_time_offsets);
        assert_eq!(config.diarization, None);
    }

    #[test]
    fn zero_max_speakers_means_service_default() {
        let builder = RecognitionConfigBuilder::default();
        let zero = builder
            .build(&RecognitionOptions {
                speaker_diarization: true,
                diarization_max_speakers: Some(0),
                ..options()
            })
            .expect("config builds");
        let three = builder
            .build(&RecognitionOptions {
                speaker_diarization: true,
                diarization_max_speakers: Some(3),
                ..options()
            })
            .expect("config builds");

        assert_eq!(zero.diarization.unwrap().max_speakers, None);
        assert_eq!(three.diarization.unwrap().max_speakers, Some(3));
    }

    #[test]
    fn verbatim_is_the_negation_of_no_verbatim() {
        let builder = RecognitionConfigBuilder::default();
        for no_verbatim in [true, false] {
            let config = builder
                .build(&RecognitionOptions {
                    no_verbatim_transcripts: no_verbatim,
                    ..options()
                })
                .expect("config builds");
            assert_eq!(config.verbatim_transcripts, !no_verbatim);
        }
    }

    #[test]
    fn word_boosting_requires_words() {
        let builder = RecognitionConfigBuilder::default();
        let without = builder.build(&options()).expect("config builds");
        let with = builder
            .build(&RecognitionOptions {
                boosted_lm_words: vec!["Riva".to_string(), "NVIDIA".to_string()],
                boosted_lm_score: 20.0,
                ..options()
            })
            .expect("config builds");

        assert_eq!(without.word_boosting, None);
        assert_eq!(
            with.word_boosting,
            Some(WordBoosting {
                words: vec!["Riva".to_string(), "NVIDIA".to_string()],
                score: 20.0,
            })
        );
    }

    #[test]
    fn blank_boosted_words_are_dropped() {
        let builder = RecognitionConfigBuilder::default();
        let blank_only = builder
            .build(&RecognitionOptions {
                boosted_lm_words: vec![String::new(), "  ".to_string()],
                ..options()
            })
            .expect("config builds");
        let mixed = builder
            .build(&RecognitionOptions {
                boosted_lm_words: vec![String::new(), "CUDA".to_string()],
                ..options()
            })
            .expect("config builds");

        assert_eq!(blank_only.word_boosting, None);
        assert_eq!(
            mixed.word_boosting.map(|boosting| boosting.words),
            Some(vec!["CUDA".to_string()])
        );
    }

    #[test]
    fn endpointing_is_absent_when_nothing_is_set() {
        let config = RecognitionConfigBuilder::default()
            .build(&options())
            .expect("config builds");
        assert_eq!(config.endpointing, None);
    }

    #[test]
    fn single_endpointing_value_attaches_block_with_defaults_elsewhere() {
        let builder = RecognitionConfigBuilder::default();
        let settings = [
            EndpointingOptions {
                start_history: Some(0),
                ..Default::default()
            },
            EndpointingOptions {
                start_threshold: Some(0.2),
                ..Default::default()
            },
            EndpointingOptions {
                stop_history: Some(800),
                ..Default::default()
            },
            EndpointingOptions {
                stop_history_eou: Some(240),
                ..Default::default()
            },
            EndpointingOptions {
                stop_threshold: Some(0.98),
                ..Default::default()
            },
            EndpointingOptions {
                stop_threshold_eou: Some(0.0),
                ..Default::default()
            },
        ];

        for endpointing in settings {
            let config = builder
                .build(&RecognitionOptions {
                    endpointing,
                    ..options()
                })
                .expect("config builds");
            let thresholds = config.endpointing.expect("endpointing attached");
            let set_count = [
                thresholds.start_history.is_some(),
                thresholds.start_threshold.is_some(),
                thresholds.stop_history.is_some(),
                thresholds.stop_history_eou.is_some(),
                thresholds.stop_threshold.is_some(),
                thresholds.stop_threshold_eou.is_some(),
            ]
            .into_iter()
            .filter(|set| *set)
            .count();
            assert_eq!(set_count, 1);
        }
    }

    #[test]
    fn explicit_zero_threshold_is_kept() {
        let config = RecognitionConfigBuilder::default()
            .build(&RecognitionOptions {
                endpointing: EndpointingOptions {
                    start_history: Some(0),
                    ..Default::default()
                },
                ..options()
            })
            .expect("config builds");

        let thresholds = config.endpointing.expect("endpointing attached");
        assert_eq!(thresholds.start_history, Some(0));
        assert_eq!(thresholds.stop_history, None);
    }

    #[test]
    fn custom_configuration_is_forwarded_verbatim() {
        let builder = RecognitionConfigBuilder::default();
        let empty = builder
            .build(&RecognitionOptions {
                custom_configuration: Some(String::new()),
                ..options()
            })
            .expect("config builds");
        let set = builder
            .build(&RecognitionOptions {
                custom_configuration: Some("test_key:test_value, other : 1".to_string()),
                ..options()
            })
            .expect("config builds");

        assert_eq!(empty.custom_configuration, None);
        assert_eq!(
            set.custom_configuration
                .as_ref()
                .map(CustomConfiguration::as_str),
            Some("test_key:test_value, other : 1")
        );
    }

    #[test]
    fn empty_language_code_is_rejected() {
        let builder = RecognitionConfigBuilder::default();
        for language_code in ["", "   "] {
            let error = builder
                .build(&RecognitionOptions {
                    language_code: language_code.to_string(),
                    ..options()
                })
                .expect_err("language code is required");
            let ConfigError::InvalidOption { field, .. } = error;
            assert_eq!(field, "language_code");
        }
    }

    #[test]
    fn stage_order_and_repetition_do_not_change_the_result() {
        let options = RecognitionOptions {
            speaker_diarization: true,
            diarization_max_speakers: Some(2),
            boosted_lm_words: vec!["cuda".to_string()],
            endpointing: EndpointingOptions {
                stop_threshold: Some(0.5),
                ..Default::default()
            },
            custom_configuration: Some("a:b".to_string()),
            ..options()
        };
        let forward = RecognitionConfigBuilder::default()
            .build(&options)
            .expect("config builds");
        let reversed = RecognitionConfigBuilder::new(vec![
            Box::new(CustomConfigurationStage),
            Box::new(EndpointingStage),
            Box::new(SpeakerDiarizationStage),
            Box::new(WordBoostingStage),
            Box::new(WordBoostingStage),
            Box::new(EndpointingStage),
        ])
        .build(&options)
        .expect("config builds");

        assert_eq!(forward, reversed);
    }
}
