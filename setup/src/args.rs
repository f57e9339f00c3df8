//! Command-line surfaces of the two clients.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{ArgAction, Args, Parser};
use speech_application::{
    ClassifyTokensRequest, EndpointingOptions, NerOutputMode, RecognitionOptions,
    DEFAULT_BACKGROUND_LABEL, DEFAULT_NER_MODEL,
};
use speech_configuration::GrpcEndpointConfig;
use speech_grpc::GrpcConnectionSettings;

/// Connection options shared by both clients. Unset flags fall back to the config file.
#[derive(Debug, Clone, Args)]
pub struct ConnectionArgs {
    /// URI to the gRPC server endpoint, e.g. `localhost:50051`
    #[arg(long)]
    pub server: Option<String>,

    /// Use SSL/TLS authentication
    #[arg(long)]
    pub use_ssl: bool,

    /// Path to a PEM CA certificate for the SSL connection (implies --use-ssl)
    #[arg(long)]
    pub ssl_cert: Option<PathBuf>,

    /// Request metadata, e.g. `--metadata authorization "Bearer $API_KEY"`
    #[arg(long, num_args = 2, value_names = ["KEY", "VALUE"], action = ArgAction::Append)]
    pub metadata: Vec<String>,

    /// Client config file (defaults to $SPEECH_CLIENT_CONFIG when set)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl ConnectionArgs {
    pub fn settings(&self, config: &GrpcEndpointConfig) -> GrpcConnectionSettings {
        let mut metadata: Vec<(String, String)> = config
            .metadata
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        metadata.extend(
            self.metadata
                .chunks_exact(2)
                .map(|pair| (pair[0].clone(), pair[1].clone())),
        );

        GrpcConnectionSettings {
            server: self.server.clone().unwrap_or_else(|| config.server.clone()),
            use_ssl: self.use_ssl || config.use_ssl,
            ssl_cert: self.ssl_cert.clone().or_else(|| config.ssl_cert.clone()),
            connect_timeout: Duration::from_millis(config.connect_timeout_ms),
            request_timeout: config.request_timeout_ms.map(Duration::from_millis),
            max_decoding_message_bytes: config.max_decoding_message_bytes,
            max_encoding_message_bytes: config.max_encoding_message_bytes,
            metadata,
        }
    }
}

/// Recognition options.
#[derive(Debug, Clone, Args)]
pub struct AsrConfigArgs {
    /// Language code of the model to be used
    #[arg(long, default_value = "en-US")]
    pub language_code: String,

    /// Model name to use on the server
    #[arg(long)]
    pub model_name: Option<String>,

    /// Maximum number of alternative transcripts to return
    #[arg(long, default_value_t = 1)]
    pub max_alternatives: u32,

    /// Filter profane words out of transcripts
    #[arg(long)]
    pub profanity_filter: bool,

    /// Add automatic punctuation to transcripts
    #[arg(long)]
    pub automatic_punctuation: bool,

    /// Apply inverse text normalization instead of returning verbatim transcripts
    #[arg(long)]
    pub no_verbatim_transcripts: bool,

    /// Include word start and end times in the response
    #[arg(long)]
    pub word_time_offsets: bool,

    /// Tag each recognized word with a speaker (enables word time offsets)
    #[arg(long)]
    pub speaker_diarization: bool,

    /// Maximum number of speakers to identify, 0 keeps the server default
    #[arg(long)]
    pub diarization_max_speakers: Option<u32>,

    /// Words to boost during recognition
    #[arg(long, num_args = 1.., action = ArgAction::Append)]
    pub boosted_lm_words: Vec<String>,

    /// Score applied to every boosted word
    #[arg(long, default_value_t = 4.0, allow_negative_numbers = true)]
    pub boosted_lm_score: f32,

    /// Size of the window, in ms, used to detect start of utterance
    #[arg(long, allow_negative_numbers = true)]
    pub start_history: Option<i32>,

    /// Fraction of non-blank frames in the window that marks start of utterance
    #[arg(long, allow_negative_numbers = true)]
    pub start_threshold: Option<f32>,

    /// Size of the window, in ms, used to detect end of utterance
    #[arg(long, allow_negative_numbers = true)]
    pub stop_history: Option<i32>,

    /// Size of the window, in ms, used to trigger end of utterance first pass
    #[arg(long, allow_negative_numbers = true)]
    pub stop_history_eou: Option<i32>,

    /// Fraction of blank frames in the window that marks end of utterance
    #[arg(long, allow_negative_numbers = true)]
    pub stop_threshold: Option<f32>,

    /// Fraction of blank frames that triggers end of utterance first pass
    #[arg(long, allow_negative_numbers = true)]
    pub stop_threshold_eou: Option<f32>,

    /// Custom settings as `key:value,key:value`, passed to the server untouched
    #[arg(long)]
    pub custom_configuration: Option<String>,
}

impl AsrConfigArgs {
    pub fn to_options(&self) -> RecognitionOptions {
        RecognitionOptions {
            language_code: self.language_code.clone(),
            model_name: self.model_name.clone(),
            max_alternatives: self.max_alternatives,
            profanity_filter: self.profanity_filter,
            automatic_punctuation: self.automatic_punctuation,
            no_verbatim_transcripts: self.no_verbatim_transcripts,
            word_time_offsets: self.word_time_offsets,
            speaker_diarization: self.speaker_diarization,
            diarization_max_speakers: self.diarization_max_speakers,
            boosted_lm_words: self.boosted_lm_words.clone(),
            boosted_lm_score: self.boosted_lm_score,
            endpointing: EndpointingOptions {
                start_history: self.start_history,
                start_threshold: self.start_threshold,
                stop_history: self.stop_history,
                stop_history_eou: self.stop_history_eou,
                stop_threshold: self.stop_threshold,
                stop_threshold_eou: self.stop_threshold_eou,
            },
            custom_configuration: self.custom_configuration.clone(),
        }
    }
}

/// Offline file transcription. The entire audio content of `--input-file` is sent in one
/// request and the transcript for the whole file is received in one response.
#[derive(Debug, Parser)]
#[command(name = "transcribe-file-offline", version)]
pub struct TranscribeFileArgs {
    /// A path to a local file to transcribe
    #[arg(long)]
    pub input_file: PathBuf,

    /// Path to save the transcription result as a JSON file
    #[arg(long)]
    pub output_json: Option<PathBuf>,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(flatten)]
    pub recognition: AsrConfigArgs,
}

impl TranscribeFileArgs {
    pub fn input_path(&self) -> PathBuf {
        expand_home(&self.input_file)
    }
}

/// Named entity recognition over one or more queries.
#[derive(Debug, Parser)]
#[command(name = "ner-client", version)]
pub struct NerArgs {
    /// Model on the server to execute
    #[arg(long, default_value = DEFAULT_NER_MODEL)]
    pub model: String,

    /// Queries to classify
    #[arg(
        long,
        num_args = 1..,
        default_values = ["Where is San Francisco?", "Jensen Huang is the CEO of NVIDIA Corporation."]
    )]
    pub query: Vec<String>,

    /// What is printed to stdout: `label` prints entity classes, `span_start` the index of
    /// the first character of each entity, `span_end` the index just past its last
    /// character. For "cats are nice" with entity "cats", span_start is 0 and span_end is 4.
    #[arg(long, default_value = "label")]
    pub test: NerOutputMode,

    /// Language code of the model
    #[arg(long, default_value = "en-US")]
    pub language_code: String,

    /// Number of labels the server returns per token
    #[arg(long, default_value_t = 1)]
    pub top_n: u32,

    /// Label the model uses for tokens outside any entity
    #[arg(long, default_value = DEFAULT_BACKGROUND_LABEL)]
    pub background_label: String,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

impl NerArgs {
    pub fn to_request(&self) -> ClassifyTokensRequest {
        ClassifyTokensRequest {
            model_name: self.model.clone(),
            language_code: self.language_code.clone(),
            queries: self.query.clone(),
            top_n: self.top_n,
            mode: self.test.to_string(),
        }
    }
}

fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| path.to_path_buf()),
        Err(_) => path.to_path_buf(),
    }
}
