pub mod config_builder;
pub mod dto;
pub mod error;
pub mod normalizer;
pub mod span_extractor;
pub mod usecase;

pub use config_builder::{ConfigStage, RecognitionConfigBuilder};
pub use dto::*;
pub use error::*;
pub use normalizer::{normalize, to_pretty_json, write_transcript_json};
pub use span_extractor::SpanExtractor;
pub use usecase::{
    OfflineTranscriptionUseCase, OfflineTranscriptionUseCaseImpl, TokenClassificationUseCase,
    TokenClassificationUseCaseImpl,
};
