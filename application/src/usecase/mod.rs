mod ner;
mod transcribe;

pub use ner::{TokenClassificationUseCase, TokenClassificationUseCaseImpl};
pub use transcribe::{OfflineTranscriptionUseCase, OfflineTranscriptionUseCaseImpl};
