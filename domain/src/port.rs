use async_trait::async_trait;

use crate::{
    DomainError, OfflineRecognitionRequest, RecognitionResponse, TokenClassificationRequest,
    TokenPrediction,
};

#[async_trait]
pub trait SpeechRecognitionPort: Send + Sync {
    async fn recognize(
        &self,
        request: OfflineRecognitionRequest,
    ) -> Result<RecognitionResponse, DomainError>;
}

#[async_trait]
pub trait TokenClassificationPort: Send + Sync {
    /// Returns one prediction per query, in request order.
    async fn classify_tokens(
        &self,
        request: TokenClassificationRequest,
    ) -> Result<Vec<TokenPrediction>, DomainError>;
}
