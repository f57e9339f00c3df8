use std::sync::Arc;

use async_trait::async_trait;
use validator::Validate;

use speech_domain::{TokenClassificationPort, TokenClassificationRequest};

use crate::{
    ApplicationError, ClassifyTokensRequest, EntityTable, NerOutput, NerOutputMode, SpanExtractor,
};

#[async_trait]
pub trait TokenClassificationUseCase: Send + Sync {
    async fn classify(&self, request: ClassifyTokensRequest) -> Result<NerOutput, ApplicationError>;
}

pub struct TokenClassificationUseCaseImpl {
    classification: Arc<dyn TokenClassificationPort>,
    extractor: SpanExtractor,
}

impl TokenClassificationUseCaseImpl {
    pub fn new(classification: Arc<dyn TokenClassificationPort>, extractor: SpanExtractor) -> Self {
        Self {
            classification,
            extractor,
        }
    }
}

#[async_trait]
impl TokenClassificationUseCase for TokenClassificationUseCaseImpl {
    async fn classify(&self, request: ClassifyTokensRequest) -> Result<NerOutput, ApplicationError> {
        let mode: NerOutputMode = request.mode.parse()?;
        request.validate()?;

        let ClassifyTokensRequest {
            model_name,
            language_code,
            queries,
            top_n,
            ..
        } = request;
        tracing::debug!(
            model = %model_name,
            query_count = queries.len(),
            %mode,
            "starting token classification"
        );

        let predictions = self
            .classification
            .classify_tokens(TokenClassificationRequest {
                model_name,
                language_code,
                queries: queries.clone(),
                top_n,
            })
            .await?;
        let spans = self.extractor.extract_spans(&predictions, &queries)?;
        for (query, query_spans) in queries.iter().zip(&spans) {
            for span in query_spans {
                tracing::debug!(
                    label = %span.label,
                    start = span.start,
                    end = span.end,
                    text = span.text(query).unwrap_or_default(),
                    "entity found"
                );
            }
        }

        tracing::debug!(
            entity_count = spans.iter().map(Vec::len).sum::<usize>(),
            "token classification completed"
        );

        Ok(EntityTable::from_spans(&spans).select(mode))
    }
}
