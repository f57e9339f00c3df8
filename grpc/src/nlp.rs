use std::time::Duration;

use async_trait::async_trait;
use speech_domain::{
    CharSpan, DomainError, LabelScore, TokenClassificationPort, TokenClassificationRequest,
    TokenPrediction, TokenScores,
};
use tonic::transport::Channel;

use crate::pb::nlp as pb;
use crate::{await_rpc, GrpcConnectionSettings, RequestMetadata, RivaLanguageUnderstandingClient};

const SERVICE: &str = "nlp";

pub struct RivaNlpAdapter {
    client: RivaLanguageUnderstandingClient<Channel>,
    metadata: RequestMetadata,
    request_timeout: Option<Duration>,
}

impl RivaNlpAdapter {
    pub fn new(channel: Channel, settings: &GrpcConnectionSettings) -> Result<Self, DomainError> {
        Ok(Self {
            client: RivaLanguageUnderstandingClient::new(channel)
                .max_decoding_message_size(settings.max_decoding_message_bytes)
                .max_encoding_message_size(settings.max_encoding_message_bytes),
            metadata: RequestMetadata::parse(&settings.metadata)?,
            request_timeout: settings.request_timeout,
        })
    }
}

#[async_trait]
impl TokenClassificationPort for RivaNlpAdapter {
    async fn classify_tokens(
        &self,
        request: TokenClassificationRequest,
    ) -> Result<Vec<TokenPrediction>, DomainError> {
        let mut client = self.client.clone();
        let rpc = client.classify_tokens(self.metadata.request(map_request(request)));
        let response = await_rpc(SERVICE, self.request_timeout, rpc).await?;
        Ok(map_response(response))
    }
}

fn map_request(request: TokenClassificationRequest) -> pb::TokenClassRequest {
    pb::TokenClassRequest {
        text: request.queries,
        top_n: request.top_n,
        model: Some(pb::NlpModelParams {
            model_name: request.model_name,
            language_code: request.language_code,
        }),
    }
}

fn map_response(response: pb::TokenClassResponse) -> Vec<TokenPrediction> {
    response
        .results
        .into_iter()
        .map(|sequence| TokenPrediction {
            tokens: sequence.results.into_iter().map(map_token).collect(),
        })
        .collect()
}

fn map_token(value: pb::TokenClassValue) -> TokenScores {
    // a token split over several spans covers them all
    let span = match (value.span.first(), value.span.last()) {
        (Some(first), Some(last)) => Some(CharSpan {
            start: first.start as usize,
            end: last.end as usize,
        }),
        _ => None,
    };
    TokenScores {
        token: value.token,
        span,
        labels: value
            .label
            .into_iter()
            .map(|class| LabelScore::new(class.class_name, class.score))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_carries_model_and_queries() {
        let mapped = map_request(TokenClassificationRequest {
            model_name: "riva_ner".to_string(),
            language_code: "en-US".to_string(),
            queries: vec!["a".to_string(), "b".to_string()],
            top_n: 3,
        });

        assert_eq!(mapped.text, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(mapped.top_n, 3);
        let model = mapped.model.expect("model params set");
        assert_eq!(model.model_name, "riva_ner");
        assert_eq!(model.language_code, "en-US");
    }

    #[test]
    fn response_keeps_label_order_and_spans() {
        let predictions = map_response(pb::TokenClassResponse {
            results: vec![
                pb::TokenClassSequence {
                    results: vec![pb::TokenClassValue {
                        token: "san francisco".to_string(),
                        label: vec![
                            pb::Classification {
                                class_name: "LOC".to_string(),
                                score: 0.6,
                            },
                            pb::Classification {
                                class_name: "ORG".to_string(),
                                score: 0.6,
                            },
                        ],
                        span: vec![
                            pb::Span { start: 9, end: 12 },
                            pb::Span { start: 13, end: 22 },
                        ],
                    }],
                },
                pb::TokenClassSequence::default(),
            ],
        });

        assert_eq!(predictions.len(), 2);
        let token = &predictions[0].tokens[0];
        assert_eq!(token.span, Some(CharSpan { start: 9, end: 22 }));
        assert_eq!(
            token
                .labels
                .iter()
                .map(|label| label.label.as_str())
                .collect::<Vec<_>>(),
            vec!["LOC", "ORG"]
        );
        assert!(predictions[1].tokens.is_empty());
    }

    #[test]
    fn token_without_span_maps_to_none() {
        let token = map_token(pb::TokenClassValue {
            token: "orphan".to_string(),
            ..Default::default()
        });
        assert_eq!(token.span, None);
        assert!(token.labels.is_empty());
    }
}
