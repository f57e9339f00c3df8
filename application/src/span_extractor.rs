use speech_domain::{CharSpan, EntitySpan, LabelScore, TokenPrediction, TokenScores};

use crate::{AlignmentError, DEFAULT_BACKGROUND_LABEL};

/// Reduces token-level label scores to entity spans.
#[derive(Debug, Clone)]
pub struct SpanExtractor {
    background_label: String,
}

impl Default for SpanExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_BACKGROUND_LABEL)
    }
}

impl SpanExtractor {
    pub fn new(background_label: impl Into<String>) -> Self {
        Self {
            background_label: background_label.into(),
        }
    }

    /// Entity spans per query, in query order.
    pub fn extract_spans(
        &self,
        predictions: &[TokenPrediction],
        queries: &[String],
    ) -> Result<Vec<Vec<EntitySpan>>, AlignmentError> {
        if predictions.len() != queries.len() {
            return Err(AlignmentError::CountMismatch {
                predictions: predictions.len(),
                queries: queries.len(),
            });
        }

        predictions
            .iter()
            .zip(queries)
            .enumerate()
            .map(|(index, (prediction, query))| self.query_spans(index, prediction, query))
            .collect()
    }

    fn query_spans(
        &self,
        index: usize,
        prediction: &TokenPrediction,
        query: &str,
    ) -> Result<Vec<EntitySpan>, AlignmentError> {
        let chars: Vec<char> = query.chars().collect();
        let mut spans = Vec::new();
        let mut open: Option<EntitySpan> = None;

        for token in &prediction.tokens {
            let range = token_range(index, token, chars.len())?;
            let label = match most_probable(&token.labels) {
                Some(label) if !self.is_background(label) => label,
                _ => {
                    spans.extend(open.take());
                    continue;
                }
            };

            if let Some(current) = open.as_mut() {
                if current.label == label && joins(&chars, current.end, range.start) {
                    current.end = current.end.max(range.end);
                    continue;
                }
            }
            spans.extend(open.take());
            open = Some(EntitySpan {
                label: label.to_string(),
                start: range.start,
                end: range.end,
            });
        }
        spans.extend(open);

        Ok(spans)
    }

    fn is_background(&self, label: &str) -> bool {
        label.is_empty() || label == self.background_label
    }
}

/// Highest-confidence label. Ties go to the label listed first.
fn most_probable(labels: &[LabelScore]) -> Option<&str> {
    let mut best: Option<&LabelScore> = None;
    for candidate in labels {
        if candidate.confidence.is_nan() {
            continue;
        }
        if best.map_or(true, |current| candidate.confidence > current.confidence) {
            best = Some(candidate);
        }
    }
    best.map(|score| score.label.as_str())
}

fn token_range(query: usize, token: &TokenScores, length: usize) -> Result<CharSpan, AlignmentError> {
    let span = token.span.ok_or_else(|| AlignmentError::MissingSpan {
        query,
        token: token.token.clone(),
    })?;
    if span.start > span.end || span.end > length {
        return Err(AlignmentError::SpanOutOfRange {
            query,
            token: token.token.clone(),
            start: span.start,
            end: span.end,
            length,
        });
    }
    Ok(span)
}

/// Tokens join when they touch or only whitespace separates them.
fn joins(chars: &[char], previous_end: usize, next_start: usize) -> bool {
    next_start <= previous_end || chars[previous_end..next_start].iter().all(|c| c.is_whitespace())
}
