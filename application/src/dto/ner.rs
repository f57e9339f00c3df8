use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use speech_domain::EntitySpan;
use validator::Validate;

use crate::ApplicationError;

pub const DEFAULT_NER_MODEL: &str = "riva_ner";
pub const DEFAULT_BACKGROUND_LABEL: &str = "O";

#[derive(Debug, Clone, Validate)]
pub struct ClassifyTokensRequest {
    #[validate(length(min = 1))]
    pub model_name: String,
    #[validate(length(min = 1))]
    pub language_code: String,
    #[validate(length(min = 1))]
    pub queries: Vec<String>,
    pub top_n: u32,
    pub mode: String,
}

/// Which column of the entity table is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NerOutputMode {
    Label,
    SpanStart,
    SpanEnd,
}

impl NerOutputMode {
    pub const ALL: [NerOutputMode; 3] = [
        NerOutputMode::Label,
        NerOutputMode::SpanStart,
        NerOutputMode::SpanEnd,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NerOutputMode::Label => "label",
            NerOutputMode::SpanStart => "span_start",
            NerOutputMode::SpanEnd => "span_end",
        }
    }

    pub fn supported_list() -> String {
        Self::ALL
            .iter()
            .map(|mode| format!("'{}'", mode.as_str()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for NerOutputMode {
    type Err = ApplicationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == value)
            .ok_or_else(|| ApplicationError::UnsupportedMode(value.to_string()))
    }
}

impl fmt::Display for NerOutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entity spans per query, stored column-wise. Row `i` belongs to query `i`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct EntityTable {
    pub labels: Vec<Vec<String>>,
    pub span_starts: Vec<Vec<usize>>,
    pub span_ends: Vec<Vec<usize>>,
}

impl EntityTable {
    pub fn from_spans(spans: &[Vec<EntitySpan>]) -> Self {
        let mut table = Self::default();
        for query_spans in spans {
            table
                .labels
                .push(query_spans.iter().map(|span| span.label.clone()).collect());
            table
                .span_starts
                .push(query_spans.iter().map(|span| span.start).collect());
            table
                .span_ends
                .push(query_spans.iter().map(|span| span.end).collect());
        }
        table
    }

    pub fn select(self, mode: NerOutputMode) -> NerOutput {
        match mode {
            NerOutputMode::Label => NerOutput::Labels(self.labels),
            NerOutputMode::SpanStart => NerOutput::SpanStarts(self.span_starts),
            NerOutputMode::SpanEnd => NerOutput::SpanEnds(self.span_ends),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum NerOutput {
    Labels(Vec<Vec<String>>),
    SpanStarts(Vec<Vec<usize>>),
    SpanEnds(Vec<Vec<usize>>),
}
