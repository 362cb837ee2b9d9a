use crate::GatewayError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

pub const QUERY_COLUMN: &str = "query";

/// Body sent to the serving endpoint: a one-row, one-column table in
/// split orientation, wrapped under `dataframe_split`.
///
/// Only built through [`InferenceRequest::new`], so it always holds exactly
/// one `query` column and one row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InferenceRequest {
    dataframe_split: DataframeSplit,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataframeSplit {
    columns: Vec<String>,
    index: Vec<usize>,
    data: Vec<Vec<String>>,
}

impl InferenceRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            dataframe_split: DataframeSplit {
                columns: vec![QUERY_COLUMN.to_string()],
                index: vec![0],
                data: vec![vec![question.into()]],
            },
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.dataframe_split.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.dataframe_split.data
    }

    pub fn question(&self) -> &str {
        &self.dataframe_split.data[0][0]
    }
}

/// Which entry of `source_documents` supplies the citation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CitationPolicy {
    /// Cite the document at a fixed position.
    Index(usize),
    /// Cite the first document that carries a `metadata.url`.
    FirstAvailable,
}

impl Default for CitationPolicy {
    fn default() -> Self {
        Self::Index(1)
    }
}

impl CitationPolicy {
    pub fn select<'a>(&self, documents: &'a [Value]) -> Option<&'a str> {
        match self {
            Self::Index(index) => documents.get(*index).and_then(document_url),
            Self::FirstAvailable => documents.iter().find_map(document_url),
        }
    }
}

fn document_url(document: &Value) -> Option<&str> {
    document.pointer("/metadata/url").and_then(Value::as_str)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
    pub source_url: Option<String>,
}

impl Answer {
    /// Normalizes a raw serving response. Only `predictions[0].result` is
    /// mandatory; the citation is best-effort.
    pub fn from_response(response: &Value, citation: CitationPolicy) -> Result<Self, GatewayError> {
        let prediction = response
            .get("predictions")
            .and_then(Value::as_array)
            .and_then(|predictions| predictions.first())
            .ok_or_else(|| GatewayError::malformed("response has no predictions[0]"))?;

        let text = prediction
            .get("result")
            .and_then(Value::as_str)
            .ok_or_else(|| GatewayError::malformed("predictions[0].result is missing or not a string"))?
            .to_string();

        let source_url = prediction
            .get("source_documents")
            .and_then(Value::as_array)
            .and_then(|documents| citation.select(documents))
            .map(str::to_string);

        Ok(Self { text, source_url })
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)?;
        if let Some(ref url) = self.source_url {
            write!(f, "\nURL: {url}")?;
        }
        Ok(())
    }
}
