//! Domain values passed between pipeline steps
//!
//! Every value is created once and never mutated. The string wrappers that
//! must carry text (`Query`, `SearchKeyword`, `TickerSymbol`, `Summary`)
//! reject empty and whitespace-only input at construction.

use crate::error::EmptyValueError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Natural-language question supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Query(String);

impl Query {
    /// Create a query, rejecting blank input
    pub fn new(text: impl Into<String>) -> Result<Self, EmptyValueError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(EmptyValueError("query"));
        }
        Ok(Self(text))
    }

    /// Borrow the query text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Query {
    type Error = EmptyValueError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for Query {
    type Error = EmptyValueError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Search engine keyword derived from a query
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchKeyword(String);

impl SearchKeyword {
    /// Create a keyword, rejecting blank input
    pub fn new(text: impl Into<String>) -> Result<Self, EmptyValueError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(EmptyValueError("search keyword"));
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SearchKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ticker symbol derived from a query
///
/// Not checked against any exchange listing. An unknown symbol is reported
/// by the market data gateway when it is looked up.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TickerSymbol(String);

impl TickerSymbol {
    /// Create a symbol, rejecting blank input
    pub fn new(text: impl Into<String>) -> Result<Self, EmptyValueError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(EmptyValueError("ticker symbol"));
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TickerSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One ranked search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Body text of the result
    pub text: String,

    /// Result title, when the provider reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Result URL, when the provider reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl SearchHit {
    /// Create a hit carrying only body text
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            title: None,
            url: None,
        }
    }

    /// Set the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the URL
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// Web snippet chosen for the summary
///
/// Either the text of the first search hit or the [`SnippetResult::NO_RESULTS`]
/// sentinel when the search came back empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetResult(String);

impl SnippetResult {
    /// Placeholder used when a search returns no hits
    pub const NO_RESULTS: &'static str = "No results found";

    /// Wrap the text of a search hit
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The empty-search sentinel
    pub fn no_results() -> Self {
        Self(Self::NO_RESULTS.to_string())
    }

    /// Whether this is the empty-search sentinel
    pub fn is_no_results(&self) -> bool {
        self.0 == Self::NO_RESULTS
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SnippetResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Structured market data returned by a lookup
///
/// Opaque to the pipeline: fields are passed to the summary prompt verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarketInfoRecord(Map<String, Value>);

impl MarketInfoRecord {
    /// Wrap a JSON object
    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Build a record from a JSON value, returning `None` unless it is an object
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self(fields)),
            _ => None,
        }
    }

    /// Look up a single field
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Borrow all fields
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for MarketInfoRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Renders the record as compact JSON
impl fmt::Display for MarketInfoRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(&self.0).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/// Final answer produced by a pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Summary(String);

impl Summary {
    /// Create a summary, rejecting blank input
    pub fn new(text: impl Into<String>) -> Result<Self, EmptyValueError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(EmptyValueError("summary"));
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the summary, returning its text
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
