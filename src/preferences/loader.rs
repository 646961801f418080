use std::{path::Path, sync::Arc};

use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::{debug, instrument};

use super::{BackingStore, PreferenceMap, Snapshot, StoreError, path_ops::join_uri};

/// Why a preference document could not be turned into a [`Snapshot`].
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The preference document does not exist.
    #[error("preference source not found: {uri}")]
    NotFound {
        /// Identifier that was looked up
        uri: String,
    },

    /// The backing store failed to produce the document.
    #[error("failed to read preferences from '{uri}': {source}")]
    ReadFailed {
        /// Identifier being read, or the relative path if the root was unknown
        uri: String,
        /// Error reported by the backing store
        #[source]
        source: StoreError,
    },

    /// The document is not a well-formed preference object.
    #[error("failed to parse preferences at '{uri}': {reason}")]
    ParseFailed {
        /// Identifier of the malformed document
        uri: String,
        /// Human-readable description of the problem
        reason: String,
        /// 1-based line of the problem, if known
        line: Option<usize>,
        /// 1-based column of the problem, if known
        column: Option<usize>,
    },
}

impl LoadError {
    fn from_store(uri: &str, error: StoreError) -> Self {
        match error {
            StoreError::NotFound(_) => LoadError::NotFound {
                uri: uri.to_string(),
            },
            source => LoadError::ReadFailed {
                uri: uri.to_string(),
                source,
            },
        }
    }
}

/// Structured text formats a preference document may be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// A JSON object.
    Json,
    /// A TOML document.
    Toml,
}

impl DocumentFormat {
    /// Picks the format from the file extension, defaulting to JSON.
    pub fn from_path(path: &str) -> Self {
        match Path::new(path).extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => DocumentFormat::Toml,
            _ => DocumentFormat::Json,
        }
    }
}

/// Reads and parses the preference document from a [`BackingStore`].
pub struct Loader {
    store: Arc<dyn BackingStore>,
    preference_path: String,
    format: DocumentFormat,
    source_uri: OnceCell<String>,
}

impl Loader {
    /// Creates a loader for the document at `preference_path`, relative to the
    /// store's workspace root.
    pub fn new(store: Arc<dyn BackingStore>, preference_path: impl Into<String>) -> Self {
        let preference_path = preference_path.into();
        let format = DocumentFormat::from_path(&preference_path);

        Self {
            store,
            preference_path,
            format,
            source_uri: OnceCell::new(),
        }
    }

    /// The relative path this loader was configured with.
    pub fn preference_path(&self) -> &str {
        &self.preference_path
    }

    /// Resolves the document identifier.
    ///
    /// The workspace root is requested once and cached. A failed lookup is
    /// not cached and will be retried on the next call.
    ///
    /// # Errors
    /// Returns `LoadError::ReadFailed` if the workspace root is unavailable.
    pub async fn source_uri(&self) -> Result<&str, LoadError> {
        let uri = self
            .source_uri
            .get_or_try_init(|| async {
                let root = self
                    .store
                    .workspace_root()
                    .await
                    .map_err(|source| LoadError::ReadFailed {
                        uri: self.preference_path.clone(),
                        source,
                    })?;

                let uri = join_uri(&root.uri, &self.preference_path);
                debug!(uri = %uri, "Resolved preference source");
                Ok::<_, LoadError>(uri)
            })
            .await?;

        Ok(uri.as_str())
    }

    /// Fetches and parses the preference document.
    ///
    /// # Errors
    /// * `LoadError::NotFound` - If the document does not exist
    /// * `LoadError::ReadFailed` - If the root or the document cannot be read
    /// * `LoadError::ParseFailed` - If the content is not a preference object
    #[instrument(skip(self), fields(path = %self.preference_path))]
    pub async fn load(&self) -> Result<Snapshot, LoadError> {
        let uri = self.source_uri().await?;

        let resolved = self
            .store
            .resolve_content(uri)
            .await
            .map_err(|e| LoadError::from_store(uri, e))?;

        let values = parse_document(&resolved.content, self.format, uri)?;
        debug!(count = values.len(), "Parsed preference document");

        Ok(Snapshot::new(uri, values))
    }
}

/// Parses `content` into a preference mapping.
///
/// # Errors
/// Returns `LoadError::ParseFailed` if the content is malformed or its top
/// level is not an object.
pub fn parse_document(
    content: &str,
    format: DocumentFormat,
    uri: &str,
) -> Result<PreferenceMap, LoadError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    match format {
        DocumentFormat::Json => parse_json(content, uri),
        DocumentFormat::Toml => parse_toml(content, uri),
    }
}

fn parse_json(content: &str, uri: &str) -> Result<PreferenceMap, LoadError> {
    let value: Value = serde_json::from_str(content).map_err(|e| LoadError::ParseFailed {
        uri: uri.to_string(),
        reason: e.to_string(),
        line: Some(e.line()),
        column: Some(e.column()),
    })?;

    match value {
        Value::Object(map) => Ok(map),
        other => Err(LoadError::ParseFailed {
            uri: uri.to_string(),
            reason: format!(
                "expected an object at the top level, found {}",
                value_kind(&other)
            ),
            line: None,
            column: None,
        }),
    }
}

fn parse_toml(content: &str, uri: &str) -> Result<PreferenceMap, LoadError> {
    toml::from_str::<PreferenceMap>(content).map_err(|e| {
        let position = e.span().map(|span| line_column(content, span.start));
        let reason = match position {
            Some((line, column)) => format!("{} at line {line} column {column}", e.message()),
            None => e.message().to_string(),
        };

        LoadError::ParseFailed {
            uri: uri.to_string(),
            reason,
            line: position.map(|(line, _)| line),
            column: position.map(|(_, column)| column),
        }
    })
}

fn line_column(content: &str, offset: usize) -> (usize, usize) {
    let prefix = content.get(..offset).unwrap_or(content);
    let line = prefix.matches('\n').count() + 1;
    let column = prefix
        .rsplit('\n')
        .next()
        .map_or(0, |last| last.chars().count())
        + 1;

    (line, column)
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
