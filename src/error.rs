//! Crate-level error types.

use std::fmt;

/// Failure to retrieve a resource (dataset or structure file).
#[derive(Debug)]
pub enum FetchError {
    /// The transport answered with a non-success status code.
    Status {
        /// Reference that was requested.
        reference: String,
        /// HTTP-style status code.
        status: u16,
    },
    /// The transport itself failed (network down, CORS, bad URL, ...).
    Transport {
        /// Reference that was requested.
        reference: String,
        /// Transport-specific description.
        message: String,
    },
    /// Local file access failed.
    Io {
        /// Reference that was requested.
        reference: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

impl FetchError {
    /// Reference the failed fetch was issued for.
    #[must_use]
    pub fn reference(&self) -> &str {
        match self {
            Self::Status { reference, .. }
            | Self::Transport { reference, .. }
            | Self::Io { reference, .. } => reference,
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status { reference, status } => {
                write!(f, "fetching {reference} returned status {status}")
            }
            Self::Transport { reference, message } => {
                write!(f, "fetching {reference} failed: {message}")
            }
            Self::Io { reference, source } => {
                write!(f, "reading {reference} failed: {source}")
            }
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Failure to load the prediction dataset.
#[derive(Debug)]
pub enum LoadError {
    /// The dataset resource could not be retrieved.
    Fetch(FetchError),
    /// The payload is not valid JSON.
    Json(serde_json::Error),
    /// The payload is valid JSON but not an array of records.
    NotAnArray,
    /// A single element does not match the configured record shape.
    Record {
        /// Zero-based position of the offending element.
        index: usize,
        /// What was wrong with it.
        reason: String,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch(e) => write!(f, "dataset fetch failed: {e}"),
            Self::Json(e) => write!(f, "dataset is not valid JSON: {e}"),
            Self::NotAnArray => {
                write!(f, "dataset must be a JSON array of records")
            }
            Self::Record { index, reason } => {
                write!(f, "dataset record {index}: {reason}")
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Fetch(e) => Some(e),
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<FetchError> for LoadError {
    fn from(e: FetchError) -> Self {
        Self::Fetch(e)
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

/// What went wrong while parsing structure text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The file contained no atom records.
    NoAtoms,
    /// A coordinate record is shorter than its fixed-column layout.
    TruncatedRecord,
    /// A numeric column could not be parsed.
    InvalidNumber {
        /// Column or field name.
        field: &'static str,
        /// Raw text found there.
        value: String,
    },
    /// A required `_atom_site` column is absent from the loop header.
    MissingColumn(&'static str),
    /// An `_atom_site` row has fewer values than the loop header.
    ShortRow {
        /// Number of header columns.
        expected: usize,
        /// Number of values found.
        found: usize,
    },
}

/// Malformed structure data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureParseError {
    /// One-based line number, when the failure is tied to a line.
    pub line: Option<usize>,
    /// Failure category.
    pub kind: ParseErrorKind,
}

impl StructureParseError {
    pub(crate) fn at(line: usize, kind: ParseErrorKind) -> Self {
        Self {
            line: Some(line),
            kind,
        }
    }
}

impl fmt::Display for StructureParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(line) = self.line {
            write!(f, "line {line}: ")?;
        }
        match &self.kind {
            ParseErrorKind::NoAtoms => write!(f, "no atom records found"),
            ParseErrorKind::TruncatedRecord => {
                write!(f, "coordinate record is truncated")
            }
            ParseErrorKind::InvalidNumber { field, value } => {
                write!(f, "invalid {field} value {value:?}")
            }
            ParseErrorKind::MissingColumn(name) => {
                write!(f, "missing _atom_site.{name} column")
            }
            ParseErrorKind::ShortRow { expected, found } => {
                write!(f, "expected {expected} values, found {found}")
            }
        }
    }
}

impl std::error::Error for StructureParseError {}

/// Failure of a single structure selection.
#[derive(Debug)]
pub enum StructureLoadError {
    /// The structure file could not be retrieved.
    Fetch(FetchError),
    /// The structure file could not be parsed.
    Parse(StructureParseError),
}

impl fmt::Display for StructureLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch(e) => write!(f, "structure fetch error: {e}"),
            Self::Parse(e) => write!(f, "structure parse error: {e}"),
        }
    }
}

impl std::error::Error for StructureLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Fetch(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

impl From<FetchError> for StructureLoadError {
    fn from(e: FetchError) -> Self {
        Self::Fetch(e)
    }
}

impl From<StructureParseError> for StructureLoadError {
    fn from(e: StructureParseError) -> Self {
        Self::Parse(e)
    }
}

/// A numeric cell that cannot be displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayError {
    /// The record has no usable value for this metric.
    MissingValue {
        /// Metric key as it appears in the dataset.
        field: String,
    },
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingValue { field } => {
                write!(f, "missing numeric value for {field}")
            }
        }
    }
}

impl std::error::Error for DisplayError {}

/// Errors produced by the gpcr-explorer crate.
#[derive(Debug)]
pub enum ExplorerError {
    /// Dataset load failure.
    Load(LoadError),
    /// Structure selection failure.
    Structure(StructureLoadError),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
}

impl fmt::Display for ExplorerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load(e) => write!(f, "load error: {e}"),
            Self::Structure(e) => write!(f, "{e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
        }
    }
}

impl std::error::Error for ExplorerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Load(e) => Some(e),
            Self::Structure(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::OptionsParse(_) => None,
        }
    }
}

impl From<LoadError> for ExplorerError {
    fn from(e: LoadError) -> Self {
        Self::Load(e)
    }
}

impl From<StructureLoadError> for ExplorerError {
    fn from(e: StructureLoadError) -> Self {
        Self::Structure(e)
    }
}

impl From<std::io::Error> for ExplorerError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
